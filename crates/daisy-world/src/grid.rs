//! Square grid topology and heat diffusion.
//!
//! Cells are stored row-major; all adjacency is index arithmetic on the
//! side length. Off-grid neighbours are simply absent.

use smallvec::SmallVec;

/// Flat indices of a cell's 3x3 block, self included, clipped to the grid
pub type Neighbourhood = SmallVec<[usize; 9]>;

/// Flat indices of the in-bounds cells in the 3x3 block around `index`,
/// in row-major order. The cell itself is always included.
pub fn neighbourhood(index: usize, size: usize) -> Neighbourhood {
    let row = (index / size) as isize;
    let col = (index % size) as isize;
    let size = size as isize;

    let mut result = Neighbourhood::new();
    for nr in row - 1..=row + 1 {
        for nc in col - 1..=col + 1 {
            if nr >= 0 && nr < size && nc >= 0 && nc < size {
                result.push((nr * size + nc) as usize);
            }
        }
    }
    result
}

/// Redistribute a row-major temperature field over the 8-neighbour kernel.
///
/// Each cell sends `rate / 8` of its value to every in-bounds cell of its
/// 3x3 block (itself included) and keeps the rest. Shares that would land
/// off the grid stay with the source, so the field total is conserved.
pub fn diffuse(temperatures: &[f64], size: usize, diffusion_rate: f64) -> Vec<f64> {
    debug_assert_eq!(temperatures.len(), size * size);

    let mut diffused = vec![0.0; temperatures.len()];
    for (index, &temperature) in temperatures.iter().enumerate() {
        let share = temperature * diffusion_rate / 8.0;
        let mut remaining = temperature;

        for neighbour in neighbourhood(index, size) {
            diffused[neighbour] += share;
            remaining -= share;
        }

        diffused[index] += remaining;
    }

    diffused
}
