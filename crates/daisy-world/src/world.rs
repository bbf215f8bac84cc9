//! The Daisyworld grid and its per-tick rules.

use crate::grid::{diffuse, neighbourhood, Neighbourhood};
use daisy_core::{Error, Patch, Result, Species, WorldConfig, WorldStats};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::trace;

/// Fraction of a patch's temperature shared with its neighbourhood per tick
pub const DIFFUSION_RATE: f64 = 0.5;

/// A square grid of patches, stored row-major.
///
/// The world owns its random generator. Every stochastic draw (initial
/// ages, the initial shuffle, seeding and target choice) advances it in
/// row-major order, so equal seeds give equal runs.
#[derive(Debug, Clone)]
pub struct World {
    size: usize,
    max_age: u32,
    patches: Vec<Patch>,
    rng: ChaCha8Rng,
}

impl World {
    /// Build a world with `floor(size² · fraction)` black and white daisies
    /// scattered randomly over barren ground.
    pub fn new(
        size: usize,
        start_black_fraction: f64,
        start_white_fraction: f64,
        max_age: u32,
        seed: u64,
    ) -> Result<Self> {
        validate_fractions(start_black_fraction, start_white_fraction)?;

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let total = size * size;
        let black = (total as f64 * start_black_fraction).floor() as usize;
        let white = ((total as f64 * start_white_fraction).floor() as usize).min(total - black);

        let mut patches = Vec::with_capacity(total);
        for index in 0..total {
            let species = if index < black {
                Species::Black
            } else if index < black + white {
                Species::White
            } else {
                Species::Barren
            };
            let age = rng.gen_range(0..=max_age);
            patches.push(Patch::new(species, 0.0, i64::from(age))?);
        }
        patches.shuffle(&mut rng);

        Ok(Self {
            size,
            max_age,
            patches,
            rng,
        })
    }

    pub fn from_config(config: &WorldConfig, seed: u64) -> Result<Self> {
        Self::new(
            config.size,
            config.start_black_fraction,
            config.start_white_fraction,
            config.max_age,
            seed,
        )
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn max_age(&self) -> u32 {
        self.max_age
    }

    /// All patches in row-major order
    pub fn patches(&self) -> &[Patch] {
        &self.patches
    }

    /// Rows of the grid, top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[Patch]> + '_ {
        self.patches.chunks(self.size.max(1))
    }

    pub fn stats(&self, solar_luminosity: f64) -> WorldStats {
        WorldStats::from_patches(&self.patches, solar_luminosity)
    }

    /// Heat every patch independently.
    pub fn compute_temperatures(&mut self, solar_luminosity: f64) {
        for patch in &mut self.patches {
            patch.absorb_light(solar_luminosity);
        }
    }

    pub fn compute_diffusion(&mut self) {
        let temperatures: Vec<f64> = self.patches.iter().map(Patch::temperature).collect();
        let diffused = diffuse(&temperatures, self.size, DIFFUSION_RATE);

        for (patch, temperature) in self.patches.iter_mut().zip(diffused) {
            patch.set_temperature(temperature);
        }
    }

    /// Age every daisy, then let the survivors seed neighbouring barren patches.
    ///
    /// Sources are read from the post-aging grid; sprouts are written to a
    /// working copy that replaces the grid once the scan is done. Barren
    /// targets are looked up in the working copy, so a patch sprouted
    /// earlier in the row-major scan cannot be claimed again this tick.
    pub fn spread(&mut self) {
        for patch in &mut self.patches {
            patch.age_and_die(self.max_age);
        }

        let mut new_patches = self.patches.clone();
        let mut sprouted = 0usize;

        for (index, source) in self.patches.iter().enumerate() {
            let species = source.species();
            if !species.is_daisy() {
                continue;
            }
            if self.rng.gen::<f64>() >= source.seeding_threshold() {
                continue;
            }

            let barren: Neighbourhood = neighbourhood(index, self.size)
                .into_iter()
                .filter(|&n| new_patches[n].species() == Species::Barren)
                .collect();

            if let Some(&target) = barren.choose(&mut self.rng) {
                new_patches[target].sprout(species);
                sprouted += 1;
            }
        }

        trace!(sprouted, "Seeding phase complete");
        self.patches = new_patches;
    }

    /// One tick: heating, then diffusion, then aging and seeding.
    pub fn step(&mut self, solar_luminosity: f64) {
        self.compute_temperatures(solar_luminosity);
        self.compute_diffusion();
        self.spread();
    }
}

fn validate_fractions(black: f64, white: f64) -> Result<()> {
    if !(black.is_finite() && white.is_finite()) || black < 0.0 || white < 0.0 {
        return Err(Error::Precondition(format!(
            "start fractions must be non-negative, got black={} white={}",
            black, white
        )));
    }
    if black + white > 1.0 {
        return Err(Error::Precondition(format!(
            "start fractions sum to {}, which exceeds 1",
            black + white
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::RngCore;

    fn count(world: &World, species: Species) -> usize {
        world
            .patches()
            .iter()
            .filter(|p| p.species() == species)
            .count()
    }

    #[test]
    fn test_rejects_bad_fractions() {
        for (black, white) in [(-0.1, 0.2), (0.2, -0.1), (0.51, 0.67), (-1.0, 0.0)] {
            let result = World::new(4, black, white, 25, 0);
            assert!(
                matches!(result, Err(Error::Precondition(_))),
                "accepted black={} white={}",
                black,
                white
            );
        }
        assert!(World::new(4, f64::NAN, 0.0, 25, 0).is_err());
    }

    #[test]
    fn test_initial_population() {
        let world = World::new(4, 0.5, 0.25, 25, 1).unwrap();
        assert_eq!(world.patches().len(), 16);
        assert_eq!(count(&world, Species::Black), 8);
        assert_eq!(count(&world, Species::White), 4);
        assert_eq!(count(&world, Species::Barren), 4);

        let world = World::new(3, 1.0, 0.0, 25, 1).unwrap();
        assert_eq!(count(&world, Species::Black), 9);

        let world = World::new(3, 0.0, 0.0, 25, 1).unwrap();
        assert_eq!(count(&world, Species::Barren), 9);
    }

    #[test]
    fn test_initial_counts_are_floored() {
        // 9 * 0.3 = 2.7, 9 * 0.1 = 0.9
        let world = World::new(3, 0.3, 0.1, 25, 3).unwrap();
        assert_eq!(count(&world, Species::Black), 2);
        assert_eq!(count(&world, Species::White), 0);
        assert_eq!(count(&world, Species::Barren), 7);
    }

    #[test]
    fn test_initial_patches() {
        let world = World::new(10, 0.2, 0.2, 25, 9).unwrap();
        assert_eq!(world.max_age(), 25);
        for patch in world.patches() {
            assert_eq!(patch.temperature(), 0.0);
            assert!(patch.age() <= world.max_age());
        }
    }

    #[test]
    fn test_shuffle_scatters_species() {
        let world = World::new(20, 0.5, 0.0, 25, 5).unwrap();
        let first_half = &world.patches()[..200];
        assert!(first_half.iter().any(|p| p.species() == Species::Barren));
    }

    #[test]
    fn test_same_seed_same_world() {
        let mut a = World::new(8, 0.3, 0.3, 25, 42).unwrap();
        let mut b = World::new(8, 0.3, 0.3, 25, 42).unwrap();
        assert_eq!(a.patches(), b.patches());

        for _ in 0..20 {
            a.step(1.0);
            b.step(1.0);
        }
        assert_eq!(a.patches(), b.patches());
    }

    #[test]
    fn test_compute_temperatures_is_per_patch() {
        let mut world = World::new(3, 0.0, 0.0, 25, 0).unwrap();
        world.compute_temperatures(1.0);
        let expected = (72.0 * 0.6f64.ln() + 80.0) / 2.0;
        for patch in world.patches() {
            assert!((patch.temperature() - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn test_compute_diffusion_conserves_heat() {
        let mut world = World::new(5, 0.4, 0.4, 25, 11).unwrap();
        world.compute_temperatures(1.0);
        let before: f64 = world.patches().iter().map(Patch::temperature).sum();

        world.compute_diffusion();
        let after: f64 = world.patches().iter().map(Patch::temperature).sum();
        assert!((before - after).abs() < 1e-9);
    }

    #[test]
    fn test_spread_kills_old_daisies() {
        let mut world = World::new(3, 1.0, 0.0, 0, 0).unwrap();
        // max_age 0: every daisy dies in the aging phase, nothing is left to seed
        world.spread();
        assert_eq!(count(&world, Species::Barren), 9);
    }

    #[test]
    fn test_spread_seeds_when_threshold_above_one() {
        let mut world = World::new(3, 0.0, 0.0, 25, 0).unwrap();
        world.patches[4] = Patch::new(Species::White, 22.5, 0).unwrap();

        world.spread();
        // Threshold > 1 means the draw always passes; one barren neighbour sprouts
        assert_eq!(count(&world, Species::White), 2);
        assert_eq!(world.patches()[4].age(), 1);
    }

    #[test]
    fn test_fresh_sprouts_do_not_seed_same_tick() {
        let mut world = World::new(3, 0.0, 0.0, 25, 0).unwrap();
        for patch in &mut world.patches {
            *patch = Patch::new(Species::Barren, 22.5, 0).unwrap();
        }
        world.patches[0] = Patch::new(Species::White, 22.5, 0).unwrap();

        world.spread();
        // Only the original daisy seeds; its sprout waits for the next tick
        assert_eq!(count(&world, Species::White), 2);
    }

    #[test]
    fn test_spread_draw_order() {
        let mut world = World::new(3, 0.0, 0.0, 25, 0).unwrap();
        let layout = [
            (Species::Black, 22.5),
            (Species::Barren, 0.0),
            (Species::White, 60.0),
            (Species::Barren, 0.0),
            (Species::White, 22.5),
            (Species::Barren, 0.0),
            (Species::Barren, 0.0),
            (Species::Barren, 0.0),
            (Species::Black, -100.0),
        ];
        for (patch, (species, temperature)) in world.patches.iter_mut().zip(layout) {
            *patch = Patch::new(species, temperature, 0).unwrap();
        }
        let mut expected = world.rng.clone();

        world.spread();

        // Cell 0 passes and picks between barren cells 1 and 3
        expected.gen::<f64>();
        expected.gen_range(0..2u32);
        // Cell 2 is too hot: draw only
        expected.gen::<f64>();
        // Cell 4 passes; four barren cells remain around it
        expected.gen::<f64>();
        expected.gen_range(0..4u32);
        // Cell 8 is too cold: draw only
        expected.gen::<f64>();

        assert_eq!(world.rng.next_u64(), expected.next_u64());
        assert_eq!(count(&world, Species::Barren), 3);
    }

    #[test]
    fn test_spread_never_fires_below_zero_threshold() {
        let mut world = World::new(3, 0.0, 0.0, 25, 0).unwrap();
        world.patches[4] = Patch::new(Species::Black, 0.0, 0).unwrap();

        for _ in 0..10 {
            world.spread();
        }
        assert_eq!(count(&world, Species::Black), 1);
    }

    #[test]
    fn test_contested_target_claimed_once() {
        // Two sources share a single barren patch; the earlier one in row-major order wins.
        let mut world = World::new(2, 0.0, 0.0, 25, 0).unwrap();
        world.patches[0] = Patch::new(Species::Black, 22.5, 0).unwrap();
        world.patches[1] = Patch::new(Species::White, 22.5, 0).unwrap();
        world.patches[2] = Patch::new(Species::Black, -100.0, 0).unwrap();
        world.patches[3] = Patch::barren();

        world.spread();
        assert_eq!(world.patches()[3].species(), Species::Black);
        assert_eq!(world.patches()[3].age(), 0);
    }

    #[test]
    fn test_population_invariant_over_ticks() {
        let mut world = World::new(12, 0.3, 0.3, 25, 99).unwrap();
        for _ in 0..100 {
            world.step(1.0);
            let stats = world.stats(1.0);
            assert_eq!(stats.total(), 144);
            assert_eq!(world.patches().len(), 144);
        }
    }

    #[test]
    fn test_rows() {
        let world = World::new(4, 0.2, 0.2, 25, 0).unwrap();
        let rows: Vec<_> = world.rows().collect();
        assert_eq!(rows.len(), 4);
        assert!(rows.iter().all(|row| row.len() == 4));
    }

    #[test]
    fn test_single_cell_world_steps() {
        let mut world = World::new(1, 1.0, 0.0, 25, 0).unwrap();
        world.step(1.0);
        assert_eq!(world.patches().len(), 1);
    }

    #[test]
    fn test_empty_world() {
        let mut world = World::new(0, 0.2, 0.2, 25, 0).unwrap();
        world.step(1.0);
        assert!(world.patches().is_empty());
        assert_eq!(world.rows().count(), 0);
    }
}
