//! Radiative heating of a single patch.

/// Temperature reached when no luminosity is absorbed.
pub const HEATING_FLOOR: f64 = 80.0;

/// Equilibrium temperature contribution for a surface with the given albedo.
///
/// The logarithmic response is undefined for non-positive absorbed
/// luminosity, so those inputs map to [`HEATING_FLOOR`].
pub fn local_heating(solar_luminosity: f64, albedo: f64) -> f64 {
    let absorbed = (1.0 - albedo) * solar_luminosity;
    if absorbed > 0.0 {
        72.0 * absorbed.ln() + HEATING_FLOOR
    } else {
        HEATING_FLOOR
    }
}
