use crate::world::Axis;

/// Distance at which a full-bright surface fades to nothing.
pub const LIGHT_FALLOFF: f32 = 1500.0;

/// Output floor for surfaces at or beyond the falloff.
const MIN_LIGHT: u8 = 38;

/// Perceived brightness (row index into the lightmap) of a surface
/// `distance` units away in a sector lit at `sector_light` (0..=1).
///
/// Walls get a small bonus when they run north-south and a penalty when they
/// run east-west.
pub fn lightness(distance: f32, sector_light: f32, axis: Option<Axis>) -> u8 {
    let mut l = (0.9 - distance / LIGHT_FALLOFF) * sector_light;
    match axis {
        Some(Axis::Vertical) => l *= 1.1,
        Some(Axis::Horizontal) => l *= 0.9,
        _ => {}
    }

    if l >= 1.0 {
        255
    } else if l <= 0.0 || l.is_nan() {
        MIN_LIGHT
    } else {
        (255.0 * (0.2 + l * 0.8)) as u8
    }
}
