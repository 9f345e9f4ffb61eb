use glam::DVec2;

/// Scale `v` to the given magnitude, preserving direction.
/// A zero vector stays zero (there is no direction to preserve).
pub fn with_magnitude(v: DVec2, magnitude: f64) -> DVec2 {
    v.normalize_or_zero() * magnitude
}

/// Euclidean distance between two grid slots.
pub fn grid_distance(a: (i32, i32), b: (i32, i32)) -> f64 {
    slot_vec(a.0, a.1).distance(slot_vec(b.0, b.1))
}

/// Grid slot as a real-valued vector for movement arithmetic.
pub fn slot_vec(x: i32, y: i32) -> DVec2 {
    DVec2::new(x as f64, y as f64)
}

/// Drop the fractional part of each component (toward zero) and
/// return the result as a grid slot.
pub fn truncate_to_slot(v: DVec2) -> (i32, i32) {
    (v.x.trunc() as i32, v.y.trunc() as i32)
}
