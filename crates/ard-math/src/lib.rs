pub use glam::*;

/// Converts a rotation into XYZ euler angles in degrees.
#[inline]
pub fn euler_degrees(rotation: Quat) -> Vec3 {
    let (x, y, z) = rotation.to_euler(EulerRot::XYZ);
    Vec3::new(x.to_degrees(), y.to_degrees(), z.to_degrees())
}

/// Normalizes a rotation, falling back to the identity for degenerate quaternions.
#[inline]
pub fn normalize_or_identity(rotation: Quat) -> Quat {
    let len_sq = rotation.length_squared();
    if len_sq <= f32::EPSILON || !len_sq.is_finite() {
        Quat::IDENTITY
    } else {
        rotation.normalize()
    }
}
