//! Orientation math for aiming placed assets.

use crate::scene::{Euler, Vec3};

/// Pitch correction applied because the assets' modelled forward axis points
/// out of their top face rather than their front face.
pub const FRONT_FACE_PITCH_CORRECTION: f64 = 90.0;

/// Rotation that aims an asset at `from` towards `to`.
///
/// Yaw comes from the horizontal displacement (`atan2(dx, dz)`), pitch from
/// the vertical displacement against the horizontal distance, negated and
/// shifted by [`FRONT_FACE_PITCH_CORRECTION`]. Roll is always zero.
///
/// Coincident points fall back to `atan2(0, 0) == 0`, i.e. yaw 0 and pitch
/// equal to the correction. NaN inputs propagate.
pub fn orient(from: Vec3, to: Vec3) -> Euler {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    let dz = to.z - from.z;

    let yaw = dx.atan2(dz).to_degrees();
    let horizontal = (dx * dx + dz * dz).sqrt();
    let pitch = -dy.atan2(horizontal).to_degrees();

    Euler::new(pitch + FRONT_FACE_PITCH_CORRECTION, yaw, 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn target_straight_ahead() {
        let rotation = orient(Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0));
        assert_approx_eq!(rotation.yaw, 0.0);
        assert_approx_eq!(rotation.pitch, 90.0);
        assert_eq!(rotation.roll, 0.0);
    }

    #[test]
    fn target_to_the_right_and_behind() {
        let right = orient(Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0));
        assert_approx_eq!(right.yaw, 90.0);

        let behind = orient(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        assert_approx_eq!(behind.yaw.abs(), 180.0);
    }

    #[test]
    fn looking_up_reduces_pitch() {
        let rotation = orient(Vec3::ZERO, Vec3::new(0.0, 1.0, 1.0));
        assert_approx_eq!(rotation.pitch, 45.0);

        let down = orient(Vec3::new(0.0, 2.0, 0.0), Vec3::new(0.0, 0.0, 2.0));
        assert_approx_eq!(down.pitch, 135.0);
    }

    #[test]
    fn coincident_points_use_zero_fallback() {
        let point = Vec3::new(3.0, 1.0, -2.0);
        let rotation = orient(point, point);
        assert_eq!(rotation, Euler::new(90.0, 0.0, 0.0));
    }

    #[test]
    fn distinct_points_stay_finite() {
        let rotation = orient(Vec3::new(-4.0, 2.0, 12.0), Vec3::new(0.0, 1.5, 0.0));
        assert!(rotation.yaw.is_finite());
        assert!(rotation.pitch.is_finite());
    }
}
