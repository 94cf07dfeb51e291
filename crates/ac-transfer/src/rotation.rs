//! Additive small-rotation transform used by the displacement transfer.
//!
//! The three single-axis 2x2 rotation blocks are summed into a 3x3 frame and
//! `-2 I` is added. This is not the product of the three rotations: at zero
//! angles the transform vanishes, so `s · T` is the rotational displacement
//! of a point `s` about the reference line rather than its rotated position.
//! The approximation is only meaningful for small angles. Derivatives
//! elsewhere are taken around this exact form, so it must not be replaced by
//! a true rotation matrix.

use ac_geometry::{Scalar, Vec3};
use nalgebra::Matrix3;

/// Transform for rotation angles `(rx, ry, rz)` in radians.
pub fn small_rotation_transform<T: Scalar>(rotation: &Vec3<T>) -> Matrix3<T> {
    let (sx, cx) = (rotation[0].sin(), rotation[0].cos());
    let (sy, cy) = (rotation[1].sin(), rotation[1].cos());
    let (sz, cz) = (rotation[2].sin(), rotation[2].cos());
    let two = T::from(2.0);

    // x block on (y, z), y block on (x, z), z block on (x, y)
    #[rustfmt::skip]
    let t = Matrix3::new(
        cy + cz - two, -sz,           sy,
        sz,            cx + cz - two, -sx,
        -sy,           sx,            cx + cy - two,
    );
    t
}

/// Row vector times matrix: `s · T`.
pub fn apply_to_row<T: Scalar>(s: &Vec3<T>, t: &Matrix3<T>) -> Vec3<T> {
    (s.transpose() * t).transpose()
}
