//! Scalar bound and point type the kernels are generic over.

use nalgebra::{ClosedAddAssign, ClosedMulAssign, ClosedSubAssign, Vector3};
use num_dual::DualNum;

/// Scalar the coupling kernels are generic over: `f64` or a dual number.
pub trait Scalar:
    DualNum<f64> + Copy + nalgebra::Scalar + ClosedAddAssign + ClosedSubAssign + ClosedMulAssign
{
}

impl<T> Scalar for T where
    T: DualNum<f64>
        + Copy
        + nalgebra::Scalar
        + ClosedAddAssign
        + ClosedSubAssign
        + ClosedMulAssign
{
}

pub type Vec3<T> = Vector3<T>;

#[cfg(test)]
mod tests {
    use super::*;
    use num_dual::Dual64;

    fn cross_z<T: Scalar>(a: Vec3<T>, b: Vec3<T>) -> T {
        a.cross(&b)[2]
    }

    #[test]
    fn cross_follows_right_hand_rule() {
        let x = Vec3::new(1.0, 0.0, 0.0);
        let y = Vec3::new(0.0, 1.0, 0.0);
        assert_eq!(x.cross(&y), Vec3::new(0.0, 0.0, 1.0));
        assert_eq!(cross_z(y, x), -1.0);
    }

    #[test]
    fn dual_numbers_flow_through_vector_ops() {
        // d/dt [(t, 0, 0) x (0, 2, 0)]_z = 2
        let a = Vec3::new(Dual64::new(0.5, 1.0), Dual64::from(0.0), Dual64::from(0.0));
        let b = Vec3::new(Dual64::from(0.0), Dual64::from(2.0), Dual64::from(0.0));
        let z = cross_z(a, b);
        assert_eq!(z.re, 1.0);
        assert_eq!(z.eps, 2.0);

        let mid = a.lerp(&b, Dual64::from(0.25));
        assert_eq!(mid[0].eps, 0.75);
    }
}
