//! Nodal and panel fields exchanged between the aerodynamic and structural sides.

use crate::error::{GeometryError, GeometryResult};
use crate::scalar::{Scalar, Vec3};

/// Structural nodal displacements, one row per spanwise node:
/// `(dx, dy, dz, rx, ry, rz)`.
#[derive(Clone, Debug, PartialEq)]
pub struct Displacements<T = f64> {
    rows: Vec<[T; 6]>,
}

impl<T: Copy> Displacements<T> {
    pub fn new(rows: Vec<[T; 6]>) -> Self {
        Self { rows }
    }

    pub fn from_flat(ny: usize, values: &[T]) -> GeometryResult<Self> {
        if values.len() != ny * 6 {
            return Err(GeometryError::ShapeMismatch {
                what: "flattened displacements",
                expected: ny * 6,
                actual: values.len(),
            });
        }
        Ok(Self::new(
            values
                .chunks_exact(6)
                .map(|c| [c[0], c[1], c[2], c[3], c[4], c[5]])
                .collect(),
        ))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[[T; 6]] {
        &self.rows
    }

    pub fn flatten(&self) -> Vec<T> {
        self.rows.iter().flatten().copied().collect()
    }
}

impl<T: Scalar> Displacements<T> {
    pub fn zeros(ny: usize) -> Self {
        Self::new(vec![[T::zero(); 6]; ny])
    }

    /// Same translation at every node, no rotation.
    pub fn rigid_translation(ny: usize, d: impl Into<Vec3<T>>) -> Self {
        let d = d.into();
        let z = T::zero();
        Self::new(vec![[d.x, d.y, d.z, z, z, z]; ny])
    }

    pub fn translation(&self, j: usize) -> Vec3<T> {
        Vec3::from_column_slice(&self.rows[j][..3])
    }

    /// Rotation angles about x, y, z in radians.
    pub fn rotation(&self, j: usize) -> Vec3<T> {
        Vec3::from_column_slice(&self.rows[j][3..])
    }
}

/// Panel-level aerodynamic forces, `chordwise x spanwise` panels of 3-vectors.
#[derive(Clone, Debug, PartialEq)]
pub struct SectionalForces<T = f64> {
    chordwise: usize,
    spanwise: usize,
    forces: Vec<Vec3<T>>,
}

impl<T: Scalar> SectionalForces<T> {
    pub fn new<P: Into<Vec3<T>>>(
        chordwise: usize,
        spanwise: usize,
        forces: Vec<P>,
    ) -> GeometryResult<Self> {
        if forces.len() != chordwise * spanwise {
            return Err(GeometryError::ShapeMismatch {
                what: "sectional forces",
                expected: chordwise * spanwise,
                actual: forces.len(),
            });
        }
        Ok(Self {
            chordwise,
            spanwise,
            forces: forces.into_iter().map(Into::into).collect(),
        })
    }

    /// Build from `nx - 1` chordwise rows of `ny - 1` panel forces.
    pub fn from_rows<P: Into<Vec3<T>>>(rows: Vec<Vec<P>>) -> GeometryResult<Self> {
        let chordwise = rows.len();
        let spanwise = rows.first().map_or(0, Vec::len);
        let mut forces = Vec::with_capacity(chordwise * spanwise);
        for row in rows {
            if row.len() != spanwise {
                return Err(GeometryError::ShapeMismatch {
                    what: "sectional force row length",
                    expected: spanwise,
                    actual: row.len(),
                });
            }
            forces.extend(row.into_iter().map(Into::into));
        }
        Self::new(chordwise, spanwise, forces)
    }

    pub fn from_flat(chordwise: usize, spanwise: usize, values: &[T]) -> GeometryResult<Self> {
        if values.len() != chordwise * spanwise * 3 {
            return Err(GeometryError::ShapeMismatch {
                what: "flattened sectional forces",
                expected: chordwise * spanwise * 3,
                actual: values.len(),
            });
        }
        let forces: Vec<Vec3<T>> = values.chunks_exact(3).map(Vec3::from_column_slice).collect();
        Self::new(chordwise, spanwise, forces)
    }

    pub fn zeros(chordwise: usize, spanwise: usize) -> Self {
        Self {
            chordwise,
            spanwise,
            forces: vec![Vec3::zeros(); chordwise * spanwise],
        }
    }

    /// Forces summed over the chordwise panels of each spanwise strip.
    pub fn chordwise_sum(&self) -> Vec<Vec3<T>> {
        let mut strips = vec![Vec3::zeros(); self.spanwise];
        for (k, f) in self.forces.iter().enumerate() {
            strips[k % self.spanwise] += f;
        }
        strips
    }

    /// Resultant of every panel force.
    pub fn total(&self) -> Vec3<T> {
        self.forces.iter().sum()
    }
}

impl<T: Copy> SectionalForces<T> {
    pub fn chordwise(&self) -> usize {
        self.chordwise
    }

    pub fn spanwise(&self) -> usize {
        self.spanwise
    }

    pub fn flatten(&self) -> Vec<T> {
        self.forces.iter().flat_map(|f| f.iter().copied()).collect()
    }
}

/// Structural nodal loads, one row per spanwise node:
/// `(Fx, Fy, Fz, Mx, My, Mz)`.
#[derive(Clone, Debug, PartialEq)]
pub struct NodalLoads<T = f64> {
    rows: Vec<[T; 6]>,
}

impl<T: Copy> NodalLoads<T> {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[[T; 6]] {
        &self.rows
    }

    pub fn flatten(&self) -> Vec<T> {
        self.rows.iter().flatten().copied().collect()
    }

    pub fn map<U>(&self, f: impl Fn(T) -> U) -> NodalLoads<U> {
        NodalLoads {
            rows: self.rows.iter().map(|r| r.map(&f)).collect(),
        }
    }
}

impl<T: Scalar> NodalLoads<T> {
    pub fn zeros(ny: usize) -> Self {
        Self {
            rows: vec![[T::zero(); 6]; ny],
        }
    }

    pub fn force(&self, j: usize) -> Vec3<T> {
        Vec3::from_column_slice(&self.rows[j][..3])
    }

    pub fn moment(&self, j: usize) -> Vec3<T> {
        Vec3::from_column_slice(&self.rows[j][3..])
    }

    /// Add `weight * force` and `weight * moment` to node `j`.
    pub fn accumulate(&mut self, j: usize, force: &Vec3<T>, moment: &Vec3<T>, weight: f64) {
        let row = &mut self.rows[j];
        for k in 0..3 {
            row[k] += force[k] * weight;
            row[k + 3] += moment[k] * weight;
        }
    }

    pub fn total_force(&self) -> Vec3<T> {
        (0..self.len()).map(|j| self.force(j)).sum()
    }

    /// Sum of the nodal moment columns (no transport of the nodal forces).
    pub fn total_moment(&self) -> Vec3<T> {
        (0..self.len()).map(|j| self.moment(j)).sum()
    }

    /// Resultant moment about `point`, with nodal forces acting at `positions`.
    pub fn moment_about(&self, point: &Vec3<T>, positions: &[Vec3<T>]) -> GeometryResult<Vec3<T>> {
        if positions.len() != self.len() {
            return Err(GeometryError::ShapeMismatch {
                what: "load positions",
                expected: self.len(),
                actual: positions.len(),
            });
        }
        Ok(positions
            .iter()
            .enumerate()
            .map(|(j, pos)| (pos - point).cross(&self.force(j)) + self.moment(j))
            .sum())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(x: f64, y: f64, z: f64) -> Vec3<f64> {
        Vec3::new(x, y, z)
    }

    #[test]
    fn displacement_accessors() {
        let disp = Displacements::new(vec![[1.0, 2.0, 3.0, 0.1, 0.2, 0.3]]);
        assert_eq!(disp.translation(0), v(1.0, 2.0, 3.0));
        assert_eq!(disp.rotation(0), v(0.1, 0.2, 0.3));
        assert_eq!(Displacements::from_flat(1, &disp.flatten()).unwrap(), disp);
        assert!(Displacements::<f64>::from_flat(2, &disp.flatten()).is_err());
    }

    #[test]
    fn chordwise_sum_reduces_strips() {
        let forces = SectionalForces::<f64>::from_rows(vec![
            vec![[1.0, 0.0, 0.0], [0.0, 2.0, 0.0]],
            vec![[3.0, 0.0, 1.0], [0.0, 4.0, 0.5]],
        ])
        .unwrap();
        let strips = forces.chordwise_sum();
        assert_eq!(strips, vec![v(4.0, 0.0, 1.0), v(0.0, 6.0, 0.5)]);
        assert_eq!(forces.total(), v(4.0, 6.0, 1.5));
    }

    #[test]
    fn sectional_force_shape_checked() {
        assert!(matches!(
            SectionalForces::<f64>::new(2, 2, vec![[0.0; 3]; 3]),
            Err(GeometryError::ShapeMismatch {
                expected: 4,
                actual: 3,
                ..
            })
        ));
    }

    #[test]
    fn loads_accumulate_and_total() {
        let mut loads = NodalLoads::zeros(2);
        loads.accumulate(0, &v(0.0, 0.0, 2.0), &v(0.0, 1.0, 0.0), 0.5);
        loads.accumulate(1, &v(0.0, 0.0, 2.0), &v(0.0, 1.0, 0.0), 0.5);
        assert_eq!(loads.force(0), v(0.0, 0.0, 1.0));
        assert_eq!(loads.total_force(), v(0.0, 0.0, 2.0));
        assert_eq!(loads.total_moment(), v(0.0, 1.0, 0.0));
    }

    #[test]
    fn moment_about_transports_forces() {
        let mut loads = NodalLoads::zeros(1);
        loads.accumulate(0, &v(0.0, 0.0, 1.0), &Vec3::zeros(), 1.0);
        let m = loads.moment_about(&Vec3::zeros(), &[v(1.0, 0.0, 0.0)]).unwrap();
        // x-arm crossed with z-force gives a negative y moment
        assert_eq!(m, v(0.0, -1.0, 0.0));
        assert!(loads.moment_about(&Vec3::zeros(), &[]).is_err());
    }
}
