//! Corner-point meshes of a lifting surface.

use crate::error::{GeometryError, GeometryResult};
use crate::scalar::{Scalar, Vec3};
use crate::surface::FemOrigin;
use ac_core::first_non_finite;
use std::ops::{Index, IndexMut};

/// Ordered grid of corner points, `nx` chordwise by `ny` spanwise.
///
/// Points are stored chordwise-major: `(i, j)` lives at `i * ny + j`.
#[derive(Clone, Debug, PartialEq)]
pub struct SurfaceMesh<T = f64> {
    nx: usize,
    ny: usize,
    points: Vec<Vec3<T>>,
}

impl<T: Scalar> SurfaceMesh<T> {
    pub fn from_points<P: Into<Vec3<T>>>(nx: usize, ny: usize, points: Vec<P>) -> GeometryResult<Self> {
        if nx < 2 {
            return Err(GeometryError::Degenerate {
                what: "chordwise mesh",
                count: nx,
            });
        }
        if ny < 2 {
            return Err(GeometryError::Degenerate {
                what: "spanwise mesh",
                count: ny,
            });
        }
        if points.len() != nx * ny {
            return Err(GeometryError::ShapeMismatch {
                what: "mesh points",
                expected: nx * ny,
                actual: points.len(),
            });
        }
        Ok(Self {
            nx,
            ny,
            points: points.into_iter().map(Into::into).collect(),
        })
    }

    /// Build from `nx` chordwise rows of `ny` points each.
    pub fn from_rows<P: Into<Vec3<T>>>(rows: Vec<Vec<P>>) -> GeometryResult<Self> {
        let nx = rows.len();
        let ny = rows.first().map_or(0, Vec::len);
        let mut points = Vec::with_capacity(nx * ny);
        for row in rows {
            if row.len() != ny {
                return Err(GeometryError::ShapeMismatch {
                    what: "mesh row length",
                    expected: ny,
                    actual: row.len(),
                });
            }
            points.extend(row.into_iter().map(Into::into));
        }
        Self::from_points(nx, ny, points)
    }

    /// Rebuild from a flat `nx * ny * 3` slice in row-major order.
    pub fn from_flat(nx: usize, ny: usize, values: &[T]) -> GeometryResult<Self> {
        if values.len() != nx * ny * 3 {
            return Err(GeometryError::ShapeMismatch {
                what: "flattened mesh",
                expected: nx * ny * 3,
                actual: values.len(),
            });
        }
        let points: Vec<Vec3<T>> = values.chunks_exact(3).map(Vec3::from_column_slice).collect();
        Self::from_points(nx, ny, points)
    }
}

impl<T: Copy> SurfaceMesh<T> {
    pub fn nx(&self) -> usize {
        self.nx
    }

    pub fn ny(&self) -> usize {
        self.ny
    }

    pub fn points(&self) -> &[Vec3<T>] {
        &self.points
    }

    pub fn flatten(&self) -> Vec<T> {
        self.points.iter().flat_map(|p| p.iter().copied()).collect()
    }
}

impl<T: Scalar> SurfaceMesh<T> {
    /// Structural reference line, one point per spanwise station:
    /// `(1 - w) * mesh[0, j] + w * mesh[nx - 1, j]`.
    pub fn reference_curve(&self, fem_origin: FemOrigin) -> Vec<Vec3<T>> {
        let w = fem_origin.value();
        let last = self.nx - 1;
        (0..self.ny)
            .map(|j| self[(0, j)].lerp(&self[(last, j)], T::from(w)))
            .collect()
    }

    /// Coordinates of every point relative to its station's reference point.
    pub fn local_coordinates(&self, fem_origin: FemOrigin) -> SurfaceMesh<T> {
        let reference = self.reference_curve(fem_origin);
        let ny = self.ny;
        SurfaceMesh {
            nx: self.nx,
            ny,
            points: self
                .points
                .iter()
                .enumerate()
                .map(|(k, p)| p - reference[k % ny])
                .collect(),
        }
    }

    /// Bilinear point inside each leading-row panel, at chordwise fraction `w`
    /// and spanwise midpoint. Returns `ny - 1` points.
    pub fn leading_panel_points(&self, w: f64) -> Vec<Vec3<T>> {
        let w = T::from(w);
        let half = T::from(0.5);
        (0..self.ny - 1)
            .map(|j| {
                let inboard = self[(0, j)].lerp(&self[(1, j)], w);
                let outboard = self[(0, j + 1)].lerp(&self[(1, j + 1)], w);
                (inboard + outboard) * half
            })
            .collect()
    }
}

impl SurfaceMesh<f64> {
    pub fn ensure_finite(&self) -> GeometryResult<()> {
        match first_non_finite(&self.flatten()) {
            Some(_) => Err(GeometryError::NonFinite { what: "mesh" }),
            None => Ok(()),
        }
    }
}

impl<T> Index<(usize, usize)> for SurfaceMesh<T> {
    type Output = Vec3<T>;

    fn index(&self, (i, j): (usize, usize)) -> &Vec3<T> {
        &self.points[i * self.ny + j]
    }
}

impl<T> IndexMut<(usize, usize)> for SurfaceMesh<T> {
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut Vec3<T> {
        &mut self.points[i * self.ny + j]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Unit-chord flat plate, chord along x, span along y.
    fn plate(nx: usize, ny: usize) -> SurfaceMesh {
        let rows = (0..nx)
            .map(|i| {
                let x = i as f64 / (nx - 1) as f64;
                (0..ny).map(|j| [x, j as f64, 0.0]).collect()
            })
            .collect();
        SurfaceMesh::from_rows(rows).unwrap()
    }

    #[test]
    fn rejects_ragged_rows() {
        let rows = vec![
            vec![[0.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            vec![[1.0, 0.0, 0.0]],
        ];
        assert!(matches!(
            SurfaceMesh::<f64>::from_rows(rows),
            Err(GeometryError::ShapeMismatch {
                expected: 2,
                actual: 1,
                ..
            })
        ));
    }

    #[test]
    fn flat_round_trip() {
        let mesh = plate(3, 4);
        let flat = mesh.flatten();
        assert_eq!(flat.len(), 36);
        assert_eq!(SurfaceMesh::from_flat(3, 4, &flat).unwrap(), mesh);
    }

    #[test]
    fn reference_curve_sits_at_fem_origin() {
        let mesh = plate(3, 2);
        let reference = mesh.reference_curve(FemOrigin::new(0.35).unwrap());
        assert_eq!(reference.len(), 2);
        assert!((reference[0][0] - 0.35).abs() < 1e-15);
        assert_eq!(reference[1][1], 1.0);
    }

    #[test]
    fn local_coordinates_are_relative_to_reference() {
        let mesh = plate(2, 3);
        let local = mesh.local_coordinates(FemOrigin::new(0.25).unwrap());
        assert!((local[(0, 1)][0] + 0.25).abs() < 1e-15);
        assert!((local[(1, 1)][0] - 0.75).abs() < 1e-15);
        assert_eq!(local[(1, 2)][1], 0.0);
    }

    #[test]
    fn leading_panel_points_bilinear() {
        let mesh = plate(3, 3);
        let pts = mesh.leading_panel_points(0.25);
        assert_eq!(pts.len(), 2);
        // leading row spans x in [0, 0.5]
        assert!((pts[0][0] - 0.125).abs() < 1e-15);
        assert!((pts[1][1] - 1.5).abs() < 1e-15);
    }

    #[test]
    fn non_finite_detected() {
        let mut mesh = plate(2, 2);
        assert!(mesh.ensure_finite().is_ok());
        mesh[(1, 1)][2] = f64::INFINITY;
        assert_eq!(
            mesh.ensure_finite(),
            Err(GeometryError::NonFinite { what: "mesh" })
        );
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn mesh() -> impl Strategy<Value = SurfaceMesh> {
        (2_usize..5, 2_usize..5).prop_flat_map(|(nx, ny)| {
            prop::collection::vec(prop::array::uniform3(-10.0_f64..10.0), nx * ny)
                .prop_map(move |points| SurfaceMesh::<f64>::from_points(nx, ny, points).unwrap())
        })
    }

    proptest! {
        #[test]
        fn local_plus_reference_restores_mesh(m in mesh(), w in 0.0_f64..=1.0) {
            let fem = FemOrigin::new(w).unwrap();
            let reference = m.reference_curve(fem);
            let local = m.local_coordinates(fem);
            for i in 0..m.nx() {
                for j in 0..m.ny() {
                    let back = local[(i, j)] + reference[j];
                    for c in 0..3 {
                        prop_assert!((back[c] - m[(i, j)][c]).abs() < 1e-12);
                    }
                }
            }
        }

        #[test]
        fn panel_points_at_edges_average_corners(m in mesh()) {
            let leading = m.leading_panel_points(0.0);
            for (j, p) in leading.iter().enumerate() {
                let mid = (m[(0, j)] + m[(0, j + 1)]) * 0.5;
                for c in 0..3 {
                    prop_assert!((p[c] - mid[c]).abs() < 1e-12);
                }
            }
        }
    }
}
