//! Panel ordering across lifting surfaces.
//!
//! The circulation system stacks every surface's panels one after another in
//! surface order. `SystemLayout` records where each surface's block starts so
//! the global vector can be routed back to its surfaces.

use crate::error::{GeometryError, GeometryResult};
use crate::surface::SurfaceSpec;
use ac_core::SurfaceId;
use std::ops::Range;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SystemLayout {
    ids: Vec<SurfaceId>,
    offsets: Vec<usize>,
    system_size: usize,
}

impl SystemLayout {
    pub fn from_surfaces(surfaces: &[SurfaceSpec]) -> Self {
        let mut offsets = Vec::with_capacity(surfaces.len());
        let mut system_size = 0;
        for surface in surfaces {
            offsets.push(system_size);
            system_size += surface.num_panels();
        }
        Self {
            ids: surfaces.iter().map(|s| s.id).collect(),
            offsets,
            system_size,
        }
    }

    /// `Σ (nx - 1)(ny - 1)` over all surfaces.
    pub fn system_size(&self) -> usize {
        self.system_size
    }

    pub fn surface_count(&self) -> usize {
        self.ids.len()
    }

    /// Range of the global vector owned by `id`.
    pub fn surface_range(&self, id: SurfaceId) -> Option<Range<usize>> {
        let k = self.ids.iter().position(|&s| s == id)?;
        let end = self
            .offsets
            .get(k + 1)
            .copied()
            .unwrap_or(self.system_size);
        Some(self.offsets[k]..end)
    }

    pub fn surface_slice<'a>(&self, id: SurfaceId, values: &'a [f64]) -> GeometryResult<&'a [f64]> {
        self.check_len(values)?;
        let range = self.surface_range(id).ok_or(GeometryError::ShapeMismatch {
            what: "surface id within layout",
            expected: self.surface_count(),
            actual: id.index() as usize,
        })?;
        Ok(&values[range])
    }

    /// Split a global vector into per-surface blocks, in surface order.
    pub fn split<'a>(&self, values: &'a [f64]) -> GeometryResult<Vec<(SurfaceId, &'a [f64])>> {
        self.check_len(values)?;
        Ok(self
            .ids
            .iter()
            .enumerate()
            .map(|(k, &id)| {
                let end = self
                    .offsets
                    .get(k + 1)
                    .copied()
                    .unwrap_or(self.system_size);
                (id, &values[self.offsets[k]..end])
            })
            .collect())
    }

    fn check_len(&self, values: &[f64]) -> GeometryResult<()> {
        if values.len() == self.system_size {
            Ok(())
        } else {
            Err(GeometryError::ShapeMismatch {
                what: "system vector",
                expected: self.system_size,
                actual: values.len(),
            })
        }
    }
}
