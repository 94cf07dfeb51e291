//! Error types for field transfers.

use ac_core::{AcError, SurfaceId};
use ac_geometry::GeometryError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransferError {
    #[error("Geometry error: {0}")]
    Geometry(#[from] GeometryError),

    #[error("Surface {surface}: {source}")]
    InSurface {
        surface: SurfaceId,
        source: GeometryError,
    },
}

pub type TransferResult<T> = Result<T, TransferError>;

impl TransferError {
    /// Tag a geometry failure with the surface it came from.
    pub fn in_surface(self, surface: SurfaceId) -> Self {
        match self {
            TransferError::Geometry(source) => TransferError::InSurface { surface, source },
            tagged => tagged,
        }
    }

    pub fn geometry(&self) -> &GeometryError {
        match self {
            TransferError::Geometry(source) | TransferError::InSurface { source, .. } => source,
        }
    }
}

impl From<TransferError> for AcError {
    fn from(e: TransferError) -> Self {
        e.geometry().clone().into()
    }
}
