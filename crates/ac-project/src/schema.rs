//! Case file schema definitions.

use serde::{Deserialize, Serialize};

/// Newest case file version this crate reads and writes.
pub const LATEST_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CaseFile {
    pub version: u32,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solver: Option<SolverDef>,
    #[serde(default)]
    pub surfaces: Vec<SurfaceDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<LinearSystemDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SolverDef {
    #[serde(default = "default_pivot_tolerance")]
    pub pivot_tolerance: f64,
}

fn default_pivot_tolerance() -> f64 {
    ac_solver::SolverConfig::default().pivot_tolerance
}

impl Default for SolverDef {
    fn default() -> Self {
        Self {
            pivot_tolerance: default_pivot_tolerance(),
        }
    }
}

/// One lifting surface. Fields left out of the file default to zero.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SurfaceDef {
    pub id: String,
    pub name: String,
    pub fem_origin: f64,
    /// `nx` chordwise rows of `ny` corner points
    pub mesh: Vec<Vec<[f64; 3]>>,
    /// `ny` rows of `(dx, dy, dz, rx, ry, rz)`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub displacements: Option<Vec<[f64; 6]>>,
    /// `nx - 1` chordwise rows of `ny - 1` panel forces
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sectional_forces: Option<Vec<Vec<[f64; 3]>>>,
}

impl SurfaceDef {
    pub fn nx(&self) -> usize {
        self.mesh.len()
    }

    pub fn ny(&self) -> usize {
        self.mesh.first().map_or(0, Vec::len)
    }
}

/// Influence matrix (row-major rows) and right-hand side of the circulation system.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LinearSystemDef {
    pub matrix: Vec<Vec<f64>>,
    pub rhs: Vec<f64>,
}
