//! Serializable command outputs for `--json`.

use ac_geometry::NodalLoads;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct SurfaceLoadsReport {
    pub id: String,
    pub name: String,
    /// One `(Fx, Fy, Fz, Mx, My, Mz)` row per structural node
    pub nodal_loads: Vec<[f64; 6]>,
    pub total_force: [f64; 3],
    pub total_moment: [f64; 3],
}

impl SurfaceLoadsReport {
    pub fn new(id: &str, name: &str, loads: &NodalLoads) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            nodal_loads: loads.rows().to_vec(),
            total_force: loads.total_force().into(),
            total_moment: loads.total_moment().into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SurfaceCirculation {
    pub id: String,
    pub circulations: Vec<f64>,
}

#[derive(Debug, Serialize)]
pub struct SolveReport {
    pub system_size: usize,
    pub residual_norm: f64,
    pub surfaces: Vec<SurfaceCirculation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checks: Option<SolveChecks>,
}

#[derive(Debug, Serialize)]
pub struct SolveChecks {
    /// `|<M⁻¹ s, t> - <s, M⁻ᵀ t>|` for unit seeds
    pub adjoint_gap: f64,
    pub partials_max_error: f64,
    pub factorizations: usize,
    pub passed: bool,
}
