use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Case error: {0}")]
    Project(#[from] ac_project::ProjectError),

    #[error("Case validation failed: {0}")]
    Validation(#[from] ac_project::ValidationError),

    #[error("Solver error: {0}")]
    Solver(#[from] ac_solver::SolverError),

    #[error("Transfer error: {0}")]
    Transfer(#[from] ac_transfer::TransferError),

    #[error("Case has no linear system to solve")]
    NoSystem,

    #[error("JSON output failed: {0}")]
    Json(#[from] serde_json::Error),
}

pub type CliResult<T> = Result<T, CliError>;
