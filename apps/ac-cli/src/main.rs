mod error;
mod report;

use ac_core::Tolerances;
use ac_geometry::SystemLayout;
use ac_project::{CaseFile, SurfaceRecord};
use ac_solver::{CirculationSolver, Partials, SolveMode, check_partials};
use ac_transfer::{DisplacementCase, LoadCase, deform_surfaces, transfer_surface_loads};
use clap::{Parser, Subcommand};
use error::{CliError, CliResult};
use nalgebra::{DMatrix, DVector};
use report::{SolveChecks, SolveReport, SurfaceCirculation, SurfaceLoadsReport};
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Parser)]
#[command(name = "ac-cli")]
#[command(about = "AeroCouple CLI - aerostructural coupling kernels", long_about = None)]
struct Cli {
    /// Print kernel timings on exit (same as AC_TIMING=1)
    #[arg(long, global = true)]
    timing: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate case file syntax and structure
    Validate {
        /// Path to the case file (YAML, or JSON by extension)
        case_path: PathBuf,
    },
    /// List surfaces in a case
    Surfaces {
        /// Path to the case file
        case_path: PathBuf,
    },
    /// Deform each surface and transfer its sectional forces to nodal loads
    Transfer {
        /// Path to the case file
        case_path: PathBuf,
        /// Print loads as JSON
        #[arg(long)]
        json: bool,
    },
    /// Solve the case's circulation system
    Solve {
        /// Path to the case file
        case_path: PathBuf,
        /// Print the solution as JSON
        #[arg(long)]
        json: bool,
        /// Also run adjoint-duality and partial-derivative checks
        #[arg(long)]
        check: bool,
    },
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    if cli.timing {
        ac_core::timing::enable_timing();
    }

    let result = match cli.command {
        Commands::Validate { case_path } => cmd_validate(&case_path),
        Commands::Surfaces { case_path } => cmd_surfaces(&case_path),
        Commands::Transfer { case_path, json } => cmd_transfer(&case_path, json),
        Commands::Solve {
            case_path,
            json,
            check,
        } => cmd_solve(&case_path, json, check),
    };

    ac_core::timing::kernel_timing::print_summary();
    result
}

fn load_case(case_path: &Path) -> CliResult<CaseFile> {
    let case = ac_project::load(case_path)?;
    debug!(name = %case.name, surfaces = case.surfaces.len(), "loaded case");
    Ok(case)
}

fn cmd_validate(case_path: &Path) -> CliResult<()> {
    println!("Validating case: {}", case_path.display());
    let case = load_case(case_path)?;
    ac_project::validate_case(&case)?;
    println!("✓ Case is valid");
    Ok(())
}

fn cmd_surfaces(case_path: &Path) -> CliResult<()> {
    let case = load_case(case_path)?;
    let records = ac_project::surface_records(&case)?;

    println!("Surfaces in case '{}':", case.name);
    for (def, record) in case.surfaces.iter().zip(&records) {
        let spec = &record.spec;
        println!(
            "  {} - {} (nx={}, ny={}, {} panels, fem_origin={:.3})",
            def.id,
            spec.name,
            spec.nx(),
            spec.ny(),
            spec.num_panels(),
            spec.fem_origin().value()
        );
    }
    let specs: Vec<_> = records.iter().map(|r| r.spec.clone()).collect();
    println!(
        "System size: {}",
        SystemLayout::from_surfaces(&specs).system_size()
    );
    Ok(())
}

fn cmd_transfer(case_path: &Path, json: bool) -> CliResult<()> {
    let case = load_case(case_path)?;
    let records = ac_project::surface_records(&case)?;

    let displacement_cases: Vec<_> = records
        .iter()
        .map(|r| DisplacementCase {
            spec: &r.spec,
            mesh: &r.mesh,
            displacements: &r.displacements,
        })
        .collect();
    let deformed = deform_surfaces(&displacement_cases)?;

    let load_cases: Vec<_> = records
        .iter()
        .zip(&deformed)
        .map(|(r, mesh)| LoadCase {
            spec: &r.spec,
            deformed_mesh: mesh,
            sectional_forces: &r.sectional_forces,
        })
        .collect();
    let loads = transfer_surface_loads(&load_cases)?;

    let reports: Vec<_> = case
        .surfaces
        .iter()
        .zip(&loads)
        .map(|(def, l)| SurfaceLoadsReport::new(&def.id, &def.name, l))
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
        return Ok(());
    }

    for report in &reports {
        println!("\nSurface '{}' ({}):", report.id, report.name);
        println!(
            "  {:>4} {:>12} {:>12} {:>12} {:>12} {:>12} {:>12}",
            "node", "Fx", "Fy", "Fz", "Mx", "My", "Mz"
        );
        for (j, row) in report.nodal_loads.iter().enumerate() {
            println!(
                "  {:>4} {:>12.5e} {:>12.5e} {:>12.5e} {:>12.5e} {:>12.5e} {:>12.5e}",
                j, row[0], row[1], row[2], row[3], row[4], row[5]
            );
        }
        let [fx, fy, fz] = report.total_force;
        println!("  Total force: ({:.6}, {:.6}, {:.6})", fx, fy, fz);
    }
    Ok(())
}

fn cmd_solve(case_path: &Path, json: bool, check: bool) -> CliResult<()> {
    let case = load_case(case_path)?;
    let records = ac_project::surface_records(&case)?;
    let specs: Vec<_> = records.iter().map(|r| r.spec.clone()).collect();
    let layout = SystemLayout::from_surfaces(&specs);

    let (m, b) =
        ac_project::linear_system(&case, layout.system_size())?.ok_or(CliError::NoSystem)?;

    let mut solver = CirculationSolver::for_surfaces(&specs, ac_project::solver_config(&case))?;
    let circulations = solver.solve(&m, &b)?;
    let residual_norm = solver.residual(&m, &circulations, &b)?.norm();

    let checks = if check {
        let partials = solver.linearize(&m, &circulations)?;
        Some(run_checks(&solver, &m, &b, &circulations, &partials)?)
    } else {
        None
    };

    let report = SolveReport {
        system_size: layout.system_size(),
        residual_norm,
        surfaces: split_by_surface(&case, &records, &layout, &circulations)?,
        checks,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("✓ Solved {} circulations", report.system_size);
    println!("  Residual norm: {:.3e}", report.residual_norm);
    for surface in &report.surfaces {
        println!("  {}: {:?}", surface.id, surface.circulations);
    }
    if let Some(c) = &report.checks {
        println!("\nChecks:");
        println!("  Adjoint duality gap: {:.3e}", c.adjoint_gap);
        println!("  Partials max error:  {:.3e}", c.partials_max_error);
        println!("  Factorizations:      {}", c.factorizations);
        println!("  {}", if c.passed { "✓ Checks passed" } else { "✗ Checks failed" });
    }
    Ok(())
}

fn split_by_surface(
    case: &CaseFile,
    records: &[SurfaceRecord],
    layout: &SystemLayout,
    circulations: &DVector<f64>,
) -> CliResult<Vec<SurfaceCirculation>> {
    let mut out = Vec::with_capacity(records.len());
    for (def, record) in case.surfaces.iter().zip(records) {
        let block = layout
            .surface_slice(record.spec.id, circulations.as_slice())
            .map_err(ac_solver::SolverError::from)?;
        out.push(SurfaceCirculation {
            id: def.id.clone(),
            circulations: block.to_vec(),
        });
    }
    Ok(out)
}

fn run_checks(
    solver: &CirculationSolver,
    m: &DMatrix<f64>,
    b: &DVector<f64>,
    circulations: &DVector<f64>,
    partials: &Partials,
) -> CliResult<SolveChecks> {
    let n = solver.system_size();
    let s = DVector::from_fn(n, |i, _| 1.0 + i as f64);
    let t = DVector::from_fn(n, |i, _| if i % 2 == 0 { 1.0 } else { -0.5 });

    let forward = solver.solve_linear(&s, SolveMode::Forward)?;
    let reverse = solver.solve_linear(&t, SolveMode::Reverse)?;
    let adjoint_gap = (forward.dot(&t) - s.dot(&reverse)).abs();

    let partials_max_error = check_partials(m, circulations, b, partials, 1e-6)?.max_error();

    let adjoint_ok = Tolerances::default().within(adjoint_gap, forward.dot(&t).abs());
    let partials_tol = Tolerances {
        abs: 1e-6,
        rel: 1e-6,
    };
    let partials_ok = partials_tol.within(partials_max_error, m.amax().max(circulations.amax()));

    Ok(SolveChecks {
        adjoint_gap,
        partials_max_error,
        factorizations: solver.factorization_count(),
        passed: adjoint_ok && partials_ok,
    })
}
