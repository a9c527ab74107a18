// resolve.rs — The `chainspect resolve` command.
//
// Reads the discovered snapshot and the overrides catalogue, runs the
// chosen backend, and writes the resolved document atomically. The
// solver backend shells out to an external solver binary, feeding the
// fact program on stdin and reading the answer set from stdout.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use anyhow::{bail, Context, Result};
use clap::{Args, ValueEnum};

use cs_engine::resolve_permissions;
use cs_solver::{resolve_with_solver, LogicSolver, SolverError};
use cs_store::{DiscoveredStore, OverridesStore, ResolvedStore};

#[derive(Args)]
pub struct ResolveArgs {
    /// Which backend computes ultimate owners.
    #[arg(long, value_enum, default_value = "traversal")]
    pub backend: Backend,

    /// External solver binary (required with `--backend solver`).
    #[arg(long)]
    pub solver_cmd: Option<PathBuf>,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Backend {
    Traversal,
    Solver,
}

/// A solver reached over a child process: program on stdin, answer
/// set on stdout.
struct CommandSolver {
    command: PathBuf,
}

impl LogicSolver for CommandSolver {
    fn solve(&self, program: &str) -> Result<String, SolverError> {
        let mut child = Command::new(&self.command)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .spawn()
            .map_err(|e| SolverError::SolverFailed(format!("spawn failed: {}", e)))?;

        // Take stdin so the pipe closes once the program is written.
        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(program.as_bytes())
                .map_err(|e| SolverError::SolverFailed(format!("write failed: {}", e)))?;
        }

        let output = child
            .wait_with_output()
            .map_err(|e| SolverError::SolverFailed(format!("wait failed: {}", e)))?;
        if !output.status.success() {
            return Err(SolverError::SolverFailed(format!(
                "solver exited with {}",
                output.status
            )));
        }
        String::from_utf8(output.stdout)
            .map_err(|_| SolverError::SolverFailed("non-UTF-8 solver output".to_string()))
    }
}

pub fn run(project_root: &Path, args: &ResolveArgs) -> Result<()> {
    let overrides = OverridesStore::new(project_root)
        .load()
        .context("loading permission overrides")?;
    let snapshot = DiscoveredStore::new(project_root)
        .load()
        .context("loading discovered snapshot")?;

    let resolved = match args.backend {
        Backend::Traversal => resolve_permissions(&overrides, &snapshot),
        Backend::Solver => {
            let Some(command) = &args.solver_cmd else {
                bail!("--backend solver requires --solver-cmd");
            };
            let solver = CommandSolver {
                command: command.clone(),
            };
            resolve_with_solver(&overrides, &snapshot, &solver)
                .context("resolving through external solver")?
        }
    };

    ResolvedStore::new(project_root)
        .save(&resolved)
        .context("writing resolved permissions")?;

    let functions: usize = resolved.contracts.values().map(|c| c.functions.len()).sum();
    let warnings: usize = resolved
        .contracts
        .values()
        .flat_map(|c| &c.functions)
        .map(|f| f.warnings.len())
        .sum();
    println!(
        "Resolved {} function(s) across {} contract(s), {} warning(s).",
        functions,
        resolved.contracts.len(),
        warnings
    );
    Ok(())
}
