use anyhow::Result;
use clap::Args;
use std::process::ExitCode;

use crate::algorithms::{count_solutions, known_solution_count};
use crate::cli::Output;
use crate::config::BenchConfig;
use crate::timer::Stopwatch;

#[derive(Args)]
pub struct NqueensArgs {
    /// Board size
    #[arg(value_name = "N", allow_negative_numbers = true)]
    pub n: Option<String>,
}

pub fn execute(args: NqueensArgs, config: &BenchConfig, output: &Output) -> Result<ExitCode> {
    let default_n = config.nqueens.default_n;
    let n = match args.n.as_deref() {
        None => {
            let n = board_size(default_n, default_n, output);
            output.note("Usage: forkbench nqueens [N]");
            output.note(&format!("Use default board size, n = {}.", n));
            n
        }
        Some(raw) => {
            let requested = super::size_or_default(Some(raw), default_n, output);
            let n = board_size(requested, default_n, output);
            output.note(&format!("Running nqueens with n = {}.", n));
            n
        }
    };

    let rt = super::build_runtime(config)?;

    let mut watch = Stopwatch::measuring_on_stop();
    watch.start();
    let solutions = rt.run(|| count_solutions(&rt, n))?;
    watch.stop();

    // Millisecond resolution, printed in seconds
    let millis = watch.elapsed().unwrap_or_default().as_millis();
    println!("{:.6}", millis as f64 / 1000.0);

    if solutions == 0 {
        output.note("No solution found.");
    } else {
        output.note(&format!("Total number of solutions : {}", solutions));
    }

    match known_solution_count(n) {
        Some(expected) if expected != solutions => {
            output.error(&format!(
                "Expected {} solutions for n = {}, counted {}",
                expected, n, solutions
            ));
            Ok(ExitCode::FAILURE)
        }
        Some(_) => {
            tracing::debug!("Solution count for n = {} matches the reference", n);
            Ok(ExitCode::SUCCESS)
        }
        None => {
            output.verbose(&format!("No reference count for n = {}", n));
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Board size to run; negative sizes fall back to the default
fn board_size(requested: i64, default_n: i64, output: &Output) -> usize {
    match usize::try_from(requested) {
        Ok(n) => n,
        Err(_) => {
            output.warning(&format!(
                "Board size must not be negative, using default {}",
                default_n
            ));
            usize::try_from(default_n).unwrap_or_default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_size() {
        let output = Output::new(false, true);
        assert_eq!(board_size(8, 13, &output), 8);
        assert_eq!(board_size(0, 13, &output), 0);
        assert_eq!(board_size(-3, 13, &output), 13);
        assert_eq!(board_size(-3, -1, &output), 0);
    }
}
