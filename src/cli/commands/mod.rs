use anyhow::Result;
use clap::{Parser, Subcommand};
use std::process::ExitCode;

use crate::cli::Output;
use crate::config::BenchConfig;
use crate::parallel::{Runtime, StrategyKind};

pub mod config;
pub mod fib;
pub mod nqueens;
pub mod qsort;

/// Exit status of the classic harnesses' `exit(-1)`
pub(crate) const EXIT_ABORT: u8 = 255;

#[derive(Parser)]
#[command(
    name = "forkbench",
    version = env!("CARGO_PKG_VERSION"),
    about = "Fork-join parallel benchmarks: fib, nqueens and quicksort",
    long_about = "forkbench runs recursive divide-and-conquer benchmarks on a structured \
                  fork-join runtime, with sequential, work-stealing and thread-per-spawn executors."
)]
pub struct Cli {
    /// Executor to run the task tree on (overrides configuration)
    #[arg(long, value_enum, global = true)]
    pub strategy: Option<StrategyKind>,

    /// Maximum worker threads, 0 = derive from cores (overrides configuration)
    #[arg(short = 'j', long = "threads", value_name = "N", global = true)]
    pub threads: Option<usize>,

    /// Use custom configuration file
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<String>,

    /// Increase verbosity (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compute a Fibonacci number by recursive doubling
    Fib(fib::FibArgs),
    /// Count the solutions of the n-queens problem
    Nqueens(nqueens::NqueensArgs),
    /// Sort pseudorandom integers with parallel quicksort
    Qsort(qsort::QsortArgs),
    /// Configuration management
    Config(config::ConfigArgs),
}

impl Cli {
    pub fn run(self) -> Result<ExitCode> {
        setup_logging(self.verbose, self.quiet);

        let output = Output::new(self.verbose > 0, self.quiet);
        let config = self.effective_config()?;

        match self.command {
            Commands::Fib(args) => fib::execute(args, &config, &output),
            Commands::Nqueens(args) => nqueens::execute(args, &config, &output),
            Commands::Qsort(args) => qsort::execute(args, &config, &output),
            Commands::Config(args) => config::execute(args, &config),
        }
    }

    /// Layered configuration with the global flags applied last
    fn effective_config(&self) -> Result<BenchConfig> {
        let mut config = BenchConfig::load_with_custom_config(self.config.as_deref())?;
        if let Some(strategy) = self.strategy {
            config.runtime.strategy = strategy;
        }
        if let Some(threads) = self.threads {
            config.runtime.max_threads = threads;
        }
        Ok(config)
    }
}

/// Build the runtime every benchmark command runs on
pub(crate) fn build_runtime(config: &BenchConfig) -> Result<Runtime> {
    let strategy = config.runtime.execution_strategy();
    tracing::info!("Using {} executor", strategy);
    Runtime::with_stack_size(strategy, config.runtime.stack_size())
}

/// Parse an optional size argument, substituting `default` when it is not an integer
pub(crate) fn size_or_default(raw: Option<&str>, default: i64, output: &Output) -> i64 {
    let Some(raw) = raw else {
        return default;
    };
    match raw.trim().parse::<i64>() {
        Ok(n) => n,
        Err(_) => {
            output.warning(&format!("Invalid size '{}', using default {}", raw, default));
            default
        }
    }
}

fn setup_logging(verbose: u8, quiet: bool) {
    if quiet {
        return;
    }

    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        match verbose {
            0 => tracing_subscriber::EnvFilter::new("warn"),
            1 => tracing_subscriber::EnvFilter::new("info"),
            2 => tracing_subscriber::EnvFilter::new("debug"),
            _ => tracing_subscriber::EnvFilter::new("trace"),
        }
    });

    // stdout is reserved for benchmark results
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["forkbench", "fib", "12", "--strategy", "threads", "-j", "3", "-vv"]);
        assert_eq!(cli.strategy, Some(StrategyKind::Threads));
        assert_eq!(cli.threads, Some(3));
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Commands::Fib(_)));
    }

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::parse_from([
            "forkbench",
            "--config",
            "does-not-exist.toml",
            "--strategy",
            "sequential",
            "-j",
            "2",
            "config",
            "show",
        ]);
        let config = cli.effective_config().unwrap();
        assert_eq!(config.runtime.strategy, StrategyKind::Sequential);
        assert_eq!(config.runtime.max_threads, 2);
    }

    #[test]
    fn test_size_or_default() {
        let output = Output::new(false, true);
        assert_eq!(size_or_default(None, 13, &output), 13);
        assert_eq!(size_or_default(Some("8"), 13, &output), 8);
        assert_eq!(size_or_default(Some(" 8 "), 13, &output), 8);
        assert_eq!(size_or_default(Some("-4"), 13, &output), -4);
        assert_eq!(size_or_default(Some("eight"), 13, &output), 13);
        assert_eq!(size_or_default(Some("8x"), 13, &output), 13);
    }
}
