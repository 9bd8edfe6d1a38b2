use anyhow::Result;
use clap::Args;
use std::process::ExitCode;

use crate::algorithms::fib;
use crate::cli::Output;
use crate::config::BenchConfig;
use crate::timer::Stopwatch;

#[derive(Args)]
pub struct FibArgs {
    /// Index of the Fibonacci number to compute
    #[arg(value_name = "N", allow_negative_numbers = true)]
    pub n: Option<String>,
}

pub fn execute(args: FibArgs, config: &BenchConfig, output: &Output) -> Result<ExitCode> {
    let n = super::size_or_default(args.n.as_deref(), config.fib.default_n, output);
    let rt = super::build_runtime(config)?;

    let mut watch = Stopwatch::new();
    watch.start();
    let result = rt.run(|| fib(&rt, n))?;
    watch.stop();
    watch.measure()?;

    println!("fib({}) = {}", n, result);
    println!("{}", watch.report("fib"));

    tracing::info!("fib({}) finished on {}", n, rt.strategy());
    Ok(ExitCode::SUCCESS)
}
