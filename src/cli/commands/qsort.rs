use anyhow::Result;
use clap::Args;
use std::process::ExitCode;

use super::EXIT_ABORT;
use crate::algorithms::{count_descents, quicksort, seeded_input};
use crate::cli::Output;
use crate::config::BenchConfig;
use crate::timer::Stopwatch;

#[derive(Args)]
pub struct QsortArgs {
    /// Number of integers to sort
    #[arg(value_name = "N", allow_negative_numbers = true)]
    pub n: Option<String>,

    /// Time the sorts; raises the default size
    #[arg(long)]
    pub timed: bool,

    /// Number of times to sort the same input (overrides configuration)
    #[arg(long, value_name = "T")]
    pub trials: Option<u32>,

    /// Seed for the pseudorandom input (overrides configuration)
    #[arg(long, value_name = "S")]
    pub seed: Option<u32>,
}

pub fn execute(args: QsortArgs, config: &BenchConfig, output: &Output) -> Result<ExitCode> {
    let default_n = if args.timed {
        config.qsort.timed_default_n
    } else {
        config.qsort.default_n
    };
    let n = super::size_or_default(args.n.as_deref(), default_n, output);
    println!("Sorting {} integers", n);

    if n < 1 {
        output.error("array length must be positive");
        return Ok(ExitCode::from(EXIT_ABORT));
    }
    let Ok(len) = usize::try_from(n) else {
        output.error("array allocation failed");
        return Ok(ExitCode::from(EXIT_ABORT));
    };

    let seed = args.seed.unwrap_or(config.qsort.seed);
    let trials = args.trials.unwrap_or(config.qsort.trials).max(1);
    let rt = super::build_runtime(config)?;

    let mut watch = Stopwatch::new();
    watch.reset();
    let mut fail_count: u32 = 0;

    for trial in 0..trials {
        let mut data = match seeded_input(len, seed) {
            Ok(data) => data,
            Err(err) => {
                tracing::debug!("{:#}", err);
                output.error("array allocation failed");
                return Ok(ExitCode::from(EXIT_ABORT));
            }
        };

        watch.start();
        rt.run(|| quicksort(&rt, &mut data))?;
        watch.stop();
        watch.lap()?;

        let descents = count_descents(&data);
        if descents > 0 {
            tracing::debug!("Trial {} left {} elements out of order", trial, descents);
            fail_count += 1;
        }
    }

    if fail_count == 0 {
        println!("All sorts succeeded");
    } else {
        println!("{} sorts failed", fail_count);
    }

    if args.timed {
        println!("{}", watch.report("qsort"));
    }

    tracing::info!("{} trial(s) of {} integers on {}", trials, n, rt.strategy());
    Ok(ExitCode::from(u8::try_from(fail_count).unwrap_or(u8::MAX)))
}
