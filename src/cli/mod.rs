use std::pin::pin;

use anyhow::Result;
use clap::Parser;
use futures::StreamExt;
use tokio::io::{AsyncBufRead, BufReader};
use tracing::level_filters::LevelFilter;

use crate::{
    trace::extract::{idle_intervals, read_samples},
    utils::logging::enable_logging,
};

#[derive(Parser, Debug)]
#[command(name = "Idletrace", version, long_about = None)]
#[command(
    about = "Reconstructs idle intervals from an idleness trace read on stdin",
    long_about = None
)]
struct Args {
    #[arg(long, help = "Enable logging")]
    log: bool,
}

pub async fn run_cli() -> Result<()> {
    let args = Args::parse();

    let logging_level = if args.log {
        Some(LevelFilter::TRACE)
    } else {
        None
    };
    enable_logging(logging_level)?;

    extract_to_stdout(BufReader::new(tokio::io::stdin())).await
}

/// Prints each interval as soon as its end is detected instead of collecting
/// the whole trace first, so the filter composes with `tail -f` style
/// upstreams.
async fn extract_to_stdout(reader: impl AsyncBufRead + Unpin) -> Result<()> {
    let intervals = idle_intervals(read_samples(reader));
    let mut intervals = pin!(intervals);
    while let Some(interval) = intervals.next().await {
        println!("{}", interval?);
    }
    Ok(())
}
