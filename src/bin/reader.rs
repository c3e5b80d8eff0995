//! `tintlog-reader`: prints an audit file the way the live logger would have.

use std::io::{self, BufWriter};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tintlog::{
    colorizer, parse_bound, read_log, Level, LineRenderer, Query, Registry, Replay,
    DEFAULT_TIME_FORMAT,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug, Clone)]
#[command(name = "tintlog-reader", version)]
#[command(about = "Filter and re-render a tintlog JSONL audit file")]
struct Args {
    #[arg(long, help = "Path to the JSONL audit file")]
    file: PathBuf,

    #[arg(
        long,
        default_value_t = Level::MAX,
        help = "Show records at or below this level (number or name, e.g. 50 or Info)"
    )]
    level: Level,

    #[arg(long, help = "Earliest record time, in --time-format (default: no lower bound)")]
    start: Option<String>,

    #[arg(long, help = "Latest record time, in --time-format (default: no upper bound)")]
    end: Option<String>,

    #[arg(
        long,
        default_value = DEFAULT_TIME_FORMAT,
        help = "strftime layout for --start, --end and printed timestamps"
    )]
    time_format: String,

    #[arg(
        long,
        default_value_t = -1,
        allow_negative_numbers = true,
        help = "Only consider the last N lines (negative for all)"
    )]
    tail: i64,

    #[arg(long, help = "Print without ANSI escapes")]
    no_color: bool,
}

fn main() -> Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .try_init();

    let args = Args::parse();

    let mut query = Query::default()
        .ceiling(args.level)
        .tail(usize::try_from(args.tail).ok());
    if let Some(start) = &args.start {
        query = query.start(parse_bound(start, &args.time_format).context("invalid --start")?);
    }
    if let Some(end) = &args.end {
        query = query.end(parse_bound(end, &args.time_format).context("invalid --end")?);
    }

    let records = read_log(&args.file, &query)
        .with_context(|| format!("failed to read {}", args.file.display()))?;
    tracing::debug!(count = records.len(), "printing records");

    let replay = if args.no_color {
        Replay::plain(&args.time_format)
    } else {
        Replay::new(
            Registry::default(),
            LineRenderer::new(args.time_format.as_str(), colorizer::DIM_GRAY),
        )
    };

    let mut out = BufWriter::new(io::stdout().lock());
    replay
        .write_all(&records, &mut out)
        .context("failed to write output")?;
    Ok(())
}
