//! Audit trail and replay demonstration.
//!
//! This example shows the two halves of the audit trail:
//! 1. A logger with a strict threshold writes every call to a JSONL file
//! 2. The reader loads that file, filters it and re-renders the records
//!
//! Run with: `cargo run --example replay`

use std::io;

use tintlog::{
    colorizer, read_log, tlog, Arg, Config, Level, LineRenderer, Logger, Query, Registry, Replay,
    DEFAULT_TIME_FORMAT,
};

fn main() {
    println!("=== Audit Replay Example ===\n");

    let dir = tempfile::tempdir().expect("temporary directory");

    // Only errors and worse reach the terminal.
    let config = Config::builder()
        .threshold(Level::ERROR)
        .log_dir(dir.path())
        .container_id_var(None)
        .track_tid(true)
        .build()
        .expect("valid config");
    let logger = Logger::new(config);
    let path = logger
        .audit_path()
        .expect("log_dir enables the audit trail")
        .to_path_buf();

    println!("--- Live output (threshold {}) ---", Level::ERROR);
    tlog!(logger, Level::INFO, colorizer::GREEN, "service %s starting", "billing");
    tlog!(logger, Level::DEBUG, colorizer::CYAN, "cache warmed with %d entries", 1024);
    let task = logger.task(7);
    task.log(
        Level::ERROR,
        &colorizer::RED,
        "payment %s failed: %s",
        &[Arg::from("inv-0042"), Arg::from("card declined")],
    );
    task.log(
        Level::TRACE,
        &colorizer::GRAY,
        "raw response %s",
        &[Arg::from(b"\x00\x01\xff".as_slice())],
    );

    println!("\n--- Everything in {} ---", path.display());
    let all = read_log(&path, &Query::default()).expect("audit file is readable");
    let replay = Replay::new(
        Registry::default(),
        LineRenderer::new(DEFAULT_TIME_FORMAT, colorizer::DIM_GRAY),
    );
    replay.write_all(&all, &mut io::stdout()).expect("stdout");

    println!("\n--- Last two records at Info or above, without color ---");
    let query = Query::default().ceiling(Level::INFO).tail(Some(2));
    let some = read_log(&path, &query).expect("audit file is readable");
    Replay::plain(DEFAULT_TIME_FORMAT)
        .write_all(&some, &mut io::stdout())
        .expect("stdout");

    println!("\n=== Example Complete ===");
}
