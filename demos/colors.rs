//! Colorizer and level showcase.
//!
//! This example prints:
//! 1. Every built-in colorizer by name
//! 2. One line per level band through a live logger
//! 3. The display forms of a few argument shapes
//!
//! Run with: `cargo run --example colors`

use tintlog::{colorizer, tlog, Arg, Config, Level, Logger, Registry};

fn main() {
    println!("=== Built-in Colorizers ===\n");

    let registry = Registry::default();
    for name in registry.names() {
        let sample = registry.resolve(name).apply(&format!("{name:<20}"));
        println!("  {sample} {name}");
    }

    println!("\n=== Level Bands ===\n");

    let config = Config::builder()
        .time_format("%H:%M:%S")
        .build()
        .expect("default layouts are valid");
    let logger = Logger::new(config);

    let bands = [
        (Level::FATAL, colorizer::RED_BOLD_BACKGROUND),
        (Level::CRITICAL, colorizer::RED_BOLD),
        (Level::ERROR, colorizer::RED),
        (Level::WARNING, colorizer::ORANGE),
        (Level::NOTICE, colorizer::YELLOW),
        (Level::INFO, colorizer::GREEN),
        (Level::DEBUG, colorizer::CYAN),
        (Level::VERBOSE, colorizer::BLUE),
        (Level::TRACE, colorizer::PURPLE),
        (Level::SPAM, colorizer::GRAY),
    ];
    for (level, color) in &bands {
        tlog!(logger, *level, color, "level %d is named %s", level.value(), level.to_string());
    }
    tlog!(logger, Level::new(55), colorizer::DIM_GREEN, "offsets inside a band: %s", "Info5");

    println!("\n=== Argument Shapes ===\n");

    let err = std::io::Error::new(std::io::ErrorKind::NotFound, "config.json missing");
    let payload = serde_json::json!({ "user": "ada", "roles": ["admin", "ops"] });
    let callback = |n: u32| n * 2;

    logger.log(
        Level::INFO,
        &colorizer::BRIGHT_CYAN,
        "error=%s bytes=%s opaque=%s",
        &[
            Arg::error(&err),
            Arg::from(vec![0xde, 0xad, 0xbe, 0xef]),
            Arg::opaque(&callback),
        ],
    );
    logger.log_json(Level::INFO, &colorizer::DIM_CYAN, "Payload", &payload.to_string());
    for pct in [10, 50, 100] {
        logger.log_rewrite(Level::INFO, &colorizer::GREEN, "progress %d%%", &[Arg::from(pct)]);
    }
    println!();

    println!("\n=== Example Complete ===");
}
