use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::thread;

use serde_json::json;
use tintlog::{
    colorizer, tlog, Arg, AuditWriter, Colorizer, Config, Level, LineRenderer, LogRecord, Logger,
    Registry, Replay, VecSink, DEFAULT_TIME_FORMAT,
};

fn records(path: &Path) -> Vec<LogRecord> {
    fs::read_to_string(path)
        .expect("audit file exists")
        .lines()
        .map(|line| LogRecord::from_json_line(line).expect("valid record"))
        .collect()
}

fn logger_with_audit(config: Config, path: &Path) -> (Logger, Arc<VecSink>) {
    let sink = Arc::new(VecSink::new());
    let logger =
        Logger::with_sink(config, sink.clone()).with_audit(AuditWriter::new(Some(path.to_path_buf())));
    (logger, sink)
}

#[test]
fn gated_event_is_hidden_but_recorded() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("audit.jsonl");
    let config = Config::builder().threshold(Level::new(40)).build().unwrap();
    let (logger, sink) = logger_with_audit(config, &path);

    tlog!(logger, Level::new(90), colorizer::RED, "error: %s", "boom");

    assert!(sink.is_empty());
    let stored = records(&path);
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].level(), Level::new(90));
    assert_eq!(stored[0].color(), "Red");
    assert_eq!(stored[0].format(), "error: %s");
    assert_eq!(stored[0].args(), &[json!("boom")]);
}

#[test]
fn audit_is_a_superset_of_interactive_output() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("audit.jsonl");
    let config = Config::builder()
        .threshold(Level::INFO)
        .time_format("")
        .build()
        .unwrap();
    let (logger, sink) = logger_with_audit(config, &path);

    for value in [0u8, 10, 20, 30, 40, 50, 60, 70, 80, 90, 200] {
        logger.log(Level::new(value), &Colorizer::none(), "level %d", &[Arg::from(value)]);
    }

    assert_eq!(sink.len(), 6);
    assert_eq!(records(&path).len(), 11);
}

#[test]
fn concurrent_calls_never_interleave() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("audit.jsonl");
    let config = Config::builder()
        .track_tid(true)
        .time_format("")
        .build()
        .unwrap();
    let (logger, sink) = logger_with_audit(config, &path);
    let logger = Arc::new(logger);

    let handles: Vec<_> = (1..=8u64)
        .map(|tid| {
            let logger = Arc::clone(&logger);
            thread::spawn(move || {
                for i in 0..50 {
                    logger.task(tid).log(
                        Level::INFO,
                        &Colorizer::none(),
                        "worker %d step %d of a reasonably long message",
                        &[Arg::from(tid), Arg::from(i)],
                    );
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let lines = sink.snapshot();
    assert_eq!(lines.len(), 400);
    for line in &lines {
        assert!(line.starts_with("[Info]["));
        assert!(line.ends_with(" of a reasonably long message\n"));
        assert_eq!(line.matches('\n').count(), 1);
    }

    let stored = records(&path);
    assert_eq!(stored.len(), 400);
    for tid in 1..=8u64 {
        assert_eq!(stored.iter().filter(|r| r.tid() == tid).count(), 50);
    }
}

#[test]
fn replay_matches_live_output() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("audit.jsonl");
    let config = Config::builder().track_tid(true).build().unwrap();
    let (logger, sink) = logger_with_audit(config, &path);

    let err = std::io::Error::new(std::io::ErrorKind::Other, "connection reset");
    logger.task(3).log(
        Level::WARNING,
        &colorizer::GREEN,
        "user %s retried %d times: %s payload=%s raw=%s",
        &[
            Arg::from("ada"),
            Arg::from(3),
            Arg::error(&err),
            Arg::from(json!({"id": 7, "tags": ["a", "b"]})),
            Arg::from(vec![0xffu8, 0x00, 0x10]),
        ],
    );
    logger.log(Level::INFO, &colorizer::NO_COLOR, "plain %s", &[Arg::from(1.5)]);

    let replay = Replay::new(
        Registry::default(),
        LineRenderer::new(DEFAULT_TIME_FORMAT, colorizer::DIM_GRAY),
    );
    let stored = records(&path);
    assert_eq!(replay.render(&stored[0]), sink.snapshot()[0]);
    // tid 0 is not shown on replay
    let live = sink.snapshot()[1].replace("[0] ", " ");
    assert_eq!(replay.render(&stored[1]), live);
}

#[test]
fn audit_file_is_placed_from_config() {
    let dir = tempfile::tempdir().unwrap();
    let json = format!(
        r#"{{
            "log_dir": {:?},
            "container_id_var_name": "NONE",
            "log_file_format": "run_%Y.jsonl",
            "log_level": 30,
            "time_color": "Cyan"
        }}"#,
        dir.path().join("nested").display().to_string()
    );
    let config = Config::from_json(&json, &Registry::default()).unwrap();
    assert_eq!(config.threshold(), Level::WARNING);
    assert_eq!(config.time_colorizer().name(), "Cyan");

    let logger = Logger::with_sink(config, Arc::new(VecSink::new()));
    let path = logger.audit_path().unwrap().to_path_buf();
    assert!(path.starts_with(dir.path().join("nested")));
    assert!(!path.exists());

    logger.log(Level::INFO, &Colorizer::none(), "first", &[]);
    assert!(path.exists());
    assert!(path.file_name().unwrap().to_string_lossy().starts_with("run_"));
}

#[test]
fn missing_directory_disables_audit() {
    let sink = Arc::new(VecSink::new());
    let logger = Logger::with_sink(Config::default(), sink.clone());
    assert!(logger.audit_path().is_none());

    logger.log(Level::INFO, &Colorizer::none(), "only on screen", &[]);
    assert_eq!(sink.len(), 1);
}

#[test]
fn unwritable_audit_never_reaches_caller() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("file");
    fs::write(&blocker, "not a directory").unwrap();
    let path = blocker.join("audit.jsonl");
    let config = Config::builder().time_format("").build().unwrap();
    let (logger, sink) = logger_with_audit(config, &path);

    logger.log(Level::INFO, &Colorizer::none(), "still shown", &[]);

    assert_eq!(sink.snapshot(), vec!["[Info] still shown\n"]);
    assert!(!path.exists());
}

#[test]
fn helpers_store_their_expanded_templates() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("audit.jsonl");
    let (logger, _sink) = logger_with_audit(Config::default(), &path);

    logger.log_rewrite(Level::INFO, &Colorizer::none(), "%d%%", &[Arg::from(40)]);
    logger.log_json(Level::INFO, &Colorizer::none(), "Cfg", "{}");

    let stored = records(&path);
    assert!(stored[0].format().starts_with("\r%d%%"));
    assert_eq!(stored[1].format(), "%s (JSON):\n'''\n%s\n'''");
    assert_eq!(stored[1].args(), &[json!("Cfg"), json!("{}")]);
}
