use std::fs;
use tempfile::TempDir;

use tramita_rag::log::InteractionLogger;

#[test]
fn records_append_as_one_json_line_each() {
    let tmp = TempDir::new().expect("tempdir");
    let path = tmp.path().join("logs/interactions.jsonl");
    let logger = InteractionLogger::new(&path);

    let sources = vec!["plazos".to_string()];
    logger.record("query", "usuario_juan", "¿plazo?", "15 días", 120, &sources, None);
    logger.record(
        "agent",
        "usuario_juan",
        "crea una solicitud",
        "hecho",
        950,
        &sources,
        Some("created_solicitud"),
    );

    let content = fs::read_to_string(&path).expect("read log");
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 2);

    let first: serde_json::Value = serde_json::from_str(lines[0]).expect("valid json");
    assert_eq!(first["operation"], "query");
    assert_eq!(first["user_id"], "usuario_juan");
    assert_eq!(first["latency_ms"], 120);
    assert_eq!(first["sources"][0], "plazos");
    assert!(first["action"].is_null());

    let second: serde_json::Value = serde_json::from_str(lines[1]).expect("valid json");
    assert_eq!(second["action"], "created_solicitud");
}

#[test]
fn long_fields_are_clipped_on_character_boundaries() {
    let tmp = TempDir::new().expect("tempdir");
    let path = tmp.path().join("interactions.jsonl");
    let logger = InteractionLogger::new(&path);

    // Multi-byte characters across the clip point must not split.
    let long_input = "ñ".repeat(600);
    logger.record("query", "u", &long_input, "ok", 5, &[], None);

    let content = fs::read_to_string(&path).expect("read log");
    let record: serde_json::Value = serde_json::from_str(content.trim()).expect("valid json");
    let stored = record["input"].as_str().expect("string");
    assert_eq!(stored.chars().count(), 500);
    assert!(stored.chars().all(|c| c == 'ñ'));
}

#[test]
fn logging_failure_never_panics() {
    // Pointing at a path whose parent is a file makes appends fail.
    let tmp = TempDir::new().expect("tempdir");
    let blocker = tmp.path().join("not_a_dir");
    fs::write(&blocker, b"file").expect("write");
    let logger = InteractionLogger::new(blocker.join("log.jsonl"));
    logger.record("query", "u", "entrada", "salida", 1, &[], None);
}
