use serde_json::{json, Value};

use super::*;

fn replay(session: Value, config: &BridgeConfig) -> Vec<Value> {
    let session: Session = serde_json::from_value(session).unwrap();
    let mut out = Vec::new();
    let written = run(&session, config, &mut out).unwrap();
    let lines: Vec<Value> = String::from_utf8(out)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(lines.len(), written);
    lines
}

fn names(lines: &[Value]) -> Vec<&str> {
    lines
        .iter()
        .map(|l| {
            l.get("name")
                .or_else(|| l.get("method"))
                .and_then(Value::as_str)
                .unwrap_or_else(|| l["kind"].as_str().unwrap())
        })
        .collect()
}

#[test]
fn source_load_emits_start_progress_finish() {
    let lines = replay(
        json!({
            "steps": [
                { "op": "set", "name": "source", "value": { "uri": "https://example.com/" } }
            ]
        }),
        &BridgeConfig::default(),
    );
    assert_eq!(
        names(&lines),
        vec!["topLoadingStart", "topLoadingProgress", "topLoadingFinish"]
    );
    assert_eq!(lines[0]["target"], 1);
    assert_eq!(lines[2]["payload"]["url"], "https://example.com/");
}

#[test]
fn messages_go_through_events_or_the_direct_bridge() {
    let session = json!({
        "steps": [
            { "op": "set", "name": "messagingEnabled", "value": true },
            { "op": "set", "name": "messagingModuleName", "value": "WebViewMessaging" },
            { "op": "message", "data": "one" },
            { "op": "message", "data": "two" }
        ]
    });

    let lines = replay(session.clone(), &BridgeConfig::default());
    assert_eq!(names(&lines), vec!["topMessage", "topMessage"]);
    assert_eq!(lines[0]["payload"]["data"], "one");
    assert_eq!(lines[1]["payload"]["data"], "two");

    let mut config = BridgeConfig::default();
    config.host.direct_bridge = true;
    let lines = replay(session, &config);
    assert_eq!(names(&lines), vec!["onMessage", "onMessage"]);
    assert_eq!(lines[0]["kind"], "function_call");
}

#[test]
fn config_defaults_apply_before_steps() {
    let mut config = BridgeConfig::default();
    config
        .defaults
        .insert("messagingEnabled".to_string(), json!(true));
    let lines = replay(
        json!({ "steps": [ { "op": "message", "data": "hi" } ] }),
        &config,
    );
    assert_eq!(names(&lines), vec!["topMessage"]);
}

#[test]
fn rejected_steps_do_not_stop_the_replay() {
    let lines = replay(
        json!({
            "steps": [
                { "op": "set", "name": "notAProperty", "value": 1 },
                { "op": "command", "name": "teleport" },
                { "op": "set", "name": "source", "value": { "html": "<p>hi</p>" } }
            ]
        }),
        &BridgeConfig::default(),
    );
    assert_eq!(names(&lines).first(), Some(&"topLoadingStart"));
}

#[test]
fn failed_load_then_download() {
    let lines = replay(
        json!({
            "steps": [
                { "op": "beginLoad", "url": "https://example.com/" },
                { "op": "failLoad", "url": "https://example.com/", "code": -2, "description": "host lookup" },
                { "op": "download", "url": "https://example.com/files/report.pdf", "mimeType": "application/pdf" }
            ]
        }),
        &BridgeConfig::default(),
    );
    let labels = names(&lines);
    assert_eq!(
        labels,
        vec!["topLoadingStart", "topLoadingFinish", "topLoadingError", "download"]
    );
    assert_eq!(lines[2]["payload"]["code"], -2);
    assert_eq!(lines[3]["request"]["fileName"], "report.pdf");
}

#[test]
fn deferred_navigation_and_lifecycle_destroy() {
    let lines = replay(
        json!({
            "navigation": "deferred",
            "steps": [
                { "op": "clickLink", "url": "https://example.com/next" },
                { "op": "lifecycle", "event": "destroy" },
                { "op": "set", "name": "textZoom", "value": 120 }
            ]
        }),
        &BridgeConfig::default(),
    );
    assert_eq!(names(&lines), vec!["topShouldStartLoadWithRequest"]);
    assert_eq!(lines[0]["payload"]["url"], "https://example.com/next");
}

#[test]
fn unknown_ops_are_rejected_up_front() {
    let result = serde_json::from_value::<Session>(json!({
        "steps": [ { "op": "levitate" } ]
    }));
    assert!(result.is_err());
}

#[test]
fn run_file_reads_sessions_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    std::fs::write(
        &path,
        r#"{ "steps": [ { "op": "set", "name": "source", "value": { "uri": "https://example.com/" } } ] }"#,
    )
    .unwrap();

    let mut out = Vec::new();
    let written = run_file(&path, &BridgeConfig::default(), &mut out).unwrap();
    assert_eq!(written, 3);

    let missing = run_file(&dir.path().join("nope.json"), &BridgeConfig::default(), &mut out);
    assert!(matches!(missing, Err(ReplayError::Io(_))));
}

#[test]
fn profile_follows_engine_section() {
    let mut config = BridgeConfig::default();
    config.engine.api_level = 18;
    config.engine.force_dark_supported = false;
    let profile = profile_from_config(&config);
    assert_eq!(profile.api_level, 18);
    assert!(!profile.force_dark_feature);
    assert!(profile.protected_media_feature);
}

#[test]
fn headless_defaults_table_applies_to_replays() {
    let mut config = BridgeConfig::default();
    config
        .defaults
        .insert("system".to_string(), json!({ "messagingEnabled": true }));
    let lines = replay(
        json!({ "steps": [ { "op": "message", "data": "hi" } ] }),
        &config,
    );
    assert!(lines.is_empty());

    config
        .defaults
        .insert("headless".to_string(), json!({ "messagingEnabled": true }));
    let lines = replay(
        json!({ "steps": [ { "op": "message", "data": "hi" } ] }),
        &config,
    );
    assert_eq!(names(&lines), vec!["topMessage"]);
}
