//! CLI integration tests for taskrank
//!
//! These tests drive the binary end to end: analyze a task file, then ask
//! for suggestions from the stored session. Every test pins `--today` and
//! uses its own session and config files.

use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const TODAY: &str = "2024-06-15";

/// Get a command instance for the taskrank binary
fn taskrank_cmd() -> assert_cmd::Command {
    assert_cmd::Command::new(assert_cmd::cargo::cargo_bin!("taskrank"))
}

/// Isolated workspace with its own session and (empty) config
struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("config.toml"), "").unwrap();
        Self { dir }
    }

    fn cmd(&self) -> assert_cmd::Command {
        let mut cmd = taskrank_cmd();
        cmd.current_dir(self.dir.path())
            .env_remove("RUST_LOG")
            .arg("--session")
            .arg(self.dir.path().join("session.json"))
            .arg("--config")
            .arg(self.dir.path().join("config.toml"));
        cmd
    }

    fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    fn json(&self, args: &[&str]) -> Value {
        let out = self
            .cmd()
            .args(["--format", "json"])
            .args(args)
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        serde_json::from_slice(&out).unwrap()
    }
}

fn ids(tasks: &Value) -> Vec<String> {
    tasks
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_str().unwrap().to_string())
        .collect()
}

const SAMPLE: &str = r#"[
    {"id": "report", "title": "Quarterly report", "importance": 8,
     "due_date": "2024-06-16", "estimated_hours": 3, "dependencies": ["data"]},
    {"id": "data", "title": "Collect data", "importance": 6,
     "due_date": "2024-06-14", "estimated_hours": 1, "dependencies": []},
    {"id": "slides", "title": "Slides", "importance": 4,
     "estimated_hours": 2, "dependencies": ["report"]},
    {"id": "cleanup", "title": "Clean inbox", "importance": 2,
     "estimated_hours": 0.5},
    {"id": "vendor", "title": "Vendor call", "importance": 5,
     "due_date": "2024-07-30", "dependencies": ["legal-signoff"]}
]"#;

// =============================================================================
// Analyze
// =============================================================================

#[test]
fn test_analyze_text_output() {
    let ws = Workspace::new();
    let file = ws.write("tasks.json", SAMPLE);

    ws.cmd()
        .args(["analyze", "--today", TODAY])
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("Analyzed 5 task(s) with smart_balance"))
        .stdout(predicate::str::contains("Quarterly report"))
        .stdout(predicate::str::contains("Strategy: Smart Balance"));
}

#[test]
fn test_analyze_json_preserves_input_order() {
    let ws = Workspace::new();
    let file = ws.write("tasks.json", SAMPLE);

    let out = ws.json(&["analyze", "--today", TODAY, file.to_str().unwrap()]);

    assert_eq!(out["strategy"], "smart_balance");
    assert_eq!(out["count"], 5);
    assert_eq!(ids(&out["tasks"]), vec!["report", "data", "slides", "cleanup", "vendor"]);
    assert!(out["tasks"]
        .as_array()
        .unwrap()
        .iter()
        .all(|t| t["circular_dependency"] == false));
    assert_eq!(out["session"].as_str().unwrap().len(), 12);
}

#[test]
fn test_analyze_reads_stdin() {
    let ws = Workspace::new();

    let out = ws
        .cmd()
        .args(["--format", "json", "analyze", "--today", TODAY])
        .write_stdin(r#"[{"id": "A", "title": "Alpha", "importance": 5}]"#)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let out: Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(out["count"], 1);
}

#[test]
fn test_analyze_yaml_file() {
    let ws = Workspace::new();
    let file = ws.write(
        "tasks.yaml",
        "- id: A\n  title: Alpha\n  importance: 9\n- id: B\n  title: Beta\n  importance: 3\n  dependencies: [A]\n",
    );

    let out = ws.json(&["analyze", "--strategy", "high_impact", "--today", TODAY, file.to_str().unwrap()]);
    assert_eq!(ids(&out["tasks"]), vec!["A", "B"]);
}

#[test]
fn test_analyze_flags_cycles() {
    let ws = Workspace::new();
    let file = ws.write(
        "tasks.json",
        r#"[
            {"id": "A", "title": "A", "importance": 5, "dependencies": ["B"]},
            {"id": "B", "title": "B", "importance": 5, "dependencies": ["A"]}
        ]"#,
    );

    for strategy in ["smart_balance", "fastest_wins", "high_impact", "deadline_driven"] {
        let out = ws.json(&["analyze", "--strategy", strategy, "--today", TODAY, file.to_str().unwrap()]);
        let tasks = out["tasks"].as_array().unwrap();
        assert!(tasks.iter().all(|t| t["circular_dependency"] == true), "{}", strategy);
        assert_eq!(out["cycles"], serde_json::json!([["A", "B"]]));
    }

    ws.cmd()
        .args(["analyze", "--today", TODAY])
        .arg(&file)
        .assert()
        .success()
        .stderr(predicate::str::contains("circular dependency among: A, B"));
}

#[test]
fn test_analyze_rejects_malformed_records() {
    let ws = Workspace::new();
    let file = ws.write(
        "tasks.json",
        r#"[{"id": "A", "title": "A", "importance": 11}, {"title": "no id", "importance": 2}]"#,
    );

    ws.cmd()
        .args(["analyze", "--today", TODAY])
        .arg(&file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("tasks[0].importance: must be between 1 and 10, got 11"))
        .stderr(predicate::str::contains("tasks[1].id: is required"));

    // Nothing was stored
    ws.cmd()
        .args(["session", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No session"));
}

#[test]
fn test_analyze_rejects_non_array() {
    let ws = Workspace::new();
    let file = ws.write("tasks.json", r#"{"id": "A"}"#);

    ws.cmd()
        .arg("analyze")
        .arg(&file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Expected a JSON array of tasks"));
}

#[test]
fn test_unknown_strategy_rejected() {
    let ws = Workspace::new();
    let file = ws.write("tasks.json", "[]");

    ws.cmd()
        .args(["analyze", "--strategy", "balanced"])
        .arg(&file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown strategy 'balanced'"));

    ws.cmd()
        .args(["suggest", "--strategy", "whatever"])
        .assert()
        .failure();
}

// =============================================================================
// Suggest
// =============================================================================

#[test]
fn test_suggest_before_analyze_is_empty() {
    let ws = Workspace::new();

    let out = ws.json(&["suggest", "--today", TODAY]);
    assert_eq!(out["suggested_count"], 0);
    assert_eq!(out["suggested_tasks"], serde_json::json!([]));

    ws.cmd()
        .args(["suggest", "--today", TODAY])
        .assert()
        .success()
        .stdout(predicate::str::contains("No tasks to suggest"));
}

#[test]
fn test_suggest_returns_top_three_from_session() {
    let ws = Workspace::new();
    let file = ws.write("tasks.json", SAMPLE);
    ws.cmd()
        .args(["analyze", "--today", TODAY])
        .arg(&file)
        .assert()
        .success();

    let out = ws.json(&["suggest", "--today", TODAY]);
    let suggested = ids(&out["suggested_tasks"]);

    assert_eq!(out["suggested_count"], 3);
    assert_eq!(suggested.len(), 3);
    let known = ["report", "data", "slides", "cleanup", "vendor"];
    assert!(suggested.iter().all(|id| known.contains(&id.as_str())));

    let scores: Vec<f64> = out["suggested_tasks"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["priority_score"].as_f64().unwrap())
        .collect();
    assert!(scores.windows(2).all(|w| w[0] >= w[1]));
}

#[test]
fn test_suggest_rescores_with_new_strategy() {
    let ws = Workspace::new();
    let file = ws.write(
        "tasks.json",
        r#"[
            {"id": "important", "title": "I", "importance": 10, "due_date": "2024-06-30"},
            {"id": "urgent", "title": "U", "importance": 2, "due_date": "2024-06-14"}
        ]"#,
    );
    ws.cmd()
        .args(["analyze", "--strategy", "high_impact", "--today", TODAY])
        .arg(&file)
        .assert()
        .success();

    let out = ws.json(&["suggest", "--strategy", "high_impact", "--today", TODAY]);
    assert_eq!(ids(&out["suggested_tasks"]), vec!["important", "urgent"]);

    let out = ws.json(&["suggest", "--strategy", "deadline_driven", "--today", TODAY]);
    assert_eq!(out["strategy"], "deadline_driven");
    assert_eq!(ids(&out["suggested_tasks"]), vec!["urgent", "important"]);
}

#[test]
fn test_suggest_limit() {
    let ws = Workspace::new();
    let file = ws.write("tasks.json", SAMPLE);
    ws.cmd().arg("analyze").arg(&file).assert().success();

    let out = ws.json(&["suggest", "--limit", "1"]);
    assert_eq!(out["suggested_count"], 1);

    ws.cmd().args(["suggest", "--limit", "0"]).assert().failure();
}

#[test]
fn test_suggest_limit_from_config() {
    let ws = Workspace::new();
    ws.write("config.toml", "suggest_limit = 5\ndefault_strategy = \"fastest_wins\"\n");
    let file = ws.write("tasks.json", SAMPLE);
    ws.cmd().arg("analyze").arg(&file).assert().success();

    let out = ws.json(&["suggest"]);
    assert_eq!(out["suggested_count"], 5);
    assert_eq!(out["strategy"], "fastest_wins");
}

#[test]
fn test_empty_analyze_replaces_session() {
    let ws = Workspace::new();
    let file = ws.write("tasks.json", SAMPLE);
    ws.cmd().arg("analyze").arg(&file).assert().success();

    let empty = ws.write("empty.json", "[]");
    ws.cmd()
        .arg("analyze")
        .arg(&empty)
        .assert()
        .success()
        .stdout(predicate::str::contains("No tasks to analyze"));

    let out = ws.json(&["suggest"]);
    assert_eq!(out["suggested_count"], 0);
}

// =============================================================================
// Cycles, strategies, session
// =============================================================================

#[test]
fn test_cycles_report() {
    let ws = Workspace::new();
    let file = ws.write(
        "tasks.json",
        r#"[
            {"id": "A", "title": "A", "importance": 5, "dependencies": ["C"]},
            {"id": "B", "title": "B", "importance": 5, "dependencies": ["A"]},
            {"id": "C", "title": "C", "importance": 5, "dependencies": ["B"]},
            {"id": "D", "title": "D", "importance": 5, "dependencies": ["A", "ext"]},
            {"id": "S", "title": "S", "importance": 5, "dependencies": ["S"]}
        ]"#,
    );

    let out = ws.json(&["cycles", file.to_str().unwrap()]);
    assert_eq!(out["cycles"], serde_json::json!([["A", "B", "C"], ["S"]]));
    assert_eq!(out["circular_tasks"], 4);
    assert_eq!(out["dangling"], serde_json::json!([{"task": "D", "missing": "ext"}]));

    ws.cmd()
        .arg("cycles")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("A, B, C"))
        .stdout(predicate::str::contains("D -> ext"));

    // Checking does not create a session
    assert!(!ws.dir.path().join("session.json").exists());
}

#[test]
fn test_strategies_list() {
    let ws = Workspace::new();

    ws.cmd()
        .arg("strategies")
        .assert()
        .success()
        .stdout(predicate::str::contains("* smart_balance"))
        .stdout(predicate::str::contains("deadline_driven"));
}

#[test]
fn test_session_show_and_clear() {
    let ws = Workspace::new();
    let file = ws.write("tasks.json", SAMPLE);
    ws.cmd()
        .args(["analyze", "--strategy", "deadline_driven", "--today", TODAY])
        .arg(&file)
        .assert()
        .success();

    let out = ws.json(&["session", "show"]);
    assert_eq!(out["session"]["strategy"], "deadline_driven");
    assert_eq!(out["session"]["analyzed_on"], TODAY);
    assert_eq!(out["session"]["tasks"].as_array().unwrap().len(), 5);

    ws.cmd()
        .args(["session", "clear"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Session cleared"));

    let out = ws.json(&["session", "show"]);
    assert_eq!(out["session"], Value::Null);
}

#[test]
fn test_verbose_logs_to_stderr() {
    let ws = Workspace::new();
    let file = ws.write("tasks.json", SAMPLE);

    ws.cmd()
        .args(["--verbose", "--format", "json", "analyze", "--today", TODAY])
        .arg(&file)
        .assert()
        .success()
        .stderr(predicate::str::contains("analysis pass complete"))
        .stdout(predicate::str::starts_with("{"));
}
