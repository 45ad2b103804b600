//! Tests for `status`.

use crate::support::*;

#[test]
fn test_status_on_empty_machine() {
    let t = Test::new();

    let output = t.status();
    assert_success(&output);
    assert_stdout_contains(&output, "none found");
    assert_stdout_contains(&output, "missing");
    assert_stdout_contains(&output, "not running");
}

#[test]
fn test_status_groups_output_in_sections() {
    let t = Test::ready();

    let output = t.status();
    assert_success(&output);
    let out = stdout(&output);
    for title in ["Programs", "Keys", "Session"] {
        assert!(
            out.lines().any(|l| l == title),
            "missing section {}: {}",
            title,
            out
        );
    }
    assert_eq!(out.lines().filter(|l| l.starts_with('─')).count(), 3);
}

#[test]
fn test_status_json_reports_programs_and_keys() {
    let t = Test::ready();
    assert_success(&t.up_with_env(&[("GEMINI_API_KEY", "g-secret-value")]));

    let output = t.status_json();
    assert_success(&output);

    let report: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    let programs = report["programs"].as_array().unwrap();
    assert!(programs.iter().all(|p| p["installed"] == true));

    let secrets = report["secrets"].as_array().unwrap();
    let saved: Vec<&str> = secrets
        .iter()
        .filter(|s| s["saved"] == true)
        .map(|s| s["name"].as_str().unwrap())
        .collect();
    assert_eq!(saved, vec!["GEMINI_API_KEY"]);
    assert_eq!(report["session"], "agents");
}

#[test]
fn test_status_never_prints_key_values() {
    let t = Test::ready();
    assert_success(&t.up_with_env(&[("OPENAI_API_KEY", "sk-do-not-print")]));

    for output in [t.status(), t.status_json()] {
        assert_success(&output);
        assert!(!stdout(&output).contains("sk-do-not-print"));
    }
}

#[test]
fn test_status_reports_running_session() {
    let t = Test::ready();

    let output = t
        .cmd()
        .args(["status", "--json"])
        .env("FAKE_TMUX_HAS_SESSION", "1")
        .output()
        .unwrap();
    assert_success(&output);

    let report: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(report["session_running"], true);
}

#[test]
fn test_status_counts_tools_under_prefix() {
    let t = Test::new();
    t.install(&["node", "npm", "tmux"]);
    assert_success(&t.up());

    let report: serde_json::Value = serde_json::from_str(&stdout(&t.status_json())).unwrap();
    let claude = report["programs"]
        .as_array()
        .unwrap()
        .iter()
        .find(|p| p["name"] == "claude")
        .unwrap();
    assert_eq!(claude["installed"], true);
}
