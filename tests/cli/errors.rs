//! Tests for error handling and CLI flags.

use crate::support::*;
use predicates::prelude::*;

#[test]
fn test_help_lists_commands() {
    let t = Test::new();

    let output = t.cmd().arg("--help").output().unwrap();
    assert_success(&output);
    let out = stdout(&output);
    for command in ["up", "attach", "status", "completions"] {
        assert!(out.contains(command), "help missing {}", command);
    }
}

#[test]
fn test_unknown_command_fails() {
    let t = Test::new();

    let output = t.cmd().arg("unknown-command").output().unwrap();
    assert_failure(&output);
}

#[test]
fn test_version_flag() {
    let t = Test::new();

    let output = t.cmd().arg("--version").output().unwrap();
    assert_success(&output);
    assert_stdout_contains(&output, "agentmux");
}

#[test]
fn test_completions_bash_outputs_script() {
    let t = Test::new();

    let output = t.cmd().args(["completions", "bash"]).output().unwrap();
    assert_success(&output);
    assert_stdout_contains(&output, "agentmux");
}

#[test]
fn test_attach_without_session_fails() {
    let t = Test::ready();

    let output = t.cmd().arg("attach").output().unwrap();
    assert_failure(&output);
    assert_stderr_contains(&output, "no session named 'agents'");
    assert_stdout_contains(&output, "run: agentmux up");
    assert!(!t
        .tmux_calls()
        .iter()
        .any(|c| c.starts_with("attach-session")));
}

#[test]
fn test_attach_existing_session() {
    let t = Test::ready();

    let output = t
        .cmd()
        .arg("attach")
        .env("FAKE_TMUX_HAS_SESSION", "1")
        .output()
        .unwrap();
    assert_success(&output);
    assert_eq!(
        t.tmux_calls().last().map(String::as_str),
        Some("attach-session -t =agents")
    );
}

#[test]
fn test_attach_inside_tmux_switches_client() {
    let t = Test::ready();

    let output = t
        .cmd()
        .arg("attach")
        .env("FAKE_TMUX_HAS_SESSION", "1")
        .env("TMUX", "/tmp/tmux-1000/default,42,0")
        .output()
        .unwrap();
    assert_success(&output);
    assert!(t
        .tmux_calls()
        .contains(&"switch-client -t =agents".to_string()));
}

#[test]
fn test_malformed_config_fails_with_hint() {
    let t = Test::ready();
    t.write_config("[session\nname = ");

    let output = t.up();
    assert_failure(&output);
    assert_stderr_contains(&output, "failed to parse config");
    assert_stdout_contains(&output, "check ~/.agentmux/config.toml");
    assert!(t.tmux_calls().is_empty());
}

#[test]
fn test_unknown_config_key_rejected() {
    let t = Test::ready();
    t.write_config("[session]\nwindow = \"main\"\n");

    let output = t.status();
    assert_failure(&output);
    assert_stderr_contains(&output, "failed to parse config");
}

#[test]
fn test_invalid_session_name_rejected() {
    let t = Test::ready();
    t.write_config("[session]\nname = \"my agents\"\n");

    let output = t.up();
    assert_failure(&output);
    assert_stderr_contains(&output, "invalid session.name");
}

#[test]
fn test_config_flag_overrides_default_path() {
    let t = Test::ready();
    let path = t.home.path().join("elsewhere.toml");
    std::fs::write(&path, CUSTOM_CONFIG).unwrap();

    let output = t
        .cmd()
        .args(["--config", path.to_str().unwrap(), "status", "--json"])
        .output()
        .unwrap();
    assert_success(&output);
    assert_stdout_contains(&output, "\"pairing\"");
}

#[test]
fn test_unsupported_platform_exits_one() {
    let t = Test::new();

    t.cmd()
        .args(["up", "--no-attach"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("no supported package manager"))
        .stdout(predicate::str::contains("npm install").not());
}
