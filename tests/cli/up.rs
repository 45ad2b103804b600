//! Tests for the `up` bootstrap.

use crate::support::*;
use std::fs;

#[test]
fn test_up_builds_four_titled_panes() {
    let t = Test::ready();

    let output = t.up();
    assert_success(&output);

    let calls = t.tmux_calls();
    assert!(calls.iter().any(|c| c.starts_with("new-session -d -s agents")));
    assert_eq!(
        calls.iter().filter(|c| c.starts_with("split-window")).count(),
        3
    );
    for title in PANE_TITLES {
        assert!(
            calls
                .iter()
                .any(|c| c.starts_with("select-pane") && c.ends_with(&format!("-T {}", title))),
            "pane {} was not titled: {:?}",
            title,
            calls
        );
    }
    for tool in ["claude", "gemini", "codex"] {
        assert!(calls
            .iter()
            .any(|c| c.starts_with("send-keys") && c.ends_with(&format!("-l {}", tool))));
    }
    assert_eq!(
        calls.last().map(String::as_str),
        Some("select-pane -t %0"),
        "first pane should be focused last"
    );
}

#[test]
fn test_up_retiles_after_every_split() {
    let t = Test::ready();
    assert_success(&t.up());

    let calls = t.tmux_calls();
    for (i, call) in calls.iter().enumerate() {
        if call.starts_with("split-window") {
            assert!(
                calls[i + 1].starts_with("select-layout") && calls[i + 1].ends_with("tiled"),
                "no retile after {}",
                call
            );
        }
    }
}

#[test]
fn test_up_writes_profile_and_tmux_conf() {
    let t = Test::ready();
    assert_success(&t.up());

    let home = t.home.path().display().to_string();
    let profile = read(&t.profile());
    assert_line_once(
        &profile,
        &format!("export PATH=\"{}/.npm-global/bin:$PATH\"", home),
    );
    assert_line_once(
        &profile,
        &format!(
            "[ -f \"{0}/.agentmux/keys.env\" ] && . \"{0}/.agentmux/keys.env\"",
            home
        ),
    );
    assert_line_once(&profile, "alias agents='tmux attach-session -t agents'");

    let conf = read(&t.tmux_conf());
    for line in TMUX_LINES {
        assert_line_once(&conf, line);
    }
}

#[test]
fn test_up_twice_adds_nothing() {
    let t = Test::ready();
    assert_success(&t.up_with_env(&[("OPENAI_API_KEY", "sk-openai")]));

    let profile = read(&t.profile());
    let conf = read(&t.tmux_conf());
    let secrets = read(&t.secrets());

    assert_success(&t.up_with_env(&[("OPENAI_API_KEY", "sk-openai")]));
    assert_eq!(read(&t.profile()), profile);
    assert_eq!(read(&t.tmux_conf()), conf);
    assert_eq!(read(&t.secrets()), secrets);
}

#[test]
fn test_up_keeps_existing_lines() {
    let t = Test::ready();
    fs::write(t.profile(), "alias ll='ls -l'").unwrap();
    fs::write(t.tmux_conf(), "set -g mouse on\nset -g history-limit 5000\n").unwrap();

    assert_success(&t.up());

    let profile = read(&t.profile());
    assert!(profile.starts_with("alias ll='ls -l'\n"));
    let conf = read(&t.tmux_conf());
    assert!(conf.starts_with("set -g mouse on\nset -g history-limit 5000\n"));
    assert_line_once(&conf, "set -g mouse on");
}

#[test]
fn test_up_records_keys_from_environment() {
    let t = Test::ready();

    let output = t.up_with_env(&[("ANTHROPIC_API_KEY", "sk-ant-1"), ("GEMINI_API_KEY", "")]);
    assert_success(&output);

    let secrets = read(&t.secrets());
    assert_line_once(&secrets, "export ANTHROPIC_API_KEY=\"sk-ant-1\"");
    assert!(!secrets.contains("GEMINI_API_KEY"));
    assert!(!secrets.contains("OPENAI_API_KEY"));
    assert_stdout_contains(&output, "GEMINI_API_KEY not provided, skipped");

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = fs::metadata(t.secrets()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}

#[test]
fn test_up_never_overwrites_a_recorded_key() {
    let t = Test::ready();
    assert_success(&t.up_with_env(&[("ANTHROPIC_API_KEY", "first")]));

    let output = t.up_with_env(&[("ANTHROPIC_API_KEY", "second")]);
    assert_success(&output);

    let secrets = read(&t.secrets());
    assert_line_once(&secrets, "export ANTHROPIC_API_KEY=\"first\"");
    assert!(!secrets.contains("second"));
    assert_stdout_contains(&output, "keeping the saved one");
}

#[test]
fn test_up_installs_missing_tools_into_prefix() {
    let t = Test::new();
    t.install(&["node", "npm", "tmux"]);

    let output = t.up();
    assert_success(&output);

    let npm_calls = read(&t.home.path().join("npm-calls.log"));
    for (binary, package) in TOOL_PACKAGES {
        assert!(npm_calls.contains(&format!("install -g {}", package)));
        assert!(t
            .home
            .path()
            .join(".npm-global/bin")
            .join(binary)
            .exists());
    }
    assert_stdout_contains(&output, "claude installed");
}

#[test]
fn test_up_second_run_installs_nothing() {
    let t = Test::new();
    t.install(&["node", "npm", "tmux"]);
    assert_success(&t.up());

    let npm_log = t.home.path().join("npm-calls.log");
    fs::remove_file(&npm_log).unwrap();

    assert_success(&t.up());
    assert!(!read(&npm_log).contains("install"));
}

#[test]
fn test_up_failed_install_stops_before_tmux() {
    let t = Test::new();
    t.install(&["node", "npm", "tmux"]);

    let output = t.up_with_env(&[("FAKE_NPM_FAIL", "1")]);
    assert_failure(&output);
    assert_stderr_contains(&output, "failed to install claude");
    assert!(t.tmux_calls().is_empty());
    assert!(!t.tmux_conf().exists());
}

#[test]
fn test_up_without_node_or_package_manager_fails() {
    let t = Test::new();
    t.install(&["tmux"]);

    let output = t.up();
    assert_failure(&output);
    assert_eq!(output.status.code(), Some(1));
    assert_stderr_contains(&output, "no supported package manager found to install node");
    assert_stdout_contains(&output, "install node and tmux manually");
    assert!(!t.profile().exists());
}

#[test]
fn test_up_declines_existing_session_without_terminal() {
    let t = Test::ready();

    let output = t.up_with_env(&[("FAKE_TMUX_HAS_SESSION", "1")]);
    assert_success(&output);
    assert_stdout_contains(&output, "session agents already exists");
    assert_stdout_contains(&output, "agentmux attach");

    let calls = t.tmux_calls();
    assert!(!calls.iter().any(|c| c.starts_with("kill-session")));
    assert!(!calls.iter().any(|c| c.starts_with("new-session")));
}

#[test]
fn test_up_yes_recreates_existing_session() {
    let t = Test::ready();

    let output = t
        .cmd()
        .args(["up", "--yes", "--no-attach"])
        .env("FAKE_TMUX_HAS_SESSION", "1")
        .output()
        .unwrap();
    assert_success(&output);

    let calls = t.tmux_calls();
    let kill = calls
        .iter()
        .position(|c| c == "kill-session -t =agents")
        .expect("session was not killed");
    let create = calls
        .iter()
        .position(|c| c.starts_with("new-session"))
        .expect("session was not created");
    assert!(kill < create);
}

#[test]
fn test_up_uses_configured_names() {
    let t = Test::ready();
    t.write_config(CUSTOM_CONFIG);

    assert_success(&t.up());

    assert!(t
        .tmux_calls()
        .iter()
        .any(|c| c.starts_with("new-session -d -s pairing")));
    assert_line_once(
        &read(&t.profile()),
        "alias pair='tmux attach-session -t pairing'",
    );
}

#[test]
fn test_default_command_runs_up_and_attaches() {
    let t = Test::ready();

    let output = t.cmd().output().unwrap();
    assert_success(&output);
    assert_eq!(
        t.tmux_calls().last().map(String::as_str),
        Some("attach-session -t =agents")
    );
}

#[test]
fn test_up_reloads_tmux_conf_in_running_server() {
    let t = Test::ready();

    assert_success(&t.up_with_env(&[("FAKE_TMUX_HAS_SESSION", "1")]));
    let source = format!("source-file {}", t.tmux_conf().display());
    assert!(t.tmux_calls().contains(&source));

    fs::remove_file(t.tmux_log()).unwrap();
    assert_success(&t.up_with_env(&[("FAKE_TMUX_HAS_SESSION", "1")]));
    assert!(!t.tmux_calls().contains(&source));
}

#[test]
fn test_up_without_server_does_not_reload() {
    let t = Test::ready();
    assert_success(&t.up());

    assert!(!t
        .tmux_calls()
        .iter()
        .any(|c| c.starts_with("source-file")));
}

#[test]
fn test_up_rejects_multiline_key() {
    let t = Test::ready();

    let output = t.up_with_env(&[("OPENAI_API_KEY", "line1\nline2")]);
    assert_failure(&output);
    assert_stderr_contains(&output, "OPENAI_API_KEY");
    assert_stderr_contains(&output, "line break");
    assert!(!read(&t.secrets()).contains("line1"));
}
