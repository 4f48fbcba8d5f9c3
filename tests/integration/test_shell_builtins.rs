//! Integration Tests for the Command Shell
//!
//! Drive a [`Shell`] the way the front end does: submit typed lines, then
//! drain completions and inspect the output buffer.

#[path = "../test_utils/mod.rs"]
mod test_utils;

use std::fs;
use std::time::Duration;

use quill::{Dispatch, OutputKind, Shell, Verb};
use tempfile::TempDir;
use test_utils::{create_test_shell, lines_of, shell_config_in};
use tokio::time::timeout;

/// Wait for one completion, failing the test if none arrives
async fn expect_completion(shell: &mut Shell) {
    timeout(Duration::from_secs(10), shell.next_completion())
        .await
        .expect("completion should arrive")
        .expect("a job should be outstanding");
}

#[tokio::test]
async fn test_cd_parent_updates_cwd_and_history() {
    let dir = TempDir::new().unwrap();
    let sub = dir.path().join("sub");
    fs::create_dir(&sub).unwrap();
    let mut shell = create_test_shell(&sub);

    assert_eq!(shell.submit("cd .."), Dispatch::Builtin(Verb::Cd));
    assert_eq!(shell.session().cwd(), dir.path());
    assert_eq!(shell.session().history().last(), Some("cd .."));
    assert_eq!(shell.prompt(), format!("{}>", dir.path().display()));
}

#[tokio::test]
async fn test_cd_missing_reports_one_error() {
    let dir = TempDir::new().unwrap();
    let mut shell = create_test_shell(dir.path());

    assert_eq!(
        shell.submit("cd /does/not/exist"),
        Dispatch::Failed(Verb::Cd)
    );
    assert_eq!(shell.session().cwd(), dir.path());

    let errors = lines_of(&shell, OutputKind::Error);
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("does/not/exist"));
}

#[tokio::test]
async fn test_cd_to_file_is_rejected() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("notes.txt"), "x").unwrap();
    let mut shell = create_test_shell(dir.path());

    assert_eq!(shell.submit("cd notes.txt"), Dispatch::Failed(Verb::Cd));
    assert_eq!(shell.session().cwd(), dir.path());
    assert_eq!(lines_of(&shell, OutputKind::Error).len(), 1);
}

#[tokio::test]
async fn test_history_navigation() {
    let dir = TempDir::new().unwrap();
    let mut shell = create_test_shell(dir.path());
    for command in ["a", "b", "c"] {
        shell.submit(command);
    }

    assert_eq!(shell.history_previous().as_deref(), Some("c"));
    assert_eq!(shell.history_previous().as_deref(), Some("b"));
    assert_eq!(shell.history_previous().as_deref(), Some("a"));
    assert_eq!(shell.history_previous().as_deref(), Some("a"));

    assert_eq!(shell.history_next(), "b");
    assert_eq!(shell.history_next(), "c");
    assert_eq!(shell.history_next(), "");
    assert_eq!(shell.history_next(), "");
    shell.wait_idle().await;
}

#[tokio::test]
async fn test_python_missing_script_never_spawns() {
    let dir = TempDir::new().unwrap();
    let mut shell = create_test_shell(dir.path());

    assert_eq!(
        shell.submit("python missing.py"),
        Dispatch::Failed(Verb::Python)
    );
    assert_eq!(shell.running_jobs(), 0);
    assert_eq!(
        lines_of(&shell, OutputKind::Error),
        vec!["File not found: missing.py"]
    );
    assert_eq!(shell.next_completion().await, None);
}

#[cfg(unix)]
#[tokio::test]
async fn test_python_script_runs_asynchronously() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("script.py"), "sleep 0.2\necho hello\n").unwrap();
    let mut shell = create_test_shell(dir.path());

    let dispatch = shell.submit("python script.py");
    assert!(matches!(dispatch, Dispatch::Spawned(_)));
    assert_eq!(shell.running_jobs(), 1);
    assert!(lines_of(&shell, OutputKind::Stdout).is_empty());
    assert_eq!(
        lines_of(&shell, OutputKind::Info),
        vec!["Running script.py..."]
    );

    expect_completion(&mut shell).await;
    assert_eq!(lines_of(&shell, OutputKind::Stdout), vec!["hello"]);
    assert_eq!(shell.running_jobs(), 0);
}

#[cfg(unix)]
#[tokio::test]
async fn test_external_command_output_and_exit_code() {
    let dir = TempDir::new().unwrap();
    let mut shell = create_test_shell(dir.path());

    shell.submit("echo out; echo err >&2; exit 3");
    expect_completion(&mut shell).await;

    assert_eq!(lines_of(&shell, OutputKind::Stdout), vec!["out"]);
    assert_eq!(lines_of(&shell, OutputKind::Stderr), vec!["err"]);
    assert_eq!(
        lines_of(&shell, OutputKind::Info),
        vec!["Command exited with code: 3"]
    );
}

#[cfg(unix)]
#[tokio::test]
async fn test_external_runs_in_session_cwd() {
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join("inner")).unwrap();
    let mut shell = create_test_shell(dir.path());

    shell.submit("cd inner");
    shell.submit("pwd -P");
    expect_completion(&mut shell).await;

    let printed = lines_of(&shell, OutputKind::Stdout);
    assert_eq!(printed.len(), 1);
    assert!(printed[0].ends_with("inner"));
}

#[cfg(unix)]
#[tokio::test]
async fn test_spawn_failure_arrives_as_completion() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("job.py"), "print('x')\n").unwrap();
    let config = quill::ShellConfig {
        python_executable: "definitely-not-a-python-xyz".to_string(),
        ..shell_config_in(dir.path())
    };
    let mut shell = Shell::new(config).unwrap();

    assert!(matches!(shell.submit("python job.py"), Dispatch::Spawned(_)));
    expect_completion(&mut shell).await;

    let stderr = lines_of(&shell, OutputKind::Stderr);
    assert_eq!(stderr.len(), 1);
    assert!(stderr[0].contains("Failed to spawn command 'python job.py'"));
    assert!(!lines_of(&shell, OutputKind::Info)
        .iter()
        .any(|l| l.starts_with("Command exited")));
}

#[tokio::test]
async fn test_ls_lists_sorted_entries() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("main.py"), "").unwrap();
    fs::create_dir(dir.path().join("pkg")).unwrap();
    fs::write(dir.path().join("README"), "").unwrap();
    let mut shell = create_test_shell(dir.path());

    assert_eq!(shell.submit("ls"), Dispatch::Builtin(Verb::List));
    assert_eq!(
        lines_of(&shell, OutputKind::Stdout),
        vec!["README", "main.py", "pkg/"]
    );

    shell.output_mut().clear();
    assert_eq!(shell.submit("dir"), Dispatch::Builtin(Verb::List));
    assert_eq!(lines_of(&shell, OutputKind::Stdout).len(), 3);
}

#[tokio::test]
async fn test_help_and_clear() {
    let dir = TempDir::new().unwrap();
    let mut shell = create_test_shell(dir.path());

    shell.submit("help");
    let info = lines_of(&shell, OutputKind::Info);
    assert!(info.iter().any(|l| l.contains("python <file>")));

    shell.submit("clear");
    assert!(shell.output().is_empty());
}

#[tokio::test]
async fn test_echo_precedes_command_output() {
    let dir = TempDir::new().unwrap();
    let mut shell = create_test_shell(dir.path());

    shell.submit("  pwd  ");
    let lines: Vec<_> = shell.output().lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].kind, OutputKind::Echo);
    assert_eq!(lines[0].text, format!("{}> pwd", dir.path().display()));
    assert_eq!(lines[1].kind, OutputKind::Stdout);
    assert_eq!(shell.session().history().last(), Some("pwd"));
}

#[cfg(unix)]
#[tokio::test]
async fn test_stop_cancels_running_commands() {
    let dir = TempDir::new().unwrap();
    let mut shell = create_test_shell(dir.path());

    shell.submit("sleep 30");
    shell.submit("sleep 31");
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(shell.stop(), 2);

    timeout(Duration::from_secs(5), shell.wait_idle())
        .await
        .expect("stopped jobs should report promptly");

    let info = lines_of(&shell, OutputKind::Info);
    assert!(info.contains(&"Stopping 2 running command(s)".to_string()));
    assert!(info.contains(&"Stopped: sleep 30".to_string()));
    assert!(info.contains(&"Stopped: sleep 31".to_string()));
    assert_eq!(shell.running_jobs(), 0);
}

#[cfg(unix)]
#[tokio::test]
async fn test_command_timeout() {
    let dir = TempDir::new().unwrap();
    let config = quill::ShellConfig {
        command_timeout_ms: Some(100),
        ..shell_config_in(dir.path())
    };
    let mut shell = Shell::new(config).unwrap();

    shell.submit("sleep 30");
    expect_completion(&mut shell).await;
    assert_eq!(
        lines_of(&shell, OutputKind::Error),
        vec!["Command timed out: sleep 30"]
    );
}

#[cfg(unix)]
#[tokio::test]
async fn test_concurrent_output_stays_contiguous() {
    let dir = TempDir::new().unwrap();
    let mut shell = create_test_shell(dir.path());

    shell.submit("sleep 0.2; echo slow1; echo slow2");
    shell.submit("echo fast1; echo fast2");
    shell.wait_idle().await;

    let stdout = lines_of(&shell, OutputKind::Stdout);
    assert_eq!(stdout, vec!["fast1", "fast2", "slow1", "slow2"]);
}

#[tokio::test]
async fn test_history_persists_across_shells() {
    let dir = TempDir::new().unwrap();
    let history_file = dir.path().join("history");
    let config = quill::ShellConfig {
        history_file: Some(history_file.clone()),
        ..shell_config_in(dir.path())
    };

    {
        let mut shell = Shell::new(config.clone()).unwrap();
        shell.submit("pwd");
        shell.submit("help");
    }

    let mut shell = Shell::new(config).unwrap();
    assert_eq!(shell.session().history().len(), 2);
    assert_eq!(shell.history_previous().as_deref(), Some("help"));
}
