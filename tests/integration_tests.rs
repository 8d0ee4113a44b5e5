//! Integration tests for backlogseed
//!
//! These drive the compiled binary end-to-end; everything remote is covered
//! by dry-run fabrication.

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

/// Helper to create a backlogseed Command
fn backlogseed() -> Command {
    cargo_bin_cmd!("backlogseed")
}

/// Helper to create a command isolated from the host's tracker configuration
fn isolated() -> Command {
    let mut cmd = backlogseed();
    for var in [
        "JIRA_URL",
        "JIRA_EMAIL",
        "JIRA_API_TOKEN",
        "PROJECT_KEY",
        "BOARD_ID",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

// =============================================================================
// Basic CLI Tests
// =============================================================================

mod cli_basics {
    use super::*;

    #[test]
    fn test_help() {
        backlogseed().arg("--help").assert().success();
    }

    #[test]
    fn test_version() {
        backlogseed().arg("--version").assert().success();
    }

    #[test]
    fn test_run_without_credentials_fails_fast() {
        let dir = TempDir::new().unwrap();
        isolated()
            .current_dir(dir.path())
            .arg("run")
            .assert()
            .failure()
            .stderr(predicate::str::contains("JIRA_URL"));
    }
}

// =============================================================================
// Dry-run Provisioning
// =============================================================================

mod dry_run {
    use super::*;

    #[test]
    fn test_dry_run_completes_and_writes_artifacts() {
        let dir = TempDir::new().unwrap();
        isolated()
            .current_dir(dir.path())
            .args(["run", "--dry-run"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Summary"))
            .stdout(predicate::str::contains("No failures."));

        assert!(dir.path().join("sprint1_report.json").exists());
        assert!(dir.path().join("velocity.json").exists());
    }

    #[test]
    fn test_dry_run_reports_sample_plan_counts() {
        let dir = TempDir::new().unwrap();
        isolated()
            .current_dir(dir.path())
            .args(["run", "--dry-run"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Epics:    5 created"))
            .stdout(predicate::str::contains("Stories:  15 created"))
            .stdout(predicate::str::contains("Subtasks: 45 created"));
    }

    #[test]
    fn test_missing_attachment_is_a_warning_not_a_failure() {
        let dir = TempDir::new().unwrap();
        isolated()
            .current_dir(dir.path())
            .args(["run", "--dry-run", "--attach", "does-not-exist.png"])
            .assert()
            .success()
            .stdout(predicate::str::contains("No failures."));
    }

    #[test]
    fn test_dry_run_with_custom_out_dir() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("reports");
        std::fs::create_dir(&out).unwrap();
        isolated()
            .current_dir(dir.path())
            .args(["run", "--dry-run", "--out-dir", "reports"])
            .assert()
            .success();
        assert!(out.join("sprint1_report.json").exists());
        assert!(out.join("velocity.json").exists());
    }
}

// =============================================================================
// Plan Commands
// =============================================================================

mod plan_commands {
    use super::*;

    #[test]
    fn test_plan_show_prints_builtin_sample() {
        isolated()
            .arg("plan")
            .assert()
            .success()
            .stdout(predicate::str::contains("Send money using UPI"))
            .stdout(predicate::str::contains("5 epics, 15 stories"));
    }

    #[test]
    fn test_plan_init_show_round_trip() {
        let dir = TempDir::new().unwrap();

        isolated()
            .current_dir(dir.path())
            .args(["plan", "init"])
            .assert()
            .success()
            .stdout(predicate::str::contains("seed.toml"));
        assert!(dir.path().join("seed.toml").exists());

        isolated()
            .current_dir(dir.path())
            .args(["plan", "show", "--plan", "seed.toml"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Mobile recharge"));

        // Driving a dry run from the file matches the built-in plan
        isolated()
            .current_dir(dir.path())
            .args(["run", "--dry-run", "--plan", "seed.toml"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Epics:    5 created"));
    }

    #[test]
    fn test_plan_init_refuses_to_overwrite() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("seed.toml"), "# hand-edited").unwrap();
        isolated()
            .current_dir(dir.path())
            .args(["plan", "init"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("already exists"));
    }

    #[test]
    fn test_plan_show_rejects_broken_file() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("bad.toml"), "stories = true").unwrap();
        isolated()
            .current_dir(dir.path())
            .args(["plan", "show", "--plan", "bad.toml"])
            .assert()
            .failure();
    }
}

// =============================================================================
// Config Commands
// =============================================================================

mod config_commands {
    use super::*;

    #[test]
    fn test_config_show_redacts_token() {
        isolated()
            .envs([
                ("JIRA_URL", "https://org.atlassian.net"),
                ("JIRA_EMAIL", "dev@example.com"),
                ("JIRA_API_TOKEN", "super-secret-token"),
            ])
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("https://org.atlassian.net"))
            .stdout(predicate::str::contains("********"))
            .stdout(predicate::str::contains("super-secret-token").not());
    }

    #[test]
    fn test_config_show_with_nothing_set() {
        isolated()
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("(unset)"))
            .stdout(predicate::str::contains("PHON"));
    }

    #[test]
    fn test_config_validate_fails_without_credentials() {
        isolated()
            .args(["config", "validate"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("JIRA_API_TOKEN"));
    }

    #[test]
    fn test_config_validate_passes_with_credentials() {
        isolated()
            .envs([
                ("JIRA_URL", "https://org.atlassian.net"),
                ("JIRA_EMAIL", "dev@example.com"),
                ("JIRA_API_TOKEN", "token"),
            ])
            .args(["config", "validate"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Configuration OK"));
    }
}
