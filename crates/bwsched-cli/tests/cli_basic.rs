//! Basic CLI E2E tests.
//!
//! Each test runs the built binary against its own config file.

use std::path::PathBuf;
use std::process::Command;

use tempfile::TempDir;

struct Sandbox {
    _dir: TempDir,
    config: PathBuf,
}

impl Sandbox {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let config = dir.path().join("config.toml");
        Self { _dir: dir, config }
    }

    /// Run a CLI command and return (exit code, stdout, stderr).
    fn run(&self, args: &[&str]) -> (i32, String, String) {
        let output = Command::new(env!("CARGO_BIN_EXE_bwsched"))
            .args(args)
            .env("BWSCHED_CONFIG", &self.config)
            .env_remove("RUST_LOG")
            .output()
            .expect("failed to execute bwsched");

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        (output.status.code().unwrap_or(-1), stdout, stderr)
    }

    fn ok(&self, args: &[&str]) -> String {
        let (code, stdout, stderr) = self.run(args);
        assert_eq!(code, 0, "bwsched {args:?} failed: {stderr}");
        stdout
    }

    fn resolve(&self, at: &str) -> serde_json::Value {
        serde_json::from_str(&self.ok(&["resolve", "--at", at])).unwrap()
    }
}

fn office_week(sandbox: &Sandbox) {
    sandbox.ok(&["profile", "add", "Work", "--download", "512", "--upload", "128"]);
    sandbox.ok(&["profile", "add", "Night"]);
    sandbox.ok(&["entry", "add", "08:00", "18:00", "--profile", "Work", "--days", "weekday"]);
    sandbox.ok(&["entry", "add", "18:00", "08:00", "--profile", "Night"]);
}

#[test]
fn first_run_creates_default_config() {
    let sandbox = Sandbox::new();
    let stdout = sandbox.ok(&["profile", "list"]);
    assert!(stdout.contains("Normal"));
    assert!(sandbox.config.exists());
}

#[test]
fn resolve_walks_the_week() {
    let sandbox = Sandbox::new();
    office_week(&sandbox);

    // 2026-10-20 is a Tuesday.
    let work = sandbox.resolve("2026-10-20 09:00");
    assert_eq!(work["profile"], "Work");
    assert_eq!(work["entry"], 1);
    assert_eq!(work["limits"]["download"], 512 * 1024);
    assert_eq!(work["limits"]["upload"], 128 * 1024);
    assert_eq!(work["alternative_limits"], true);

    let night = sandbox.resolve("2026-10-20 23:30");
    assert_eq!(night["profile"], "Night");
    assert_eq!(night["entry"], 2);
    assert_eq!(night["limits"]["download"], -1);
    assert_eq!(night["alternative_limits"], false);

    // Saturday daytime: nothing matches, default applies.
    let weekend = sandbox.resolve("2026-10-24 10:00");
    assert_eq!(weekend["profile"], "Normal");
    assert!(weekend["entry"].is_null());
}

#[test]
fn moving_an_entry_changes_the_winner() {
    let sandbox = Sandbox::new();
    office_week(&sandbox);
    sandbox.ok(&["entry", "add", "12:00", "13:00", "--profile", "Night", "--days", "tue"]);
    assert_eq!(sandbox.resolve("2026-10-20 12:30")["profile"], "Work");

    sandbox.ok(&["entry", "move", "3", "1"]);
    assert_eq!(sandbox.resolve("2026-10-20 12:30")["profile"], "Night");
}

#[test]
fn entry_requires_existing_profile() {
    let sandbox = Sandbox::new();
    let (code, _, stderr) = sandbox.run(&["entry", "add", "08:00", "09:00", "--profile", "Ghost"]);
    assert_eq!(code, 1);
    assert!(stderr.starts_with("error:"));
}

#[test]
fn profile_in_use_needs_force() {
    let sandbox = Sandbox::new();
    office_week(&sandbox);

    let (code, _, _) = sandbox.run(&["profile", "remove", "Work"]);
    assert_eq!(code, 1);

    sandbox.ok(&["profile", "remove", "Work", "--force"]);
    let listing = sandbox.ok(&["entry", "list"]);
    assert!(listing.contains("[missing profile]"));
}

#[test]
fn rename_repoints_entries() {
    let sandbox = Sandbox::new();
    office_week(&sandbox);
    sandbox.ok(&["profile", "edit", "Work", "--rename", "Office"]);
    assert_eq!(sandbox.resolve("2026-10-19 10:00")["profile"], "Office");
}

#[test]
fn config_set_and_get() {
    let sandbox = Sandbox::new();
    sandbox.ok(&["config", "set", "scheduler.start_time", "22:00"]);
    assert_eq!(sandbox.ok(&["config", "get", "scheduler.start_time"]).trim(), "22:00");

    let (code, _, _) = sandbox.run(&["config", "get", "no.such.key"]);
    assert_eq!(code, 1);

    let (code, _, _) = sandbox.run(&["config", "set", "scheduler.start_time", "late"]);
    assert_eq!(code, 1);
}

#[test]
fn config_set_refuses_profiles_and_entries() {
    let sandbox = Sandbox::new();
    office_week(&sandbox);

    let (code, _, stderr) = sandbox.run(&[
        "config",
        "set",
        "profiles",
        r#"[{"name":"","download":-7,"upload":-9}]"#,
    ]);
    assert_eq!(code, 1);
    assert!(stderr.starts_with("error:"));

    let (code, _, _) = sandbox.run(&["config", "set", "entries", "[]"]);
    assert_eq!(code, 1);
    let (code, _, _) = sandbox.run(&["config", "set", "default_profile", "Ghost"]);
    assert_eq!(code, 1);

    sandbox.ok(&["config", "set", "default_profile", "Night"]);
    assert_eq!(sandbox.resolve("2026-10-24 10:00")["profile"], "Night");
    assert_eq!(sandbox.resolve("2026-10-20 09:00")["profile"], "Work");
}
