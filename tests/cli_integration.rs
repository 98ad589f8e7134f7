//! CLI Integration Tests
//!
//! Tests the command-line interface end-to-end against a throwaway data
//! directory and config file.

use assert_cmd::Command;
use assert_fs::prelude::*;
use assert_fs::TempDir;
use predicates::prelude::*;

const QUIET_CONFIG: &str = "[general]\nseed_demo = false\n\n[ai]\nenabled = false\n";

/// Get the binary to test.
fn devdeck() -> Command {
    Command::cargo_bin("devdeck").unwrap()
}

/// An isolated workspace: its own data dir, config file and cwd.
struct Deck {
    dir: TempDir,
}

impl Deck {
    fn new() -> Self {
        Self::with_config(QUIET_CONFIG)
    }

    fn with_config(config: &str) -> Self {
        let dir = TempDir::new().unwrap();
        dir.child("config.toml").write_str(config).unwrap();
        dir.child("data").create_dir_all().unwrap();
        Self { dir }
    }

    fn cmd(&self) -> Command {
        let mut cmd = devdeck();
        cmd.current_dir(self.dir.path())
            .env("DEVDECK_DATA_DIR", self.dir.child("data").path())
            .env("DEVDECK_CONFIG", self.dir.child("config.toml").path())
            .env_remove("RUST_LOG");
        cmd
    }

    fn add(&self, args: &[&str]) {
        self.cmd().arg("add").args(args).assert().success();
    }

    fn list_json(&self) -> Vec<serde_json::Value> {
        let output = self.cmd().args(["list", "--format", "json"]).output().unwrap();
        assert!(output.status.success());
        serde_json::from_slice(&output.stdout).unwrap()
    }
}

// ============================================================================
// Help & Version Tests
// ============================================================================

#[test]
fn test_help_flag() {
    devdeck()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Shortcuts to your local development projects"));
}

#[test]
fn test_version_flag() {
    devdeck()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_unknown_subcommand_fails() {
    devdeck().arg("frobnicate").assert().failure();
}

// ============================================================================
// List & Seeding Tests
// ============================================================================

#[test]
fn test_list_empty() {
    Deck::new().cmd().arg("list").assert().success().stdout(predicate::str::contains("Total: 0 shortcuts"));
}

#[test]
fn test_first_run_seeds_demo() {
    let deck = Deck::with_config("");
    deck.cmd()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("My Awesome Project"))
        .stdout(predicate::str::contains(":3000"));

    deck.dir.child("data/devdeck-shortcuts.json").assert(predicate::path::exists());

    // Deleting the demo leaves an empty deck that stays empty
    deck.cmd().args(["remove", "demo-1", "-y"]).assert().success();
    deck.cmd().arg("list").assert().success().stdout(predicate::str::contains("Total: 0 shortcuts"));
}

#[test]
fn test_corrupt_storage_is_not_fatal() {
    let deck = Deck::new();
    deck.dir.child("data/devdeck-shortcuts.json").write_str("{ not json").unwrap();
    deck.cmd().arg("list").assert().success().stdout(predicate::str::contains("Total: 0 shortcuts"));
}

#[test]
fn test_list_json_uses_camel_case() {
    let deck = Deck::new();
    deck.add(&["--name", "Blog", "--path", "/srv/blog", "--port", "4000"]);

    let shortcuts = deck.list_json();
    assert_eq!(shortcuts.len(), 1);
    let blog = &shortcuts[0];
    assert_eq!(blog["name"], "Blog");
    assert_eq!(blog["command"], "npm run dev");
    assert_eq!(blog["port"], "4000");
    assert_eq!(blog["icon"], "terminal");
    assert!(blog["createdAt"].is_i64());
}

#[test]
fn test_list_filter() {
    let deck = Deck::new();
    deck.add(&["--name", "Blog", "--path", "/srv/blog"]);
    deck.add(&["--name", "Shop", "--path", "/srv/store"]);

    deck.cmd()
        .args(["list", "--filter", "STORE"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Shop"))
        .stdout(predicate::str::contains("Blog").not());
}

// ============================================================================
// Add / Edit / Remove Tests
// ============================================================================

#[test]
fn test_add_keeps_insertion_order() {
    let deck = Deck::new();
    deck.add(&["--name", "First", "--path", "/a"]);
    deck.add(&["--name", "Second", "--path", "/b", "--command", "cargo run", "--icon", "server"]);

    let shortcuts = deck.list_json();
    let names: Vec<_> = shortcuts.iter().map(|s| s["name"].as_str().unwrap()).collect();
    assert_eq!(names, ["First", "Second"]);
    assert_eq!(shortcuts[1]["icon"], "server");
    assert_ne!(shortcuts[0]["id"], shortcuts[1]["id"]);
    assert!(shortcuts[0]["createdAt"].as_i64() <= shortcuts[1]["createdAt"].as_i64());
}

#[test]
fn test_add_auto_port() {
    let deck = Deck::new();
    deck.add(&["--name", "One", "--path", "/a", "--auto-port"]);
    deck.add(&["--name", "Two", "--path", "/b", "--auto-port"]);

    let shortcuts = deck.list_json();
    assert_eq!(shortcuts[0]["port"], "3000");
    assert_eq!(shortcuts[1]["port"], "3001");
}

#[test]
fn test_add_requires_path() {
    let deck = Deck::new();
    deck.cmd()
        .args(["add", "--name", "Blog", "--path", "   "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("path is required"));
    assert!(deck.list_json().is_empty());
}

#[test]
fn test_add_rejects_bad_port() {
    Deck::new()
        .cmd()
        .args(["add", "--name", "Blog", "--path", "/srv/blog", "--port", "http"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid port"));
}

#[test]
fn test_add_warns_on_duplicate_port() {
    let deck = Deck::new();
    deck.add(&["--name", "One", "--path", "/a", "--port", "3000"]);
    deck.cmd()
        .args(["add", "--name", "Two", "--path", "/b", "--port", "3000"])
        .assert()
        .success()
        .stderr(predicate::str::contains("already used"));
    assert_eq!(deck.list_json().len(), 2);
}

#[test]
fn test_edit_fields() {
    let deck = Deck::new();
    deck.add(&["--name", "Blog", "--path", "/srv/blog", "--port", "4000"]);
    let before = deck.list_json().remove(0);

    deck.cmd()
        .args(["edit", "blog", "--command", "hugo server", "--clear-port"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated Blog"));

    let after = deck.list_json().remove(0);
    assert_eq!(after["command"], "hugo server");
    assert!(after.get("port").is_none());
    assert_eq!(after["id"], before["id"]);
    assert_eq!(after["createdAt"], before["createdAt"]);
}

#[test]
fn test_icon_file_is_embedded() {
    let deck = Deck::new();
    deck.dir.child("logo.svg").write_str("<svg/>").unwrap();
    deck.add(&["--name", "Blog", "--path", "/srv/blog", "--icon-file", "logo.svg"]);

    let shortcut = deck.list_json().remove(0);
    assert_eq!(shortcut["icon"], "data:image/svg+xml;base64,PHN2Zy8+");

    deck.cmd().args(["edit", "Blog", "--icon", "zap"]).assert().success();
    assert_eq!(deck.list_json()[0]["icon"], "zap");
}

#[test]
fn test_icon_file_must_be_an_image() {
    let deck = Deck::new();
    deck.dir.child("notes.txt").write_str("hello").unwrap();
    deck.cmd()
        .args(["add", "--name", "Blog", "--path", "/srv/blog", "--icon-file", "notes.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not an image"));
    assert!(deck.list_json().is_empty());
}

#[test]
fn test_edit_without_changes_fails() {
    let deck = Deck::new();
    deck.add(&["--name", "Blog", "--path", "/srv/blog"]);
    deck.cmd().args(["edit", "Blog"]).assert().failure().stderr(predicate::str::contains("Nothing to change"));
}

#[test]
fn test_edit_unknown_shortcut() {
    Deck::new()
        .cmd()
        .args(["edit", "ghost", "--name", "x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No shortcut matching 'ghost'"));
}

#[test]
fn test_remove_with_yes() {
    let deck = Deck::new();
    deck.add(&["--name", "Blog", "--path", "/srv/blog"]);
    deck.cmd().args(["remove", "Blog", "-y"]).assert().success().stdout(predicate::str::contains("Removed Blog"));
    assert!(deck.list_json().is_empty());
}

#[test]
fn test_remove_can_be_cancelled() {
    let deck = Deck::new();
    deck.add(&["--name", "Blog", "--path", "/srv/blog"]);
    deck.cmd()
        .args(["remove", "Blog"])
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Cancelled"));
    assert_eq!(deck.list_json().len(), 1);
}

// ============================================================================
// Script Tests
// ============================================================================

#[test]
fn test_script_to_stdout() {
    let deck = Deck::new();
    deck.add(&["--name", "Blog", "--path", "/srv/blog", "--port", "4000", "--command", "hugo server"]);

    deck.cmd()
        .args(["script", "Blog", "--stdout"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("#!/bin/bash\n"))
        .stdout(predicate::str::contains("open \"http://localhost:4000\""))
        .stdout(predicate::str::contains("cd \"/srv/blog\" || {"))
        .stdout(predicate::str::ends_with("hugo server\n"));
}

#[test]
fn test_script_without_port_skips_browser() {
    let deck = Deck::new();
    deck.add(&["--name", "Worker", "--path", "/srv/worker"]);
    deck.cmd()
        .args(["script", "Worker", "--stdout"])
        .assert()
        .success()
        .stdout(predicate::str::contains("localhost").not());
}

#[test]
fn test_script_uses_configured_opener() {
    let deck = Deck::with_config("[general]\nseed_demo = false\n\n[script]\nopener = \"xdg-open\"\n");
    deck.add(&["--name", "Blog", "--path", "/srv/blog", "--port", "4000"]);
    deck.cmd()
        .args(["script", "Blog", "--stdout"])
        .assert()
        .success()
        .stdout(predicate::str::contains("xdg-open \"http://localhost:4000\""));
}

#[test]
fn test_script_writes_file() {
    let deck = Deck::new();
    deck.add(&["--name", "My Blog", "--path", "/srv/blog"]);
    let out = deck.dir.child("launchers");

    deck.cmd()
        .args(["script", "My Blog", "--output"])
        .arg(out.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("My-Blog.command"));

    let script = out.child("My-Blog.command");
    script.assert(predicate::str::contains("npm run dev"));

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = std::fs::metadata(script.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
    }
}

#[cfg(unix)]
#[test]
fn test_written_script_runs() {
    use assert_cmd::assert::OutputAssertExt;

    let deck = Deck::new();
    let project = deck.dir.child("project");
    project.create_dir_all().unwrap();
    let project_path = project.path().to_str().unwrap();
    deck.add(&["--name", "Here", "--path", project_path, "--command", "echo ran-here"]);
    deck.add(&["--name", "Gone", "--path", "/nonexistent/devdeck-gone", "--command", "echo ran-gone"]);
    let out = deck.dir.child("launchers");

    for name in ["Here", "Gone"] {
        deck.cmd().args(["script", name, "--output"]).arg(out.path()).assert().success();
    }

    std::process::Command::new("sh")
        .arg(out.child("Here.command").path())
        .assert()
        .success()
        .stdout(predicate::str::ends_with("ran-here\n"));

    std::process::Command::new("sh")
        .arg(out.child("Gone.command").path())
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Directory not found: /nonexistent/devdeck-gone"))
        .stdout(predicate::str::contains("ran-gone").not());
}

// ============================================================================
// Suggestion Tests
// ============================================================================

#[test]
fn test_suggest_port() {
    let deck = Deck::new();
    deck.cmd().arg("suggest-port").assert().success().stdout("3000\n");

    deck.add(&["--name", "Blog", "--path", "/srv/blog", "--port", "3000"]);
    deck.cmd().arg("suggest-port").assert().success().stdout("3001\n");
    deck.cmd().args(["suggest-port", "--exclude", "Blog"]).assert().success().stdout("3000\n");
}

#[test]
fn test_suggest_without_provider_uses_default() {
    Deck::new()
        .cmd()
        .args(["suggest", "--name", "Blog", "--path", "/srv/blog"])
        .assert()
        .success()
        .stdout("npm run dev\n");
}

#[test]
fn test_suggest_uses_configured_default() {
    Deck::with_config("[ai]\nenabled = false\ndefault_command = \"make dev\"\n")
        .cmd()
        .args(["suggest", "--path", "/srv/blog"])
        .assert()
        .success()
        .stdout("make dev\n");
}

#[test]
fn test_suggest_needs_context() {
    Deck::new().cmd().arg("suggest").assert().failure();
}

#[test]
fn test_add_with_suggest_falls_back() {
    let deck = Deck::new();
    deck.add(&["--name", "Api", "--path", "/srv/api", "--suggest"]);
    assert_eq!(deck.list_json()[0]["command"], "npm run dev");
}

// ============================================================================
// Misc Commands
// ============================================================================

#[test]
fn test_completions_bash() {
    devdeck().args(["completions", "bash"]).assert().success().stdout(predicate::str::contains("devdeck"));
}

#[test]
fn test_config_shows_sections() {
    Deck::new()
        .cmd()
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("[general]"))
        .stdout(predicate::str::contains("seed_demo = false"));
}

#[test]
fn test_invalid_config_is_reported() {
    Deck::with_config("[ui\n")
        .cmd()
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("config.toml"));
}
