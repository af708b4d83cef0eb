//! End-to-end tests for the `tickets` binary.
//!
//! Each test runs the CLI as a subprocess against a ticket directory inside
//! its own temp dir.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Test Harness
// ---------------------------------------------------------------------------

/// Build a Command targeting the tickets binary, rooted in `dir`.
fn tickets(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("tickets"));
    cmd.current_dir(dir);
    cmd.env("TICKETS_LOG", "error");
    cmd.env_remove("TICKETS_DIR");
    cmd.env_remove("FORMAT");
    cmd
}

fn json_of(cmd: &mut Command) -> Value {
    let output = cmd.output().expect("command should not crash");
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout should be valid JSON")
}

fn create(dir: &Path, title: &str) -> String {
    let json = json_of(tickets(dir).args(["create", title, "--json"]));
    json["id"].as_str().expect("id field").to_string()
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

#[test]
fn create_assign_update_show_stats() {
    let tmp = TempDir::new().expect("tempdir");
    let dir = tmp.path();

    let created = json_of(tickets(dir).args([
        "create",
        "Fix login bug",
        "-b",
        "Users can't login with email",
        "--json",
    ]));
    let id = created["id"].as_str().expect("id").to_string();
    assert_eq!(id.len(), 8);
    assert_eq!(created["status"], "open");
    assert_eq!(created["assigned_to"], Value::Null);
    assert!(dir.join("tickets").join(format!("{id}.json")).is_file());

    let prefix = &id[..4];
    let assigned = json_of(tickets(dir).args(["assign", prefix, "w1", "--json"]));
    assert_eq!(assigned["auto_started"], true);
    assert_eq!(assigned["previous_assignee"], Value::Null);
    assert_eq!(assigned["ticket"]["status"], "in-progress");

    tickets(dir)
        .args(["comment", &id, "Started implementation, 50% done"])
        .assert()
        .success()
        .stdout(format!("Comment added to {id}\n"));

    let expected = format!("Status: in-progress -> done\nTicket {id} updated\n");
    tickets(dir)
        .args(["update", &id, "-s", "done", "--format", "text"])
        .assert()
        .success()
        .stdout(expected);

    let shown = json_of(tickets(dir).args(["show", &id, "--json"]));
    let actions: Vec<&str> = shown["history"]
        .as_array()
        .expect("history array")
        .iter()
        .map(|e| e["action"].as_str().expect("action"))
        .collect();
    assert_eq!(
        actions,
        [
            "created",
            "assigned",
            "status_change",
            "comment",
            "status_change"
        ]
    );
    assert_eq!(shown["history"][4]["from"], "in-progress");
    assert_eq!(shown["history"][4]["to"], "done");

    let stats = json_of(tickets(dir).args(["stats", "--json"]));
    assert_eq!(stats["total"], 1);
    assert_eq!(stats["by_status"]["done"], 1);
    assert_eq!(stats["by_status"]["open"], 0);
}

#[test]
fn create_with_assign_prints_status() {
    let tmp = TempDir::new().expect("tempdir");
    let assigned = "  Assigned: w1\n  Status: in-progress\n";
    tickets(tmp.path())
        .args(["create", "Add OAuth", "-a", "w1", "--format", "text"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Created ticket: "))
        .stdout(predicate::str::contains("  Title: Add OAuth\n"))
        .stdout(predicate::str::contains(assigned));
}

#[test]
fn reassign_reports_previous_worker() {
    let tmp = TempDir::new().expect("tempdir");
    let dir = tmp.path();
    let id = create(dir, "Shared work");

    tickets(dir).args(["assign", &id, "ann"]).assert().success();
    tickets(dir)
        .args(["assign", &id, "bob", "--format", "text"])
        .assert()
        .success()
        .stdout(format!("Reassigned {id}: ann -> bob\n"));
}

// ---------------------------------------------------------------------------
// Listing and stats
// ---------------------------------------------------------------------------

#[test]
fn list_rows_and_filters() {
    let tmp = TempDir::new().expect("tempdir");
    let dir = tmp.path();
    let a = create(dir, "First");
    let b = create(dir, "Second");
    tickets(dir).args(["assign", &b, "w1"]).assert().success();

    let open_row = format!("○ {a}: First [open] -> unassigned\n");
    let started_row = format!("◐ {b}: Second [in-progress] -> w1\n");
    tickets(dir)
        .args(["list", "--format", "text"])
        .assert()
        .success()
        .stdout(predicate::str::contains(open_row))
        .stdout(predicate::str::contains(started_row));

    let filtered = json_of(tickets(dir).args(["list", "-s", "in-progress", "--json"]));
    let ids: Vec<&str> = filtered
        .as_array()
        .expect("array")
        .iter()
        .map(|t| t["id"].as_str().expect("id"))
        .collect();
    assert_eq!(ids, [b.as_str()]);

    let by_worker = json_of(tickets(dir).args(["list", "-a", "nobody", "--json"]));
    assert_eq!(by_worker, Value::Array(vec![]));
}

#[test]
fn empty_store_messages() {
    let tmp = TempDir::new().expect("tempdir");
    tickets(tmp.path())
        .args(["list", "--format", "text"])
        .assert()
        .success()
        .stdout("No tickets\n");
    tickets(tmp.path())
        .args(["stats", "--format", "text"])
        .assert()
        .success()
        .stdout("No tickets\n");
}

// ---------------------------------------------------------------------------
// Failures
// ---------------------------------------------------------------------------

#[test]
fn missing_ticket_fails_with_message() {
    let tmp = TempDir::new().expect("tempdir");
    let message = "error: Ticket not found: deadbeef";
    tickets(tmp.path())
        .args(["show", "deadbeef", "--format", "text"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(message));
}

#[test]
fn ambiguous_prefix_lists_candidates() {
    let tmp = TempDir::new().expect("tempdir");
    let dir = tmp.path();

    // 17 IDs over 16 hex digits: at least two share a first character.
    let mut by_first: BTreeMap<char, Vec<String>> = BTreeMap::new();
    for n in 0..17 {
        let id = create(dir, &format!("ticket {n}"));
        let first = id.chars().next().expect("non-empty id");
        by_first.entry(first).or_default().push(id);
    }
    let (prefix, ids) = by_first
        .iter()
        .find(|(_, ids)| ids.len() > 1)
        .expect("pigeonhole");

    let message = format!("Ambiguous ID '{prefix}'");
    let assert = tickets(dir)
        .args(["show", &prefix.to_string(), "--format", "text"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(message));
    let output = assert.get_output();
    let stderr = String::from_utf8_lossy(&output.stderr);
    for id in ids {
        assert!(stderr.contains(id.as_str()), "missing {id}: {stderr}");
    }
}

#[test]
fn update_without_fields_is_rejected() {
    let tmp = TempDir::new().expect("tempdir");
    let dir = tmp.path();
    let id = create(dir, "Untouched");
    let path = dir.join("tickets").join(format!("{id}.json"));
    let before = std::fs::read(&path).expect("read");

    tickets(dir)
        .args(["update", &id])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Provide at least one update"));

    assert_eq!(std::fs::read(&path).expect("read"), before);
}

#[test]
fn invalid_status_is_rejected() {
    let tmp = TempDir::new().expect("tempdir");
    let dir = tmp.path();
    let id = create(dir, "Status check");

    tickets(dir)
        .args(["update", &id, "-s", "finished"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("finished"));

    let shown = json_of(tickets(dir).args(["show", &id, "--json"]));
    assert_eq!(shown["status"], "open");
}

#[test]
fn json_errors_go_to_stderr() {
    let tmp = TempDir::new().expect("tempdir");
    let output = tickets(tmp.path())
        .args(["show", "cafe", "--json"])
        .output()
        .expect("run");
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    let first_doc = stderr
        .split_inclusive("\n}\n")
        .next()
        .expect("error document");
    let err: Value = serde_json::from_str(first_doc).expect("json error");
    assert_eq!(err["error"]["error_code"], "E2001");
}

#[test]
fn empty_comment_is_recorded() {
    let tmp = TempDir::new().expect("tempdir");
    let dir = tmp.path();
    let id = create(dir, "Quiet worker");

    tickets(dir)
        .args(["comment", &id, ""])
        .assert()
        .success()
        .stdout(format!("Comment added to {id}\n"));

    let shown = json_of(tickets(dir).args(["show", &id, "--json"]));
    let last = &shown["history"][1];
    assert_eq!(last["action"], "comment");
    assert_eq!(last["details"], "");
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[test]
fn forced_delete_removes_ticket() {
    let tmp = TempDir::new().expect("tempdir");
    let dir = tmp.path();
    let id = create(dir, "Doomed");

    let deleted = json_of(tickets(dir).args(["delete", &id, "--force", "--json"]));
    assert_eq!(deleted["ok"], true);
    assert_eq!(deleted["id"], id.as_str());
    assert_eq!(deleted["title"], "Doomed");

    tickets(dir).args(["show", &id]).assert().failure();
    assert!(!dir.join("tickets").join(format!("{id}.json")).exists());
}

#[test]
fn delete_without_force_refuses_when_not_interactive() {
    let tmp = TempDir::new().expect("tempdir");
    let dir = tmp.path();
    let id = create(dir, "Keep me");

    tickets(dir)
        .args(["delete", &id])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));

    tickets(dir).args(["show", &id]).assert().success();
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[test]
fn dir_flag_and_env_select_store() {
    let tmp = TempDir::new().expect("tempdir");
    let dir = tmp.path();

    let args = ["create", "Elsewhere", "--dir", "board", "--json"];
    let json = json_of(tickets(dir).args(args));
    let id = json["id"].as_str().expect("id");
    assert!(dir.join("board").join(format!("{id}.json")).is_file());

    let mut list = tickets(dir);
    list.env("TICKETS_DIR", "board").args(["list", "--json"]);
    let listed = json_of(&mut list);
    assert_eq!(listed.as_array().expect("array").len(), 1);
}

#[test]
fn config_file_sets_store_dir() {
    let tmp = TempDir::new().expect("tempdir");
    let dir = tmp.path();
    std::fs::write(dir.join("tickets.toml"), "[store]\ndir = \"queue\"\n").expect("write");

    let id = create(dir, "Configured");
    assert!(dir.join("queue").join(format!("{id}.json")).is_file());
}

#[test]
fn completions_need_no_store() {
    let tmp = TempDir::new().expect("tempdir");
    tickets(tmp.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("tickets"));
    assert!(!tmp.path().join("tickets").exists());
}
