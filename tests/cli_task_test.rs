//! Integration tests for task CRUD operations via CLI.
//!
//! These tests verify that task commands work correctly through the CLI:
//! - `gv add/list/show/rename/toggle/delete` all work
//! - JSON and human-readable output formats are correct
//! - Nesting, display order, and per-list isolation behave
//! - Errors land on stderr with exit code 1

mod common;

use common::{TestEnv, extract_id};
use predicates::prelude::*;

// === Add Tests ===

#[test]
fn test_add_task_json() {
    let env = TestEnv::new();

    env.gv()
        .args(["add", "My first task"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"id\":\"gv-"))
        .stdout(predicate::str::contains("\"label\":\"My first task\""))
        .stdout(predicate::str::contains("\"completed\":false"));
}

#[test]
fn test_add_task_human() {
    let env = TestEnv::new();

    env.gv()
        .args(["-H", "add", "My first task"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added gv-"))
        .stdout(predicate::str::contains("My first task"));
}

#[test]
fn test_add_trims_label() {
    let env = TestEnv::new();

    env.gv()
        .args(["add", "  padded  "])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"label\":\"padded\""));
}

#[test]
fn test_add_empty_label_fails() {
    let env = TestEnv::new();

    env.gv()
        .args(["add", "   "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("label cannot be empty"));

    // Nothing was persisted
    env.gv()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"total\":0"));
}

#[test]
fn test_add_under_parent() {
    let env = TestEnv::new();
    let parent = env.add_task("Parent", None);

    env.gv()
        .args(["add", "Child", "--under", &parent])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("\"parent\":\"{parent}\"")));

    env.gv()
        .args(["show", &parent])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"has_children\":true"));
}

#[test]
fn test_add_under_missing_parent_fails() {
    let env = TestEnv::new();

    env.gv()
        .args(["add", "Orphan", "--under", "gv-ffffff"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Task not found: gv-ffffff"));
}

// === List Tests ===

#[test]
fn test_list_empty() {
    let env = TestEnv::new();

    env.gv()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"total\":0"))
        .stdout(predicate::str::contains("\"tasks\":[]"));
}

#[test]
fn test_list_empty_human() {
    let env = TestEnv::new();

    env.gv()
        .args(["-H", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("inbox: no tasks"));
}

#[test]
fn test_list_renders_nested_tree_human() {
    let env = TestEnv::new();
    let parent = env.add_task("Parent", None);
    env.add_task("Child", Some(&parent));

    env.gv()
        .args(["-H", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("inbox: 2 tasks"))
        .stdout(predicate::str::contains("[ ] Parent (gv-"))
        .stdout(predicate::str::contains("  [ ] Child (gv-"));
}

#[test]
fn test_list_completed_sink_to_bottom() {
    let env = TestEnv::new();
    let first = env.add_task("First", None);
    env.add_task("Second", None);

    env.gv().args(["toggle", &first]).assert().success();

    let output = env.gv().arg("list").output().unwrap();
    let parsed: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("list output should be JSON");
    let labels: Vec<&str> = parsed["tasks"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["label"].as_str().unwrap())
        .collect();
    assert_eq!(labels, vec!["Second", "First"]);
}

#[test]
fn test_list_under_subtree() {
    let env = TestEnv::new();
    let parent = env.add_task("Parent", None);
    env.add_task("Sibling", None);
    env.add_task("Child", Some(&parent));

    env.gv()
        .args(["list", "--under", &parent])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"total\":2"))
        .stdout(predicate::str::contains("Child"))
        .stdout(predicate::str::contains("Sibling").not());
}

#[test]
fn test_list_under_missing_id_fails() {
    let env = TestEnv::new();

    env.gv()
        .args(["list", "--under", "gv-ffffff"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Task not found"));
}

#[test]
fn test_bare_gv_shows_list() {
    let env = TestEnv::new();
    env.add_task("Something", None);

    env.gv()
        .assert()
        .success()
        .stdout(predicate::str::contains("\"total\":1"));
}

// === Show Tests ===

#[test]
fn test_show_task() {
    let env = TestEnv::new();
    let parent = env.add_task("Parent", None);
    let child = env.add_task("Child", Some(&parent));

    env.gv()
        .args(["show", &child])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"label\":\"Child\""))
        .stdout(predicate::str::contains(format!("\"parent\":\"{parent}\"")))
        .stdout(predicate::str::contains("\"subtree_size\":1"));

    env.gv()
        .args(["-H", "show", &parent])
        .assert()
        .success()
        .stdout(predicate::str::contains("Parent [open]"))
        .stdout(predicate::str::contains("Sub-tasks: 1 direct"));
}

#[test]
fn test_show_not_found() {
    let env = TestEnv::new();

    env.gv()
        .args(["show", "gv-ffffff"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Task not found: gv-ffffff"));
}

// === Rename Tests ===

#[test]
fn test_rename_task() {
    let env = TestEnv::new();
    let id = env.add_task("Original", None);

    env.gv()
        .args(["rename", &id, "Updated"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"label\":\"Updated\""))
        .stdout(predicate::str::contains("\"previous\":\"Original\""));

    env.gv()
        .args(["show", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"label\":\"Updated\""));
}

#[test]
fn test_rename_empty_label_fails() {
    let env = TestEnv::new();
    let id = env.add_task("Keep me", None);

    env.gv()
        .args(["rename", &id, "  "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("label cannot be empty"));

    env.gv()
        .args(["show", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"label\":\"Keep me\""));
}

// === Toggle Tests ===

#[test]
fn test_toggle_roundtrip() {
    let env = TestEnv::new();
    let id = env.add_task("Flip me", None);

    env.gv()
        .args(["toggle", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"completed\":true"));

    env.gv()
        .args(["toggle", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"completed\":false"));
}

#[test]
fn test_toggle_human_wording() {
    let env = TestEnv::new();
    let id = env.add_task("Flip me", None);

    env.gv()
        .args(["-H", "toggle", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("Completed gv-"));

    env.gv()
        .args(["-H", "toggle", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("Reopened gv-"));
}

// === Delete Tests ===

#[test]
fn test_delete_removes_whole_subtree() {
    let env = TestEnv::new();
    let parent = env.add_task("Parent", None);
    let child = env.add_task("Child", Some(&parent));
    env.add_task("Grandchild", Some(&child));

    env.gv()
        .args(["delete", &parent])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"removed\":3"));

    env.gv()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"total\":0"));

    env.gv()
        .args(["show", &child])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Task not found"));
}

#[test]
fn test_delete_not_found() {
    let env = TestEnv::new();

    env.gv()
        .args(["delete", "gv-ffffff"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Task not found"));
}

// === List Selection Tests ===

#[test]
fn test_lists_are_isolated() {
    let env = TestEnv::new();

    env.gv()
        .args(["-l", "work", "add", "Work thing"])
        .assert()
        .success();
    env.gv().args(["add", "Inbox thing"]).assert().success();

    env.gv()
        .args(["-l", "work", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Work thing"))
        .stdout(predicate::str::contains("Inbox thing").not());

    env.gv()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Inbox thing"))
        .stdout(predicate::str::contains("Work thing").not());
}

#[test]
fn test_list_from_env_var() {
    let env = TestEnv::new();

    env.gv()
        .env("GV_LIST", "home")
        .args(["add", "Mow lawn"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"list\":\"home\""));

    env.gv()
        .env("GV_LIST", "home")
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Mow lawn"));
}

#[test]
fn test_flag_beats_env_var() {
    let env = TestEnv::new();

    env.gv()
        .env("GV_LIST", "home")
        .args(["-l", "work", "add", "Report"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"list\":\"work\""));
}

#[test]
fn test_invalid_list_name_fails() {
    let env = TestEnv::new();

    for bad in ["bad name", "../evil", "dotted.name", "_leading", ""] {
        env.gv()
            .args(["-l", bad, "list"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid list name"));
    }
}

// === Error Shape Tests ===

#[test]
fn test_error_shape_json_and_human() {
    let env = TestEnv::new();

    env.gv()
        .args(["show", "gv-ffffff"])
        .assert()
        .failure()
        .stderr(predicate::str::starts_with("{\"error\": \""));

    env.gv()
        .args(["-H", "show", "gv-ffffff"])
        .assert()
        .failure()
        .stderr(predicate::str::starts_with("Error: "));
}

// === Persistence Tests ===

#[test]
fn test_state_survives_across_invocations() {
    let env = TestEnv::new();
    let id = env.add_task("Durable", None);

    // Each gv() call is a separate process; the document carries state.
    env.gv().args(["toggle", &id]).assert().success();
    env.gv()
        .args(["show", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"completed\":true"));

    // The document files exist where we expect them.
    assert!(env.data_path().join("inbox.json").exists());
    assert!(env.data_path().join("inbox.history.json").exists());
}

#[test]
fn test_ids_are_unique_across_adds() {
    let env = TestEnv::new();

    let mut ids = std::collections::HashSet::new();
    for i in 0..10 {
        let output = env
            .gv()
            .args(["add", &format!("Task {i}")])
            .output()
            .unwrap();
        assert!(output.status.success());
        let id = extract_id(&String::from_utf8_lossy(&output.stdout));
        assert!(ids.insert(id), "duplicate id generated");
    }
}
