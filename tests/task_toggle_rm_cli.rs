mod support;

use serde_json::Value;

use support::{add_task, parse_envelope, TestHome};

fn list_tasks(home: &TestHome) -> Vec<Value> {
    let output = home
        .cmd()
        .args(["list", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    parse_envelope(&output)["data"]["tasks"]
        .as_array()
        .expect("tasks array")
        .clone()
}

#[test]
fn toggle_completes_then_reopens() {
    let home = TestHome::new();
    let id = add_task(&home, "flip me");

    let output = home
        .cmd()
        .args(["toggle", &id, "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let value = parse_envelope(&output);
    assert_eq!(value["data"]["completed"].as_bool(), Some(true));
    assert_eq!(list_tasks(&home)[0]["completed"].as_bool(), Some(true));

    // Toggling twice restores the original state.
    let output = home
        .cmd()
        .args(["toggle", &id, "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let value = parse_envelope(&output);
    assert_eq!(value["data"]["completed"].as_bool(), Some(false));
    assert_eq!(list_tasks(&home)[0]["completed"].as_bool(), Some(false));
}

#[test]
fn toggle_unknown_id_is_a_noop_with_success_exit() {
    let home = TestHome::new();
    add_task(&home, "untouched");

    let output = home
        .cmd()
        .args(["toggle", "no-such-id", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let value = parse_envelope(&output);
    assert_eq!(value["data"]["found"].as_bool(), Some(false));
    assert_eq!(list_tasks(&home)[0]["completed"].as_bool(), Some(false));
}

#[test]
fn rm_deletes_and_is_idempotent() {
    let home = TestHome::new();
    let keep = add_task(&home, "keep");
    let gone = add_task(&home, "gone");

    let output = home
        .cmd()
        .args(["rm", &gone, "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    assert_eq!(
        parse_envelope(&output)["data"]["removed"].as_bool(),
        Some(true)
    );

    // Second removal of the same id changes nothing and still exits 0.
    let output = home
        .cmd()
        .args(["rm", &gone, "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    assert_eq!(
        parse_envelope(&output)["data"]["removed"].as_bool(),
        Some(false)
    );

    let tasks = list_tasks(&home);
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["id"].as_str(), Some(keep.as_str()));
}

#[test]
fn toggle_and_rm_emit_events() {
    let home = TestHome::new();
    let id = add_task(&home, "observed");
    let events_path = home.path().join("events.jsonl");

    home.cmd()
        .args(["toggle", &id, "--events"])
        .arg(&events_path)
        .assert()
        .success();

    home.cmd()
        .args(["rm", &id, "--events"])
        .arg(&events_path)
        .assert()
        .success();

    let contents = std::fs::read_to_string(&events_path).expect("events file");
    let kinds: Vec<String> = contents
        .lines()
        .map(|line| {
            let event: Value = serde_json::from_str(line).expect("event json");
            event["event"].as_str().expect("kind").to_string()
        })
        .collect();
    assert_eq!(kinds, ["task_toggled", "task_deleted"]);
}
