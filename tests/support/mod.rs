#![allow(dead_code)]

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use serde_json::Value;
use tempfile::TempDir;

/// Isolated data directory for one test, plus a command builder bound
/// to it.
pub struct TestHome {
    dir: TempDir,
}

impl TestHome {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("failed to create tempdir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Path of the persisted task snapshot.
    pub fn tasks_file(&self) -> PathBuf {
        self.dir.path().join("tasks.json")
    }

    pub fn write_config(&self, contents: &str) -> std::io::Result<()> {
        std::fs::write(self.dir.path().join("taskflow.toml"), contents)
    }

    /// Overwrite the snapshot directly, bypassing the CLI.
    pub fn write_tasks_raw(&self, contents: &str) -> std::io::Result<()> {
        std::fs::write(self.tasks_file(), contents)
    }

    pub fn read_tasks_raw(&self) -> std::io::Result<String> {
        std::fs::read_to_string(self.tasks_file())
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("taskflow").expect("binary");
        cmd.env("TASKFLOW_DATA_DIR", self.dir.path());
        cmd
    }
}

/// Run `taskflow add <title> --json` and return the new task's id.
pub fn add_task(home: &TestHome, title: &str) -> String {
    let output = home
        .cmd()
        .args(["add", title, "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let value: Value = serde_json::from_slice(&output).expect("add json");
    value["data"]["id"].as_str().expect("task id").to_string()
}

/// Parse a command's stdout as the JSON envelope.
pub fn parse_envelope(stdout: &[u8]) -> Value {
    serde_json::from_slice(stdout).expect("json envelope")
}
