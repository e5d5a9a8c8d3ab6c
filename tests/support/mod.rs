#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use serde_json::Value;
use tempfile::TempDir;

/// Isolated data and config directory for one test.
pub struct TestDesk {
    dir: TempDir,
}

impl TestDesk {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("failed to create tempdir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn config_path(&self) -> PathBuf {
        self.dir.path().join("config.toml")
    }

    pub fn store_path(&self) -> PathBuf {
        self.dir.path().join("serverManagementData.json")
    }

    /// Command with data and config pinned to this desk.
    pub fn cmd(&self) -> Command {
        let mut cmd = serverdesk_cmd();
        cmd.env("SERVERDESK_DATA_DIR", self.dir.path())
            .env("SERVERDESK_CONFIG", self.config_path());
        cmd
    }

    pub fn write_config(&self, contents: &str) -> PathBuf {
        let path = self.config_path();
        fs::write(&path, contents).expect("write config");
        path
    }

    pub fn write_store(&self, contents: &str) {
        fs::write(self.store_path(), contents).expect("write store");
    }

    pub fn read_store(&self) -> Value {
        let raw = fs::read_to_string(self.store_path()).expect("read store");
        serde_json::from_str(&raw).expect("store is json")
    }

    /// Run a command with `--json` and return the parsed envelope.
    pub fn json(&self, args: &[&str]) -> Value {
        let output = self
            .cmd()
            .args(args)
            .arg("--json")
            .output()
            .expect("run serverdesk");
        serde_json::from_slice(&output.stdout).expect("json envelope")
    }

    pub fn add_server(&self, name: &str) {
        self.cmd().args(["server", "add", name]).assert().success();
    }
}

pub fn serverdesk_cmd() -> Command {
    let mut cmd = Command::cargo_bin("serverdesk").expect("serverdesk binary");
    cmd.env_remove("SERVERDESK_SERVER")
        .env_remove("SERVERDESK_DATA_DIR")
        .env_remove("SERVERDESK_CONFIG")
        .env_remove("RUST_LOG");
    cmd
}
