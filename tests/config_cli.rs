mod support;

use predicates::str::contains;

use support::TestDesk;

#[test]
fn custom_storage_key_changes_store_file() {
    let desk = TestDesk::new();
    desk.write_config("[storage]\nkey = \"labServers\"\n");
    desk.add_server("Alpha");

    assert!(desk.path().join("labServers.json").exists());
    assert!(!desk.store_path().exists());

    let envelope = desk.json(&["config", "show"]);
    assert_eq!(envelope["data"]["exists"], true);
    assert_eq!(envelope["data"]["config"]["storage"]["key"], "labServers");
    assert!(envelope["data"]["store_file"]
        .as_str()
        .unwrap()
        .ends_with("labServers.json"));
}

#[test]
fn config_show_defaults_when_file_missing() {
    let desk = TestDesk::new();
    desk.cmd()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(contains("- storage.key: serverManagementData"))
        .stdout(contains("- desk.default_server: (first server)"))
        .stdout(contains("config file not found; using defaults"));
}

#[test]
fn config_path_prints_location() {
    let desk = TestDesk::new();
    desk.cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(contains("config.toml"));
}

#[test]
fn invalid_config_is_user_error() {
    let desk = TestDesk::new();
    desk.write_config("[storage]\nkey = \"../escape\"\n");
    desk.cmd()
        .args(["server", "ls"])
        .assert()
        .code(2)
        .stderr(contains("Invalid configuration"));
}

#[test]
fn malformed_config_fails_the_operation() {
    let desk = TestDesk::new();
    desk.write_config("[storage\n");
    desk.cmd()
        .args(["server", "ls"])
        .assert()
        .code(4)
        .stderr(contains("TOML parse error"));
}

#[test]
fn set_default_writes_config_and_steers_selection() {
    let desk = TestDesk::new();
    desk.write_config("[storage]\nlock_timeout_ms = 2000\n");
    desk.add_server("Alpha");
    desk.add_server("Beta");

    desk.cmd()
        .args(["config", "set-default", "Beta"])
        .assert()
        .success()
        .stdout(contains("serverdesk config set-default: Beta"));

    let written = std::fs::read_to_string(desk.config_path()).unwrap();
    assert!(written.contains("default_server = \"Beta\""));
    assert!(written.contains("lock_timeout_ms = 2000"));

    let envelope = desk.json(&["board"]);
    assert_eq!(envelope["data"]["dashboard"]["server"], "Beta");

    desk.cmd()
        .args(["config", "set-default"])
        .assert()
        .success()
        .stdout(contains("cleared"));
    let envelope = desk.json(&["board"]);
    assert_eq!(envelope["data"]["dashboard"]["server"], "Alpha");
}

#[test]
fn set_default_warns_about_unknown_server_and_rejects_blank() {
    let desk = TestDesk::new();
    desk.cmd()
        .args(["config", "set-default", "Ghost"])
        .assert()
        .success()
        .stdout(contains("does not exist yet"));

    desk.cmd()
        .args(["config", "set-default", "  "])
        .assert()
        .code(2)
        .stderr(contains("desk.default_server cannot be empty"));
    let written = std::fs::read_to_string(desk.config_path()).unwrap();
    assert!(written.contains("default_server = \"Ghost\""));
}
