mod support;

use predicates::str::contains;

use support::{serverdesk_cmd, TestDesk};

#[test]
fn help_lists_command_groups() {
    serverdesk_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("server"))
        .stdout(contains("todo"))
        .stdout(contains("staff"))
        .stdout(contains("board"));
}

#[test]
fn version_flag_works() {
    serverdesk_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(contains("serverdesk"));
}

#[test]
fn board_without_servers_is_hidden() {
    let desk = TestDesk::new();
    desk.cmd()
        .arg("board")
        .assert()
        .success()
        .stdout(contains("serverdesk: no servers yet"))
        .stdout(contains("serverdesk server add <name>"));

    let envelope = desk.json(&["board"]);
    assert_eq!(envelope["schema_version"], "serverdesk.v1");
    assert_eq!(envelope["command"], "board");
    assert_eq!(envelope["data"]["visible"], false);
    assert!(envelope["data"]["dashboard"].is_null());
}

#[test]
fn commands_needing_a_server_fail_without_one() {
    let desk = TestDesk::new();
    desk.cmd()
        .args(["todo", "add", "Patch kernel"])
        .assert()
        .code(2)
        .stderr(contains("No server selected"))
        .stderr(contains("hint: serverdesk server add <name>"));

    let envelope = desk.json(&["todo", "ls"]);
    assert_eq!(envelope["status"], "error");
    assert_eq!(envelope["command"], "todo ls");
    assert_eq!(envelope["error"]["kind"], "user_error");
    assert_eq!(envelope["error"]["code"], 2);
    assert!(envelope["error"]["message"]
        .as_str()
        .unwrap()
        .contains("No server selected"));
}

#[test]
fn corrupt_store_reads_as_empty() {
    let desk = TestDesk::new();
    desk.write_store("{ this is not json");

    desk.cmd()
        .args(["server", "ls"])
        .assert()
        .success()
        .stdout(contains("0 server(s)"));

    desk.add_server("Alpha");
    let store = desk.read_store();
    assert_eq!(store.as_object().unwrap().len(), 1);
    assert!(store["Alpha"]["todos"].as_array().unwrap().is_empty());
}

#[test]
fn quiet_suppresses_human_output() {
    let desk = TestDesk::new();
    desk.cmd()
        .args(["-q", "server", "add", "Alpha"])
        .assert()
        .success()
        .stdout("");
}
