mod support;

use predicates::str::contains;

use support::TestDesk;

fn desk_with_server() -> TestDesk {
    let desk = TestDesk::new();
    desk.add_server("Alpha");
    desk
}

#[test]
fn staff_add_and_ls_show_placeholder() {
    let desk = desk_with_server();

    desk.cmd()
        .args(["staff", "add", "Ann", "Admin"])
        .assert()
        .success()
        .stdout(contains("serverdesk staff add: Ann"))
        .stdout(contains("Staff member \"Ann\" added."));

    desk.cmd()
        .args(["staff", "ls"])
        .assert()
        .success()
        .stdout(contains("1 member(s) on Alpha"))
        .stdout(contains("Ann (Admin): No responsibilities"));

    let member = &desk.read_store()["Alpha"]["staff"][0];
    assert_eq!(member["rank"], "Admin");
    assert_eq!(member["responsibilities"], serde_json::json!([]));
    assert!(member["id"].as_str().unwrap().starts_with("staff-"));
}

#[test]
fn staff_add_requires_name_and_rank() {
    let desk = desk_with_server();
    desk.cmd()
        .args(["staff", "add", "Ann", " "])
        .assert()
        .success()
        .stdout(contains("nothing to add"));
    assert!(desk.read_store()["Alpha"]["staff"]
        .as_array()
        .unwrap()
        .is_empty());
}

#[test]
fn assign_appends_responsibilities_in_order() {
    let desk = desk_with_server();
    desk.cmd().args(["staff", "add", "Ann", "Admin"]).assert().success();

    desk.cmd()
        .args(["staff", "assign", "0", "clean"])
        .assert()
        .success();
    desk.cmd()
        .args(["staff", "assign", "0", "cook"])
        .assert()
        .success()
        .stdout(contains("Responsibility \"cook\" added to staff member \"Ann\"."))
        .stdout(contains("- responsibilities: clean, cook"));

    assert_eq!(
        desk.read_store()["Alpha"]["staff"][0]["responsibilities"],
        serde_json::json!(["clean", "cook"])
    );

    let envelope = desk.json(&["staff", "ls"]);
    assert_eq!(envelope["data"]["staff"][0]["summary"], "clean, cook");
}

#[test]
fn assign_prompts_when_text_is_missing() {
    let desk = desk_with_server();
    desk.cmd().args(["staff", "add", "Ann", "Admin"]).assert().success();

    desk.cmd()
        .args(["staff", "assign", "0"])
        .write_stdin("patch racks\n")
        .assert()
        .success()
        .stderr(contains("Responsibility for Ann"))
        .stdout(contains("Responsibility \"patch racks\" added"));

    desk.cmd()
        .args(["staff", "assign", "0"])
        .write_stdin("")
        .assert()
        .success()
        .stdout(contains("nothing to add"));

    assert_eq!(
        desk.read_store()["Alpha"]["staff"][0]["responsibilities"],
        serde_json::json!(["patch racks"])
    );
}

#[test]
fn staff_rm_and_bad_targets() {
    let desk = desk_with_server();
    desk.cmd().args(["staff", "add", "Ann", "Admin"]).assert().success();
    desk.cmd().args(["staff", "add", "Bob", "Mod"]).assert().success();

    desk.cmd()
        .args(["staff", "rm", "0"])
        .assert()
        .success()
        .stdout(contains("Staff member \"Ann\" deleted."));

    desk.cmd()
        .args(["staff", "assign", "1", "cook"])
        .assert()
        .code(2)
        .stderr(contains("Staff member index 1 is out of range (server has 1)"))
        .stderr(contains("hint: serverdesk staff ls"));

    desk.cmd()
        .args(["staff", "rm", "staff-nobody"])
        .assert()
        .code(2)
        .stderr(contains("Staff member not found"));

    let staff = desk.read_store()["Alpha"]["staff"].clone();
    assert_eq!(staff.as_array().unwrap().len(), 1);
    assert_eq!(staff[0]["name"], "Bob");
}
