mod support;

use predicates::str::contains;

use support::TestDesk;

#[test]
fn board_projects_selected_server() {
    let desk = TestDesk::new();
    desk.add_server("Alpha");
    desk.add_server("Beta");
    desk.cmd()
        .args(["--server", "Beta", "todo", "add", "Patch"])
        .assert()
        .success();
    desk.cmd()
        .args(["--server", "Beta", "staff", "add", "Ann", "Admin"])
        .assert()
        .success();

    desk.cmd()
        .args(["--server", "Beta", "board"])
        .assert()
        .success()
        .stdout(contains("serverdesk board: Beta"))
        .stdout(contains("- completed: 0/1 (0%)"))
        .stdout(contains("- servers: Alpha, Beta (selected)"))
        .stdout(contains("Patch: Not started, Low"))
        .stdout(contains("Ann (Admin): No responsibilities"));

    let envelope = desk.json(&["board"]);
    let data = &envelope["data"];
    assert_eq!(data["visible"], true);
    assert_eq!(data["dashboard"]["server"], "Alpha");
    assert_eq!(data["dashboard"]["total"], 0);
    assert_eq!(data["servers"][0]["selected"], true);
}

#[test]
fn board_uses_configured_default_server() {
    let desk = TestDesk::new();
    desk.write_config("[desk]\ndefault_server = \"Beta\"\n");
    desk.add_server("Alpha");
    desk.add_server("Beta");

    let envelope = desk.json(&["board"]);
    assert_eq!(envelope["data"]["dashboard"]["server"], "Beta");

    desk.cmd().args(["todo", "add", "Lands on beta"]).assert().success();
    assert_eq!(desk.read_store()["Beta"]["todos"][0]["name"], "Lands on beta");
}

#[test]
fn board_rejects_unknown_explicit_server() {
    let desk = TestDesk::new();
    desk.add_server("Alpha");
    desk.cmd()
        .args(["--server", "Ghost", "board"])
        .assert()
        .code(2)
        .stderr(contains("Server not found: Ghost"));
}
