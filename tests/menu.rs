use assert_cmd::Command;
use predicates::prelude::*;
use std::{fs, path::Path};
use tempfile::tempdir;

fn contact_book(store: &Path) -> Command {
    let mut cmd = Command::cargo_bin(env!("CARGO_PKG_NAME")).unwrap();
    cmd.arg("--file").arg(store);
    cmd
}

#[test]
fn interactive_session() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let store = dir.path().join("contacts.json");

    let script = [
        "1", "Alice", "1234567", "alice@example.com", "", "", // add
        "1", "Bob", "", "", "", "",                            // add
        "2",                                                   // view
        "4", "ALICE",                                          // search
        "5", "2", "", "", "bob@example.com", "", "friend",     // update Bob
        "6", "1", "y",                                         // delete Alice
        "0",
    ]
    .join("\n");

    contact_book(&store)
        .write_stdin(script)
        .assert()
        .success()
        .stdout(predicate::str::contains("=== Contact Book ==="))
        .stdout(predicate::str::contains("Contact 'Alice' added at position 1."))
        .stdout(predicate::str::contains("Contact 'Bob' added at position 2."))
        .stdout(predicate::str::contains("Found 1 result(s):"))
        .stdout(predicate::str::contains("Contact updated."))
        .stdout(predicate::str::contains("Deleted."))
        .stdout(predicate::str::ends_with("Goodbye!\n"));

    let saved: serde_json::Value = serde_json::from_str(&fs::read_to_string(&store)?)?;
    assert_eq!(
        saved,
        serde_json::json!([{
            "name": "Bob",
            "phone": "",
            "email": "bob@example.com",
            "address": "",
            "notes": "friend"
        }])
    );
    Ok(())
}

#[test]
fn menu_reports_errors_and_keeps_going() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let store = dir.path().join("contacts.json");

    contact_book(&store)
        .write_stdin("9\n6\nNobody\n7\nnope.json\n0\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Unrecognized command: '9'"))
        .stdout(predicate::str::contains("Error: Contact with name 'Nobody' Not found"))
        .stdout(predicate::str::contains("Error: Cannot access nope.json"))
        .stdout(predicate::str::ends_with("Goodbye!\n"));

    Ok(())
}

#[test]
fn end_of_input_exits_with_success() {
    let dir = tempdir().unwrap();

    contact_book(&dir.path().join("contacts.json"))
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::contains("Goodbye!"));
}
