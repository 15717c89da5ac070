use assert_cmd::Command;
use predicates::str::contains;
use std::{fs, path::Path};
use tempfile::tempdir;

fn contact_book(store: &Path) -> Command {
    let mut cmd = Command::cargo_bin(env!("CARGO_PKG_NAME")).unwrap();
    cmd.arg("--file").arg(store);
    cmd
}

fn stored(store: &Path) -> Result<serde_json::Value, Box<dyn std::error::Error>> {
    Ok(serde_json::from_str(&fs::read_to_string(store)?)?)
}

#[test]
fn export_import() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let first = dir.path().join("first.json");
    let second = dir.path().join("second.json");
    let out_path = dir.path().join("out.json");

    // Add a contact to an empty store
    contact_book(&first)
        .args(["add", "--name", "Alice", "--phone", "123"])
        .assert()
        .success()
        .stdout(contains("Contact added successfully"));

    contact_book(&first)
        .arg("export")
        .arg(&out_path)
        .assert()
        .success()
        .stdout(contains("Successfully exported 1 contacts"));

    // Export uses the store's own format
    assert_eq!(fs::read(&out_path)?, fs::read(&first)?);

    // A new empty store imports it
    contact_book(&second)
        .arg("import")
        .arg(&out_path)
        .assert()
        .success()
        .stdout(contains("Successfully imported 1 contacts"));

    assert_eq!(stored(&second)?, stored(&first)?);
    Ok(())
}

#[test]
fn import_appends_to_existing_contacts() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let store = dir.path().join("contacts.json");
    let src = dir.path().join("two.json");

    for name in ["Ann", "Ben", "Cat"] {
        contact_book(&store).args(["add", "--name", name]).assert().success();
    }
    fs::write(&src, r#"[{"name": "Ann"}, {"name": "Dee", "email": "dee@example.com"}]"#)?;

    contact_book(&store).arg("import").arg(&src).assert().success();

    let output = contact_book(&store).arg("view").assert().success().get_output().stdout.clone();
    assert_eq!(String::from_utf8_lossy(&output).lines().count(), 5);
    Ok(())
}

#[test]
fn imported_fields_are_trimmed() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let store = dir.path().join("contacts.json");
    let src = dir.path().join("padded.json");
    fs::write(&src, r#"[{"name": "  Ann  ", "phone": " 123 "}]"#)?;

    contact_book(&store).arg("import").arg(&src).assert().success();

    let saved = stored(&store)?;
    assert_eq!(saved[0]["name"], "Ann");
    assert_eq!(saved[0]["phone"], "123");

    contact_book(&store)
        .args(["show", "--name", "Ann"])
        .assert()
        .success()
        .stdout(contains("Phone:    123"));
    Ok(())
}

#[test]
fn invalid_import_changes_nothing() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let store = dir.path().join("contacts.json");
    let src = dir.path().join("bad.json");

    contact_book(&store).args(["add", "--name", "Ann"]).assert().success();
    let before = fs::read(&store)?;

    fs::write(&src, r#"{"contacts": 3}"#)?;
    contact_book(&store)
        .arg("import")
        .arg(&src)
        .assert()
        .code(1)
        .stderr(contains("Cannot import"));

    contact_book(&store)
        .arg("import")
        .arg(dir.path().join("missing.json"))
        .assert()
        .code(1)
        .stderr(contains("missing.json"));

    assert_eq!(fs::read(&store)?, before);
    Ok(())
}

#[test]
fn csv_round_trip() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let store = dir.path().join("contacts.json");
    let copy = dir.path().join("copy.json");
    let csv = dir.path().join("exports/contacts.csv");

    contact_book(&store)
        .args(["add", "--name", "Smith, Jane", "--notes", "likes \"quotes\""])
        .assert()
        .success();

    contact_book(&store).arg("export").arg(&csv).assert().success();
    assert!(fs::read_to_string(&csv)?.starts_with("name,phone,email,address,notes"));

    contact_book(&copy).arg("import").arg(&csv).assert().success();

    assert_eq!(stored(&copy)?, stored(&store)?);
    Ok(())
}
