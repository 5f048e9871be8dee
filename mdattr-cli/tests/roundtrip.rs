use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

#[test]
fn roundtrip_accepts_canonical_markdown() {
    let dir = tempdir().unwrap();
    let input_path = dir.path().join("notes.md");
    fs::write(
        &input_path,
        "1. **this list has some bolded strings**\n2. _does it translate?_\n\n+ Level One\n + Level Two",
    )
    .unwrap();

    let mut cmd = cargo_bin_cmd!("mdattr");
    cmd.arg("roundtrip").arg(input_path.as_os_str());
    cmd.assert()
        .success()
        .stdout(predicate::str::ends_with(": ok\n"));
}

#[test]
fn roundtrip_names_first_differing_line() {
    let dir = tempdir().unwrap();
    let input_path = dir.path().join("notes.md");
    fs::write(&input_path, "same\n* star bullet\n").unwrap();

    let mut cmd = cargo_bin_cmd!("mdattr");
    cmd.arg("roundtrip").arg(input_path.as_os_str());
    cmd.assert().failure().code(1).stderr(
        predicate::str::contains("line 2")
            .and(predicate::str::contains("\"* star bullet\""))
            .and(predicate::str::contains("\"+ star bullet\"")),
    );
}

#[test]
fn roundtrip_uses_configured_bullet() {
    let dir = tempdir().unwrap();
    let input_path = dir.path().join("notes.md");
    fs::write(&input_path, "* one\n* two").unwrap();

    let config_path = dir.path().join("mdattr.toml");
    fs::write(
        &config_path,
        r#"[serializer]
bullet = "*"
"#,
    )
    .unwrap();

    let mut cmd = cargo_bin_cmd!("mdattr");
    cmd.arg("roundtrip")
        .arg(input_path.as_os_str())
        .arg("--config")
        .arg(config_path.as_os_str());
    cmd.assert().success();
}
