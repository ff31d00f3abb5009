mod support;

use predicates::prelude::*;

use support::{new_command_with_temp_home, write_invalid_config, write_valid_config};

#[test]
fn root_help_lists_subcommands() {
    let (mut command, _temp_home) = new_command_with_temp_home();
    command
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage: tagpick"))
        .stdout(predicate::str::contains("vocab"))
        .stdout(predicate::str::contains("add"))
        .stdout(predicate::str::contains("--tags"))
        .stdout(predicate::str::contains("--source"));
}

#[test]
fn vocab_without_config_prints_fallback() {
    let (mut command, _temp_home) = new_command_with_temp_home();
    command
        .arg("vocab")
        .assert()
        .success()
        .stdout(predicate::str::contains("source: none"))
        .stdout(predicate::str::contains("No Options Retrieved"))
        .stdout(predicate::str::contains("Test 1"))
        .stdout(predicate::str::contains("Test 2"));
}

#[test]
fn vocab_with_unreadable_source_prints_fallback() {
    let (mut command, temp_home) = new_command_with_temp_home();
    write_valid_config(temp_home.path(), "tags");

    command
        .arg("vocab")
        .assert()
        .success()
        .stdout(predicate::str::contains("source: tags"))
        .stdout(predicate::str::contains("No Options Retrieved"));
}

#[test]
fn add_then_vocab_round_trips() {
    let (mut add_command, temp_home) = new_command_with_temp_home();
    write_valid_config(temp_home.path(), "tags");

    add_command
        .args(["add", "urgent,review"])
        .assert()
        .success()
        .stdout(predicate::str::contains("added: urgent"))
        .stdout(predicate::str::contains("added: review"));

    let binary = assert_cmd::cargo::cargo_bin!("tagpick");
    let mut vocab_command = assert_cmd::Command::new(binary);
    vocab_command.env("HOME", temp_home.path());
    vocab_command.env("XDG_CONFIG_HOME", temp_home.path().join(".config"));
    vocab_command
        .arg("vocab")
        .assert()
        .success()
        .stdout(predicate::str::contains("urgent"))
        .stdout(predicate::str::contains("review"));
}

#[test]
fn add_without_source_is_rejected() {
    let (mut command, _temp_home) = new_command_with_temp_home();
    command
        .args(["add", "urgent"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no vocabulary source configured"));
}

#[test]
fn add_with_source_override_uses_that_table() {
    let (mut command, temp_home) = new_command_with_temp_home();
    write_valid_config(temp_home.path(), "tags");

    command
        .args(["add", "--source", "other", "urgent"])
        .assert()
        .success()
        .stdout(predicate::str::contains("added: urgent"));

    let table = temp_home
        .path()
        .join(".config/tagpick/tables/other.toml");
    assert!(table.exists(), "expected table at {}", table.display());
}

#[test]
fn invalid_config_is_rejected_before_any_command() {
    let (mut command, temp_home) = new_command_with_temp_home();
    write_invalid_config(temp_home.path());

    command
        .arg("vocab")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid config at"))
        .stderr(predicate::str::contains("version must be 1"));
}

#[test]
fn blank_add_arguments_are_rejected() {
    let (mut command, temp_home) = new_command_with_temp_home();
    write_valid_config(temp_home.path(), "tags");

    command
        .args(["add", " , "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no tags to add"));
}
