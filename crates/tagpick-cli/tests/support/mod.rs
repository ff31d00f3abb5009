use std::fs;
use std::path::Path;

use assert_cmd::Command;

pub fn new_command_with_temp_home() -> (Command, tempfile::TempDir) {
    let temp_home = tempfile::tempdir().expect("temp home");
    let binary = assert_cmd::cargo::cargo_bin!("tagpick");
    let mut command = Command::new(binary);
    command.env("HOME", temp_home.path());
    command.env("XDG_CONFIG_HOME", temp_home.path().join(".config"));
    command.env_remove("TAGPICK_LOG_FILE");
    (command, temp_home)
}

pub fn write_valid_config(home: &Path, source: &str) {
    let config_dir = home.join(".config").join("tagpick");
    fs::create_dir_all(&config_dir).expect("create config dir");
    fs::write(
        config_dir.join("config.toml"),
        format!(
            r#"
version = 1
source = "{source}"

[widget]
multi_select = true
tag_style = "rounded"
tag_appearance = "filled"
theme = "Company Blue Light"
"#
        ),
    )
    .expect("write config");
}

pub fn write_invalid_config(home: &Path) {
    let config_dir = home.join(".config").join("tagpick");
    fs::create_dir_all(&config_dir).expect("create config dir");
    fs::write(config_dir.join("config.toml"), "version = 7\n").expect("write config");
}
