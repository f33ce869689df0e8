use assert_cmd::Command;
use just_installer::test_utils::zip_archive;
use predicates::prelude::*;
use reqwest::Url;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A release directory served through `file://` URIs plus an install base.
struct Fixture {
    temp: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let fixture = Self {
            temp: TempDir::new().unwrap(),
        };
        fs::create_dir_all(fixture.releases()).unwrap();
        fixture
    }

    fn releases(&self) -> PathBuf {
        self.temp.path().join("releases")
    }

    fn base(&self) -> PathBuf {
        self.temp.path().join("apps")
    }

    fn config_path(&self) -> PathBuf {
        self.temp.path().join("installer.toml")
    }

    fn publish(&self, version: &str, app: &str) {
        fs::write(self.releases().join("version.txt"), format!("{version}\n")).unwrap();
        fs::write(
            self.releases().join(format!("app_{version}.zip")),
            zip_archive(&[("app", app)]),
        )
        .unwrap();
    }

    fn write_config(&self, current_version: &str, folder_template: &str) {
        let releases = Url::from_directory_path(self.releases()).unwrap();
        let config = format!(
            r#"
entry_point = "app"
install_base_path = '{}'
install_folder_template = "{folder_template}"
current_version_uri = "{releases}version.txt"
update_location_template = "{releases}app_{{version}}.zip"
current_version = "{current_version}"
"#,
            self.base().display()
        );
        fs::write(self.config_path(), config).unwrap();
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("just-installer").unwrap();
        cmd.current_dir(self.temp.path())
            .env("JUST_INSTALLER_NO_PROGRESS", "1")
            .env_remove("RUST_LOG")
            .arg("--config")
            .arg(self.config_path());
        cmd
    }
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap()
}

#[test]
fn test_check_reports_update() {
    let fixture = Fixture::new();
    fixture.publish("1.1", "v1.1");
    fixture.write_config("1.0", "app_{version}");

    fixture
        .cmd()
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("Update available: 1.0 -> 1.1"));
}

#[test]
fn test_check_json() {
    let fixture = Fixture::new();
    fixture.publish("1.1", "v1.1");
    fixture.write_config("1.0", "app_{version}");

    let output = fixture.cmd().args(["check", "--json"]).assert().success();
    let report: serde_json::Value =
        serde_json::from_slice(&output.get_output().stdout).unwrap();

    assert_eq!(report["current_version"], "1.0");
    assert_eq!(report["available_version"], "1.1");
    assert_eq!(report["update_available"], true);
    assert_eq!(report["errors"], serde_json::json!([]));
}

#[test]
fn test_check_fails_without_descriptor() {
    let fixture = Fixture::new();
    fixture.write_config("1.0", "app_{version}");

    fixture
        .cmd()
        .arg("check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to check for updates"));
}

#[test]
fn test_install_newer_version() {
    let fixture = Fixture::new();
    fixture.publish("2.0", "second");
    fixture.write_config("1.0", "app_{version}");

    fixture
        .cmd()
        .arg("install")
        .assert()
        .success()
        .stdout(predicate::str::contains("Installed version 2.0"));

    assert_eq!(read(&fixture.base().join("app_2.0/app")), "second");
}

#[test]
fn test_install_skips_when_up_to_date() {
    let fixture = Fixture::new();
    fixture.publish("2.0", "second");
    fixture.write_config("2.0", "app_{version}");

    fixture
        .cmd()
        .arg("install")
        .assert()
        .success()
        .stdout(predicate::str::contains("Already on the latest version (2.0)"));

    assert!(!fixture.base().join("app_2.0").exists());
}

#[test]
fn test_force_reinstall_then_restore() {
    let fixture = Fixture::new();
    fixture.publish("2.0", "good");
    fixture.write_config("2.0", "app_{version}");
    fixture.cmd().args(["install", "--force"]).assert().success();

    fixture.publish("2.0", "bad");
    fixture.cmd().args(["install", "--force"]).assert().success();
    assert_eq!(read(&fixture.base().join("app_2.0/app")), "bad");
    assert_eq!(read(&fixture.base().join("app_2.0_backup/app")), "good");

    fixture.cmd().args(["restore", "2.0"]).assert().success();
    assert_eq!(read(&fixture.base().join("app_2.0/app")), "good");
}

#[test]
fn test_first_run_only_once() {
    let fixture = Fixture::new();
    fixture.write_config("1.0", "app_{version}");

    fixture.cmd().arg("first-run").assert().success().stdout("true\n");
    fixture.cmd().arg("first-run").assert().success().stdout("false\n");

    fixture.write_config("1.1", "app_{version}");
    fixture.cmd().arg("first-run").assert().success().stdout("true\n");
}

#[test]
fn test_template_without_token_is_rejected() {
    let fixture = Fixture::new();
    fixture.write_config("1.0", "app");

    fixture
        .cmd()
        .arg("check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("{version}"));
}

#[test]
fn test_missing_config_file() {
    let temp = TempDir::new().unwrap();

    Command::cargo_bin("just-installer")
        .unwrap()
        .current_dir(temp.path())
        .env_remove("JUST_INSTALLER_CONFIG")
        .arg("check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("installer.toml"));
}

#[test]
fn test_config_from_environment() {
    let fixture = Fixture::new();
    fixture.publish("1.1", "v1.1");
    fixture.write_config("1.1", "app_{version}");

    Command::cargo_bin("just-installer")
        .unwrap()
        .current_dir(fixture.temp.path().parent().unwrap())
        .env("JUST_INSTALLER_CONFIG", fixture.config_path())
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("You are on the latest version"));
}
