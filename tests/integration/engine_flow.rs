use just_installer::config::InstallerConfig;
use just_installer::core::InstallerError;
use just_installer::test_utils::{EventRecorder, zip_archive};
use just_installer::upgrade::UpdateEngine;
use just_installer::version::Version;
use std::path::Path;
use std::time::{Duration, Instant};
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config(base: &Path, server: &MockServer, current: Version) -> InstallerConfig {
    InstallerConfig::new(
        "app",
        base.to_string_lossy(),
        "version_{version}",
        format!("{}/app/version.txt", server.uri()),
        format!("{}/app/download/app_{{version}}.zip", server.uri()),
    )
    .with_current_version(current)
    .with_http_timeout_secs(5)
}

async fn publish(server: &MockServer, version: &str, app: &str) {
    Mock::given(method("GET"))
        .and(path("/app/version.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!("{version} 9f8e7d6c\n")))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("/app/download/app_{version}.zip")))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(zip_archive(&[("app", app)])))
        .mount(server)
        .await;
}

fn engine_with_recorder(config: InstallerConfig) -> (UpdateEngine, EventRecorder) {
    let mut engine = UpdateEngine::new(config).unwrap();
    let recorder = EventRecorder::new();
    engine.on_info(recorder.info_handler());
    engine.on_error(recorder.error_handler());
    (engine, recorder)
}

#[tokio::test]
async fn test_check_and_install_over_http() {
    let server = MockServer::start().await;
    publish(&server, "1.4.2", "new build").await;

    let temp = TempDir::new().unwrap();
    let (mut engine, recorder) =
        engine_with_recorder(config(temp.path(), &server, Version::new(1, 4)));

    assert!(engine.check_for_update().await);
    assert_eq!(engine.available_version(), Some(Version::with_revision(1, 4, 2)));

    let installed = engine.install_update(false, &[]).await.unwrap().unwrap();
    assert_eq!(installed.entry_point, temp.path().join("version_1.4.2").join("app"));
    assert_eq!(std::fs::read_to_string(&installed.entry_point).unwrap(), "new build");
    assert!(recorder.errors().is_empty(), "unexpected errors: {:?}", recorder.errors());
}

#[tokio::test]
async fn test_requests_carry_user_agent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/app/version.txt"))
        .and(header("user-agent", just_installer::constants::USER_AGENT))
        .respond_with(ResponseTemplate::new(200).set_body_string("2.0"))
        .expect(1)
        .mount(&server)
        .await;

    let temp = TempDir::new().unwrap();
    let (mut engine, _) = engine_with_recorder(config(temp.path(), &server, Version::new(1, 0)));
    assert!(engine.check_for_update().await);
}

#[tokio::test]
async fn test_server_error_reports_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/app/version.txt"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let temp = TempDir::new().unwrap();
    let (mut engine, recorder) =
        engine_with_recorder(config(temp.path(), &server, Version::new(1, 0)));

    assert!(!engine.check_for_update().await);
    assert_eq!(engine.available_version(), None);
    assert_eq!(recorder.errors().len(), 1);
    assert!(recorder.errors()[0].contains("503"));
}

#[tokio::test]
async fn test_slow_descriptor_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/app/version.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("2.0").set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;

    let temp = TempDir::new().unwrap();
    let config = config(temp.path(), &server, Version::new(1, 0)).with_http_timeout_secs(1);
    let (mut engine, recorder) = engine_with_recorder(config);

    let started = Instant::now();
    assert!(!engine.check_for_update().await);
    assert!(started.elapsed() < Duration::from_secs(4));
    assert_eq!(engine.available_version(), None);
    assert_eq!(recorder.errors().len(), 1);
}

#[tokio::test]
async fn test_missing_archive_leaves_disk_untouched() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/app/version.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("3.0"))
        .mount(&server)
        .await;

    let temp = TempDir::new().unwrap();
    let (mut engine, recorder) =
        engine_with_recorder(config(temp.path(), &server, Version::new(1, 0)));

    assert!(engine.check_for_update().await);
    assert_eq!(engine.install_update(false, &[]).await.unwrap(), None);
    assert_eq!(recorder.errors().len(), 1);
    assert!(!temp.path().join("version_3.0").exists());
}

#[tokio::test]
async fn test_install_without_check_is_rejected() {
    let server = MockServer::start().await;
    let temp = TempDir::new().unwrap();
    let (engine, _) = engine_with_recorder(config(temp.path(), &server, Version::new(1, 0)));

    let err = engine.install_update(false, &[]).await.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<InstallerError>(),
        Some(InstallerError::NoAvailableVersion)
    ));
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}

#[cfg(unix)]
#[tokio::test]
async fn test_install_refreshes_symlinks() {
    let server = MockServer::start().await;
    publish(&server, "2.0", "v2").await;

    let temp = TempDir::new().unwrap();
    let link = temp.path().join("bin/app");
    std::fs::create_dir_all(temp.path().join("bin")).unwrap();
    std::fs::write(&link, "stale launcher").unwrap();

    let config = config(&temp.path().join("apps"), &server, Version::new(1, 0))
        .with_symlink_paths(vec![link.to_string_lossy().into_owned()]);
    let (mut engine, recorder) = engine_with_recorder(config);

    engine.install_update_if_available(false).await.unwrap().unwrap();

    assert_eq!(std::fs::read_link(&link).unwrap(), temp.path().join("apps/version_2.0/app"));
    assert_eq!(std::fs::read_to_string(&link).unwrap(), "v2");
    assert!(recorder.errors().is_empty());
}
