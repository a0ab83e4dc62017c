//! End-to-end initialization scenarios

mod common;

use acam_sdk::{SdkError, SdkState};
use common::*;

#[tokio::test]
async fn test_all_components_present_reaches_ready() {
    let fixture = SdkFixture::new();
    fixture.install_component("A.dll", "1.0.0.1");
    fixture.install_component("B.dll", "2.0");
    let sdk = fixture.facade(&["A.dll", "B.dll"], &[]);

    let report = sdk.initialize().await.unwrap();

    assert_eq!(sdk.state(), SdkState::Ready);
    assert!(report.readiness.all_present);
    assert_eq!(report.binaries.copied_count(), 2);

    let libraries = sdk.loaded_libraries().await.unwrap();
    assert_eq!(libraries.len(), 2);
    assert_eq!(libraries["A.dll"], "1.0.0.1");
    assert!(sdk.readiness().await.unwrap().all_present);
    assert!(sdk.is_library_loaded("B.dll").await.unwrap());
    assert_eq!(sdk.library_version("B.dll").await.unwrap(), "2.0");
    assert_eq!(sdk.library_version("Z.dll").await.unwrap(), "unknown");
    assert_eq!(sdk.alphacam_version().await.unwrap(), "2023.1");

    let core = sdk.core_interface().await.unwrap();
    assert_eq!(core.component(), "A.dll");
    assert_eq!(core.component_version(), "1.0.0.1");
    let automation = sdk.automation_interface().await.unwrap();
    assert_eq!(automation.component(), "B.dll");
    assert!(sdk.geometry_interface().await.is_ok());

    assert!(fixture.workspace().join("lib").join("A.dll").is_file());
}

#[tokio::test]
async fn test_missing_component_fails_initialize() {
    let fixture = SdkFixture::new();
    fixture.install_component("A.dll", "1.0");
    let sdk = fixture.facade(&["A.dll", "B.dll"], &[]);

    let err = sdk.initialize().await.unwrap_err();

    assert_eq!(sdk.state(), SdkState::Failed);
    assert_eq!(err.missing_components(), Some(&["B.dll".to_string()][..]));
    assert!(matches!(
        sdk.core_interface().await,
        Err(SdkError::InvalidState {
            state: SdkState::Failed,
            ..
        })
    ));
    assert!(matches!(
        sdk.geometry_interface().await,
        Err(SdkError::InvalidState { .. })
    ));
    assert!(matches!(
        sdk.automation_interface().await,
        Err(SdkError::InvalidState { .. })
    ));

    let last = sdk.last_readiness().await.unwrap();
    assert!(!last.all_present);
    assert_eq!(last.missing, vec!["B.dll"]);

    let report = sdk.last_readiness_report().await.unwrap();
    assert_eq!(report.exit_code(), 1);
}

#[tokio::test]
async fn test_help_file_is_indexed_and_rendered() {
    let fixture = SdkFixture::new();
    fixture.install_component("A.dll", "1.0");
    fixture.install_help("X.chm");
    let sdk = fixture.facade(&["A.dll"], &["X.chm"]);

    let report = sdk.initialize().await.unwrap();

    let staged_path = fixture.workspace().join("help").join("X.chm");
    assert_eq!(
        sdk.help_files().await.unwrap(),
        vec![("X.chm".to_string(), staged_path.clone())]
    );
    assert_eq!(sdk.help_file_path("X.chm").await.unwrap(), Some(staged_path));
    assert_eq!(sdk.help_file_path("Y.chm").await.unwrap(), None);

    let index_path = sdk.help_index_path().await.unwrap().unwrap();
    assert_eq!(index_path, fixture.workspace().join("help").join("help_index.html"));
    let html = std::fs::read_to_string(&index_path).unwrap();
    assert!(html.contains("X.chm"));

    let rendered = report.rendered.unwrap();
    let markdown = std::fs::read_to_string(rendered.documentation_path).unwrap();
    assert!(markdown.contains("- File: X.chm"));
}

#[tokio::test]
async fn test_missing_help_files_do_not_block_ready() {
    let fixture = SdkFixture::new();
    fixture.install_component("A.dll", "1.0");
    let sdk = fixture.facade(&["A.dll"], &["X.chm", "Y.chm"]);

    let report = sdk.initialize().await.unwrap();

    assert_eq!(sdk.state(), SdkState::Ready);
    assert_eq!(report.documentation.missing_sources(), vec!["X.chm", "Y.chm"]);
    assert!(sdk.help_files().await.unwrap().is_empty());
    assert!(sdk.help_index_path().await.unwrap().is_some());
}

#[tokio::test]
async fn test_retry_after_installing_missing_component() {
    let fixture = SdkFixture::new();
    fixture.install_component("A.dll", "1.0");
    let sdk = fixture.facade(&["A.dll", "B.dll"], &[]);
    assert!(sdk.initialize().await.is_err());

    fixture.install_component("B.dll", "1.0");
    let report = sdk.initialize().await.unwrap();

    assert_eq!(sdk.state(), SdkState::Ready);
    assert_eq!(report.binaries.copied_count(), 1);
}

#[tokio::test]
async fn test_unbound_capability_fails_initialize() {
    let fixture = SdkFixture::new();
    fixture.install_component("A.dll", "1.0");
    let sdk = fixture
        .builder(&["A.dll"], &[])
        .capability_factory(std::sync::Arc::new(
            acam_sdk::ComponentBackedFactory::default(),
        ))
        .build();

    let err = sdk.initialize().await.unwrap_err();

    assert!(matches!(err, SdkError::CapabilityUnavailable { .. }));
    assert_eq!(sdk.state(), SdkState::Failed);
    assert!(sdk.last_readiness().await.unwrap().all_present);
}
