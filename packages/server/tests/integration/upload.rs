use std::sync::Arc;

use crate::common::{FailingFileStore, TestApp};

#[tokio::test]
async fn valid_png_upload_returns_matching_metadata() {
    let app = TestApp::spawn().await;
    let bytes = vec![0x89u8; 2048];

    let res = app
        .upload_file("label.png", bytes.clone(), Some("image/png"))
        .await;

    assert_eq!(res.status, 200, "upload failed: {}", res.text);
    assert_eq!(res.body["fileName"], "label.png");
    assert_eq!(res.body["fileSizeBytes"], 2048);
    assert_eq!(res.body["contentType"], "image/png");
    assert!(res.body["uploadedAt"].is_string());

    let key = res.body["bucketKey"].as_str().unwrap();
    assert!(key.starts_with("uploads/"));
    assert!(key.ends_with(".png"));
    assert_eq!(
        res.body["fileUrl"].as_str().unwrap(),
        format!("/files/{key}")
    );
}

#[tokio::test]
async fn stored_bytes_match_the_upload() {
    let app = TestApp::spawn().await;
    let bytes: Vec<u8> = (0..=255).collect();

    let res = app
        .upload_file("pixels.webp", bytes.clone(), Some("image/webp"))
        .await;
    assert_eq!(res.status, 200);

    let key = res.body["bucketKey"].as_str().unwrap();
    let path = app
        .files_dir
        .as_ref()
        .expect("spawn() provides a files dir")
        .path()
        .join("files")
        .join(key);
    let stored = std::fs::read(path).expect("stored object should exist");
    assert_eq!(stored, bytes);
}

#[tokio::test]
async fn empty_file_is_rejected_by_name() {
    let app = TestApp::spawn().await;

    let res = app.upload_file("empty.png", vec![], Some("image/png")).await;

    assert_eq!(res.status, 400);
    assert_eq!(res.body["code"], "VALIDATION_ERROR");
    assert_eq!(res.body["message"], "file is empty");
}

#[tokio::test]
async fn oversized_file_is_rejected_naming_the_limit() {
    let app = TestApp::spawn().await;
    let eleven_mib = vec![0u8; 11 * 1024 * 1024];

    let res = app
        .upload_file("huge.png", eleven_mib, Some("image/png"))
        .await;

    assert_eq!(res.status, 400);
    assert_eq!(res.body["code"], "VALIDATION_ERROR");
    assert!(
        res.body["message"].as_str().unwrap().contains("10 MiB"),
        "message should name the limit: {}",
        res.text
    );
}

#[tokio::test]
async fn unsupported_content_type_is_rejected_by_name() {
    let app = TestApp::spawn().await;

    let res = app
        .upload_file("paper.pdf", b"%PDF-1.4".to_vec(), Some("application/pdf"))
        .await;

    assert_eq!(res.status, 400);
    assert_eq!(res.body["code"], "VALIDATION_ERROR");
    assert!(
        res.body["message"]
            .as_str()
            .unwrap()
            .contains("application/pdf"),
        "message should name the rejected type: {}",
        res.text
    );
}

#[tokio::test]
async fn missing_content_type_is_rejected() {
    let app = TestApp::spawn().await;

    let res = app.upload_file("mystery.bin", b"data".to_vec(), None).await;

    assert_eq!(res.status, 400);
    assert_eq!(res.body["code"], "VALIDATION_ERROR");
    assert!(
        res.body["message"].as_str().unwrap().contains("content type"),
        "message should name the content type rule: {}",
        res.text
    );
}

#[tokio::test]
async fn missing_file_part_is_rejected() {
    let app = TestApp::spawn().await;

    let res = app.upload_without_file_part().await;

    assert_eq!(res.status, 400);
    assert_eq!(res.body["code"], "VALIDATION_ERROR");
    assert!(
        res.body["message"].as_str().unwrap().contains("file"),
        "message should name the missing part: {}",
        res.text
    );
}

#[tokio::test]
async fn validation_failure_writes_nothing_to_storage() {
    let app = TestApp::spawn().await;

    let res = app
        .upload_file("paper.pdf", b"%PDF-1.4".to_vec(), Some("application/pdf"))
        .await;
    assert_eq!(res.status, 400);

    let uploads_dir = app
        .files_dir
        .as_ref()
        .expect("spawn() provides a files dir")
        .path()
        .join("files/uploads");
    // The uploads directory is created lazily on the first write.
    assert!(!uploads_dir.exists());
}

#[tokio::test]
async fn store_failure_surfaces_as_storage_error() {
    let app = TestApp::spawn_with_files(Arc::new(FailingFileStore)).await;

    let res = app
        .upload_file("label.png", vec![1u8; 64], Some("image/png"))
        .await;

    assert_eq!(res.status, 500);
    assert_eq!(res.body["code"], "STORAGE_ERROR");
}
