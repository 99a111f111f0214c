use crate::common::TestApp;

#[tokio::test]
async fn upload_stores_archive_under_assigned_name() {
    let app = TestApp::spawn().await;
    let payload = vec![0xAB; 10 * 1024];

    let res = app.upload("example.jar", payload.clone(), Some("1.20")).await;

    assert_eq!(res.status, 200, "body: {}", res.text);
    assert_eq!(res.body["message"], "File uploaded successfully");
    assert_eq!(res.body["originalName"], "example.jar");

    let assigned = res.body["filename"].as_str().expect("filename missing");
    assert!(assigned.starts_with("mod_"), "assigned: {assigned}");
    assert!(assigned.ends_with(".jar"), "assigned: {assigned}");
    assert_ne!(assigned, "example.jar");

    assert_eq!(app.stored_files(), vec![assigned.to_string()]);
    let stored = std::fs::read(app.upload_dir.join(assigned)).unwrap();
    assert_eq!(stored, payload);
}

#[tokio::test]
async fn upload_without_version_field_is_accepted() {
    let app = TestApp::spawn().await;

    let res = app.upload("plain.jar", b"bytes".to_vec(), None).await;

    assert_eq!(res.status, 200, "body: {}", res.text);
}

#[tokio::test]
async fn repeated_uploads_get_distinct_names() {
    let app = TestApp::spawn().await;

    let first = app.upload("same.jar", b"one".to_vec(), None).await;
    let second = app.upload("same.jar", b"two".to_vec(), None).await;

    assert_eq!(first.status, 200);
    assert_eq!(second.status, 200);
    assert_ne!(first.body["filename"], second.body["filename"]);
    assert_eq!(app.stored_files().len(), 2);
}

#[tokio::test]
async fn missing_file_field_is_rejected() {
    let app = TestApp::spawn().await;

    let res = app.upload_without_file().await;

    assert_eq!(res.status, 400, "body: {}", res.text);
    assert_eq!(res.body["error"], "No file uploaded");
}

#[tokio::test]
async fn empty_file_is_rejected() {
    let app = TestApp::spawn().await;

    let res = app.upload("empty.jar", Vec::new(), Some("1.20")).await;

    assert_eq!(res.status, 400, "body: {}", res.text);
    assert_eq!(res.body["error"], "No file uploaded");
    assert!(app.stored_files().is_empty());
}

#[tokio::test]
async fn duplicate_file_fields_are_rejected() {
    let app = TestApp::spawn().await;

    let res = app.upload_two_files().await;

    assert_eq!(res.status, 400, "body: {}", res.text);
    assert_eq!(res.body["error"], "Only one file field is allowed");
    assert!(app.stored_files().is_empty());
}

#[tokio::test]
async fn oversized_upload_is_rejected_before_storage() {
    let app = TestApp::spawn_with_limit(1024).await;

    let res = app.upload("big.jar", vec![0u8; 4096], Some("1.20")).await;

    assert_eq!(res.status, 413, "body: {}", res.text);
    assert_eq!(res.body["error"], "File exceeds the maximum upload size");
    assert!(app.stored_files().is_empty());
}

#[tokio::test]
async fn upload_at_exactly_the_limit_is_accepted() {
    let app = TestApp::spawn_with_limit(1024).await;

    let res = app.upload("exact.jar", vec![0u8; 1024], None).await;

    assert_eq!(res.status, 200, "body: {}", res.text);
}

#[tokio::test]
async fn filename_with_path_separators_is_rejected() {
    let app = TestApp::spawn().await;

    let res = app
        .upload("../../etc/evil.jar", b"payload".to_vec(), None)
        .await;

    assert_eq!(res.status, 400, "body: {}", res.text);
    assert!(app.stored_files().is_empty());
}

#[tokio::test]
async fn filename_without_extension_is_rejected() {
    let app = TestApp::spawn().await;

    let res = app.upload("noext", b"payload".to_vec(), None).await;

    assert_eq!(res.status, 400, "body: {}", res.text);
    assert!(app.stored_files().is_empty());
}
