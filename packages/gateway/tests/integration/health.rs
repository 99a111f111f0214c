use crate::common::{ALLOWED_ORIGIN, TestApp, routes};

#[tokio::test]
async fn health_check_reports_running() {
    let app = TestApp::spawn().await;

    let res = app.get(routes::HEALTH).await;

    assert_eq!(res.status, 200, "body: {}", res.text);
    assert_eq!(res.body["status"], "Server is running");
}

#[tokio::test]
async fn preflight_allows_configured_origin() {
    let app = TestApp::spawn().await;

    let res = app
        .client
        .request(
            reqwest::Method::OPTIONS,
            format!("http://{}{}", app.addr, routes::UPLOAD),
        )
        .header("Origin", ALLOWED_ORIGIN)
        .header("Access-Control-Request-Method", "POST")
        .header("Access-Control-Request-Headers", "content-type")
        .send()
        .await
        .expect("Failed to send preflight request");

    assert_eq!(
        res.headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some(ALLOWED_ORIGIN)
    );
}

#[tokio::test]
async fn preflight_rejects_unknown_origin() {
    let app = TestApp::spawn().await;

    let res = app
        .client
        .request(
            reqwest::Method::OPTIONS,
            format!("http://{}{}", app.addr, routes::UPLOAD),
        )
        .header("Origin", "https://evil.example")
        .header("Access-Control-Request-Method", "POST")
        .send()
        .await
        .expect("Failed to send preflight request");

    assert!(res.headers().get("access-control-allow-origin").is_none());
}
