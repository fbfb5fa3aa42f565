use std::collections::HashSet;

use crate::helpers::spawn_app;
use reqwest::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use serde_json::json;

#[actix_web::test]
async fn export_without_api_key_ret401() {
    let app = spawn_app().await;
    app.post_subscribe(&json!({ "email": "user@example.com" }))
        .await;

    let response = app.get_export(None).await;

    assert_eq!(response.status().as_u16(), 401);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Unauthorized");
}

#[actix_web::test]
async fn export_with_wrong_api_key_ret401() {
    let app = spawn_app().await;

    let response = app.get_export(Some("definitely-not-the-key")).await;

    assert_eq!(response.status().as_u16(), 401);
}

#[actix_web::test]
async fn export_returns_all_stored_emails_as_csv_attachment() {
    let app = spawn_app().await;
    app.post_subscribe(&json!({ "email": "a@x.com" })).await;
    app.post_subscribe(&json!({ "email": "b@y.com" })).await;

    let response = app.get_export(Some(&app.api_key)).await;

    assert_eq!(response.status().as_u16(), 200);
    let content_type = response.headers()[CONTENT_TYPE].to_str().unwrap();
    assert!(content_type.starts_with("text/csv"));
    let disposition = response.headers()[CONTENT_DISPOSITION].to_str().unwrap();
    assert!(disposition.starts_with("attachment; filename=emails_"));
    assert!(disposition.ends_with(".csv"));
    // Colons in the embedded timestamp are replaced to keep the filename
    // filesystem-safe.
    assert!(!disposition.contains(':'));

    let body = response.text().await.unwrap();
    let mut lines = body.lines();
    assert_eq!(lines.next(), Some("email"));
    let rows: HashSet<&str> = lines.collect();
    assert_eq!(rows, HashSet::from(["a@x.com", "b@y.com"]));
}

#[actix_web::test]
async fn export_of_empty_store_is_just_the_header_row() {
    let app = spawn_app().await;

    let response = app.get_export(Some(&app.api_key)).await;

    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(response.text().await.unwrap(), "email\n");
}

#[actix_web::test]
async fn unsubscribed_email_does_not_appear_in_export() {
    let app = spawn_app().await;
    let body = json!({ "email": "user@example.com" });
    app.post_subscribe(&body).await;
    app.post_unsubscribe(&body).await;

    let response = app.get_export(Some(&app.api_key)).await;

    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(response.text().await.unwrap(), "email\n");
}
