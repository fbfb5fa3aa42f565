use crate::helpers::spawn_app;
use serde_json::json;

#[actix_web::test]
async fn subscribe_then_unsubscribe_removes_the_record() {
    let app = spawn_app().await;
    let body = json!({ "email": "user@example.com" });

    let subscribed = app.post_subscribe(&body).await;
    assert_eq!(subscribed.status().as_u16(), 200);

    let unsubscribed = app.post_unsubscribe(&body).await;
    assert_eq!(unsubscribed.status().as_u16(), 200);
    let response_body: serde_json::Value = unsubscribed.json().await.unwrap();
    assert_eq!(response_body["message"], "Unsubscribed successfully");

    assert!(app.stored_emails().await.is_empty());
}

#[actix_web::test]
async fn unsubscribe_unknown_email_ret404_and_store_unchanged() {
    let app = spawn_app().await;
    app.post_subscribe(&json!({ "email": "kept@example.com" }))
        .await;

    let response = app
        .post_unsubscribe(&json!({ "email": "never-stored@example.com" }))
        .await;

    assert_eq!(response.status().as_u16(), 404);
    // Not-found answers with the success wording under a 404; callers rely
    // on the status code.
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Unsubscribed successfully");
    assert_eq!(app.stored_emails().await, vec!["kept@example.com"]);
}

#[actix_web::test]
async fn unsubscribe_missing_email_ret400() {
    let app = spawn_app().await;
    let test_cases = [
        (json!({}), "missing email field"),
        (json!({ "email": "" }), "empty email"),
    ];

    for (body, case) in test_cases {
        let response = app.post_unsubscribe(&body).await;

        assert_eq!(
            response.status().as_u16(),
            400,
            "The api did not fail with code 400 when payload was {case}",
        );
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["error"], "Email is required");
    }
}

#[actix_web::test]
async fn unsubscribe_without_a_json_body_ret400_with_message() {
    let app = spawn_app().await;

    let response = app
        .api_client
        .post(format!("{}/api/unsubscribe", app.address))
        .send()
        .await
        .expect("Failed to execute Request");

    assert_eq!(response.status().as_u16(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Email is required");
}

#[actix_web::test]
async fn unsubscribe_deletes_by_exact_match_only() {
    let app = spawn_app().await;
    app.post_subscribe(&json!({ "email": "User@Example.com" }))
        .await;

    let response = app
        .post_unsubscribe(&json!({ "email": "user@example.com" }))
        .await;

    assert_eq!(response.status().as_u16(), 404);
    assert_eq!(app.stored_emails().await, vec!["User@Example.com"]);
}
