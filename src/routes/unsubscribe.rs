use actix_web::{HttpResponse, web};
use serde_json::json;
use sqlx::SqlitePool;

use crate::store;

#[derive(serde::Deserialize)]
pub struct UnsubscribePayload {
    email: Option<String>,
}

#[tracing::instrument(
    name = "Remove a subscriber",
    skip(payload, pool),
    fields(subscriber_email = tracing::field::Empty)
)]
pub async fn unsubscribe(
    payload: Option<web::Json<UnsubscribePayload>>,
    pool: web::Data<SqlitePool>,
) -> HttpResponse {
    // An absent or non-JSON body counts the same as a missing field.
    let Some(email) = payload
        .and_then(|payload| payload.0.email)
        .filter(|email| !email.is_empty())
    else {
        return HttpResponse::BadRequest().json(json!({ "error": "Email is required" }));
    };
    tracing::Span::current().record("subscriber_email", tracing::field::display(&email));

    match store::delete_subscription(pool.as_ref(), &email).await {
        // Same wart as the duplicate-subscribe path: the 404 body carries
        // the success wording. Callers rely on the status code.
        Ok(0) => HttpResponse::NotFound().json(json!({ "error": "Unsubscribed successfully" })),
        Ok(_) => HttpResponse::Ok().json(json!({ "message": "Unsubscribed successfully" })),
        Err(e) => {
            tracing::error!(error = ?e, "Failed to delete email");
            HttpResponse::InternalServerError().json(json!({ "error": "Failed to unsubscribe" }))
        }
    }
}
