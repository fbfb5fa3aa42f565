use actix_web::http::header;
use actix_web::{HttpResponse, web};
use chrono::{SecondsFormat, Utc};
use serde_json::json;
use sqlx::SqlitePool;

use crate::authentication::ApiKey;
use crate::store;

#[derive(serde::Deserialize)]
pub struct ExportParameters {
    #[serde(rename = "API_KEY")]
    api_key: Option<String>,
}

#[tracing::instrument(name = "Export subscribed emails", skip(parameters, pool, api_key))]
pub async fn export_emails(
    parameters: web::Query<ExportParameters>,
    pool: web::Data<SqlitePool>,
    api_key: web::Data<ApiKey>,
) -> HttpResponse {
    if !api_key.matches(parameters.api_key.as_deref()) {
        return HttpResponse::Unauthorized().json(json!({ "error": "Unauthorized" }));
    }

    let emails = match store::list_emails(pool.as_ref()).await {
        Ok(emails) => emails,
        Err(e) => {
            tracing::error!(error = ?e, "Failed to fetch emails");
            return HttpResponse::InternalServerError().body("Failed to fetch emails");
        }
    };

    let filename = format!(
        "emails_{}.csv",
        Utc::now()
            .to_rfc3339_opts(SecondsFormat::Millis, true)
            .replace(':', "-")
    );

    HttpResponse::Ok()
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("attachment; filename={filename}"),
        ))
        .content_type("text/csv")
        .body(to_csv(&emails))
}

/// Single-column CSV with an `email` header row. Stored values are validated
/// addresses, which cannot contain the delimiter or quotes.
fn to_csv(emails: &[String]) -> String {
    let mut out = String::from("email\n");
    for email in emails {
        out.push_str(email);
        out.push('\n');
    }
    out
}
