use std::net::TcpListener;

use actix_web::dev::Server;
use actix_web::{
    App, HttpServer,
    web::{self, Data},
};
use anyhow::Context;
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;
use tracing_actix_web::TracingLogger;

use crate::authentication::ApiKey;
use crate::configuration::{DatabaseSettings, RateLimitSettings, Settings};
use crate::rate_limit::RateLimit;
use crate::routes::{export_emails, health_check, subscribe, unsubscribe};

pub struct Application {
    port: u16,
    server: Server,
}

impl Application {
    pub async fn build(configuration: Settings) -> Result<Self, anyhow::Error> {
        let db_pool = get_connection_pool(&configuration.database);
        sqlx::migrate!("./migrations")
            .run(&db_pool)
            .await
            .context("Failed to migrate the database")?;

        let address = format!(
            "{}:{}",
            configuration.application.host, configuration.application.port
        );
        let listener = TcpListener::bind(address)?;
        let port = listener.local_addr()?.port();
        let server = run(
            listener,
            db_pool,
            ApiKey::new(configuration.application.api_key),
            &configuration.rate_limit,
        )?;

        Ok(Self { port, server })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

pub fn get_connection_pool(configuration: &DatabaseSettings) -> SqlitePool {
    SqlitePoolOptions::new().connect_lazy_with(configuration.connect_options())
}

pub fn run(
    listener: TcpListener,
    db_pool: SqlitePool,
    api_key: ApiKey,
    rate_limit: &RateLimitSettings,
) -> Result<Server, std::io::Error> {
    let db_pool = Data::new(db_pool);
    let api_key = Data::new(api_key);
    // One limiter shared by every worker, wrapped outermost so throttled
    // requests never reach a handler.
    let rate_limit = RateLimit::new(rate_limit);
    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .wrap(rate_limit.clone())
            .route("/health_check", web::get().to(health_check))
            .route("/api/subscribe", web::post().to(subscribe))
            .route("/api/unsubscribe", web::post().to(unsubscribe))
            .route("/api/emails", web::get().to(export_emails))
            .app_data(db_pool.clone())
            .app_data(api_key.clone())
    })
    .listen(listener)?
    .run();
    Ok(server)
}
