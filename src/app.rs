/*
 * Responsibility
 * - Config読み込み → ゲート生成 → Router 組み立て
 * - Middleware の適用 (JWT ゲート / request-id / trace / security headers)
 * - axum::serve() で起動
 */
use std::{panic, process};

use anyhow::Result;
use axum::{Router, routing::get};
use hs256_gate::{
    JwtHs256,
    middleware::{
        http::{self, HttpLimits},
        security_headers,
    },
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    api::{self, v1::dto::claims::AppClaims, v1::handlers::health::health},
    config::Config,
};

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,hs256_gate=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        tracing::error!(?info, "panic");

        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env()?;
    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        auth_error_detail = config.auth_error_detail,
        "starting API in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let app = build_router(&config);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_gate(config: &Config) -> JwtHs256<AppClaims> {
    JwtHs256::new(config.jwt_secret.as_bytes(), AppClaims::default)
        .with_error_detail(config.auth_error_detail)
        .with_form_limit(config.form_body_limit_bytes)
}

fn build_router(config: &Config) -> Router {
    let router = Router::new()
        .route("/health", get(health))
        .nest("/api/v1", api::v1::routes(build_gate(config)));

    let router = security_headers::apply(router);
    http::apply(
        router,
        HttpLimits {
            body_limit_bytes: config.form_body_limit_bytes,
            timeout: config.request_timeout,
        },
    )
}
