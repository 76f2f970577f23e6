// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

mod error;
mod handlers;
mod session;

#[cfg(test)]
mod tests;

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    routing::{delete, get, post, put},
};
use clap::Parser;
use parking_api::{
    LoggingMailer, Mailer, MailerCredentials, ResetLinkSettings, TokenService, accounts,
};
use parking_persistence::Persistence;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    timeout::{RequestBodyTimeoutLayer, TimeoutLayer},
    trace::TraceLayer,
};
use tracing::{error, info, warn};

use crate::handlers::{
    handle_change_password, handle_create_car, handle_create_permit, handle_create_resident,
    handle_create_visitor, handle_delete_car, handle_delete_permit, handle_delete_resident,
    handle_delete_visitor, handle_get_car, handle_get_permit, handle_get_resident, handle_hello,
    handle_list_cars, handle_list_permits, handle_list_resident_cars, handle_list_residents,
    handle_list_visitors, handle_login, handle_logout, handle_password_reset_email,
    handle_refresh_tokens, handle_update_car, handle_update_permit, handle_update_resident,
};

/// Parking Server - HTTP server for the guest parking system
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Database to open: a `mysql://` URL, or a `SQLite` file path. If not
    /// provided, uses an in-memory database.
    #[arg(short, long, env = "DATABASE_URL")]
    database: Option<String>,

    /// Address to bind the server to
    #[arg(long, env = "HTTP_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port to bind the server to
    #[arg(short, long, env = "HTTP_PORT", default_value_t = 5000)]
    port: u16,

    /// Seconds allowed for reading a request body
    #[arg(long, env = "HTTP_READTIMEOUT", default_value_t = 5)]
    read_timeout: u64,

    /// Seconds allowed for handling a whole request
    #[arg(long, env = "HTTP_WRITETIMEOUT", default_value_t = 10)]
    write_timeout: u64,

    /// Origins allowed to call the API from a browser (comma separated)
    #[arg(
        long,
        env = "CORS_ALLOWEDORIGINS",
        value_delimiter = ',',
        default_value = "http://localhost:8080"
    )]
    cors_allowed_origins: Vec<String>,

    /// Public origin of the site; sets the cookie domain and reset links
    #[arg(long, env = "HTTP_DOMAIN", default_value = "localhost")]
    domain: String,

    /// Secret used to sign access tokens
    #[arg(long, env = "TOKEN_ACCESSSECRET", hide_env_values = true)]
    access_secret: String,

    /// Secret used to sign refresh tokens
    #[arg(long, env = "TOKEN_REFRESHSECRET", hide_env_values = true)]
    refresh_secret: String,

    /// OAuth client ID for outgoing mail
    #[arg(long, env = "OAUTH_CLIENTID")]
    oauth_client_id: Option<String>,

    /// OAuth client secret for outgoing mail
    #[arg(long, env = "OAUTH_CLIENTSECRET", hide_env_values = true)]
    oauth_client_secret: Option<String>,

    /// OAuth refresh token for outgoing mail
    #[arg(long, env = "OAUTH_REFRESHTOKEN", hide_env_values = true)]
    oauth_refresh_token: Option<String>,

    /// `From` address for outgoing mail
    #[arg(long, env = "OAUTH_SENDER")]
    oauth_sender: Option<String>,

    /// `time` format description for dates in reset mail
    #[arg(long, env = "DATE_FORMAT", default_value = "[year]-[month]-[day]")]
    date_format: String,

    /// ID of an administrator to create at startup if absent
    #[arg(long, env = "ADMIN_ID", requires = "bootstrap_admin_password")]
    bootstrap_admin_id: Option<String>,

    /// Password for the startup administrator
    #[arg(long, env = "ADMIN_PASSWORD", hide_env_values = true)]
    bootstrap_admin_password: Option<String>,
}

/// Application state shared across handlers.
///
/// The persistence layer sits behind a Mutex; permit issuance additionally
/// runs inside a database transaction, so counters stay consistent even
/// with several server processes on one database.
#[derive(Clone)]
struct AppState {
    persistence: Arc<Mutex<Persistence>>,
    tokens: Arc<TokenService>,
    mailer: Arc<dyn Mailer>,
    reset_link: Arc<ResetLinkSettings>,
    /// Public origin, e.g. `https://parking.example`.
    domain: Arc<str>,
}

/// Builds the application router with all endpoints under `/api`.
fn build_router(app_state: AppState) -> Router {
    let api: Router<AppState> = Router::new()
        .route("/login", post(handle_login))
        .route("/logout", post(handle_logout))
        .route("/refresh-tokens", post(handle_refresh_tokens))
        .route("/password-reset-email", post(handle_password_reset_email))
        .route("/account/password", put(handle_change_password))
        .route("/hello", get(handle_hello))
        .route("/permits", get(handle_list_permits))
        .route("/permit", post(handle_create_permit))
        .route(
            "/permit/{id}",
            get(handle_get_permit)
                .put(handle_update_permit)
                .delete(handle_delete_permit),
        )
        .route("/residents", get(handle_list_residents))
        .route("/account", post(handle_create_resident))
        .route(
            "/resident/{id}",
            get(handle_get_resident)
                .put(handle_update_resident)
                .delete(handle_delete_resident),
        )
        .route("/resident/{id}/cars", get(handle_list_resident_cars))
        .route("/cars", get(handle_list_cars))
        .route("/car", post(handle_create_car))
        .route(
            "/car/{id}",
            get(handle_get_car)
                .put(handle_update_car)
                .delete(handle_delete_car),
        )
        .route("/visitors", get(handle_list_visitors))
        .route("/visitor", post(handle_create_visitor))
        .route("/visitor/{id}", delete(handle_delete_visitor));

    Router::new().nest("/api", api).with_state(app_state)
}

/// Wraps the router in request tracing, CORS and the two timeouts.
fn with_http_layers(router: Router, args: &Args) -> Router {
    let origins: Vec<HeaderValue> = args
        .cors_allowed_origins
        .iter()
        .map(String::as_str)
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(origin, error = %e, "Ignoring unusable CORS origin");
                None
            }
        })
        .collect();

    let cors: CorsLayer = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600));

    router
        .layer(RequestBodyTimeoutLayer::new(Duration::from_secs(
            args.read_timeout,
        )))
        .layer(TimeoutLayer::new(Duration::from_secs(args.write_timeout)))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                error!(error = %e, "Failed to install Ctrl+C handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!(error = %e, "Failed to install terminate handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Parking Server");

    let mut persistence: Persistence = if let Some(database_url) = &args.database {
        info!("Using database at: {}", database_url);
        Persistence::open(database_url)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };

    if let (Some(admin_id), Some(password)) =
        (&args.bootstrap_admin_id, &args.bootstrap_admin_password)
    {
        accounts::bootstrap_admin(&mut persistence, admin_id, password)?;
    }

    let credentials: MailerCredentials = MailerCredentials {
        client_id: args.oauth_client_id.clone(),
        client_secret: args.oauth_client_secret.clone(),
        refresh_token: args.oauth_refresh_token.clone(),
        sender: args.oauth_sender.clone(),
    };

    let app_state: AppState = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        tokens: Arc::new(TokenService::new(&args.access_secret, &args.refresh_secret)),
        mailer: Arc::new(LoggingMailer::new(credentials)),
        reset_link: Arc::new(ResetLinkSettings {
            domain: args.domain.clone(),
            date_format: args.date_format.clone(),
        }),
        domain: Arc::from(args.domain.as_str()),
    };

    // Build router
    let app: Router = with_http_layers(build_router(app_state), &args);

    // Bind to address
    let addr: std::net::SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    info!("Server listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
