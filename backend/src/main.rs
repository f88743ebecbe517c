// src/main.rs

use dotenvy::dotenv;
use quizmaster::config::Config;
use quizmaster::models::user::NewUser;
use quizmaster::routes;
use quizmaster::state::AppState;
use quizmaster::store::SharedStorage;
use quizmaster::utils::hash::hash_password;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file (if present)
    dotenv().ok();

    // Load configuration from environment
    let config = Config::from_env();

    let file_appender = tracing_appender::rolling::daily("logs", "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = EnvFilter::new(&config.rust_log);
    let stdout_layer = fmt::layer().with_writer(std::io::stdout).with_target(false);
    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);

    // Initialize Tracing (Logging)
    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    if config.uses_default_secret() {
        tracing::warn!("SESSION_SECRET is not set; session cookies are signed with the public default");
    }

    let state = AppState::in_memory(config.clone());

    // Seed Demo User
    if let Err(e) = seed_demo_user(&state.store, &config).await {
        tracing::error!("Failed to seed demo user: {:?}", e);
    }

    // Create the Axum application router
    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Listening on {}", config.bind_addr);

    // Start the server
    axum::serve(listener, app).await?;
    Ok(())
}

async fn seed_demo_user(
    store: &SharedStorage,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    if let (Some(username), Some(password)) = (&config.demo_username, &config.demo_password) {
        if store.get_user_by_username(username).await?.is_none() {
            tracing::info!("Seeding demo user: {}", username);
            let password_hash = hash_password(password)?;

            store
                .create_user(NewUser {
                    username: username.clone(),
                    password_hash,
                })
                .await?;
            tracing::info!("Demo user created successfully.");
        }
    }
    Ok(())
}
