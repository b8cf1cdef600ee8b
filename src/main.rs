use mimalloc::MiMalloc;
use staffdesk::Desk;
use staffdesk::config::Config;
use staffdesk::server::{DeskState, desk_router};
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cfg = Config::load()?;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cfg.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_level(true)
                .with_target(false),
        )
        .init();

    info!(
        database_url = %cfg.database_url,
        listen_addr = %cfg.listen_addr,
        loglevel = %cfg.loglevel,
        admin_users = cfg.admin_users.len(),
        insecure_cookie = cfg.insecure_cookie
    );

    let policy = cfg.admin_policy();
    if policy.is_flat() {
        warn!("no admin users configured; every logged-in user can view and delete all employees");
    }
    if cfg.cookie_key.is_none() {
        warn!("no cookie key configured; sessions will not survive a restart");
    }

    let pool = staffdesk::db::connect(&cfg.database_url).await?;
    let desk = Desk::open(pool, cfg.password_hasher()?, policy).await?;
    info!(
        users = desk.credentials().count().await?,
        employees = desk.employees().count().await?,
        "database ready"
    );

    let state = DeskState::new(desk, cfg.cookie_key()?, cfg.insecure_cookie);
    let app = desk_router(state);

    let listener = TcpListener::bind(&cfg.listen_addr).await?;
    info!("HTTP server listening on {}", cfg.listen_addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
    }
}
