use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;
use tokio::time::interval;

use clubhouse::{
    api::{create_api_router, AppContext},
    config::Config,
    rate_limiter::RateLimiter,
    state::AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    tracing::info!("Starting Clubhouse");

    let config = Config::from_env()?;
    let state = AppState::new(&config);
    let rate_limiter = RateLimiter::new(100);

    let progression_state = state.clone();
    let refresh_secs = config.club.leaderboard_refresh_secs;

    tokio::spawn(async move {
        let mut interval = interval(Duration::from_secs(refresh_secs));

        loop {
            interval.tick().await;
            progression_state.rotate_missions_if_needed().await;

            let standings = progression_state.refresh_leaderboard().await;
            if let Some(leader) = standings.first() {
                tracing::info!(
                    "Leaderboard refreshed - {} leads with {} points",
                    leader.display_name,
                    leader.points
                );
            }
        }
    });

    let session_state = state.clone();

    tokio::spawn(async move {
        let mut interval = interval(Duration::from_secs(300));

        loop {
            interval.tick().await;
            session_state.sessions.cleanup_expired_sessions().await;

            let session_count = session_state.sessions.get_session_count().await;
            if session_count > 0 {
                tracing::info!("Active sessions: {}", session_count);
            }
        }
    });

    let context = AppContext {
        state: state.clone(),
        config: config.clone(),
        rate_limiter,
    };

    let app: Router = create_api_router(context);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind to {}: {}", addr, e))?;

    tracing::info!("Clubhouse running on http://{}", addr);
    tracing::info!(
        "Daily missions on the board: {}",
        config.club.daily_mission_count
    );

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<std::net::SocketAddr>(),
    )
    .await
    .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    Ok(())
}
