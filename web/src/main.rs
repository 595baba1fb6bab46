use anyhow::Context;
use axum::Router;
use storage::Database;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod config;
mod error;
mod extract;
mod features;

use config::Config;

#[derive(OpenApi)]
#[openapi(
    paths(
        features::scores::handlers::submit_score,
        features::scores::handlers::my_scores,
        features::scores::handlers::event_scores,
        features::scores::handlers::update_score,
        features::scores::handlers::delete_score,
        features::scores::handlers::approve_score,
        features::scores::handlers::reject_score,
        features::scores::handlers::import_issf_scores,
        features::events::handlers::list_events,
        features::events::handlers::get_event,
        features::events::handlers::create_event,
        features::events::handlers::update_event,
        features::events::handlers::delete_event,
        features::events::handlers::register_for_event,
        features::events::handlers::unregister_from_event,
        features::leaderboard::handlers::get_overall_leaderboard,
        features::leaderboard::handlers::get_event_leaderboard,
        features::leaderboard::handlers::get_club_leaderboard,
        features::leaderboard::handlers::get_user_statistics,
    ),
    components(
        schemas(
            storage::dto::score::SubmitScoreRequest,
            storage::dto::score::UpdateScoreRequest,
            storage::dto::score::RejectScoreRequest,
            storage::dto::score::ScoreResponse,
            storage::dto::event::CreateEventRequest,
            storage::dto::event::UpdateEventRequest,
            storage::dto::event::EventResponse,
            storage::dto::event::RegistrationResponse,
            storage::dto::import::ImportScoresRequest,
            storage::dto::import::IssfScoreRow,
            storage::dto::import::ImportRowError,
            storage::dto::import::ImportResult,
            storage::dto::leaderboard::LeaderboardEntry,
            storage::dto::leaderboard::ClubLeaderboardEntry,
            storage::dto::leaderboard::EventLeaderboardEntry,
            storage::dto::leaderboard::LeaderboardFilters,
            storage::dto::leaderboard::TimePeriod,
            storage::dto::common::PaginationMeta,
            storage::dto::user::UserStatistics,
            storage::models::Score,
            storage::models::ScoreStatus,
            storage::models::Event,
            storage::models::EventStatus,
            storage::models::EventRegistration,
            storage::models::RegistrationStatus,
            storage::models::IssfScore,
            storage::models::User,
            storage::models::UserRole,
            storage::models::MembershipType,
        )
    ),
    tags(
        (name = "scores", description = "Score submission and lifecycle endpoints"),
        (name = "events", description = "Event and registration endpoints"),
        (name = "leaderboard", description = "Ranking endpoints, recomputed on every read"),
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("Starting federation results API");

    let config = Config::from_env().context("Failed to load API configuration")?;
    tracing::info!("Configuration loaded successfully");

    tracing::info!(
        "Connecting to database at: {}",
        config
            .database_url
            .split('@')
            .next_back()
            .unwrap_or("unknown")
    );
    let db = Database::new(&config.database_url)
        .await
        .context("Failed to initialize database")?;
    tracing::info!("Database connection established");

    tracing::info!("Running database migrations");
    db.run_migrations()
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Database migrations completed successfully");

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/api/scores", features::scores::routes::routes())
        .nest("/api/events", features::events::routes::routes())
        .nest("/api/leaderboard", features::leaderboard::routes::routes())
        .layer(cors)
        .with_state(db);

    let bind_address = format!("{}:{}", config.host, config.port);
    tracing::info!("Starting server at http://{}", bind_address);
    tracing::info!("Swagger UI available at http://{}/swagger-ui", bind_address);

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .context("Failed to bind server address")?;
    axum::serve(listener, app).await?;

    Ok(())
}
