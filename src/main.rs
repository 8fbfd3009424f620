use std::net::SocketAddr;

use anyhow::Context;
use axum::{Router, routing::get, response::Html};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_scalar::Scalar;

use solar_yield_estimator::api_docs::ApiDoc;
use solar_yield_estimator::config::Config;
use solar_yield_estimator::routes::estimate_routes::api_routes;
use solar_yield_estimator::services::estimation_service::EstimationService;
use solar_yield_estimator::services::irradiance::IrradianceModel;
use solar_yield_estimator::services::sun_position::SpencerSunPosition;
use solar_yield_estimator::services::timezone::ConfiguredZoneResolver;
use solar_yield_estimator::services::weather_service::{
    OpenWeatherClient, StaticWeatherProvider, WeatherSource,
};
use solar_yield_estimator::shared_state::AppState;

fn init_tracing() {
    let default_level = if cfg!(feature = "verbose_log") { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    // 1. Load configuration
    let config_path = Config::path_from_env();
    let config = Config::load(&config_path)?.apply_env_overrides();
    info!(
        path = %config_path,
        locations = config.locations.len(),
        "configuration loaded"
    );

    // 2. Select the weather source
    let weather = if config.use_offline_weather() {
        info!("offline mode: serving weather snapshots from configuration");
        WeatherSource::Offline(StaticWeatherProvider::new(config.locations.clone()))
    } else {
        let client = OpenWeatherClient::new(&config.weather)
            .context("failed to build the weather HTTP client")?;
        info!(base_url = %config.weather.base_url, "using OpenWeatherMap");
        WeatherSource::Online(client)
    };

    // 3. Wire the estimator and shared state
    let estimator = EstimationService::new(
        weather,
        ConfiguredZoneResolver::from_locations(&config.locations).with_boundary_lookup(),
        SpencerSunPosition,
        IrradianceModel::new(config.panel),
    );
    let state = AppState::new(estimator);

    // 4. Start Axum HTTP server
    let app = Router::new()
        .nest("/api", api_routes(state))
        .route("/scalar", get(|| async {
            Html(Scalar::new(ApiDoc::openapi()).to_html())
        }))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    info!("API Server listening on http://{}", addr);
    info!("Scalar UI: http://{}/scalar", addr);

    axum_server::bind(addr)
        .serve(app.into_make_service())
        .await
        .context("HTTP server terminated")?;
    Ok(())
}
