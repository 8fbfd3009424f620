use utoipa::OpenApi;
use crate::controllers::estimate_controller;
use crate::models::{api, estimate};
use crate::services::comparison;
use crate::config;

#[derive(OpenApi)]
#[openapi(
    paths(
        estimate_controller::get_estimate,
        estimate_controller::post_comparison,
        estimate_controller::get_comparison,
        estimate_controller::clear_comparison,
        estimate_controller::get_panel
    ),
    components(
        schemas(
            estimate::GeoLocation,
            estimate::WeatherObservation,
            estimate::EnergySample,
            estimate::DayVector,
            estimate::RangeMatrix,
            estimate::LocationResult,
            comparison::ComparisonRow,
            api::ComparisonRequest,
            api::ComparisonResponse,
            api::ComparisonTable,
            api::LocationFailure,
            api::ErrorBody,
            config::PanelConfig
        )
    ),
    tags(
        (name = "solar-yield-estimator", description = "Solar PV yield estimation API")
    )
)]
pub struct ApiDoc;
