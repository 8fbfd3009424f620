use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::models::estimate::LocationResult;
use crate::services::comparison::ComparisonRow;

// ─── REST API request / response types ───────────────────────────────────────

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct EstimateQuery {
    /// City name, e.g. "Berlin"
    pub location: String,
    pub start_date: NaiveDate,
    /// Defaults to `start_date`
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ComparisonRequest {
    pub locations: Vec<String>,
    pub start_date: NaiveDate,
    /// Defaults to `start_date`
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LocationFailure {
    pub location: String,
    pub error: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ComparisonResponse {
    /// Results computed by this request
    pub results: Vec<LocationResult>,
    /// Locations that could not be estimated, with the reason
    pub failures: Vec<LocationFailure>,
    /// The whole session table, including earlier requests
    pub table: Vec<ComparisonRow>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ComparisonTable {
    pub rows: Vec<ComparisonRow>,
    pub best: Option<ComparisonRow>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
}
