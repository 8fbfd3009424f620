pub mod api_docs;
pub mod config;
pub mod controllers;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod shared_state;

pub use error::{EstimateError, WeatherError};
pub use models::estimate::{
    DayVector, DaylightWindow, EnergySample, GeoLocation, LocationResult, RangeMatrix,
    WeatherObservation,
};
pub use services::aggregator::{EnergyAggregator, RangeAggregate};
pub use services::comparison::{Comparison, ComparisonRow};
pub use services::estimation_service::{EstimationService, Estimator};
pub use services::irradiance::{IrradianceEstimate, IrradianceModel, SOLAR_CONSTANT};
pub use services::sampler::TimeSeriesSampler;
pub use services::sun_position::{SpencerSunPosition, SunPositionProvider};
