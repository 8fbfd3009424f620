pub mod aggregator;
pub mod comparison;
pub mod estimation_service;
pub mod irradiance;
pub mod sampler;
pub mod sun_position;
pub mod timezone;
pub mod weather_service;
