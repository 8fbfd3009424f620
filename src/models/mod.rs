pub mod api;
pub mod estimate;
pub mod openweather;
