pub mod estimate_controller;
