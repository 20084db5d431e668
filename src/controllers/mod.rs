pub mod home_controller;
pub mod bounds_controller;
