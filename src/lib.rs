pub mod camera;
pub mod config;
pub mod game;
pub mod logging;
pub mod pose;
pub mod render;
