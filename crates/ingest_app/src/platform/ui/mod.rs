pub mod commands;
pub mod progress;
pub mod render;
