// Task Timeline Library
// Exports all modules for testing and reuse

pub mod drag;
pub mod models;
pub mod services;
pub mod ui_egui;
pub mod utils;
