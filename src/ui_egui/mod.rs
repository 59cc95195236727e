mod app;
pub mod ghost_drawing;

pub use app::TimelineApp;
