// Settings module
// Persisted view/drag preferences and the read-only view snapshot a drag session works against

use std::path::PathBuf;

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum SettingsError {
    #[error("day start hour must be between 0 and 23, got {0}")]
    DayStartHour(u32),
    #[error("zoom level must be a positive number of pixels per minute, got {0}")]
    ZoomLevel(f32),
    #[error("visible days must be between 1 and 14, got {0}")]
    VisibleDays(u32),
    #[error("first day of week must be 0 (Sunday) to 6 (Saturday), got {0}")]
    FirstDayOfWeek(u8),
    #[error("drag threshold must not be negative, got {0}")]
    MoveThreshold(f32),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewSettings {
    /// Pixels per minute in the hour grid
    pub zoom_level: f32,
    /// Hour at which a visual day begins
    pub day_start_hour: u32,
    /// 0 = Sunday ... 6 = Saturday
    pub first_day_of_week: u8,
    /// Number of day columns in the hour grid
    pub visible_days: u32,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            zoom_level: 1.0,
            day_start_hour: 0,
            first_day_of_week: 0, // Sunday
            visible_days: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DragSettings {
    /// Pointer travel (either axis) before a press becomes a drag
    pub move_threshold_px: f32,
    /// Touch hold duration that opens the task menu
    pub long_press_ms: u64,
    /// Distance from the viewport edge that triggers auto-scroll
    pub auto_scroll_margin_px: f32,
    /// Scroll distance per timer tick at the very edge
    pub auto_scroll_step_px: f32,
    pub auto_scroll_interval_ms: u64,
    /// Let a plain body grab start a move (otherwise only the grip does)
    pub body_drag: bool,
}

impl Default for DragSettings {
    fn default() -> Self {
        Self {
            move_threshold_px: 5.0,
            long_press_ms: 500,
            auto_scroll_margin_px: 40.0,
            auto_scroll_step_px: 12.0,
            auto_scroll_interval_ms: 16,
            body_drag: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// SQLite file; defaults to the platform data directory
    pub database_path: Option<PathBuf>,
    pub view: ViewSettings,
    pub drag: DragSettings,
}

impl AppSettings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.view.day_start_hour > 23 {
            return Err(SettingsError::DayStartHour(self.view.day_start_hour));
        }
        if !(self.view.zoom_level.is_finite() && self.view.zoom_level > 0.0) {
            return Err(SettingsError::ZoomLevel(self.view.zoom_level));
        }
        if !(1..=14).contains(&self.view.visible_days) {
            return Err(SettingsError::VisibleDays(self.view.visible_days));
        }
        if self.view.first_day_of_week > 6 {
            return Err(SettingsError::FirstDayOfWeek(self.view.first_day_of_week));
        }
        if self.drag.move_threshold_px < 0.0 {
            return Err(SettingsError::MoveThreshold(self.drag.move_threshold_px));
        }
        Ok(())
    }
}

/// Read-only view state handed to a drag session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewConfig {
    pub zoom_level: f32,
    pub day_start_hour: u32,
    pub week_start: Weekday,
    /// Left-edge date of the visible window
    pub window_start: NaiveDate,
}

impl ViewConfig {
    pub fn new(settings: &ViewSettings, window_start: NaiveDate) -> Self {
        Self {
            zoom_level: settings.zoom_level,
            day_start_hour: settings.day_start_hour.min(23),
            week_start: weekday_from_index(settings.first_day_of_week),
            window_start,
        }
    }
}

/// Maps the persisted 0 = Sunday convention onto chrono's `Weekday`.
pub fn weekday_from_index(index: u8) -> Weekday {
    match index % 7 {
        0 => Weekday::Sun,
        1 => Weekday::Mon,
        2 => Weekday::Tue,
        3 => Weekday::Wed,
        4 => Weekday::Thu,
        5 => Weekday::Fri,
        _ => Weekday::Sat,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert_eq!(AppSettings::default().validate(), Ok(()));
        assert_eq!(DragSettings::default().move_threshold_px, 5.0);
    }

    #[test]
    fn test_rejects_bad_start_hour() {
        let mut settings = AppSettings::default();
        settings.view.day_start_hour = 24;
        assert_eq!(settings.validate(), Err(SettingsError::DayStartHour(24)));
    }

    #[test]
    fn test_rejects_zero_zoom() {
        let mut settings = AppSettings::default();
        settings.view.zoom_level = 0.0;
        assert!(matches!(settings.validate(), Err(SettingsError::ZoomLevel(_))));
    }

    #[test]
    fn test_weekday_from_index() {
        assert_eq!(weekday_from_index(0), Weekday::Sun);
        assert_eq!(weekday_from_index(1), Weekday::Mon);
        assert_eq!(weekday_from_index(6), Weekday::Sat);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let settings: AppSettings = toml::from_str("[view]\nday_start_hour = 5\n").unwrap();
        assert_eq!(settings.view.day_start_hour, 5);
        assert_eq!(settings.view.zoom_level, 1.0);
        assert_eq!(settings.drag, DragSettings::default());
    }
}
