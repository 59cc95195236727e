// Task Timeline Application
// Main entry point

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate, NaiveTime};

use task_timeline::models::settings::AppSettings;
use task_timeline::models::task::Task;
use task_timeline::services::settings::{resolve_database_path, SettingsService};
use task_timeline::services::task_store::SqliteTaskStore;
use task_timeline::ui_egui::TimelineApp;
use task_timeline::utils::date::add_days;

fn main() -> eframe::Result<()> {
    // Initialize logging
    env_logger::init();

    log::info!("Starting Task Timeline");

    let (settings, settings_service, store) = match bootstrap() {
        Ok(parts) => parts,
        Err(err) => {
            log::error!("Failed to start: {:#}", err);
            std::process::exit(1);
        }
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([800.0, 600.0])
            .with_title("Task Timeline"),
        ..Default::default()
    };

    eframe::run_native(
        "Task Timeline",
        options,
        Box::new(move |cc| {
            Ok(Box::new(TimelineApp::new(
                cc,
                store,
                settings,
                settings_service,
            )))
        }),
    )
}

fn bootstrap() -> Result<(AppSettings, Option<SettingsService>, SqliteTaskStore)> {
    let settings_service = match SettingsService::from_project_dirs() {
        Ok(service) => Some(service),
        Err(err) => {
            log::warn!("Settings will not be saved: {:#}", err);
            None
        }
    };

    let settings = match settings_service.as_ref().map(SettingsService::load) {
        Some(Ok(settings)) => settings,
        Some(Err(err)) => {
            log::warn!("Using default settings: {:#}", err);
            AppSettings::default()
        }
        None => AppSettings::default(),
    };

    let db_path = resolve_database_path(&settings)?;
    log::info!("Using database at {}", db_path.display());
    let store = SqliteTaskStore::open(&db_path)
        .with_context(|| format!("failed to open {}", db_path.display()))?;

    if store.count()? == 0 {
        seed_tasks(&store, Local::now().date_naive())?;
    }

    Ok((settings, settings_service, store))
}

/// A few tasks around today so a fresh install has something to drag.
fn seed_tasks(store: &SqliteTaskStore, today: NaiveDate) -> Result<()> {
    let time = |h: u32, m: u32| NaiveTime::from_hms_opt(h, m, 0).unwrap_or_default();

    let tasks = [
        Task::builder(0)
            .title("Standup")
            .start_date(today)
            .start_time(time(9, 0))
            .end_time(time(9, 30))
            .color("#3B82F6"),
        Task::builder(0)
            .title("Design review")
            .start_date(add_days(today, 1))
            .start_time(time(14, 0))
            .color("#10B981"),
        Task::builder(0)
            .title("Release deploy")
            .start_date(today)
            .start_time(time(23, 0))
            .end_time(time(1, 0))
            .color("#EF4444"),
        Task::builder(0)
            .title("Conference")
            .start_date(add_days(today, 1))
            .end_date(add_days(today, 2))
            .color("#8B5CF6"),
        Task::builder(0)
            .title("Quarterly report")
            .deadline(add_days(today, 5))
            .color("#F59E0B"),
        Task::builder(0).title("Someday: tidy backlog").future(true),
    ];

    for builder in tasks {
        store.insert(builder.build())?;
    }
    log::info!("Seeded sample tasks");
    Ok(())
}
