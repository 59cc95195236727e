mod grid_builder;
mod input;
mod painting;

use std::collections::BTreeMap;

use chrono::{Datelike, Local, NaiveDate};
use egui::{Pos2, Rect};

use self::grid_builder::GridAreas;
use crate::drag::layout::LayoutSurface;
use crate::drag::router::InputRouter;
use crate::drag::surface::Surface;
use crate::models::settings::{AppSettings, ViewConfig};
use crate::models::task::{Task, TaskId};
use crate::services::settings::SettingsService;
use crate::services::task_store::SqliteTaskStore;
use crate::utils::date::add_days;

const MIN_ZOOM_LEVEL: f32 = 0.25;
const MAX_ZOOM_LEVEL: f32 = 4.0;

/// Task menu opened by a touch long-press.
struct TaskMenu {
    task_id: TaskId,
    pos: Pos2,
}

pub struct TimelineApp {
    store: SqliteTaskStore,
    settings: AppSettings,
    /// `None` when the platform config directory is unavailable
    settings_service: Option<SettingsService>,
    /// Snapshot used for painting; reloaded after every commit
    tasks: BTreeMap<TaskId, Task>,
    surface: LayoutSurface,
    router: InputRouter,
    window_start: NaiveDate,
    scroll_offset: f32,
    selected: Option<TaskId>,
    task_menu: Option<TaskMenu>,
    /// Set between a touch start and end so the pointer events egui synthesizes
    /// from the same finger are not routed twice
    touch_active: bool,
    status: Option<String>,
}

impl eframe::App for TimelineApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let view = self.view_config();

        self.render_toolbar(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            let rect = ui.available_rect_before_wrap();
            ui.allocate_rect(rect, egui::Sense::hover());
            let areas = GridAreas::split(rect);

            if let Some(viewport) = self.surface.scroll_viewport() {
                self.scroll_offset = viewport.offset;
            }
            self.handle_wheel(ui, &areas);
            self.rebuild_layout(&areas, &view);

            if self.handle_input(ctx, &view) {
                self.rebuild_layout(&areas, &view);
            }
            let outcome = self
                .router
                .tick(&mut self.surface, &view, std::time::Instant::now());
            self.apply_outcome(outcome);

            self.paint(ui, &view, &areas);
        });

        self.render_task_menu(ctx);

        if !self.router.is_idle() {
            ctx.request_repaint();
        }
    }
}

impl TimelineApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        store: SqliteTaskStore,
        settings: AppSettings,
        settings_service: Option<SettingsService>,
    ) -> Self {
        cc.egui_ctx.set_visuals(egui::Visuals::dark());

        let router = InputRouter::new(settings.drag.clone());
        let mut app = Self {
            store,
            settings,
            settings_service,
            tasks: BTreeMap::new(),
            surface: LayoutSurface::default(),
            router,
            window_start: Local::now().date_naive(),
            scroll_offset: 0.0,
            selected: None,
            task_menu: None,
            touch_active: false,
            status: None,
        };
        app.reload_tasks();
        app
    }

    fn view_config(&self) -> ViewConfig {
        ViewConfig::new(&self.settings.view, self.window_start)
    }

    fn reload_tasks(&mut self) {
        match self.store.list() {
            Ok(tasks) => {
                self.tasks = tasks.into_iter().map(|task| (task.id, task)).collect();
            }
            Err(err) => {
                log::error!("Failed to load tasks: {:#}", err);
                self.status = Some("Could not load tasks".to_string());
            }
        }
    }

    fn rebuild_layout(&mut self, areas: &GridAreas, view: &ViewConfig) {
        let tasks: Vec<&Task> = self.tasks.values().collect();
        let layout = grid_builder::build_layout(
            areas,
            &tasks,
            view,
            self.settings.view.visible_days,
            self.scroll_offset,
        );
        if let Some(viewport) = layout.viewport {
            self.scroll_offset = viewport.offset;
        }
        self.surface.set_layout(layout);
    }

    fn handle_wheel(&mut self, ui: &egui::Ui, areas: &GridAreas) {
        if !self.router.is_idle() {
            return;
        }
        let hovering = ui
            .input(|i| i.pointer.hover_pos())
            .map_or(false, |pos| areas.timeline.contains(pos));
        if hovering {
            let delta = ui.input(|i| i.smooth_scroll_delta.y);
            self.scroll_offset -= delta;
        }
    }

    fn shift_window(&mut self, days: i64) {
        self.window_start = add_days(self.window_start, days);
        self.task_menu = None;
    }

    fn set_zoom(&mut self, zoom_level: f32) {
        self.settings.view.zoom_level = zoom_level.clamp(MIN_ZOOM_LEVEL, MAX_ZOOM_LEVEL);
        if let Some(service) = &self.settings_service {
            if let Err(err) = service.save(&self.settings) {
                log::warn!("Failed to save settings: {:#}", err);
            }
        }
    }

    fn render_toolbar(&mut self, ctx: &egui::Context) {
        let idle = self.router.is_idle();
        let step = i64::from(self.settings.view.visible_days);

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.add_enabled(idle, egui::Button::new("◀")).clicked() {
                    self.shift_window(-step);
                }
                if ui.add_enabled(idle, egui::Button::new("Today")).clicked() {
                    self.window_start = Local::now().date_naive();
                }
                if ui.add_enabled(idle, egui::Button::new("▶")).clicked() {
                    self.shift_window(step);
                }

                ui.separator();
                ui.label(
                    egui::RichText::new(format!(
                        "{} {}",
                        self.window_start.format("%B"),
                        self.window_start.year()
                    ))
                    .strong(),
                );

                ui.separator();
                let zoom = self.settings.view.zoom_level;
                if ui.add_enabled(idle, egui::Button::new("−")).clicked() {
                    self.set_zoom(zoom / 1.25);
                }
                ui.label(format!("{:.0}%", zoom * 100.0));
                if ui.add_enabled(idle, egui::Button::new("+")).clicked() {
                    self.set_zoom(zoom * 1.25);
                }

                if let Some(status) = &self.status {
                    ui.separator();
                    ui.colored_label(egui::Color32::from_rgb(220, 80, 80), status);
                }
            });
        });
    }

    fn render_task_menu(&mut self, ctx: &egui::Context) {
        let Some(menu) = &self.task_menu else {
            return;
        };
        let Some(task) = self.tasks.get(&menu.task_id) else {
            self.task_menu = None;
            return;
        };

        let mut close = false;
        let mut select = false;
        egui::Area::new(egui::Id::new("task_menu"))
            .fixed_pos(menu.pos)
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    ui.label(egui::RichText::new(&task.title).strong());
                    ui.label(schedule_summary(task));
                    ui.separator();
                    if ui.button("Select").clicked() {
                        select = true;
                    }
                    if ui.button("Close").clicked() {
                        close = true;
                    }
                });
            });

        if select {
            self.selected = Some(menu.task_id);
        }
        if select || close {
            self.task_menu = None;
        }
    }
}

/// One-line description of a task's stored schedule.
fn schedule_summary(task: &Task) -> String {
    let date = |d: Option<NaiveDate>| d.map(|d| d.format("%a %d %b").to_string());
    let time = |t: Option<chrono::NaiveTime>| t.map(|t| t.format("%H:%M").to_string());

    let start = [date(task.start_date), time(task.start_time)]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ");
    let end = [date(task.end_date), time(task.end_time)]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ");

    match (start.is_empty(), end.is_empty()) {
        (true, true) if task.is_future => "Backlog".to_string(),
        (true, true) => "Unscheduled".to_string(),
        (false, true) => start,
        (true, false) => format!("until {}", end),
        (false, false) => format!("{} – {}", start, end),
    }
}

/// Area covered by the painted grids, used to keep hover effects inside them.
fn grids_rect(areas: &GridAreas) -> Rect {
    areas.strip.union(areas.timeline).union(areas.calendar)
}
