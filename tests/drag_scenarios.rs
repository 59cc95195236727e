// End-to-end drag scenarios
// Drives the input router against a laid-out surface and an in-memory store

mod fixtures;

use std::time::Instant;

use egui::{Pos2, Rect, Vec2};
use pretty_assertions::assert_eq;

use fixtures::*;
use task_timeline::drag::ghost::GhostPlacement;
use task_timeline::drag::handles::HandleRects;
use task_timeline::drag::layout::{CalendarLayout, ElementLayout, GridLayout, LayoutSurface, LongTermStrip};
use task_timeline::drag::router::{PointerEvent, RouterOutcome};
use task_timeline::drag::session::PointerKind;
use task_timeline::drag::surface::{ScrollViewport, Surface, WeekRow};
use task_timeline::models::grid::{GridContext, TaskElement};
use task_timeline::models::task::{Task, TaskPatch};
use task_timeline::services::task_store::TaskStore;

fn nine_to_ten() -> Task {
    Task::builder(1)
        .title("Standup")
        .start_date(march(10))
        .start_time(time(9, 0))
        .end_time(time(10, 0))
        .build()
}

#[test]
fn test_scenario_a_body_move_two_snap_units() {
    // Visual day starts at 05:00, so 09:00 sits 240px below the column top
    let view = view(5);
    let mut surface = timeline_surface(vec![timed_element(1, 240.0, 60.0)]);
    let mut store = RecordingStore::with_tasks([nine_to_ten()]);
    let mut router = router();

    let outcome = drag(
        &mut router,
        &mut surface,
        &mut store,
        &view,
        &[Pos2::new(150.0, 270.0), Pos2::new(150.0, 285.0), Pos2::new(150.0, 300.0)],
    )
    .unwrap();

    let expected = TaskPatch::default().start_time(time(9, 30)).end_time(time(10, 30));
    assert_eq!(
        outcome,
        RouterOutcome::Committed {
            task_id: 1,
            patch: expected.clone()
        }
    );
    assert_eq!(store.writes, vec![(1, expected)]);

    let task = store.get_task(1).unwrap();
    assert_eq!(task.start_date, Some(march(10)));
    assert_eq!(task.end_date, None);
    assert_eq!(task.start_time, Some(time(9, 30)));
    assert_eq!(task.end_time, Some(time(10, 30)));
    assert!(surface.visuals().is_idle());
}

#[test]
fn test_scenario_b_bottom_resize_one_snap_unit() {
    let view = view(5);
    let mut surface = timeline_surface(vec![timed_element(1, 240.0, 60.0)]);
    let mut store = RecordingStore::with_tasks([nine_to_ten()]);
    let mut router = router();

    let outcome = drag(
        &mut router,
        &mut surface,
        &mut store,
        &view,
        &[Pos2::new(150.0, 298.0), Pos2::new(150.0, 313.0)],
    )
    .unwrap();

    assert_eq!(
        outcome,
        RouterOutcome::Committed {
            task_id: 1,
            patch: TaskPatch::default().end_time(time(10, 15)),
        }
    );
    let task = store.get_task(1).unwrap();
    assert_eq!(task.start_time, Some(time(9, 0)));
    assert_eq!(task.start_date, Some(march(10)));
    assert_eq!(task.end_date, None);
}

#[test]
fn test_scenario_c_midnight_crossing_shows_two_ghosts() {
    let view = view(0);
    let task = Task::builder(1)
        .start_date(march(10))
        .start_time(time(22, 0))
        .end_time(time(2, 0))
        .build();

    // Rendered as two segments: 22:00-24:00 on the 10th, 00:00-02:00 on the 11th
    let first = Rect::from_min_size(Pos2::new(100.0, 1320.0), Vec2::new(100.0, 120.0));
    let second = Rect::from_min_size(Pos2::new(200.0, 0.0), Vec2::new(100.0, 120.0));
    let mut surface = timeline_surface(vec![
        ElementLayout {
            element: TaskElement::new(1, GridContext::Timeline, first).segment_of(1),
            handles: HandleRects::for_grid(GridContext::Timeline, first, true, false),
        },
        ElementLayout {
            element: TaskElement::new(1, GridContext::Timeline, second).segment_of(1),
            handles: HandleRects::for_grid(GridContext::Timeline, second, false, true),
        },
    ]);
    let store = RecordingStore::with_tasks([task]);
    let mut router = router();
    let now = Instant::now();

    router.pointer_down(
        &mut surface,
        &store,
        &view,
        PointerEvent::new(Pos2::new(150.0, 1380.0), PointerKind::Mouse, now),
    );
    // Sideways within the column: past the threshold, no change in time
    router.pointer_move(
        &mut surface,
        &view,
        PointerEvent::new(Pos2::new(160.0, 1380.0), PointerKind::Mouse, now),
    );

    let mut dates: Vec<_> = surface
        .visuals()
        .ghosts
        .values()
        .map(|ghost| match ghost.segment.placement {
            GhostPlacement::TimeSlot { date, top, height } => (date, top, height),
            other => panic!("unexpected placement {:?}", other),
        })
        .collect();
    dates.sort_by_key(|(date, _, _)| *date);
    assert_eq!(
        dates,
        vec![(march(10), 1320.0, 120.0), (march(11), 0.0, 120.0)]
    );
}

fn long_term_surface(task_rect: Rect) -> LayoutSurface {
    LayoutSurface::new(GridLayout {
        long_term: Some(LongTermStrip {
            rect: Rect::from_min_size(Pos2::new(100.0, 0.0), Vec2::new(700.0, 40.0)),
            first_date: march(10),
            column_width: 100.0,
        }),
        day_columns: fixtures::day_columns(50.0),
        elements: vec![ElementLayout {
            element: TaskElement::new(1, GridContext::LongTerm, task_rect),
            handles: HandleRects::for_span_task(task_rect, true, true),
        }],
        ..Default::default()
    })
}

fn conference() -> Task {
    Task::builder(1)
        .title("Conference")
        .start_date(march(10))
        .end_date(march(12))
        .build()
}

#[test]
fn test_scenario_d_right_edge_adds_a_day() {
    let view = view(0);
    let rect = Rect::from_min_size(Pos2::new(100.0, 20.0), Vec2::new(300.0, 18.0));
    let mut surface = long_term_surface(rect);
    let mut store = RecordingStore::with_tasks([conference()]);
    let mut router = router();

    let outcome = drag(
        &mut router,
        &mut surface,
        &mut store,
        &view,
        &[Pos2::new(396.0, 29.0), Pos2::new(446.0, 29.0), Pos2::new(496.0, 29.0)],
    )
    .unwrap();

    assert_eq!(
        outcome,
        RouterOutcome::Committed {
            task_id: 1,
            patch: TaskPatch::default().end_date(march(13)),
        }
    );
    let task = store.get_task(1).unwrap();
    assert_eq!(task.start_date, Some(march(10)));
    assert_eq!(task.end_date, Some(march(13)));
}

#[test]
fn test_scenario_d_left_edge_drops_a_day() {
    let view = view(0);
    let rect = Rect::from_min_size(Pos2::new(100.0, 20.0), Vec2::new(300.0, 18.0));
    let mut surface = long_term_surface(rect);
    let mut store = RecordingStore::with_tasks([conference()]);
    let mut router = router();

    drag(
        &mut router,
        &mut surface,
        &mut store,
        &view,
        &[Pos2::new(104.0, 29.0), Pos2::new(204.0, 29.0)],
    )
    .unwrap();

    let task = store.get_task(1).unwrap();
    assert_eq!(task.start_date, Some(march(11)));
    assert_eq!(task.end_date, Some(march(12)));
    assert_eq!(store.writes.len(), 1);
}

#[test]
fn test_long_term_release_off_every_grid_is_a_no_op() {
    let view = view(0);
    let rect = Rect::from_min_size(Pos2::new(100.0, 20.0), Vec2::new(300.0, 18.0));
    let mut surface = long_term_surface(rect);
    let mut store = RecordingStore::with_tasks([conference()]);
    let mut router = router();

    let outcome = drag(
        &mut router,
        &mut surface,
        &mut store,
        &view,
        &[Pos2::new(150.0, 29.0), Pos2::new(350.0, 2000.0)],
    )
    .unwrap();

    assert_eq!(outcome, RouterOutcome::NoOp { task_id: 1 });
    assert!(store.writes.is_empty());
    assert_eq!(store.get_task(1).unwrap(), conference());
}

#[test]
fn test_small_wiggle_never_writes() {
    let view = view(5);
    let mut surface = timeline_surface(vec![timed_element(1, 240.0, 60.0)]);
    let mut store = RecordingStore::with_tasks([nine_to_ten()]);
    let mut router = router();

    let outcome = drag(
        &mut router,
        &mut surface,
        &mut store,
        &view,
        &[
            Pos2::new(150.0, 270.0),
            Pos2::new(152.0, 272.0),
            Pos2::new(146.0, 266.0),
            Pos2::new(153.0, 274.0),
        ],
    )
    .unwrap();

    assert_eq!(outcome, RouterOutcome::Selected { task_id: 1 });
    assert!(store.writes.is_empty());
    assert_eq!(store.get_task(1).unwrap(), nine_to_ten());
    assert!(surface.visuals().is_idle());
}

#[test]
fn test_drag_back_to_origin_is_a_no_op() {
    let view = view(5);
    let mut surface = timeline_surface(vec![timed_element(1, 240.0, 60.0)]);
    let mut store = RecordingStore::with_tasks([nine_to_ten()]);
    let mut router = router();

    let outcome = drag(
        &mut router,
        &mut surface,
        &mut store,
        &view,
        &[Pos2::new(150.0, 270.0), Pos2::new(150.0, 330.0), Pos2::new(150.0, 272.0)],
    )
    .unwrap();

    assert_eq!(outcome, RouterOutcome::NoOp { task_id: 1 });
    assert!(store.writes.is_empty());
}

#[test]
fn test_long_term_task_dropped_on_hour_grid_becomes_timed() {
    let view = view(0);
    let rect = Rect::from_min_size(Pos2::new(102.0, 20.0), Vec2::new(96.0, 18.0));
    let mut surface = long_term_surface(rect);
    let all_day = Task::builder(1).title("Offsite").start_date(march(10)).build();
    let mut store = RecordingStore::with_tasks([all_day]);
    let mut router = router();

    // Columns start at y = 50, so y = 650 is 10:00 in the second column
    let outcome = drag(
        &mut router,
        &mut surface,
        &mut store,
        &view,
        &[Pos2::new(150.0, 29.0), Pos2::new(250.0, 400.0), Pos2::new(250.0, 652.0)],
    )
    .unwrap();

    assert_eq!(
        outcome,
        RouterOutcome::Committed {
            task_id: 1,
            patch: TaskPatch::default()
                .start_date(march(11))
                .start_time(time(10, 0))
                .end_date(march(11))
                .end_time(time(11, 0)),
        }
    );
    let task = store.get_task(1).unwrap();
    assert!(!task.is_long_term(march(10), 0));
}

#[test]
fn test_auto_scroll_moves_the_candidate_with_the_grid() {
    let view = view(0);
    let task = Task::builder(1)
        .start_date(march(10))
        .start_time(time(5, 0))
        .end_time(time(6, 0))
        .build();
    let mut surface = LayoutSurface::new(GridLayout {
        day_columns: fixtures::day_columns(0.0),
        elements: vec![timed_element(1, 300.0, 60.0)],
        viewport: Some(ScrollViewport {
            rect: Rect::from_min_size(Pos2::new(100.0, 0.0), Vec2::new(300.0, 400.0)),
            offset: 0.0,
            max_offset: 1040.0,
        }),
        ..Default::default()
    });
    let mut store = RecordingStore::with_tasks([task]);
    let mut router = router();
    let now = Instant::now();
    let at = |pos: Pos2| PointerEvent::new(pos, PointerKind::Mouse, now);

    router.pointer_down(&mut surface, &store, &view, at(Pos2::new(150.0, 330.0)));
    router.pointer_move(&mut surface, &view, at(Pos2::new(150.0, 395.0)));
    assert!(router.is_auto_scrolling());

    // 35px into a 40px margin: 12 * 35 / 40
    let outcome = router.tick(&mut surface, &view, now);
    assert_eq!(outcome, RouterOutcome::Dragging { task_id: 1 });
    assert_eq!(surface.scroll_viewport().unwrap().offset, 10.5);

    let outcome = router
        .pointer_up(&mut surface, &mut store, &view, at(Pos2::new(150.0, 395.0)))
        .unwrap();
    assert_eq!(
        outcome,
        RouterOutcome::Committed {
            task_id: 1,
            patch: TaskPatch::default().start_time(time(6, 15)).end_time(time(7, 15)),
        }
    );
    assert!(!router.is_auto_scrolling());
}

#[test]
fn test_calendar_move_across_week_rows() {
    let view = view(0);
    let rect = Rect::from_min_size(Pos2::new(402.0, 20.0), Vec2::new(296.0, 18.0));
    let mut surface = LayoutSurface::new(GridLayout {
        calendar: Some(CalendarLayout {
            rows: vec![
                WeekRow {
                    week_start: march(10),
                    rect: Rect::from_min_size(Pos2::new(0.0, 0.0), Vec2::new(700.0, 80.0)),
                },
                WeekRow {
                    week_start: march(17),
                    rect: Rect::from_min_size(Pos2::new(0.0, 80.0), Vec2::new(700.0, 80.0)),
                },
            ],
            column_width: 100.0,
        }),
        elements: vec![ElementLayout {
            element: TaskElement::new(1, GridContext::Calendar, rect),
            handles: HandleRects::for_span_task(rect, true, true),
        }],
        ..Default::default()
    });
    // Thursday to Saturday
    let task = Task::builder(1).start_date(march(14)).end_date(march(16)).build();
    let mut store = RecordingStore::with_tasks([task]);
    let mut router = router();
    let now = Instant::now();
    let at = |pos: Pos2| PointerEvent::new(pos, PointerKind::Mouse, now);

    router.pointer_down(&mut surface, &store, &view, at(Pos2::new(500.0, 29.0)));
    router.pointer_move(&mut surface, &view, at(Pos2::new(600.0, 29.0)));

    // Friday to Sunday wraps into the next row: one ghost per row
    let mut rows: Vec<_> = surface
        .visuals()
        .ghosts
        .values()
        .map(|ghost| match ghost.segment.placement {
            GhostPlacement::Calendar {
                week_start,
                first_col,
                columns,
            } => (week_start, first_col, columns),
            other => panic!("unexpected placement {:?}", other),
        })
        .collect();
    rows.sort();
    assert_eq!(rows, vec![(march(10), 5, 2), (march(17), 0, 1)]);

    let outcome = router
        .pointer_up(&mut surface, &mut store, &view, at(Pos2::new(600.0, 29.0)))
        .unwrap();
    assert_eq!(
        outcome,
        RouterOutcome::Committed {
            task_id: 1,
            patch: TaskPatch::default().start_date(march(15)).end_date(march(17)),
        }
    );
    assert!(surface.visuals().is_idle());
}
