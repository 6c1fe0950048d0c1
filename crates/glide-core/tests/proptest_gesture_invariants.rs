//! Property-based invariant tests for the gesture pipeline.
//!
//! 1. Moves that stay inside the threshold radius never start a gesture.
//! 2. The first move outside the radius starts exactly one gesture whose
//!    distance equals the displacement.
//! 3. Every signal sequence is Start, Move*, End, with nothing after End.
//! 4. The end payload is the last delivered sample.
//! 5. Velocity follows `v' = 0.3 v + 0.7 delta / dt`.
//! 6. Any burst of kicks before a frame yields exactly one update.
//! 7. Concurrent touches do not influence each other.
//! 8. Horizontal swipes classify symmetrically under mirroring.

use glide_core::event::{
    InputEvent, MouseButton, MouseEvent, MouseEventKind, TargetId, Touch, TouchEvent, TouchId,
    TouchPhase,
};
use glide_core::frame_scheduler::{FrameRequest, FrameScheduler, FrameTask};
use glide_core::geometry::{Point, Size};
use glide_core::input_hub::InputHub;
use glide_core::motion::MotionAggregator;
use glide_core::semantic_event::{GestureEvent, GesturePhase, SwipeDirection};
use glide_core::session::{ContactKey, GestureSample};
use glide_core::swipe::{SwipeClassifier, SwipeSettings, dominant_direction};
use proptest::prelude::*;

const T: TargetId = TargetId(1);

// ── Strategy helpers ──────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
enum Step {
    Move { x: i32, y: i32, dt: u8 },
    Frame,
}

fn arb_step() -> impl Strategy<Value = Step> {
    prop_oneof![
        3 => (-300i32..=300, -300i32..=300, 0u8..=40)
            .prop_map(|(x, y, dt)| Step::Move { x, y, dt }),
        1 => Just(Step::Frame),
    ]
}

fn arb_inside_radius() -> impl Strategy<Value = Vec<(i32, i32)>> {
    // max distance sqrt(32) < 6
    prop::collection::vec((-4i32..=4, -4i32..=4), 0..30)
}

fn arb_point() -> impl Strategy<Value = (i32, i32)> {
    (-500i32..=500, -500i32..=500)
}

fn mouse(kind: MouseEventKind, x: f64, y: f64, t: f64) -> InputEvent {
    MouseEvent::new(kind, Point::new(x, y), T, t).into()
}

fn phases(events: &[GestureEvent]) -> Vec<GesturePhase> {
    events.iter().map(GestureEvent::phase).collect()
}

fn touch(phase: TouchPhase, id: i64, x: f64, y: f64, t: f64) -> InputEvent {
    TouchEvent::new(phase, vec![Touch::new(TouchId(id), Point::new(x, y), T)], t).into()
}

// ═════════════════════════════════════════════════════════════════════════
// Threshold
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn moves_inside_radius_never_start(moves in arb_inside_radius()) {
        let mut hub = InputHub::default();
        let mut sink: Vec<GestureEvent> = Vec::new();
        hub.handle_input(&mouse(MouseEventKind::Down(MouseButton::Left), 0.0, 0.0, 0.0), &mut sink);
        for (i, (x, y)) in moves.iter().enumerate() {
            hub.handle_input(&mouse(MouseEventKind::Move, f64::from(*x), f64::from(*y), i as f64), &mut sink);
        }
        let response = hub.handle_input(
            &mouse(MouseEventKind::Up(MouseButton::Left), 0.0, 0.0, 100.0),
            &mut sink,
        );
        prop_assert!(sink.is_empty());
        prop_assert!(response.is_empty());
    }

    #[test]
    fn first_move_outside_radius_starts_once((x, y) in arb_point(), dt in 1u8..=50) {
        prop_assume!(x * x + y * y >= 36);
        let mut hub = InputHub::default();
        let mut sink: Vec<GestureEvent> = Vec::new();
        hub.handle_input(&mouse(MouseEventKind::Down(MouseButton::Left), 10.0, 20.0, 0.0), &mut sink);
        hub.handle_input(
            &mouse(MouseEventKind::Move, 10.0 + f64::from(x), 20.0 + f64::from(y), f64::from(dt)),
            &mut sink,
        );
        hub.handle_input(&mouse(MouseEventKind::Move, 0.0, 0.0, 100.0), &mut sink);
        prop_assert_eq!(phases(&sink), vec![GesturePhase::Start]);
        let s = sink[0].sample();
        prop_assert_eq!((s.dist_x, s.dist_y), (f64::from(x), f64::from(y)));
        prop_assert_eq!((s.delta_x, s.delta_y), (f64::from(x), f64::from(y)));
        prop_assert_eq!(s.velocity_x, f64::from(x) / f64::from(dt));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// Signal ordering
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn signal_sequences_are_well_formed(steps in prop::collection::vec(arb_step(), 0..60)) {
        let mut hub = InputHub::default();
        let mut sink: Vec<GestureEvent> = Vec::new();
        let mut now = 0.0;
        hub.handle_input(&mouse(MouseEventKind::Down(MouseButton::Left), 0.0, 0.0, now), &mut sink);
        for step in &steps {
            match *step {
                Step::Move { x, y, dt } => {
                    now += f64::from(dt);
                    hub.handle_input(&mouse(MouseEventKind::Move, f64::from(x), f64::from(y), now), &mut sink);
                }
                Step::Frame => {
                    now += 16.0;
                    hub.on_frame(now, &mut sink);
                }
            }
        }
        hub.handle_input(&mouse(MouseEventKind::Up(MouseButton::Left), 0.0, 0.0, now), &mut sink);
        hub.on_frame(now + 16.0, &mut sink);
        hub.on_frame(now + 32.0, &mut sink);

        prop_assert!(!hub.needs_frame());
        prop_assert_eq!(hub.active_count(), 0);

        let seen = phases(&sink);
        if seen.is_empty() {
            return Ok(());
        }
        prop_assert_eq!(seen[0], GesturePhase::Start);
        prop_assert_eq!(seen.last().copied(), Some(GesturePhase::End));
        prop_assert!(seen[1..seen.len() - 1].iter().all(|p| *p == GesturePhase::Move));

        // The end carries the last delivered sample.
        let end = sink[sink.len() - 1].sample();
        let before = sink[sink.len() - 2].sample();
        prop_assert_eq!(end, before);
    }

    #[test]
    fn any_burst_of_kicks_yields_one_update(kicks in 1usize..50) {
        let mut scheduler = FrameScheduler::new();
        prop_assert_eq!(scheduler.kick(), FrameRequest::Schedule);
        for _ in 1..kicks {
            prop_assert_eq!(scheduler.kick(), FrameRequest::AlreadyScheduled);
        }
        prop_assert_eq!(scheduler.on_frame(), Some(FrameTask::Update));
        prop_assert_eq!(scheduler.on_frame(), None);
        prop_assert!(scheduler.is_idle());
    }

    #[test]
    fn coalesced_update_reports_latest_position(
        points in prop::collection::vec(arb_point(), 1..20),
    ) {
        let seed = GestureSample::seed(T, ContactKey::Mouse, Point::default(), 0.0, Point::new(0.5, 0.5), 1.0, Vec::new());
        let mut agg = MotionAggregator::new(seed);
        for (i, (x, y)) in points.iter().enumerate() {
            agg.record(Point::new(f64::from(*x), f64::from(*y)), 2.0 + i as f64, None);
        }
        let out = agg.on_frame();
        prop_assert_eq!(out.len(), 1);
        let (lx, ly) = points[points.len() - 1];
        prop_assert_eq!(out[0].sample().page(), Point::new(f64::from(lx), f64::from(ly)));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// Kinematics
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn velocity_follows_smoothing_recurrence(
        path in prop::collection::vec((arb_point(), 0u8..=40), 1..30),
    ) {
        let mut s = GestureSample::seed(T, ContactKey::Mouse, Point::default(), 0.0, Point::new(6.0, 0.0), 10.0, Vec::new());
        for ((x, y), dt) in path {
            let (vx, vy) = (s.velocity_x, s.velocity_y);
            let (px, py) = (s.page_x, s.page_y);
            let now = s.timestamp + f64::from(dt);
            let (x, y) = (f64::from(x), f64::from(y));
            s.advance(Point::new(x, y), now);

            prop_assert_eq!((s.dist_x, s.dist_y), (x, y));
            prop_assert_eq!((s.delta_x, s.delta_y), (x - px, y - py));
            if dt == 0 {
                prop_assert_eq!((s.velocity_x, s.velocity_y), (vx, vy));
            } else {
                let dt = f64::from(dt);
                let ex = 0.3 * vx + 0.7 * (x - px) / dt;
                let ey = 0.3 * vy + 0.7 * (y - py) / dt;
                prop_assert!((s.velocity_x - ex).abs() < 1e-9);
                prop_assert!((s.velocity_y - ey).abs() < 1e-9);
            }
            prop_assert!(s.velocity_x.is_finite() && s.velocity_y.is_finite());
        }
    }

    #[test]
    fn concurrent_touches_are_independent(
        one in prop::collection::vec(arb_point(), 1..15),
        two in prop::collection::vec(arb_point(), 1..15),
    ) {
        let run = |with_second: bool| {
            let mut hub = InputHub::default();
            let mut sink: Vec<GestureEvent> = Vec::new();
            hub.handle_input(&touch(TouchPhase::Start, 1, 0.0, 0.0, 0.0), &mut sink);
            if with_second {
                hub.handle_input(&touch(TouchPhase::Start, 2, 0.0, 0.0, 0.0), &mut sink);
            }
            for i in 0..one.len().max(two.len()) {
                let now = 10.0 * (i as f64 + 1.0);
                if let Some((x, y)) = one.get(i) {
                    hub.handle_input(&touch(TouchPhase::Move, 1, f64::from(*x), f64::from(*y), now), &mut sink);
                }
                if with_second {
                    if let Some((x, y)) = two.get(i) {
                        hub.handle_input(&touch(TouchPhase::Move, 2, f64::from(*x), f64::from(*y), now), &mut sink);
                    }
                }
                hub.on_frame(now + 1.0, &mut sink);
            }
            hub.cancel_all(&mut sink);
            hub.on_frame(1_000.0, &mut sink);
            sink.into_iter()
                .filter(|e| e.sample().contact == ContactKey::Touch(TouchId(1)))
                .collect::<Vec<_>>()
        };
        prop_assert_eq!(run(false), run(true));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// Classification
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn horizontal_mirroring_flips_direction(
        dx in 1i32..=400,
        dy in -400i32..=400,
        vx in -3.0f64..3.0,
        vy in -3.0f64..3.0,
    ) {
        prop_assume!(dx > dy.abs());
        let classifier = SwipeClassifier::new(SwipeSettings::default());
        let size = Size::new(300.0, 300.0);
        let sample = |dx: f64, vx: f64| {
            let mut s = GestureSample::seed(T, ContactKey::Mouse, Point::default(), 0.0, Point::new(dx, f64::from(dy)), 1.0, Vec::new());
            s.velocity_x = vx;
            s.velocity_y = vy;
            s
        };
        let right = classifier.classify(&sample(f64::from(dx), vx), T, size);
        let left = classifier.classify(&sample(-f64::from(dx), -vx), T, size);
        prop_assert_eq!(right.map(|e| e.direction), right.map(|_| SwipeDirection::Right));
        prop_assert_eq!(left.map(|e| e.direction), left.map(|_| SwipeDirection::Left));
        prop_assert_eq!(right.is_some(), left.is_some());
    }

    #[test]
    fn dominant_direction_matches_larger_axis(dx in -1000i32..=1000, dy in -1000i32..=1000) {
        prop_assume!(dx.abs() != dy.abs());
        let dir = dominant_direction(f64::from(dx), f64::from(dy));
        if dx.abs() > dy.abs() {
            prop_assert!(dir.is_horizontal());
            prop_assert_eq!(dir == SwipeDirection::Right, dx > 0);
        } else {
            prop_assert!(dir.is_vertical());
            prop_assert_eq!(dir == SwipeDirection::Down, dy > 0);
        }
    }

    #[test]
    fn stationary_gesture_never_swipes(vx in -10.0f64..10.0, vy in -10.0f64..10.0) {
        let mut s = GestureSample::seed(T, ContactKey::Mouse, Point::default(), 0.0, Point::default(), 1.0, Vec::new());
        s.velocity_x = vx;
        s.velocity_y = vy;
        prop_assert!(SwipeClassifier::default().classify(&s, T, Size::new(200.0, 100.0)).is_none());
    }
}
