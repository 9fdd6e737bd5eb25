use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ripple_core::glam::Vec2;
use ripple_core::splash::OFFSCREEN;
use ripple_core::{RingPointer, Session, SplashPlan, Viewport, WavePasses, WaveSettings};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
enum Event {
    Splash(SplashPlan),
    Step(RingPointer),
    Present(RingPointer),
}

#[derive(Default)]
struct Recorder {
    events: Vec<Event>,
}

impl Recorder {
    fn drain(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }
}

impl WavePasses for Recorder {
    fn add_splash(&mut self, plan: &SplashPlan) {
        self.events.push(Event::Splash(*plan));
    }

    fn step(&mut self, pointer: RingPointer) {
        self.events.push(Event::Step(pointer));
    }

    fn present(&mut self, pointer: RingPointer) {
        self.events.push(Event::Present(pointer));
    }
}

fn settings(random_splash_p: f32) -> WaveSettings {
    WaveSettings {
        random_splash_p,
        ..Default::default()
    }
}

fn session(random_splash_p: f32) -> Session<Recorder, StdRng> {
    let settings = settings(random_splash_p);
    let viewport = Viewport::from_surface(1024, 768, settings.resolution);
    Session::start(Recorder::default(), &settings, viewport, StdRng::seed_from_u64(7))
}

fn interval() -> Duration {
    settings(0.0).interval()
}

#[test]
fn start_seeds_slots_zero_and_one_silently() {
    let mut s = session(0.0);
    let events = s.passes_mut().drain();
    assert_eq!(events.len(), 1);
    let Event::Splash(plan) = &events[0] else {
        panic!("expected seed splash, got {events:?}");
    };
    assert!(!plan.use_base);
    assert_eq!(plan.center(), OFFSCREEN);
    assert_eq!(plan.writes[0].target, 0);
    assert_eq!(plan.writes[1].target, 1);
    assert_eq!(s.pointer(), RingPointer::new(0));
}

#[test]
fn pointer_advances_once_per_tick_without_splashes() {
    let mut s = session(0.0);
    for n in 1..=20u32 {
        assert_eq!(s.tick(interval()), 1);
        assert_eq!(s.pointer().index(), (n % 3) as usize);
    }
}

#[test]
fn tick_orders_step_then_present_on_same_pointer() {
    let mut s = session(0.0);
    s.passes_mut().drain();
    s.tick(interval());
    assert_eq!(
        s.passes_mut().drain(),
        vec![
            Event::Step(RingPointer::new(0)),
            Event::Present(RingPointer::new(0))
        ]
    );
}

#[test]
fn nothing_runs_before_an_interval_elapses() {
    let mut s = session(1.0);
    s.passes_mut().drain();
    assert_eq!(s.tick(interval() / 2), 0);
    assert!(s.passes().events.is_empty());
}

#[test]
fn user_splash_rotates_by_two_and_spares_one_slot() {
    for start in 0..3 {
        let mut s = session(0.0);
        for _ in 0..start {
            s.tick(interval());
        }
        s.passes_mut().drain();
        let before = s.pointer();
        assert_eq!(before.index(), start);

        s.request_splash(Vec2::new(0.25, 0.75));
        s.tick(interval());
        let events = s.passes_mut().drain();

        let splashed = before.after_splash();
        assert_eq!(splashed.index(), (start + 2) % 3);
        let Event::Splash(plan) = &events[0] else {
            panic!("expected splash first, got {events:?}");
        };
        assert!(plan.use_base);
        assert_eq!(plan.writes[0].target, splashed.slot(0));
        assert_eq!(plan.writes[0].base, splashed.slot(1));
        assert_eq!(plan.writes[1].target, splashed.slot(1));
        assert_eq!(plan.writes[1].base, splashed.slot(2));

        // the untouched slot is the one the step then writes
        let untouched = 3 - plan.writes[0].target - plan.writes[1].target;
        assert_eq!(events[1], Event::Step(splashed));
        assert_eq!(splashed.newest(), untouched);
        assert_eq!(events[2], Event::Present(splashed));
        assert_eq!(s.pointer(), splashed.after_step());
    }
}

#[test]
fn random_splash_from_pointer_zero_hits_slots_two_and_zero() {
    let mut s = session(1.0);
    s.passes_mut().drain();
    s.tick(interval());
    let events = s.passes_mut().drain();

    let Event::Splash(plan) = &events[0] else {
        panic!("expected random splash, got {events:?}");
    };
    assert_eq!(plan.writes[0].target, 2);
    assert_eq!(plan.writes[1].target, 0);
    assert_eq!(events[1], Event::Step(RingPointer::new(2)));
    assert_eq!(RingPointer::new(2).oldest(), 2);
    assert_eq!(RingPointer::new(2).previous(), 0);
    assert_eq!(RingPointer::new(2).newest(), 1);
}

#[test]
fn random_then_user_in_the_same_tick() {
    let mut s = session(1.0);
    s.passes_mut().drain();
    let user = Vec2::new(0.1, 0.9);
    s.request_splash(user);
    s.tick(interval());
    let events = s.passes_mut().drain();
    assert_eq!(events.len(), 4);

    let (Event::Splash(random), Event::Splash(requested)) = (&events[0], &events[1]) else {
        panic!("expected two splashes first, got {events:?}");
    };
    assert_ne!(random.center(), user);
    assert_eq!(requested.center(), user);

    // 0 -> 2 for the random splash, 2 -> 1 for the user splash
    assert_eq!(random.writes[0].target, 2);
    assert_eq!(requested.writes[0].target, 1);
    assert_eq!(events[2], Event::Step(RingPointer::new(1)));
    assert_eq!(s.pointer(), RingPointer::new(2));
    assert_eq!(s.stats().random_splashes, 1);
    assert_eq!(s.stats().user_splashes, 1);
    assert!(s.scheduler().pending().is_none());
}

#[test]
fn random_splashes_land_in_visible_band() {
    let mut s = session(1.0);
    let (lo, hi) = s.scheduler().viewport().visible_band();
    for _ in 0..200 {
        s.tick(interval());
    }
    for event in s.passes().events.iter() {
        if let Event::Splash(plan) = event {
            if plan.use_base {
                let c = plan.center();
                assert!((0.0..=1.0).contains(&c.x));
                assert!(c.y >= lo && c.y <= hi, "{c} outside [{lo}, {hi}]");
            }
        }
    }
}

#[test]
fn last_pointer_press_wins() {
    let mut s = session(0.0);
    s.passes_mut().drain();
    s.press(100.0, 100.0);
    s.press(512.0, 256.0);
    s.tick(interval());
    let events = s.passes_mut().drain();
    let splashes: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            Event::Splash(plan) => Some(plan.center()),
            _ => None,
        })
        .collect();
    assert_eq!(splashes, vec![Vec2::new(0.5, 0.75)]);
}

#[test]
fn accumulator_tracks_wall_clock() {
    let mut s = session(0.0);
    let mut rng = StdRng::seed_from_u64(42);
    let interval = interval();
    let mut elapsed = Duration::ZERO;
    let mut ticks = 0u64;
    for _ in 0..5_000 {
        let dt = Duration::from_micros(rng.gen_range(0..40_000));
        elapsed += dt;
        ticks += u64::from(s.tick(dt));
        let simulated = interval * ticks as u32;
        assert!(simulated <= elapsed);
        assert!(elapsed < simulated + interval);
    }
    assert_eq!(s.stats().dropped, 0);
    assert_eq!(s.stats().ticks, ticks);
}

#[test]
fn long_stall_is_capped_and_counted() {
    let mut s = session(0.0);
    let ran = s.tick(interval() * 100);
    assert_eq!(ran, 4);
    assert_eq!(s.stats().dropped, 96);
}
