use rand::rngs::StdRng;
use rand::SeedableRng;
use ripple_core::glam::Vec2;
use ripple_core::reference::ReferencePasses;
use ripple_core::{MaskImage, Session, Viewport, WaveSettings};

const RES: u32 = 64;

fn settings(random_splash_p: f32) -> WaveSettings {
    WaveSettings {
        resolution: RES,
        random_splash_p,
        ..Default::default()
    }
}

fn session(mask: &MaskImage, random_splash_p: f32) -> Session<ReferencePasses, StdRng> {
    let settings = settings(random_splash_p);
    let viewport = Viewport::from_surface(640, 640, RES);
    let passes = ReferencePasses::new(&settings, &viewport, mask);
    Session::start(passes, &settings, viewport, StdRng::seed_from_u64(3))
}

/// Solid block in the right third of the grid.
fn block_mask() -> MaskImage {
    MaskImage::from_fn(RES, |col, row| col >= 44 && (20..44).contains(&row))
}

#[test]
fn walls_never_gain_amplitude() {
    let mask = block_mask();
    let mut s = session(&mask, 0.2);
    let interval = settings(0.2).interval();
    for tick in 0..600 {
        if tick % 50 == 0 {
            s.request_splash(Vec2::new(0.25, 0.5));
        }
        s.tick(interval);
        for slot in 0..3 {
            assert_eq!(s.passes().wall_amplitude(slot), 0.0, "tick {tick}, slot {slot}");
        }
    }
    assert!(s.stats().user_splashes >= 12);
}

#[test]
fn splash_leaves_third_slot_untouched() {
    let mask = MaskImage::open(RES);
    let mut s = session(&mask, 0.0);
    let interval = settings(0.0).interval();
    for _ in 0..5 {
        s.tick(interval);
    }

    // capture the slot the splash must not touch
    let spared = s.pointer().after_splash().newest();
    let before = s.passes().slot(spared).to_vec();
    let counts = s.passes().write_counts();

    // drive the splash directly so the step does not overwrite the spared slot
    let plan = ripple_core::SplashPlan::new(
        s.pointer().after_splash(),
        true,
        Vec2::new(0.5, 0.5),
        s.scheduler().shape(),
    );
    ripple_core::WavePasses::add_splash(s.passes_mut(), &plan);

    assert_eq!(s.passes().slot(spared), before.as_slice());
    let after = s.passes().write_counts();
    let written: Vec<usize> = (0..3).filter(|&i| after[i] != counts[i]).collect();
    assert_eq!(written.len(), 2);
    assert!(!written.contains(&spared));
}

#[test]
fn present_twice_shows_the_same_frame() {
    let mask = block_mask();
    let mut s = session(&mask, 0.0);
    let interval = settings(0.0).interval();
    s.request_splash(Vec2::new(0.3, 0.6));
    for _ in 0..30 {
        s.tick(interval);
    }
    let shown = s.passes().frame().to_vec();
    let presents = s.passes().presents();

    s.redraw();
    s.redraw();
    assert_eq!(s.passes().presents(), presents + 2);
    assert_eq!(s.passes().frame(), shown.as_slice());
}

#[test]
fn splash_spreads_outwards() {
    let mask = MaskImage::open(RES);
    let mut s = session(&mask, 0.0);
    let interval = settings(0.0).interval();

    // height 24 texels right of the grid center in the newest slot
    let probe = |s: &Session<ReferencePasses, StdRng>| {
        let newest = s.pointer().after_splash().newest();
        s.passes().height(newest, 32 + 24, 32).abs()
    };

    s.request_splash(Vec2::new(0.5, 0.5));
    s.tick(interval);
    assert_eq!(probe(&s), 0.0);

    for _ in 0..30 {
        s.tick(interval);
    }
    assert!(probe(&s) > 1e-4);
}
