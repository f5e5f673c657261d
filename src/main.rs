//! Headless driver: runs a scripted session and logs the field as it evolves.
//!
//! ```text
//! driftfield [mode] [frames] [preset.json]
//! ```
//!
//! Set `RUST_LOG=debug` to see per-second frame statistics.

use driftfield::prelude::*;
use std::env;
use std::process::ExitCode;

const FRAME_DELTA: f32 = 1.0 / 60.0;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().skip(1).collect();
    let mode = Mode::from_name(args.first().map(String::as_str).unwrap_or("zen"));
    let frames = match args.get(1).map(|s| s.parse::<u32>()) {
        None => 600,
        Some(Ok(n)) => n,
        Some(Err(e)) => {
            log::error!("frame count: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut sim = Simulation::new().with_mode(mode);
    if let Some(path) = args.get(2) {
        match sim.load_preset(path) {
            Ok(loaded) if loaded != mode => sim.switch_mode(loaded),
            Ok(_) => {}
            Err(e) => {
                log::error!("{path}: {e}");
                return ExitCode::FAILURE;
            }
        }
    }

    for (name, value) in [("count", ParamValue::Number(5000.0)), ("opacity", 0.9f32.into())] {
        if let Err(e) = sim.set_parameter(name, value) {
            log::warn!("{e}");
        }
    }

    log::info!(
        "running {} frames in {} mode ({} blending)",
        frames,
        sim.mode(),
        sim.blend_mode()
    );

    for frame in 0..frames {
        script(&mut sim, frame);
        sim.step(FRAME_DELTA);
    }

    let stats = sim.stats();
    log::info!(
        "done: {} live particles, {:.0} fps simulated",
        sim.system().len(),
        stats.fps
    );
    ExitCode::SUCCESS
}

/// Taps, a drag across the field and a gentle clear near the end.
fn script(sim: &mut Simulation, frame: u32) {
    let t = frame as f32 * FRAME_DELTA;

    if frame % 120 == 0 {
        let at = Vec3::new((frame / 120) as f32 - 2.0, 0.0, 0.0);
        let screen = Vec2::new(400.0, 300.0);
        sim.handle_pointer(&PointerEvent::press(PointerKind::Touch, screen, at, t));
        sim.handle_pointer(&PointerEvent::release(PointerKind::Touch, screen, at, t + 0.1));
    }

    if (200..260).contains(&frame) {
        let x = (frame - 200) as f32 * 0.1 - 3.0;
        let screen = Vec2::new(100.0 + x * 50.0, 300.0);
        let world = Vec3::new(x, (t * 2.0).sin(), 0.0);
        let event = if frame == 200 {
            PointerEvent::press(PointerKind::Touch, screen, world, t)
        } else {
            PointerEvent::moved(PointerKind::Touch, screen, world, t)
        };
        if let Some(Request::Emit(burst)) = sim.handle_pointer(&event) {
            log::trace!("trail of {} at {:?}", burst.count, burst.origin);
        }
    }
    if frame == 260 {
        let event = PointerEvent::release(PointerKind::Touch, Vec2::ZERO, Vec3::ZERO, t);
        sim.handle_pointer(&event);
    }

    if frame == 480 {
        sim.begin_gentle_clear();
    }
}
