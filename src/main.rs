//! Headless demo: generates a world, walks the player around, mines and
//! places a few blocks, then prints frame statistics.
//!
//! Usage: `tessera [config.ron] [snapshot.ron]`

use tessera::prelude::*;

/// Scripted input: walk right, jump, dig below, then place a block.
/// Button timestamps follow the engine clock, one step per frame.
fn script(clock_step_ms: u64) -> ScriptedEvents {
    let mut frames: Vec<Vec<InputEvent>> = Vec::new();
    let mut time_ms = 0;
    let mut frame = |events: Vec<InputEvent>, frames: &mut Vec<Vec<InputEvent>>| {
        time_ms += clock_step_ms;
        frames.push(events);
        time_ms
    };

    frame(vec![InputEvent::KeyDown(Scancode::D)], &mut frames);
    for _ in 0..30 {
        frame(Vec::new(), &mut frames);
    }
    frame(vec![InputEvent::KeyUp(Scancode::D), InputEvent::KeyDown(Scancode::SPACE)], &mut frames);
    frame(vec![InputEvent::KeyUp(Scancode::SPACE)], &mut frames);
    for _ in 0..60 {
        frame(Vec::new(), &mut frames);
    }

    // Aim at the block under the player's feet and hold the left button
    let below = Vec2::new(400.0, 300.0 + 20.0);
    let pressed = frame(vec![InputEvent::MouseMotion(below)], &mut frames);
    frame(
        vec![InputEvent::MouseDown {
            button: MouseButton::Left,
            time_ms: pressed,
        }],
        &mut frames,
    );
    for _ in 0..120 {
        frame(Vec::new(), &mut frames);
    }
    let released = frame(Vec::new(), &mut frames);
    frame(
        vec![InputEvent::MouseUp {
            button: MouseButton::Left,
            time_ms: released,
        }],
        &mut frames,
    );

    // Put something back one block to the right
    let right = Vec2::new(400.0 + 32.0, 300.0 - 8.0);
    let clicked = frame(vec![InputEvent::MouseMotion(right)], &mut frames);
    frame(
        vec![InputEvent::MouseDown {
            button: MouseButton::Right,
            time_ms: clicked,
        }],
        &mut frames,
    );
    for _ in 0..30 {
        frame(Vec::new(), &mut frames);
    }

    ScriptedEvents::new(frames)
}

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => match EngineConfig::load_ron(&path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("{e}");
                std::process::exit(1);
            }
        },
        None => EngineConfig::default().with_title("Tessera Demo").with_seed(2024),
    };
    let snapshot_path = args.next();

    let mut engine = match Engine::new(config, HeadlessLoader::default()) {
        Ok(engine) => engine,
        Err(e) => {
            log::error!("Engine error: {e}");
            std::process::exit(1);
        }
    };

    let step = engine.config().max_delta;
    let mut source = script((step * 1000.0) as u64);
    let mut renderer = RecordingRenderer::new();

    if let Err(e) = engine.run_fixed(&mut source, &mut renderer, step) {
        log::error!("Engine error: {e}");
        std::process::exit(1);
    }

    let stats = engine.stats();
    println!("{}", stats.format_stats());
    println!("Last frame: {:?}", stats.last());

    if let Some(path) = snapshot_path {
        let saved = engine.snapshot().and_then(|snapshot| snapshot.save_ron(&path));
        match saved {
            Ok(()) => println!("Saved snapshot to {path}"),
            Err(e) => log::error!("Could not save snapshot: {e}"),
        }
    }
}
