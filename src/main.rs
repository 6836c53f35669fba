//! Chroma Cluster headless runner
//!
//! Runs one session at ~60 Hz with a scripted cursor sweeping the arena and
//! logs progress. Rendering lives outside this crate.
//!
//! Usage: `chroma-cluster [settings.json]` (log level via `RUST_LOG`)

use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use glam::Vec2;

use chroma_cluster::Settings;
use chroma_cluster::format_elapsed;
use chroma_cluster::sim::{Arena, FrameInput, Session, tick};

/// Target frame interval
const FRAME_TIME: Duration = Duration::from_millis(16);
/// Give up after this many frames (about a minute)
const MAX_FRAMES: u64 = 60 * 60;

/// Cursor position for a frame: a slow Lissajous curve over the arena
fn sweep_cursor(arena: &Arena, frame: u64) -> Vec2 {
    let t = frame as f32 * 0.02;
    let half = Vec2::new(arena.width, arena.height) / 2.0;
    half + Vec2::new((t * 1.3).sin(), (t * 0.7).cos()) * half * 0.9
}

fn main() {
    env_logger::init();
    log::info!("Chroma Cluster (headless) starting...");

    let settings = match std::env::args().nth(1) {
        Some(path) => Settings::load_or_default(path),
        None => Settings::default(),
    };

    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);
    let mut session = Session::with_config(seed, settings.arena, settings.tuning);

    if let Err(err) = session.start(settings.ball_count, settings.color_count) {
        log::error!("{}", err);
        std::process::exit(1);
    }

    let arena = settings.arena;
    for frame in 0..MAX_FRAMES {
        let input = FrameInput {
            cursor: Some(sweep_cursor(&arena, frame)),
        };
        tick(&mut session, &input, Instant::now());

        if session.is_won() {
            break;
        }
        if frame % 60 == 0 {
            let highlighted = session.highlights().iter().filter(|&&h| h).count();
            log::info!(
                "{} clusters={} highlighted={}/{}",
                format_elapsed(session.elapsed_ms()),
                session.cluster_count(),
                highlighted,
                session.balls().len()
            );
        }
        std::thread::sleep(FRAME_TIME);
    }

    if session.is_won() {
        println!("Solved in {}", format_elapsed(session.elapsed_ms()));
    } else {
        println!(
            "Not solved after {} ({} clusters left)",
            format_elapsed(session.elapsed_ms()),
            session.cluster_count()
        );
    }
}

