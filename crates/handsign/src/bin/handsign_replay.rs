//! # HANDSIGN Replay
//!
//! Drives a headless session through a scripted sequence of hand poses and
//! logs every technique transition.
//!
//! Usage: `handsign_replay [--config <path>] [--frames N]`
//!
//! Set `RUST_LOG=debug` to see effect activation and clears.

use std::process::ExitCode;

use handsign::{HandsignConfig, Session};
use handsign_core::{poses, LandmarkFrame};
use handsign_rendering::CommandRecorder;

const DT: f32 = 1.0 / 60.0;

/// One scripted segment: a pose held for some frames.
struct Segment {
    name: &'static str,
    frames: u64,
    pose: fn() -> LandmarkFrame,
}

fn script() -> [Segment; 7] {
    [
        Segment {
            name: "open palm",
            frames: 90,
            pose: || LandmarkFrame::single(poses::open_palm()),
        },
        Segment {
            name: "hands lost",
            frames: 30,
            pose: LandmarkFrame::empty,
        },
        Segment {
            name: "crossed fingers",
            frames: 90,
            pose: || LandmarkFrame::single(poses::crossed_fingers()),
        },
        Segment {
            name: "thumbs touching",
            frames: 90,
            pose: || {
                let (a, b) = poses::thumb_touch_pair();
                LandmarkFrame::pair(a, b)
            },
        },
        Segment {
            name: "both hands crossed",
            frames: 90,
            pose: || {
                let (a, b) = poses::crossed_pair();
                LandmarkFrame::pair(a, b)
            },
        },
        Segment {
            name: "fist",
            frames: 60,
            pose: || LandmarkFrame::single(poses::fist()),
        },
        Segment {
            name: "hands lost",
            frames: 60,
            pose: LandmarkFrame::empty,
        },
    ]
}

struct Args {
    config: Option<String>,
    frames: Option<u64>,
}

fn parse_args() -> Result<Args, String> {
    let mut args = Args {
        config: None,
        frames: None,
    };
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => args.config = Some(iter.next().ok_or("--config needs a path")?),
            "--frames" => {
                let n = iter.next().ok_or("--frames needs a number")?;
                args.frames = Some(n.parse().map_err(|_| format!("bad frame count: {n}"))?);
            }
            other => return Err(format!("unknown argument: {other}")),
        }
    }
    Ok(args)
}

fn main() -> ExitCode {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    let args = match parse_args() {
        Ok(a) => a,
        Err(e) => {
            eprintln!("{e}");
            eprintln!("usage: handsign_replay [--config <path>] [--frames N]");
            return ExitCode::FAILURE;
        }
    };

    let config = match args.config.as_deref().map(HandsignConfig::load).transpose() {
        Ok(c) => c.unwrap_or_default(),
        Err(e) => {
            eprintln!("FATAL: {e}");
            return ExitCode::FAILURE;
        }
    };

    let (mut session, mut target) = match Session::start(config, || Ok(CommandRecorder::new())) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("FATAL: {e}");
            return ExitCode::FAILURE;
        }
    };

    let segments = script();
    let script_len: u64 = segments.iter().map(|s| s.frames).sum();
    let total = args.frames.unwrap_or(script_len);
    let slot = session.slot();

    let mut frame = 0u64;
    'outer: loop {
        for segment in &segments {
            tracing::info!("Replaying '{}' for {} frames", segment.name, segment.frames);
            for _ in 0..segment.frames {
                if frame >= total {
                    break 'outer;
                }
                slot.publish((segment.pose)());
                let report = match session.tick(DT, &mut target) {
                    Ok(r) => r,
                    Err(e) => {
                        eprintln!("FATAL: {e}");
                        return ExitCode::FAILURE;
                    }
                };
                if report.changed {
                    println!(
                        "frame {:>5}  {:<32} power {:.2}  main {:>3} objects  {:>5} points",
                        report.frame,
                        report.technique.map_or("(idle)", |t| t.label()),
                        report.power,
                        report.stats.main_objects,
                        report.stats.points
                    );
                }
                frame += 1;
            }
        }
    }

    println!("{} frames, {} effect clears", session.frames(), session.clears());
    ExitCode::SUCCESS
}
