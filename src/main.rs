use clap::Parser;
use colored::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{error, info, warn};

mod args;

use args::Args;
use rusty_hands::camera::{self, CameraSource};
use rusty_hands::config::AppConfig;
use rusty_hands::handoff::FrameSlot;
use rusty_hands::hud::{self, Canvas, HudStyle};
use rusty_hands::inference::HandLandmarkPipeline;
use rusty_hands::output::WindowOutput;
use rusty_hands::pipeline::{Pipeline, SimulatedPipeline};
use rusty_hands::session::GestureSession;
use rusty_hands::types::LandmarkFrame;

/// One camera frame and what the landmark model saw in it.
struct CapturedFrame {
    image: image::RgbImage,
    landmarks: LandmarkFrame,
    captured_at: Instant,
}

fn create_pipeline(args: &Args, config: &AppConfig) -> Box<dyn Pipeline> {
    if args.simulate {
        return Box::new(SimulatedPipeline::new());
    }
    let model_path = args
        .model
        .clone()
        .unwrap_or_else(|| config.tracking.model_path.clone());
    match HandLandmarkPipeline::new(&model_path, config.tracking.min_presence) {
        Ok(pipeline) => Box::new(pipeline),
        Err(e) => {
            warn!("{e:#}. Falling back to simulated hand.");
            Box::new(SimulatedPipeline::new())
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rusty_hands=info".into()),
        )
        .init();

    info!("rusty_hands v{} starting", env!("CARGO_PKG_VERSION"));
    let args = Args::parse();

    if args.list {
        return camera::list_cameras();
    }

    // 0. Load Config
    let config = AppConfig::load_from(&args.config)?;
    let style = HudStyle::from(&config.ui);

    // 1. Setup Capture (camera + landmark model on their own thread)
    let slot: Arc<FrameSlot<CapturedFrame>> = Arc::new(FrameSlot::new());
    let stop = Arc::new(AtomicBool::new(false));
    let mirror = Arc::new(AtomicBool::new(args.mirror || config.defaults.mirror_mode));
    let (ready_tx, ready_rx) = mpsc::channel::<anyhow::Result<(u32, u32, String)>>();

    let capture = {
        let slot = Arc::clone(&slot);
        let stop = Arc::clone(&stop);
        let mirror = Arc::clone(&mirror);
        let cam_index = args.cam_index;
        let mut pipeline = create_pipeline(&args, &config);
        thread::spawn(move || {
            let mut camera = match CameraSource::new(cam_index) {
                Ok(c) => c,
                Err(e) => {
                    let _ = ready_tx.send(Err(e));
                    return;
                }
            };
            let _ = ready_tx.send(Ok((camera.width(), camera.height(), pipeline.name())));

            while !stop.load(Ordering::Relaxed) {
                let mut image = match camera.capture() {
                    Ok(frame) => frame,
                    Err(e) => {
                        warn!("Capture failed: {e:#}");
                        thread::sleep(Duration::from_millis(10));
                        continue;
                    }
                };
                let captured_at = Instant::now();
                if mirror.load(Ordering::Relaxed) {
                    image::imageops::flip_horizontal_in_place(&mut image);
                }
                let landmarks = match pipeline.process(&image) {
                    Ok(l) => l,
                    Err(e) => {
                        warn!("Landmark model failed: {e:#}");
                        LandmarkFrame::NoHand
                    }
                };
                let frame = CapturedFrame {
                    image,
                    landmarks,
                    captured_at,
                };
                if !slot.publish(frame) {
                    break;
                }
            }
            info!("Capture thread stopped");
        })
    };

    let (width, height, pipeline_name) = match ready_rx.recv() {
        Ok(Ok(ready)) => ready,
        Ok(Err(e)) => {
            let _ = capture.join();
            return Err(e);
        }
        Err(_) => {
            let _ = capture.join();
            anyhow::bail!("capture thread exited before opening the camera");
        }
    };
    info!("Active Pipeline: {}", pipeline_name);

    // 2. Setup Output
    let (width, height) = (width as usize, height as usize);
    let mut window = match WindowOutput::new("Rusty Hands", width, height) {
        Ok(w) => w,
        Err(e) => {
            stop.store(true, Ordering::Relaxed);
            slot.close();
            let _ = capture.join();
            return Err(e);
        }
    };
    info!("Window created successfully.");

    // 3. Session
    let mut session = GestureSession::new(config.session());
    session.start();

    println!("{}", "Gesture calculator running".green().bold());
    println!(
        "Gestures: fist 0 | 1-5 fingers | thumbs up + | thumbs down - | peace * | point up / | flat palm = | hold fist C"
    );
    println!("Controls: [1] Landmarks [2] Instructions [5] Mirror [Esc/Q] Quit");

    let mut show_landmarks = config.defaults.show_landmarks;
    let mut show_instructions = config.defaults.show_instructions;
    let mut display_buffer: Vec<u8> = Vec::new();

    // 4. Loop
    while window.is_open() && !window.quit_requested() {
        for key in window.keys_pressed() {
            match key {
                minifb::Key::Key1 => show_landmarks = !show_landmarks,
                minifb::Key::Key2 => show_instructions = !show_instructions,
                minifb::Key::Key5 => {
                    let now = !mirror.load(Ordering::Relaxed);
                    mirror.store(now, Ordering::Relaxed);
                }
                _ => {}
            }
        }

        let Some(frame) = slot.take_timeout(Duration::from_millis(100)) else {
            window.pump();
            continue;
        };

        session.step(&frame.landmarks, frame.captured_at);
        let snapshot = session.snapshot();

        // --- DRAWING ---
        display_buffer.clear();
        display_buffer.extend_from_slice(frame.image.as_raw());
        display_buffer.resize(width * height * 3, 0);
        {
            let mut canvas = Canvas::new(&mut display_buffer, width, height);
            if show_landmarks {
                if let Some(hand) = frame.landmarks.hand() {
                    hud::draw_landmarks(&mut canvas, hand, &style);
                }
            }
            hud::draw_snapshot(&mut canvas, &snapshot, &style);
            if show_instructions {
                let toggles = [
                    ("1", "Landmarks", show_landmarks),
                    ("2", "Instructions", show_instructions),
                    ("5", "Mirror", mirror.load(Ordering::Relaxed)),
                ];
                hud::draw_instructions(&mut canvas, &toggles, &style);
            }
        }

        // --- WINDOW UPDATE ---
        if let Err(e) = window.update(&display_buffer) {
            error!("Window update failed: {e:#}");
            break;
        }
    }

    // 5. Orderly shutdown between frames.
    session.stop();
    stop.store(true, Ordering::Relaxed);
    slot.close();
    if capture.join().is_err() {
        error!("Capture thread panicked");
    }
    info!(
        "Final display {:?}, {} stale frames dropped",
        session.snapshot().display_text,
        slot.dropped()
    );

    Ok(())
}
