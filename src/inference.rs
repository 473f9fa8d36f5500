use anyhow::{bail, Context, Result};
use image::{imageops::FilterType, RgbImage};
use ort::session::{builder::GraphOptimizationLevel, Session};
use std::path::Path;
use tracing::{debug, info};

use crate::pipeline::Pipeline;
use crate::types::{LandmarkFrame, Point3D, Rect, LANDMARK_COUNT};

/// Side of the square model input, in pixels.
const INPUT_SIZE: u32 = 224;
/// Tracked box growth when reusing the previous hand as the next crop.
const ROI_SCALE: f32 = 2.0;

/// MediaPipe-style hand landmark model.
///
/// Runs on the full frame until a hand is found, then on a square crop around
/// the last hand so the hand stays large in the model input.
pub struct HandLandmarkPipeline {
    session: Session,
    min_presence: f32,
    roi: Option<Rect>,
}

impl HandLandmarkPipeline {
    pub fn new(model_path: &Path, min_presence: f32) -> Result<Self> {
        if !model_path.exists() {
            bail!("hand landmark model not found at {}", model_path.display());
        }
        info!("Loading hand landmark model from {}...", model_path.display());
        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .with_intra_threads(4)?
            .with_execution_providers([
                ort::execution_providers::CoreMLExecutionProvider::default().build(),
                ort::execution_providers::CPUExecutionProvider::default().build(),
            ])?
            .commit_from_file(model_path)
            .with_context(|| format!("failed to load {}", model_path.display()))?;

        Ok(Self {
            session,
            min_presence,
            roi: None,
        })
    }
}

impl Pipeline for HandLandmarkPipeline {
    fn name(&self) -> String {
        "Hand Landmarks (21 pts)".to_string()
    }

    fn process(&mut self, frame: &RgbImage) -> Result<LandmarkFrame> {
        let frame_w = frame.width() as f32;
        let frame_h = frame.height() as f32;
        let region = self
            .roi
            .filter(|r| r.width >= 1.0 && r.height >= 1.0)
            .unwrap_or_else(|| Rect::new(0.0, 0.0, frame_w, frame_h));

        let crop = image::imageops::crop_imm(
            frame,
            region.x as u32,
            region.y as u32,
            region.width as u32,
            region.height as u32,
        )
        .to_image();
        let resized = image::imageops::resize(&crop, INPUT_SIZE, INPUT_SIZE, FilterType::Triangle);

        let side = INPUT_SIZE as usize;
        let mut input_data = Vec::with_capacity(side * side * 3);
        for pixel in resized.pixels() {
            input_data.push(pixel[0] as f32 / 255.0);
            input_data.push(pixel[1] as f32 / 255.0);
            input_data.push(pixel[2] as f32 / 255.0);
        }

        let shape = vec![1, side, side, 3];
        let input = ort::value::Tensor::from_array((shape, input_data))?;
        let outputs = self.session.run(ort::inputs![input])?;

        let (_shape, coords) = outputs[0].try_extract_tensor::<f32>()?;
        let (_shape, score) = outputs[1].try_extract_tensor::<f32>()?;
        let presence = score.first().copied().map(presence_probability).unwrap_or(0.0);

        if presence < self.min_presence {
            debug!("Hand presence {:.2} below {:.2}", presence, self.min_presence);
            self.roi = None;
            return Ok(LandmarkFrame::NoHand);
        }

        // Model space (0..224) -> crop -> normalized frame.
        let scale_x = region.width / INPUT_SIZE as f32;
        let scale_y = region.height / INPUT_SIZE as f32;
        let points: Vec<Point3D> = coords
            .chunks_exact(3)
            .take(LANDMARK_COUNT)
            .map(|c| Point3D {
                x: (region.x + c[0] * scale_x) / frame_w,
                y: (region.y + c[1] * scale_y) / frame_h,
                z: c[2] * scale_x / frame_w,
            })
            .collect();

        let landmarks = LandmarkFrame::from_points(&points);
        self.roi = match &landmarks {
            LandmarkFrame::Hand(hand) => {
                let bbox = bounding_box(&hand.points, frame_w, frame_h);
                Some(bbox.expand_square(ROI_SCALE, frame_w, frame_h))
            }
            LandmarkFrame::NoHand => None,
        };
        Ok(match landmarks {
            LandmarkFrame::Hand(hand) => LandmarkFrame::Hand(hand.with_confidence(presence)),
            other => other,
        })
    }
}

/// Some exports emit the presence logit, others the probability.
fn presence_probability(raw: f32) -> f32 {
    if (0.0..=1.0).contains(&raw) {
        raw
    } else {
        1.0 / (1.0 + (-raw).exp())
    }
}

/// Pixel-space box around normalized points.
fn bounding_box(points: &[Point3D], frame_w: f32, frame_h: f32) -> Rect {
    let (mut min_x, mut min_y) = (f32::MAX, f32::MAX);
    let (mut max_x, mut max_y) = (f32::MIN, f32::MIN);
    for p in points {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }
    Rect::new(
        min_x * frame_w,
        min_y * frame_h,
        (max_x - min_x) * frame_w,
        (max_y - min_y) * frame_h,
    )
}
