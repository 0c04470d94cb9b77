use std::path::Path;

use image::imageops::{self, FilterType};
use image::RgbImage;
use ndarray::Array4;
use ort::session::Session;

use super::anchors::{self, Anchor, INPUT_SIZE, NUM_ANCHORS};
use super::{input_name, load_session, run_f32, sigmoid, ModelError};
use crate::constants::{MIN_DETECTION_SCORE, NMS_IOU_THRESHOLD};
use crate::vision::landmarks::LandmarkError;

/// Box center, size and six keypoints per anchor.
const REGRESSOR_WIDTH: usize = 16;

/// Axis-aligned box in normalized frame coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub x_min: f32,
    pub y_min: f32,
    pub x_max: f32,
    pub y_max: f32,
}

impl BoundingBox {
    pub fn from_center(cx: f32, cy: f32, w: f32, h: f32) -> Self {
        Self {
            x_min: cx - w / 2.0,
            y_min: cy - h / 2.0,
            x_max: cx + w / 2.0,
            y_max: cy + h / 2.0,
        }
    }

    pub fn width(&self) -> f32 {
        (self.x_max - self.x_min).max(0.0)
    }

    pub fn height(&self) -> f32 {
        (self.y_max - self.y_min).max(0.0)
    }

    pub fn area(&self) -> f32 {
        self.width() * self.height()
    }

    pub fn iou(&self, other: &BoundingBox) -> f32 {
        let ix = (self.x_max.min(other.x_max) - self.x_min.max(other.x_min)).max(0.0);
        let iy = (self.y_max.min(other.y_max) - self.y_min.max(other.y_min)).max(0.0);
        let inter = ix * iy;
        let union = self.area() + other.area() - inter;
        if union <= 0.0 {
            0.0
        } else {
            inter / union
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceDetection {
    pub bbox: BoundingBox,
    pub score: f32,
}

/// BlazeFace short-range detector.
///
/// Input: 1x128x128x3 RGB in [-1, 1]. Outputs: 896x16 regressors and 896
/// score logits, one row per anchor. Output names differ between exports,
/// so outputs are told apart by size.
pub struct FaceDetector {
    session: Session,
    input_name: String,
    anchors: Vec<Anchor>,
}

impl FaceDetector {
    pub fn load(path: &Path, threads: usize) -> Result<Self, ModelError> {
        let session = load_session(path, threads)?;
        let input_name = input_name(&session, path)?;
        Ok(Self {
            session,
            input_name,
            anchors: anchors::generate(),
        })
    }

    pub fn detect(&self, image: &RgbImage) -> Result<Vec<FaceDetection>, LandmarkError> {
        let resized = imageops::resize(image, INPUT_SIZE, INPUT_SIZE, FilterType::Triangle);
        let side = INPUT_SIZE as usize;
        let input = Array4::from_shape_fn((1, side, side, 3), |(_, y, x, c)| {
            f32::from(resized.get_pixel(x as u32, y as u32)[c]) / 127.5 - 1.0
        });

        let outputs = run_f32(&self.session, &self.input_name, input)?;
        let (regressors, logits) = split_outputs(outputs)?;
        let faces = decode_detections(&regressors, &logits, &self.anchors);
        tracing::trace!(faces = faces.len(), "Face detector finished");
        Ok(faces)
    }
}

fn split_outputs(outputs: Vec<Vec<f32>>) -> Result<(Vec<f32>, Vec<f32>), LandmarkError> {
    let mut regressors = None;
    let mut logits = None;
    for out in outputs {
        if out.len() == NUM_ANCHORS * REGRESSOR_WIDTH {
            regressors = Some(out);
        } else if out.len() == NUM_ANCHORS {
            logits = Some(out);
        }
    }

    match (regressors, logits) {
        (Some(r), Some(l)) => Ok((r, l)),
        _ => Err(LandmarkError::Output(format!(
            "face detector must produce {NUM_ANCHORS}x{REGRESSOR_WIDTH} regressors and {NUM_ANCHORS} scores"
        ))),
    }
}

/// Decodes raw detector rows into scored boxes, best first.
pub fn decode_detections(
    regressors: &[f32],
    logits: &[f32],
    anchors: &[Anchor],
) -> Vec<FaceDetection> {
    let scale = INPUT_SIZE as f32;
    let mut candidates = Vec::new();

    for (i, (anchor, &logit)) in anchors.iter().zip(logits).enumerate() {
        let score = sigmoid(logit);
        if score < MIN_DETECTION_SCORE {
            continue;
        }
        let Some(row) = regressors.get(i * REGRESSOR_WIDTH..(i + 1) * REGRESSOR_WIDTH) else {
            break;
        };
        let bbox = BoundingBox::from_center(
            row[0] / scale + anchor.x,
            row[1] / scale + anchor.y,
            row[2] / scale,
            row[3] / scale,
        );
        candidates.push(FaceDetection { bbox, score });
    }

    non_max_suppression(candidates, NMS_IOU_THRESHOLD)
}

pub fn non_max_suppression(mut candidates: Vec<FaceDetection>, iou_threshold: f32) -> Vec<FaceDetection> {
    candidates.sort_by(|a, b| b.score.total_cmp(&a.score));

    let mut kept: Vec<FaceDetection> = Vec::new();
    for candidate in candidates {
        if kept.iter().all(|k| k.bbox.iou(&candidate.bbox) <= iou_threshold) {
            kept.push(candidate);
        }
    }
    kept
}
