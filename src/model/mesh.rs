use std::path::Path;

use image::RgbImage;
use ndarray::Array4;
use ort::session::Session;

use super::detector::BoundingBox;
use super::{input_name, load_session, run_f32, sigmoid, ModelError};
use crate::constants::ROI_SCALE;
use crate::vision::landmarks::{LandmarkError, LandmarkSet, NormalizedPoint};

pub const INPUT_SIZE: u32 = 192;
pub const NUM_LANDMARKS: usize = 468;

/// Square crop fed to the mesh model, in frame pixels. May extend past the frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Roi {
    pub left: f32,
    pub top: f32,
    pub size: f32,
}

impl Roi {
    pub fn from_detection(bbox: &BoundingBox, width: u32, height: u32) -> Self {
        let (w, h) = (width as f32, height as f32);
        let cx = (bbox.x_min + bbox.x_max) / 2.0 * w;
        let cy = (bbox.y_min + bbox.y_max) / 2.0 * h;
        let size = (bbox.width() * w).max(bbox.height() * h) * ROI_SCALE;
        Self {
            left: cx - size / 2.0,
            top: cy - size / 2.0,
            size,
        }
    }
}

/// Samples the ROI into a 1x192x192x3 tensor in [0, 1]. Pixels outside the
/// frame are black.
pub fn crop_to_input(image: &RgbImage, roi: &Roi) -> Array4<f32> {
    let side = INPUT_SIZE as usize;
    let step = roi.size / INPUT_SIZE as f32;
    let (w, h) = (image.width() as f32, image.height() as f32);

    Array4::from_shape_fn((1, side, side, 3), |(_, v, u, c)| {
        let sx = (roi.left + (u as f32 + 0.5) * step).floor();
        let sy = (roi.top + (v as f32 + 0.5) * step).floor();
        if sx < 0.0 || sy < 0.0 || sx >= w || sy >= h {
            0.0
        } else {
            f32::from(image.get_pixel(sx as u32, sy as u32)[c]) / 255.0
        }
    })
}

/// Maps mesh output (crop pixel space) back to normalized frame coordinates.
pub fn project_landmarks(
    raw: &[f32],
    roi: &Roi,
    width: u32,
    height: u32,
) -> Result<LandmarkSet, LandmarkError> {
    if raw.len() < NUM_LANDMARKS * 3 {
        return Err(LandmarkError::Output(format!(
            "face mesh produced {} values, expected at least {}",
            raw.len(),
            NUM_LANDMARKS * 3
        )));
    }

    let scale = roi.size / INPUT_SIZE as f32;
    let (w, h) = (width as f32, height as f32);
    let points = raw
        .chunks_exact(3)
        .take(NUM_LANDMARKS)
        .map(|p| {
            NormalizedPoint::new(
                (roi.left + p[0] * scale) / w,
                (roi.top + p[1] * scale) / h,
                p[2] * scale / w,
            )
        })
        .collect();

    Ok(LandmarkSet::new(points))
}

/// Raw mesh inference result for one crop.
#[derive(Debug, Clone)]
pub struct MeshOutput {
    pub landmarks: Vec<f32>,
    pub presence: f32,
}

/// MediaPipe face landmark model. Refined (478 point) exports are cut to the
/// 468-point base topology; the eye contour indices keep their refined positions.
pub struct FaceMeshModel {
    session: Session,
    input_name: String,
}

impl FaceMeshModel {
    pub fn load(path: &Path, threads: usize) -> Result<Self, ModelError> {
        let session = load_session(path, threads)?;
        let input_name = input_name(&session, path)?;
        Ok(Self {
            session,
            input_name,
        })
    }

    pub fn infer(&self, input: Array4<f32>) -> Result<MeshOutput, LandmarkError> {
        let outputs = run_f32(&self.session, &self.input_name, input)?;
        split_outputs(outputs)
    }
}

fn split_outputs(outputs: Vec<Vec<f32>>) -> Result<MeshOutput, LandmarkError> {
    let mut landmarks = None;
    // 部分导出模型没有 face-presence 输出，视为存在
    let mut presence = 1.0;
    for out in outputs {
        if out.len() >= NUM_LANDMARKS * 3 && out.len() % 3 == 0 {
            landmarks = Some(out);
        } else if out.len() == 1 {
            presence = sigmoid(out[0]);
        }
    }

    landmarks
        .map(|landmarks| MeshOutput {
            landmarks,
            presence,
        })
        .ok_or_else(|| LandmarkError::Output("face mesh produced no landmark tensor".to_string()))
}
