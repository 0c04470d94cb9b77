//! Image-to-verdict pipeline: decode, landmarks, EAR, threshold.

pub mod ear;
pub mod frame;
pub mod landmarks;
pub mod policy;

use ear::{measure_eyes, EarError, EyeTopology};
use frame::Frame;
use landmarks::LandmarkSet;
use policy::{classify, Verdict};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DetectionResult {
    NoFace,
    Verdict(Verdict),
}

/// Turns detector output into a verdict. Only the first face is considered.
pub fn analyze(
    frame: &Frame,
    faces: &[LandmarkSet],
    topology: &EyeTopology,
) -> Result<DetectionResult, EarError> {
    let Some(face) = faces.first() else {
        return Ok(DetectionResult::NoFace);
    };

    let eyes = measure_eyes(face, topology, frame.width(), frame.height())?;
    let verdict = classify(eyes.average());
    tracing::debug!(
        left_ear = eyes.left,
        right_ear = eyes.right,
        faces = faces.len(),
        drowsy = verdict.drowsy,
        "Eye aspect ratio measured"
    );
    Ok(DetectionResult::Verdict(verdict))
}
