use thiserror::Error;

use super::frame::Frame;

#[derive(Debug, Error)]
pub enum LandmarkError {
    #[error("onnx runtime error: {0}")]
    Runtime(#[from] ort::Error),
    #[error("unexpected model output: {0}")]
    Output(String),
}

/// A landmark in normalized image coordinates: x and y in [0, 1] for points
/// inside the frame, z on the same scale as x.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NormalizedPoint {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl NormalizedPoint {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// Ordered landmarks of one face. Index meaning is fixed by the model topology.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LandmarkSet {
    points: Vec<NormalizedPoint>,
}

impl LandmarkSet {
    pub fn new(points: Vec<NormalizedPoint>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&NormalizedPoint> {
        self.points.get(index)
    }

    pub fn points(&self) -> &[NormalizedPoint] {
        &self.points
    }
}

/// Anything that can turn a frame into per-face landmark sets.
///
/// Implementations are not required to be reentrant: callers hold `&mut self`
/// for the duration of a call and the pool hands each instance to one request
/// at a time.
pub trait LandmarkSource: Send {
    /// Returns zero or more faces, most confident first.
    fn detect(&mut self, frame: &Frame) -> Result<Vec<LandmarkSet>, LandmarkError>;
}
