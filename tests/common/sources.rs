use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use drowsiness_api::vision::frame::Frame;
use drowsiness_api::vision::landmarks::{LandmarkError, LandmarkSet, LandmarkSource};

/// Returns the same faces for every frame and records the frame size it saw.
pub struct FixedLandmarks {
    faces: Vec<LandmarkSet>,
    calls: Arc<AtomicUsize>,
}

impl FixedLandmarks {
    pub fn new(faces: Vec<LandmarkSet>) -> Self {
        Self {
            faces,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn none() -> Self {
        Self::new(Vec::new())
    }

    pub fn calls(&self) -> Arc<AtomicUsize> {
        self.calls.clone()
    }
}

impl LandmarkSource for FixedLandmarks {
    fn detect(&mut self, _frame: &Frame) -> Result<Vec<LandmarkSet>, LandmarkError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.faces.clone())
    }
}

pub struct FailingSource {
    pub message: String,
}

impl LandmarkSource for FailingSource {
    fn detect(&mut self, _frame: &Frame) -> Result<Vec<LandmarkSet>, LandmarkError> {
        Err(LandmarkError::Output(self.message.clone()))
    }
}

/// Panics on the first call, then behaves like `FixedLandmarks`.
pub struct PanicOnce {
    panicked: bool,
    faces: Vec<LandmarkSet>,
}

impl PanicOnce {
    pub fn new(faces: Vec<LandmarkSet>) -> Self {
        Self {
            panicked: false,
            faces,
        }
    }
}

impl LandmarkSource for PanicOnce {
    fn detect(&mut self, _frame: &Frame) -> Result<Vec<LandmarkSet>, LandmarkError> {
        if !self.panicked {
            self.panicked = true;
            panic!("face mesh segfaulted");
        }
        Ok(self.faces.clone())
    }
}
