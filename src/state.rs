use std::sync::Arc;

use crate::config::Config;
use crate::pool::LandmarkPool;
use crate::vision::ear::{EyeTopology, FACE_MESH_V1};

#[derive(Clone)]
pub struct AppState {
    landmarks: Arc<LandmarkPool>,
    topology: EyeTopology,
    config: Arc<Config>,
}

impl AppState {
    pub fn new(landmarks: LandmarkPool, config: &Config) -> Self {
        Self::with_topology(landmarks, FACE_MESH_V1, config)
    }

    /// The eye topology must match the index scheme of the pool's sources.
    pub fn with_topology(landmarks: LandmarkPool, topology: EyeTopology, config: &Config) -> Self {
        Self {
            landmarks: Arc::new(landmarks),
            topology,
            config: Arc::new(config.clone()),
        }
    }

    pub fn landmarks(&self) -> &LandmarkPool {
        &self.landmarks
    }

    pub fn topology(&self) -> &EyeTopology {
        &self.topology
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}
