//! Face landmark source backed by the MediaPipe face detector and face mesh
//! models, run through ONNX Runtime.

pub mod anchors;
pub mod detector;
pub mod mesh;

use std::path::{Path, PathBuf};

use ndarray::Array4;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Tensor;
use thiserror::Error;

use crate::config::ModelConfig;
use crate::constants::{FACE_DETECTION_MODEL_FILE, FACE_LANDMARK_MODEL_FILE, MIN_PRESENCE_SCORE};
use crate::pool::LandmarkPool;
use crate::vision::frame::Frame;
use crate::vision::landmarks::{LandmarkError, LandmarkSet, LandmarkSource};
use detector::FaceDetector;
use mesh::{crop_to_input, project_landmarks, FaceMeshModel, Roi};

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("model file not found: {0:?}")]
    NotFound(PathBuf),
    #[error("failed to load model {path:?}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: ort::Error,
    },
    #[error("model {0:?} has no inputs")]
    NoInputs(PathBuf),
    #[error("failed to initialize onnx runtime: {0}")]
    Runtime(#[from] ort::Error),
}

pub(crate) fn load_session(path: &Path, threads: usize) -> Result<Session, ModelError> {
    if !path.is_file() {
        return Err(ModelError::NotFound(path.to_path_buf()));
    }

    let build = || -> ort::Result<Session> {
        Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .with_intra_threads(threads)?
            .commit_from_file(path)
    };

    build().map_err(|source| ModelError::Load {
        path: path.to_path_buf(),
        source,
    })
}

pub(crate) fn input_name(session: &Session, path: &Path) -> Result<String, ModelError> {
    session
        .inputs
        .first()
        .map(|input| input.name.clone())
        .ok_or_else(|| ModelError::NoInputs(path.to_path_buf()))
}

/// Runs a single-input model and copies every output out as a flat f32 buffer,
/// in the session's declared output order.
pub(crate) fn run_f32(
    session: &Session,
    input_name: &str,
    input: Array4<f32>,
) -> Result<Vec<Vec<f32>>, LandmarkError> {
    let tensor = Tensor::from_array(input)?;
    let outputs = session.run(ort::inputs![input_name => tensor]?)?;

    let mut flat = Vec::with_capacity(session.outputs.len());
    for output in &session.outputs {
        let view = outputs[output.name.as_str()].try_extract_tensor::<f32>()?;
        flat.push(view.iter().copied().collect());
    }
    Ok(flat)
}

pub(crate) fn sigmoid(x: f32) -> f32 {
    let x = x.clamp(-100.0, 100.0);
    1.0 / (1.0 + (-x).exp())
}

/// Two-stage landmark source: detect faces, then run the mesh model on a
/// square crop around each face.
pub struct FaceMesh {
    detector: FaceDetector,
    mesh: FaceMeshModel,
}

impl FaceMesh {
    pub fn load(config: &ModelConfig) -> Result<Self, ModelError> {
        let detector = FaceDetector::load(
            &config.model_dir.join(FACE_DETECTION_MODEL_FILE),
            config.threads,
        )?;
        let mesh = FaceMeshModel::load(
            &config.model_dir.join(FACE_LANDMARK_MODEL_FILE),
            config.threads,
        )?;
        Ok(Self { detector, mesh })
    }
}

impl LandmarkSource for FaceMesh {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<LandmarkSet>, LandmarkError> {
        let image = frame.image();
        let detections = self.detector.detect(image)?;

        let mut faces = Vec::with_capacity(detections.len());
        for detection in detections {
            let roi = Roi::from_detection(&detection.bbox, frame.width(), frame.height());
            if roi.size < 1.0 {
                continue;
            }

            let output = self.mesh.infer(crop_to_input(image, &roi))?;
            if output.presence < MIN_PRESENCE_SCORE {
                tracing::debug!(
                    detection_score = detection.score,
                    presence = output.presence,
                    "Dropping face below presence threshold"
                );
                continue;
            }

            faces.push(project_landmarks(
                &output.landmarks,
                &roi,
                frame.width(),
                frame.height(),
            )?);
        }

        Ok(faces)
    }
}

/// Initializes ONNX Runtime and loads `pool_size` independent model instances.
pub fn load_pool(config: &ModelConfig) -> Result<LandmarkPool, ModelError> {
    ort::init().with_name("drowsiness-api").commit()?;

    let mut sources: Vec<Box<dyn LandmarkSource>> = Vec::with_capacity(config.pool_size);
    for instance in 0..config.pool_size {
        tracing::debug!(instance, model_dir = %config.model_dir.display(), "Loading face mesh");
        sources.push(Box::new(FaceMesh::load(config)?));
    }

    Ok(LandmarkPool::new(sources))
}
