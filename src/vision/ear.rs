//! EAR (Eye Aspect Ratio) 计算模块
//!
//! 从人脸关键点中按固定索引取出每只眼睛的 6 个点，换算到像素坐标后计算
//! EAR = (|P1-P5| + |P2-P4|) / (2 * |P0-P3|)。
//! - P0, P3: 眼角点（水平方向）
//! - P1, P2: 上眼睑点
//! - P5, P4: 与之配对的下眼睑点

use std::fmt;

use thiserror::Error;

use super::landmarks::LandmarkSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eye {
    Left,
    Right,
}

impl fmt::Display for Eye {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Eye::Left => f.write_str("left"),
            Eye::Right => f.write_str("right"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EarError {
    #[error("landmark {index} missing for {eye} eye (face has {available} landmarks)")]
    MissingLandmark {
        eye: Eye,
        index: usize,
        available: usize,
    },
    #[error("degenerate {eye} eye contour: eye corners coincide, aspect ratio is undefined")]
    DegenerateEye { eye: Eye },
}

/// 眼部关键点索引表，与具体的关键点模型拓扑绑定。
///
/// 更换关键点模型时必须同时提供新的索引表，不能假设编号不变。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EyeTopology {
    pub name: &'static str,
    pub left: [usize; 6],
    pub right: [usize; 6],
}

impl EyeTopology {
    pub fn indices(&self, eye: Eye) -> &[usize; 6] {
        match eye {
            Eye::Left => &self.left,
            Eye::Right => &self.right,
        }
    }
}

/// MediaPipe face mesh（468 点，iris 细化后 478 点）的眼部索引
pub const FACE_MESH_V1: EyeTopology = EyeTopology {
    name: "mediapipe-face-mesh-v1",
    left: [33, 160, 158, 133, 153, 144],
    right: [362, 385, 387, 263, 373, 380],
};

/// 像素坐标点（已截断为整数）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelPoint {
    pub x: i32,
    pub y: i32,
}

impl PixelPoint {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &PixelPoint) -> f64 {
        let dx = f64::from(self.x) - f64::from(other.x);
        let dy = f64::from(self.y) - f64::from(other.y);
        (dx * dx + dy * dy).sqrt()
    }
}

/// 单只眼睛的 6 个有序像素点，顺序即公式中的 P0..P5
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EyePoints {
    eye: Eye,
    points: [PixelPoint; 6],
}

impl EyePoints {
    pub fn new(eye: Eye, points: [PixelPoint; 6]) -> Self {
        Self { eye, points }
    }

    /// 从归一化关键点中取点并换算为像素坐标。
    ///
    /// 坐标乘以宽高后向零截断，与整数像素网格对齐。
    pub fn from_landmarks(
        landmarks: &LandmarkSet,
        topology: &EyeTopology,
        eye: Eye,
        width: u32,
        height: u32,
    ) -> Result<Self, EarError> {
        let mut points = [PixelPoint::new(0, 0); 6];
        for (slot, &index) in points.iter_mut().zip(topology.indices(eye)) {
            let lm = landmarks.get(index).ok_or(EarError::MissingLandmark {
                eye,
                index,
                available: landmarks.len(),
            })?;
            *slot = PixelPoint::new(
                (f64::from(lm.x) * f64::from(width)).trunc() as i32,
                (f64::from(lm.y) * f64::from(height)).trunc() as i32,
            );
        }
        Ok(Self { eye, points })
    }

    pub fn points(&self) -> &[PixelPoint; 6] {
        &self.points
    }

    /// 标准 6 点 EAR
    pub fn aspect_ratio(&self) -> Result<f64, EarError> {
        let [p0, p1, p2, p3, p4, p5] = self.points;

        let horizontal = p0.distance(&p3);
        if horizontal == 0.0 {
            return Err(EarError::DegenerateEye { eye: self.eye });
        }

        let ear = (p1.distance(&p5) + p2.distance(&p4)) / (2.0 * horizontal);
        if !ear.is_finite() {
            return Err(EarError::DegenerateEye { eye: self.eye });
        }
        Ok(ear)
    }
}

/// 双眼 EAR
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EyeMeasurement {
    pub left: f64,
    pub right: f64,
}

impl EyeMeasurement {
    pub fn average(&self) -> f64 {
        (self.left + self.right) / 2.0
    }
}

pub fn measure_eyes(
    landmarks: &LandmarkSet,
    topology: &EyeTopology,
    width: u32,
    height: u32,
) -> Result<EyeMeasurement, EarError> {
    let left = EyePoints::from_landmarks(landmarks, topology, Eye::Left, width, height)?;
    let right = EyePoints::from_landmarks(landmarks, topology, Eye::Right, width, height)?;
    Ok(EyeMeasurement {
        left: left.aspect_ratio()?,
        right: right.aspect_ratio()?,
    })
}
