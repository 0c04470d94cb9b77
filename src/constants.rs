/// 平均 EAR 低于此值判定为疲劳（闭眼）
pub const DROWSY_THRESHOLD: f64 = 0.25;

/// confidence 字段保留的小数位数
pub const CONFIDENCE_DECIMALS: i32 = 3;

/// 首页返回的服务名称
pub const SERVICE_MESSAGE: &str = "Drowsiness Detection API";

/// 解码失败时返回给客户端的错误信息
pub const INVALID_IMAGE_MESSAGE: &str = "invalid image";

/// 未检测到人脸时返回的信息（200，属于正常结果）
pub const NO_FACE_MESSAGE: &str = "no face detected";

/// 人脸检测模型文件名
pub const FACE_DETECTION_MODEL_FILE: &str = "face_detection_short_range.onnx";

/// 人脸网格模型文件名。
///
/// 应放入 MediaPipe FaceLandmarker 的 `face_landmarks_detector` 导出（478 点，
/// 眼部轮廓经过 refine）。旧版 468 点 `face_landmark` 也能加载，但眼部点位
/// 精度较低，EAR 会偏大。
pub const FACE_LANDMARK_MODEL_FILE: &str = "face_landmarks_detector.onnx";

/// 人脸检测最低置信度
pub const MIN_DETECTION_SCORE: f32 = 0.5;

/// 人脸网格 face-presence 最低置信度
pub const MIN_PRESENCE_SCORE: f32 = 0.5;

/// 检测框 NMS 的 IoU 阈值
pub const NMS_IOU_THRESHOLD: f32 = 0.3;

/// 检测框扩展为网格模型输入区域时的放大倍数
pub const ROI_SCALE: f32 = 1.5;
