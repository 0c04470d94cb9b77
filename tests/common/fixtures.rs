use std::io::Cursor;

use image::{ImageFormat, Rgb, RgbImage};

use drowsiness_api::vision::ear::FACE_MESH_V1;
use drowsiness_api::vision::landmarks::{LandmarkSet, NormalizedPoint};

/// Frame side length. A power of two keeps normalized coordinates exact.
pub const FRAME_SIZE: u32 = 256;

/// Vertical distances 5 + 5, horizontal 40: EAR 0.125.
pub const NARROW_EYE: [(i32, i32); 6] = [(10, 50), (20, 45), (40, 45), (50, 50), (40, 50), (20, 50)];

/// Vertical distances 15 + 15, horizontal 20: EAR 0.75.
pub const WIDE_EYE: [(i32, i32); 6] = [
    (100, 100),
    (105, 85),
    (115, 85),
    (120, 100),
    (115, 100),
    (105, 100),
];

/// Vertical distances 5 + 5, horizontal 80: EAR 0.0625, an exact half at three decimals.
pub const HALF_TIE_EYE: [(i32, i32); 6] = [
    (10, 200),
    (30, 195),
    (60, 195),
    (90, 200),
    (60, 200),
    (30, 200),
];

/// Both eye corners on the same pixel.
pub const COLLAPSED_EYE: [(i32, i32); 6] = [(60, 60), (62, 58), (64, 58), (60, 60), (64, 62), (62, 62)];

pub fn encode(image: &RgbImage, format: ImageFormat) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    image.write_to(&mut buf, format).expect("encode image");
    buf.into_inner()
}

pub fn solid_png() -> Vec<u8> {
    encode(
        &RgbImage::from_pixel(FRAME_SIZE, FRAME_SIZE, Rgb([40, 90, 160])),
        ImageFormat::Png,
    )
}

pub fn solid_jpeg() -> Vec<u8> {
    encode(
        &RgbImage::from_pixel(FRAME_SIZE, FRAME_SIZE, Rgb([128, 128, 128])),
        ImageFormat::Jpeg,
    )
}

/// A 478-point face mesh with both eyes placed at the given pixel positions
/// inside a `FRAME_SIZE` square frame.
pub fn face(left: [(i32, i32); 6], right: [(i32, i32); 6]) -> LandmarkSet {
    let mut points = vec![NormalizedPoint::new(0.5, 0.5, 0.0); 478];
    let size = FRAME_SIZE as f32;
    for (indices, eye) in [(FACE_MESH_V1.left, left), (FACE_MESH_V1.right, right)] {
        for (&idx, (x, y)) in indices.iter().zip(eye) {
            points[idx] = NormalizedPoint::new(x as f32 / size, y as f32 / size, 0.0);
        }
    }
    LandmarkSet::new(points)
}
