use std::io::Cursor;

use image::{DynamicImage, ImageDecoder, ImageError, ImageReader, RgbImage};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FrameError {
    #[error("image body is empty")]
    Empty,
    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
    #[error("decoded image has zero size ({width}x{height})")]
    ZeroSized { width: u32, height: u32 },
}

/// A decoded RGB pixel grid. Lives for a single request.
#[derive(Debug, Clone)]
pub struct Frame {
    image: RgbImage,
}

impl Frame {
    /// Decodes raw encoded bytes; the container format is sniffed from the content.
    /// An EXIF orientation tag is applied, so the grid is upright.
    pub fn decode(bytes: &[u8]) -> Result<Self, FrameError> {
        if bytes.is_empty() {
            return Err(FrameError::Empty);
        }
        let mut decoder = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(ImageError::IoError)?
            .into_decoder()?;
        let orientation = decoder.orientation()?;
        let mut decoded = DynamicImage::from_decoder(decoder)?;
        decoded.apply_orientation(orientation);
        Self::from_rgb(decoded.to_rgb8())
    }

    pub fn from_rgb(image: RgbImage) -> Result<Self, FrameError> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(FrameError::ZeroSized { width, height });
        }
        Ok(Self { image })
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }
}
