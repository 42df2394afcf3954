use image::{DynamicImage, GrayImage, RgbImage};

use crate::error::{ScanError, ScanResult};

// Frame image
//------------------------------------------------------------------------------

/// A caller-supplied raster frame.
///
/// The buffer holds exactly `width * height * channels` bytes, row-major, with
/// 1 (grayscale) or 3 (RGB) channels. The scanner only ever reads from it;
/// preprocessing works on internal copies.
#[derive(Debug, Clone)]
pub struct FrameImage {
    width: u32,
    height: u32,
    channels: u32,
    data: Vec<u8>,
}

impl FrameImage {
    pub fn new(width: u32, height: u32, channels: u32, data: Vec<u8>) -> ScanResult<Self> {
        if !matches!(channels, 1 | 3) {
            return Err(ScanError::InvalidChannelCount(channels));
        }
        let expected = width as usize * height as usize * channels as usize;
        if data.len() != expected {
            return Err(ScanError::BufferSizeMismatch);
        }
        Ok(Self { width, height, channels, data })
    }

    /// Converts a decoded image file into a frame at the codec boundary.
    pub fn from_dynamic(img: &DynamicImage) -> Self {
        let rgb = img.to_rgb8();
        let (width, height) = rgb.dimensions();
        Self { width, height, channels: 3, data: rgb.into_raw() }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn channels(&self) -> u32 {
        self.channels
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Grayscale working copy of the frame.
    pub fn to_gray(&self) -> GrayImage {
        match self.channels {
            1 => GrayImage::from_raw(self.width, self.height, self.data.clone())
                .expect("buffer length verified at construction"),
            _ => {
                let rgb = RgbImage::from_raw(self.width, self.height, self.data.clone())
                    .expect("buffer length verified at construction");
                DynamicImage::ImageRgb8(rgb).to_luma8()
            }
        }
    }

    /// RGB copy of the frame, used as the overlay canvas.
    pub fn to_rgb(&self) -> RgbImage {
        match self.channels {
            1 => {
                let gray = GrayImage::from_raw(self.width, self.height, self.data.clone())
                    .expect("buffer length verified at construction");
                DynamicImage::ImageLuma8(gray).to_rgb8()
            }
            _ => RgbImage::from_raw(self.width, self.height, self.data.clone())
                .expect("buffer length verified at construction"),
        }
    }
}
