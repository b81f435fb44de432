use anyhow::{Result, bail};
use image::RgbImage;

/// One decoded picture: packed RGB24, rows top to bottom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl Frame {
    pub const CHANNELS: usize = 3;

    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let expected = Self::byte_len(width, height);
        if data.len() != expected {
            bail!(
                "frame buffer for {}x{} must hold {} bytes, got {}",
                width,
                height,
                expected,
                data.len()
            );
        }
        Ok(Self { width, height, data })
    }

    pub fn byte_len(width: u32, height: u32) -> usize {
        width as usize * height as usize * Self::CHANNELS
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Expands the pixels to RGBA (opaque) into `out`, reusing its allocation.
    pub fn write_rgba(&self, out: &mut Vec<u8>) {
        out.clear();
        out.reserve(self.width as usize * self.height as usize * 4);
        for px in self.data.chunks_exact(Self::CHANNELS) {
            out.extend_from_slice(px);
            out.push(u8::MAX);
        }
    }
}

impl From<RgbImage> for Frame {
    fn from(image: RgbImage) -> Self {
        let (width, height) = image.dimensions();
        Self { width, height, data: image.into_raw() }
    }
}
