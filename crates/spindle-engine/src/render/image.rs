use anyhow::Result;

/// CPU-side bitmap that can be uploaded as a texture.
///
/// Pixels are tightly packed premultiplied RGBA8, row-major, top row first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl TextureImage {
    /// Wraps premultiplied RGBA8 pixels.
    ///
    /// Fails if the image is zero-area or `pixels` does not hold exactly
    /// `width * height * 4` bytes.
    pub fn from_premul_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self> {
        anyhow::ensure!(width > 0 && height > 0, "texture image has zero size");
        let expected = width as usize * height as usize * 4;
        anyhow::ensure!(
            pixels.len() == expected,
            "texture image {width}x{height} needs {expected} bytes, got {}",
            pixels.len()
        );
        Ok(Self { width, height, pixels })
    }

    /// A single opaque white pixel; sampled by untextured draws.
    pub fn white() -> Self {
        Self {
            width: 1,
            height: 1,
            pixels: vec![255; 4],
        }
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
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// RGBA of the pixel at `(x, y)`, or `None` outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        Some([self.pixels[i], self.pixels[i + 1], self.pixels[i + 2], self.pixels[i + 3]])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_wrong_byte_count() {
        assert!(TextureImage::from_premul_rgba(2, 2, vec![0; 15]).is_err());
        assert!(TextureImage::from_premul_rgba(0, 2, vec![]).is_err());
    }

    #[test]
    fn pixel_lookup_is_row_major() {
        let mut px = vec![0; 2 * 2 * 4];
        px[(1 * 2 + 0) * 4] = 200; // (0, 1) red
        let img = TextureImage::from_premul_rgba(2, 2, px).unwrap();
        assert_eq!(img.pixel(0, 1), Some([200, 0, 0, 0]));
        assert_eq!(img.pixel(2, 0), None);
    }
}
