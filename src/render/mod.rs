//! Offline rasterization of a retained scene.

use std::path::Path;

use anyhow::Context as _;

use crate::foundation::error::{AvatarError, AvatarResult};

/// CPU rasterizer built on `vello_cpu`.
pub mod cpu;

/// A rendered frame of RGBA8 pixels, row-major.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// The RGBA value at `(x, y)`, as stored.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        self.data.get(i..i + 4).map(|px| [px[0], px[1], px[2], px[3]])
    }

    /// Straight-alpha copy of the pixel data.
    pub fn to_straight(&self) -> Vec<u8> {
        let mut out = self.data.clone();
        if self.premultiplied {
            unpremultiply_in_place(&mut out);
        }
        out
    }

    /// Write the frame as a PNG, creating parent directories as needed.
    pub fn write_png(&self, path: impl AsRef<Path>) -> AvatarResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create output dir '{}'", parent.display()))?;
        }
        let img = image::RgbaImage::from_raw(self.width, self.height, self.to_straight())
            .ok_or_else(|| AvatarError::render("frame buffer does not match its dimensions"))?;
        img.save_with_format(path, image::ImageFormat::Png)
            .map_err(|e| AvatarError::render(format!("write png '{}': {e}", path.display())))?;
        Ok(())
    }
}

fn unpremultiply_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * 255 + a / 2) / a).min(255) as u8;
        px[1] = ((px[1] as u16 * 255 + a / 2) / a).min(255) as u8;
        px[2] = ((px[2] as u16 * 255 + a / 2) / a).min(255) as u8;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/frame.rs"]
mod tests;
