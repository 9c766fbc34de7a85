use crate::config::{PIXEL_COUNT, SCREEN_HEIGHT, SCREEN_WIDTH};
use log::debug;

/// RGBA8888, fully opaque
pub const OPAQUE_BLACK: u32 = 0x0000_00ff;
pub const OPAQUE_WHITE: u32 = 0xffff_ffff;

/// colour buffer handed to the display surface, one RGBA8888 entry per
/// logical pixel, row-major
#[derive(Clone, PartialEq, Eq)]
pub struct RenderBuffer {
    pixels: Box<[u32; PIXEL_COUNT]>,
}

impl RenderBuffer {
    /// starts all black, matching the cleared surface
    pub fn new() -> Self {
        RenderBuffer {
            pixels: Box::new([OPAQUE_BLACK; PIXEL_COUNT]),
        }
    }

    /// rewrite the buffer from a monochrome plane (one byte per pixel; zero is
    /// black, anything else is white)
    ///
    /// Only `min(plane.len(), 2048)` cells are written: a short plane leaves
    /// the rest of the previous frame in place, extra bytes are ignored.
    /// Returns how many cells were written.
    pub fn decode(&mut self, plane: &[u8]) -> usize {
        let n = plane.len().min(PIXEL_COUNT);
        if plane.len() != PIXEL_COUNT {
            debug!(
                "frame plane is {} bytes, expected {}; decoding {}",
                plane.len(),
                PIXEL_COUNT,
                n
            );
        }
        for (px, &b) in self.pixels.iter_mut().zip(&plane[..n]) {
            *px = if b != 0 { OPAQUE_WHITE } else { OPAQUE_BLACK };
        }
        n
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.pixels[..]
    }

    /// colour at logical coordinate, for frontends that draw per pixel
    pub fn pixel(&self, x: usize, y: usize) -> Option<u32> {
        if x >= SCREEN_WIDTH || y >= SCREEN_HEIGHT {
            return None;
        }
        self.pixels.get(y * SCREEN_WIDTH + x).copied()
    }

    pub fn is_lit(&self, x: usize, y: usize) -> bool {
        self.pixel(x, y) == Some(OPAQUE_WHITE)
    }
}

impl Default for RenderBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RenderBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let lit = self.pixels.iter().filter(|&&p| p == OPAQUE_WHITE).count();
        write!(f, "RenderBuffer({} of {} lit)", lit, PIXEL_COUNT)
    }
}
