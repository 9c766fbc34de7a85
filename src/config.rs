//! Fixed host parameters. There are no command-line flags: everything the
//! host needs is decided here at compile time.
use std::time::Duration;

/// logical CHIP-8 resolution
pub const SCREEN_WIDTH: usize = 64;
pub const SCREEN_HEIGHT: usize = 32;
pub const PIXEL_COUNT: usize = SCREEN_WIDTH * SCREEN_HEIGHT;

/// each logical pixel is drawn as a 20x20 block
pub const WINDOW_SCALE: usize = 20;

pub struct HostConfig {
    pub title: &'static str,
    pub window_width: usize,
    pub window_height: usize,
    /// script resource, relative to the working directory
    pub script_path: &'static str,
    /// global function called once after the script has loaded
    pub entry_point: &'static str,
    /// frames per second for `draw-graphics`; `None` presents as fast as the
    /// script asks
    pub target_fps: Option<u32>,
}

impl HostConfig {
    pub fn frame_period(&self) -> Option<Duration> {
        self.target_fps
            .filter(|fps| *fps > 0)
            .map(|fps| Duration::from_secs(1) / fps)
    }
}

impl Default for HostConfig {
    fn default() -> Self {
        HostConfig {
            title: "CHIP-8",
            window_width: SCREEN_WIDTH * WINDOW_SCALE,
            window_height: SCREEN_HEIGHT * WINDOW_SCALE,
            script_path: "./chip8.lua",
            entry_point: "main",
            target_fps: Some(60),
        }
    }
}
