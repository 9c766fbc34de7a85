use crate::config::{HostConfig, PIXEL_COUNT, SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::display::Display;
use crate::error::HostError;
use crate::frame::{RenderBuffer, OPAQUE_BLACK};
use crate::input::{EventSource, InputEvent, PhysicalKey};
use log::{debug, info};
use minifb::{Key, ScaleMode, Window, WindowOptions};

/// native window: the 64x32 frame is stretched over the whole client area
///
/// minifb only exposes which keys are held, not a queue, so input is the
/// difference between two polls: presses come before releases within one
/// poll, and a key pressed and released between polls is never seen. The
/// `sdl` frontend has neither problem.
pub struct WindowFrontend {
    window: Option<Window>,
    /// the RenderBuffer converted to minifb's 0RGB layout
    scratch: Vec<u32>,
    /// keys we've already reported as down
    held: Vec<PhysicalKey>,
}

impl WindowFrontend {
    pub fn new(config: &HostConfig) -> Result<Self, HostError> {
        let mut window = Window::new(
            config.title,
            config.window_width,
            config.window_height,
            WindowOptions {
                resize: true,
                scale_mode: ScaleMode::Stretch,
                ..WindowOptions::default()
            },
        )
        .map_err(|e| HostError::Surface(e.to_string()))?;
        // draw-graphics does its own pacing
        window.set_target_fps(0);

        let scratch = vec![rgba_to_0rgb(OPAQUE_BLACK); PIXEL_COUNT];
        window
            .update_with_buffer(&scratch, SCREEN_WIDTH, SCREEN_HEIGHT)
            .map_err(|e| HostError::Surface(e.to_string()))?;
        info!(
            "opened {}x{} window",
            config.window_width, config.window_height
        );
        Ok(WindowFrontend {
            window: Some(window),
            scratch,
            held: Vec::new(),
        })
    }
}

fn closed() -> HostError {
    HostError::Surface(String::from("window already closed"))
}

impl Display for WindowFrontend {
    fn present(&mut self, frame: &RenderBuffer) -> Result<(), HostError> {
        for (dst, &src) in self.scratch.iter_mut().zip(frame.as_slice()) {
            *dst = rgba_to_0rgb(src);
        }
        let window = self.window.as_mut().ok_or_else(closed)?;
        window
            .update_with_buffer(&self.scratch, SCREEN_WIDTH, SCREEN_HEIGHT)
            .map_err(|e| HostError::Surface(e.to_string()))
    }

    fn teardown(&mut self) {
        if self.window.take().is_some() {
            debug!("window closed");
        }
    }
}

impl EventSource for WindowFrontend {
    fn pending_events(&mut self) -> Result<Vec<InputEvent>, HostError> {
        let window = self.window.as_mut().ok_or_else(closed)?;
        window.update();
        if !window.is_open() {
            return Ok(vec![InputEvent::Close]);
        }
        let down: Vec<PhysicalKey> = window
            .get_keys()
            .into_iter()
            .filter_map(physical_key)
            .collect();
        let events = edges(&self.held, &down);
        self.held = down;
        Ok(events)
    }
}

/// events that take us from `held` to `down`: presses first, then releases
fn edges(held: &[PhysicalKey], down: &[PhysicalKey]) -> Vec<InputEvent> {
    let pressed = down
        .iter()
        .filter(|k| !held.contains(k))
        .map(|k| InputEvent::KeyDown(*k));
    let released = held
        .iter()
        .filter(|k| !down.contains(k))
        .map(|k| InputEvent::KeyUp(*k));
    pressed.chain(released).collect()
}

impl Drop for WindowFrontend {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// RGBA8888 to minifb's 0RGB
fn rgba_to_0rgb(px: u32) -> u32 {
    px >> 8
}

fn physical_key(key: Key) -> Option<PhysicalKey> {
    let c = match key {
        Key::Escape => return Some(PhysicalKey::Escape),
        Key::Space => ' ',
        Key::Key0 => '0',
        Key::Key1 => '1',
        Key::Key2 => '2',
        Key::Key3 => '3',
        Key::Key4 => '4',
        Key::Key5 => '5',
        Key::Key6 => '6',
        Key::Key7 => '7',
        Key::Key8 => '8',
        Key::Key9 => '9',
        Key::A => 'a',
        Key::B => 'b',
        Key::C => 'c',
        Key::D => 'd',
        Key::E => 'e',
        Key::F => 'f',
        Key::G => 'g',
        Key::H => 'h',
        Key::I => 'i',
        Key::J => 'j',
        Key::K => 'k',
        Key::L => 'l',
        Key::M => 'm',
        Key::N => 'n',
        Key::O => 'o',
        Key::P => 'p',
        Key::Q => 'q',
        Key::R => 'r',
        Key::S => 's',
        Key::T => 't',
        Key::U => 'u',
        Key::V => 'v',
        Key::W => 'w',
        Key::X => 'x',
        Key::Y => 'y',
        Key::Z => 'z',
        _ => return None,
    };
    Some(PhysicalKey::Char(c))
}
