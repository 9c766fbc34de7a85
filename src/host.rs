//! The host context: every piece of native state the script can reach,
//! owned in one place instead of as globals.
//!
//! Not thread-safe and not meant to be: it lives inside the Lua state and is
//! only touched from the thread evaluating the script.
use crate::config::HostConfig;
use crate::display::{Display, DummyDisplay, FramePacer};
use crate::error::HostError;
use crate::frame::RenderBuffer;
use crate::input::{self, DummyInput, EventSource, InputEvent, KeyMap, Keypad, PollOutcome};
use crate::state::RunState;
use log::debug;

/// a surface plus the input device that comes with it
pub trait Frontend: Display + EventSource {}

impl<T: Display + EventSource> Frontend for T {}

/// headless frontend: queued input, frames recorded instead of shown
pub struct DummyFrontend {
    pub display: DummyDisplay,
    pub input: DummyInput,
}

impl DummyFrontend {
    pub fn new(events: &[InputEvent]) -> Self {
        DummyFrontend {
            display: DummyDisplay::new(),
            input: DummyInput::new(events),
        }
    }
}

impl Display for DummyFrontend {
    fn present(&mut self, frame: &RenderBuffer) -> Result<(), HostError> {
        self.display.present(frame)
    }

    fn teardown(&mut self) {
        self.display.teardown()
    }
}

impl EventSource for DummyFrontend {
    fn pending_events(&mut self) -> Result<Vec<InputEvent>, HostError> {
        self.input.pending_events()
    }
}

pub struct Host<F: Frontend> {
    frontend: F,
    buffer: RenderBuffer,
    keypad: Keypad,
    keymap: KeyMap,
    state: RunState,
    pacer: FramePacer,
    frames: u64,
}

impl<F: Frontend> Host<F> {
    pub fn new(frontend: F, keymap: KeyMap, config: &HostConfig) -> Self {
        Host {
            frontend,
            buffer: RenderBuffer::new(),
            keypad: Keypad::new(),
            keymap,
            state: RunState::new(),
            pacer: FramePacer::new(config.frame_period()),
            frames: 0,
        }
    }

    /// decode the script's monochrome plane into the render buffer
    pub fn buffer_graphics(&mut self, plane: &[u8]) -> usize {
        self.buffer.decode(plane)
    }

    /// show the render buffer, then hold to the configured frame rate
    pub fn draw_graphics(&mut self) -> Result<(), HostError> {
        self.frontend.present(&self.buffer)?;
        self.frames += 1;
        self.pacer.wait();
        Ok(())
    }

    /// drain pending input. Quit and close come back as `Cancelled`, and keep
    /// doing so on every later call.
    pub fn process_user_input(&mut self) -> Result<(), HostError> {
        if !self.state.is_running() {
            return Err(HostError::Cancelled);
        }
        match input::poll(
            &mut self.frontend,
            &self.keymap,
            &mut self.keypad,
            &mut self.state,
        )? {
            PollOutcome::Continue => Ok(()),
            PollOutcome::Cancelled => Err(HostError::Cancelled),
        }
    }

    pub fn is_paused(&self) -> bool {
        self.state.is_paused()
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    pub fn key_pressed(&self, index: i64) -> Result<bool, HostError> {
        self.keypad.is_pressed(index)
    }

    pub fn render_buffer(&self) -> &RenderBuffer {
        &self.buffer
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames
    }

    pub fn frontend(&self) -> &F {
        &self.frontend
    }

    pub fn frontend_mut(&mut self) -> &mut F {
        &mut self.frontend
    }

    /// release the frontend; safe to call again
    pub fn teardown(&mut self) {
        debug!("tearing down after {} frames", self.frames);
        self.frontend.teardown();
    }
}

impl<F: Frontend> Drop for Host<F> {
    fn drop(&mut self) {
        self.frontend.teardown();
    }
}
