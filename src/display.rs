use crate::error::HostError;
use crate::frame::RenderBuffer;
use std::time::{Duration, Instant};

/// Display owns whatever the frontend draws on (window, terminal...) and
/// shows a finished RenderBuffer on it. The rest of the host never needs to
/// know how.
pub trait Display {
    /// upload `frame` and swap it onto the screen
    fn present(&mut self, frame: &RenderBuffer) -> Result<(), HostError>;

    /// release the surface. Must be safe to call more than once; frontends
    /// also call it from Drop.
    fn teardown(&mut self) {}
}

/// spaces out presented frames to a fixed rate
pub struct FramePacer {
    period: Option<Duration>,
    last: Option<Instant>,
}

impl FramePacer {
    pub fn new(period: Option<Duration>) -> Self {
        FramePacer { period, last: None }
    }

    /// sleep until one period has passed since the previous call. Returns how
    /// long we slept.
    pub fn wait(&mut self) -> Duration {
        let now = Instant::now();
        let slept = match (self.period, self.last) {
            (Some(period), Some(last)) => {
                let elapsed = now.duration_since(last);
                if elapsed < period {
                    let remaining = period - elapsed;
                    spin_sleep::sleep(remaining);
                    remaining
                } else {
                    Duration::ZERO
                }
            }
            _ => Duration::ZERO,
        };
        self.last = Some(Instant::now());
        slept
    }
}

/// useful for testing non-display routines; keeps the last frame it was shown
pub struct DummyDisplay {
    pub frames_presented: usize,
    pub last_frame: Option<RenderBuffer>,
    pub torn_down: bool,
}

impl DummyDisplay {
    pub fn new() -> Self {
        DummyDisplay {
            frames_presented: 0,
            last_frame: None,
            torn_down: false,
        }
    }
}

impl Default for DummyDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for DummyDisplay {
    fn present(&mut self, frame: &RenderBuffer) -> Result<(), HostError> {
        if self.torn_down {
            return Err(HostError::Surface(String::from("surface already released")));
        }
        self.frames_presented += 1;
        self.last_frame = Some(frame.clone());
        Ok(())
    }

    fn teardown(&mut self) {
        self.torn_down = true;
    }
}
