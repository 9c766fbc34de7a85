/// run/pause flags for the host. Only the input mapper changes them; the
/// script reads them through `is-running?` and `is-paused?`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunState {
    running: bool,
    paused: bool,
}

impl RunState {
    pub fn new() -> Self {
        RunState {
            running: true,
            paused: false,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub(crate) fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    /// one-way; the host is shutting down
    pub(crate) fn stop(&mut self) {
        self.running = false;
    }
}

impl Default for RunState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let s = RunState::new();
        assert!(s.is_running());
        assert!(!s.is_paused());
    }

    #[test]
    fn test_toggle_is_involutive() {
        let mut s = RunState::new();
        s.toggle_pause();
        assert!(s.is_paused());
        s.toggle_pause();
        assert_eq!(s, RunState::new());
    }

    #[test]
    fn test_stop_keeps_pause() {
        let mut s = RunState::new();
        s.toggle_pause();
        s.stop();
        assert!(!s.is_running());
        assert!(s.is_paused());
    }
}
