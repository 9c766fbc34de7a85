use crate::error::HostError;
use crate::state::RunState;
use log::{debug, info};
use std::collections::VecDeque;

/// number of keys on the COSMAC VIP hex keypad
pub const NUM_KEYS: usize = 16;

/// a physical key, independent of whichever frontend produced it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhysicalKey {
    /// printable keys, lower-cased
    Char(char),
    Escape,
}

/// quits the host
pub const QUIT_KEY: PhysicalKey = PhysicalKey::Escape;
/// toggles pause
pub const PAUSE_KEY: PhysicalKey = PhysicalKey::Char(' ');

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    KeyDown(PhysicalKey),
    KeyUp(PhysicalKey),
    /// the window (or terminal) was closed
    Close,
}

/// left-hand side of a qwerty keyboard, in keypad order 0x0-0xf
const CHIP8_CONVENTIONAL_KEYMAP: [char; NUM_KEYS] = [
    'x', // 0
    '1', // 1
    '2', // 2
    '3', // 3
    'q', // 4
    'w', // 5
    'e', // 6
    'a', // 7
    's', // 8
    'd', // 9
    'z', // a
    'c', // b
    '4', // c
    'r', // d
    'f', // e
    'v', // f
];

/// produces input events; implemented by each frontend
pub trait EventSource {
    /// everything queued right now, oldest first. Must not block.
    fn pending_events(&mut self) -> Result<Vec<InputEvent>, HostError>;
}

/// which physical key drives which keypad index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyMap {
    keys: [PhysicalKey; NUM_KEYS],
}

impl KeyMap {
    /// checks the map is injective and leaves the control keys free
    pub fn new(keys: [PhysicalKey; NUM_KEYS]) -> Result<Self, HostError> {
        for (i, k) in keys.iter().enumerate() {
            if *k == QUIT_KEY || *k == PAUSE_KEY {
                return Err(HostError::InvalidKeyMap(format!(
                    "{:?} at 0x{:x} is reserved",
                    k, i
                )));
            }
            if let Some(j) = keys[..i].iter().position(|other| other == k) {
                return Err(HostError::InvalidKeyMap(format!(
                    "{:?} maps to both 0x{:x} and 0x{:x}",
                    k, j, i
                )));
            }
        }
        Ok(KeyMap { keys })
    }

    /// the usual layout, checked like any other map
    pub fn conventional() -> Result<Self, HostError> {
        Self::new(CHIP8_CONVENTIONAL_KEYMAP.map(PhysicalKey::Char))
    }

    /// keypad indices driven by `key`; at most one since the map is injective
    pub fn indices_of(&self, key: PhysicalKey) -> impl Iterator<Item = usize> + '_ {
        self.keys
            .iter()
            .enumerate()
            .filter(move |(_, k)| **k == key)
            .map(|(i, _)| i)
    }

    pub fn key_for(&self, index: usize) -> Option<PhysicalKey> {
        self.keys.get(index).copied()
    }
}

/// held/released state of the 16 virtual keys
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Keypad {
    keys: [bool; NUM_KEYS],
}

impl Keypad {
    pub fn new() -> Self {
        Keypad {
            keys: [false; NUM_KEYS],
        }
    }

    /// bounds-checked lookup; takes the script's integer as-is
    pub fn is_pressed(&self, index: i64) -> Result<bool, HostError> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.keys.get(i))
            .copied()
            .ok_or(HostError::KeyOutOfRange(index))
    }

    fn set(&mut self, index: usize, down: bool) {
        self.keys[index] = down;
    }
}

/// whether the host should keep going after a poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    Continue,
    /// quit key or close; remaining events were discarded
    Cancelled,
}

/// drain everything the frontend has queued and apply it, oldest first
pub fn poll(
    source: &mut dyn EventSource,
    keymap: &KeyMap,
    keypad: &mut Keypad,
    state: &mut RunState,
) -> Result<PollOutcome, HostError> {
    for event in source.pending_events()? {
        if apply(event, keymap, keypad, state) == PollOutcome::Cancelled {
            return Ok(PollOutcome::Cancelled);
        }
    }
    Ok(PollOutcome::Continue)
}

fn apply(
    event: InputEvent,
    keymap: &KeyMap,
    keypad: &mut Keypad,
    state: &mut RunState,
) -> PollOutcome {
    match event {
        InputEvent::KeyDown(key) => {
            if key == QUIT_KEY {
                info!("quit key pressed");
                state.stop();
                return PollOutcome::Cancelled;
            }
            if key == PAUSE_KEY {
                state.toggle_pause();
                debug!("paused: {}", state.is_paused());
            }
            for i in keymap.indices_of(key) {
                keypad.set(i, true);
            }
        }
        InputEvent::KeyUp(key) => {
            for i in keymap.indices_of(key) {
                keypad.set(i, false);
            }
        }
        InputEvent::Close => {
            info!("window closed");
            state.stop();
            return PollOutcome::Cancelled;
        }
    }
    PollOutcome::Continue
}

/// EventSource for tests: each poll hands out the next batch of events
pub struct DummyInput {
    polls: VecDeque<Vec<InputEvent>>,
}

impl DummyInput {
    pub fn new(events: &[InputEvent]) -> Self {
        DummyInput {
            polls: VecDeque::from([Vec::from(events)]),
        }
    }

    /// queue a batch for the poll after the ones already queued
    pub fn then(mut self, events: &[InputEvent]) -> Self {
        self.polls.push_back(Vec::from(events));
        self
    }

    /// add to the next batch still to be polled
    pub fn push(&mut self, event: InputEvent) {
        match self.polls.front_mut() {
            Some(batch) => batch.push(event),
            None => self.polls.push_back(vec![event]),
        }
    }
}

impl EventSource for DummyInput {
    fn pending_events(&mut self) -> Result<Vec<InputEvent>, HostError> {
        Ok(self.polls.pop_front().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use InputEvent::*;

    fn key(c: char) -> PhysicalKey {
        PhysicalKey::Char(c)
    }

    fn run(events: &[InputEvent]) -> (Keypad, RunState, PollOutcome) {
        let mut keypad = Keypad::new();
        let mut state = RunState::new();
        let outcome = poll(
            &mut DummyInput::new(events),
            &KeyMap::conventional().unwrap(),
            &mut keypad,
            &mut state,
        )
        .unwrap();
        (keypad, state, outcome)
    }

    #[test]
    fn test_conventional_keymap_is_injective() {
        let m = KeyMap::conventional().unwrap();
        for a in 0..NUM_KEYS {
            for b in 0..NUM_KEYS {
                if a != b {
                    assert_ne!(m.key_for(a), m.key_for(b));
                }
            }
        }
    }

    #[test]
    fn test_conventional_is_validated() {
        let checked = KeyMap::new(CHIP8_CONVENTIONAL_KEYMAP.map(PhysicalKey::Char));
        assert_eq!(KeyMap::conventional().ok(), checked.ok());
        assert!(KeyMap::conventional().is_ok());
    }

    #[test]
    fn test_keymap_rejects_duplicates() {
        let mut keys = CHIP8_CONVENTIONAL_KEYMAP.map(PhysicalKey::Char);
        keys[3] = key('x');
        assert!(matches!(KeyMap::new(keys), Err(HostError::InvalidKeyMap(_))));
    }

    #[test]
    fn test_keymap_rejects_control_keys() {
        let mut keys = CHIP8_CONVENTIONAL_KEYMAP.map(PhysicalKey::Char);
        keys[0] = PAUSE_KEY;
        assert!(KeyMap::new(keys).is_err());
        keys[0] = QUIT_KEY;
        assert!(KeyMap::new(keys).is_err());
    }

    #[test]
    fn test_empty_poll_changes_nothing() {
        let (keypad, state, outcome) = run(&[]);
        assert_eq!(keypad, Keypad::new());
        assert_eq!(state, RunState::new());
        assert_eq!(outcome, PollOutcome::Continue);
    }

    #[test]
    fn test_key_down_sets_mapped_index_only() {
        // 'w' is keypad 5
        let (keypad, state, _) = run(&[KeyDown(key('w'))]);
        for i in 0..NUM_KEYS as i64 {
            assert_eq!(keypad.is_pressed(i).unwrap(), i == 5);
        }
        assert!(state.is_running());
        assert!(!state.is_paused());
    }

    #[test]
    fn test_key_down_then_up_restores() {
        let (keypad, _, _) = run(&[KeyDown(key('v')), KeyUp(key('v'))]);
        assert!(!keypad.is_pressed(0xf).unwrap());
    }

    #[test]
    fn test_key_state_persists_across_polls() {
        let mut keypad = Keypad::new();
        let mut state = RunState::new();
        let keymap = KeyMap::conventional().unwrap();
        let mut src = DummyInput::new(&[KeyDown(key('1'))]);
        poll(&mut src, &keymap, &mut keypad, &mut state).unwrap();
        poll(&mut src, &keymap, &mut keypad, &mut state).unwrap();
        assert!(keypad.is_pressed(1).unwrap());
        src.push(KeyUp(key('1')));
        poll(&mut src, &keymap, &mut keypad, &mut state).unwrap();
        assert!(!keypad.is_pressed(1).unwrap());
    }

    #[test]
    fn test_events_apply_in_order() {
        let (keypad, _, _) = run(&[KeyUp(key('q')), KeyDown(key('q'))]);
        assert!(keypad.is_pressed(4).unwrap());
    }

    #[test]
    fn test_unmapped_keys_ignored() {
        let (keypad, state, outcome) = run(&[KeyDown(key('p')), KeyUp(key('m'))]);
        assert_eq!(keypad, Keypad::new());
        assert_eq!(state, RunState::new());
        assert_eq!(outcome, PollOutcome::Continue);
    }

    #[test]
    fn test_pause_toggles() {
        let (_, state, _) = run(&[KeyDown(PAUSE_KEY)]);
        assert!(state.is_paused());
        let (_, state, _) = run(&[KeyDown(PAUSE_KEY), KeyUp(PAUSE_KEY), KeyDown(PAUSE_KEY)]);
        assert!(!state.is_paused());
    }

    #[test]
    fn test_quit_cancels_and_discards_rest() {
        let (keypad, state, outcome) = run(&[KeyDown(QUIT_KEY), KeyDown(key('x'))]);
        assert_eq!(outcome, PollOutcome::Cancelled);
        assert!(!state.is_running());
        assert!(!keypad.is_pressed(0).unwrap());
    }

    #[test]
    fn test_close_cancels() {
        let (_, state, outcome) = run(&[KeyDown(key('x')), Close]);
        assert_eq!(outcome, PollOutcome::Cancelled);
        assert!(!state.is_running());
    }

    #[test]
    fn test_keypad_bounds() {
        let k = Keypad::new();
        assert!(k.is_pressed(0).is_ok());
        assert!(k.is_pressed(15).is_ok());
        assert!(matches!(k.is_pressed(16), Err(HostError::KeyOutOfRange(16))));
        assert!(matches!(k.is_pressed(-1), Err(HostError::KeyOutOfRange(-1))));
    }
}
