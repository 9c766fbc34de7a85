//!
//! ## Design
//!
//! * native side of a CHIP-8 machine whose CPU lives in a Lua script
//! * the script drives the loop; the host only answers six calls:
//!   `buffer-graphics`, `draw-graphics`, `process-user-input`, `is-paused?`,
//!   `is-running?` and `key-pressed?`
//! * one fixed geometry: 64x32 logical pixels, shown in a 1280x640 window
//! * one fixed keypad layout, the usual left-hand side of a qwerty keyboard
//! * abstract display and input so alternatives can plug in; an SDL2 window
//!   by default, minifb with the `minifb` feature, a TUI in-console with the
//!   `terminal` feature
//! * single-threaded: everything runs on the thread evaluating the script
//!
//! Model
//!
//! main
//!  |-- frontend (window | terminal | dummy), fatal if it can't be opened
//!  |-- host(frontend, keymap, config)
//!  |    |-- render buffer      <- buffer-graphics
//!  |    |-- frontend.present   <- draw-graphics
//!  |    |-- keypad, run state  <- process-user-input
//!  |    `-- queries            <- is-paused?, is-running?, key-pressed?
//!  |-- lua runtime, host stored as app data, bridge registered
//!  |-- load ./chip8.lua, call main()
//!  `-- teardown, on every path
//!       |   // quit and close don't exit the process: they raise a
//!       |   // cancellation through the script back out to here
//!       `-- exit 0 on quit or normal return, 1 on any script failure
pub mod bridge;
pub mod config;
pub mod display;
pub mod error;
pub mod frame;
pub mod host;
pub mod input;
pub mod logging;
pub mod script;
#[cfg(feature = "sdl")]
pub mod sdl;
pub mod state;
#[cfg(feature = "terminal")]
pub mod term;
#[cfg(feature = "minifb")]
pub mod window;
