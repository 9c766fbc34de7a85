use std::process::ExitCode;

use chip8_host::config::HostConfig;
use chip8_host::error::HostError;
use chip8_host::logging::{error, init_logger};
use chip8_host::script;

#[cfg(feature = "sdl")]
fn open_frontend(config: &HostConfig) -> Result<chip8_host::sdl::SdlFrontend, HostError> {
    chip8_host::sdl::SdlFrontend::new(config)
}

#[cfg(all(feature = "minifb", not(feature = "sdl")))]
fn open_frontend(config: &HostConfig) -> Result<chip8_host::window::WindowFrontend, HostError> {
    chip8_host::window::WindowFrontend::new(config)
}

#[cfg(all(feature = "terminal", not(any(feature = "sdl", feature = "minifb"))))]
fn open_frontend(config: &HostConfig) -> Result<chip8_host::term::TermFrontend, HostError> {
    chip8_host::term::TermFrontend::new(config)
}

#[cfg(not(any(feature = "sdl", feature = "minifb", feature = "terminal")))]
fn open_frontend(_config: &HostConfig) -> Result<chip8_host::host::DummyFrontend, HostError> {
    chip8_host::logging::warn!("built without a frontend; running headless");
    Ok(chip8_host::host::DummyFrontend::new(&[]))
}

fn main() -> ExitCode {
    init_logger();
    let config = HostConfig::default();

    let frontend = match open_frontend(&config) {
        Ok(f) => f,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    match script::run(frontend, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
