//! Loads the driving script and runs it against a host.
use crate::bridge;
use crate::config::HostConfig;
use crate::error::HostError;
use crate::host::{Frontend, Host};
use crate::input::KeyMap;
use log::{debug, info, warn};
use mlua::{Function, Lua, LuaOptions, StdLib};
use std::fs;

/// a fresh Lua state with the safe standard library
pub fn create_runtime() -> Result<Lua, HostError> {
    Lua::new_with(StdLib::ALL_SAFE, LuaOptions::default())
        .map_err(|e| HostError::Runtime(e.to_string()))
}

/// move the host into the runtime and register the bridge against it
pub fn install<F: Frontend + 'static>(lua: &Lua, host: Host<F>) -> Result<(), HostError> {
    lua.set_app_data(host);
    let registered = bridge::register::<F>(lua)?;
    if registered < bridge::OPERATIONS.len() {
        warn!(
            "only {} of {} host functions are available to the script",
            registered,
            bridge::OPERATIONS.len()
        );
    }
    Ok(())
}

/// execute a chunk of script source
pub fn load_source(lua: &Lua, name: &str, source: &str) -> Result<(), HostError> {
    lua.load(source).set_name(name).exec().map_err(|e| match e {
        mlua::Error::SyntaxError { message, .. } => HostError::ScriptLoad {
            path: name.to_string(),
            reason: message,
        },
        other => HostError::from_script(other),
    })
}

pub fn load_file(lua: &Lua, path: &str) -> Result<(), HostError> {
    let source = fs::read_to_string(path).map_err(|e| HostError::ScriptLoad {
        path: path.to_string(),
        reason: e.to_string(),
    })?;
    debug!("loaded {} ({} bytes)", path, source.len());
    load_source(lua, path, &source)
}

/// call the script's entry point once; it drives the emulation loop itself
pub fn call_entry_point(lua: &Lua, name: &str) -> Result<(), HostError> {
    let entry: Option<Function> = lua
        .globals()
        .get(name)
        .map_err(|e| HostError::ScriptLoad {
            path: name.to_string(),
            reason: e.to_string(),
        })?;
    match entry {
        Some(f) => f.call::<()>(()).map_err(HostError::from_script),
        None => Err(HostError::ScriptLoad {
            path: name.to_string(),
            reason: String::from("entry point is not defined"),
        }),
    }
}

/// take the host back out of the runtime and release its frontend
pub fn teardown<F: Frontend + 'static>(lua: &Lua) -> Option<Host<F>> {
    let mut host = lua.remove_app_data::<Host<F>>()?;
    host.teardown();
    Some(host)
}

/// run the configured script on `frontend` until it returns, fails, or the
/// user quits. The frontend is torn down on every path; a quit is `Ok`.
pub fn run<F: Frontend + 'static>(frontend: F, config: &HostConfig) -> Result<(), HostError> {
    let host = Host::new(frontend, KeyMap::conventional()?, config);
    let lua = create_runtime()?;
    install(&lua, host)?;

    let outcome = load_file(&lua, config.script_path)
        .and_then(|()| call_entry_point(&lua, config.entry_point));
    if let Some(host) = teardown::<F>(&lua) {
        info!("presented {} frames", host.frames_presented());
    }

    match outcome {
        Err(HostError::Cancelled) => {
            info!("quit");
            Ok(())
        }
        other => other,
    }
}
