//! Exposes the host to the script as six fixed-arity global functions.
//!
//! The names are not Lua identifiers, so scripts call them through the
//! globals table: `_G["key-pressed?"](5)`.
use crate::error::HostError;
use crate::host::{Frontend, Host};
use log::{debug, warn};
use mlua::{Lua, Value, Variadic};

/// what a bridged function does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    BufferGraphics,
    DrawGraphics,
    ProcessUserInput,
    IsPaused,
    IsRunning,
    KeyPressed,
}

#[derive(Debug, Clone, Copy)]
pub struct OpSpec {
    pub name: &'static str,
    pub arity: usize,
    pub op: Operation,
}

pub static OPERATIONS: [OpSpec; 6] = [
    OpSpec {
        name: "buffer-graphics",
        arity: 1,
        op: Operation::BufferGraphics,
    },
    OpSpec {
        name: "draw-graphics",
        arity: 0,
        op: Operation::DrawGraphics,
    },
    OpSpec {
        name: "process-user-input",
        arity: 0,
        op: Operation::ProcessUserInput,
    },
    OpSpec {
        name: "is-paused?",
        arity: 0,
        op: Operation::IsPaused,
    },
    OpSpec {
        name: "is-running?",
        arity: 0,
        op: Operation::IsRunning,
    },
    OpSpec {
        name: "key-pressed?",
        arity: 1,
        op: Operation::KeyPressed,
    },
];

const HOST_ERR: &str = "host context not installed";

/// reject a table with repeated names or operations before anything is
/// registered
pub fn validate(table: &[OpSpec]) -> Result<(), HostError> {
    for (i, spec) in table.iter().enumerate() {
        if spec.name.is_empty() {
            return Err(HostError::Registration {
                name: spec.name,
                reason: String::from("empty name"),
            });
        }
        if table[..i]
            .iter()
            .any(|other| other.name == spec.name || other.op == spec.op)
        {
            return Err(HostError::Registration {
                name: spec.name,
                reason: String::from("listed twice"),
            });
        }
    }
    Ok(())
}

/// register every operation in OPERATIONS against the `Host<F>` stored in
/// the Lua app data. A name that fails to register is logged and skipped;
/// returns how many made it.
pub fn register<F: Frontend + 'static>(lua: &Lua) -> Result<usize, HostError> {
    validate(&OPERATIONS)?;
    let mut registered = 0;
    for spec in OPERATIONS.iter() {
        match register_one::<F>(lua, *spec) {
            Ok(()) => {
                debug!("registered {}/{}", spec.name, spec.arity);
                registered += 1;
            }
            Err(e) => warn!("{}", e),
        }
    }
    Ok(registered)
}

fn register_one<F: Frontend + 'static>(lua: &Lua, spec: OpSpec) -> Result<(), HostError> {
    let OpSpec { name, arity, op } = spec;
    lua.create_function(move |lua, args: Variadic<Value>| {
        if args.len() != arity {
            return Err(HostError::Arity {
                name,
                expected: arity,
                got: args.len(),
            }
            .into());
        }
        dispatch::<F>(lua, name, op, &args)
    })
    .and_then(|f| lua.globals().set(name, f))
    .map_err(|e| HostError::Registration {
        name,
        reason: e.to_string(),
    })
}

fn dispatch<F: Frontend + 'static>(
    lua: &Lua,
    name: &'static str,
    op: Operation,
    args: &[Value],
) -> mlua::Result<Value> {
    let mut host = lua
        .app_data_mut::<Host<F>>()
        .ok_or_else(|| mlua::Error::runtime(HOST_ERR))?;
    match op {
        Operation::BufferGraphics => {
            let plane = frame_plane(name, &args[0])?;
            host.buffer_graphics(&plane);
            Ok(Value::Nil)
        }
        Operation::DrawGraphics => {
            host.draw_graphics()?;
            Ok(Value::Nil)
        }
        Operation::ProcessUserInput => {
            host.process_user_input()?;
            Ok(Value::Nil)
        }
        Operation::IsPaused => Ok(Value::Boolean(host.is_paused())),
        Operation::IsRunning => Ok(Value::Boolean(host.is_running())),
        Operation::KeyPressed => {
            let index = key_index(name, &args[0])?;
            Ok(Value::Boolean(host.key_pressed(index)?))
        }
    }
}

/// a string is taken byte for byte; a sequence table is read as
/// truthy/zero cells
fn frame_plane(name: &'static str, v: &Value) -> Result<Vec<u8>, HostError> {
    match v {
        Value::String(s) => Ok(s.as_bytes().to_vec()),
        Value::Table(t) => t
            .clone()
            .sequence_values::<Value>()
            .map(|cell| {
                cell.map(|c| lit(&c) as u8)
                    .map_err(|e| HostError::ArgumentType {
                        name,
                        expected: "sequence of pixels",
                        got: e.to_string(),
                    })
            })
            .collect(),
        other => Err(HostError::ArgumentType {
            name,
            expected: "string or table",
            got: other.type_name().to_string(),
        }),
    }
}

fn lit(cell: &Value) -> bool {
    match cell {
        Value::Nil | Value::Boolean(false) => false,
        Value::Integer(n) => *n != 0,
        Value::Number(n) => *n != 0.0,
        _ => true,
    }
}

fn key_index(name: &'static str, v: &Value) -> Result<i64, HostError> {
    match v {
        Value::Integer(i) => Ok(*i),
        Value::Number(n) if n.fract() == 0.0 => Ok(*n as i64),
        other => Err(HostError::ArgumentType {
            name,
            expected: "integer",
            got: other.type_name().to_string(),
        }),
    }
}
