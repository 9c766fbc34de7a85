use env_logger::{Builder, Env};

pub use log::{debug, error, info, trace, warn};

/// stderr logging, `RUST_LOG` overrides the default filter
pub fn init_logger() {
    let mut builder = Builder::from_env(Env::default().default_filter_or("chip8_host=info"));
    builder.format_timestamp(None);
    let _ = builder.try_init();
}
