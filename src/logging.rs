//! Tracing setup. The filter sits behind a reload layer so the remote `debug`
//! control can raise verbosity at runtime.

use tracing::Subscriber;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, reload};

/// Filter directive used while debug output is on.
const DEBUG_LEVEL: &str = "debug";

/// Base filter directive for a `-v` count.
pub fn base_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Switches the installed filter between the base level and debug.
#[derive(Clone)]
pub struct DebugSwitch {
    handle: reload::Handle<EnvFilter, Registry>,
    base: &'static str,
}

impl DebugSwitch {
    pub fn set(&self, on: bool) {
        // Never quieter than what -v asked for.
        let directive = if on && self.base != "trace" {
            DEBUG_LEVEL
        } else {
            self.base
        };
        if let Err(e) = self.handle.reload(EnvFilter::new(directive)) {
            tracing::warn!("Failed to change log level: {e}");
        }
    }
}

/// Formatting subscriber writing to `writer`, filtered at `base`.
pub fn subscriber<W>(base: &'static str, writer: W) -> (impl Subscriber + Send + Sync + 'static, DebugSwitch)
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let (filter, handle) = reload::Layer::new(EnvFilter::new(base));
    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(writer));
    (subscriber, DebugSwitch { handle, base })
}

/// Installs the stderr subscriber for the process.
pub fn init(verbose: u8) -> DebugSwitch {
    let (subscriber, switch) = subscriber(base_level(verbose), std::io::stderr);
    subscriber.init();
    switch
}
