//! crates/logging/src/tracing_bridge.rs
//! Bridge between the tracing crate and the shim's debug categories.
//!
//! [`ShimLayer`] maps event targets such as `oscalls::acl` to a
//! [`DebugFlag`] and records the events whose level is enabled for that flag
//! into the thread-local event buffer. [`init_tracing`] installs the layer
//! together with a stderr formatter filtered by the same rules.
//!
//! # Usage
//!
//! ```rust,ignore
//! use logging::{LogConfig, init_tracing};
//!
//! init_tracing(&LogConfig::from_env());
//! tracing::debug!(target: "oscalls::xattr", "listing attributes");
//! ```

use super::config::LogConfig;
use super::levels::{DebugFlag, DebugLevels};
use super::thread_local::emit_debug;
use std::fmt::Write as _;
use tracing::{Level, Metadata, Subscriber};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;

/// A tracing layer that filters events by debug category and level.
#[derive(Clone, Debug)]
pub struct ShimLayer {
    levels: DebugLevels,
}

impl ShimLayer {
    /// Create a new layer with the given configuration.
    #[must_use]
    pub fn new(config: &LogConfig) -> Self {
        Self {
            levels: config.debug.clone(),
        }
    }

    /// Map a tracing target to a debug flag.
    fn target_to_debug_flag(target: &str) -> Option<DebugFlag> {
        let category = target.strip_prefix("oscalls::")?;
        let category = category.split("::").next().unwrap_or(category);
        DebugFlag::from_name(category)
    }

    /// Map a tracing level to a debug level.
    const fn level_to_debug_level(level: &Level) -> u8 {
        match *level {
            Level::ERROR | Level::WARN | Level::INFO | Level::DEBUG => 1,
            Level::TRACE => 2,
        }
    }

    /// Returns the flag and level of `metadata` when it passes the filter.
    fn accepts(&self, metadata: &Metadata<'_>) -> Option<(DebugFlag, u8)> {
        let flag = Self::target_to_debug_flag(metadata.target())?;
        let level = Self::level_to_debug_level(metadata.level());
        (self.levels.get(flag) >= level).then_some((flag, level))
    }
}

impl<S> Layer<S> for ShimLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let Some((flag, level)) = self.accepts(event.metadata()) else {
            return;
        };
        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        emit_debug(flag, level, visitor.finish());
    }
}

/// Visitor collecting the message followed by `name=value` pairs.
#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: String,
}

impl MessageVisitor {
    fn finish(self) -> String {
        match (self.message.is_empty(), self.fields.is_empty()) {
            (_, true) => self.message,
            (true, false) => self.fields,
            (false, false) => format!("{} {}", self.message, self.fields),
        }
    }
}

impl tracing::field::Visit for MessageVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        } else {
            if !self.fields.is_empty() {
                self.fields.push(' ');
            }
            let _ = write!(self.fields, "{}={value:?}", field.name());
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            value.clone_into(&mut self.message);
        } else {
            self.record_debug(field, &value);
        }
    }
}

/// Initialize tracing with the shim's debug configuration.
///
/// Installs [`ShimLayer`] and, when any category is enabled, a stderr
/// formatter showing the accepted events. Returns `false` when another global
/// subscriber was already installed; that is not an error.
pub fn init_tracing(config: &LogConfig) -> bool {
    use tracing_subscriber::filter::filter_fn;
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let layer = ShimLayer::new(config);
    let stderr = config.is_enabled().then(|| {
        let filter = layer.clone();
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_filter(filter_fn(move |metadata| filter.accepts(metadata).is_some()))
    });

    tracing_subscriber::registry()
        .with(layer)
        .with(stderr)
        .try_init()
        .is_ok()
}
