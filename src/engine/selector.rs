//! Process-wide engine resolution.
//!
//! The first call to [`resolve`] probes the native engine once and caches the
//! outcome; every later call returns the cached engine.  Concurrent first
//! calls are safe: `OnceLock` runs the probe on one thread and the others
//! wait for its result.  A failed probe is never surfaced to the caller; it
//! is logged at debug level and the software engine is bound instead.

use std::sync::OnceLock;

use thiserror::Error;

use super::{native, Engine};

static ENGINE: OnceLock<Engine> = OnceLock::new();

/// Why the native engine could not be bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub(crate) enum EngineUnavailable {
    /// Built without the `native` feature.
    #[error("built without the `native` feature")]
    FeatureDisabled,
    /// The target is not one the native engine was built for.
    #[error("unsupported target architecture")]
    UnsupportedTarget,
    /// The running CPU failed the feature probe.
    #[error("CPU feature probe failed")]
    CpuProbeFailed,
}

/// Try to bind the native engine.
pub(crate) fn probe_native() -> Result<Engine, EngineUnavailable> {
    if !cfg!(feature = "native") {
        return Err(EngineUnavailable::FeatureDisabled);
    }
    if !cfg!(native_engine) {
        return Err(EngineUnavailable::UnsupportedTarget);
    }
    Engine::native().ok_or(EngineUnavailable::CpuProbeFailed)
}

fn select() -> Engine {
    match probe_native() {
        Ok(engine) => {
            log::debug!("lzblock: bound {} engine", engine.name());
            engine
        }
        Err(reason) => {
            log::debug!("lzblock: native engine unavailable ({reason}), using software");
            Engine::software()
        }
    }
}

/// The engine for this process.  Idempotent and thread-safe.
pub fn resolve() -> &'static Engine {
    ENGINE.get_or_init(select)
}

/// `true` when the native engine can run in this process.
pub fn is_native_available() -> bool {
    native::is_available()
}
