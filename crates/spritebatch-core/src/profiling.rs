//! Profiling utilities based on the `puffin` crate.
//!
//! With the `profiling` feature disabled, [`profile_function!`] and
//! [`profile_scope!`] expand to nothing so call sites never need `cfg`s.

use std::sync::atomic::{AtomicU64, Ordering};

#[cfg(feature = "profiling")]
pub use puffin::{GlobalProfiler, profile_function, profile_scope};

#[cfg(not(feature = "profiling"))]
#[doc(hidden)]
#[macro_export]
macro_rules! __spritebatch_noop_profile {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "profiling"))]
pub use crate::__spritebatch_noop_profile as profile_function;
#[cfg(not(feature = "profiling"))]
pub use crate::__spritebatch_noop_profile as profile_scope;

/// Profiling backend options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfilingBackend {
    /// Send profiling data to puffin_viewer via HTTP.
    PuffinHttp,
}

#[cfg(feature = "profiling")]
static PROFILING_SERVER: std::sync::OnceLock<puffin_http::Server> = std::sync::OnceLock::new();

/// Initialize profiling with the specified backend.
///
/// # Example
/// ```no_run
/// use spritebatch_core::profiling::{init_profiling, ProfilingBackend};
///
/// init_profiling(ProfilingBackend::PuffinHttp);
/// ```
#[cfg(feature = "profiling")]
pub fn init_profiling(backend: ProfilingBackend) {
    match backend {
        ProfilingBackend::PuffinHttp => {
            puffin::set_scopes_on(true);

            let addr = format!("0.0.0.0:{}", puffin_http::DEFAULT_PORT);
            match puffin_http::Server::new(&addr) {
                Ok(server) => {
                    tracing::info!("Puffin profiler server started on http://{}", addr);
                    let _ = PROFILING_SERVER.set(server);
                }
                Err(e) => {
                    tracing::error!("Failed to start puffin server: {}", e);
                }
            }
        }
    }
}

/// Initialize profiling. No-op without the `profiling` feature.
#[cfg(not(feature = "profiling"))]
pub fn init_profiling(_backend: ProfilingBackend) {
    tracing::debug!("Profiling requested but the `profiling` feature is disabled");
}

static FRAME_INDEX: AtomicU64 = AtomicU64::new(0);

/// Mark the start of a new frame for profiling.
///
/// Call once per `begin`/`end` cycle so scopes are grouped by frame.
#[inline]
pub fn new_frame() {
    FRAME_INDEX.fetch_add(1, Ordering::Relaxed);
    #[cfg(feature = "profiling")]
    puffin::GlobalProfiler::lock().new_frame();
}

/// Number of frames opened with [`new_frame`] in this process.
pub fn frame_index() -> u64 {
    FRAME_INDEX.load(Ordering::Relaxed)
}
