//! Display backend abstraction for pushing gamma triples to physical outputs.
//!
//! The scheduler and gamma model never touch displays. The driver enumerates
//! connected outputs once through a [`DisplayBackend`] and then applies every
//! computed [`GammaTriple`] to each of them.
//!
//! ## Supported Backends
//!
//! - **xrandr**: Invokes the `xrandr` utility (`--output <id> --gamma R:G:B`)

use serde::Deserialize;

use crate::error::{FluxError, Result};
use crate::gamma::GammaTriple;

pub mod xrandr;

pub use xrandr::XrandrBackend;

/// Backend selection from the configuration file.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    Xrandr,
}

impl Backend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::Xrandr => "xrandr",
        }
    }
}

/// Sink for gamma triples and source of display identifiers.
#[cfg_attr(test, mockall::automock)]
pub trait DisplayBackend {
    /// List identifiers of connected displays.
    ///
    /// Fails with [`FluxError::Enumeration`] when the underlying utility is
    /// unavailable or no display is connected.
    fn list_connected_displays(&mut self) -> Result<Vec<String>>;

    /// Apply one gamma triple to one display.
    ///
    /// Fails with [`FluxError::Apply`] when the utility rejects the request.
    fn apply_gamma(&mut self, display: &str, gamma: GammaTriple) -> Result<()>;

    /// Human-readable backend name for log output.
    fn backend_name(&self) -> &'static str;
}

/// Create the backend selected in the configuration.
pub fn create_backend(backend: Backend) -> Box<dyn DisplayBackend> {
    match backend {
        Backend::Xrandr => Box::new(XrandrBackend::new()),
    }
}

/// Apply `gamma` to every display, collecting failures instead of stopping
/// at the first one.
pub fn apply_to_all(
    backend: &mut dyn DisplayBackend,
    displays: &[String],
    gamma: GammaTriple,
) -> Vec<FluxError> {
    displays
        .iter()
        .filter_map(|display| backend.apply_gamma(display, gamma).err())
        .collect()
}
