use std::{env};

/// Settings for a [`Context`], fixed when it is constructed.
///
/// [`Context`]: crate::Context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// The maximum number of bytes the default allocator will hand out, or
    /// `None` for no limit.
    pub heap_limit: Option<usize>,

    /// If `true`, extending the same map with the same `Id` twice returns the
    /// same map. If `false`, every extension allocates a fresh map.
    pub intern_maps: bool,
}

impl Default for Config {
    fn default() -> Self { Self {heap_limit: None, intern_maps: true} }
}

impl Config {
    /// Environment variable overriding [`Config::heap_limit`].
    pub const HEAP_LIMIT_VAR: &'static str = "WSHAPE_HEAP_LIMIT";

    /// Environment variable overriding [`Config::intern_maps`].
    pub const INTERN_MAPS_VAR: &'static str = "WSHAPE_INTERN_MAPS";

    /// Reads the defaults, overridden by any environment variables that are set
    /// and well-formed. Malformed values are logged and ignored.
    pub fn from_env() -> Self {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Like `from_env()` but reads variables from `lookup`.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(value) = lookup(Self::HEAP_LIMIT_VAR) {
            match value.trim().parse::<usize>() {
                Ok(limit) => { config.heap_limit = Some(limit); },
                Err(_) => tracing::warn!(%value, "ignoring malformed {}", Self::HEAP_LIMIT_VAR),
            }
        }
        if let Some(value) = lookup(Self::INTERN_MAPS_VAR) {
            match value.trim() {
                "1" | "true" | "yes" => { config.intern_maps = true; },
                "0" | "false" | "no" => { config.intern_maps = false; },
                _ => tracing::warn!(%value, "ignoring malformed {}", Self::INTERN_MAPS_VAR),
            }
        }
        config
    }
}

// ----------------------------------------------------------------------------
