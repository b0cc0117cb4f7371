//! Mapping configuration.

/// Default length reported for text columns without a length hint.
pub const DEFAULT_STRING_LENGTH: u32 = 255;

/// Configuration for metadata resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingConfig {
    /// Length reported for text columns that declare no explicit length.
    pub default_string_length: u32,

    /// Build metadata for every scanned entity when the provider is created.
    /// When false, metadata is built lazily on first request.
    pub warm_up: bool,

    /// Refuse to build metadata for entities the scanner did not discover.
    pub strict_membership: bool,
}

impl Default for MappingConfig {
    fn default() -> Self {
        Self {
            default_string_length: DEFAULT_STRING_LENGTH,
            warm_up: false,
            strict_membership: false,
        }
    }
}

impl MappingConfig {
    /// Create a configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the default string length.
    pub fn default_string_length(mut self, length: u32) -> Self {
        self.default_string_length = length;
        self
    }

    /// Enable or disable cache warm-up.
    pub fn warm_up(mut self, warm_up: bool) -> Self {
        self.warm_up = warm_up;
        self
    }

    /// Enable or disable strict scanner membership.
    pub fn strict_membership(mut self, strict: bool) -> Self {
        self.strict_membership = strict;
        self
    }
}
