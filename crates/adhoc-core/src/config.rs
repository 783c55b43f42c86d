//! Configuration for sorted directory listings.
//!
//! # Examples
//!
//! ```
//! use adhoc_httpd_core::OrderConfig;
//!
//! // Use default configuration
//! let config = OrderConfig::default();
//! assert_eq!(config.window_size, 1000);
//! assert_eq!(config.min_batch_size, 100);
//!
//! // Small windows are handy in tests
//! let small = OrderConfig::builder().window_size(4).min_batch_size(1).build();
//! assert!(small.validate().is_ok());
//! ```

use crate::error::ConfigError;

/// Default number of entries a sorted directory handle buffers.
pub const DEFAULT_WINDOW_SIZE: usize = 1000;

/// Default floor for the number of entries requested per underlying read.
pub const DEFAULT_MIN_BATCH_SIZE: usize = 100;

/// Tuning for the windowed reordering of directory listings.
///
/// Memory held per open directory is bounded by
/// `window_size + min_batch_size - 1` entries. Directories whose entries
/// arrive no further than `window_size` positions from their sorted
/// position are listed exactly sorted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderConfig {
    /// Maximum number of entries buffered for reordering.
    ///
    /// Default: 1000
    pub window_size: usize,

    /// Smallest batch requested from the underlying directory.
    ///
    /// Avoids many tiny reads when the window is nearly full.
    /// Default: 100
    pub min_batch_size: usize,
}

impl Default for OrderConfig {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            min_batch_size: DEFAULT_MIN_BATCH_SIZE,
        }
    }
}

impl OrderConfig {
    /// Creates a new configuration builder.
    #[must_use]
    pub fn builder() -> OrderConfigBuilder {
        OrderConfigBuilder::new()
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if either size is zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use adhoc_httpd_core::OrderConfig;
    ///
    /// let mut invalid = OrderConfig::default();
    /// invalid.window_size = 0;
    /// assert!(invalid.validate().is_err());
    /// ```
    pub const fn validate(&self) -> Result<(), ConfigError> {
        if self.window_size == 0 {
            return Err(ConfigError::Zero {
                field: "window_size",
            });
        }
        if self.min_batch_size == 0 {
            return Err(ConfigError::Zero {
                field: "min_batch_size",
            });
        }
        Ok(())
    }

    /// Returns a copy with both sizes raised to at least one.
    ///
    /// The ordering layer applies this to whatever it is handed, so an
    /// unvalidated zero can neither stall a listing nor turn a bounded
    /// read into an unbounded one.
    ///
    /// # Examples
    ///
    /// ```
    /// use adhoc_httpd_core::OrderConfig;
    ///
    /// let config = OrderConfig::builder().window_size(0).min_batch_size(0).build();
    /// let config = config.normalized();
    /// assert_eq!((config.window_size, config.min_batch_size), (1, 1));
    /// assert_eq!(config.batch_size(0), 1);
    /// ```
    #[must_use]
    pub const fn normalized(self) -> Self {
        const fn at_least_one(n: usize) -> usize {
            if n == 0 { 1 } else { n }
        }

        Self {
            window_size: at_least_one(self.window_size),
            min_batch_size: at_least_one(self.min_batch_size),
        }
    }

    /// Number of entries to request when the window holds `buffered`.
    ///
    /// # Examples
    ///
    /// ```
    /// use adhoc_httpd_core::OrderConfig;
    ///
    /// let config = OrderConfig::default();
    /// assert_eq!(config.batch_size(0), 1000);
    /// assert_eq!(config.batch_size(950), 100);
    /// ```
    #[must_use]
    pub const fn batch_size(&self, buffered: usize) -> usize {
        let room = self.window_size.saturating_sub(buffered);
        if room < self.min_batch_size {
            self.min_batch_size
        } else {
            room
        }
    }
}

/// Builder for [`OrderConfig`].
#[derive(Debug, Clone, Default)]
pub struct OrderConfigBuilder {
    config: OrderConfig,
}

impl OrderConfigBuilder {
    /// Creates a builder seeded with the defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the window size.
    #[must_use]
    pub const fn window_size(mut self, window_size: usize) -> Self {
        self.config.window_size = window_size;
        self
    }

    /// Sets the minimum batch size.
    #[must_use]
    pub const fn min_batch_size(mut self, min_batch_size: usize) -> Self {
        self.config.min_batch_size = min_batch_size;
        self
    }

    /// Builds the configuration. Call [`OrderConfig::validate`] before use.
    #[must_use]
    pub const fn build(self) -> OrderConfig {
        self.config
    }
}
