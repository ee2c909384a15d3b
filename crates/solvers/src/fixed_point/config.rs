use thiserror::Error;

/// Configuration for the fixed-point solver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    max_iters: usize,
    tolerance: f64,
}

/// Errors that can occur when validating a fixed-point solver config.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("max_iter must be a positive integer")]
    MaxIters,

    #[error("tolerance must be finite and non-negative")]
    Tolerance,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_iters: 100,
            tolerance: 1e-6,
        }
    }
}

impl Config {
    /// Creates a new config.
    ///
    /// A tolerance of zero is allowed; it disables early stopping, so the
    /// solver always runs `max_iters` iterations unless evaluation fails.
    ///
    /// # Errors
    ///
    /// Returns an error if `max_iters` is zero or `tolerance` is negative or
    /// non-finite.
    pub fn new(max_iters: usize, tolerance: f64) -> Result<Self, ConfigError> {
        if max_iters == 0 {
            return Err(ConfigError::MaxIters);
        }
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(ConfigError::Tolerance);
        }

        Ok(Self {
            max_iters,
            tolerance,
        })
    }

    /// Returns the iteration cap.
    #[must_use]
    pub fn max_iters(&self) -> usize {
        self.max_iters
    }

    /// Returns the convergence threshold on `|g(x) - x|`.
    #[must_use]
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }
}
