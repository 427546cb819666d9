//! Builder for custom security level tables.
//!
//! The standard table is right for most deployments. A custom table is
//! useful when hashes must be cheaper (tests, constrained devices) or when
//! a deployment wants stronger parameters than the presets.
//!
//! | Level | Standard memory | Iterations | Parallelism |
//! |-------|-----------------|------------|-------------|
//! | `interactive` | 64 MiB | 2 | 1 |
//! | `moderate` | 256 MiB | 3 | 1 |
//! | `sensitive` | 1 GiB | 4 | 1 |
//!
//! # Example
//!
//! ```rust
//! use strongbox::prelude::*;
//!
//! let levels = SecurityLevelsBuilder::new()
//!     .interactive(Argon2Params::new(32 * 1024, 2, 1))
//!     .try_build()
//!     .expect("parameters are valid");
//!
//! assert_eq!(
//!     levels.params(SecurityLevel::Interactive).memory_kib,
//!     32 * 1024
//! );
//! // Untouched levels keep their standard values.
//! assert_eq!(
//!     levels.params(SecurityLevel::Moderate),
//!     STANDARD_LEVELS.params(SecurityLevel::Moderate)
//! );
//! ```

use crate::core::error::StrongboxResult;
use crate::core::operations::security::{Argon2Params, SecurityLevel, SecurityLevels};

/// Fluent builder for [`SecurityLevels`].
#[derive(Debug, Clone, Copy)]
pub struct SecurityLevelsBuilder {
    interactive: Argon2Params,
    moderate: Argon2Params,
    sensitive: Argon2Params,
}

impl Default for SecurityLevelsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SecurityLevelsBuilder {
    /// Starts from the standard table.
    #[must_use]
    pub const fn new() -> Self {
        let standard = SecurityLevels::standard();
        Self {
            interactive: standard.params(SecurityLevel::Interactive),
            moderate: standard.params(SecurityLevel::Moderate),
            sensitive: standard.params(SecurityLevel::Sensitive),
        }
    }

    /// Sets the interactive parameters.
    #[must_use]
    pub const fn interactive(mut self, params: Argon2Params) -> Self {
        self.interactive = params;
        self
    }

    /// Sets the moderate parameters.
    #[must_use]
    pub const fn moderate(mut self, params: Argon2Params) -> Self {
        self.moderate = params;
        self
    }

    /// Sets the sensitive parameters.
    #[must_use]
    pub const fn sensitive(mut self, params: Argon2Params) -> Self {
        self.sensitive = params;
        self
    }

    /// Sets the parameters of one level.
    #[must_use]
    pub const fn level(self, level: SecurityLevel, params: Argon2Params) -> Self {
        match level {
            SecurityLevel::Interactive => self.interactive(params),
            SecurityLevel::Moderate => self.moderate(params),
            SecurityLevel::Sensitive => self.sensitive(params),
        }
    }

    /// Builds the table, checking every level against Argon2's limits.
    ///
    /// # Errors
    ///
    /// Returns `StrongboxError::CannotPerformOperation` if any level's
    /// parameters are rejected by Argon2.
    pub fn try_build(self) -> StrongboxResult<SecurityLevels> {
        for params in [self.interactive, self.moderate, self.sensitive] {
            params.hasher(None)?;
        }
        Ok(self.build_unchecked())
    }

    /// Builds the table without validation. Invalid parameters surface as
    /// errors on first use.
    #[must_use]
    pub const fn build_unchecked(self) -> SecurityLevels {
        SecurityLevels::new(self.interactive, self.moderate, self.sensitive)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::StrongboxError;

    #[test]
    fn test_default_is_standard() {
        assert_eq!(
            SecurityLevelsBuilder::new().build_unchecked(),
            SecurityLevels::standard()
        );
        assert_eq!(
            SecurityLevelsBuilder::default().build_unchecked(),
            SecurityLevels::standard()
        );
    }

    #[test]
    fn test_setters() -> StrongboxResult<()> {
        let fast = Argon2Params::new(256, 1, 1);
        let levels = SecurityLevelsBuilder::new()
            .interactive(fast)
            .moderate(fast)
            .level(SecurityLevel::Sensitive, fast)
            .try_build()?;
        for level in SecurityLevel::ALL {
            assert_eq!(levels.params(level), fast);
        }
        Ok(())
    }

    #[test]
    fn test_try_build_rejects_invalid() {
        let result = SecurityLevelsBuilder::new()
            .moderate(Argon2Params::new(8, 0, 1))
            .try_build();
        assert_eq!(result, Err(StrongboxError::CannotPerformOperation));
    }
}
