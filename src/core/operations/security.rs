//! Password hashing security levels.
//!
//! Levels are labels; the Argon2id cost parameters behind them live in an
//! immutable [`SecurityLevels`] table. [`STANDARD_LEVELS`] holds the
//! standard table and is what [`Password::new`](super::password::Password::new)
//! and the key factory use.

use core::fmt::{self, Display};
use core::str::FromStr;

use argon2::{Algorithm, Argon2, ParamsBuilder, Version};

use crate::core::error::{StrongboxError, StrongboxResult};

/// A named password hashing cost.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum SecurityLevel {
    /// Suitable for interactive logins.
    #[default]
    Interactive,
    /// Balanced cost.
    Moderate,
    /// High cost, for rarely-used secrets.
    Sensitive,
}

impl SecurityLevel {
    /// All levels, cheapest first.
    pub const ALL: [Self; 3] = [Self::Interactive, Self::Moderate, Self::Sensitive];

    /// The lowercase label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Interactive => "interactive",
            Self::Moderate => "moderate",
            Self::Sensitive => "sensitive",
        }
    }
}

impl Display for SecurityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SecurityLevel {
    type Err = StrongboxError;

    fn from_str(label: &str) -> Result<Self, Self::Err> {
        match label {
            "interactive" => Ok(Self::Interactive),
            "moderate" => Ok(Self::Moderate),
            "sensitive" => Ok(Self::Sensitive),
            other => Err(StrongboxError::InvalidSecurityLevel(other.to_string())),
        }
    }
}

/// Argon2id cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Argon2Params {
    /// Memory cost in KiB.
    pub memory_kib: u32,
    /// Number of iterations.
    pub iterations: u32,
    /// Degree of parallelism.
    pub parallelism: u32,
}

impl Argon2Params {
    /// Creates a parameter set.
    #[must_use]
    pub const fn new(memory_kib: u32, iterations: u32, parallelism: u32) -> Self {
        Self {
            memory_kib,
            iterations,
            parallelism,
        }
    }

    /// The PHC string prefix a hash made with these parameters starts with,
    /// e.g. `$argon2id$v=19$m=65536,t=2,p=1$`.
    #[must_use]
    pub fn phc_prefix(&self) -> String {
        format!(
            "$argon2id$v=19$m={},t={},p={}$",
            self.memory_kib, self.iterations, self.parallelism
        )
    }

    /// Builds an Argon2id hasher.
    ///
    /// # Errors
    ///
    /// Returns `StrongboxError::CannotPerformOperation` if the parameters
    /// are out of range for Argon2.
    pub fn hasher(&self, output_len: Option<usize>) -> StrongboxResult<Argon2<'static>> {
        let mut builder = ParamsBuilder::new();
        builder
            .m_cost(self.memory_kib)
            .t_cost(self.iterations)
            .p_cost(self.parallelism);
        if let Some(len) = output_len {
            builder.output_len(len);
        }
        let params = builder
            .build()
            .map_err(|_| StrongboxError::CannotPerformOperation)?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}

/// Immutable mapping from [`SecurityLevel`] to [`Argon2Params`].
///
/// # Example
///
/// ```rust
/// use strongbox::core::operations::security::{SecurityLevel, STANDARD_LEVELS};
///
/// let params = STANDARD_LEVELS.params(SecurityLevel::Interactive);
/// assert_eq!(params.phc_prefix(), "$argon2id$v=19$m=65536,t=2,p=1$");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SecurityLevels {
    interactive: Argon2Params,
    moderate: Argon2Params,
    sensitive: Argon2Params,
}

impl SecurityLevels {
    /// The standard table.
    /// - Interactive: 64 MiB, 2 iterations, parallelism 1
    /// - Moderate: 256 MiB, 3 iterations, parallelism 1
    /// - Sensitive: 1 GiB, 4 iterations, parallelism 1
    #[must_use]
    pub const fn standard() -> Self {
        Self {
            interactive: Argon2Params::new(64 * 1024, 2, 1),
            moderate: Argon2Params::new(256 * 1024, 3, 1),
            sensitive: Argon2Params::new(1024 * 1024, 4, 1),
        }
    }

    /// A custom table.
    #[must_use]
    pub const fn new(
        interactive: Argon2Params,
        moderate: Argon2Params,
        sensitive: Argon2Params,
    ) -> Self {
        Self {
            interactive,
            moderate,
            sensitive,
        }
    }

    /// Parameters for `level`.
    #[must_use]
    pub const fn params(&self, level: SecurityLevel) -> Argon2Params {
        match level {
            SecurityLevel::Interactive => self.interactive,
            SecurityLevel::Moderate => self.moderate,
            SecurityLevel::Sensitive => self.sensitive,
        }
    }
}

impl Default for SecurityLevels {
    fn default() -> Self {
        Self::standard()
    }
}

/// The process-wide standard table.
pub static STANDARD_LEVELS: SecurityLevels = SecurityLevels::standard();
