//! Container configuration.
//!
//! Configuration is read once when a container is created and copied into
//! every scope clone. Values come from code, from the environment
//! (`HEMLOCK_DI_AMBIGUITY`, `HEMLOCK_DI_TRACE`) or, with the `config` feature,
//! from JSON.

use std::env;
use std::str::FromStr;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

use crate::{DiError, DiResult};

/// Environment variable selecting the [`AmbiguityPolicy`].
pub const AMBIGUITY_ENV: &str = "HEMLOCK_DI_AMBIGUITY";
/// Environment variable enabling resolution tracing.
pub const TRACE_ENV: &str = "HEMLOCK_DI_TRACE";

/// What to do when several registrations satisfy a capability request with
/// the same (smallest) operation count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(rename_all = "lowercase"))]
pub enum AmbiguityPolicy {
    /// Keep the narrowest candidate; on an exact tie the later registration wins.
    #[default]
    Narrowest,
    /// Fail the resolution with [`DiError::Ambiguous`] on an exact tie.
    Reject,
}

impl FromStr for AmbiguityPolicy {
    type Err = DiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "narrowest" => Ok(AmbiguityPolicy::Narrowest),
            "reject" => Ok(AmbiguityPolicy::Reject),
            _ => Err(DiError::TypeMismatch("ambiguity policy must be `narrowest` or `reject`")),
        }
    }
}

/// Container configuration.
///
/// # Examples
///
/// ```
/// use hemlock_di::{AmbiguityPolicy, Container, ContainerConfig};
///
/// let config = ContainerConfig::default()
///     .ambiguity(AmbiguityPolicy::Reject)
///     .trace_resolutions(false);
///
/// let container = Container::with_config(Default::default(), config);
/// assert_eq!(container.config().ambiguity, AmbiguityPolicy::Reject);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct ContainerConfig {
    /// Tie-break behavior for capability requests
    pub ambiguity: AmbiguityPolicy,
    /// Install a [`LoggingObserver`](crate::LoggingObserver) on creation
    pub trace_resolutions: bool,
}

impl ContainerConfig {
    pub fn ambiguity(mut self, policy: AmbiguityPolicy) -> Self {
        self.ambiguity = policy;
        self
    }

    pub fn trace_resolutions(mut self, enabled: bool) -> Self {
        self.trace_resolutions = enabled;
        self
    }

    /// Reads configuration from the environment, falling back to defaults for
    /// unset variables.
    pub fn from_env() -> DiResult<Self> {
        let mut config = Self::default();
        if let Ok(value) = env::var(AMBIGUITY_ENV) {
            config.ambiguity = value.parse()?;
        }
        if let Ok(value) = env::var(TRACE_ENV) {
            config.trace_resolutions = parse_flag(&value)?;
        }
        Ok(config)
    }

    #[cfg(feature = "config")]
    pub fn from_json(json: &str) -> DiResult<Self> {
        serde_json::from_str(json)
            .map_err(|_| DiError::TypeMismatch("container config is not valid JSON"))
    }

    #[cfg(feature = "config")]
    pub fn to_json(&self) -> DiResult<String> {
        serde_json::to_string(self)
            .map_err(|_| DiError::TypeMismatch("container config could not be serialized"))
    }
}

fn parse_flag(value: &str) -> DiResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(DiError::TypeMismatch("flag must be true or false")),
    }
}
