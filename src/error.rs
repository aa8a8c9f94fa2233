//! Error types for the classification core
//!
//! The pure classification modules surface typed errors via thiserror;
//! clients, repositories and the workflow wrap failures with anyhow context.

use std::fmt;

use thiserror::Error;

/// Measurement domain a unit tag is resolved against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitDomain {
    Mass,
    Time,
}

impl fmt::Display for UnitDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitDomain::Mass => write!(f, "mass"),
            UnitDomain::Time => write!(f, "time"),
        }
    }
}

/// Errors from the closed unit registries
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UnitError {
    #[error("unrecognized {domain} unit tag '{unit}'")]
    Unrecognized { domain: UnitDomain, unit: String },
}

impl UnitError {
    /// The offending tag, regardless of domain
    pub fn unit_tag(&self) -> &str {
        match self {
            UnitError::Unrecognized { unit, .. } => unit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_error_display_names_domain_and_tag() {
        let err = UnitError::Unrecognized {
            domain: UnitDomain::Mass,
            unit: "parsecs".to_string(),
        };
        assert_eq!(err.to_string(), "unrecognized mass unit tag 'parsecs'");
        assert_eq!(err.unit_tag(), "parsecs");
    }
}
