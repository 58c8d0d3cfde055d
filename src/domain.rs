use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::AtlasError;
use crate::metadata::Scalar;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Exact equality.
    #[default]
    Full,
    /// Substring containment of the lowercase, capitalized or uppercase
    /// form of the target. Other castings of a mixed-case value are not
    /// tried.
    Partial,
}

impl MatchMode {
    pub const ALLOWED: &'static str = "full, partial";
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchMode::Full => write!(f, "full"),
            MatchMode::Partial => write!(f, "partial"),
        }
    }
}

impl FromStr for MatchMode {
    type Err = AtlasError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "full" => Ok(MatchMode::Full),
            "partial" => Ok(MatchMode::Partial),
            _ => Err(AtlasError::InvalidArgument {
                kind: "match mode",
                value: value.to_string(),
                allowed: Self::ALLOWED,
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CombineMode {
    #[default]
    Union,
    Intersection,
}

impl CombineMode {
    pub const ALLOWED: &'static str = "intersection, union";
}

impl fmt::Display for CombineMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CombineMode::Union => write!(f, "union"),
            CombineMode::Intersection => write!(f, "intersection"),
        }
    }
}

impl FromStr for CombineMode {
    type Err = AtlasError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "union" => Ok(CombineMode::Union),
            "intersection" => Ok(CombineMode::Intersection),
            _ => Err(AtlasError::InvalidArgument {
                kind: "combine mode",
                value: value.to_string(),
                allowed: Self::ALLOWED,
            }),
        }
    }
}

/// `field=value` as written on the command line or as a config shorthand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClauseSpecifier {
    pub field: String,
    pub value: Scalar,
}

impl FromStr for ClauseSpecifier {
    type Err = AtlasError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (field, rest) = value
            .split_once('=')
            .ok_or_else(|| AtlasError::InvalidClause(value.to_string()))?;
        let field = field.trim();
        if field.is_empty() {
            return Err(AtlasError::InvalidClause(value.to_string()));
        }
        Ok(Self {
            field: field.to_string(),
            value: Scalar::parse_lenient(rest.trim()),
        })
    }
}
