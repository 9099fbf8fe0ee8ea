//! # Supported Assets
//!
//! Escrows lock exactly one asset from a small closed set. The token names
//! are case-sensitive; `HIVE` is not `hive`.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// An asset that can be locked in an escrow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Asset {
    /// The native HIVE token.
    Hive,
    /// The HBD stable token.
    Hbd,
}

impl Asset {
    /// Every asset variant.
    pub const ALL: [Asset; 2] = [Asset::Hive, Asset::Hbd];

    /// The canonical token name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hive => "hive",
            Self::Hbd => "hbd",
        }
    }
}

impl std::fmt::Display for Asset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Asset {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hive" => Ok(Self::Hive),
            "hbd" => Ok(Self::Hbd),
            other => Err(ValidationError::UnsupportedAsset(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_tokens() {
        assert_eq!("hive".parse::<Asset>().unwrap(), Asset::Hive);
        assert_eq!("hbd".parse::<Asset>().unwrap(), Asset::Hbd);
    }

    #[test]
    fn token_names_are_case_sensitive() {
        assert!("HIVE".parse::<Asset>().is_err());
        assert!("Hbd".parse::<Asset>().is_err());
        assert!("btc".parse::<Asset>().is_err());
    }

    #[test]
    fn as_str_matches_serde() {
        for asset in Asset::ALL {
            let json = serde_json::to_string(&asset).unwrap();
            assert_eq!(json, format!("\"{}\"", asset.as_str()));
        }
    }
}
