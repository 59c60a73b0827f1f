use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Named quality bucket an image download is filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    FourK,
    TwoK,
    Fhd,
    Default,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::FourK => "4K",
            Tier::TwoK => "2K",
            Tier::Fhd => "FHD",
            Tier::Default => "default",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps the width token embedded in a resolution link to its tier.
///
/// Tokens are compared as strings, so `"03840"` is not `4K`.
pub fn classify(width_token: &str) -> Tier {
    match width_token {
        "3840" => Tier::FourK,
        "2560" => Tier::TwoK,
        "1920" => Tier::Fhd,
        _ => Tier::Default,
    }
}

/// Which tiers a run should save.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    All,
    Only(Tier),
}

impl Resolution {
    pub fn wants(&self, tier: Tier) -> bool {
        match self {
            Resolution::All => true,
            Resolution::Only(only) => *only == tier,
        }
    }
}

impl Default for Resolution {
    fn default() -> Self {
        Resolution::Only(Tier::Fhd)
    }
}

impl FromStr for Resolution {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Resolution::All),
            "4k" => Ok(Resolution::Only(Tier::FourK)),
            "2k" => Ok(Resolution::Only(Tier::TwoK)),
            "fhd" => Ok(Resolution::Only(Tier::Fhd)),
            _ => Err(Error::InvalidResolution(s.to_string())),
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resolution::All => f.write_str("all"),
            Resolution::Only(tier) => tier.fmt(f),
        }
    }
}
