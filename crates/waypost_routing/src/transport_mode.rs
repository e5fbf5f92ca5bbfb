use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::ParseTransportModeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    Foot,
    Cycle,
    Car,
    Train,
    Horse,
}

impl TransportMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransportMode::Foot => "foot",
            TransportMode::Cycle => "cycle",
            TransportMode::Car => "car",
            TransportMode::Train => "train",
            TransportMode::Horse => "horse",
        }
    }

    /// Pedestrians may walk both ways along any way, whatever its oneway tag.
    pub fn ignores_oneway(&self) -> bool {
        matches!(self, TransportMode::Foot)
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransportMode {
    type Err = ParseTransportModeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "foot" => Ok(TransportMode::Foot),
            "cycle" => Ok(TransportMode::Cycle),
            "car" => Ok(TransportMode::Car),
            "train" => Ok(TransportMode::Train),
            "horse" => Ok(TransportMode::Horse),
            _ => Err(ParseTransportModeError(value.to_string())),
        }
    }
}
