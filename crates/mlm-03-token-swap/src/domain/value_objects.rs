//! Value objects for the Token Swap subsystem

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a per-token swap attempt failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwapStage {
    GetPrice,
    Swap,
}

impl SwapStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            SwapStage::GetPrice => "get_price",
            SwapStage::Swap => "swap",
        }
    }
}

impl fmt::Display for SwapStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_names() {
        assert_eq!(SwapStage::GetPrice.to_string(), "get_price");
        assert_eq!(SwapStage::Swap.to_string(), "swap");
        assert_eq!(serde_json::to_string(&SwapStage::GetPrice).unwrap(), "\"get_price\"");
    }
}
