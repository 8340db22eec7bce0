//! Registration pricing.
//!
//! The registry contract charges by name length. The table lives here,
//! versioned, so the view layer never carries amounts of its own.

use alloy_primitives::U256;
use alloy_primitives::utils::format_ether;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 0.1 of the native token, in wei.
const DECI: u128 = 100_000_000_000_000_000;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PricingError {
    #[error("domain is empty")]
    EmptyDomain,
    #[error("domain must be at least {min} characters long (got {len})")]
    TooShort { len: usize, min: usize },
    #[error("no price tier covers a {len}-character domain")]
    NoTier { len: usize },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LengthBand {
    Exactly(usize),
    AtLeast(usize),
}

impl LengthBand {
    fn contains(self, len: usize) -> bool {
        match self {
            Self::Exactly(n) => len == n,
            Self::AtLeast(n) => len >= n,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PriceTier {
    pub band: LengthBand,
    pub price_wei: U256,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PricingPolicy {
    pub version: u32,
    pub min_length: usize,
    /// Checked in order; the first matching band wins.
    pub tiers: Vec<PriceTier>,
}

impl PricingPolicy {
    /// Version 1: 3 chars 0.5, 4 chars 0.3, 5 or more 0.1.
    pub fn v1() -> Self {
        Self {
            version: 1,
            min_length: 3,
            tiers: vec![
                PriceTier {
                    band: LengthBand::Exactly(3),
                    price_wei: U256::from(5 * DECI),
                },
                PriceTier {
                    band: LengthBand::Exactly(4),
                    price_wei: U256::from(3 * DECI),
                },
                PriceTier {
                    band: LengthBand::AtLeast(5),
                    price_wei: U256::from(DECI),
                },
            ],
        }
    }

    pub fn for_version(version: u32) -> Option<Self> {
        match version {
            1 => Some(Self::v1()),
            _ => None,
        }
    }

    /// Length as the contract counts it: Unicode scalar values.
    pub fn name_length(domain: &str) -> usize {
        domain.chars().count()
    }

    pub fn validate(&self, domain: &str) -> Result<usize, PricingError> {
        if domain.is_empty() {
            return Err(PricingError::EmptyDomain);
        }
        let len = Self::name_length(domain);
        if len < self.min_length {
            return Err(PricingError::TooShort {
                len,
                min: self.min_length,
            });
        }
        Ok(len)
    }

    pub fn price_for(&self, domain: &str) -> Result<U256, PricingError> {
        let len = self.validate(domain)?;
        self.tiers
            .iter()
            .find(|tier| tier.band.contains(len))
            .map(|tier| tier.price_wei)
            .ok_or(PricingError::NoTier { len })
    }
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self::v1()
    }
}

/// Human form of a wei amount, e.g. `0.500000000000000000`.
pub fn display_price(price_wei: U256) -> String {
    format_ether(price_wei)
}
