//! Threshold and miner configuration
//!
//! Fractions are validated here, before any run starts. Absolute counts are
//! derived from them once the total utility of the loaded data is known.

use super::error::MiningError;
use super::transaction::Utility;

/// Validated threshold fractions
///
/// `min_utility` is the minimal average-utility threshold as a fraction of
/// the total utility; `pre_large`, when set, is a lower secondary fraction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdConfig {
    min_utility: f64,
    pre_large: Option<f64>,
}

impl ThresholdConfig {
    /// Create a threshold configuration
    ///
    /// # Errors
    ///
    /// Returns `InvalidThreshold` for fractions outside `[0, 1]` (NaN
    /// included) and `PreLargeExceedsMinimal` when the pre-large fraction is
    /// greater than the minimal one.
    pub fn new(min_utility: f64, pre_large: Option<f64>) -> Result<Self, MiningError> {
        if !(0.0..=1.0).contains(&min_utility) {
            return Err(MiningError::invalid_threshold("minimal utility", min_utility));
        }
        if let Some(pre_large) = pre_large {
            if !(0.0..=1.0).contains(&pre_large) {
                return Err(MiningError::invalid_threshold("pre-large", pre_large));
            }
            if pre_large > min_utility {
                return Err(MiningError::PreLargeExceedsMinimal {
                    pre_large,
                    min_utility,
                });
            }
        }
        Ok(ThresholdConfig {
            min_utility,
            pre_large,
        })
    }

    pub fn min_utility(&self) -> f64 {
        self.min_utility
    }

    pub fn pre_large(&self) -> Option<f64> {
        self.pre_large
    }

    /// Derive the absolute counts for a database of the given total utility
    pub fn derive(&self, total_utility: Utility) -> Thresholds {
        let total = total_utility as f64;
        let min_sup_count = total * self.min_utility;
        let pre_large_count = self.pre_large.map(|fraction| total * fraction);

        Thresholds {
            min_sup_count,
            pre_large_count,
            threshold_count: pre_large_count.unwrap_or(min_sup_count),
        }
    }
}

/// Absolute thresholds for one loaded database
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Thresholds {
    /// Minimal average utility of a high itemset
    pub min_sup_count: f64,
    /// Minimal average utility of a pre-large itemset, if configured
    pub pre_large_count: Option<f64>,
    /// Bound that upper-bound estimates are pruned against
    pub threshold_count: f64,
}

/// Classification of an exact average utility
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UtilityClass {
    High,
    PreLarge,
}

impl Thresholds {
    /// Classify an average utility, `None` when it falls below both thresholds
    pub fn classify(&self, average_utility: f64) -> Option<UtilityClass> {
        if average_utility >= self.min_sup_count {
            Some(UtilityClass::High)
        } else if self
            .pre_large_count
            .is_some_and(|count| average_utility >= count)
        {
            Some(UtilityClass::PreLarge)
        } else {
            None
        }
    }
}

/// Which upper bound decides the next level's qualifying set
///
/// The combined set that seeds future joins is always decided by the global
/// bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UpperBoundMode {
    /// Only the best item following the match may extend the itemset
    #[default]
    Lead,
    /// Every reserved item of the transaction may extend the itemset
    Global,
}

/// Complete configuration of a mining run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinerConfig {
    pub thresholds: ThresholdConfig,
    pub bound_mode: UpperBoundMode,
}

impl MinerConfig {
    /// Create a configuration with the default (lead) upper bound
    pub fn new(min_utility: f64, pre_large: Option<f64>) -> Result<Self, MiningError> {
        Ok(MinerConfig {
            thresholds: ThresholdConfig::new(min_utility, pre_large)?,
            bound_mode: UpperBoundMode::default(),
        })
    }

    pub fn with_bound_mode(mut self, bound_mode: UpperBoundMode) -> Self {
        self.bound_mode = bound_mode;
        self
    }
}
