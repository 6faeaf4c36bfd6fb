//! Per-user settings: jar allocation ratios and autonomy weights.

use serde::{Deserialize, Serialize};

use crate::autonomy::AutonomyWeights;

/// Percentages used to split income across the three jars.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JarAllocation {
    pub spend: f64,
    pub save: f64,
    pub share: f64,
}

impl Default for JarAllocation {
    fn default() -> Self {
        Self {
            spend: 60.0,
            save: 30.0,
            share: 10.0,
        }
    }
}

/// Result of splitting an income amount across jars.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JarSplit {
    pub spend: f64,
    pub save: f64,
    pub share: f64,
}

impl JarAllocation {
    /// Split `amount` by the allocation ratios, normalised by their sum.
    ///
    /// Negative ratios count as zero. If no ratio is positive the whole
    /// amount goes to the spend jar.
    pub fn split(&self, amount: f64) -> JarSplit {
        let clean = |r: f64| if r.is_finite() && r > 0.0 { r } else { 0.0 };
        let (spend, save, share) = (clean(self.spend), clean(self.save), clean(self.share));
        let total = spend + save + share;
        if total <= 0.0 {
            return JarSplit {
                spend: amount,
                save: 0.0,
                share: 0.0,
            };
        }
        JarSplit {
            spend: amount * spend / total,
            save: amount * save / total,
            share: amount * share / total,
        }
    }
}

/// Settings the host stores per user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct UserSettings {
    #[serde(default)]
    pub allocation: JarAllocation,
    #[serde(default)]
    pub weights: AutonomyWeights,
}
