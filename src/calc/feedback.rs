//! Qualitative feedback on a single trade, derived from its realized
//! reward multiple. Display-only; tier boundaries are the contract, the
//! labels are free to change.

use serde::{Deserialize, Serialize};

use crate::models::{Settings, Trade, TradeResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackTier {
    /// Win at 3R or better.
    Outstanding,
    /// Win at 2R or better.
    Strong,
    /// Any other win.
    Solid,
    /// Break-even that netted zero or better.
    EvenOrBetter,
    /// Break-even that netted slightly negative.
    Even,
    /// Loss.
    Stopped,
}

impl FeedbackTier {
    pub fn label(&self) -> &'static str {
        match self {
            FeedbackTier::Outstanding => "Outstanding trade",
            FeedbackTier::Strong => "Strong winner",
            FeedbackTier::Solid => "Solid win",
            FeedbackTier::EvenOrBetter => "Scratched for even or better",
            FeedbackTier::Even => "Scratched",
            FeedbackTier::Stopped => "Stopped out",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    pub tier: FeedbackTier,
    pub r_multiple: f64,
}

/// Classifies a trade by its realized reward multiple.
///
/// Uses the risk amount snapshotted on the trade; rows imported without a
/// usable snapshot fall back to the current settings.
pub fn classify(trade: &Trade, settings: &Settings) -> Feedback {
    let risk_amount = if trade.risk_amount > 0.0 {
        trade.risk_amount
    } else {
        settings.risk_amount()
    };
    let r_multiple = if risk_amount > 0.0 {
        trade.profit_loss / risk_amount
    } else {
        0.0
    };

    let tier = match trade.result {
        TradeResult::Win => {
            if r_multiple >= 3.0 {
                FeedbackTier::Outstanding
            } else if r_multiple >= 2.0 {
                FeedbackTier::Strong
            } else {
                FeedbackTier::Solid
            }
        }
        TradeResult::Be => {
            if r_multiple >= 0.0 {
                FeedbackTier::EvenOrBetter
            } else {
                FeedbackTier::Even
            }
        }
        TradeResult::Loss => FeedbackTier::Stopped,
    };

    Feedback { tier, r_multiple }
}
