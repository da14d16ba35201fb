//! Single-trade outcome calculation.
//!
//! Pure functions: a result category plus reward/percentage parameters in,
//! a signed profit/loss and its breakdown out. No bounds checking happens
//! here; the commands layer validates percentages and reward multiples
//! before calling in.

use crate::models::{Breakdown, Settings, TradeResult};

/// Result of an outcome calculation, ready to be appended to the ledger.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeOutcome {
    pub profit_loss: f64,
    pub breakdown: Breakdown,
}

/// Computes the signed profit/loss for a win/loss/break-even trade with a
/// first partial close and (for wins) a runner.
///
/// - `loss`: the full risk amount is lost.
/// - `be`: the first close banks `first_close_percent`% at
///   `first_close_rrr`, the remainder is a full loss of its share.
/// - `win`: both portions are profitable; the runner closes at
///   `runner_close_rrr`.
pub fn calculate_outcome(
    settings: &Settings,
    result: TradeResult,
    first_close_rrr: f64,
    first_close_percent: f64,
    runner_close_rrr: f64,
) -> TradeOutcome {
    let risk_amount = settings.risk_amount();

    match result {
        TradeResult::Loss => TradeOutcome {
            profit_loss: -risk_amount,
            breakdown: Breakdown::Loss { risk_amount },
        },
        TradeResult::Be => {
            let first_part = first_close_percent / 100.0 * risk_amount * first_close_rrr;
            let runner_part = -((100.0 - first_close_percent) / 100.0) * risk_amount;
            TradeOutcome {
                profit_loss: first_part + runner_part,
                breakdown: Breakdown::BreakEven {
                    first_part,
                    runner_part,
                    first_close_rrr,
                    first_close_percent,
                },
            }
        }
        TradeResult::Win => {
            let first_part = first_close_percent / 100.0 * risk_amount * first_close_rrr;
            let runner_part =
                (100.0 - first_close_percent) / 100.0 * risk_amount * runner_close_rrr;
            TradeOutcome {
                profit_loss: first_part + runner_part,
                breakdown: Breakdown::Win {
                    first_part,
                    runner_part,
                    first_close_rrr,
                    first_close_percent,
                    runner_close_rrr,
                },
            }
        }
    }
}

/// Manual mode: the operator enters the realized amount directly.
pub fn manual_outcome(amount: f64) -> TradeOutcome {
    TradeOutcome {
        profit_loss: amount,
        breakdown: Breakdown::ManualDirect { amount },
    }
}
