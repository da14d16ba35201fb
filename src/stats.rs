//! Performance aggregation over the trade ledger.
//!
//! Every function here is a pure fold over `(&Settings, &[Trade])`
//! snapshots. Callers pass `now` where a time window is involved, so the
//! whole module is deterministic under test.

use chrono::{DateTime, Datelike, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Settings, Trade, TradeResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_trades: i32,
    pub wins: i32,
    pub losses: i32,
    pub breakevens: i32,
    pub win_rate: f64,
    pub current_balance: f64,
    pub net_profit: f64,
    pub avg_reward_multiple: f64,
    /// Reported as a negative percentage (0 = no drawdown).
    pub max_drawdown: f64,
    pub growth_percentage: f64,
    pub progress_toward_target: f64,
}

/// Time window for period-over-period growth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Period {
    Day,
    Week,
    Month,
    ThreeMonths,
    YearToDate,
    All,
}

impl Period {
    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Day => "1d",
            Period::Week => "1w",
            Period::Month => "1m",
            Period::ThreeMonths => "3m",
            Period::YearToDate => "ytd",
            Period::All => "all",
        }
    }

    pub fn parse(s: &str) -> Option<Period> {
        match s {
            "1d" => Some(Period::Day),
            "1w" => Some(Period::Week),
            "1m" => Some(Period::Month),
            "3m" => Some(Period::ThreeMonths),
            "ytd" => Some(Period::YearToDate),
            "all" => Some(Period::All),
            _ => None,
        }
    }
}

/// Trades ordered by creation time. Insertion order is not guaranteed to
/// be chronological (deletions and re-entries), so everything that folds
/// a running balance sorts first. Ties break on id, whose millisecond
/// prefix preserves creation order within a second.
fn chronological(trades: &[Trade]) -> Vec<&Trade> {
    let mut sorted: Vec<&Trade> = trades.iter().collect();
    sorted.sort_by(|a, b| {
        a.timestamp
            .cmp(&b.timestamp)
            .then_with(|| a.id.cmp(&b.id))
    });
    sorted
}

/// Order-independent: initial capital plus the sum of all realized
/// profit/loss values.
pub fn current_balance(settings: &Settings, trades: &[Trade]) -> f64 {
    settings.initial_capital + trades.iter().map(|t| t.profit_loss).sum::<f64>()
}

pub fn net_profit(settings: &Settings, trades: &[Trade]) -> f64 {
    current_balance(settings, trades) - settings.initial_capital
}

/// Running balance in chronological order: one point per trade plus the
/// starting capital. Length is always `trades.len() + 1`.
pub fn balance_history(settings: &Settings, trades: &[Trade]) -> Vec<f64> {
    let mut history = Vec::with_capacity(trades.len() + 1);
    let mut balance = settings.initial_capital;
    history.push(balance);
    for trade in chronological(trades) {
        balance += trade.profit_loss;
        history.push(balance);
    }
    history
}

pub fn win_rate(trades: &[Trade]) -> f64 {
    if trades.is_empty() {
        return 0.0;
    }
    let wins = trades
        .iter()
        .filter(|t| t.result == TradeResult::Win)
        .count();
    wins as f64 / trades.len() as f64 * 100.0
}

/// Mean realized runner multiple over winning trades. Wins whose breakdown
/// records no runner multiple fall back to the legacy `r_multiple` field;
/// wins with neither are excluded from numerator and denominator.
pub fn average_reward_multiple(trades: &[Trade]) -> f64 {
    let multiples: Vec<f64> = trades
        .iter()
        .filter(|t| t.result == TradeResult::Win)
        .filter_map(|t| t.breakdown.runner_multiple().or(t.r_multiple))
        .collect();
    if multiples.is_empty() {
        return 0.0;
    }
    multiples.iter().sum::<f64>() / multiples.len() as f64
}

/// Maximum peak-to-point decline over a balance sequence, as a negative
/// percentage (0 when the sequence never declines). Points where the
/// running peak is not strictly positive are skipped rather than divided
/// by, so a balance crossing zero degrades gracefully.
pub fn max_drawdown(history: &[f64]) -> f64 {
    let mut peak = f64::NEG_INFINITY;
    let mut max_dd = 0.0_f64;
    for &balance in history {
        if balance > peak {
            peak = balance;
        }
        if peak > 0.0 {
            let dd = (peak - balance) / peak * 100.0;
            if dd > max_dd {
                max_dd = dd;
            }
        }
    }
    -max_dd
}

pub fn growth_percentage(settings: &Settings, trades: &[Trade]) -> f64 {
    net_profit(settings, trades) / settings.initial_capital * 100.0
}

/// Share of the growth target reached, clamped to 100 at the top only;
/// negative growth reports negative progress.
pub fn progress_toward_target(settings: &Settings, trades: &[Trade]) -> f64 {
    if settings.target_growth <= 0.0 {
        return 0.0;
    }
    let progress = growth_percentage(settings, trades) / settings.target_growth * 100.0;
    progress.min(100.0)
}

/// Percentage balance change over the given window ending at `now`.
///
/// The starting balance is the balance just before the window opens
/// (trades strictly before the window start). Returns 0 when the ledger
/// is empty, when no trade falls at-or-after the window start, or when
/// the starting balance is not strictly positive.
pub fn period_growth(
    settings: &Settings,
    trades: &[Trade],
    period: Period,
    now: DateTime<Utc>,
) -> f64 {
    if trades.is_empty() {
        return 0.0;
    }

    let window_start = match period {
        Period::Day => now - Duration::days(1),
        Period::Week => now - Duration::days(7),
        Period::Month => now - Duration::days(30),
        Period::ThreeMonths => now - Duration::days(90),
        Period::YearToDate => match Utc.with_ymd_and_hms(now.year(), 1, 1, 0, 0, 0).single() {
            Some(start) => start,
            None => return 0.0,
        },
        Period::All => {
            let first = trades.iter().map(|t| t.timestamp).min().unwrap_or(0);
            match Utc.timestamp_opt(first, 0).single() {
                Some(start) => start,
                None => return 0.0,
            }
        }
    };
    let window_start = window_start.timestamp();

    if !trades.iter().any(|t| t.timestamp >= window_start) {
        return 0.0;
    }

    let starting_balance = settings.initial_capital
        + trades
            .iter()
            .filter(|t| t.timestamp < window_start)
            .map(|t| t.profit_loss)
            .sum::<f64>();
    if starting_balance <= 0.0 {
        return 0.0;
    }

    (current_balance(settings, trades) - starting_balance) / starting_balance * 100.0
}

pub fn dashboard_stats(settings: &Settings, trades: &[Trade]) -> DashboardStats {
    let wins = trades
        .iter()
        .filter(|t| t.result == TradeResult::Win)
        .count() as i32;
    let losses = trades
        .iter()
        .filter(|t| t.result == TradeResult::Loss)
        .count() as i32;
    let breakevens = trades
        .iter()
        .filter(|t| t.result == TradeResult::Be)
        .count() as i32;

    DashboardStats {
        total_trades: trades.len() as i32,
        wins,
        losses,
        breakevens,
        win_rate: win_rate(trades),
        current_balance: current_balance(settings, trades),
        net_profit: net_profit(settings, trades),
        avg_reward_multiple: average_reward_multiple(trades),
        max_drawdown: max_drawdown(&balance_history(settings, trades)),
        growth_percentage: growth_percentage(settings, trades),
        progress_toward_target: progress_toward_target(settings, trades),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Breakdown;

    fn settings() -> Settings {
        Settings {
            id: 1,
            initial_capital: 10000.0,
            risk_per_trade: 0.5,
            target_growth: 10.0,
            manual_mode: false,
            created_at: 0,
            updated_at: 0,
        }
    }

    fn trade(id: &str, timestamp: i64, result: TradeResult, profit_loss: f64) -> Trade {
        Trade {
            id: id.to_string(),
            timestamp,
            pair: "unknown".to_string(),
            result,
            profit_loss,
            risk_amount: 50.0,
            breakdown: Breakdown::ManualDirect {
                amount: profit_loss,
            },
            r_multiple: None,
            notes: String::new(),
        }
    }

    #[test]
    fn test_empty_ledger_defaults() {
        let s = settings();
        let stats = dashboard_stats(&s, &[]);
        assert_eq!(stats.total_trades, 0);
        assert_eq!(stats.win_rate, 0.0);
        assert_eq!(stats.current_balance, 10000.0);
        assert_eq!(stats.net_profit, 0.0);
        assert_eq!(stats.avg_reward_multiple, 0.0);
        assert_eq!(stats.max_drawdown, 0.0);
        assert_eq!(stats.progress_toward_target, 0.0);
        assert_eq!(balance_history(&s, &[]), vec![10000.0]);
    }

    #[test]
    fn test_current_balance_is_order_independent() {
        let s = settings();
        let mut trades = vec![
            trade("TRADE-3", 300, TradeResult::Win, 50.0),
            trade("TRADE-1", 100, TradeResult::Win, 100.0),
            trade("TRADE-2", 200, TradeResult::Loss, -250.0),
        ];
        let balance = current_balance(&s, &trades);
        trades.reverse();
        assert_eq!(current_balance(&s, &trades), balance);
        assert_eq!(balance, 9900.0);
    }

    #[test]
    fn test_balance_history_resorts_chronologically() {
        let s = settings();
        // Inserted out of order on purpose
        let trades = vec![
            trade("TRADE-3", 300, TradeResult::Win, 50.0),
            trade("TRADE-1", 100, TradeResult::Win, 100.0),
            trade("TRADE-2", 200, TradeResult::Loss, -250.0),
        ];
        assert_eq!(
            balance_history(&s, &trades),
            vec![10000.0, 10100.0, 9850.0, 9900.0]
        );
    }

    #[test]
    fn test_balance_history_length_and_start() {
        let s = settings();
        let trades = vec![
            trade("TRADE-1", 100, TradeResult::Win, 100.0),
            trade("TRADE-2", 200, TradeResult::Loss, -50.0),
        ];
        let history = balance_history(&s, &trades);
        assert_eq!(history.len(), trades.len() + 1);
        assert_eq!(history[0], s.initial_capital);
    }

    #[test]
    fn test_max_drawdown_peak_tracking() {
        // Peak 10100, trough 9850
        let history = vec![10000.0, 10100.0, 9850.0, 9900.0];
        let dd = max_drawdown(&history);
        let expected = -((10100.0 - 9850.0) / 10100.0 * 100.0);
        assert!((dd - expected).abs() < 1e-9);
    }

    #[test]
    fn test_max_drawdown_zero_when_non_decreasing() {
        assert_eq!(max_drawdown(&[10000.0, 10050.0, 10200.0]), 0.0);
        assert_eq!(max_drawdown(&[]), 0.0);
    }

    #[test]
    fn test_max_drawdown_is_never_positive() {
        let history = vec![100.0, 250.0, 50.0, 300.0, 120.0];
        assert!(max_drawdown(&history) <= 0.0);
    }

    #[test]
    fn test_max_drawdown_skips_non_positive_peaks() {
        // Balance dives through zero; the walk must not divide by it
        let history = vec![-50.0, -20.0, 100.0, 80.0];
        let dd = max_drawdown(&history);
        assert!(dd.is_finite());
        let expected = -((100.0 - 80.0) / 100.0 * 100.0);
        assert!((dd - expected).abs() < 1e-9);
    }

    #[test]
    fn test_win_rate() {
        let trades = vec![
            trade("TRADE-1", 100, TradeResult::Win, 100.0),
            trade("TRADE-2", 200, TradeResult::Loss, -50.0),
            trade("TRADE-3", 300, TradeResult::Be, 0.0),
            trade("TRADE-4", 400, TradeResult::Win, 75.0),
        ];
        assert_eq!(win_rate(&trades), 50.0);
    }

    #[test]
    fn test_average_reward_multiple_reads_breakdowns() {
        let mut t1 = trade("TRADE-1", 100, TradeResult::Win, 125.0);
        t1.breakdown = Breakdown::Win {
            first_part: 50.0,
            runner_part: 75.0,
            first_close_rrr: 2.0,
            first_close_percent: 50.0,
            runner_close_rrr: 3.0,
        };
        // Legacy row: no runner in the breakdown, r_multiple column set
        let mut t2 = trade("TRADE-2", 200, TradeResult::Win, 50.0);
        t2.r_multiple = Some(1.0);
        // Win with no parsable multiple at all: excluded entirely
        let t3 = trade("TRADE-3", 300, TradeResult::Win, 80.0);
        // Losses never contribute
        let t4 = trade("TRADE-4", 400, TradeResult::Loss, -50.0);

        assert_eq!(average_reward_multiple(&[t1, t2, t3, t4]), 2.0);
    }

    #[test]
    fn test_average_reward_multiple_empty() {
        assert_eq!(average_reward_multiple(&[]), 0.0);
        let loss = trade("TRADE-1", 100, TradeResult::Loss, -50.0);
        assert_eq!(average_reward_multiple(&[loss]), 0.0);
    }

    #[test]
    fn test_growth_and_progress() {
        let s = settings();
        let trades = vec![trade("TRADE-1", 100, TradeResult::Win, 500.0)];
        assert_eq!(growth_percentage(&s, &trades), 5.0);
        // 5% of a 10% target
        assert_eq!(progress_toward_target(&s, &trades), 50.0);
    }

    #[test]
    fn test_progress_clamps_upper_bound_only() {
        let s = settings();
        let over = vec![trade("TRADE-1", 100, TradeResult::Win, 2000.0)];
        assert_eq!(progress_toward_target(&s, &over), 100.0);

        let under = vec![trade("TRADE-1", 100, TradeResult::Loss, -500.0)];
        assert_eq!(progress_toward_target(&s, &under), -50.0);
    }

    #[test]
    fn test_period_parse_round_trip() {
        for period in [
            Period::Day,
            Period::Week,
            Period::Month,
            Period::ThreeMonths,
            Period::YearToDate,
            Period::All,
        ] {
            assert_eq!(Period::parse(period.as_str()), Some(period));
        }
        assert_eq!(Period::parse("6m"), None);
    }

    #[test]
    fn test_period_growth_windows_partition_trades() {
        let s = settings();
        let now = Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap();
        let day = 86400;
        let trades = vec![
            // 40 days ago: outside the 1m window
            trade("TRADE-1", now.timestamp() - 40 * day, TradeResult::Win, 1000.0),
            // 5 days ago: inside
            trade("TRADE-2", now.timestamp() - 5 * day, TradeResult::Loss, -500.0),
        ];

        // 1m window: starting balance 11000, current 10500
        let growth = period_growth(&s, &trades, Period::Month, now);
        let expected = (10500.0 - 11000.0) / 11000.0 * 100.0;
        assert!((growth - expected).abs() < 1e-9);

        // all: starting balance is the initial capital
        let growth_all = period_growth(&s, &trades, Period::All, now);
        assert!((growth_all - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_period_growth_trade_at_window_start_counts() {
        let s = settings();
        let now = Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap();
        let at_start = trade(
            "TRADE-1",
            (now - Duration::days(1)).timestamp(),
            TradeResult::Win,
            100.0,
        );
        assert!(period_growth(&s, &[at_start], Period::Day, now) > 0.0);
    }

    #[test]
    fn test_period_growth_no_trades_in_window() {
        let s = settings();
        let now = Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap();
        let old = trade(
            "TRADE-1",
            (now - Duration::days(300)).timestamp(),
            TradeResult::Win,
            100.0,
        );
        assert_eq!(period_growth(&s, &[old.clone()], Period::Day, now), 0.0);
        assert_eq!(period_growth(&s, &[], Period::All, now), 0.0);
        // but the same trade is inside the all-time window
        assert!(period_growth(&s, &[old], Period::All, now) > 0.0);
    }

    #[test]
    fn test_period_growth_ytd_window() {
        let s = settings();
        let now = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
        let last_year = Utc.with_ymd_and_hms(2024, 12, 20, 0, 0, 0).unwrap();
        let this_year = Utc.with_ymd_and_hms(2025, 1, 10, 0, 0, 0).unwrap();
        let trades = vec![
            trade("TRADE-1", last_year.timestamp(), TradeResult::Win, 1000.0),
            trade("TRADE-2", this_year.timestamp(), TradeResult::Win, 550.0),
        ];
        // Starting balance 11000 at Jan 1; +550 since
        let growth = period_growth(&s, &trades, Period::YearToDate, now);
        assert!((growth - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_period_growth_guards_non_positive_starting_balance() {
        let s = settings();
        let now = Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap();
        let trades = vec![
            // Wipes out the account before the window
            trade(
                "TRADE-1",
                (now - Duration::days(60)).timestamp(),
                TradeResult::Loss,
                -10000.0,
            ),
            trade(
                "TRADE-2",
                (now - Duration::days(2)).timestamp(),
                TradeResult::Win,
                100.0,
            ),
        ];
        assert_eq!(period_growth(&s, &trades, Period::Month, now), 0.0);
    }
}
