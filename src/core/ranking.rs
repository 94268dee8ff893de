//! Guild win-rate ranking.
//!
//! Rows come from the relational store; this module only orders and formats them
//! for the `/ranking` embed.

use sea_orm::FromQueryResult;
use std::cmp::Ordering;
use std::fmt::Write;

/// Maximum number of players shown in a ranking.
pub const RANKING_LIMIT: u64 = 10;

/// Aggregated results of one player in one guild.
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult)]
pub struct RankingRow {
    /// Platform user id
    pub user_id: i64,
    /// Games won
    pub wins: i64,
    /// Games played
    pub games: i64,
}

impl RankingRow {
    /// Win rate in percent; zero when no games were played.
    #[must_use]
    #[allow(clippy::cast_precision_loss)] // game counts are far below 2^52
    pub fn win_rate(&self) -> f64 {
        if self.games <= 0 {
            return 0.0;
        }
        self.wins as f64 / self.games as f64 * 100.0
    }
}

/// Sorts rows by win rate, then games played, then user id.
pub fn rank(rows: &mut [RankingRow]) {
    rows.sort_by(|a, b| {
        b.win_rate()
            .partial_cmp(&a.win_rate())
            .unwrap_or(Ordering::Equal)
            .then_with(|| b.games.cmp(&a.games))
            .then_with(|| a.user_id.cmp(&b.user_id))
    });
}

/// Renders ranked rows as numbered lines, e.g. `1. <@42> 75.0% (3/4)`.
#[must_use]
pub fn format_ranking(rows: &[RankingRow]) -> String {
    let mut out = String::new();
    for (position, row) in rows.iter().enumerate() {
        let _ = writeln!(
            out,
            "{}. <@{}> {:.1}% ({}/{})",
            position + 1,
            row.user_id,
            row.win_rate(),
            row.wins,
            row.games
        );
    }
    out
}
