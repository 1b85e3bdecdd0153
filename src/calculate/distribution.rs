//! Rank histogram summaries.

use crate::format::rank_string;
use crate::models::{PlayerCount, RankDistributionSummary};

/// Summarize a histogram where index = rank and value = player count.
///
/// `mean_rank` is NaN for an empty or all-zero histogram; callers must
/// treat that as "unavailable".
pub fn summarize_rank_distribution(histogram: &[u64]) -> RankDistributionSummary {
    let mut weighted = 0.0;
    let mut total = 0u64;
    let mut max_count = 0u64;

    let players: Vec<PlayerCount> = histogram
        .iter()
        .enumerate()
        .map(|(rank, &count)| {
            weighted += rank as f64 * count as f64;
            total += count;
            max_count = max_count.max(count);
            PlayerCount {
                rank: rank as u32,
                label: rank_string(rank as f64),
                count,
            }
        })
        .collect();

    let mean_rank = if total == 0 {
        f64::NAN
    } else {
        weighted / total as f64
    };

    RankDistributionSummary {
        players,
        mean_rank,
        max_count,
        total_players: total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summarize_weighted_mean() {
        let mut histogram = vec![0u64; 40];
        histogram[10] = 3;
        histogram[20] = 1;

        let summary = summarize_rank_distribution(&histogram);

        // (10*3 + 20*1) / 4
        assert!((summary.mean_rank - 12.5).abs() < 1e-9);
        assert_eq!(summary.max_count, 3);
        assert_eq!(summary.total_players, 4);
        assert_eq!(summary.players.len(), 40);
        assert_eq!(summary.players[10].label, "20k");
    }

    #[test]
    fn test_summarize_empty_histogram_is_nan() {
        let summary = summarize_rank_distribution(&[0; 40]);

        assert!(summary.mean_rank.is_nan());
        assert_eq!(summary.max_count, 0);
        assert_eq!(summary.total_players, 0);
    }

    #[test]
    fn test_summarize_single_rank() {
        let mut histogram = vec![0u64; 40];
        histogram[0] = 7;

        let summary = summarize_rank_distribution(&histogram);

        assert_eq!(summary.mean_rank, 0.0);
        assert_eq!(summary.max_count, 7);
    }
}
