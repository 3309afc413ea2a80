use crate::domain::model::{RankedReport, ReportEntry, ScoreTable};
use crate::utils::error::{ReportError, Result};

/// Assumed ceiling for a single subject. Scores above it are still accepted.
pub const MAX_SCORE_PER_SUBJECT: f64 = 100.0;

/// Rounds to two decimal places, half-cent ties going to the even cent.
pub fn round_to_2_decimals(x: f64) -> f64 {
    (x * 100.0).round_ties_even() / 100.0
}

pub fn percentage_of(total: f64, num_subjects: usize) -> f64 {
    let max_possible = num_subjects as f64 * MAX_SCORE_PER_SUBJECT;
    round_to_2_decimals(total / max_possible * 100.0)
}

/// Competition ("min") ranks: each value gets 1 + the number of values
/// strictly greater than it, so ties share a rank.
pub fn competition_ranks(totals: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..totals.len()).collect();
    order.sort_by(|&a, &b| totals[b].total_cmp(&totals[a]));

    let mut ranks = vec![0; totals.len()];
    let mut current_rank = 0;
    for (position, &idx) in order.iter().enumerate() {
        // 同分沿用第一位同分者的名次
        if position == 0 || totals[idx] != totals[order[position - 1]] {
            current_rank = position + 1;
        }
        ranks[idx] = current_rank;
    }
    ranks
}

/// Computes totals, percentages and ranks for every student row.
///
/// Entries come back ordered by rank; students sharing a rank keep their
/// input order. Out-of-range scores are accepted as-is.
pub fn compute(table: &ScoreTable, num_subjects: usize) -> Result<RankedReport> {
    if num_subjects < 1 {
        return Err(ReportError::invalid_input(
            "number of subjects must be at least 1",
        ));
    }
    if table.is_empty() {
        return Err(ReportError::invalid_input(
            "the score table has no student rows",
        ));
    }
    for (idx, row) in table.rows().iter().enumerate() {
        if row.scores.len() != num_subjects {
            return Err(ReportError::invalid_input(format!(
                "row {} ('{}') has {} scores but {} subjects were expected",
                idx + 1,
                row.label,
                row.scores.len(),
                num_subjects
            )));
        }
    }

    let totals: Vec<f64> = table
        .rows()
        .iter()
        .map(|row| row.scores.iter().sum())
        .collect();
    let ranks = competition_ranks(&totals);

    let mut entries: Vec<ReportEntry> = table
        .rows()
        .iter()
        .zip(totals.iter().zip(ranks))
        .map(|(row, (&total, rank))| ReportEntry {
            student: row.label.clone(),
            total,
            percentage: percentage_of(total, num_subjects),
            rank,
            scores: row.scores.clone(),
        })
        .collect();
    entries.sort_by_key(|entry| entry.rank);

    tracing::debug!(
        "Ranked {} students across {} subjects",
        entries.len(),
        num_subjects
    );

    Ok(RankedReport::new(
        table.subjects().to_vec(),
        num_subjects,
        entries,
    ))
}
