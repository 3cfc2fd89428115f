//! Season queries over a football-data.org style results table.
//!
//! Columns used: `HomeTeam`, `AwayTeam`, `FTHG`/`FTAG` (full-time home/away
//! goals), `FTR` (result: `H`, `A` or `D`), `Referee`, `HR`/`AR`.

use std::collections::BTreeMap;
use std::fmt;

use crate::data::missing::{FillStrategy, fill_missing};
use crate::data::model::{CellValue, Column, Dataset, format_number};
use crate::data::query::{
    column, column_sum, filtered_indices, group_sums, idxmax, pair_counts, require_columns, value_counts,
};
use crate::error::ExploreError;

pub const HOME_TEAM: &str = "HomeTeam";
pub const AWAY_TEAM: &str = "AwayTeam";
pub const HOME_GOALS: &str = "FTHG";
pub const AWAY_GOALS: &str = "FTAG";
pub const RESULT: &str = "FTR";
pub const REFEREE: &str = "Referee";
pub const HOME_PENALTIES: &str = "HR";
pub const AWAY_PENALTIES: &str = "AR";
pub const TOTAL_GOALS: &str = "TotalGoals";

pub const UNKNOWN_REFEREE: &str = "Unknown";

pub fn total_matches(dataset: &Dataset) -> usize {
    dataset.len()
}

/// Add `TotalGoals = FTHG + FTAG`; missing when either side is missing.
pub fn add_total_goals(dataset: &mut Dataset) -> Result<(), ExploreError> {
    let totals: Vec<CellValue> = {
        let home = column(dataset, HOME_GOALS)?;
        let away = column(dataset, AWAY_GOALS)?;
        home.values
            .iter()
            .zip(&away.values)
            .map(|(h, a)| match (h, a) {
                (CellValue::Integer(h), CellValue::Integer(a)) => h
                    .checked_add(*a)
                    .map_or_else(|| CellValue::Float(*h as f64 + *a as f64), CellValue::Integer),
                _ => match (h.as_f64(), a.as_f64()) {
                    (Some(h), Some(a)) => CellValue::Float(h + a),
                    _ => CellValue::Null,
                },
            })
            .collect()
    };

    dataset
        .add_column(Column::new(TOTAL_GOALS, totals))
        .map_err(|e| ExploreError::Shape(format!("{e:#}")))
}

/// Teams with the most home wins, most first.
pub fn top_home_winners(dataset: &Dataset, n: usize) -> Result<Vec<(String, usize)>, ExploreError> {
    require_columns(dataset, &[RESULT, HOME_TEAM])?;
    let home_wins = filtered_indices(dataset, RESULT, &CellValue::from("H"))?;
    Ok(value_counts(dataset, HOME_TEAM, Some(&home_wins))?
        .into_iter()
        .take(n)
        .map(|(team, count)| (team.to_string(), count))
        .collect())
}

/// One match line, e.g. `A 3-3 D`.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchLine {
    pub home: String,
    pub away: String,
    pub home_goals: CellValue,
    pub away_goals: CellValue,
    pub total_goals: CellValue,
}

impl fmt::Display for MatchLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}-{} {}",
            self.home, self.home_goals, self.away_goals, self.away
        )
    }
}

/// The first match with the highest `TotalGoals`. Adds the column if absent.
pub fn highest_scoring_match(dataset: &mut Dataset) -> Result<Option<MatchLine>, ExploreError> {
    require_columns(dataset, &[HOME_TEAM, AWAY_TEAM, HOME_GOALS, AWAY_GOALS])?;
    if !dataset.has_column(TOTAL_GOALS) {
        add_total_goals(dataset)?;
    }
    let Some(row) = idxmax(dataset, TOTAL_GOALS)? else {
        return Ok(None);
    };

    let cell = |col: &str| dataset.get(row, col).cloned().unwrap_or(CellValue::Null);
    Ok(Some(MatchLine {
        home: cell(HOME_TEAM).to_string(),
        away: cell(AWAY_TEAM).to_string(),
        home_goals: cell(HOME_GOALS),
        away_goals: cell(AWAY_GOALS),
        total_goals: cell(TOTAL_GOALS),
    }))
}

#[derive(Debug, Clone, PartialEq)]
pub struct GoalDifference {
    pub team: String,
    pub difference: f64,
}

impl fmt::Display for GoalDifference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} goals)", self.team, format_number(self.difference))
    }
}

/// Net goal difference over home and away matches for every team.
///
/// A team that only appears on one side contributes zero for the other.
/// Sorted best first; ties keep team name order.
pub fn goal_differences(dataset: &Dataset) -> Result<Vec<GoalDifference>, ExploreError> {
    require_columns(dataset, &[HOME_TEAM, AWAY_TEAM, HOME_GOALS, AWAY_GOALS])?;
    let home = group_sums(dataset, HOME_TEAM, &[HOME_GOALS, AWAY_GOALS])?;
    let away = group_sums(dataset, AWAY_TEAM, &[AWAY_GOALS, HOME_GOALS])?;

    let mut net: BTreeMap<String, f64> = BTreeMap::new();
    for (team, sums) in home.iter().chain(&away) {
        // Both groupings are ordered [scored, conceded].
        *net.entry(team.to_string()).or_default() += sums[0] - sums[1];
    }

    let mut table: Vec<GoalDifference> = net
        .into_iter()
        .map(|(team, difference)| GoalDifference { team, difference })
        .collect();
    table.sort_by(|a, b| b.difference.total_cmp(&a.difference));
    Ok(table)
}

pub fn best_goal_difference(dataset: &Dataset) -> Result<Option<GoalDifference>, ExploreError> {
    Ok(goal_differences(dataset)?.into_iter().next())
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scoreline {
    pub home_goals: CellValue,
    pub away_goals: CellValue,
    pub count: usize,
}

impl fmt::Display for Scoreline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}: {}", self.home_goals, self.away_goals, self.count)
    }
}

/// Most frequent final scores. Equal counts are listed in ascending score order.
pub fn top_scorelines(dataset: &Dataset, n: usize) -> Result<Vec<Scoreline>, ExploreError> {
    require_columns(dataset, &[HOME_GOALS, AWAY_GOALS])?;
    Ok(pair_counts(dataset, HOME_GOALS, AWAY_GOALS)?
        .into_iter()
        .take(n)
        .map(|((home_goals, away_goals), count)| Scoreline {
            home_goals,
            away_goals,
            count,
        })
        .collect())
}

/// Sum of home and away penalties (`HR` + `AR`).
pub fn total_penalties(dataset: &Dataset) -> Result<f64, ExploreError> {
    require_columns(dataset, &[HOME_PENALTIES, AWAY_PENALTIES])?;
    Ok(column_sum(dataset, HOME_PENALTIES)? + column_sum(dataset, AWAY_PENALTIES)?)
}

/// The referee with the most matches, after labelling missing referees
/// `Unknown` in place.
pub fn most_active_referee(dataset: &mut Dataset) -> Result<Option<(String, usize)>, ExploreError> {
    require_columns(dataset, &[REFEREE])?;
    fill_missing(
        dataset,
        &FillStrategy::Value(CellValue::from(UNKNOWN_REFEREE)),
        Some(&[REFEREE]),
    );
    Ok(value_counts(dataset, REFEREE, None)?
        .into_iter()
        .next()
        .map(|(referee, count)| (referee.to_string(), count)))
}
