use crate::models::{Coverage, DerivedGame, GameResult, SeasonSegment};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Number of games that went over and under the posted total
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverUnderCounts {
    pub over: usize,
    pub under: usize,
}

impl OverUnderCounts {
    pub fn total(&self) -> usize {
        self.over + self.under
    }
}

/// Five-number summary plus mean of a set of values
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistributionSummary {
    pub count: usize,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    pub mean: f64,
}

/// Values of one category within one season segment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Distribution<K> {
    pub category: K,
    pub segment: SeasonSegment,
    pub values: Vec<f64>,
    pub summary: Option<DistributionSummary>,
}

/// How often a team covered when it was favored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamCoverage {
    pub team: String,
    pub covered: usize,
    pub not_covered: usize,
}

impl TeamCoverage {
    pub fn games_favored(&self) -> usize {
        self.covered + self.not_covered
    }
}

/// Points scored minus points allowed by one team over a season segment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamPointDifferential {
    pub team: String,
    pub point_differential: i64,
    pub playoff_team: bool,
}

fn in_segment(games: &[DerivedGame], segment: SeasonSegment) -> impl Iterator<Item = &DerivedGame> {
    games.iter().filter(move |g| g.segment == segment)
}

pub fn over_under_counts(games: &[DerivedGame], segment: SeasonSegment) -> OverUnderCounts {
    in_segment(games, segment).fold(OverUnderCounts::default(), |mut counts, game| {
        match game.game_result {
            GameResult::Over => counts.over += 1,
            GameResult::Under => counts.under += 1,
        }
        counts
    })
}

/// Quantile with linear interpolation between closest ranks; `sorted` must be non-empty
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

/// None for an empty set
pub fn summarize(values: &[f64]) -> Option<DistributionSummary> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    Some(DistributionSummary {
        count: sorted.len(),
        min: sorted[0],
        q1: quantile(&sorted, 0.25),
        median: quantile(&sorted, 0.5),
        q3: quantile(&sorted, 0.75),
        max: sorted[sorted.len() - 1],
        mean: sorted.iter().sum::<f64>() / sorted.len() as f64,
    })
}

fn distribution_by<K, C, V>(
    games: &[DerivedGame],
    categories: &[K],
    category_of: C,
    value_of: V,
) -> Vec<Distribution<K>>
where
    K: Copy + PartialEq,
    C: Fn(&DerivedGame) -> K,
    V: Fn(&DerivedGame) -> f64,
{
    let mut distributions = Vec::new();
    for &category in categories {
        for segment in SeasonSegment::ALL {
            let values: Vec<f64> = in_segment(games, segment)
                .filter(|&g| category_of(g) == category)
                .map(&value_of)
                .collect();
            let summary = summarize(&values);
            distributions.push(Distribution {
                category,
                segment,
                values,
                summary,
            });
        }
    }
    distributions
}

/// `over_under_result` values by game result and segment
pub fn over_under_distribution(games: &[DerivedGame]) -> Vec<Distribution<GameResult>> {
    distribution_by(games, &GameResult::ALL, |g| g.game_result, |g| g.over_under_result)
}

/// `score_diff` values by coverage outcome and segment
pub fn score_diff_distribution(games: &[DerivedGame]) -> Vec<Distribution<Coverage>> {
    distribution_by(games, &Coverage::ALL, |g| g.covered, |g| g.score_diff as f64)
}

/// Coverage counts per favored team. Games without a resolved favorite are left out.
pub fn team_coverage(games: &[DerivedGame], segment: SeasonSegment) -> Vec<TeamCoverage> {
    let mut by_team: BTreeMap<&str, (usize, usize)> = BTreeMap::new();

    for game in in_segment(games, segment) {
        let Some(team) = game.favored_team.team() else {
            continue;
        };
        let entry = by_team.entry(team).or_default();
        match game.covered {
            Coverage::Covered => entry.0 += 1,
            Coverage::NotCovered => entry.1 += 1,
        }
    }

    by_team
        .into_iter()
        .map(|(team, (covered, not_covered))| TeamCoverage {
            team: team.to_string(),
            covered,
            not_covered,
        })
        .collect()
}

pub fn unresolved_favorites(games: &[DerivedGame], segment: SeasonSegment) -> usize {
    in_segment(games, segment)
        .filter(|g| !g.favored_team.is_resolved())
        .count()
}

/// Every team that plays at least one playoff game
pub fn playoff_teams(games: &[DerivedGame]) -> BTreeSet<&str> {
    in_segment(games, SeasonSegment::Playoff)
        .flat_map(|g| [g.record.home_team.as_str(), g.record.away_team.as_str()])
        .collect()
}

fn accumulate_point_differential<'a>(
    totals: &mut BTreeMap<&'a str, i64>,
    games: impl Iterator<Item = &'a DerivedGame>,
) {
    for game in games {
        let margin = game.record.margin();
        *totals.entry(game.record.home_team.as_str()).or_default() += margin;
        *totals.entry(game.record.away_team.as_str()).or_default() -= margin;
    }
}

/// Regular-season point differential for every team in the file, playoff teams flagged
pub fn regular_season_point_differential(games: &[DerivedGame]) -> Vec<TeamPointDifferential> {
    let playoff = playoff_teams(games);

    let mut totals: BTreeMap<&str, i64> = games
        .iter()
        .flat_map(|g| [g.record.home_team.as_str(), g.record.away_team.as_str()])
        .map(|team| (team, 0))
        .collect();
    accumulate_point_differential(&mut totals, in_segment(games, SeasonSegment::Regular));

    totals
        .into_iter()
        .map(|(team, point_differential)| TeamPointDifferential {
            team: team.to_string(),
            point_differential,
            playoff_team: playoff.contains(team),
        })
        .collect()
}

/// Playoff point differential, only for teams that reached the playoffs
pub fn playoff_point_differential(games: &[DerivedGame]) -> Vec<TeamPointDifferential> {
    let mut totals = BTreeMap::new();
    accumulate_point_differential(&mut totals, in_segment(games, SeasonSegment::Playoff));

    totals
        .into_iter()
        .map(|(team, point_differential)| TeamPointDifferential {
            team: team.to_string(),
            point_differential,
            playoff_team: true,
        })
        .collect()
}

/// Descending by point differential, ties by team name
pub fn sort_by_point_differential(rows: &mut [TeamPointDifferential]) {
    rows.sort_by(|a, b| {
        b.point_differential
            .cmp(&a.point_differential)
            .then_with(|| a.team.cmp(&b.team))
    });
}

/// Most games favored first, then most covers
pub fn sort_by_games_favored(rows: &mut [TeamCoverage]) {
    rows.sort_by(|a, b| {
        b.games_favored()
            .cmp(&a.games_favored())
            .then_with(|| b.covered.cmp(&a.covered))
            .then_with(|| a.team.cmp(&b.team))
    });
}
