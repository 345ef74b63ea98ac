pub mod config;
pub mod models;
pub mod utils;

pub use models::*;
pub use utils::*;

use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::Path;
use tracing::info;
use utils::aggregate::{
    over_under_counts, over_under_distribution, playoff_point_differential,
    regular_season_point_differential, score_diff_distribution, sort_by_games_favored,
    sort_by_point_differential, team_coverage, unresolved_favorites, Distribution,
    OverUnderCounts, TeamCoverage, TeamPointDifferential,
};
use utils::coverage::evaluate_coverage;
use utils::data::{load_season_csv, LoadedSeason};
use utils::favorite::resolve_favorite;
use utils::outcomes::derive_outcome;

/// Run one game through every derivation stage
pub fn derive_game(record: &GameRecord, playoff_start: u32) -> Result<DerivedGame, RecordError> {
    let outcome = derive_outcome(record, playoff_start)?;
    let favored_team =
        FavoredTeam::from(resolve_favorite(&record.home_team, &record.away_team, &record.favorite));
    let covered = evaluate_coverage(favored_team.team(), record);

    Ok(DerivedGame {
        record: record.clone(),
        segment: outcome.segment,
        total_score: outcome.total_score,
        over_under_result: outcome.over_under_result,
        game_result: outcome.game_result,
        favored_team,
        covered,
        score_diff: outcome.score_diff,
    })
}

/// Derive every game independently; a failed game never affects the others
pub fn derive_games(
    records: &[GameRecord],
    playoff_start: u32,
) -> (Vec<DerivedGame>, Vec<RecordError>) {
    let mut derived = Vec::with_capacity(records.len());
    let mut rejected = Vec::new();
    for record in records {
        match derive_game(record, playoff_start) {
            Ok(game) => derived.push(game),
            Err(e) => rejected.push(e),
        }
    }
    (derived, rejected)
}

/// All the views handed to whatever renders the season
#[derive(Debug, Clone, Serialize)]
pub struct SeasonReport {
    pub generated_at: DateTime<Utc>,
    pub playoff_start: u32,
    pub games: Vec<DerivedGame>,
    pub rejected: Vec<RecordError>,
    pub regular_over_under: OverUnderCounts,
    pub playoff_over_under: OverUnderCounts,
    pub over_under_distribution: Vec<Distribution<GameResult>>,
    pub score_diff_distribution: Vec<Distribution<Coverage>>,
    pub regular_coverage: Vec<TeamCoverage>,
    pub playoff_coverage: Vec<TeamCoverage>,
    pub regular_unresolved_favorites: usize,
    pub playoff_unresolved_favorites: usize,
    pub regular_point_differential: Vec<TeamPointDifferential>,
    pub playoff_point_differential: Vec<TeamPointDifferential>,
}

/// Build every view from a loaded season. Team tables come back in display order.
pub fn build_season_report(season: LoadedSeason, playoff_start: u32) -> SeasonReport {
    let (games, derive_rejected) = derive_games(&season.games, playoff_start);
    let mut rejected = season.rejected;
    rejected.extend(derive_rejected);

    let mut regular_coverage = team_coverage(&games, SeasonSegment::Regular);
    let mut playoff_coverage = team_coverage(&games, SeasonSegment::Playoff);
    sort_by_games_favored(&mut regular_coverage);
    sort_by_games_favored(&mut playoff_coverage);

    let mut regular_point_differential = regular_season_point_differential(&games);
    let mut playoff_point_differential = playoff_point_differential(&games);
    sort_by_point_differential(&mut regular_point_differential);
    sort_by_point_differential(&mut playoff_point_differential);

    let report = SeasonReport {
        generated_at: Utc::now(),
        playoff_start,
        regular_over_under: over_under_counts(&games, SeasonSegment::Regular),
        playoff_over_under: over_under_counts(&games, SeasonSegment::Playoff),
        over_under_distribution: over_under_distribution(&games),
        score_diff_distribution: score_diff_distribution(&games),
        regular_coverage,
        playoff_coverage,
        regular_unresolved_favorites: unresolved_favorites(&games, SeasonSegment::Regular),
        playoff_unresolved_favorites: unresolved_favorites(&games, SeasonSegment::Playoff),
        regular_point_differential,
        playoff_point_differential,
        games,
        rejected,
    };

    info!(
        "Derived {} games ({} regular, {} playoff)",
        report.games.len(),
        report.regular_over_under.total(),
        report.playoff_over_under.total()
    );
    report
}

/// Load a season file and build its report.
/// With `strict`, the first rejected row aborts instead of being skipped.
pub fn analyze_season_file(path: &Path, playoff_start: u32, strict: bool) -> Result<SeasonReport> {
    let season = load_season_csv(path)?;
    if strict {
        if let Some(first) = season.rejected.first() {
            bail!("Malformed row in {}: {}", path.display(), first);
        }
    }

    let report = build_season_report(season, playoff_start);
    if strict {
        if let Some(first) = report.rejected.first() {
            bail!("Malformed game in {}: {}", path.display(), first);
        }
    }
    Ok(report)
}
