use crate::models::{DerivedGame, FavoredTeam, GameRecord, GameResult, RecordError, SeasonSegment};
use crate::SeasonReport;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{info, warn};

/// Games that parsed cleanly plus the rows that did not
#[derive(Debug, Clone, Default)]
pub struct LoadedSeason {
    pub games: Vec<GameRecord>,
    pub rejected: Vec<RecordError>,
}

/// A season file row before validation; every column is optional text
#[derive(Debug, Deserialize)]
struct RawGameRow {
    #[serde(default)]
    game_id: Option<String>,
    #[serde(default)]
    home_team: Option<String>,
    #[serde(default)]
    away_team: Option<String>,
    #[serde(default)]
    home_score: Option<String>,
    #[serde(default)]
    away_score: Option<String>,
    #[serde(default)]
    over_under: Option<String>,
    #[serde(default)]
    spread: Option<String>,
    #[serde(default)]
    favorite: Option<String>,
}

fn required<'a>(
    row: usize,
    field: &'static str,
    value: &'a Option<String>,
) -> Result<&'a str, RecordError> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(RecordError::Missing { row, field }),
    }
}

fn parse_field<T: FromStr>(
    row: usize,
    field: &'static str,
    value: &Option<String>,
) -> Result<T, RecordError> {
    let text = required(row, field, value)?;
    text.parse().map_err(|_| RecordError::Invalid {
        row,
        field,
        value: text.to_string(),
    })
}

/// Betting lines must be finite; "nan" and "inf" parse as f64 but are not lines
fn parse_line(row: usize, field: &'static str, value: &Option<String>) -> Result<f64, RecordError> {
    let line: f64 = parse_field(row, field, value)?;
    if line.is_finite() {
        Ok(line)
    } else {
        Err(RecordError::Invalid {
            row,
            field,
            value: required(row, field, value)?.to_string(),
        })
    }
}

impl RawGameRow {
    fn into_record(self, row: usize) -> Result<GameRecord, RecordError> {
        Ok(GameRecord {
            game_id: parse_field(row, "game_id", &self.game_id)?,
            home_team: required(row, "home_team", &self.home_team)?.to_string(),
            away_team: required(row, "away_team", &self.away_team)?.to_string(),
            home_score: parse_field(row, "home_score", &self.home_score)?,
            away_score: parse_field(row, "away_score", &self.away_score)?,
            over_under: parse_line(row, "over_under", &self.over_under)?,
            spread: parse_line(row, "spread", &self.spread)?,
            // An empty favorite is left for the resolver to report
            favorite: self.favorite.unwrap_or_default().trim().to_string(),
        })
    }
}

/// Load a season from any CSV source with a header row.
/// Rows are numbered from 1, not counting the header.
pub fn load_season_from_reader<R: Read>(source: R) -> Result<LoadedSeason> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .flexible(true)
        .from_reader(source);

    // Surface a broken header as a whole-file error
    reader.headers().context("Failed to read CSV header")?;

    let mut season = LoadedSeason::default();
    let mut seen_ids = HashSet::new();

    for (index, result) in reader.deserialize::<RawGameRow>().enumerate() {
        let row = index + 1;
        let record = result
            .map_err(|e| RecordError::Unreadable {
                row,
                message: e.to_string(),
            })
            .and_then(|raw| raw.into_record(row))
            .and_then(|record| {
                if seen_ids.insert(record.game_id) {
                    Ok(record)
                } else {
                    Err(RecordError::DuplicateGameId {
                        row,
                        game_id: record.game_id,
                    })
                }
            });

        match record {
            Ok(record) => season.games.push(record),
            Err(e) => {
                warn!("Rejected season row: {}", e);
                season.rejected.push(e);
            }
        }
    }

    info!(
        "Loaded {} games ({} rejected)",
        season.games.len(),
        season.rejected.len()
    );
    Ok(season)
}

/// Load a season CSV file from disk
pub fn load_season_csv(path: &Path) -> Result<LoadedSeason> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open season file {}", path.display()))?;
    load_season_from_reader(file)
}

/// Save the full report as pretty JSON
pub fn save_report_to_json(report: &SeasonReport, filename: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(report).context("Failed to serialize season report")?;
    std::fs::write(filename, json).context("Failed to write report file")?;
    Ok(())
}

#[derive(Serialize)]
struct OverUnderRow {
    segment: String,
    game_result: String,
    games: usize,
}

#[derive(Serialize)]
struct DistributionRow {
    category: String,
    segment: String,
    value: f64,
}

#[derive(Serialize)]
struct CoverageRow<'a> {
    segment: String,
    team: &'a str,
    covered: usize,
    not_covered: usize,
}

#[derive(Serialize)]
struct PointDifferentialRow<'a> {
    segment: String,
    team: &'a str,
    point_differential: i64,
    playoff_team: bool,
}

#[derive(Serialize)]
struct DerivedGameRow<'a> {
    game_id: u32,
    home_team: &'a str,
    away_team: &'a str,
    home_score: u32,
    away_score: u32,
    over_under: f64,
    spread: f64,
    favorite: &'a str,
    segment: String,
    total_score: u32,
    over_under_result: f64,
    game_result: String,
    favored_team: &'a str,
    resolution: String,
    covered: String,
    score_diff: u32,
}

impl<'a> From<&'a DerivedGame> for DerivedGameRow<'a> {
    fn from(game: &'a DerivedGame) -> Self {
        let resolution = match &game.favored_team {
            FavoredTeam::Resolved { .. } => "resolved".to_string(),
            FavoredTeam::Unresolved { reason } => format!("unresolved: {}", reason),
        };
        DerivedGameRow {
            game_id: game.record.game_id,
            home_team: &game.record.home_team,
            away_team: &game.record.away_team,
            home_score: game.record.home_score,
            away_score: game.record.away_score,
            over_under: game.record.over_under,
            spread: game.record.spread,
            favorite: &game.record.favorite,
            segment: game.segment.to_string(),
            total_score: game.total_score,
            over_under_result: game.over_under_result,
            game_result: game.game_result.to_string(),
            favored_team: game.favored_team.team().unwrap_or_default(),
            resolution,
            covered: game.covered.to_string(),
            score_diff: game.score_diff,
        }
    }
}

fn write_rows<T: Serialize>(path: &Path, rows: impl IntoIterator<Item = T>) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create CSV file {}", path.display()))?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write each report view to its own CSV file in `dir`, returning the paths written
pub fn save_views_to_csv(report: &SeasonReport, dir: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))?;
    let mut written = Vec::new();

    let path = dir.join("derived_games.csv");
    write_rows(&path, report.games.iter().map(DerivedGameRow::from))?;
    written.push(path);

    let path = dir.join("over_under_counts.csv");
    let counts = [
        (SeasonSegment::Regular, report.regular_over_under),
        (SeasonSegment::Playoff, report.playoff_over_under),
    ];
    write_rows(
        &path,
        counts.iter().flat_map(|(segment, counts)| {
            [
                OverUnderRow {
                    segment: segment.to_string(),
                    game_result: GameResult::Over.to_string(),
                    games: counts.over,
                },
                OverUnderRow {
                    segment: segment.to_string(),
                    game_result: GameResult::Under.to_string(),
                    games: counts.under,
                },
            ]
        }),
    )?;
    written.push(path);

    let path = dir.join("over_under_distribution.csv");
    write_rows(
        &path,
        report.over_under_distribution.iter().flat_map(|d| {
            d.values.iter().map(move |&value| DistributionRow {
                category: d.category.to_string(),
                segment: d.segment.to_string(),
                value,
            })
        }),
    )?;
    written.push(path);

    let path = dir.join("score_diff_distribution.csv");
    write_rows(
        &path,
        report.score_diff_distribution.iter().flat_map(|d| {
            d.values.iter().map(move |&value| DistributionRow {
                category: d.category.to_string(),
                segment: d.segment.to_string(),
                value,
            })
        }),
    )?;
    written.push(path);

    let path = dir.join("team_coverage.csv");
    let coverage = [
        (SeasonSegment::Regular, &report.regular_coverage),
        (SeasonSegment::Playoff, &report.playoff_coverage),
    ];
    write_rows(
        &path,
        coverage.iter().flat_map(|(segment, rows)| {
            rows.iter().map(move |r| CoverageRow {
                segment: segment.to_string(),
                team: &r.team,
                covered: r.covered,
                not_covered: r.not_covered,
            })
        }),
    )?;
    written.push(path);

    let path = dir.join("point_differential.csv");
    let differentials = [
        (SeasonSegment::Regular, &report.regular_point_differential),
        (SeasonSegment::Playoff, &report.playoff_point_differential),
    ];
    write_rows(
        &path,
        differentials.iter().flat_map(|(segment, rows)| {
            rows.iter().map(move |r| PointDifferentialRow {
                segment: segment.to_string(),
                team: &r.team,
                point_differential: r.point_differential,
                playoff_team: r.playoff_team,
            })
        }),
    )?;
    written.push(path);

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "game_id,home_team,away_team,home_score,away_score,over_under,spread,favorite\n";

    #[test]
    fn test_load_valid_rows() {
        let csv = format!(
            "{}1,Kansas City,Arizona,44,21,54.0,-3.5,KC\n2,Dallas,Philadelphia,40,34,46.5,3.0,Dal\n",
            HEADER
        );
        let season = load_season_from_reader(csv.as_bytes()).unwrap();
        assert!(season.rejected.is_empty());
        assert_eq!(season.games.len(), 2);
        assert_eq!(season.games[0].home_team, "Kansas City");
        assert_eq!(season.games[0].spread, -3.5);
        assert_eq!(season.games[1].favorite, "Dal");
    }

    #[test]
    fn test_bad_rows_are_reported_and_skipped() {
        let csv = format!(
            "{}1,Buffalo,Miami,24,,44.5,-3,BUF\n2,Buffalo,Miami,24,abc,44.5,-3,BUF\n3,Detroit,Chicago,31,30,nan,-1,DET\n4,Detroit,Chicago,-3,30,40,-1,DET\n5,Denver,Las Vegas,16,22,41,2.5,LV\n5,Denver,Las Vegas,16,22,41,2.5,LV\n",
            HEADER
        );
        let season = load_season_from_reader(csv.as_bytes()).unwrap();
        assert_eq!(season.games.len(), 1);
        assert_eq!(season.games[0].game_id, 5);
        assert_eq!(
            season.rejected,
            vec![
                RecordError::Missing {
                    row: 1,
                    field: "away_score"
                },
                RecordError::Invalid {
                    row: 2,
                    field: "away_score",
                    value: "abc".to_string()
                },
                RecordError::Invalid {
                    row: 3,
                    field: "over_under",
                    value: "nan".to_string()
                },
                RecordError::Invalid {
                    row: 4,
                    field: "home_score",
                    value: "-3".to_string()
                },
                RecordError::DuplicateGameId { row: 6, game_id: 5 },
            ]
        );
    }

    #[test]
    fn test_missing_column_is_missing_field() {
        let csv = "game_id,home_team,away_team,home_score,away_score,over_under,favorite\n1,Buffalo,Miami,24,20,44.5,BUF\n";
        let season = load_season_from_reader(csv.as_bytes()).unwrap();
        assert!(season.games.is_empty());
        assert_eq!(
            season.rejected,
            vec![RecordError::Missing {
                row: 1,
                field: "spread"
            }]
        );
    }

    #[test]
    fn test_extra_columns_and_empty_favorite() {
        let csv = "game_id,week,home_team,away_team,home_score,away_score,over_under,spread,favorite\n7,1,Seattle,Denver,17,16,43.5,-6.5,\n";
        let season = load_season_from_reader(csv.as_bytes()).unwrap();
        assert!(season.rejected.is_empty());
        assert_eq!(season.games[0].favorite, "");
    }

    #[test]
    fn test_invalid_utf8_row_is_unreadable() {
        let mut bytes = HEADER.as_bytes().to_vec();
        bytes.extend_from_slice(b"1,Buf\xff\xfealo,Miami,24,20,44.5,-3,BUF\n");
        bytes.extend_from_slice(b"2,Detroit,Chicago,31,30,51.5,-1,DET\n");

        let season = load_season_from_reader(bytes.as_slice()).unwrap();
        assert_eq!(season.games.len(), 1);
        assert_eq!(season.games[0].game_id, 2);
        assert_eq!(season.rejected.len(), 1);
        assert!(matches!(season.rejected[0], RecordError::Unreadable { row: 1, .. }));
    }
}
