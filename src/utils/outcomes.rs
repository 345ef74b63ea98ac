use crate::models::{GameRecord, GameResult, RecordError, SeasonSegment};

/// Per-game fields that depend only on scores, lines and the game id
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Outcome {
    pub segment: SeasonSegment,
    pub total_score: u32,
    pub over_under_result: f64,
    pub game_result: GameResult,
    pub score_diff: u32,
}

/// Games with an id at or above `playoff_start` are playoff games
pub fn season_segment(game_id: u32, playoff_start: u32) -> SeasonSegment {
    if game_id >= playoff_start {
        SeasonSegment::Playoff
    } else {
        SeasonSegment::Regular
    }
}

/// Strictly positive results are "Over"; a push on the total counts as "Under"
pub fn classify_over_under(over_under_result: f64) -> GameResult {
    if over_under_result > 0.0 {
        GameResult::Over
    } else {
        GameResult::Under
    }
}

/// Derive the outcome fields for one game.
/// Fails when a betting line is not a finite number or the scores cannot
/// be added, so garbage never reaches the aggregates.
pub fn derive_outcome(record: &GameRecord, playoff_start: u32) -> Result<Outcome, RecordError> {
    for (field, value) in [("over_under", record.over_under), ("spread", record.spread)] {
        if !value.is_finite() {
            return Err(RecordError::NonFinite {
                game_id: record.game_id,
                field,
                value,
            });
        }
    }

    let total_score = record.total_score().ok_or(RecordError::ScoreOverflow {
        game_id: record.game_id,
        home_score: record.home_score,
        away_score: record.away_score,
    })?;
    let over_under_result = total_score as f64 - record.over_under;

    Ok(Outcome {
        segment: season_segment(record.game_id, playoff_start),
        total_score,
        over_under_result,
        game_result: classify_over_under(over_under_result),
        score_diff: record.score_diff(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game(game_id: u32, home_score: u32, away_score: u32, over_under: f64) -> GameRecord {
        GameRecord {
            game_id,
            home_team: "Buffalo".to_string(),
            away_team: "Miami".to_string(),
            home_score,
            away_score,
            over_under,
            spread: -3.5,
            favorite: "BUF".to_string(),
        }
    }

    #[test]
    fn test_total_score_and_result() {
        let outcome = derive_outcome(&game(1, 32, 29, 54.5), 273).unwrap();
        assert_eq!(outcome.total_score, 61);
        assert!((outcome.over_under_result - 6.5).abs() < 1e-9);
        assert_eq!(outcome.game_result, GameResult::Over);
        assert_eq!(outcome.score_diff, 3);

        let outcome = derive_outcome(&game(2, 10, 13, 41.0), 273).unwrap();
        assert_eq!(outcome.game_result, GameResult::Under);
        assert_eq!(outcome.score_diff, 3);
    }

    #[test]
    fn test_push_on_total_is_under() {
        let outcome = derive_outcome(&game(3, 24, 20, 44.0), 273).unwrap();
        assert_eq!(outcome.over_under_result, 0.0);
        assert_eq!(outcome.game_result, GameResult::Under);
    }

    #[test]
    fn test_segment_boundary() {
        assert_eq!(season_segment(272, 273), SeasonSegment::Regular);
        assert_eq!(season_segment(273, 273), SeasonSegment::Playoff);
        assert_eq!(season_segment(284, 273), SeasonSegment::Playoff);
        // Threshold is per season
        assert_eq!(season_segment(257, 257), SeasonSegment::Playoff);
    }

    #[test]
    fn test_non_finite_line_is_rejected() {
        let err = derive_outcome(&game(4, 20, 17, f64::NAN), 273).unwrap_err();
        assert!(matches!(
            err,
            RecordError::NonFinite {
                game_id: 4,
                field: "over_under",
                ..
            }
        ));

        let mut bad_spread = game(5, 20, 17, 44.5);
        bad_spread.spread = f64::INFINITY;
        let err = derive_outcome(&bad_spread, 273).unwrap_err();
        assert!(matches!(err, RecordError::NonFinite { field: "spread", .. }));
    }

    #[test]
    fn test_score_overflow_is_rejected() {
        let err = derive_outcome(&game(6, 4_000_000_000, 4_000_000_000, 44.5), 273).unwrap_err();
        assert_eq!(
            err,
            RecordError::ScoreOverflow {
                game_id: 6,
                home_score: 4_000_000_000,
                away_score: 4_000_000_000,
            }
        );

        let outcome = derive_outcome(&game(7, u32::MAX - 1, 1, 44.5), 273).unwrap();
        assert_eq!(outcome.total_score, u32::MAX);
    }

    #[test]
    fn test_score_overflow_does_not_block_other_games() {
        let csv = "game_id,home_team,away_team,home_score,away_score,over_under,spread,favorite\n\
                   1,Buffalo,Miami,4000000000,4000000000,44.5,-3,BUF\n\
                   2,Buffalo,Miami,24,20,44.5,-3,BUF\n";
        let season = crate::data::load_season_from_reader(csv.as_bytes()).unwrap();
        assert_eq!(season.games.len(), 2);

        let (derived, rejected) = crate::derive_games(&season.games, 273);
        assert_eq!(derived.len(), 1);
        assert_eq!(derived[0].record.game_id, 2);
        assert_eq!(derived[0].total_score, 44);
        assert!(matches!(
            rejected.as_slice(),
            [RecordError::ScoreOverflow { game_id: 1, .. }]
        ));
    }
}
