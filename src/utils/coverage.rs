use crate::models::{Coverage, GameRecord};

/// Did the favored team win by at least the spread?
///
/// The spread is compared by magnitude, and a margin equal to it covers.
/// A favorite that is missing or matches neither participant is reported as
/// not covered; callers that care should check the resolution separately.
pub fn evaluate_coverage(favored_team: Option<&str>, game: &GameRecord) -> Coverage {
    let line = game.spread.abs();

    let favored_margin = match favored_team {
        Some(team) if team == game.home_team => game.margin(),
        Some(team) if team == game.away_team => -game.margin(),
        _ => return Coverage::NotCovered,
    };

    if favored_margin as f64 >= line {
        Coverage::Covered
    } else {
        Coverage::NotCovered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game(home_score: u32, away_score: u32, spread: f64) -> GameRecord {
        GameRecord {
            game_id: 12,
            home_team: "Green Bay".to_string(),
            away_team: "Chicago".to_string(),
            home_score,
            away_score,
            over_under: 42.5,
            spread,
            favorite: "GB".to_string(),
        }
    }

    #[test]
    fn test_home_favorite_margin_equal_to_spread_covers() {
        assert_eq!(evaluate_coverage(Some("Green Bay"), &game(24, 17, 7.0)), Coverage::Covered);
        assert_eq!(evaluate_coverage(Some("Green Bay"), &game(24, 17, -7.0)), Coverage::Covered);
    }

    #[test]
    fn test_home_favorite_short_of_spread() {
        assert_eq!(
            evaluate_coverage(Some("Green Bay"), &game(24, 17, 7.5)),
            Coverage::NotCovered
        );
        // Losing outright never covers
        assert_eq!(
            evaluate_coverage(Some("Green Bay"), &game(17, 24, 3.0)),
            Coverage::NotCovered
        );
    }

    #[test]
    fn test_away_favorite() {
        assert_eq!(evaluate_coverage(Some("Chicago"), &game(10, 20, -9.5)), Coverage::Covered);
        assert_eq!(
            evaluate_coverage(Some("Chicago"), &game(10, 17, -9.5)),
            Coverage::NotCovered
        );
    }

    #[test]
    fn test_pick_em_win_covers() {
        assert_eq!(evaluate_coverage(Some("Chicago"), &game(20, 21, 0.0)), Coverage::Covered);
    }

    #[test]
    fn test_unknown_favorite_defaults_to_not_covered() {
        assert_eq!(evaluate_coverage(None, &game(40, 0, 3.0)), Coverage::NotCovered);
        assert_eq!(
            evaluate_coverage(Some("Detroit"), &game(40, 0, 3.0)),
            Coverage::NotCovered
        );
    }
}
