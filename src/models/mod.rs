use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// One game as read from the season file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    pub game_id: u32,
    pub home_team: String,
    pub away_team: String,
    pub home_score: u32,
    pub away_score: u32,
    pub over_under: f64,  // Posted total points line
    pub spread: f64,      // Only the magnitude is used
    pub favorite: String, // Short code, e.g. "NE" or "Dal"
}

impl GameRecord {
    /// `None` when the two scores do not fit in a `u32` together
    pub fn total_score(&self) -> Option<u32> {
        self.home_score.checked_add(self.away_score)
    }

    /// Home score minus away score
    pub fn margin(&self) -> i64 {
        self.home_score as i64 - self.away_score as i64
    }

    pub fn score_diff(&self) -> u32 {
        self.home_score.abs_diff(self.away_score)
    }
}

/// Regular season or playoffs, decided by the game id threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SeasonSegment {
    Regular,
    Playoff,
}

impl SeasonSegment {
    pub const ALL: [SeasonSegment; 2] = [SeasonSegment::Regular, SeasonSegment::Playoff];
}

impl fmt::Display for SeasonSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeasonSegment::Regular => write!(f, "Regular Season"),
            SeasonSegment::Playoff => write!(f, "Playoffs"),
        }
    }
}

/// Over/under category of a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum GameResult {
    Over,
    Under,
}

impl GameResult {
    pub const ALL: [GameResult; 2] = [GameResult::Over, GameResult::Under];
}

impl fmt::Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameResult::Over => write!(f, "Over"),
            GameResult::Under => write!(f, "Under"),
        }
    }
}

/// Whether the favored team covered the spread
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Coverage {
    Covered,
    NotCovered,
}

impl Coverage {
    pub const ALL: [Coverage; 2] = [Coverage::Covered, Coverage::NotCovered];
}

impl fmt::Display for Coverage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Coverage::Covered => write!(f, "Covered"),
            Coverage::NotCovered => write!(f, "Not Covered"),
        }
    }
}

/// Why a favorite code could not be mapped to either participant
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResolutionFailure {
    #[error("favorite code is empty")]
    EmptyCode,

    #[error("favorite code {code:?} matches {home_team:?} and {away_team:?} equally ({similarity:.3})")]
    Tied {
        code: String,
        home_team: String,
        away_team: String,
        similarity: f64,
    },
}

/// Outcome of favorite resolution for one game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FavoredTeam {
    Resolved { team: String },
    Unresolved { reason: ResolutionFailure },
}

impl FavoredTeam {
    pub fn team(&self) -> Option<&str> {
        match self {
            FavoredTeam::Resolved { team } => Some(team),
            FavoredTeam::Unresolved { .. } => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, FavoredTeam::Resolved { .. })
    }
}

impl From<Result<String, ResolutionFailure>> for FavoredTeam {
    fn from(result: Result<String, ResolutionFailure>) -> Self {
        match result {
            Ok(team) => FavoredTeam::Resolved { team },
            Err(reason) => FavoredTeam::Unresolved { reason },
        }
    }
}

/// A game with every derived field attached
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedGame {
    pub record: GameRecord,
    pub segment: SeasonSegment,
    pub total_score: u32,
    pub over_under_result: f64, // total_score - over_under
    pub game_result: GameResult,
    pub favored_team: FavoredTeam,
    pub covered: Coverage,
    pub score_diff: u32,
}

/// A season file row that could not become a `GameRecord`
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecordError {
    #[error("row {row}: missing value for {field}")]
    Missing { row: usize, field: &'static str },

    #[error("row {row}: invalid value {value:?} for {field}")]
    Invalid {
        row: usize,
        field: &'static str,
        value: String,
    },

    #[error("game {game_id}: {field} is not a finite number ({value})")]
    NonFinite {
        game_id: u32,
        field: &'static str,
        value: f64,
    },

    #[error("game {game_id}: combined score {home_score} + {away_score} is out of range")]
    ScoreOverflow {
        game_id: u32,
        home_score: u32,
        away_score: u32,
    },

    #[error("row {row}: game id {game_id} already seen")]
    DuplicateGameId { row: usize, game_id: u32 },

    #[error("row {row}: unreadable record: {message}")]
    Unreadable { row: usize, message: String },
}
