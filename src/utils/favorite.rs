use crate::models::ResolutionFailure;
use tracing::debug;

/// Abbreviations that do not read like the location name they stand for
const ABBREVIATIONS: &[(&str, &str)] = &[
    ("NE", "New England"),
    ("SF", "San Francisco"),
    ("GB", "Green Bay"),
    ("TB", "Tampa Bay"),
    ("KC", "Kansas City"),
];

/// Similarity ratio in [0, 1] based on the longest common subsequence
/// 2 * LCS / (len(a) + len(b)), compared character by character and case-sensitive.
/// Two empty strings are identical (1.0).
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }

    // Two-row DP table, indexed by position in `b`
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];
    for ca in &a {
        for (j, cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    let lcs = prev[b.len()];

    2.0 * lcs as f64 / total as f64
}

/// Full location name for a known abbreviation (case-insensitive)
pub fn expand_abbreviation(code: &str) -> Option<&'static str> {
    ABBREVIATIONS
        .iter()
        .find(|(abbr, _)| abbr.eq_ignore_ascii_case(code))
        .map(|(_, name)| *name)
}

/// Pick the participant that reads closest to `code`.
/// Err carries the shared similarity when the two are tied.
fn closest_participant<'a>(home_team: &'a str, away_team: &'a str, code: &str) -> Result<&'a str, f64> {
    let home_similarity = similarity_ratio(code, home_team);
    let away_similarity = similarity_ratio(code, away_team);

    if home_similarity > away_similarity {
        Ok(home_team)
    } else if away_similarity > home_similarity {
        Ok(away_team)
    } else {
        Err(home_similarity)
    }
}

/// Resolve a favorite code to the full name of the home or away team.
///
/// The code is compared against both participants; the strictly closer one
/// wins. On a tie the code is expanded through the abbreviation table and
/// compared once more. A second tie, or a tie on a code with no expansion,
/// is a resolution failure rather than a guess.
pub fn resolve_favorite(
    home_team: &str,
    away_team: &str,
    favorite: &str,
) -> Result<String, ResolutionFailure> {
    let code = favorite.trim();
    if code.is_empty() {
        return Err(ResolutionFailure::EmptyCode);
    }

    let tied_at = match closest_participant(home_team, away_team, code) {
        Ok(team) => return Ok(team.to_string()),
        Err(similarity) => similarity,
    };

    let Some(expanded) = expand_abbreviation(code) else {
        debug!(code, home_team, away_team, "favorite tied with no known abbreviation");
        return Err(ResolutionFailure::Tied {
            code: code.to_string(),
            home_team: home_team.to_string(),
            away_team: away_team.to_string(),
            similarity: tied_at,
        });
    };

    match closest_participant(home_team, away_team, expanded) {
        Ok(team) => Ok(team.to_string()),
        Err(similarity) => {
            debug!(code, expanded, home_team, away_team, "favorite still tied after expansion");
            Err(ResolutionFailure::Tied {
                code: expanded.to_string(),
                home_team: home_team.to_string(),
                away_team: away_team.to_string(),
                similarity,
            })
        }
    }
}
