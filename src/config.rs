use clap::Parser;
use std::path::PathBuf;

/// Over/under and spread outcomes for a season of NFL games
#[derive(Parser, Debug, Clone)]
#[command(name = "cli", version, about)]
pub struct Config {
    /// Season CSV file
    #[arg(long, env = "SEASON_CSV", default_value = "merged-2022.csv")]
    pub input: PathBuf,

    /// First playoff game id; lower ids are regular season
    #[arg(long, env = "PLAYOFF_START_GAME_ID", default_value = "273")]
    pub playoff_start: u32,

    /// Directory for exported views
    #[arg(long, env = "OUTPUT_DIR", default_value = "reports")]
    pub output_dir: PathBuf,

    /// Write one CSV file per view
    #[arg(long, env = "SAVE_CSV", default_value = "false")]
    pub save_csv: bool,

    /// Write the full report as JSON
    #[arg(long, env = "SAVE_JSON", default_value = "false")]
    pub save_json: bool,

    /// Abort on the first malformed row instead of skipping it
    #[arg(long, env = "STRICT_ROWS", default_value = "false")]
    pub strict: bool,
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.playoff_start == 0 {
            anyhow::bail!("playoff_start must be a positive game id");
        }
        if self.input.as_os_str().is_empty() {
            anyhow::bail!("input path must not be empty");
        }
        Ok(())
    }
}
