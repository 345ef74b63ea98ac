use anyhow::{Context, Result};
use clap::Parser;
use nfl_betting_outcomes::aggregate::{DistributionSummary, OverUnderCounts, TeamCoverage};
use nfl_betting_outcomes::config::Config;
use nfl_betting_outcomes::data::{save_report_to_json, save_views_to_csv};
use nfl_betting_outcomes::{analyze_season_file, SeasonReport};
use tracing::info;

fn print_over_under(label: &str, counts: &OverUnderCounts) {
    println!("{}: {} over, {} under", label, counts.over, counts.under);
}

fn print_summary(label: &str, summary: Option<&DistributionSummary>) {
    match summary {
        Some(s) => println!(
            "  {:<28} n={:<4} min {:>6.1} | q1 {:>6.1} | median {:>6.1} | q3 {:>6.1} | max {:>6.1}",
            label, s.count, s.min, s.q1, s.median, s.q3, s.max
        ),
        None => println!("  {:<28} no games", label),
    }
}

fn print_coverage(rows: &[TeamCoverage]) {
    if rows.is_empty() {
        println!("No favored teams.");
        return;
    }
    for (i, row) in rows.iter().enumerate() {
        println!(
            "{}. {} | Covered: {} | Not Covered: {}",
            i + 1,
            row.team,
            row.covered,
            row.not_covered
        );
    }
}

fn print_report(report: &SeasonReport) {
    println!("OVER/UNDER\n");
    print_over_under("Regular Season", &report.regular_over_under);
    print_over_under("Playoffs", &report.playoff_over_under);

    println!("\nOVER/UNDER RESULT DISTRIBUTION\n");
    for d in &report.over_under_distribution {
        print_summary(&format!("{} ({})", d.category, d.segment), d.summary.as_ref());
    }

    println!("\nSCORE DIFFERENCE BY COVERAGE\n");
    for d in &report.score_diff_distribution {
        print_summary(&format!("{} ({})", d.category, d.segment), d.summary.as_ref());
    }

    println!("\nREGULAR SEASON AGAINST THE SPREAD WHEN FAVORED\n");
    print_coverage(&report.regular_coverage);
    if report.regular_unresolved_favorites > 0 {
        println!(
            "({} games with an unresolved favorite)",
            report.regular_unresolved_favorites
        );
    }

    println!("\nPLAYOFFS AGAINST THE SPREAD WHEN FAVORED\n");
    print_coverage(&report.playoff_coverage);
    if report.playoff_unresolved_favorites > 0 {
        println!(
            "({} games with an unresolved favorite)",
            report.playoff_unresolved_favorites
        );
    }

    println!("\nREGULAR SEASON POINT DIFFERENTIAL (* = playoff team)\n");
    for (i, row) in report.regular_point_differential.iter().enumerate() {
        let marker = if row.playoff_team { "*" } else { "" };
        println!("{}. {}{} {:+}", i + 1, row.team, marker, row.point_differential);
    }

    println!("\nPLAYOFF POINT DIFFERENTIAL\n");
    if report.playoff_point_differential.is_empty() {
        println!("No playoff games.");
    }
    for (i, row) in report.playoff_point_differential.iter().enumerate() {
        println!("{}. {} {:+}", i + 1, row.team, row.point_differential);
    }

    if !report.rejected.is_empty() {
        println!("\nSKIPPED ROWS\n");
        for e in &report.rejected {
            println!("- {}", e);
        }
    }
}

fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::parse();
    config.validate()?;

    println!("NFL Season Betting Outcomes\n");
    info!(
        "Reading {} (playoffs from game {})",
        config.input.display(),
        config.playoff_start
    );

    let report = analyze_season_file(&config.input, config.playoff_start, config.strict)
        .context("Failed to analyze season")?;

    print_report(&report);

    if config.save_json {
        std::fs::create_dir_all(&config.output_dir).context("Failed to create output directory")?;
        let path = config.output_dir.join("season_report.json");
        save_report_to_json(&report, &path)?;
        println!("\nSaved report to {}", path.display());
    }

    if config.save_csv {
        let written = save_views_to_csv(&report, &config.output_dir)?;
        println!("\nSaved {} CSV views to {}", written.len(), config.output_dir.display());
    }

    Ok(())
}
