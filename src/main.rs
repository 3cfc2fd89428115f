use std::env;

use anyhow::Context;
use log::info;

use pitchside::analysis;
use pitchside::config::{DEFAULT_DATASET, DEFAULT_FIGURE_EXT};
use pitchside::{Explorer, FillStrategy, HistogramConfig, LineConfig, ScatterConfig};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let path = env::args().nth(1).unwrap_or_else(|| DEFAULT_DATASET.to_string());
    let mut explorer = Explorer::new();
    explorer
        .load_from_csv(&path)
        .with_context(|| format!("cannot analyse {path}"))?;
    info!("Analysing {path}");

    run_queries(&mut explorer);
    missing_values_walkthrough(&mut explorer);
    visualization_walkthrough(&mut explorer);
    Ok(())
}

fn section(n: usize, title: &str) {
    println!("\n{n}. {title}");
}

fn report<T>(result: Result<T, pitchside::ExploreError>, show: impl FnOnce(T)) {
    match result {
        Ok(value) => show(value),
        Err(e) => println!("   skipped: {e}"),
    }
}

fn run_queries(explorer: &mut Explorer) {
    let Some(ds) = explorer.dataset_mut() else {
        return;
    };

    section(1, "Total matches");
    println!("   {}", analysis::total_matches(ds));

    section(2, "Top 5 teams by home wins");
    report(analysis::top_home_winners(ds, 5), |teams| {
        for (team, wins) in teams {
            println!("   {team}: {wins}");
        }
    });

    section(3, "Highest scoring match");
    report(analysis::highest_scoring_match(ds), |line| match line {
        Some(m) => println!("   {m} ({} goals)", m.total_goals),
        None => println!("   no scores recorded"),
    });

    section(4, "Best goal difference");
    report(analysis::best_goal_difference(ds), |best| match best {
        Some(team) => println!("   {team}"),
        None => println!("   no teams"),
    });

    section(5, "Top 5 scorelines");
    report(analysis::top_scorelines(ds, 5), |lines| {
        for line in lines {
            println!("   {line}");
        }
    });

    section(6, "Total penalties");
    report(analysis::total_penalties(ds), |n| {
        println!("   {}", pitchside::data::model::format_number(n));
    });

    section(7, "Most active referee");
    report(analysis::most_active_referee(ds), |top| match top {
        Some((referee, matches)) => println!("   {referee} ({matches} matches)"),
        None => println!("   no referees recorded"),
    });
}

fn missing_values_walkthrough(explorer: &mut Explorer) {
    println!("\nMissing values");
    explorer.report_missing_values();

    if let Err(e) = explorer.drop_columns(&[analysis::REFEREE]) {
        println!("   drop failed: {e}");
    }
    let goals = [analysis::HOME_GOALS, analysis::AWAY_GOALS];
    match explorer.fill_missing_values(&FillStrategy::Median, Some(&goals)) {
        Ok(summary) => {
            for (column, reason) in &summary.skipped {
                println!("   {column} not filled: {reason}");
            }
        }
        Err(e) => println!("   fill failed: {e}"),
    }
    explorer.report_missing_values();
}

fn visualization_walkthrough(explorer: &mut Explorer) {
    println!("\nCharts");
    let steps = [
        explorer
            .add_histogram("FTHG", "hist_goals", &HistogramConfig::default())
            .map(|_| "hist_goals"),
        explorer
            .add_line_plot("Date", "FTHG", "line_goals", &LineConfig::default())
            .map(|_| "line_goals"),
        explorer
            .add_scatter_plot("HS", "AS", "scatter_shots", &ScatterConfig::default())
            .map(|_| "scatter_shots"),
    ];
    for step in steps {
        report(step, |name| println!("   created {name}"));
    }

    report(explorer.save_all_figures(".", DEFAULT_FIGURE_EXT), |paths| {
        for path in paths {
            println!("   wrote {}", path.display());
        }
    });
}
