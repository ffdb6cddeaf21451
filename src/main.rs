use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

use dinghy_scorer::config::Config;
use dinghy_scorer::roster::Roster;
use dinghy_scorer::sheet::ScoreReport;
use dinghy_scorer::standings::Track;

// Exit codes
const EXIT_SUCCESS: i32 = 0;
const EXIT_INPUT: i32 = 1;
const EXIT_CONFIG: i32 = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum RaceFormat {
    Table,
    Tsv,
    Json,
    Html,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum StandingsFormat {
    Table,
    Tsv,
    Json,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum TrackChoice {
    Class,
    Personal,
    Both,
}

impl TrackChoice {
    fn tracks(self) -> &'static [Track] {
        match self {
            TrackChoice::Class => &[Track::Class],
            TrackChoice::Personal => &[Track::Personal],
            TrackChoice::Both => &[Track::Class, Track::Personal],
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Score one or more race sheets and save the results
    Score {
        /// Race sheet files (YAML, or JSON by extension)
        #[arg(required = true)]
        sheets: Vec<PathBuf>,

        /// Directory for score reports (defaults to output_dir from config, then ".")
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        #[arg(short, long, value_enum, default_value = "table")]
        format: RaceFormat,

        /// Place given to non-finishers (defaults to entry count + 1)
        #[arg(long)]
        dnc_place: Option<f64>,

        /// Show each corrected time relative to this datum (x1000)
        #[arg(long)]
        datum: Option<f64>,

        /// Open the HTML results in the browser
        #[arg(long)]
        open: bool,

        /// Print results without saving a report
        #[arg(long)]
        no_save: bool,
    },
    /// Show series standings from saved score reports
    Standings {
        /// Series definition file
        series: PathBuf,

        #[arg(short, long, value_enum, default_value = "both")]
        track: TrackChoice,

        #[arg(short, long, value_enum, default_value = "table")]
        format: StandingsFormat,
    },
    /// List the configured boat classes and their handicaps
    Classes,
}

#[derive(Parser, Debug)]
#[command(name = "dinghy-scorer")]
#[command(about = "Handicap dinghy race and series scoring", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/dinghy-scorer/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

fn main() {
    let cli = Cli::parse();
    dinghy_scorer::logging::init(cli.verbose);
    let start_time = Instant::now();

    let code = match cli.command {
        Commands::Score {
            sheets,
            output_dir,
            format,
            dnc_place,
            datum,
            open,
            no_save,
        } => {
            let config = load_validated_config(cli.config);
            let options = ScoreOptions {
                output_dir: output_dir
                    .or_else(|| config.output_dir.clone())
                    .unwrap_or_else(|| PathBuf::from(".")),
                format,
                dnc_place: dnc_place.or(config.dnc_override()),
                datum,
                open,
                save: !no_save,
            };
            run_score(&config, &sheets, &options)
        }
        Commands::Standings {
            series,
            track,
            format,
        } => run_standings(&series, track, format),
        Commands::Classes => run_classes(&load_validated_config(cli.config)),
    };

    debug!("finished in {:?}", start_time.elapsed());
    std::process::exit(code);
}

fn load_validated_config(path: Option<PathBuf>) -> Config {
    let config = match dinghy_scorer::config::load_config(path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    if let Err(errors) = dinghy_scorer::config::validate_config(&config) {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    info!("Loaded {} boat classes from config", config.handicaps.len());
    config
}

struct ScoreOptions {
    output_dir: PathBuf,
    format: RaceFormat,
    dnc_place: Option<f64>,
    datum: Option<f64>,
    open: bool,
    save: bool,
}

fn run_score(config: &Config, sheets: &[PathBuf], options: &ScoreOptions) -> i32 {
    let roster = match &config.roster {
        Some(path) => match Roster::load(path, &config.handicaps) {
            Ok(r) => {
                info!("Loaded {} quick entries from {}", r.len(), path.display());
                Some(r)
            }
            Err(e) => {
                eprintln!("Roster error: {:#}", e);
                return EXIT_CONFIG;
            }
        },
        None => None,
    };

    let generated_at = Utc::now();
    let results: Vec<(&PathBuf, anyhow::Result<ScoreReport>)> = sheets
        .par_iter()
        .map(|path| {
            let report = score_sheet(path, config, roster.as_ref(), options.dnc_place, generated_at);
            (path, report)
        })
        .collect();

    let use_colors = dinghy_scorer::output::should_use_colors();
    let mut code = EXIT_SUCCESS;

    for (path, result) in results {
        let report = match result {
            Ok(r) => r,
            Err(e) => {
                eprintln!("{}: {:#}", path.display(), e);
                code = EXIT_INPUT;
                continue;
            }
        };

        if let Err(e) = print_report(&report, options.format, options.datum, use_colors) {
            eprintln!("{}: {:#}", path.display(), e);
            code = EXIT_INPUT;
            continue;
        }

        if options.save {
            match dinghy_scorer::sheet::save_report(&options.output_dir, &report) {
                Ok(saved) => eprintln!("Saved {}", saved.display()),
                Err(e) => {
                    eprintln!("Failed to save report: {:#}", e);
                    code = EXIT_INPUT;
                }
            }
        }

        if options.open {
            if let Err(e) = dinghy_scorer::browser::open_report(&options.output_dir, &report) {
                eprintln!("Failed to open browser: {:#}", e);
            }
        }
    }

    code
}

fn score_sheet(
    path: &Path,
    config: &Config,
    roster: Option<&Roster>,
    dnc_place: Option<f64>,
    generated_at: chrono::DateTime<Utc>,
) -> anyhow::Result<ScoreReport> {
    let sheet = dinghy_scorer::sheet::load_sheet(path)?;
    debug!(
        sheet = %path.display(),
        entries = sheet.entries.len(),
        "scoring race sheet"
    );
    ScoreReport::from_sheet(&sheet, &config.handicaps, roster, dnc_place, generated_at).map_err(
        |errors| anyhow::anyhow!("invalid race sheet:\n  - {}", errors.join("\n  - ")),
    )
}

fn print_report(
    report: &ScoreReport,
    format: RaceFormat,
    datum: Option<f64>,
    use_colors: bool,
) -> anyhow::Result<()> {
    match format {
        RaceFormat::Table => {
            let meta = &report.metadata;
            println!("{} - {} ({})", meta.series, meta.race, meta.date.format("%d/%m/%Y"));
            let table =
                dinghy_scorer::output::format_race_table(&report.to_result(), use_colors, datum)?;
            println!("{}", table);
            println!();
        }
        RaceFormat::Tsv => {
            let tsv = dinghy_scorer::output::format_race_tsv(&report.to_result());
            if !tsv.is_empty() {
                println!("{}", tsv);
            }
        }
        RaceFormat::Json => println!("{}", serde_json::to_string_pretty(report)?),
        RaceFormat::Html => println!("{}", report.html),
    }
    Ok(())
}

fn run_standings(series: &Path, track: TrackChoice, format: StandingsFormat) -> i32 {
    let loaded = match dinghy_scorer::series::load_series(series) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Series error: {:#}", e);
            return EXIT_INPUT;
        }
    };
    let standings = loaded.standings();
    info!(
        "{} races, {} competitors",
        standings.series.race_count, standings.series.competitor_count
    );

    match format {
        StandingsFormat::Table => {
            let use_colors = dinghy_scorer::output::should_use_colors();
            let boards: Vec<String> = track
                .tracks()
                .iter()
                .map(|t| dinghy_scorer::output::format_leaderboard(&standings, *t, use_colors))
                .collect();
            println!("{}", boards.join("\n\n"));
        }
        StandingsFormat::Tsv => {
            for t in track.tracks() {
                let tsv = dinghy_scorer::output::format_leaderboard_tsv(standings.leaderboard(*t));
                if !tsv.is_empty() {
                    println!("{}", tsv);
                }
            }
        }
        StandingsFormat::Json => match serde_json::to_string_pretty(&standings) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Failed to serialize standings: {}", e);
                return EXIT_INPUT;
            }
        },
    }

    EXIT_SUCCESS
}

fn run_classes(config: &Config) -> i32 {
    let classes = config.handicaps.classes();
    let width = classes.iter().map(|c| c.label.chars().count()).max().unwrap_or(0);
    for class in classes {
        println!("{}  {:>5}", dinghy_scorer::output::formatter::pad(&class.label, width), class.py);
    }
    EXIT_SUCCESS
}
