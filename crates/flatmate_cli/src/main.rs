mod cli;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use cli::{Cli, Mode};
use flatmate_core::analysis::{Analysis, Analyzer, ExtractionSource};
use flatmate_core::config::{self, Config};
use flatmate_core::error::AppError;
use flatmate_core::inference::backends_from_config;
use flatmate_core::ledger::Ledger;
use flatmate_core::notify::notifier_from_config;
use flatmate_core::report::save_summary_report;
use flatmate_core::scheduler::ReminderScheduler;
use flatmate_core::storage::json_store;
use std::io::{self, BufRead};
use tabled::settings::Style;
use tabled::{Table, Tabled};
use tracing_subscriber::EnvFilter;

const TERMINATOR: &str = "done";

#[derive(Tabled)]
struct TaskRow {
    #[tabled(rename = "Person")]
    person: String,
    #[tabled(rename = "Task")]
    task: String,
}

fn init_tracing() {
    // Quiet by default; RUST_LOG=info or RUST_LOG=debug for more.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn normalize_parse_error(err: &clap::Error) -> AppError {
    let rendered = err.to_string();
    let first_line = rendered.lines().next().unwrap_or("invalid command").trim();
    let message = first_line
        .strip_prefix("error: ")
        .unwrap_or(first_line)
        .to_string();
    AppError::invalid_input(message)
}

fn print_usage_error(err: &AppError) {
    eprintln!("ERROR: {}", err);
    eprintln!("{}", Cli::command().render_usage());
}

fn resolve_config(raw_overrides: &[String]) -> Result<Config, AppError> {
    let loaded = config::load_config_with_fallback();
    if let Some(err) = loaded.error.as_ref() {
        eprintln!("WARNING: using default configuration: {}", err);
    }

    let overrides = raw_overrides
        .iter()
        .map(|raw| config::parse_config_override(raw))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(config::merge_overrides(&loaded.config, &overrides))
}

fn read_transcript<R: BufRead>(mut reader: R) -> Result<Vec<String>, AppError> {
    let mut lines = Vec::new();
    let mut input = String::new();

    loop {
        input.clear();
        let bytes = reader
            .read_line(&mut input)
            .map_err(|err| AppError::io(err.to_string()))?;
        if bytes == 0 {
            break;
        }

        let line = input.trim();
        if line.eq_ignore_ascii_case(TERMINATOR) {
            break;
        }
        if !line.is_empty() {
            lines.push(line.to_string());
        }
    }

    Ok(lines)
}

fn print_analysis(analysis: &Analysis) {
    println!("\nSummary:\n{}", analysis.summary);
    println!("Overall mood: {}", analysis.mood);

    if analysis.tasks.is_empty() {
        println!("\nNo clear tasks found.");
        return;
    }

    let heading = match analysis.source {
        ExtractionSource::Summary => "Tasks identified (from summary):",
        _ => "Tasks identified:",
    };
    let rows = analysis.tasks.iter().map(|task| TaskRow {
        person: task.person.clone(),
        task: task.description.clone(),
    });
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("\n{heading}\n{table}");
}

fn run_capture(config: &Config) -> Result<(), AppError> {
    println!("\nFlatMate - chat summarizer & task tracker");
    println!("Paste chat messages (type '{TERMINATOR}' when finished):\n");

    let lines = read_transcript(io::stdin().lock())?;
    if lines.is_empty() {
        println!("No input provided.");
        return Ok(());
    }

    let backends = backends_from_config(config);
    let analyzer = Analyzer::new(backends.summarizer.as_ref(), backends.classifier.as_ref());
    println!("\nAnalyzing conversation...");
    let analysis = analyzer.analyze(&lines)?;
    print_analysis(&analysis);

    if !analysis.tasks.is_empty() {
        let added = Ledger::open(config)?.append(&analysis.tasks)?;
        println!("\n{added} new task(s) added.");
    }

    let report = save_summary_report(&json_store::data_dir(config)?, &analysis)?;
    println!("\nSaved summary file: {}\n", report.display());
    Ok(())
}

fn run_done(config: &Config, person: &str, keyword: &str) -> Result<(), AppError> {
    let ledger = Ledger::open(config)?;
    if ledger.mark_done(person, keyword)? {
        println!("Marked '{keyword}' for {person} as done.");
    } else {
        println!("No matching task found.");
    }
    Ok(())
}

fn run_remind(config: &Config) -> Result<(), AppError> {
    let ledger = Ledger::open(config)?;
    let scheduler = ReminderScheduler::from_config(ledger, config);
    let notifier = notifier_from_config(config)?;

    let period = scheduler.period();
    println!(
        "Starting reminder service (every {})...",
        describe_period(period.as_secs())
    );
    scheduler.run(notifier.as_ref())
}

fn describe_period(seconds: u64) -> String {
    match seconds {
        s if s % 3600 == 0 && s / 3600 == 1 => "hour".to_string(),
        s if s % 3600 == 0 => format!("{} hours", s / 3600),
        s => format!("{s} seconds"),
    }
}

fn run(cli: &Cli) -> Result<(), AppError> {
    let config = resolve_config(&cli.config_override)?;
    let mode = cli.mode();
    tracing::debug!(?mode, "starting");
    match mode {
        Mode::Capture => run_capture(&config),
        Mode::Done { person, keyword } => run_done(&config, &person, &keyword),
        Mode::Remind => run_remind(&config),
    }
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.exit()
        }
        Err(err) => {
            print_usage_error(&normalize_parse_error(&err));
            std::process::exit(1);
        }
    };

    init_tracing();

    if let Err(err) = run(&cli) {
        match err {
            AppError::InvalidInput(_) => print_usage_error(&err),
            _ => eprintln!("ERROR: {}", err),
        }
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::{describe_period, read_transcript};

    #[test]
    fn read_transcript_stops_at_terminator_and_skips_blanks() {
        let input = "Sam: I'll pay the rent\n\n   \n  Alex: ok  \n DONE \nKim: ignored\n";

        let lines = read_transcript(input.as_bytes()).unwrap();

        assert_eq!(lines, vec!["Sam: I'll pay the rent", "Alex: ok"]);
    }

    #[test]
    fn read_transcript_accepts_eof_without_terminator() {
        let lines = read_transcript("Sam: hi".as_bytes()).unwrap();
        assert_eq!(lines, vec!["Sam: hi"]);
    }

    #[test]
    fn read_transcript_empty_input() {
        let lines = read_transcript("done\n".as_bytes()).unwrap();
        assert!(lines.is_empty());
    }

    #[test]
    fn describe_period_prefers_hours() {
        assert_eq!(describe_period(6 * 3600), "6 hours");
        assert_eq!(describe_period(3600), "hour");
        assert_eq!(describe_period(90), "90 seconds");
    }
}
