use intro_scorer::error::EvaluateError;
use intro_scorer::scoring::Evaluator;
use intro_scorer::utils::{
    log_model_error, log_model_step, log_newline, log_report, log_transcript_header,
};
use std::env;
use std::process;

fn print_usage() {
    eprintln!("Usage: score-transcript <text> [--duration|-d <seconds>] [--json] [--no-semantic]");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  <text>          Transcript text to score");
    eprintln!("  --duration, -d  Spoken duration in seconds (default: 60)");
    eprintln!("  --json          Print the full report as JSON instead of the summary");
    eprintln!("  --no-semantic   Skip loading the embedding model");
}

fn main() {
    let args: Vec<String> = env::args().skip(1).collect();

    let mut duration_seconds = 60.0_f64;
    let mut as_json = false;
    let mut no_semantic = false;
    let mut text_parts: Vec<&str> = Vec::new();

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--json" => as_json = true,
            "--no-semantic" => no_semantic = true,
            "--duration" | "-d" => {
                i += 1;
                let Some(value) = args.get(i).and_then(|v| v.parse::<f64>().ok()) else {
                    eprintln!("error: --duration expects a number of seconds");
                    process::exit(1);
                };
                duration_seconds = value;
            }
            "--help" | "-h" => {
                print_usage();
                return;
            }
            other => text_parts.push(other),
        }
        i += 1;
    }

    if text_parts.is_empty() {
        print_usage();
        process::exit(1);
    }
    let text = text_parts.join(" ");

    let evaluator = if no_semantic {
        Evaluator::without_semantic()
    } else {
        log_model_step("Loading embedding model (this may take a while on first run)...");
        Evaluator::new()
    };

    let report = match evaluator.evaluate(&text, duration_seconds) {
        Ok(report) => report,
        Err(EvaluateError::InvalidInput(reason)) => {
            eprintln!("error: {reason}");
            process::exit(1);
        }
        Err(e) => {
            log_model_error(&format!("scoring failed: {e}"));
            process::exit(1);
        }
    };

    if as_json {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("error: could not serialize report: {e}");
                process::exit(1);
            }
        }
        return;
    }

    log_transcript_header(&text, duration_seconds);
    log_newline();
    log_report(&report);
}
