use console::{measure_text_width, Style};

use crate::scoring::{ScoreReport, SubScore};

pub const TREE_BRANCH: char = '\u{251C}';
pub const TREE_END: char = '\u{2514}';
pub const TREE_HORIZ: char = '\u{2500}';
pub const TREE_VERT: char = '\u{2502}';

const TREE_PREFIX_WIDTH: usize = 4;
const VALUE_COLUMN: usize = 28;

fn tree_branch() -> String {
    dim()
        .apply_to(format!("{}{}{} ", TREE_BRANCH, TREE_HORIZ, TREE_HORIZ))
        .to_string()
}

fn tree_end() -> String {
    dim()
        .apply_to(format!("{}{}{} ", TREE_END, TREE_HORIZ, TREE_HORIZ))
        .to_string()
}

fn tree_indent() -> String {
    dim().apply_to(format!("{}   ", TREE_VERT)).to_string()
}

pub fn dim() -> Style {
    Style::new().dim()
}

fn cyan() -> Style {
    Style::new().cyan()
}

fn green() -> Style {
    Style::new().green()
}

fn red() -> Style {
    Style::new().red()
}

fn yellow() -> Style {
    Style::new().yellow()
}

fn bold() -> Style {
    Style::new().bold()
}

fn magenta() -> Style {
    Style::new().magenta()
}

fn model_prefix() -> String {
    yellow().apply_to("[MODEL]").to_string()
}

pub fn pad_label(label: &str, depth: usize) -> String {
    let prefix_width = depth * TREE_PREFIX_WIDTH;
    let target_width = VALUE_COLUMN.saturating_sub(prefix_width);
    let current_width = measure_text_width(label);
    if current_width < target_width {
        format!("{}{}", label, " ".repeat(target_width - current_width))
    } else {
        format!("{} ", label)
    }
}

fn ratio_style(sub: &SubScore) -> Style {
    if sub.ratio() >= 0.8 {
        green()
    } else if sub.ratio() >= 0.5 {
        yellow()
    } else {
        red()
    }
}

pub fn log_model_step(message: &str) {
    println!("{} {}", model_prefix(), message);
}

pub fn log_model_loaded(seconds: f32) {
    println!(
        "{} embedding model ready in {}",
        model_prefix(),
        cyan().apply_to(format!("{seconds:.1}s"))
    );
}

pub fn log_model_error(message: &str) {
    eprintln!("{} {}", model_prefix(), red().apply_to(message));
}

pub fn log_newline() {
    println!();
}

pub fn log_header(title: &str) {
    println!("{}", bold().apply_to(title));
}

pub fn log_transcript_header(text: &str, duration_seconds: f64) {
    let preview = if text.chars().count() > 60 {
        format!("{}...", text.chars().take(57).collect::<String>())
    } else {
        text.to_string()
    };
    println!(
        "{} \"{}\" {}",
        magenta().apply_to(bold().apply_to("[TRANSCRIPT]")),
        dim().apply_to(preview.replace('\n', " ")),
        dim().apply_to(format!("({duration_seconds:.0}s)"))
    );
}

pub fn log_report(report: &ScoreReport) {
    log_header("Scores");
    for (i, sub) in report.sub_scores.iter().enumerate() {
        let last = i == report.sub_scores.len() - 1;
        let prefix = if last { tree_end() } else { tree_branch() };
        println!(
            "{}{} {}",
            prefix,
            pad_label(&sub.dimension.to_string(), 1),
            ratio_style(sub).apply_to(format!("{}/{}", sub.points, sub.possible))
        );

        // Content & Structure is the only composite dimension
        if i == 0 {
            let c = &report.content;
            for (label, value, end) in [
                ("salutation", c.salutation, false),
                ("keywords", c.keywords, false),
                ("flow", c.flow, true),
            ] {
                let sub_prefix = if end { tree_end() } else { tree_branch() };
                println!(
                    "{}{}{} {}",
                    tree_indent(),
                    sub_prefix,
                    pad_label(label, 2),
                    dim().apply_to(value)
                );
            }
        }
    }
    log_newline();

    log_header("Delivery stats");
    let f = &report.features;
    println!(
        "{}{} {}",
        tree_branch(),
        pad_label("words / distinct", 1),
        dim().apply_to(format!(
            "{} / {}",
            report.stats.word_count, report.stats.distinct_words
        ))
    );
    println!(
        "{}{} {}",
        tree_branch(),
        pad_label("wpm", 1),
        cyan().apply_to(format!("{:.1}", f.wpm))
    );
    println!(
        "{}{} {}",
        tree_branch(),
        pad_label("ttr", 1),
        cyan().apply_to(format!("{:.2}", f.ttr))
    );
    println!(
        "{}{} {}",
        tree_branch(),
        pad_label("fillers", 1),
        dim().apply_to(format!(
            "{} ({:.1}%)",
            f.filler_count,
            f.filler_rate * 100.0
        ))
    );
    println!(
        "{}{} {}",
        tree_branch(),
        pad_label("grammar flags", 1),
        dim().apply_to(format!(
            "{} ({:.1} per 100 words)",
            f.grammar_penalties, f.errors_per_100
        ))
    );
    println!(
        "{}{} {}",
        tree_end(),
        pad_label("sentiment", 1),
        dim().apply_to(format!(
            "compound {:.2}, positive {:.2}",
            f.sentiment.compound, f.sentiment.positive
        ))
    );
    log_newline();

    log_header("Content coverage");
    let elements = &report.coverage.elements;
    for (i, (element, present)) in elements.iter().enumerate() {
        let last = i == elements.len() - 1;
        let prefix = if last { tree_end() } else { tree_branch() };
        let (mark, style) = if *present {
            ("present", green())
        } else if element.is_required() {
            ("missing", red())
        } else {
            ("missing", dim())
        };
        println!(
            "{}{} {}",
            prefix,
            pad_label(&element.to_string(), 1),
            style.apply_to(mark)
        );
    }
    log_newline();

    log_header("Semantic similarity");
    match &report.similarity {
        Some(similarity) => {
            let s = similarity.clamped();
            for (label, value, end) in [
                ("content", s.content, false),
                ("language", s.language, false),
                ("clarity", s.clarity, false),
                ("engagement", s.engagement, true),
            ] {
                let prefix = if end { tree_end() } else { tree_branch() };
                println!(
                    "{}{} {}",
                    prefix,
                    pad_label(label, 1),
                    cyan().apply_to(format!("{:.0}%", value * 100.0))
                );
            }
        }
        None => println!(
            "{}{}",
            tree_end(),
            dim().apply_to("unavailable (scores unaffected)")
        ),
    }
    log_newline();

    log_header("Feedback");
    println!(
        "{}{} {}",
        tree_branch(),
        pad_label("strengths", 1),
        green().apply_to(report.feedback.strengths.join(", "))
    );
    println!(
        "{}{} {}",
        tree_branch(),
        pad_label("improve", 1),
        yellow().apply_to(report.feedback.improvements.join(", "))
    );
    let missing = if report.feedback.missing_required.is_empty() {
        dim().apply_to("none".to_string())
    } else {
        red().apply_to(report.feedback.missing_required.join(", "))
    };
    println!("{}{} {}", tree_end(), pad_label("missing", 1), missing);
    log_newline();

    println!(
        "{} {} {}",
        bold().apply_to("Total:"),
        bold().apply_to(format!("{}/100", report.total)),
        dim().apply_to(format!("({})", report.feedback.verdict))
    );
}
