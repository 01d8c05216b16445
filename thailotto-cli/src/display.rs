use comfy_table::{Table, ContentArrangement, presets::UTF8_FULL, Cell, Color};

use crate::import::ImportResult;
use crate::sync::SyncOutcome;
use thailotto_db::models::{DrawRecord, format_legacy_date};
use thailotto_engine::backtest::BacktestReport;
use thailotto_engine::context::DrawContext;
use thailotto_engine::predict::Prediction;
use thailotto_engine::scoring::ScoredCandidate;

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

fn evidence_list(candidate: &ScoredCandidate) -> String {
    candidate
        .contributions()
        .iter()
        .map(|c| format!("{} ({:+})", c.evidence, c.points))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn display_records(records: &[DrawRecord]) {
    if records.is_empty() {
        println!("No draws to show.");
        return;
    }

    let mut table = new_table(vec!["Date", "Weekday", "Number"]);
    for record in records {
        table.add_row(vec![
            format_legacy_date(record.date),
            record.date.format("%A").to_string(),
            record.number.to_string(),
        ]);
    }
    println!("{table}");
}

pub fn display_import_summary(result: &ImportResult) {
    println!("Import finished:");
    println!("  Rows read          : {}", result.total_records);
    println!("  Inserted           : {}", result.inserted);
    println!("  Duplicates skipped : {}", result.skipped);
    if result.errors > 0 {
        println!("  Rejected           : {}", result.errors);
    }
}

pub fn display_sync_outcome(outcome: &SyncOutcome) {
    match outcome {
        SyncOutcome::Added(r) => {
            println!("New result: {} -> {}", format_legacy_date(r.date), r.number)
        }
        SyncOutcome::AlreadyCurrent(r) => println!(
            "History already current (latest {} -> {}).",
            format_legacy_date(r.date),
            r.number
        ),
        SyncOutcome::Unavailable => println!("No usable result from the API."),
    }
}

pub fn display_context(context: &DrawContext) {
    let mode = context.label.unwrap_or("Standard Draw");
    println!(
        "\n🎯 Target draw: {} ({}, {})",
        format_legacy_date(context.target_date),
        context.target_date.format("%A"),
        mode
    );
    if context.bias_numbers.is_empty() {
        println!("   No cultural bias for this date, statistical mode.");
    } else {
        let bias = context
            .bias_numbers
            .iter()
            .map(|n| n.to_string())
            .collect::<Vec<_>>()
            .join(" ");
        println!("   Bias numbers (+{}): {}", context.cultural_weight, bias);
    }
}

pub fn display_prediction(prediction: &Prediction) {
    display_context(&prediction.context);
    println!("   History: {} draws", prediction.history_len);
    if let Some(digit) = prediction.hot_digit {
        println!(
            "   Insight: digit {} runs most often in past {} draws",
            digit,
            prediction.context.target_date.format("%d/%m")
        );
    }
    println!();

    if prediction.ranked.is_empty() {
        println!("No number scored above zero.");
        return;
    }

    let mut table = new_table(vec!["Rank", "Number", "Score", "Evidence"]);
    for (i, candidate) in prediction.ranked.iter().enumerate() {
        let color = match candidate.score() {
            s if s > 0 => Color::Green,
            0 => Color::White,
            _ => Color::Red,
        };
        table.add_row(vec![
            Cell::new(format!("#{}", i + 1)),
            Cell::new(candidate.number().to_string()),
            Cell::new(candidate.score().to_string()).fg(color),
            Cell::new(evidence_list(candidate)),
        ]);
    }
    println!("{table}");
    println!("\nScores are heuristics, not probabilities. No predictive value is implied.");
}

pub fn display_backtest(report: &BacktestReport) {
    println!("\n📊 Walk-forward backtest, top {}\n", report.top_n);

    let mut table = new_table(vec!["Date", "Result", "Rank"]);
    for step in &report.steps {
        let rank = match step.rank {
            Some(r) => Cell::new(format!("#{r}")).fg(Color::Green),
            None => Cell::new("—"),
        };
        table.add_row(vec![
            Cell::new(format_legacy_date(step.record.date)),
            Cell::new(step.record.number.to_string()),
            rank,
        ]);
    }
    println!("{table}");

    println!(
        "\nHits: {}/{} ({:.1}%), uniform baseline {:.1}%",
        report.hits,
        report.n_tests,
        report.hit_rate() * 100.0,
        report.uniform_baseline() * 100.0
    );
}
