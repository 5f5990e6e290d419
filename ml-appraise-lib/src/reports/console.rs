use crate::Result;
use crate::metrics::{MetricCategory, MetricValue};
use crate::scoring::{MetricOutcome, MetricStatus, ScoreRow};
use core::fmt::Write;
use owo_colors::OwoColorize;
use strum::IntoEnumIterator;

const GOOD_SCORE: f64 = 0.7;
const FAIR_SCORE: f64 = 0.4;

/// Render a human-readable summary of every row, metrics grouped by category.
pub fn generate<W: Write>(rows: &[ScoreRow], use_colors: bool, writer: &mut W) -> Result<()> {
    for (index, row) in rows.iter().enumerate() {
        if index > 0 {
            writeln!(writer)?;
            writeln!(writer, "═══════════════════════════════════════")?;
            writeln!(writer)?;
        }

        let score = format!("{:.2}", row.net_score());
        let score = if use_colors {
            match row.net_score() {
                s if s >= GOOD_SCORE => score.green().bold().to_string(),
                s if s >= FAIR_SCORE => score.yellow().bold().to_string(),
                _ => score.red().bold().to_string(),
            }
        } else {
            score
        };

        writeln!(
            writer,
            "{} ({}) has a net score of {score} ({}ms)",
            row.name(),
            row.category(),
            row.net_score_latency_ms()
        )?;

        let max_name_len = row.outcomes().iter().map(|o| o.name.len()).max().unwrap_or(0);

        for category in MetricCategory::iter() {
            let outcomes: Vec<_> = row.outcomes().iter().filter(|o| o.category == category).collect();
            if outcomes.is_empty() {
                continue;
            }

            writeln!(writer)?;
            if use_colors {
                writeln!(writer, "{}", category.to_string().bold())?;
            } else {
                writeln!(writer, "{category}")?;
            }

            for outcome in outcomes {
                writeln!(
                    writer,
                    "  {:<width$} : {}",
                    outcome.name,
                    describe(outcome, use_colors),
                    width = max_name_len
                )?;
            }
        }
    }

    Ok(())
}

fn describe(outcome: &MetricOutcome, use_colors: bool) -> String {
    let value = format_value(&outcome.reported_value());
    let note = match &outcome.status {
        MetricStatus::Scored(_) => return format!("{value} ({}ms)", outcome.latency_ms()),
        MetricStatus::Failed(reason) => format!("failed: {reason}"),
        MetricStatus::TimedOut => "timed out".to_string(),
    };

    let note = if use_colors { note.red().to_string() } else { note };
    format!("{value} [{note}]")
}

fn format_value(value: &MetricValue) -> String {
    match value {
        MetricValue::Score(score) => format!("{score:.2}"),
        MetricValue::Devices(scores) => scores
            .iter()
            .map(|(device, score)| format!("{device}={score:.2}"))
            .collect::<Vec<_>>()
            .join(", "),
    }
}
