use crate::Result;
use crate::metrics::{Device, MetricValue};
use crate::scoring::{MetricOutcome, ScoreRow};
use core::fmt::Write;
use std::borrow::Cow;
use strum::IntoEnumIterator;

/// Write every row as CSV, one line per artifact.
///
/// Columns follow the NDJSON key order, except that per-device metrics are expanded into one
/// `<metric>.<device>` column per device. The header is taken from the first row.
pub fn generate<W: Write>(rows: &[ScoreRow], writer: &mut W) -> Result<()> {
    let Some(first) = rows.first() else {
        writeln!(writer, "name,category,net_score,net_score_latency")?;
        return Ok(());
    };

    write!(writer, "name,category,net_score,net_score_latency")?;
    for outcome in first.outcomes() {
        match outcome.sentinel {
            MetricValue::Devices(_) => {
                for device in Device::iter() {
                    write!(writer, ",{}.{device}", outcome.name)?;
                }
            }
            MetricValue::Score(_) => write!(writer, ",{}", outcome.name)?,
        }
        write!(writer, ",{}_latency", outcome.name)?;
    }
    writeln!(writer)?;

    for row in rows {
        write!(
            writer,
            "{},{},{},{}",
            escape_csv(row.name()),
            row.category(),
            row.net_score(),
            row.net_score_latency_ms()
        )?;

        for outcome in row.outcomes() {
            write_value(outcome, writer)?;
            write!(writer, ",{}", outcome.latency_ms())?;
        }
        writeln!(writer)?;
    }

    Ok(())
}

fn write_value<W: Write>(outcome: &MetricOutcome, writer: &mut W) -> Result<()> {
    match outcome.reported_value() {
        MetricValue::Score(score) => write!(writer, ",{score}")?,
        MetricValue::Devices(scores) => {
            for (_, score) in scores.iter() {
                write!(writer, ",{score}")?;
            }
        }
    }
    Ok(())
}

/// Escape a value for RFC compliant CSV output.
///
/// Wraps the value in double quotes if it contains commas, newlines, or double quotes.
/// Internal double quotes are doubled per the RFC.
fn escape_csv(s: &str) -> Cow<'_, str> {
    if s.contains('"') {
        Cow::Owned(format!("\"{}\"", s.replace('"', "\"\"")))
    } else if s.contains(',') || s.contains('\n') || s.contains('\r') {
        Cow::Owned(format!("\"{s}\""))
    } else {
        Cow::Borrowed(s)
    }
}
