use crate::Result;
use crate::scoring::ScoreRow;
use std::io::Write;

/// Write one row as a single compact JSON line.
pub fn write_row<W: Write>(row: &ScoreRow, writer: &mut W) -> Result<()> {
    serde_json::to_writer(&mut *writer, row)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

pub fn generate<W: Write>(rows: &[ScoreRow], writer: &mut W) -> Result<()> {
    for row in rows {
        write_row(row, writer)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intake::Category;
    use crate::metrics::{MetricCategory, MetricValue};
    use crate::scoring::{MetricOutcome, MetricStatus};
    use core::time::Duration;

    fn row(name: &str, score: f64) -> ScoreRow {
        let outcome = MetricOutcome {
            name: "license",
            category: MetricCategory::Legal,
            weight: 1.0,
            status: MetricStatus::Scored(MetricValue::Score(score)),
            sentinel: MetricValue::Score(-1.0),
            latency: Duration::from_millis(1),
        };
        ScoreRow::new(name, Category::Model, score, Duration::from_millis(2), vec![outcome])
    }

    #[test]
    fn test_one_compact_line_per_row() {
        let mut output = Vec::new();
        generate(&[row("a", 1.0), row("b", 0.2)], &mut output).unwrap();

        let text = String::from_utf8(output).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(text.ends_with('\n'));
        assert!(!text.contains(": "));
        assert!(lines[0].starts_with(r#"{"name":"a","category":"MODEL","net_score":1.0"#));
        assert!(lines[1].contains(r#""license":0.2,"license_latency":1"#));
    }

    #[test]
    fn test_lines_parse_back() {
        let mut output = Vec::new();
        write_row(&row("whisper-tiny", 0.5), &mut output).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(value["name"], "whisper-tiny");
        assert_eq!(value["net_score_latency"], 2);
    }
}
