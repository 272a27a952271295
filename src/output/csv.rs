//! CSV point series: one `x,y` pair per line, no header, trailing newline.
//!
//! Labels are written bare. A label that contains a comma, quote or line
//! break is quoted so the line still holds exactly two fields.

use std::fs::File;
use std::io;
use std::path::Path;

use color_eyre::eyre::{Context, Result};
use csv::{QuoteStyle, WriterBuilder};

use super::format_number;
use crate::analysis::types::Point;

/// Write `points` to any sink
pub fn write_points_to<W: io::Write>(output: W, points: &[Point]) -> csv::Result<()> {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .quote_style(QuoteStyle::Necessary)
        .from_writer(output);

    for point in points {
        if point.x.contains([',', '"', '\n', '\r']) {
            log::warn!("Point label {:?} needs quoting", point.x);
        }
        writer.write_record([point.x.as_str(), format_number(point.y).as_str()])?;
    }
    writer.flush()?;
    Ok(())
}

pub fn render_points(points: &[Point]) -> Result<String> {
    let mut buf = Vec::new();
    write_points_to(&mut buf, points).context("Failed to render CSV")?;
    String::from_utf8(buf).context("CSV output is not UTF-8")
}

pub fn write_points(path: &Path, points: &[Point]) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create CSV file {}", path.display()))?;
    write_points_to(file, points)
        .with_context(|| format!("Failed to write CSV to {}", path.display()))
}
