//! Record listing: one row per input record, none dropped.

use super::pdf::{truncate, Canvas, FontStyle, Rgb8};
use super::ReportRecord;

pub const COLUMN_WIDTH_MM: f32 = 45.0;
pub const ROW_HEIGHT_MM: f32 = 10.0;
pub const HEADERS: [&str; 4] = ["Hora", "Real (kW)", "Prediccion (kW)", "Diferencia"];

const FONT_PT: f32 = 10.0;
const CELL_PADDING_MM: f32 = 1.0;
const MAX_CELL_CHARS: usize = 24;

/// Formatted cells of one table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub time: String,
    pub historical: String,
    pub prediction: String,
    pub difference: String,
}

impl TableRow {
    pub fn from_record(record: &ReportRecord) -> Self {
        let historical = record.historical_kw();
        let prediction = record.prediction_kw();
        Self {
            time: record.time.clone().unwrap_or_else(|| "-".to_string()),
            historical: format!("{historical:.2}"),
            prediction: format!("{prediction:.2}"),
            difference: format_difference(historical - prediction),
        }
    }

    pub fn cells(&self) -> [&str; 4] {
        [
            self.time.as_str(),
            self.historical.as_str(),
            self.prediction.as_str(),
            self.difference.as_str(),
        ]
    }
}

/// Signed, two decimals: `+2.00`, `-1.50`.
pub fn format_difference(diff: f64) -> String {
    format!("{diff:+.2}")
}

/// Draws a row of bordered cells with its top edge at `y`.
pub fn draw_row(canvas: &Canvas<'_>, x: f32, y: f32, cells: [&str; 4], style: FontStyle) {
    canvas.set_stroke(Rgb8::BLACK, 0.5);
    canvas.set_text_color(Rgb8::BLACK);
    for (i, cell) in cells.iter().enumerate() {
        let cx = x + i as f32 * COLUMN_WIDTH_MM;
        canvas.rect(cx, y, COLUMN_WIDTH_MM, ROW_HEIGHT_MM);
        canvas.text(
            &truncate(cell, MAX_CELL_CHARS),
            FONT_PT,
            style,
            cx + CELL_PADDING_MM,
            y + ROW_HEIGHT_MM / 2.0 + 1.3,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(5.0, 3.0, "+2.00")]
    #[case(3.0, 4.5, "-1.50")]
    #[case(2.0, 2.0, "+0.00")]
    #[case(1.004, 0.0, "+1.00")]
    fn test_difference_formatting(#[case] historical: f64, #[case] prediction: f64, #[case] expected: &str) {
        let row = TableRow::from_record(&ReportRecord {
            time: Some("10:00".to_string()),
            historical: Some(historical),
            prediction: Some(prediction),
        });
        assert_eq!(row.difference, expected);
    }

    #[test]
    fn test_row_cells() {
        let row = TableRow::from_record(&ReportRecord {
            time: Some("2024-05-01 14:00".to_string()),
            historical: Some(5.0),
            prediction: Some(3.0),
        });
        assert_eq!(row.cells(), ["2024-05-01 14:00", "5.00", "3.00", "+2.00"]);
    }

    #[test]
    fn test_missing_fields_default() {
        let row = TableRow::from_record(&ReportRecord::default());
        assert_eq!(row.cells(), ["-", "0.00", "0.00", "+0.00"]);
    }

    #[test]
    fn test_four_fixed_columns_fit_body() {
        assert_eq!(HEADERS.len(), 4);
        assert!(COLUMN_WIDTH_MM * 4.0 <= super::super::pdf::BODY_WIDTH_MM);
    }
}
