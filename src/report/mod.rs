//! Consumption Report Rendering
//!
//! Builds the downloadable PDF report from caller-supplied records:
//! - a generation timestamp line
//! - a chart of the trailing `chart_window` records (historical vs predicted)
//! - a table listing every record with the signed difference
//!
//! Rendering is split into a pure [`ReportPlan`] and the PDF drawing pass so
//! the layout decisions can be checked without decoding PDF output. The chart
//! is drawn directly as page vector graphics; nothing touches the filesystem.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub mod chart;
pub mod pdf;
pub mod table;

pub use chart::ChartData;
pub use table::{format_difference, TableRow};

use crate::config::ReportConfig;
use pdf::{FontStyle, ReportDocument, BODY_WIDTH_MM, MARGIN_MM};

const DOCUMENT_TITLE: &str = "ElectrIA - Reporte de Consumo";
const CHART_HEIGHT_MM: f32 = 95.0;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("PDF backend error: {0}")]
    Pdf(String),
}

/// One point of the load history, as sent by the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportRecord {
    pub time: Option<String>,
    pub historical: Option<f64>,
    pub prediction: Option<f64>,
}

impl ReportRecord {
    pub fn historical_kw(&self) -> f64 {
        self.historical.unwrap_or(0.0)
    }

    pub fn prediction_kw(&self) -> f64 {
        self.prediction.unwrap_or(0.0)
    }
}

/// What goes on the pages, before any drawing.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportPlan {
    pub generated_at: NaiveDateTime,
    pub chart: Option<ChartData>,
    pub rows: Vec<TableRow>,
}

impl ReportPlan {
    pub fn new(records: &[ReportRecord], generated_at: NaiveDateTime, cfg: &ReportConfig) -> Self {
        Self {
            generated_at,
            chart: ChartData::from_records(records, cfg.chart_window),
            rows: records.iter().map(TableRow::from_record).collect(),
        }
    }

    pub fn timestamp_line(&self) -> String {
        format!(
            "Fecha de Generacion: {}",
            self.generated_at.format("%Y-%m-%d %H:%M:%S")
        )
    }
}

#[derive(Debug, Clone)]
pub struct RenderedReport {
    pub bytes: Vec<u8>,
    pub pages: usize,
}

#[derive(Debug, Clone, Default)]
pub struct ReportRenderer {
    cfg: ReportConfig,
}

impl ReportRenderer {
    pub fn new(cfg: ReportConfig) -> Self {
        Self { cfg }
    }

    pub fn plan(&self, records: &[ReportRecord], generated_at: NaiveDateTime) -> ReportPlan {
        ReportPlan::new(records, generated_at, &self.cfg)
    }

    pub fn render(&self, records: &[ReportRecord], generated_at: NaiveDateTime) -> Result<RenderedReport, ReportError> {
        self.render_plan(&self.plan(records, generated_at))
    }

    pub fn render_plan(&self, plan: &ReportPlan) -> Result<RenderedReport, ReportError> {
        let mut doc = ReportDocument::new(DOCUMENT_TITLE)?;

        doc.canvas()
            .text(&plan.timestamp_line(), 12.0, FontStyle::Regular, MARGIN_MM, doc.cursor() + 7.0);
        doc.advance(15.0);

        if let Some(chart) = &plan.chart {
            doc.ensure_space(CHART_HEIGHT_MM);
            chart.draw(&doc.canvas(), MARGIN_MM, doc.cursor(), BODY_WIDTH_MM, CHART_HEIGHT_MM);
            doc.advance(CHART_HEIGHT_MM + 10.0);
        }

        doc.ensure_space(table::ROW_HEIGHT_MM);
        table::draw_row(&doc.canvas(), MARGIN_MM, doc.cursor(), table::HEADERS, FontStyle::Bold);
        doc.advance(table::ROW_HEIGHT_MM);

        for row in &plan.rows {
            doc.ensure_space(table::ROW_HEIGHT_MM);
            table::draw_row(&doc.canvas(), MARGIN_MM, doc.cursor(), row.cells(), FontStyle::Regular);
            doc.advance(table::ROW_HEIGHT_MM);
        }

        let pages = doc.page_count();
        let bytes = doc.finish()?;
        debug!(
            rows = plan.rows.len(),
            chart_points = plan.chart.as_ref().map_or(0, ChartData::len),
            pages,
            size = bytes.len(),
            "report rendered"
        );
        Ok(RenderedReport { bytes, pages })
    }
}

/// Attachment name for a report generated at `at`.
pub fn report_filename(at: NaiveDateTime) -> String {
    format!("Reporte_ElectrIA_{}.pdf", at.format("%Y%m%d_%H%M"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(14, 5, 30)
            .unwrap()
    }

    fn records(n: usize) -> Vec<ReportRecord> {
        (0..n)
            .map(|i| ReportRecord {
                time: Some(format!("{:02}:00", i % 24)),
                historical: Some(1.0 + (i % 7) as f64 * 0.4),
                prediction: Some(1.2 + (i % 5) as f64 * 0.3),
            })
            .collect()
    }

    #[test]
    fn test_chart_decimated_table_exhaustive() {
        let renderer = ReportRenderer::default();
        let plan = renderer.plan(&records(40), at());

        assert_eq!(plan.chart.as_ref().map(ChartData::len), Some(30));
        assert_eq!(plan.rows.len(), 40);
    }

    #[test]
    fn test_empty_report_renders() {
        let renderer = ReportRenderer::default();
        let plan = renderer.plan(&[], at());
        assert!(plan.chart.is_none());
        assert!(plan.rows.is_empty());

        let report = renderer.render(&[], at()).unwrap();
        assert!(report.bytes.starts_with(b"%PDF"));
        assert_eq!(report.pages, 1);
    }

    #[test]
    fn test_long_table_spills_onto_new_pages() {
        let renderer = ReportRenderer::default();
        let report = renderer.render(&records(40), at()).unwrap();

        // page 1: 12 rows below the chart, page 2: 25 rows, page 3: the rest
        assert_eq!(report.pages, 3);
        assert!(report.bytes.starts_with(b"%PDF"));
    }

    /// No `NaN` or infinite operands written into the page content.
    fn rendered_numbers_are_finite(bytes: &[u8]) -> bool {
        let contains = |needle: &[u8]| bytes.windows(needle.len()).any(|w| w == needle);
        !contains(b"NaN") && !contains(b" inf ") && !contains(b"-inf ") && !contains(b" inf\n")
    }

    #[test]
    fn test_large_flat_series_renders() {
        let data = vec![ReportRecord {
            time: Some("00:00".to_string()),
            historical: Some(1e16),
            prediction: Some(1e16),
        }];
        let report = ReportRenderer::default().render(&data, at()).unwrap();
        assert!(report.bytes.starts_with(b"%PDF"));
        assert!(rendered_numbers_are_finite(&report.bytes));
    }

    #[test]
    fn test_overflowing_range_renders_finite_coordinates() {
        let data = vec![
            ReportRecord {
                time: Some("00:00".to_string()),
                historical: Some(1e308),
                prediction: Some(-1e308),
            },
            ReportRecord {
                time: Some("01:00".to_string()),
                historical: Some(0.0),
                prediction: Some(1.0),
            },
        ];
        let report = ReportRenderer::default().render(&data, at()).unwrap();
        assert!(report.bytes.starts_with(b"%PDF"));
        assert!(rendered_numbers_are_finite(&report.bytes));
    }

    #[test]
    fn test_chart_window_configurable() {
        let renderer = ReportRenderer::new(ReportConfig { chart_window: 5 });
        let plan = renderer.plan(&records(12), at());
        assert_eq!(plan.chart.map(|c| c.len()), Some(5));
        assert_eq!(plan.rows.len(), 12);
    }

    #[test]
    fn test_timestamp_line() {
        let plan = ReportRenderer::default().plan(&[], at());
        assert_eq!(plan.timestamp_line(), "Fecha de Generacion: 2024-03-09 14:05:30");
    }

    #[test]
    fn test_report_filename() {
        assert_eq!(report_filename(at()), "Reporte_ElectrIA_20240309_1405.pdf");
    }

    #[test]
    fn test_record_deserializes_with_nulls() {
        let record: ReportRecord =
            serde_json::from_str(r#"{"time": "08:00", "historical": null}"#).unwrap();
        assert_eq!(record.historical_kw(), 0.0);
        assert_eq!(record.prediction_kw(), 0.0);
        assert_eq!(record.time.as_deref(), Some("08:00"));
    }
}
