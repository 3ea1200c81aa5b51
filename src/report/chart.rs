//! Historical vs predicted load chart, drawn as vector graphics.

use super::pdf::{text_width_mm, truncate, Canvas, FontStyle, Rgb8};
use super::ReportRecord;

pub const HISTORICAL_LABEL: &str = "Consumo Real (kW)";
pub const PREDICTION_LABEL: &str = "Prediccion IA (kW)";
const X_AXIS_LABEL: &str = "Hora";
const Y_AXIS_LABEL: &str = "Potencia (kW)";

/// Plotted values are clamped to this magnitude; the table keeps the exact figures.
pub const PLOT_LIMIT_KW: f64 = 1e12;

const TICK_FONT_PT: f32 = 6.5;
const MAX_TICK_CHARS: usize = 16;

/// Trailing window of records to plot.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    pub title: String,
    pub labels: Vec<String>,
    pub historical: Vec<f64>,
    pub prediction: Vec<f64>,
}

impl ChartData {
    /// Last `window` records, or `None` when there is nothing to plot.
    pub fn from_records(records: &[ReportRecord], window: usize) -> Option<Self> {
        if records.is_empty() || window == 0 {
            return None;
        }
        let tail = &records[records.len().saturating_sub(window)..];
        Some(Self {
            title: format!("Comparativa: Real vs Prediccion (Ultimos {window} registros)"),
            labels: tail.iter().map(|r| r.time.clone().unwrap_or_default()).collect(),
            historical: tail.iter().map(ReportRecord::historical_kw).collect(),
            prediction: tail.iter().map(ReportRecord::prediction_kw).collect(),
        })
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn value_axis(&self) -> ValueAxis {
        let (min, max) = self
            .historical
            .iter()
            .chain(&self.prediction)
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
        ValueAxis::fit(min, max)
    }

    /// Draws the chart into the `width` × `height` box at (`x`, `y`).
    pub fn draw(&self, canvas: &Canvas<'_>, x: f32, y: f32, width: f32, height: f32) {
        let plot = PlotArea {
            left: x + 16.0,
            right: x + width - 4.0,
            top: y + 10.0,
            bottom: y + height - 24.0,
        };
        let axis = self.value_axis();

        canvas.set_text_color(Rgb8::BLACK);
        canvas.text_centered(&self.title, 11.0, FontStyle::Regular, plot.center_x(), y + 6.0);

        // grid and value ticks
        canvas.set_stroke(Rgb8::GRID, 0.4);
        for tick in axis.ticks() {
            let ty = plot.y_at(tick, &axis);
            canvas.line((plot.left, ty), (plot.right, ty));
        }
        let xs: Vec<f32> = (0..self.len()).map(|i| plot.x_at(i, self.len())).collect();
        for &tx in &xs {
            canvas.line((tx, plot.top), (tx, plot.bottom));
        }

        for tick in axis.ticks() {
            let label = axis.format_tick(tick);
            canvas.text_right(&label, TICK_FONT_PT, FontStyle::Regular, plot.left - 1.5, plot.y_at(tick, &axis) + 0.8);
        }

        // category ticks, rotated so that each label ends under its point
        for (label, &tx) in self.labels.iter().zip(&xs) {
            let label = truncate(label, MAX_TICK_CHARS);
            let reach = text_width_mm(&label, TICK_FONT_PT) * std::f32::consts::FRAC_1_SQRT_2;
            canvas.text_rotated(&label, TICK_FONT_PT, FontStyle::Regular, tx - reach, plot.bottom + 3.0 + reach, 45.0);
        }

        canvas.text_centered(X_AXIS_LABEL, 9.0, FontStyle::Regular, plot.center_x(), y + height - 1.5);
        canvas.text_rotated(
            Y_AXIS_LABEL,
            9.0,
            FontStyle::Regular,
            x + 4.0,
            (plot.top + plot.bottom) / 2.0 + text_width_mm(Y_AXIS_LABEL, 9.0) / 2.0,
            90.0,
        );

        canvas.set_stroke(Rgb8::BLACK, 0.6);
        canvas.rect(plot.left, plot.top, plot.right - plot.left, plot.bottom - plot.top);

        let historical: Vec<(f32, f32)> = xs
            .iter()
            .zip(&self.historical)
            .map(|(&px, &v)| (px, plot.y_at(v, &axis)))
            .collect();
        let prediction: Vec<(f32, f32)> = xs
            .iter()
            .zip(&self.prediction)
            .map(|(&px, &v)| (px, plot.y_at(v, &axis)))
            .collect();

        canvas.set_stroke(Rgb8::BLUE, 1.2);
        canvas.polyline(&historical, false);
        for &(px, py) in &historical {
            canvas.marker(px, py, 0.8);
        }

        canvas.set_stroke(Rgb8::ORANGE, 1.2);
        canvas.set_dash(Some((4, 2)));
        canvas.polyline(&prediction, false);
        canvas.set_dash(None);

        self.draw_legend(canvas, &plot);
    }

    fn draw_legend(&self, canvas: &Canvas<'_>, plot: &PlotArea) {
        let (w, h) = (44.0, 11.0);
        let (lx, ly) = (plot.right - w - 2.0, plot.top + 2.0);

        canvas.set_stroke(Rgb8::GRID, 0.5);
        canvas.rect(lx, ly, w, h);

        let rows = [
            (HISTORICAL_LABEL, Rgb8::BLUE, None, ly + 3.5),
            (PREDICTION_LABEL, Rgb8::ORANGE, Some((4, 2)), ly + 8.0),
        ];
        for (label, color, dash, row_y) in rows {
            canvas.set_stroke(color, 1.2);
            canvas.set_dash(dash);
            canvas.line((lx + 2.0, row_y), (lx + 10.0, row_y));
            if dash.is_none() {
                canvas.marker(lx + 6.0, row_y, 0.8);
            }
            canvas.set_dash(None);
            canvas.text(label, 7.0, FontStyle::Regular, lx + 12.0, row_y + 1.0);
        }
    }
}

/// Plot rectangle in page millimetres.
#[derive(Debug, Clone, Copy)]
struct PlotArea {
    left: f32,
    right: f32,
    top: f32,
    bottom: f32,
}

impl PlotArea {
    fn center_x(&self) -> f32 {
        (self.left + self.right) / 2.0
    }

    /// Categorical x position with a 5% inset on both sides.
    fn x_at(&self, index: usize, count: usize) -> f32 {
        let width = self.right - self.left;
        if count <= 1 {
            return self.left + width / 2.0;
        }
        self.left + width * (0.05 + 0.9 * index as f32 / (count - 1) as f32)
    }

    /// Out-of-axis values are pinned to the plot edge.
    fn y_at(&self, value: f64, axis: &ValueAxis) -> f32 {
        let value = value.clamp(axis.min, axis.max);
        let frac = ((value - axis.min) / (axis.max - axis.min)) as f32;
        self.bottom - frac * (self.bottom - self.top)
    }
}

/// Value axis snapped to round tick steps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueAxis {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl ValueAxis {
    const TARGET_TICKS: f64 = 5.0;
    const MAX_DECIMALS: usize = 6;
    const FALLBACK: ValueAxis = ValueAxis {
        min: 0.0,
        max: 1.0,
        step: 0.2,
    };

    /// Always yields finite bounds with `min < max` and a positive step.
    pub fn fit(min: f64, max: f64) -> Self {
        let (mut lo, mut hi) = if min.is_finite() && max.is_finite() && min <= max {
            (
                min.clamp(-PLOT_LIMIT_KW, PLOT_LIMIT_KW),
                max.clamp(-PLOT_LIMIT_KW, PLOT_LIMIT_KW),
            )
        } else {
            (0.0, 1.0)
        };
        if hi - lo < 1e-9 {
            // flat series: widen in proportion to the value so large levels still separate
            let pad = (lo.abs() * 0.05).max(1.0);
            lo -= pad;
            hi += pad;
        }

        let step = nice_step((hi - lo) / Self::TARGET_TICKS);
        if !step.is_finite() || step <= 0.0 {
            return Self::FALLBACK;
        }
        let axis = Self {
            min: (lo / step).floor() * step,
            max: (hi / step).ceil() * step,
            step,
        };
        if axis.min.is_finite() && axis.max.is_finite() && axis.min < axis.max {
            axis
        } else {
            Self::FALLBACK
        }
    }

    pub fn ticks(&self) -> Vec<f64> {
        let count = ((self.max - self.min) / self.step).round() as usize;
        (0..=count).map(|i| self.min + i as f64 * self.step).collect()
    }

    pub fn format_tick(&self, value: f64) -> String {
        let decimals = if self.step >= 1.0 {
            0
        } else {
            ((-self.step.log10()).ceil().max(0.0) as usize).min(Self::MAX_DECIMALS)
        };
        format!("{value:.decimals$}")
    }
}

/// Rounds `raw` up to 1, 2 or 5 times a power of ten.
fn nice_step(raw: f64) -> f64 {
    let magnitude = 10f64.powi(raw.log10().floor() as i32);
    let normalized = raw / magnitude;
    let nice = if normalized <= 1.0 {
        1.0
    } else if normalized <= 2.0 {
        2.0
    } else if normalized <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}
