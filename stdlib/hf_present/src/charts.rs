//! Charts of the two class probabilities, drawn with plotters into inline SVG.
//!
//! Each chart is wrapped in a `<figure>` whose `data-values` attribute holds
//! the plotted probabilities, so the page and its tests can read them back
//! without parsing the drawing.

use plotters::coord::ranged1d::SegmentValue;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::element::Pie;
use plotters::prelude::*;
use plotters_svg::SVGBackend;
use thiserror::Error;

use crate::table::escape_html;

/// Category names, in probability-vector order.
pub const CATEGORIES: [&str; 2] = ["No Heart Failure", "Heart Failure"];

/// Fill colors per category: green for no failure, red for failure.
pub const COLORS: [RGBColor; 2] = [RGBColor(0x28, 0xa7, 0x45), RGBColor(0xdc, 0x35, 0x45)];

pub const CHART_WIDTH: u32 = 700;
pub const CHART_HEIGHT: u32 = 400;

const DARK: RGBColor = RGBColor(0x11, 0x11, 0x11);
const GRID: RGBColor = RGBColor(0x33, 0x33, 0x33);
const INK: RGBColor = RGBColor(0xcc, 0xcc, 0xcc);

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("nothing to plot: probabilities sum to {0}")]
    Empty(f64),

    #[error("chart backend failed: {0}")]
    Backend(String),
}

impl<E: std::error::Error + Send + Sync> From<DrawingAreaErrorKind<E>> for ChartError {
    fn from(e: DrawingAreaErrorKind<E>) -> Self {
        ChartError::Backend(e.to_string())
    }
}

/// `p * 100` with exactly two decimals, e.g. `0.82 -> "82.00%"`.
pub fn percent_label(p: f64) -> String {
    format!("{:.2}%", p * 100.0)
}

fn category_name(v: &SegmentValue<u32>) -> String {
    match v {
        SegmentValue::CenterOf(i) => CATEGORIES
            .get(*i as usize)
            .map(|name| name.to_string())
            .unwrap_or_default(),
        _ => String::new(),
    }
}

/// Wrap a rendered chart for the page. A rendering failure is logged and
/// shown in place of the drawing.
fn figure(kind: &str, values: [f64; 2], svg: Result<String, ChartError>) -> String {
    let body = match svg {
        Ok(svg) => svg,
        Err(e) => {
            log::error!("{kind} chart: {e}");
            format!(
                "<p class=\"chart-error\">chart unavailable: {}</p>",
                escape_html(&e.to_string())
            )
        }
    };
    format!(
        "<figure class=\"chart {kind}-chart\" data-values=\"{:.4} {:.4}\">{body}</figure>",
        values[0], values[1]
    )
}

/// Bar chart of the probability pair on a dark background, each bar
/// annotated with its [`percent_label`].
#[derive(Debug, Clone, PartialEq)]
pub struct BarChart {
    pub values: [f64; 2],
    pub width: u32,
    pub height: u32,
}

impl BarChart {
    pub fn new(values: [f64; 2]) -> Self {
        Self {
            values,
            width: CHART_WIDTH,
            height: CHART_HEIGHT,
        }
    }

    fn heights(&self) -> [f64; 2] {
        self.values
            .map(|p| if p.is_finite() { p.clamp(0.0, 1.0) } else { 0.0 })
    }

    pub fn to_svg(&self) -> Result<String, ChartError> {
        let heights = self.heights();
        let mut svg = String::new();
        {
            let root =
                SVGBackend::with_string(&mut svg, (self.width, self.height)).into_drawing_area();
            root.fill(&DARK)?;
            let mut chart = ChartBuilder::on(&root)
                .margin(20)
                .x_label_area_size(50)
                .y_label_area_size(60)
                .build_cartesian_2d((0u32..2u32).into_segmented(), 0f64..1f64)?;
            chart
                .configure_mesh()
                .disable_x_mesh()
                .bold_line_style(GRID)
                .light_line_style(DARK)
                .axis_style(INK)
                .y_labels(6)
                .x_label_formatter(&category_name)
                .y_label_formatter(&|v| format!("{v:.1}"))
                .label_style(("sans-serif", 13).into_font().color(&INK))
                .axis_desc_style(("sans-serif", 14).into_font().color(&INK))
                .x_desc("Condition")
                .y_desc("Probability")
                .draw()?;

            chart.draw_series(heights.iter().enumerate().map(|(i, &p)| {
                let slot = i as u32;
                let mut bar = Rectangle::new(
                    [
                        (SegmentValue::Exact(slot), 0.0),
                        (SegmentValue::Exact(slot + 1), p),
                    ],
                    COLORS[i].filled(),
                );
                bar.set_margin(0, 0, 50, 50);
                bar
            }))?;
            chart.draw_series(heights.iter().enumerate().map(|(i, &p)| {
                EmptyElement::at((SegmentValue::CenterOf(i as u32), p))
                    + Text::new(
                        percent_label(p),
                        (-26, -22),
                        ("sans-serif", 15).into_font().color(&WHITE),
                    )
            }))?;
            root.present()?;
        }
        Ok(svg)
    }

    pub fn to_html(&self) -> String {
        figure("bar", self.heights(), self.to_svg())
    }
}

/// Donut chart: a pie with a hole of `hole` times the outer radius. Slice
/// labels carry the category and its share.
#[derive(Debug, Clone, PartialEq)]
pub struct DonutChart {
    pub values: [f64; 2],
    pub width: u32,
    pub height: u32,
    pub hole: f64,
}

impl DonutChart {
    pub fn new(values: [f64; 2]) -> Self {
        Self {
            values,
            width: CHART_WIDTH,
            height: CHART_HEIGHT,
            hole: 0.3,
        }
    }

    /// Shares of the whole, or `None` when there is nothing to divide.
    fn shares(&self) -> Option<[f64; 2]> {
        let sizes = self
            .values
            .map(|p| if p.is_finite() { p.max(0.0) } else { 0.0 });
        let total = sizes[0] + sizes[1];
        (total > 0.0).then(|| sizes.map(|p| p / total))
    }

    pub fn to_svg(&self) -> Result<String, ChartError> {
        let shares = self
            .shares()
            .ok_or(ChartError::Empty(self.values[0] + self.values[1]))?;
        let labels: Vec<String> = CATEGORIES
            .iter()
            .zip(shares)
            .map(|(name, share)| format!("{name} ({})", percent_label(share)))
            .collect();
        let center = ((self.width / 2) as i32, (self.height / 2) as i32);
        let radius = (f64::from(self.width.min(self.height)) / 2.0 - 60.0).max(1.0);
        let colors = COLORS;

        let mut svg = String::new();
        {
            let root =
                SVGBackend::with_string(&mut svg, (self.width, self.height)).into_drawing_area();
            root.fill(&WHITE)?;
            let mut pie = Pie::new(&center, &radius, &shares, &colors, &labels);
            // first slice starts at 12 o'clock
            pie.start_angle(-90.0);
            pie.donut_hole(radius * self.hole.clamp(0.0, 0.95));
            pie.label_style(("sans-serif", 15).into_font().color(&GRID));
            root.draw(&pie)?;
            root.present()?;
        }
        Ok(svg)
    }

    pub fn to_html(&self) -> String {
        figure("donut", self.shares().unwrap_or([0.0; 2]), self.to_svg())
    }
}
