//! Rendering of heart-failure risk predictions.
//!
//! [`present`] turns a record and its [`hf_model::PredictionResult`] into the
//! summary table, verdict banner, bar chart and donut chart; [`render_page`]
//! wraps them in the interactive form page.

pub mod charts;
pub mod page;
pub mod table;
pub mod verdict;

pub use charts::{percent_label, BarChart, ChartError, DonutChart, CATEGORIES, COLORS};
pub use page::{present, render_page, Outcome, PageView, Presentation};
pub use table::{escape_html, summary_table};
pub use verdict::Verdict;
