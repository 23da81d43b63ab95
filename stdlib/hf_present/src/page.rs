//! Full-page rendering.
//!
//! The page is a sidebar form of range inputs (one per field), the patient
//! summary, a Predict button, and after a prediction the verdict banner and
//! both charts. Moving a slider resubmits the form to `/` so the summary is
//! redrawn on every interaction; the Predict button posts to `/predict`.

use hf_model::{FormState, PatientRecord, PredictionResult};

use crate::charts::{percent_label, BarChart, DonutChart};
use crate::table::{escape_html, summary_table};
use crate::verdict::Verdict;

const STYLE: &str = r#"
body { margin: 0; font-family: system-ui, sans-serif; background-color: #f9f9f9; display: flex; }
aside { width: 320px; min-height: 100vh; padding: 1.5rem; background: #f0f2f6; box-sizing: border-box; }
aside label { display: flex; justify-content: space-between; margin-top: 0.9rem; font-size: 0.9rem; }
aside input[type=range] { width: 100%; accent-color: #d72638; }
main { flex: 1; margin: 1.5rem; padding: 2rem 3rem; background: linear-gradient(to bottom, #ffffff, #ffe6e6); border-radius: 10px; }
h1 { text-align: center; color: #d72638; }
table.summary { border-collapse: collapse; margin: 1rem 0; }
table.summary th, table.summary td { border: 1px solid #ddd; padding: 0.3rem 0.6rem; text-align: center; }
button.predict { color: white; background: #d72638; border: none; border-radius: 8px; height: 3em; width: 100%; font-size: 1rem; cursor: pointer; }
button.predict:hover { background-color: #a21b2d; }
.alert { padding: 1rem; border-radius: 8px; margin: 1rem 0; font-weight: 600; }
.alert-success { background: #d4edda; color: #155724; }
.alert-error { background: #f8d7da; color: #721c24; }
.alert-failure { background: #fff3cd; color: #856404; }
"#;

/// Everything shown for one prediction, in render order.
#[derive(Debug, Clone, PartialEq)]
pub struct Presentation {
    pub summary: String,
    pub verdict: Verdict,
    pub probabilities: [f64; 2],
    pub percentages: [String; 2],
    pub bar_chart: String,
    pub donut_chart: String,
}

/// Lay out a scored record: summary, verdict, bar chart, donut chart.
pub fn present(record: &PatientRecord, result: &PredictionResult) -> Presentation {
    let verdict = Verdict::from(result);
    log::debug!("presenting {verdict} verdict");
    Presentation {
        summary: summary_table(record),
        verdict,
        probabilities: result.probabilities,
        percentages: result.probabilities.map(percent_label),
        bar_chart: BarChart::new(result.probabilities).to_html(),
        donut_chart: DonutChart::new(result.probabilities).to_html(),
    }
}

impl Presentation {
    pub fn verdict_banner(&self) -> String {
        format!(
            "<div class=\"{}\" role=\"alert\" data-verdict=\"{}\">{} {}</div>",
            self.verdict.css_class(),
            self.verdict,
            self.verdict.icon(),
            self.verdict.headline()
        )
    }

    pub fn to_html(&self) -> String {
        format!(
            "<section class=\"summary\"><h2>📋 Patient Summary</h2>{}</section>\
             <section class=\"result\"><h2>🔍 Prediction Result</h2>{}</section>\
             <section class=\"probabilities\"><h2>📊 Probability Chart</h2>{}</section>\
             <section class=\"distribution\"><h2>🧠 Risk Distribution</h2>{}</section>",
            self.summary,
            self.verdict_banner(),
            self.bar_chart,
            self.donut_chart
        )
    }
}

/// What the page shows below the form.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Prediction(Presentation),
    /// Scoring failed; the message is shown instead of a verdict.
    Failure(String),
}

pub struct PageView<'a> {
    pub title: &'a str,
    pub state: &'a FormState,
    pub record: &'a PatientRecord,
    pub outcome: Option<Outcome>,
}

fn render_form(state: &FormState) -> String {
    let mut out = String::from(
        "<form id=\"patient-form\" method=\"get\" action=\"/\" onchange=\"this.submit()\">\
         <h2>🧾 Enter Patient Data</h2>",
    );
    for control in state.controls() {
        let spec = control.spec();
        let value = control.value();
        out.push_str(&format!(
            "<label for=\"f-{name}\">{label}<output id=\"o-{name}\" for=\"f-{name}\">{shown}</output></label>\
             <input type=\"range\" id=\"f-{name}\" name=\"{name}\" min=\"{min}\" max=\"{max}\" step=\"{step}\" value=\"{value}\" \
             oninput=\"document.getElementById('o-{name}').value=this.value\">",
            name = spec.name,
            label = escape_html(spec.label),
            shown = spec.format_value(value),
            min = spec.min,
            max = spec.max,
            step = spec.step,
        ));
    }
    out.push_str("</form>");
    out
}

pub fn render_page(view: &PageView<'_>) -> String {
    let title = escape_html(view.title);
    let body = match &view.outcome {
        Some(Outcome::Prediction(presentation)) => presentation.to_html(),
        Some(Outcome::Failure(message)) => format!(
            "<section class=\"summary\"><h2>📋 Patient Summary</h2>{}</section>\
             <div class=\"alert alert-failure\" role=\"alert\">Prediction failed: {}</div>",
            summary_table(view.record),
            escape_html(message)
        ),
        None => format!(
            "<section class=\"summary\"><h2>📋 Patient Summary</h2>{}</section>",
            summary_table(view.record)
        ),
    };

    format!(
        "<!DOCTYPE html>\n<html lang=\"en\"><head><meta charset=\"utf-8\">\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\
         <title>{title}</title><style>{STYLE}</style></head>\
         <body><aside>{form}</aside><main><h1>💓 {title} 💓</h1>\
         <button class=\"predict\" type=\"submit\" form=\"patient-form\" formmethod=\"post\" formaction=\"/predict\">💡 Predict Heart Risk</button>\
         {body}</main></body></html>\n",
        form = render_form(view.state),
    )
}
