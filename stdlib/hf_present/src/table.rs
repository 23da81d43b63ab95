use hf_model::PatientRecord;

/// Escape text for inclusion in HTML content or attribute values.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// One-row table of the record, columns in scorer order.
pub fn summary_table(record: &PatientRecord) -> String {
    let (head, row): (String, String) = record
        .iter()
        .map(|(spec, value)| {
            (
                format!("<th>{}</th>", escape_html(spec.name)),
                format!(
                    "<td data-field=\"{}\">{}</td>",
                    spec.name,
                    spec.format_value(value)
                ),
            )
        })
        .unzip();
    format!(
        "<table class=\"summary\"><thead><tr><th></th>{head}</tr></thead><tbody><tr><th>0</th>{row}</tr></tbody></table>"
    )
}
