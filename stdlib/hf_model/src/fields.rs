//! Input field definitions and bounded controls.
//!
//! Every patient measurement is entered through a [`Control`] that clamps the
//! attempted value into the field's closed range, so a collected record can
//! never hold an out-of-range value.

use serde::Serialize;
use serde_json::{Map, Value as JsonValue};

use crate::record::PatientRecord;

/// Number of input fields in a patient record.
pub const FIELD_COUNT: usize = 12;

/// Field names in the order the scorer consumes them.
pub const FIELD_NAMES: [&str; FIELD_COUNT] = [
    "age",
    "anaemia",
    "creatinine_phosphokinase",
    "diabetes",
    "ejection_fraction",
    "high_blood_pressure",
    "platelets",
    "serum_creatinine",
    "serum_sodium",
    "sex",
    "smoking",
    "time",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// Whole number within a range.
    Integer,
    /// 0 = no, 1 = yes.
    Binary,
    /// Continuous measurement.
    Float,
}

/// Static description of one input field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub min: f64,
    pub max: f64,
    pub default: f64,
    /// Granularity of the slider rendered for this field.
    pub step: f64,
}

impl FieldSpec {
    const fn integer(name: &'static str, label: &'static str, min: f64, max: f64, default: f64) -> Self {
        Self {
            name,
            label,
            kind: FieldKind::Integer,
            min,
            max,
            default,
            step: 1.0,
        }
    }

    const fn binary(name: &'static str, label: &'static str, default: f64) -> Self {
        Self {
            name,
            label,
            kind: FieldKind::Binary,
            min: 0.0,
            max: 1.0,
            default,
            step: 1.0,
        }
    }

    const fn float(
        name: &'static str,
        label: &'static str,
        min: f64,
        max: f64,
        default: f64,
        step: f64,
    ) -> Self {
        Self {
            name,
            label,
            kind: FieldKind::Float,
            min,
            max,
            default,
            step,
        }
    }

    /// Bring an attempted value into range.
    ///
    /// NaN falls back to the default; integer and binary fields round to the
    /// nearest whole number after clamping.
    pub fn clamp(&self, raw: f64) -> f64 {
        if raw.is_nan() {
            return self.default;
        }
        let clamped = raw.clamp(self.min, self.max);
        match self.kind {
            FieldKind::Integer | FieldKind::Binary => clamped.round(),
            FieldKind::Float => clamped,
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }

    /// Human-readable rendering of a value of this field.
    pub fn format_value(&self, value: f64) -> String {
        match self.kind {
            FieldKind::Integer | FieldKind::Binary => format!("{value:.0}"),
            FieldKind::Float => format!("{value:.2}"),
        }
    }
}

/// The twelve input fields, in scorer order.
pub static FIELDS: [FieldSpec; FIELD_COUNT] = [
    FieldSpec::integer("age", "Age", 20.0, 100.0, 60.0),
    FieldSpec::binary("anaemia", "Anaemia (1 = Yes, 0 = No)", 0.0),
    FieldSpec::integer(
        "creatinine_phosphokinase",
        "Creatinine Phosphokinase",
        20.0,
        8000.0,
        250.0,
    ),
    FieldSpec::binary("diabetes", "Diabetes (1 = Yes, 0 = No)", 0.0),
    FieldSpec::integer("ejection_fraction", "Ejection Fraction (%)", 10.0, 80.0, 38.0),
    FieldSpec::binary(
        "high_blood_pressure",
        "High Blood Pressure (1 = Yes, 0 = No)",
        0.0,
    ),
    FieldSpec::float("platelets", "Platelets count", 10_000.0, 900_000.0, 250_000.0, 1000.0),
    FieldSpec::float("serum_creatinine", "Serum Creatinine", 0.1, 10.0, 1.1, 0.01),
    FieldSpec::integer("serum_sodium", "Serum Sodium", 100.0, 150.0, 137.0),
    FieldSpec::binary("sex", "Sex (1 = Male, 0 = Female)", 1.0),
    FieldSpec::binary("smoking", "Smoking (1 = Yes, 0 = No)", 0.0),
    FieldSpec::integer("time", "Follow-up Period (days)", 0.0, 300.0, 120.0),
];

/// Look up a field by name.
pub fn field(name: &str) -> Option<&'static FieldSpec> {
    FIELDS.iter().find(|f| f.name == name)
}

/// A bounded input holding the current value of one field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Control {
    spec: &'static FieldSpec,
    value: f64,
}

impl Control {
    pub fn new(spec: &'static FieldSpec) -> Self {
        Self {
            spec,
            value: spec.default,
        }
    }

    pub fn spec(&self) -> &'static FieldSpec {
        self.spec
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn set(&mut self, raw: f64) {
        self.value = self.spec.clamp(raw);
    }

    /// Parse and set a textual value. Returns `false` and keeps the current
    /// value when the text is not a number.
    pub fn set_str(&mut self, raw: &str) -> bool {
        match raw.trim().parse::<f64>() {
            Ok(v) => {
                self.set(v);
                true
            }
            Err(_) => false,
        }
    }

    pub fn reset(&mut self) {
        self.value = self.spec.default;
    }
}

/// Widget state for the whole form: one control per field.
#[derive(Debug, Clone, PartialEq)]
pub struct FormState {
    controls: [Control; FIELD_COUNT],
}

impl Default for FormState {
    fn default() -> Self {
        Self::new()
    }
}

impl FormState {
    pub fn new() -> Self {
        Self {
            controls: std::array::from_fn(|i| Control::new(&FIELDS[i])),
        }
    }

    /// Build a state from submitted `name=value` pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut state = Self::new();
        state.apply_pairs(pairs);
        state
    }

    pub fn controls(&self) -> &[Control] {
        &self.controls
    }

    pub fn control(&self, name: &str) -> Option<&Control> {
        self.controls.iter().find(|c| c.spec.name == name)
    }

    fn control_mut(&mut self, name: &str) -> Option<&mut Control> {
        self.controls.iter_mut().find(|c| c.spec.name == name)
    }

    /// Move one control. Unknown names are ignored and reported as `false`.
    pub fn set(&mut self, name: &str, raw: f64) -> bool {
        match self.control_mut(name) {
            Some(control) => {
                control.set(raw);
                true
            }
            None => false,
        }
    }

    /// Apply textual pairs as submitted by an HTML form or query string.
    pub fn apply_pairs<I, K, V>(&mut self, pairs: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (name, raw) in pairs {
            let (name, raw) = (name.as_ref(), raw.as_ref());
            match self.control_mut(name) {
                Some(control) => {
                    if !control.set_str(raw) {
                        log::debug!("ignoring non-numeric value {raw:?} for {name}");
                    }
                }
                None => log::debug!("ignoring unknown field {name}"),
            }
        }
    }

    /// Apply a JSON object of field values. Numbers, numeric strings and
    /// booleans are accepted; anything else leaves the control untouched.
    pub fn apply_json(&mut self, values: &Map<String, JsonValue>) {
        for (name, value) in values {
            let Some(control) = self.control_mut(name) else {
                log::debug!("ignoring unknown field {name}");
                continue;
            };
            match value {
                JsonValue::Number(n) => {
                    if let Some(x) = n.as_f64() {
                        control.set(x);
                    }
                }
                JsonValue::String(s) => {
                    control.set_str(s);
                }
                JsonValue::Bool(b) => control.set(if *b { 1.0 } else { 0.0 }),
                other => log::debug!("ignoring value {other} for {name}"),
            }
        }
    }

    /// Current values in scorer order.
    pub fn values(&self) -> [f64; FIELD_COUNT] {
        std::array::from_fn(|i| self.controls[i].value)
    }
}

/// Read the current widget state into a patient record.
pub fn collect(state: &FormState) -> PatientRecord {
    PatientRecord::from_row(state.values())
}
