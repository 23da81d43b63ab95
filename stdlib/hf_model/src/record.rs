use serde::{Deserialize, Serialize};

use crate::fields::{collect, FieldSpec, FormState, FIELDS, FIELD_COUNT};

/// One patient's measurements, as fed to the scorer.
///
/// Values are produced by [`collect`] and therefore always lie within the
/// bounds declared in [`FIELDS`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PatientRecord {
    pub age: u32,
    pub anaemia: u8,
    pub creatinine_phosphokinase: u32,
    pub diabetes: u8,
    pub ejection_fraction: u32,
    pub high_blood_pressure: u8,
    pub platelets: f64,
    pub serum_creatinine: f64,
    pub serum_sodium: u32,
    pub sex: u8,
    pub smoking: u8,
    pub time: u32,
}

impl Default for PatientRecord {
    fn default() -> Self {
        collect(&FormState::new())
    }
}

impl PatientRecord {
    /// Build a record from an already clamped row in scorer order.
    pub(crate) fn from_row(row: [f64; FIELD_COUNT]) -> Self {
        Self {
            age: row[0] as u32,
            anaemia: row[1] as u8,
            creatinine_phosphokinase: row[2] as u32,
            diabetes: row[3] as u8,
            ejection_fraction: row[4] as u32,
            high_blood_pressure: row[5] as u8,
            platelets: row[6],
            serum_creatinine: row[7],
            serum_sodium: row[8] as u32,
            sex: row[9] as u8,
            smoking: row[10] as u8,
            time: row[11] as u32,
        }
    }

    /// Feature row in the fixed order the scorer expects.
    pub fn to_features(&self) -> [f64; FIELD_COUNT] {
        [
            f64::from(self.age),
            f64::from(self.anaemia),
            f64::from(self.creatinine_phosphokinase),
            f64::from(self.diabetes),
            f64::from(self.ejection_fraction),
            f64::from(self.high_blood_pressure),
            self.platelets,
            self.serum_creatinine,
            f64::from(self.serum_sodium),
            f64::from(self.sex),
            f64::from(self.smoking),
            f64::from(self.time),
        ]
    }

    /// Pairs each field description with its value, in scorer order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static FieldSpec, f64)> {
        FIELDS.iter().zip(self.to_features())
    }

    /// True when every value lies within its field's declared range.
    pub fn in_bounds(&self) -> bool {
        self.iter().all(|(spec, v)| spec.contains(v))
    }
}
