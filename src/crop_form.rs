//! The seven-field crop recommendation form.
//!
//! Fields are edited as free text and only parsed on submit. Range hints are
//! labels for the user; values outside them are still sent.

use thiserror::Error;

use crate::api::PredictionInput;
use crate::api::types::SensorReading;

/// Shown whenever a field is left empty.
pub const INCOMPLETE_MESSAGE: &str = "Please fill in all fields before submitting.";
/// Shown when `/predict` fails.
pub const PREDICTION_FAILED_MESSAGE: &str = "Failed to get crop recommendation. Please try again.";

/// One input of the form, in display order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FormField {
    Nitrogen,
    Phosphorus,
    Potassium,
    Temperature,
    Humidity,
    Ph,
    Rainfall,
}

impl FormField {
    pub const ALL: [FormField; 7] = [
        FormField::Nitrogen,
        FormField::Phosphorus,
        FormField::Potassium,
        FormField::Temperature,
        FormField::Humidity,
        FormField::Ph,
        FormField::Rainfall,
    ];

    fn index(self) -> usize {
        self as usize
    }

    /// Name used on the wire.
    pub fn key(self) -> &'static str {
        match self {
            Self::Nitrogen => "N",
            Self::Phosphorus => "P",
            Self::Potassium => "K",
            Self::Temperature => "temperature",
            Self::Humidity => "humidity",
            Self::Ph => "ph",
            Self::Rainfall => "rainfall",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Nitrogen => "Nitrogen (N)",
            Self::Phosphorus => "Phosphorus (P)",
            Self::Potassium => "Potassium (K)",
            Self::Temperature => "Temperature",
            Self::Humidity => "Humidity",
            Self::Ph => "pH Level",
            Self::Rainfall => "Rainfall",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            Self::Nitrogen | Self::Phosphorus | Self::Potassium => "kg/ha",
            Self::Temperature => "°C",
            Self::Humidity => "%",
            Self::Ph => "",
            Self::Rainfall => "mm",
        }
    }

    /// Typical range, shown next to the field.
    pub fn typical_range(self) -> (f64, f64) {
        match self {
            Self::Nitrogen => (0.0, 140.0),
            Self::Phosphorus => (5.0, 145.0),
            Self::Potassium => (5.0, 205.0),
            Self::Temperature => (8.8, 43.7),
            Self::Humidity => (14.0, 100.0),
            Self::Ph => (3.5, 10.0),
            Self::Rainfall => (20.0, 300.0),
        }
    }

    pub fn hint(self) -> String {
        let (low, high) = self.typical_range();
        let unit = self.unit();
        if unit.is_empty() {
            format!("Range: {low}-{high}")
        } else {
            format!("Range: {low}-{high} {unit}")
        }
    }

    fn from_reading(self, reading: &SensorReading) -> Option<f64> {
        match self {
            Self::Nitrogen => reading.n,
            Self::Phosphorus => reading.p,
            Self::Potassium => reading.k,
            Self::Temperature => reading.temperature,
            Self::Humidity => reading.humidity,
            Self::Ph => reading.ph,
            Self::Rainfall => reading.rainfall,
        }
    }
}

/// Why the form could not be turned into a [`PredictionInput`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormError {
    #[error("Please fill in all fields before submitting.")]
    Incomplete { missing: Vec<FormField> },
    #[error("{} must be a number, got \"{value}\"", .field.label())]
    NotNumeric { field: FormField, value: String },
}

impl FormError {
    /// Field to highlight in the form.
    pub fn first_field(&self) -> Option<FormField> {
        match self {
            Self::Incomplete { missing } => missing.first().copied(),
            Self::NotNumeric { field, .. } => Some(*field),
        }
    }
}

/// Lifecycle of the form view.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FormPhase {
    #[default]
    Editing,
    Submitting,
}

/// Raw text of every field.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CropForm {
    values: [String; 7],
}

impl CropForm {
    pub fn value(&self, field: FormField) -> &str {
        &self.values[field.index()]
    }

    pub fn value_mut(&mut self, field: FormField) -> &mut String {
        &mut self.values[field.index()]
    }

    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        self.values[field.index()] = value.into();
    }

    /// Parse all fields. Does not modify the form.
    pub fn validate(&self) -> Result<PredictionInput, FormError> {
        let missing: Vec<FormField> = FormField::ALL
            .into_iter()
            .filter(|field| self.value(*field).trim().is_empty())
            .collect();
        if !missing.is_empty() {
            return Err(FormError::Incomplete { missing });
        }
        let parse = |field: FormField| -> Result<f64, FormError> {
            let raw = self.value(field).trim();
            raw.parse::<f64>()
                .ok()
                .filter(|value| value.is_finite())
                .ok_or_else(|| FormError::NotNumeric {
                    field,
                    value: raw.to_string(),
                })
        };
        Ok(PredictionInput {
            n: parse(FormField::Nitrogen)?,
            p: parse(FormField::Phosphorus)?,
            k: parse(FormField::Potassium)?,
            temperature: parse(FormField::Temperature)?,
            humidity: parse(FormField::Humidity)?,
            ph: parse(FormField::Ph)?,
            rainfall: parse(FormField::Rainfall)?,
        })
    }

    /// Overwrite fields present in `reading`; returns how many changed.
    pub fn apply_sensor_reading(&mut self, reading: &SensorReading) -> usize {
        let mut applied = 0;
        for field in FormField::ALL {
            if let Some(value) = field.from_reading(reading) {
                self.set(field, value.to_string());
                applied += 1;
            }
        }
        applied
    }

    pub fn clear(&mut self) {
        self.values = Default::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> CropForm {
        let mut form = CropForm::default();
        for (field, value) in FormField::ALL
            .into_iter()
            .zip(["90", "42", "43", "20.8", "82", "6.5", "202.9"])
        {
            form.set(field, value);
        }
        form
    }

    #[test]
    fn complete_form_parses_every_field() {
        let input = filled().validate().unwrap();
        assert_eq!(input.n, 90.0);
        assert_eq!(input.k, 43.0);
        assert_eq!(input.ph, 6.5);
        assert_eq!(input.rainfall, 202.9);
    }

    #[test]
    fn any_empty_field_blocks_and_leaves_form_untouched() {
        for field in FormField::ALL {
            let mut form = filled();
            form.set(field, "  ");
            let before = form.clone();
            let err = form.validate().unwrap_err();
            assert_eq!(err, FormError::Incomplete { missing: vec![field] });
            assert_eq!(err.to_string(), INCOMPLETE_MESSAGE);
            assert_eq!(form, before);
        }
    }

    #[test]
    fn out_of_range_values_are_accepted() {
        let mut form = filled();
        form.set(FormField::Ph, "14");
        form.set(FormField::Nitrogen, "-3");
        let input = form.validate().unwrap();
        assert_eq!(input.ph, 14.0);
        assert_eq!(input.n, -3.0);
    }

    #[test]
    fn non_numeric_text_is_rejected() {
        let mut form = filled();
        form.set(FormField::Humidity, "wet");
        let err = form.validate().unwrap_err();
        assert_eq!(err.first_field(), Some(FormField::Humidity));
        assert!(err.to_string().contains("Humidity"));
    }

    #[test]
    fn sensor_reading_only_overwrites_present_fields() {
        let mut form = filled();
        let reading = SensorReading {
            n: Some(12.0),
            humidity: Some(61.5),
            ..Default::default()
        };
        assert_eq!(form.apply_sensor_reading(&reading), 2);
        assert_eq!(form.value(FormField::Nitrogen), "12");
        assert_eq!(form.value(FormField::Humidity), "61.5");
        assert_eq!(form.value(FormField::Potassium), "43");
    }

    #[test]
    fn hints_include_units() {
        assert_eq!(FormField::Nitrogen.hint(), "Range: 0-140 kg/ha");
        assert_eq!(FormField::Ph.hint(), "Range: 3.5-10");
    }
}
