use serde::Serialize;
use serde::ser::SerializeMap;
use serde_json::Value;
use std::fmt;
use std::num::IntErrorKind;
use thiserror::Error;

/// Inclusive lower bound for every nutrient amount.
pub const MIN_AMOUNT: i128 = 0;
/// Inclusive upper bound for every nutrient amount.
pub const MAX_AMOUNT: i128 = 1000;

/// The nutrients a cereal is described by, in model input order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NutrientField {
    Protein,
    Fat,
    Sugars,
}

impl NutrientField {
    pub const ALL: [NutrientField; 3] = [Self::Protein, Self::Fat, Self::Sugars];

    /// JSON key used on the wire.
    pub fn name(&self) -> &'static str {
        match self {
            NutrientField::Protein => "protein",
            NutrientField::Fat => "fat",
            NutrientField::Sugars => "sugars",
        }
    }
}

impl fmt::Display for NutrientField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single reason why a field was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Violation {
    #[error("field required")]
    Missing,

    #[error("value must be an integer")]
    NotInteger,

    #[error("value must be ≥ 0")]
    BelowMinimum,

    #[error("value must be ≤ 1000")]
    AboveMaximum,
}

/// Field-keyed report of every violation found in a request body.
///
/// Fields keep the order in which they were checked and each field keeps its
/// messages in insertion order. Serializes as `{"field": ["message", ...]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    entries: Vec<(NutrientField, Vec<Violation>)>,
}

impl FieldErrors {
    pub fn push(&mut self, field: NutrientField, violation: Violation) {
        match self.entries.iter_mut().find(|(f, _)| *f == field) {
            Some((_, violations)) => violations.push(violation),
            None => self.entries.push((field, vec![violation])),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of offending fields (not messages).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn violations(&self, field: NutrientField) -> &[Violation] {
        self.entries
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, v)| v.as_slice())
            .unwrap_or(&[])
    }

    pub fn fields(&self) -> impl Iterator<Item = NutrientField> + '_ {
        self.entries.iter().map(|(f, _)| *f)
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (field, violations)) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: ", field)?;
            for (j, violation) in violations.iter().enumerate() {
                if j > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{}", violation)?;
            }
        }
        Ok(())
    }
}

impl Serialize for FieldErrors {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (field, violations) in &self.entries {
            let messages: Vec<String> = violations.iter().map(ToString::to_string).collect();
            map.serialize_entry(field.name(), &messages)?;
        }
        map.end()
    }
}

/// Validated nutritional input for one prediction.
///
/// Only constructible through [`FeatureRecord::new`] or
/// [`FeatureRecord::from_json`], so every instance is within range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureRecord {
    protein: u16,
    fat: u16,
    sugars: u16,
}

impl FeatureRecord {
    pub fn new(protein: i64, fat: i64, sugars: i64) -> Result<Self, FieldErrors> {
        let mut errors = FieldErrors::default();
        let mut check = |field: NutrientField, amount: i64| match check_range(amount as i128) {
            Ok(v) => Some(v),
            Err(violation) => {
                errors.push(field, violation);
                None
            }
        };

        let protein = check(NutrientField::Protein, protein);
        let fat = check(NutrientField::Fat, fat);
        let sugars = check(NutrientField::Sugars, sugars);

        match (protein, fat, sugars) {
            (Some(protein), Some(fat), Some(sugars)) => Ok(Self {
                protein,
                fat,
                sugars,
            }),
            _ => Err(errors),
        }
    }

    /// Validates an untrusted JSON value.
    ///
    /// Every field is checked; the error lists all offending fields. Unknown
    /// keys are ignored. Anything that is not an object (an array, typically)
    /// is treated as an object without fields.
    pub fn from_json(value: &Value) -> Result<Self, FieldErrors> {
        let object = value.as_object();
        let mut errors = FieldErrors::default();
        let mut read = |field: NutrientField| {
            let raw = object.and_then(|map| map.get(field.name()));
            match check_field(raw) {
                Ok(v) => Some(v),
                Err(violation) => {
                    errors.push(field, violation);
                    None
                }
            }
        };

        let protein = read(NutrientField::Protein);
        let fat = read(NutrientField::Fat);
        let sugars = read(NutrientField::Sugars);

        match (protein, fat, sugars) {
            (Some(protein), Some(fat), Some(sugars)) => Ok(Self {
                protein,
                fat,
                sugars,
            }),
            _ => Err(errors),
        }
    }

    pub fn protein(&self) -> u16 {
        self.protein
    }

    pub fn fat(&self) -> u16 {
        self.fat
    }

    pub fn sugars(&self) -> u16 {
        self.sugars
    }

    pub fn get(&self, field: NutrientField) -> u16 {
        match field {
            NutrientField::Protein => self.protein,
            NutrientField::Fat => self.fat,
            NutrientField::Sugars => self.sugars,
        }
    }
}

fn check_field(raw: Option<&Value>) -> Result<u16, Violation> {
    let raw = raw.ok_or(Violation::Missing)?;
    let amount = whole_number(raw).ok_or(Violation::NotInteger)?;
    check_range(amount)
}

fn check_range(amount: i128) -> Result<u16, Violation> {
    if amount < MIN_AMOUNT {
        return Err(Violation::BelowMinimum);
    }
    if amount > MAX_AMOUNT {
        return Err(Violation::AboveMaximum);
    }
    // 0..=1000 always fits
    Ok(amount as u16)
}

/// Lax integer coercion: integers, floats without a fractional part,
/// booleans as 0/1 and whole-number decimal strings. Null is not a number.
fn whole_number(value: &Value) -> Option<i128> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(i as i128)
            } else if let Some(u) = n.as_u64() {
                Some(u as i128)
            } else {
                let f = n.as_f64()?;
                // `as` saturates, which keeps huge magnitudes out of range
                (f.is_finite() && f.fract() == 0.0).then_some(f as i128)
            }
        }
        Value::Bool(b) => Some(i128::from(*b)),
        Value::String(s) => integer_text(s),
        _ => None,
    }
}

/// `"3"`, `" 3 "` and `"3.00"` are whole numbers; `"2.5"` and `"1e2"` are not.
fn integer_text(text: &str) -> Option<i128> {
    let text = text.trim();
    let digits = match text.split_once('.') {
        Some((whole, fraction)) if fraction.bytes().all(|b| b == b'0') => whole,
        Some(_) => return None,
        None => text,
    };

    match digits.parse::<i128>() {
        Ok(n) => Some(n),
        // Still an integer, just far out of range
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow => Some(i128::MAX),
            IntErrorKind::NegOverflow => Some(i128::MIN),
            _ => None,
        },
    }
}
