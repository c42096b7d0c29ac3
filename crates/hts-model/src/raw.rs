//! Positional raw input supplied by the host encounter workflow.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of defined positions in a [`RawInput`].
pub const RAW_FIELD_COUNT: usize = 12;

/// Concept code for "Yes" answers.
const YES_CODE: &str = "1065";
/// Concept code for "No" answers.
const NO_CODE: &str = "1066";

/// One positional element of a [`RawInput`].
///
/// Host forms hand over either a coded concept identifier, a plain number or
/// nothing at all. Booleans are accepted for yes/no questions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    /// Field left empty.
    #[default]
    Missing,
    /// Boolean answer to a yes/no question.
    Flag(bool),
    /// Numeric value (age, months, or a concept code sent as a number).
    Number(f64),
    /// Opaque coded identifier.
    Code(String),
}

impl RawValue {
    /// Returns true when the value carries no information.
    #[must_use]
    pub fn is_missing(&self) -> bool {
        match self {
            Self::Missing => true,
            Self::Code(code) => code.trim().is_empty(),
            Self::Flag(_) | Self::Number(_) => false,
        }
    }

    /// Returns the value as a concept code.
    ///
    /// Whole numbers are rendered without a fractional part so that `159940`
    /// and `"159940"` resolve to the same concept. Flags map to the yes/no
    /// answer concepts.
    #[must_use]
    pub fn as_code(&self) -> Option<Cow<'_, str>> {
        match self {
            Self::Missing => None,
            Self::Flag(true) => Some(Cow::Borrowed(YES_CODE)),
            Self::Flag(false) => Some(Cow::Borrowed(NO_CODE)),
            Self::Number(value) => {
                if value.is_finite() && value.fract() == 0.0 && *value >= 0.0 {
                    Some(Cow::Owned(format!("{value:.0}")))
                } else {
                    None
                }
            }
            Self::Code(code) => {
                let trimmed = code.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(Cow::Borrowed(trimmed))
                }
            }
        }
    }

    /// Returns the value as a finite number, parsing numeric strings.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        let value = match self {
            Self::Number(value) => *value,
            Self::Code(code) => code.trim().parse::<f64>().ok()?,
            Self::Missing | Self::Flag(_) => return None,
        };
        value.is_finite().then_some(value)
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        Self::Code(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        Self::Code(value)
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<u32> for RawValue {
    fn from(value: u32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<bool> for RawValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

impl<T: Into<RawValue>> From<Option<T>> for RawValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Missing, Into::into)
    }
}

/// Named positions of a [`RawInput`]. Order is the contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RawField {
    Age = 0,
    EntryPoint = 1,
    EverTested = 2,
    Gender = 3,
    Disability = 4,
    MaritalStatus = 5,
    MonthsSinceLastTest = 6,
    PopulationType = 7,
    SelfTested = 8,
    TbScreening = 9,
    TestStrategy = 10,
    /// Optional trailing position: tested as individual or couple.
    TestedAs = 11,
}

impl RawField {
    /// All positions in order.
    pub const ALL: [RawField; RAW_FIELD_COUNT] = [
        Self::Age,
        Self::EntryPoint,
        Self::EverTested,
        Self::Gender,
        Self::Disability,
        Self::MaritalStatus,
        Self::MonthsSinceLastTest,
        Self::PopulationType,
        Self::SelfTested,
        Self::TbScreening,
        Self::TestStrategy,
        Self::TestedAs,
    ];

    /// Zero-based position within the input sequence.
    #[must_use]
    pub const fn position(self) -> usize {
        self as usize
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Age => "age",
            Self::EntryPoint => "entry point",
            Self::EverTested => "ever tested",
            Self::Gender => "gender",
            Self::Disability => "disability",
            Self::MaritalStatus => "marital status",
            Self::MonthsSinceLastTest => "months since last test",
            Self::PopulationType => "population type",
            Self::SelfTested => "self tested",
            Self::TbScreening => "TB screening",
            Self::TestStrategy => "test strategy",
            Self::TestedAs => "tested as",
        }
    }
}

impl fmt::Display for RawField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (#{})", self.label(), self.position())
    }
}

static MISSING: RawValue = RawValue::Missing;

/// Ordered sequence of raw clinical attribute values.
///
/// Positions beyond the supplied length read as [`RawValue::Missing`];
/// extra trailing elements are kept but never read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawInput {
    values: Vec<RawValue>,
}

impl RawInput {
    #[must_use]
    pub fn new(values: Vec<RawValue>) -> Self {
        Self { values }
    }

    /// Builds an input from named fields, leaving the rest missing.
    pub fn from_fields<I, V>(fields: I) -> Self
    where
        I: IntoIterator<Item = (RawField, V)>,
        V: Into<RawValue>,
    {
        let mut values = vec![RawValue::Missing; RAW_FIELD_COUNT - 1];
        for (field, value) in fields {
            let position = field.position();
            if position >= values.len() {
                values.resize(position + 1, RawValue::Missing);
            }
            values[position] = value.into();
        }
        Self { values }
    }

    /// Returns the value at the given position.
    #[must_use]
    pub fn get(&self, field: RawField) -> &RawValue {
        self.values.get(field.position()).unwrap_or(&MISSING)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[must_use]
    pub fn values(&self) -> &[RawValue] {
        &self.values
    }
}

impl From<Vec<RawValue>> for RawInput {
    fn from(values: Vec<RawValue>) -> Self {
        Self::new(values)
    }
}
