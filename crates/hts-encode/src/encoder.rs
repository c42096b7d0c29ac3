//! Raw input → feature vector.

use hts_model::redact::redact_value;
use hts_model::{Feature, FeatureVector, FeatureVectorBuilder, RawField, RawInput};

use crate::concepts::{coded_fields, resolve};

/// Age below which a client is flagged as a minor in the marital-status group.
pub const MINOR_AGE_LIMIT: f64 = 15.0;

/// Upper bounds (exclusive) of the age buckets, paired with their feature.
const AGE_BUCKETS: [(f64, Feature); 5] = [
    (15.0, Feature::AgeGroup0To14),
    (20.0, Feature::AgeGroup15To19),
    (25.0, Feature::AgeGroup20To24),
    (35.0, Feature::AgeGroup25To34),
    (50.0, Feature::AgeGroup35To49),
];

/// Positions whose values were present but not understood.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncodingReport {
    pub unrecognized: Vec<RawField>,
}

impl EncodingReport {
    /// Returns true when every present value was recognised.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.unrecognized.is_empty()
    }
}

/// A feature vector plus what the encoder could not map.
#[derive(Debug, Clone, PartialEq)]
pub struct Encoding {
    pub vector: FeatureVector,
    pub report: EncodingReport,
}

/// Encodes a raw input into the model's feature schema.
///
/// Never fails: unrecognised codes leave their group at 0.
#[must_use]
pub fn encode(input: &RawInput) -> FeatureVector {
    encode_with_report(input).vector
}

/// Encodes a raw input and reports positions that could not be mapped.
#[must_use]
pub fn encode_with_report(input: &RawInput) -> Encoding {
    let mut builder = FeatureVectorBuilder::new();
    let mut report = EncodingReport::default();

    let age = input.get(RawField::Age);
    match age.as_number() {
        Some(years) if years >= 0.0 => apply_age(&mut builder, years),
        _ if age.is_missing() => {}
        _ => report.unrecognized.push(RawField::Age),
    }

    let months = input.get(RawField::MonthsSinceLastTest);
    match months.as_number() {
        Some(value) => {
            builder.set_numeric(Feature::MonthsSinceLastTest, value.max(0.0));
        }
        None if months.is_missing() => {}
        None => report.unrecognized.push(RawField::MonthsSinceLastTest),
    }

    for field in coded_fields() {
        let value = input.get(field);
        let Some(code) = value.as_code() else {
            if !value.is_missing() {
                report.unrecognized.push(field);
            }
            continue;
        };
        match resolve(field, &code) {
            Some(feature) => {
                tracing::trace!(field = field.label(), code = redact_value(&code), %feature, "matched concept");
                builder.set(feature);
            }
            None => {
                tracing::debug!(field = field.label(), code = redact_value(&code), "unrecognised concept");
                report.unrecognized.push(field);
            }
        }
    }

    report.unrecognized.sort_unstable();
    Encoding {
        vector: builder.build(),
        report,
    }
}

fn apply_age(builder: &mut FeatureVectorBuilder, years: f64) {
    let bucket = AGE_BUCKETS
        .iter()
        .find(|(limit, _)| years < *limit)
        .map_or(Feature::AgeGroup50Plus, |(_, feature)| *feature);
    builder.set(bucket);
    if years < MINOR_AGE_LIMIT {
        builder.set(Feature::MaritalStatusMinor);
    }
}
