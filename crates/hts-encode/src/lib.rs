//! Feature encoding for HTS risk screening.
//!
//! [`encode`] turns the positional [`hts_model::RawInput`] supplied by an
//! encounter form into the complete [`hts_model::FeatureVector`] expected by
//! the scoring model. Categorical positions resolve through the lookup table
//! in [`concepts`]; unknown codes leave their group at 0.

pub mod concepts;
pub mod encoder;

pub use concepts::{CONCEPT_RULES, ConceptRule, long_form, normalize_code, resolve};
pub use encoder::{Encoding, EncodingReport, MINOR_AGE_LIMIT, encode, encode_with_report};
