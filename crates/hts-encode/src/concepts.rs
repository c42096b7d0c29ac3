//! Concept lookup tables mapping coded answers to features.
//!
//! Codes are matched either in their short numeric form (`159940`) or in
//! their long-form concept identifier, which pads the numeric code with `A`
//! to 36 characters (`159940AAAAAAAAAAAAAAAAAAAAAAAAAAAAAA`). Demographic
//! gender markers are matched case-insensitively.

use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::LazyLock;

use hts_model::{Feature, RawField};

/// Length of a long-form concept identifier.
pub const LONG_FORM_LEN: usize = 36;

/// One row of the lookup table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConceptRule {
    pub field: RawField,
    pub code: &'static str,
    pub feature: Feature,
}

const fn rule(field: RawField, code: &'static str, feature: Feature) -> ConceptRule {
    ConceptRule {
        field,
        code,
        feature,
    }
}

/// Every coded answer the encoder recognises.
pub const CONCEPT_RULES: &[ConceptRule] = &[
    // Entry point
    rule(RawField::EntryPoint, "5485", Feature::EntryPointInPatient),
    rule(RawField::EntryPoint, "160542", Feature::EntryPointOPD),
    rule(RawField::EntryPoint, "162181", Feature::EntryPointPeds),
    rule(RawField::EntryPoint, "160456", Feature::EntryPointMCH),
    rule(RawField::EntryPoint, "160538", Feature::EntryPointPMTCTANC),
    rule(RawField::EntryPoint, "160541", Feature::EntryPointTB),
    rule(RawField::EntryPoint, "159940", Feature::EntryPointVCT),
    rule(RawField::EntryPoint, "162050", Feature::EntryPointCCC),
    rule(RawField::EntryPoint, "159939", Feature::EntryPointMobileOutreach),
    rule(RawField::EntryPoint, "159938", Feature::EntryPointHomeBased),
    rule(RawField::EntryPoint, "5622", Feature::EntryPointOther),
    // Ever tested for HIV
    rule(RawField::EverTested, "1065", Feature::EverTestedForHivYes),
    rule(RawField::EverTested, "1066", Feature::EverTestedForHivNo),
    // Gender
    rule(RawField::Gender, "1534", Feature::GenderMale),
    rule(RawField::Gender, "M", Feature::GenderMale),
    rule(RawField::Gender, "MALE", Feature::GenderMale),
    rule(RawField::Gender, "1535", Feature::GenderFemale),
    rule(RawField::Gender, "F", Feature::GenderFemale),
    rule(RawField::Gender, "FEMALE", Feature::GenderFemale),
    // Disability
    rule(RawField::Disability, "1065", Feature::PatientDisabledYes),
    rule(RawField::Disability, "1066", Feature::PatientDisabledNo),
    // Marital status
    rule(RawField::MaritalStatus, "1057", Feature::MaritalStatusSingle),
    rule(RawField::MaritalStatus, "5555", Feature::MaritalStatusMarried),
    rule(RawField::MaritalStatus, "1060", Feature::MaritalStatusMarried),
    rule(RawField::MaritalStatus, "159715", Feature::MaritalStatusPolygamous),
    rule(RawField::MaritalStatus, "1058", Feature::MaritalStatusDivorced),
    rule(RawField::MaritalStatus, "1056", Feature::MaritalStatusDivorced),
    rule(RawField::MaritalStatus, "1059", Feature::MaritalStatusWidowed),
    // Population type
    rule(RawField::PopulationType, "164928", Feature::KeyPopulationTypeGP),
    rule(RawField::PopulationType, "164929", Feature::KeyPopulationTypeKP),
    rule(RawField::PopulationType, "160578", Feature::KeyPopulationTypeKP),
    rule(RawField::PopulationType, "160579", Feature::KeyPopulationTypeKP),
    // Self tested
    rule(RawField::SelfTested, "1065", Feature::ClientSelfTestedYes),
    rule(RawField::SelfTested, "1066", Feature::ClientSelfTestedNo),
    // TB screening
    rule(RawField::TbScreening, "1660", Feature::TbScreeningNoSigns),
    rule(RawField::TbScreening, "142177", Feature::TbScreeningPresumed),
    rule(RawField::TbScreening, "1662", Feature::TbScreeningConfirmed),
    rule(RawField::TbScreening, "160737", Feature::TbScreeningNotDone),
    // Test strategy
    rule(RawField::TestStrategy, "159938", Feature::TestingStrategyHB),
    rule(RawField::TestStrategy, "164163", Feature::TestingStrategyHP),
    rule(RawField::TestStrategy, "159939", Feature::TestingStrategyMO),
    rule(RawField::TestStrategy, "164953", Feature::TestingStrategyNP),
    rule(RawField::TestStrategy, "164954", Feature::TestingStrategyVI),
    // Tested as
    rule(RawField::TestedAs, "164957", Feature::ClientTestedAsIndividual),
    rule(RawField::TestedAs, "164958", Feature::ClientTestedAsCouple),
];

static INDEX: LazyLock<HashMap<RawField, HashMap<&'static str, Feature>>> = LazyLock::new(|| {
    let mut index: HashMap<RawField, HashMap<&'static str, Feature>> = HashMap::new();
    for rule in CONCEPT_RULES {
        index
            .entry(rule.field)
            .or_default()
            .insert(rule.code, rule.feature);
    }
    index
});

/// Reduces a raw code to the form stored in [`CONCEPT_RULES`].
///
/// Long-form identifiers collapse to their numeric prefix; anything that is
/// not numeric is upper-cased.
#[must_use]
pub fn normalize_code(code: &str) -> Cow<'_, str> {
    let code = code.trim();
    if code.len() == LONG_FORM_LEN {
        let prefix = code.trim_end_matches('A');
        if !prefix.is_empty() && prefix.bytes().all(|b| b.is_ascii_digit()) {
            return Cow::Borrowed(prefix);
        }
    }
    if code.bytes().all(|b| b.is_ascii_digit()) {
        Cow::Borrowed(code)
    } else {
        Cow::Owned(code.to_ascii_uppercase())
    }
}

/// Resolves a coded answer at the given position to its feature.
#[must_use]
pub fn resolve(field: RawField, code: &str) -> Option<Feature> {
    let normalized = normalize_code(code);
    INDEX
        .get(&field)
        .and_then(|codes| codes.get(normalized.as_ref()))
        .copied()
}

/// Positions that are resolved through the lookup table.
#[must_use]
pub fn coded_fields() -> impl Iterator<Item = RawField> {
    RawField::ALL
        .into_iter()
        .filter(|field| INDEX.contains_key(field))
}

/// Long-form identifier for a numeric concept code.
#[must_use]
pub fn long_form(code: &str) -> String {
    format!("{code:A<LONG_FORM_LEN$}")
}
