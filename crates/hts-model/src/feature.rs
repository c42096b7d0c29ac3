//! Feature schema and the immutable feature vector sent to the scoring model.
//!
//! The schema is closed: every [`FeatureVector`] carries exactly one value
//! per [`Feature`], defaulting to 0. Vectors are only produced through
//! [`FeatureVectorBuilder`].

use std::fmt;

use serde::ser::{Serialize, SerializeMap, Serializer};

/// Number of features in the schema.
pub const FEATURE_COUNT: usize = 45;

/// Mutually-exclusive groups the features belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FeatureGroup {
    AgeBucket,
    MonthsSinceLastTest,
    Gender,
    PopulationType,
    MaritalStatus,
    Disability,
    EverTested,
    TestedAs,
    EntryPoint,
    TestStrategy,
    TbScreening,
    SelfTested,
}

impl FeatureGroup {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::AgeBucket => "Age bucket",
            Self::MonthsSinceLastTest => "Months since last test",
            Self::Gender => "Gender",
            Self::PopulationType => "Population type",
            Self::MaritalStatus => "Marital status",
            Self::Disability => "Disability",
            Self::EverTested => "Ever tested",
            Self::TestedAs => "Tested as",
            Self::EntryPoint => "Entry point",
            Self::TestStrategy => "Test strategy",
            Self::TbScreening => "TB screening",
            Self::SelfTested => "Self tested",
        }
    }

    /// Features belonging to this group, in schema order.
    pub fn features(self) -> impl Iterator<Item = Feature> {
        Feature::ALL
            .into_iter()
            .filter(move |feature| feature.group() == self)
    }
}

impl fmt::Display for FeatureGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How a feature's value is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureKind {
    /// 0/1 flag.
    Indicator,
    /// Non-negative number.
    Numeric,
}

impl FeatureKind {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Indicator => "indicator",
            Self::Numeric => "numeric",
        }
    }
}

/// A single named field of the model's input schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Feature {
    AgeGroup0To14,
    AgeGroup15To19,
    AgeGroup20To24,
    AgeGroup25To34,
    AgeGroup35To49,
    AgeGroup50Plus,
    MonthsSinceLastTest,
    GenderMale,
    GenderFemale,
    KeyPopulationTypeGP,
    KeyPopulationTypeKP,
    MaritalStatusSingle,
    MaritalStatusMarried,
    MaritalStatusPolygamous,
    MaritalStatusDivorced,
    MaritalStatusWidowed,
    MaritalStatusMinor,
    PatientDisabledYes,
    PatientDisabledNo,
    EverTestedForHivYes,
    EverTestedForHivNo,
    ClientTestedAsIndividual,
    ClientTestedAsCouple,
    EntryPointInPatient,
    EntryPointOPD,
    EntryPointPeds,
    EntryPointMCH,
    EntryPointPMTCTANC,
    EntryPointTB,
    EntryPointVCT,
    EntryPointCCC,
    EntryPointMobileOutreach,
    EntryPointHomeBased,
    EntryPointOther,
    TestingStrategyHB,
    TestingStrategyHP,
    TestingStrategyMO,
    TestingStrategyNP,
    TestingStrategyVI,
    TbScreeningNoSigns,
    TbScreeningPresumed,
    TbScreeningConfirmed,
    TbScreeningNotDone,
    ClientSelfTestedYes,
    ClientSelfTestedNo,
}

impl Feature {
    /// Every feature in schema (wire) order.
    pub const ALL: [Feature; FEATURE_COUNT] = [
        Self::AgeGroup0To14,
        Self::AgeGroup15To19,
        Self::AgeGroup20To24,
        Self::AgeGroup25To34,
        Self::AgeGroup35To49,
        Self::AgeGroup50Plus,
        Self::MonthsSinceLastTest,
        Self::GenderMale,
        Self::GenderFemale,
        Self::KeyPopulationTypeGP,
        Self::KeyPopulationTypeKP,
        Self::MaritalStatusSingle,
        Self::MaritalStatusMarried,
        Self::MaritalStatusPolygamous,
        Self::MaritalStatusDivorced,
        Self::MaritalStatusWidowed,
        Self::MaritalStatusMinor,
        Self::PatientDisabledYes,
        Self::PatientDisabledNo,
        Self::EverTestedForHivYes,
        Self::EverTestedForHivNo,
        Self::ClientTestedAsIndividual,
        Self::ClientTestedAsCouple,
        Self::EntryPointInPatient,
        Self::EntryPointOPD,
        Self::EntryPointPeds,
        Self::EntryPointMCH,
        Self::EntryPointPMTCTANC,
        Self::EntryPointTB,
        Self::EntryPointVCT,
        Self::EntryPointCCC,
        Self::EntryPointMobileOutreach,
        Self::EntryPointHomeBased,
        Self::EntryPointOther,
        Self::TestingStrategyHB,
        Self::TestingStrategyHP,
        Self::TestingStrategyMO,
        Self::TestingStrategyNP,
        Self::TestingStrategyVI,
        Self::TbScreeningNoSigns,
        Self::TbScreeningPresumed,
        Self::TbScreeningConfirmed,
        Self::TbScreeningNotDone,
        Self::ClientSelfTestedYes,
        Self::ClientSelfTestedNo,
    ];

    const fn index(self) -> usize {
        self as usize
    }

    /// Wire name of the feature.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::AgeGroup0To14 => "AgeGroup0To14",
            Self::AgeGroup15To19 => "AgeGroup15To19",
            Self::AgeGroup20To24 => "AgeGroup20To24",
            Self::AgeGroup25To34 => "AgeGroup25To34",
            Self::AgeGroup35To49 => "AgeGroup35To49",
            Self::AgeGroup50Plus => "AgeGroup50Plus",
            Self::MonthsSinceLastTest => "MonthsSinceLastTest",
            Self::GenderMale => "GenderMale",
            Self::GenderFemale => "GenderFemale",
            Self::KeyPopulationTypeGP => "KeyPopulationTypeGP",
            Self::KeyPopulationTypeKP => "KeyPopulationTypeKP",
            Self::MaritalStatusSingle => "MaritalStatusSingle",
            Self::MaritalStatusMarried => "MaritalStatusMarried",
            Self::MaritalStatusPolygamous => "MaritalStatusPolygamous",
            Self::MaritalStatusDivorced => "MaritalStatusDivorced",
            Self::MaritalStatusWidowed => "MaritalStatusWidowed",
            Self::MaritalStatusMinor => "MaritalStatusMinor",
            Self::PatientDisabledYes => "PatientDisabledYes",
            Self::PatientDisabledNo => "PatientDisabledNo",
            Self::EverTestedForHivYes => "EverTestedForHivYes",
            Self::EverTestedForHivNo => "EverTestedForHivNo",
            Self::ClientTestedAsIndividual => "ClientTestedAsIndividual",
            Self::ClientTestedAsCouple => "ClientTestedAsCouple",
            Self::EntryPointInPatient => "EntryPointInPatient",
            Self::EntryPointOPD => "EntryPointOPD",
            Self::EntryPointPeds => "EntryPointPeds",
            Self::EntryPointMCH => "EntryPointMCH",
            Self::EntryPointPMTCTANC => "EntryPointPMTCTANC",
            Self::EntryPointTB => "EntryPointTB",
            Self::EntryPointVCT => "EntryPointVCT",
            Self::EntryPointCCC => "EntryPointCCC",
            Self::EntryPointMobileOutreach => "EntryPointMobileOutreach",
            Self::EntryPointHomeBased => "EntryPointHomeBased",
            Self::EntryPointOther => "EntryPointOther",
            Self::TestingStrategyHB => "TestingStrategyHB",
            Self::TestingStrategyHP => "TestingStrategyHP",
            Self::TestingStrategyMO => "TestingStrategyMO",
            Self::TestingStrategyNP => "TestingStrategyNP",
            Self::TestingStrategyVI => "TestingStrategyVI",
            Self::TbScreeningNoSigns => "TbScreeningNoSigns",
            Self::TbScreeningPresumed => "TbScreeningPresumed",
            Self::TbScreeningConfirmed => "TbScreeningConfirmed",
            Self::TbScreeningNotDone => "TbScreeningNotDone",
            Self::ClientSelfTestedYes => "ClientSelfTestedYes",
            Self::ClientSelfTestedNo => "ClientSelfTestedNo",
        }
    }

    #[must_use]
    pub const fn group(self) -> FeatureGroup {
        match self {
            Self::AgeGroup0To14
            | Self::AgeGroup15To19
            | Self::AgeGroup20To24
            | Self::AgeGroup25To34
            | Self::AgeGroup35To49
            | Self::AgeGroup50Plus => FeatureGroup::AgeBucket,
            Self::MonthsSinceLastTest => FeatureGroup::MonthsSinceLastTest,
            Self::GenderMale | Self::GenderFemale => FeatureGroup::Gender,
            Self::KeyPopulationTypeGP | Self::KeyPopulationTypeKP => FeatureGroup::PopulationType,
            Self::MaritalStatusSingle
            | Self::MaritalStatusMarried
            | Self::MaritalStatusPolygamous
            | Self::MaritalStatusDivorced
            | Self::MaritalStatusWidowed
            | Self::MaritalStatusMinor => FeatureGroup::MaritalStatus,
            Self::PatientDisabledYes | Self::PatientDisabledNo => FeatureGroup::Disability,
            Self::EverTestedForHivYes | Self::EverTestedForHivNo => FeatureGroup::EverTested,
            Self::ClientTestedAsIndividual | Self::ClientTestedAsCouple => FeatureGroup::TestedAs,
            Self::EntryPointInPatient
            | Self::EntryPointOPD
            | Self::EntryPointPeds
            | Self::EntryPointMCH
            | Self::EntryPointPMTCTANC
            | Self::EntryPointTB
            | Self::EntryPointVCT
            | Self::EntryPointCCC
            | Self::EntryPointMobileOutreach
            | Self::EntryPointHomeBased
            | Self::EntryPointOther => FeatureGroup::EntryPoint,
            Self::TestingStrategyHB
            | Self::TestingStrategyHP
            | Self::TestingStrategyMO
            | Self::TestingStrategyNP
            | Self::TestingStrategyVI => FeatureGroup::TestStrategy,
            Self::TbScreeningNoSigns
            | Self::TbScreeningPresumed
            | Self::TbScreeningConfirmed
            | Self::TbScreeningNotDone => FeatureGroup::TbScreening,
            Self::ClientSelfTestedYes | Self::ClientSelfTestedNo => FeatureGroup::SelfTested,
        }
    }

    #[must_use]
    pub const fn kind(self) -> FeatureKind {
        match self {
            Self::MonthsSinceLastTest => FeatureKind::Numeric,
            _ => FeatureKind::Indicator,
        }
    }

    /// Looks up a feature by its wire name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|feature| feature.name() == name)
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Complete, immutable encoding of one client's attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    values: [f64; FEATURE_COUNT],
}

impl FeatureVector {
    /// Value of a feature (0 when not set).
    #[must_use]
    pub fn get(&self, feature: Feature) -> f64 {
        self.values[feature.index()]
    }

    /// Returns true when the feature holds a non-zero value.
    #[must_use]
    pub fn is_set(&self, feature: Feature) -> bool {
        self.get(feature) != 0.0
    }

    /// Iterates over every feature and its value in schema order.
    pub fn iter(&self) -> impl Iterator<Item = (Feature, f64)> + '_ {
        Feature::ALL
            .into_iter()
            .map(move |feature| (feature, self.get(feature)))
    }

    /// Features of a group that are currently set.
    pub fn set_in_group(&self, group: FeatureGroup) -> impl Iterator<Item = Feature> + '_ {
        group.features().filter(move |feature| self.is_set(*feature))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        FEATURE_COUNT
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }
}

impl Default for FeatureVector {
    fn default() -> Self {
        FeatureVectorBuilder::new().build()
    }
}

impl Serialize for FeatureVector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(FEATURE_COUNT))?;
        for (feature, value) in self.iter() {
            match feature.kind() {
                FeatureKind::Indicator => {
                    map.serialize_entry(feature.name(), &u8::from(value != 0.0))?;
                }
                FeatureKind::Numeric if value.fract() == 0.0 && value.abs() < 1e15 => {
                    map.serialize_entry(feature.name(), &(value as i64))?;
                }
                FeatureKind::Numeric => map.serialize_entry(feature.name(), &value)?,
            }
        }
        map.end()
    }
}

/// Builds a [`FeatureVector`] starting from an all-zero record.
#[derive(Debug, Clone)]
pub struct FeatureVectorBuilder {
    values: [f64; FEATURE_COUNT],
}

impl FeatureVectorBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            values: [0.0; FEATURE_COUNT],
        }
    }

    /// Sets a feature to 1.
    pub fn set(&mut self, feature: Feature) -> &mut Self {
        self.values[feature.index()] = 1.0;
        self
    }

    /// Sets a numeric feature. Negative or non-finite values store 0.
    pub fn set_numeric(&mut self, feature: Feature, value: f64) -> &mut Self {
        debug_assert_eq!(feature.kind(), FeatureKind::Numeric, "{feature} is an indicator");
        self.values[feature.index()] = if value.is_finite() && value > 0.0 {
            value
        } else {
            0.0
        };
        self
    }

    #[must_use]
    pub fn build(&self) -> FeatureVector {
        FeatureVector {
            values: self.values,
        }
    }
}

impl Default for FeatureVectorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
