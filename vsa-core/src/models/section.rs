use std::fmt::{self, Display};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::consts::{AF_HIST, INDEL_SIZE, MUT_SPEC, QUAL_DIST, VAR_TYPE};

///
/// One independently validated part of a vcfstatsalive snapshot. `TopLevel`
/// is the root object itself; every other variant is a nested object stored
/// under a fixed root key.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Section {
    #[serde(rename = "top_level")]
    TopLevel,
    #[serde(rename = "af_hist")]
    AlleleFrequency,
    #[serde(rename = "mut_spec")]
    MutationSpectrum,
    #[serde(rename = "var_type")]
    VariantType,
    #[serde(rename = "qual_dist")]
    QualityDistribution,
    #[serde(rename = "indel_size")]
    IndelSize,
}

impl Section {
    pub const ALL: [Section; 6] = [
        Section::TopLevel,
        Section::AlleleFrequency,
        Section::MutationSpectrum,
        Section::VariantType,
        Section::QualityDistribution,
        Section::IndelSize,
    ];

    ///
    /// Key of the section inside the root document, `None` for the root itself.
    ///
    pub fn key(&self) -> Option<&'static str> {
        match self {
            Section::TopLevel => None,
            Section::AlleleFrequency => Some(AF_HIST),
            Section::MutationSpectrum => Some(MUT_SPEC),
            Section::VariantType => Some(VAR_TYPE),
            Section::QualityDistribution => Some(QUAL_DIST),
            Section::IndelSize => Some(INDEL_SIZE),
        }
    }

    pub fn name(&self) -> &'static str {
        self.key().unwrap_or("top_level")
    }
}

impl Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Section {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Section::ALL
            .iter()
            .find(|section| section.name() == s)
            .copied()
            .ok_or_else(|| format!("Unknown section: {}", s))
    }
}
