use std::str::FromStr;

use serde::{Deserialize, Serialize};

use vsa_core::consts::{
    AF_HIST, AF_HIST_BINS, DEL, INDEL_SIZE, INS, LOG_AF_HIST_LOWER_BOUND,
    LOG_AF_HIST_UPPER_BOUND, LOWER_BIN, MNP, MUT_SPEC, OTHER, QUAL_DIST, QUAL_HIST_LOWER_BOUND,
    QUAL_HIST_UPPER_BOUND, REGULAR_BINS, SNP, SV, TOTAL_RECORDS, TS_TV_RATIO, UPPER_BIN,
    USING_LOG_SCALE_AF, VAR_TYPE,
};

pub const TOP_LEVEL_KEYS: &[&str] = &[
    TOTAL_RECORDS,
    TS_TV_RATIO,
    AF_HIST,
    MUT_SPEC,
    VAR_TYPE,
    QUAL_DIST,
    INDEL_SIZE,
];

pub const AF_HIST_KEYS: &[&str] = &[USING_LOG_SCALE_AF, AF_HIST_BINS];

/// Present only when the histogram is log scaled.
pub const AF_HIST_LOG_KEYS: &[&str] = &[
    USING_LOG_SCALE_AF,
    AF_HIST_BINS,
    LOG_AF_HIST_LOWER_BOUND,
    LOG_AF_HIST_UPPER_BOUND,
];

pub const MUT_SPEC_KEYS: &[&str] = &["A", "C", "G", "T"];

pub const QUAL_DIST_KEYS: &[&str] = &[
    QUAL_HIST_LOWER_BOUND,
    QUAL_HIST_UPPER_BOUND,
    LOWER_BIN,
    UPPER_BIN,
    REGULAR_BINS,
];

/// Integer fields of `qual_dist` other than the bins themselves.
pub const QUAL_DIST_SCALARS: &[&str] = &[
    QUAL_HIST_LOWER_BOUND,
    QUAL_HIST_UPPER_BOUND,
    LOWER_BIN,
    UPPER_BIN,
];

pub const CLASSIC_VAR_TYPE_KEYS: &[&str] = &[SNP, INS, DEL, OTHER];
pub const EXTENDED_VAR_TYPE_KEYS: &[&str] = &[SNP, MNP, SV, INS, DEL, OTHER];

///
/// `var_type` schema. Older reporter builds count substitutions, insertions,
/// deletions and everything else; newer builds split out MNPs and symbolic
/// structural variants.
///
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariantTypeSchema {
    #[default]
    Classic,
    Extended,
}

impl VariantTypeSchema {
    pub fn keys(&self) -> &'static [&'static str] {
        match self {
            VariantTypeSchema::Classic => CLASSIC_VAR_TYPE_KEYS,
            VariantTypeSchema::Extended => EXTENDED_VAR_TYPE_KEYS,
        }
    }
}

impl FromStr for VariantTypeSchema {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "classic" => Ok(VariantTypeSchema::Classic),
            "extended" => Ok(VariantTypeSchema::Extended),
            _ => Err(format!("Invalid variant type schema: {}", s)),
        }
    }
}

/// Knobs that change what a valid document looks like.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CompareOptions {
    pub variant_types: VariantTypeSchema,
}
