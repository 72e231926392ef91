// root document
pub const TOTAL_RECORDS: &str = "TotalRecords";
pub const TS_TV_RATIO: &str = "TsTvRatio";
pub const AF_HIST: &str = "af_hist";
pub const MUT_SPEC: &str = "mut_spec";
pub const VAR_TYPE: &str = "var_type";
pub const QUAL_DIST: &str = "qual_dist";
pub const INDEL_SIZE: &str = "indel_size";

// af_hist
pub const USING_LOG_SCALE_AF: &str = "usingLogScaleAF";
pub const AF_HIST_BINS: &str = "afHistBins";
pub const LOG_AF_HIST_LOWER_BOUND: &str = "logAFHistLowerBound";
pub const LOG_AF_HIST_UPPER_BOUND: &str = "logAFHistUpperBound";

// qual_dist
pub const QUAL_HIST_LOWER_BOUND: &str = "qualHistLowerBound";
pub const QUAL_HIST_UPPER_BOUND: &str = "qualHistUpperBound";
pub const LOWER_BIN: &str = "lowerBin";
pub const UPPER_BIN: &str = "upperBin";
pub const REGULAR_BINS: &str = "regularBins";

// var_type
pub const SNP: &str = "SNP";
pub const MNP: &str = "MNP";
pub const SV: &str = "SV";
pub const INS: &str = "INS";
pub const DEL: &str = "DEL";
pub const OTHER: &str = "OTHER";

/// Destination bases in the order the reporter writes each spectrum row.
pub const SPECTRUM_WIDTH: usize = 4;

pub const DEFAULT_ARTIFACT_EXT: &str = "json";
