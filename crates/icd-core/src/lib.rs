//! Operations over parsed codes and loaded reference data.
//!
//! - [`condense`]: collapse fully covered branches to their ancestors
//! - [`children`], [`expand_range`], [`sort_codes`]: hierarchy queries
//! - [`explain`]: description tables
//! - [`comorbid`], [`charlson_score`]: comorbidity assignment and scoring

pub mod charlson;
pub mod children;
pub mod comorbid;
pub mod condense;
pub mod explain;
pub mod range;
pub mod sort;

pub use charlson::{CHARLSON_MAP, charlson_score, charlson_weight, is_charlson_map};
pub use children::{children, children_of_all};
pub use comorbid::{ComorbidityRow, ComorbidityTable, PatientRecord, comorbid, group_records};
pub use condense::{CondenseOptions, Condensed, condense, condense_with, expand_to_leaves};
pub use explain::{ExplainOptions, ExplainRow, Explanation, explain};
pub use range::{expand_range, expand_range_str};
pub use sort::{sort_codes, sorted};
