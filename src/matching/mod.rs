pub mod engine;
pub mod rules;

pub use engine::{attach_scores, MatchedJob, MatchingEngine, Verdict};
pub use rules::{rule_based_match, work_type_matches, ALL_TYPES, MAX_RESULTS};
