pub mod buckets;
pub mod pipeline;
pub mod scoring;
pub mod views;
pub mod weights;

pub use buckets::{MatchBucket, to_percent};
pub use pipeline::{MatchResult, MatchingEngine, rank, rank_on, rank_value};
pub use scoring::{FacetScore, MatchScore, SubScore, VolunteerScorer, score, score_on};
pub use views::{MatchSummary, Page, ViewError, above_threshold, in_bucket, limit, page, summarize};
pub use weights::{
    DemographicsInactive, STANDARD_SPLIT, STUDY_SPLIT, ScoreSplit, TotalWeighting, parse_split,
};
