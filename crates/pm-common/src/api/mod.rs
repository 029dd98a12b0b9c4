pub mod match_response;

pub use match_response::{FacetScoreDto, MatchResultDto, MatchSummaryDto, SubScoreDto};
