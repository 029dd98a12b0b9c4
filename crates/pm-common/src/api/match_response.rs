use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    corrections::Sex,
    matching::{FacetScore, MatchBucket, MatchResult, MatchSummary, SubScore, summarize},
    source::MatchRun,
};

/// Ranked volunteer as returned to the panel front end. Every score is
/// exposed both as a 0.0–1.0 fraction and a rounded percentage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResultDto {
    pub run_id: String,
    pub rank: usize,
    pub volunteer_id: Option<i64>,
    pub display_name: String,
    pub sex: Option<Sex>,
    pub age: Option<u32>,
    pub phototype: Option<String>,
    pub skin_type: Option<String>,

    pub total_score: f64,
    pub total_percent: u8,
    pub bucket: MatchBucket,
    pub demographic: SubScoreDto,
    pub habits: SubScoreDto,

    pub matched_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubScoreDto {
    pub score: f64,
    pub percent: u8,
    pub achieved: f64,
    pub max_possible: f64,
    pub facets: Vec<FacetScoreDto>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacetScoreDto {
    pub facet: String,
    pub weight: f64,
    pub achieved: f64,
    pub status: String,
    pub details: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchSummaryDto {
    pub run_id: String,
    pub study_id: Option<i64>,
    pub total: usize,
    pub strong: usize,
    pub medium: usize,
    pub weak: usize,
    pub non_match: usize,
    pub best_percent: Option<u8>,
    pub average_percent: Option<u8>,
    pub matched_at: DateTime<Utc>,
}

impl From<&FacetScore> for FacetScoreDto {
    fn from(facet: &FacetScore) -> Self {
        Self {
            facet: facet.facet.to_string(),
            weight: facet.weight,
            achieved: facet.achieved,
            status: facet.status.to_string(),
            details: facet.details.clone(),
        }
    }
}

impl From<&SubScore> for SubScoreDto {
    fn from(sub: &SubScore) -> Self {
        Self {
            score: sub.fraction(),
            percent: sub.percent(),
            achieved: sub.achieved,
            max_possible: sub.max_possible,
            facets: sub.facets.iter().map(FacetScoreDto::from).collect(),
        }
    }
}

impl MatchResultDto {
    /// `rank` is 1-based.
    pub fn from_match_result(
        run_id: &str,
        rank: usize,
        result: &MatchResult,
        matched_at: DateTime<Utc>,
    ) -> Self {
        Self {
            run_id: run_id.to_string(),
            rank,
            volunteer_id: result.volunteer_id,
            display_name: result.display_name.clone(),
            sex: result.sex,
            age: result.age,
            phototype: result.phototype.clone(),
            skin_type: result.skin_type.clone(),
            total_score: result.total_fraction(),
            total_percent: result.total_percent(),
            bucket: result.bucket,
            demographic: SubScoreDto::from(&result.score.demographic),
            habits: SubScoreDto::from(&result.score.habits),
            matched_at,
        }
    }

    /// DTOs for a slice of a run's ranking. `offset` is the position of
    /// `selected[0]` in the full ranking, so ranks stay global.
    pub fn from_run(run: &MatchRun, offset: usize, selected: &[MatchResult]) -> Vec<Self> {
        selected
            .iter()
            .enumerate()
            .map(|(i, result)| {
                let rank = offset.saturating_add(i).saturating_add(1);
                Self::from_match_result(&run.run_id, rank, result, run.matched_at)
            })
            .collect()
    }
}

impl MatchSummaryDto {
    pub fn from_summary(
        run_id: &str,
        study_id: Option<i64>,
        summary: &MatchSummary,
        matched_at: DateTime<Utc>,
    ) -> Self {
        Self {
            run_id: run_id.to_string(),
            study_id,
            total: summary.total,
            strong: summary.strong,
            medium: summary.medium,
            weak: summary.weak,
            non_match: summary.non_match,
            best_percent: summary.best_percent,
            average_percent: summary.average_percent,
            matched_at,
        }
    }

    /// Summary of the results selected from a run.
    pub fn from_run(run: &MatchRun, selected: &[MatchResult]) -> Self {
        Self::from_summary(&run.run_id, Some(run.study_id), &summarize(selected), run.matched_at)
    }
}
