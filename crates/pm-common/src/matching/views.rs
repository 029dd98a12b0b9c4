use serde::Serialize;
use thiserror::Error;

use super::{
    buckets::{MatchBucket, to_percent},
    pipeline::MatchResult,
};

const MAX_PER_PAGE: usize = 200;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ViewError {
    #[error("page must be at least 1")]
    InvalidPage,
    #[error("per_page must be between 1 and {MAX_PER_PAGE}")]
    InvalidPerPage,
}

/// Leading results whose rounded total percentage is at least `min_percent`.
/// Expects the ranked order produced by [`super::rank`].
pub fn above_threshold(ranked: &[MatchResult], min_percent: u8) -> &[MatchResult] {
    let end = ranked.partition_point(|r| r.total_percent() >= min_percent);
    &ranked[..end]
}

/// First `n` results.
pub fn limit(ranked: &[MatchResult], n: usize) -> &[MatchResult] {
    &ranked[..n.min(ranked.len())]
}

pub fn in_bucket(ranked: &[MatchResult], bucket: MatchBucket) -> impl Iterator<Item = &MatchResult> {
    ranked.iter().filter(move |r| r.bucket == bucket)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Page<'a> {
    pub items: &'a [MatchResult],
    /// Position of `items[0]` in the paged list, clamped to its length.
    pub offset: usize,
    pub page: usize,
    pub per_page: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

/// 1-based page of the ranked list. Pages past the end are empty.
pub fn page(ranked: &[MatchResult], page: usize, per_page: usize) -> Result<Page<'_>, ViewError> {
    if page == 0 {
        return Err(ViewError::InvalidPage);
    }
    if !(1..=MAX_PER_PAGE).contains(&per_page) {
        return Err(ViewError::InvalidPerPage);
    }

    let total_items = ranked.len();
    let start = (page - 1).saturating_mul(per_page).min(total_items);
    let end = start.saturating_add(per_page).min(total_items);

    Ok(Page {
        items: &ranked[start..end],
        offset: start,
        page,
        per_page,
        total_items,
        total_pages: total_items.div_ceil(per_page),
    })
}

/// Bucket counts over a ranked list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchSummary {
    pub total: usize,
    pub strong: usize,
    pub medium: usize,
    pub weak: usize,
    pub non_match: usize,
    pub best_percent: Option<u8>,
    /// Mean of the total fractions, as a rounded percentage.
    pub average_percent: Option<u8>,
}

pub fn summarize(ranked: &[MatchResult]) -> MatchSummary {
    let mut summary = MatchSummary {
        total: ranked.len(),
        ..MatchSummary::default()
    };

    for result in ranked {
        match result.bucket {
            MatchBucket::Strong => summary.strong += 1,
            MatchBucket::Medium => summary.medium += 1,
            MatchBucket::Weak => summary.weak += 1,
            MatchBucket::NonMatch => summary.non_match += 1,
        }
        let percent = result.total_percent();
        summary.best_percent = Some(summary.best_percent.map_or(percent, |best| best.max(percent)));
    }

    if !ranked.is_empty() {
        let mean = ranked.iter().map(|r| r.score.total).sum::<f64>() / ranked.len() as f64;
        summary.average_percent = Some(to_percent(mean));
    }

    summary
}
