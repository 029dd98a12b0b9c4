use std::collections::HashMap;

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde_json::Value;
use thiserror::Error;
use tracing::{info, info_span, warn};

use crate::{
    Volunteer,
    criteria::{CriteriaError, CriteriaSet},
    habits::HabitsRecord,
    ingest::{habits_from_value, volunteers_from_value},
    matching::{MatchResult, MatchSummary, rank_on, summarize},
    run_id,
};

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("panel source unavailable: {0}")]
    Unavailable(String),
    #[error("invalid panel payload: {0}")]
    Payload(#[from] serde_json::Error),
}

/// Where volunteers, habits records and study criteria come from. The
/// engine itself only ever sees the loaded slices.
pub trait PanelSource {
    fn volunteers(&self) -> Result<Vec<Volunteer>, SourceError>;

    fn habits(&self) -> Result<Vec<HabitsRecord>, SourceError>;

    /// `Ok(None)` when the study has no stored criteria.
    fn study_criteria(&self, study_id: i64) -> Result<Option<CriteriaSet>, SourceError>;

    fn save_study_criteria(&mut self, study_id: i64, criteria: &CriteriaSet) -> Result<(), SourceError>;
}

/// Panel data held in memory, typically loaded from API payload dumps.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPanelSource {
    volunteers: Vec<Volunteer>,
    habits: Vec<HabitsRecord>,
    criteria: HashMap<i64, CriteriaSet>,
}

impl InMemoryPanelSource {
    pub fn new(volunteers: Vec<Volunteer>, habits: Vec<HabitsRecord>) -> Self {
        Self {
            volunteers,
            habits,
            criteria: HashMap::new(),
        }
    }

    /// Builds the source from the raw arrays the panel API returns.
    pub fn from_values(volunteers: &Value, habits: &Value) -> Self {
        Self::new(volunteers_from_value(volunteers), habits_from_value(habits))
    }

    pub fn with_study(mut self, study_id: i64, criteria: CriteriaSet) -> Self {
        self.criteria.insert(study_id, criteria);
        self
    }
}

impl PanelSource for InMemoryPanelSource {
    fn volunteers(&self) -> Result<Vec<Volunteer>, SourceError> {
        Ok(self.volunteers.clone())
    }

    fn habits(&self) -> Result<Vec<HabitsRecord>, SourceError> {
        Ok(self.habits.clone())
    }

    fn study_criteria(&self, study_id: i64) -> Result<Option<CriteriaSet>, SourceError> {
        Ok(self.criteria.get(&study_id).cloned())
    }

    fn save_study_criteria(&mut self, study_id: i64, criteria: &CriteriaSet) -> Result<(), SourceError> {
        self.criteria.insert(study_id, criteria.clone());
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum MatchRunError {
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error("study {0} has no matching criteria")]
    UnknownStudy(i64),
    #[error("invalid criteria: {0}")]
    InvalidCriteria(#[from] CriteriaError),
    #[error("no volunteers available in the panel")]
    NoVolunteers,
}

/// One ranking of the panel against a study.
#[derive(Debug, Clone)]
pub struct MatchRun {
    pub run_id: String,
    pub study_id: i64,
    pub matched_at: DateTime<Utc>,
    pub results: Vec<MatchResult>,
}

impl MatchRun {
    pub fn summary(&self) -> MatchSummary {
        summarize(&self.results)
    }
}

/// Loads panel data from a [`PanelSource`] and ranks it for a study.
pub struct MatchingService<S> {
    source: S,
}

impl<S: PanelSource> MatchingService<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn into_source(self) -> S {
        self.source
    }

    pub fn run(&self, study_id: i64) -> Result<MatchRun, MatchRunError> {
        self.run_on(study_id, Local::now().date_naive())
    }

    pub fn run_on(&self, study_id: i64, today: NaiveDate) -> Result<MatchRun, MatchRunError> {
        let run_id = run_id::generate();
        let _span = info_span!("match_run", %run_id, study_id).entered();

        let criteria = self
            .source
            .study_criteria(study_id)?
            .ok_or(MatchRunError::UnknownStudy(study_id))?;
        criteria.validate()?;
        if criteria.is_empty() {
            warn!("study criteria select nothing; every volunteer will score 0");
        }

        let volunteers = self.source.volunteers()?;
        if volunteers.is_empty() {
            return Err(MatchRunError::NoVolunteers);
        }
        let habits = self.source.habits()?;

        let results = rank_on(&volunteers, &habits, &criteria, today);
        let run = MatchRun {
            run_id,
            study_id,
            matched_at: Utc::now(),
            results,
        };

        let summary = run.summary();
        info!(
            volunteers = summary.total,
            strong = summary.strong,
            medium = summary.medium,
            weak = summary.weak,
            "match run completed"
        );
        Ok(run)
    }

    /// Validates then stores a study's criteria.
    pub fn update_criteria(&mut self, study_id: i64, criteria: &CriteriaSet) -> Result<(), MatchRunError> {
        criteria.validate()?;
        self.source.save_study_criteria(study_id, criteria)?;
        info!(study_id, "study criteria saved");
        Ok(())
    }
}
