use std::{cmp::Ordering, collections::HashMap};

use chrono::{Local, NaiveDate};
use serde_json::Value;
use tracing::{debug, debug_span};

use super::{
    buckets::MatchBucket,
    scoring::{MatchScore, VolunteerScorer, volunteer_age},
};
use crate::{
    Volunteer,
    corrections::{Sex, normalize_phototype, normalize_sex},
    criteria::CriteriaSet,
    habits::HabitsRecord,
    ingest::{habits_from_value, volunteers_from_value},
    run_id,
};

/// One volunteer's outcome in a ranking run.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    pub volunteer_id: Option<i64>,
    pub display_name: String,
    pub sex: Option<Sex>,
    pub age: Option<u32>,
    pub phototype: Option<String>,
    pub skin_type: Option<String>,
    pub score: MatchScore,
    pub bucket: MatchBucket,
}

impl MatchResult {
    pub fn demographic_fraction(&self) -> f64 {
        self.score.demographic.fraction()
    }

    pub fn habits_fraction(&self) -> f64 {
        self.score.habits.fraction()
    }

    pub fn total_fraction(&self) -> f64 {
        self.score.total
    }

    pub fn demographic_percent(&self) -> u8 {
        self.score.demographic.percent()
    }

    pub fn habits_percent(&self) -> u8 {
        self.score.habits.percent()
    }

    pub fn total_percent(&self) -> u8 {
        self.score.total_percent()
    }
}

/// Stateless ranking entry point. Holds nothing between calls.
#[derive(Debug, Clone, Copy, Default)]
pub struct MatchingEngine;

impl MatchingEngine {
    pub fn new() -> Self {
        Self
    }

    pub fn rank(
        &self,
        volunteers: &[Volunteer],
        habits: &[HabitsRecord],
        criteria: &CriteriaSet,
    ) -> Vec<MatchResult> {
        rank(volunteers, habits, criteria)
    }

    pub fn rank_on(
        &self,
        volunteers: &[Volunteer],
        habits: &[HabitsRecord],
        criteria: &CriteriaSet,
        today: NaiveDate,
    ) -> Vec<MatchResult> {
        rank_on(volunteers, habits, criteria, today)
    }

    pub fn rank_value(
        &self,
        volunteers: &Value,
        habits: &Value,
        criteria: &CriteriaSet,
    ) -> Vec<MatchResult> {
        rank_value(volunteers, habits, criteria)
    }
}

/// Scores every volunteer and sorts by total score, best first. Ties keep
/// the input order.
pub fn rank(
    volunteers: &[Volunteer],
    habits: &[HabitsRecord],
    criteria: &CriteriaSet,
) -> Vec<MatchResult> {
    rank_on(volunteers, habits, criteria, Local::now().date_naive())
}

/// Same as [`rank`] with an explicit reference date for ages.
pub fn rank_on(
    volunteers: &[Volunteer],
    habits: &[HabitsRecord],
    criteria: &CriteriaSet,
    today: NaiveDate,
) -> Vec<MatchResult> {
    let run_id = run_id::generate();
    let _span = debug_span!("rank", %run_id).entered();

    let by_volunteer = index_habits(habits);
    let scorer = VolunteerScorer::new(criteria, today);

    let mut ranked: Vec<_> = volunteers
        .iter()
        .map(|volunteer| {
            let record = volunteer.id.and_then(|id| by_volunteer.get(&id).copied());
            build_match_result(&scorer, volunteer, record)
        })
        .collect();

    // sort_by is stable, which keeps equal scores in population order.
    ranked.sort_by(|a, b| {
        b.score
            .total
            .partial_cmp(&a.score.total)
            .unwrap_or(Ordering::Equal)
    });

    debug!(
        volunteers = volunteers.len(),
        habits = habits.len(),
        joined = ranked
            .iter()
            .filter(|r| r.volunteer_id.is_some_and(|id| by_volunteer.contains_key(&id)))
            .count(),
        best = ranked.first().map(|r| r.total_percent()),
        "ranked volunteers"
    );

    ranked
}

/// Ranks raw panel API arrays, dropping null or malformed entries first.
pub fn rank_value(volunteers: &Value, habits: &Value, criteria: &CriteriaSet) -> Vec<MatchResult> {
    let volunteers = volunteers_from_value(volunteers);
    let habits = habits_from_value(habits);
    rank(&volunteers, &habits, criteria)
}

/// Habits records keyed by the volunteer they belong to. The first record
/// seen for a volunteer wins.
fn index_habits(habits: &[HabitsRecord]) -> HashMap<i64, &HabitsRecord> {
    let mut index = HashMap::with_capacity(habits.len());
    for record in habits {
        match record.volunteer_id() {
            Some(id) => {
                if index.contains_key(&id) {
                    debug!(volunteer_id = id, "ignoring duplicate habits record");
                } else {
                    index.insert(id, record);
                }
            }
            None => debug!("habits record without volunteer reference"),
        }
    }
    index
}

fn build_match_result(
    scorer: &VolunteerScorer<'_>,
    volunteer: &Volunteer,
    habits: Option<&HabitsRecord>,
) -> MatchResult {
    let score = scorer.score(volunteer, habits);

    MatchResult {
        volunteer_id: volunteer.id,
        display_name: volunteer.display_name(),
        sex: volunteer.sex.as_deref().and_then(normalize_sex),
        age: volunteer_age(volunteer, scorer.today()),
        phototype: volunteer.phototype.as_deref().map(|raw| {
            normalize_phototype(raw)
                .map(|p| p.as_ref().to_string())
                .unwrap_or_else(|| raw.to_string())
        }),
        skin_type: volunteer.skin_type.clone(),
        bucket: MatchBucket::from_fraction(score.total),
        score,
    }
}
