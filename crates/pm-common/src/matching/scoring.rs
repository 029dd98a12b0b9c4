use chrono::{Local, NaiveDate};

use super::buckets::to_percent;
use crate::{
    Volunteer,
    corrections::{normalize_sex, same_phototype, same_skin_type},
    criteria::{CriteriaSet, CriterionGroup, HabitFacet},
    date::{age_on, parse_birth_date},
    habits::HabitsRecord,
};

/// Outcome of one active facet.
#[derive(Debug, Clone, PartialEq)]
pub struct FacetScore {
    pub facet: &'static str,
    pub weight: f64,
    pub achieved: f64,
    pub status: &'static str,
    pub details: String,
}

/// Weighted sum over the active facets of one dimension.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubScore {
    pub achieved: f64,
    pub max_possible: f64,
    pub facets: Vec<FacetScore>,
}

impl SubScore {
    fn push(&mut self, facet: FacetScore) {
        self.achieved += facet.achieved;
        self.max_possible += facet.weight;
        self.facets.push(facet);
    }

    /// True when at least one facet with a positive weight took part.
    pub fn is_active(&self) -> bool {
        self.max_possible > 0.0
    }

    /// achieved / max_possible, or 0 when nothing is active.
    pub fn fraction(&self) -> f64 {
        if self.is_active() {
            (self.achieved / self.max_possible).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    pub fn percent(&self) -> u8 {
        to_percent(self.fraction())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchScore {
    pub demographic: SubScore,
    pub habits: SubScore,
    /// Weighted total in 0.0..=1.0.
    pub total: f64,
}

impl MatchScore {
    pub fn total_percent(&self) -> u8 {
        to_percent(self.total)
    }
}

/// Scores a volunteer against the criteria, using today's date for ages.
pub fn score(
    volunteer: &Volunteer,
    habits: Option<&HabitsRecord>,
    criteria: &CriteriaSet,
) -> MatchScore {
    score_on(volunteer, habits, criteria, Local::now().date_naive())
}

/// Same as [`score`] with an explicit reference date.
pub fn score_on(
    volunteer: &Volunteer,
    habits: Option<&HabitsRecord>,
    criteria: &CriteriaSet,
    today: NaiveDate,
) -> MatchScore {
    VolunteerScorer::new(criteria, today).score(volunteer, habits)
}

pub(crate) fn volunteer_age(volunteer: &Volunteer, today: NaiveDate) -> Option<u32> {
    volunteer
        .birth_date
        .as_deref()
        .and_then(parse_birth_date)
        .and_then(|birth| age_on(birth, today))
}

pub struct VolunteerScorer<'a> {
    criteria: &'a CriteriaSet,
    today: NaiveDate,
}

impl<'a> VolunteerScorer<'a> {
    pub fn new(criteria: &'a CriteriaSet, today: NaiveDate) -> Self {
        Self { criteria, today }
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn score(&self, volunteer: &Volunteer, habits: Option<&HabitsRecord>) -> MatchScore {
        let demographic = self.score_demographics(volunteer);
        let habits = self.score_habits(habits);

        let total = self.criteria.weighting().combine(
            demographic.is_active().then(|| demographic.fraction()),
            habits.is_active().then(|| habits.fraction()),
        );

        MatchScore {
            demographic,
            habits,
            total,
        }
    }

    pub fn score_demographics(&self, volunteer: &Volunteer) -> SubScore {
        let mut sub = SubScore::default();
        let facets = [
            self.score_sex(volunteer),
            self.score_age(volunteer),
            self.score_phototype(volunteer),
            self.score_skin_type(volunteer),
        ];
        for facet in facets.into_iter().flatten() {
            sub.push(facet);
        }
        sub
    }

    /// A missing record reads as every answer unset, so each active facet
    /// scores 0.
    pub fn score_habits(&self, habits: Option<&HabitsRecord>) -> SubScore {
        let mut sub = SubScore::default();
        for (facet, group) in self.criteria.habit_facets() {
            if let Some(result) = self.score_habit_facet(facet, group, habits) {
                sub.push(result);
            }
        }
        sub
    }

    fn score_sex(&self, volunteer: &Volunteer) -> Option<FacetScore> {
        let wanted = self.criteria.sex()?;
        let weight = self.criteria.sex_weight();
        let wanted_label: &'static str = wanted.into();

        let result = match volunteer.sex.as_deref().and_then(normalize_sex) {
            Some(actual) if actual == wanted => matched("sex", weight, format!("sexe: {wanted_label}")),
            Some(actual) => {
                let actual_label: &'static str = actual.into();
                missed("sex", weight, format!("sexe {actual_label} ≠ {wanted_label}"))
            }
            None => unknown(
                "sex",
                weight,
                format!("sexe non renseigné ({:?})", volunteer.sex.as_deref().unwrap_or("")),
            ),
        };
        Some(result)
    }

    /// Age range is one facet; its weight is the sum of the weights of the
    /// bounds that are set, and an unset bound is open.
    fn score_age(&self, volunteer: &Volunteer) -> Option<FacetScore> {
        let min = self.criteria.age_min();
        let max = self.criteria.age_max();
        let range = match (min.years, max.years) {
            (Some(l), Some(h)) => format!("{l}-{h} ans"),
            (Some(l), None) => format!(">= {l} ans"),
            (None, Some(h)) => format!("<= {h} ans"),
            (None, None) => return None,
        };

        let weight = min.years.map_or(0.0, |_| min.weight) + max.years.map_or(0.0, |_| max.weight);
        let low = min.years.unwrap_or(0);
        let high = max.years.unwrap_or(u32::MAX);

        let result = match volunteer_age(volunteer, self.today) {
            Some(age) if (low..=high).contains(&age) => {
                matched("age", weight, format!("{age} ans dans {range}"))
            }
            Some(age) => missed("age", weight, format!("{age} ans hors {range}")),
            None => unknown("age", weight, "date de naissance inexploitable".into()),
        };
        Some(result)
    }

    fn score_phototype(&self, volunteer: &Volunteer) -> Option<FacetScore> {
        self.score_set_facet(
            "phototype",
            self.criteria.phototypes(),
            volunteer.phototype.as_deref(),
            same_phototype,
        )
    }

    fn score_skin_type(&self, volunteer: &Volunteer) -> Option<FacetScore> {
        self.score_set_facet(
            "skin_type",
            self.criteria.skin_types(),
            volunteer.skin_type.as_deref(),
            same_skin_type,
        )
    }

    fn score_set_facet(
        &self,
        facet: &'static str,
        group: &CriterionGroup,
        actual: Option<&str>,
        same: fn(&str, &str) -> bool,
    ) -> Option<FacetScore> {
        if !group.is_active() {
            return None;
        }

        let weight = group.weight();
        let result = match actual {
            Some(value) if group.selected_values().iter().any(|wanted| same(value, wanted)) => {
                matched(facet, weight, format!("{value} retenu"))
            }
            Some(value) => missed(facet, weight, format!("{value} non retenu")),
            None => unknown(facet, weight, "non renseigné".into()),
        };
        Some(result)
    }

    /// Partial credit: weight × hits / selected options.
    fn score_habit_facet(
        &self,
        facet: HabitFacet,
        group: &CriterionGroup,
        habits: Option<&HabitsRecord>,
    ) -> Option<FacetScore> {
        if !group.is_active() {
            return None;
        }

        let selected = group.selected_values();
        let hits: Vec<&str> = selected
            .iter()
            .filter(|label| {
                match (facet.field_for(label), habits) {
                    (Some(field), Some(record)) => record.is_yes(field),
                    _ => false,
                }
            })
            .map(String::as_str)
            .collect();

        let weight = group.weight();
        let ratio = hits.len() as f64 / selected.len() as f64;
        let status = if hits.len() == selected.len() {
            "MATCH"
        } else if hits.is_empty() {
            "MISS"
        } else {
            "PARTIAL_MATCH"
        };

        let details = match habits {
            None => "aucune fiche d'habitudes".to_string(),
            Some(_) if hits.is_empty() => format!("0/{} option(s)", selected.len()),
            Some(_) => format!("{}/{} option(s): {}", hits.len(), selected.len(), hits.join(", ")),
        };

        Some(FacetScore {
            facet: facet.key(),
            weight,
            achieved: weight * ratio,
            status,
            details,
        })
    }
}

fn matched(facet: &'static str, weight: f64, details: String) -> FacetScore {
    FacetScore {
        facet,
        weight,
        achieved: weight,
        status: "MATCH",
        details,
    }
}

fn missed(facet: &'static str, weight: f64, details: String) -> FacetScore {
    FacetScore {
        facet,
        weight,
        achieved: 0.0,
        status: "MISS",
        details,
    }
}

fn unknown(facet: &'static str, weight: f64, details: String) -> FacetScore {
    FacetScore {
        facet,
        weight,
        achieved: 0.0,
        status: "UNKNOWN",
        details,
    }
}
