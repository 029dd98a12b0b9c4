use chrono::NaiveDate;
use pm_common::{
    Volunteer,
    corrections::{Sex, TriState},
    criteria::{CriteriaSet, HabitFacet},
    habits::{HabitField, HabitsRecord},
    matching::{
        DemographicsInactive, MatchBucket, STANDARD_SPLIT, STUDY_SPLIT, TotalWeighting, rank_on,
        score_on, summarize,
    },
};
use serde_json::json;

const HAIR_OPTIONS: [(&str, HabitField); 4] = [
    ("Shampooing", HabitField::Shampooing),
    ("Après-shampooing", HabitField::ApresShampooing),
    ("Masque capillaire", HabitField::MasqueCapillaire),
    ("Coloration", HabitField::Coloration),
];

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
}

fn volunteer(id: i64, sex: &str, birth_date: &str) -> Volunteer {
    serde_json::from_value(json!({
        "idVol": id,
        "prenom": format!("V{id}"),
        "sexe": sex,
        "dateNaissance": birth_date,
        "phototype": "III",
        "typePeau": "Mixte",
    }))
    .unwrap()
}

fn face_care_study() -> CriteriaSet {
    CriteriaSet::new()
        .with_sex(Sex::Female, 5.0)
        .unwrap()
        .with_age_range(Some((18, 3.0)), Some((65, 3.0)))
        .unwrap()
        .with_habit_facet(HabitFacet::FaceCare, ["Soin hydratant", "Soin anti-âge"], 3.0)
        .unwrap()
}

fn hair_study() -> CriteriaSet {
    CriteriaSet::new()
        .with_sex(Sex::Female, 1.0)
        .unwrap()
        .with_habit_facet(HabitFacet::HairCare, HAIR_OPTIONS.map(|(label, _)| label), 2.0)
        .unwrap()
}

#[test]
fn scenario_a_female_thirty_partial_face_care() {
    let habits = HabitsRecord::new(Some(1))
        .with_answer(HabitField::SoinHydratantVisage, TriState::Yes)
        .with_answer(HabitField::SoinAntiAgeVisage, TriState::No);

    let ranked = rank_on(&[volunteer(1, "FEMME", "1994-01-10")], &[habits], &face_care_study(), today());
    let result = &ranked[0];

    assert_eq!(result.age, Some(30));
    assert_eq!(result.demographic_percent(), 100);
    assert_eq!(result.habits_percent(), 50);
    assert_eq!(result.total_percent(), 85);
    assert_eq!(result.bucket, MatchBucket::Strong);
}

#[test]
fn scenario_b_male_seventy_without_habits() {
    let ranked = rank_on(&[volunteer(2, "HOMME", "1954-01-10")], &[], &face_care_study(), today());
    let result = &ranked[0];

    assert_eq!(result.demographic_percent(), 0);
    assert_eq!(result.habits_percent(), 0);
    assert_eq!(result.total_percent(), 0);
    assert_eq!(result.bucket, MatchBucket::NonMatch);
}

#[test]
fn nothing_active_scores_zero_for_everyone() {
    let volunteers = vec![volunteer(1, "F", "1990-01-01"), volunteer(2, "H", "1980-01-01")];
    let ranked = rank_on(&volunteers, &[], &CriteriaSet::new(), today());

    assert!(ranked.iter().all(|r| r.total_fraction() == 0.0));
    assert_eq!(summarize(&ranked).non_match, 2);
}

#[test]
fn matched_demographics_without_habit_criteria_is_perfect() {
    let criteria = CriteriaSet::new()
        .with_sex(Sex::Female, 2.0)
        .unwrap()
        .with_age_range(Some((25, 1.0)), Some((40, 1.0)))
        .unwrap()
        .with_phototypes(["III", "IV"], 1.0)
        .unwrap()
        .with_skin_types(["Mixte"], 1.0)
        .unwrap();

    let score = score_on(&volunteer(1, "Femme", "1990-01-01"), None, &criteria, today());
    assert_eq!(score.demographic.percent(), 100);
    assert_eq!(score.total_percent(), 100);
}

#[test]
fn habits_score_grows_with_each_matching_option() {
    let who = volunteer(1, "F", "1990-01-01");
    let criteria = hair_study();

    let mut previous = None;
    for k in 0..=HAIR_OPTIONS.len() {
        let mut record = HabitsRecord::new(Some(1));
        for (_, field) in HAIR_OPTIONS.iter().take(k) {
            record.set_answer(*field, TriState::Yes);
        }

        let score = score_on(&who, Some(&record), &criteria, today());
        assert_eq!(score.habits.percent() as usize, k * 100 / HAIR_OPTIONS.len());
        if let Some(prev) = previous {
            assert!(score.total > prev, "k={k}");
        }
        previous = Some(score.total);
    }
}

#[test]
fn missing_habits_record_equals_all_no_record() {
    let who = volunteer(1, "F", "1990-01-01");
    let criteria = hair_study();

    let mut all_no = HabitsRecord::new(Some(1));
    for (_, field) in HAIR_OPTIONS {
        all_no.set_answer(field, TriState::No);
    }

    let missing = score_on(&who, None, &criteria, today());
    let explicit = score_on(&who, Some(&all_no), &criteria, today());
    assert_eq!(missing.total, explicit.total);
    assert_eq!(missing.habits.fraction(), explicit.habits.fraction());
    assert_eq!(missing.demographic, explicit.demographic);
}

#[test]
fn ranking_twice_gives_identical_output() {
    let volunteers: Vec<_> = (1..=6)
        .map(|id| volunteer(id, if id % 2 == 0 { "F" } else { "H" }, "1990-01-01"))
        .collect();
    let habits: Vec<_> = (1..=6)
        .filter(|id| id % 3 != 0)
        .map(|id| HabitsRecord::new(Some(id)).with_answer(HabitField::Shampooing, TriState::Yes))
        .collect();
    let criteria = hair_study();

    assert_eq!(
        rank_on(&volunteers, &habits, &criteria, today()),
        rank_on(&volunteers, &habits, &criteria, today())
    );
}

#[test]
fn demographics_inactive_policies() {
    let who = volunteer(1, "F", "1990-01-01");
    let record = HabitsRecord::new(Some(1))
        .with_answer(HabitField::Shampooing, TriState::Yes)
        .with_answer(HabitField::ApresShampooing, TriState::Yes);
    let labels = HAIR_OPTIONS.map(|(label, _)| label);

    let renormalized = CriteriaSet::new()
        .with_habit_facet(HabitFacet::HairCare, labels, 1.0)
        .unwrap()
        .with_weighting(TotalWeighting::new(STANDARD_SPLIT, DemographicsInactive::Renormalize));
    let score = score_on(&who, Some(&record), &renormalized, today());
    assert_eq!(score.total_percent(), 50);

    let fixed = renormalized
        .clone()
        .with_weighting(TotalWeighting::new(STANDARD_SPLIT, DemographicsInactive::FixedSplit));
    let score = score_on(&who, Some(&record), &fixed, today());
    assert_eq!(score.total_percent(), 15);
}

#[test]
fn study_split_weights_demographics_more() {
    let who = volunteer(1, "F", "1990-01-01");
    let record = HabitsRecord::new(Some(1));
    let criteria = hair_study().with_weighting(TotalWeighting::new(STUDY_SPLIT, DemographicsInactive::Renormalize));

    let score = score_on(&who, Some(&record), &criteria, today());
    assert_eq!(score.total_percent(), 80);
}

#[test]
fn criteria_round_trip_through_stored_json() {
    let stored = serde_json::to_value(face_care_study()).unwrap();
    let reloaded: CriteriaSet = serde_json::from_value(stored).unwrap();
    assert_eq!(reloaded, face_care_study());
    assert!(reloaded.validate().is_ok());
}
