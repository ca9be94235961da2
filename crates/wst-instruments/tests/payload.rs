use wst_core::models::patient::PatientRecord;
use wst_core::models::roster::PatientRoster;
use wst_instruments::Instrument;
use wst_instruments::error::InstrumentError;
use wst_instruments::instruments::wst::{DEFAULT_SKILLS, Wst};
use wst_instruments::payload::{PATIENT_KEY, build_report_payload, payload_keys, skill_key};

fn identified_patient() -> PatientRecord {
    let mut roster = PatientRoster::new(1, DEFAULT_SKILLS.len());
    roster.set_name(0, "ana souza").unwrap();
    roster.set_identifier(0, "hc-778").unwrap();
    for skill in 0..11 {
        roster.set_rating(0, skill, "3").unwrap();
    }
    for skill in 11..21 {
        roster.set_rating(0, skill, "NP").unwrap();
    }
    roster.set_rating(0, 29, "TE").unwrap();
    roster.set_rating(0, 28, "").unwrap();
    roster.patient(0).unwrap().clone()
}

#[test]
fn payload_carries_identifier_and_scores() {
    let payload = build_report_payload(&identified_patient());

    assert_eq!(payload.get(PATIENT_KEY), Some("HC-778"));
    assert_eq!(payload.get("home_score"), Some("100.00"));
    // Skills 12–21 are NP, so community equals home.
    assert_eq!(payload.get("community_score"), Some("100.00"));
    // 11 threes plus 7 zeros (skills 22–28) scorable: 33 / 54.
    assert_eq!(payload.get("advanced_score"), Some("61.11"));
}

#[test]
fn payload_has_every_key_in_order() {
    let patient = identified_patient();
    let payload = build_report_payload(&patient);

    assert_eq!(payload.len(), 4 + DEFAULT_SKILLS.len());
    let keys: Vec<&str> = payload.keys().collect();
    assert_eq!(&keys[..4], &["patient", "home_score", "community_score", "advanced_score"]);
    assert_eq!(keys[4], "skill_1");
    assert_eq!(keys[33], "skill_30");
    assert_eq!(
        payload.keys().map(str::to_string).collect::<Vec<_>>(),
        payload_keys(DEFAULT_SKILLS.len())
    );
}

#[test]
fn skill_keys_round_trip_raw_codes() {
    let patient = identified_patient();
    let payload = build_report_payload(&patient);
    for (index, code) in patient.ratings().iter().enumerate() {
        assert_eq!(payload.get(&skill_key(index + 1)), Some(code.as_str()));
    }
}

#[test]
fn unknown_codes_pass_through_verbatim() {
    let patient = PatientRecord::from_parts(
        "",
        "X",
        vec!["3".to_string(), "??".to_string(), "1".to_string()],
    );
    let payload = build_report_payload(&patient);
    assert_eq!(payload.get("skill_2"), Some("??"));
    assert_eq!(payload.get("home_score"), Some("44.44"));
}

#[test]
fn blank_record_scores_zero() {
    let payload = build_report_payload(&PatientRecord::new(30));
    assert_eq!(payload.get("home_score"), Some("0.00"));
    assert_eq!(payload.get("advanced_score"), Some("0.00"));
    assert_eq!(payload.get(PATIENT_KEY), Some(""));
}

#[test]
fn payload_serializes_as_json_object() {
    let payload = build_report_payload(&identified_patient());
    let value = serde_json::to_value(&payload).unwrap();
    let object = value.as_object().unwrap();
    assert_eq!(object.len(), payload.len());
    assert_eq!(object["patient"], "HC-778");
    assert_eq!(object["skill_30"], "TE");
}

#[test]
fn insert_replaces_existing_key() {
    let mut payload = wst_instruments::payload::ReportPayload::new();
    payload.insert("a", "1");
    payload.insert("b", "2");
    payload.insert("a", "3");
    assert_eq!(payload.len(), 2);
    assert_eq!(payload.iter().collect::<Vec<_>>(), vec![("a", "3"), ("b", "2")]);
}

#[test]
fn wst_definition() {
    let wst = Wst::new();
    assert_eq!(wst.id(), "wst");
    assert_eq!(wst.skills().len(), 30);
    let ranges: Vec<(usize, usize)> = wst.subscales().iter().map(|s| (s.start, s.end)).collect();
    assert_eq!(ranges, vec![(0, 11), (0, 21), (0, 30)]);
}

#[test]
fn score_patient_follows_subscales() {
    let wst = Wst::new();
    let scores = wst.score_patient(&identified_patient());
    let rendered: Vec<(String, String)> = scores
        .iter()
        .map(|(s, score)| (s.id.clone(), score.to_string()))
        .collect();
    assert_eq!(
        rendered,
        vec![
            ("home".to_string(), "100.00".to_string()),
            ("community".to_string(), "100.00".to_string()),
            ("advanced".to_string(), "61.11".to_string()),
        ]
    );
}

#[test]
fn validate_ratings_flags_unknown_codes_only() {
    let wst = Wst::new();
    assert!(wst.validate_ratings(&identified_patient()).is_empty());

    let mut ratings = vec!["0".to_string(); 30];
    ratings[4] = "5".to_string();
    ratings[7] = "np".to_string();
    let patient = PatientRecord::from_parts("", "", ratings);
    let errors = wst.validate_ratings(&patient);
    assert_eq!(errors.len(), 2);
    assert_eq!(errors[0].skill_index, 4);
    assert_eq!(errors[0].skill_name, "Turns while moving backward");
    assert_eq!(errors[1].code, "np");
    assert!(errors[1].message.contains("Reaches high object"));
}

#[test]
fn custom_skill_lists() {
    let wst = Wst::with_skills(vec!["A".to_string(), "B".to_string()]).unwrap();
    assert_eq!(wst.skills().len(), 2);

    assert!(matches!(
        Wst::with_skills(Vec::new()),
        Err(InstrumentError::EmptySkillList)
    ));
    assert!(matches!(
        Wst::with_skills(vec!["A".to_string(), " ".to_string()]),
        Err(InstrumentError::BlankSkillName(2))
    ));
}
