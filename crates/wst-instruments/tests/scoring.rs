use proptest::prelude::*;

use wst_instruments::scoring::{NOT_DETERMINED, Score, compute_score};

#[test]
fn mixed_full_scores() {
    assert_eq!(compute_score(&["3", "3", "0"], 0, 3).to_string(), "66.67");
}

#[test]
fn excluded_codes_shrink_the_denominator() {
    // Only "2" is scorable: 2 / 3 * 100.
    assert_eq!(compute_score(&["NP", "2", "TE"], 0, 3).to_string(), "66.67");
}

#[test]
fn all_maximum_is_one_hundred() {
    assert_eq!(compute_score(&["3", "3", "NP"], 0, 3).to_string(), "100.00");
}

#[test]
fn all_zero_is_zero() {
    assert_eq!(compute_score(&["0", "0"], 0, 2).to_string(), "0.00");
}

#[test]
fn only_excluded_codes_are_not_determined() {
    let score = compute_score(&["NP", "TE", ""], 0, 3);
    assert_eq!(score, Score::NotDetermined);
    assert_eq!(score.to_string(), NOT_DETERMINED);
    assert_eq!(score.percent(), None);
}

#[test]
fn empty_range_is_not_determined() {
    assert_eq!(compute_score(&["3"], 1, 1), Score::NotDetermined);
    assert_eq!(compute_score(&["3"], 2, 1), Score::NotDetermined);
    assert_eq!(compute_score::<&str>(&[], 0, 11), Score::NotDetermined);
}

#[test]
fn range_is_half_open() {
    let ratings = ["3", "0", "0"];
    assert_eq!(compute_score(&ratings, 0, 1).to_string(), "100.00");
    assert_eq!(compute_score(&ratings, 1, 3).to_string(), "0.00");
}

#[test]
fn end_beyond_ratings_is_clamped() {
    assert_eq!(compute_score(&["1", "2"], 0, 30).to_string(), "50.00");
}

#[test]
fn unparseable_codes_count_as_zero() {
    assert_eq!(compute_score(&["3", "x"], 0, 2).to_string(), "50.00");
}

#[test]
fn rounding_is_half_up_at_two_decimals() {
    // 1 / 96 * 100 = 1.041666..., 3 / 96 * 100 = 3.125 exactly.
    let mut ratings = vec!["0"; 32];
    ratings[0] = "3";
    assert_eq!(compute_score(&ratings, 0, 32).to_string(), "3.13");
    ratings[0] = "1";
    assert_eq!(compute_score(&ratings, 0, 32).to_string(), "1.04");
}

#[test]
fn score_serializes_as_its_display_string() {
    let json = serde_json::to_string(&compute_score(&["1"], 0, 1)).unwrap();
    assert_eq!(json, "\"33.33\"");
    let json = serde_json::to_string(&Score::NotDetermined).unwrap();
    assert_eq!(json, "\"N/D\"");
}

fn excluded_code() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just("NP"), Just("TE"), Just("")]
}

fn any_code() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just("0"),
        Just("1"),
        Just("2"),
        Just("3"),
        Just("NP"),
        Just("TE"),
        Just(""),
    ]
}

proptest! {
    #[test]
    fn excluded_only_ranges_are_not_determined(
        ratings in prop::collection::vec(excluded_code(), 0..40),
        start in 0usize..40,
        len in 0usize..40,
    ) {
        let score = compute_score(&ratings, start, start + len);
        prop_assert_eq!(score, Score::NotDetermined);
    }

    #[test]
    fn result_is_two_decimals_or_not_determined(
        ratings in prop::collection::vec(any_code(), 0..40),
        end in 0usize..45,
    ) {
        let text = compute_score(&ratings, 0, end).to_string();
        if text != NOT_DETERMINED {
            let (whole, fraction) = text.split_once('.').expect("decimal point");
            prop_assert!(!whole.is_empty() && whole.chars().all(|c| c.is_ascii_digit()));
            prop_assert_eq!(fraction.len(), 2);
            prop_assert!(fraction.chars().all(|c| c.is_ascii_digit()));
            let value: f64 = text.parse().unwrap();
            prop_assert!((0.0..=100.0).contains(&value));
        }
    }
}
