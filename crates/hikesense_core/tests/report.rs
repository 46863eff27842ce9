use hikesense_core::{
    average_score, classify, count_by_sentiment, distribution, filter_by_sentiment, summarize,
    Response, Sentiment, SentimentResult,
};

fn response(score: f64) -> Response {
    Response::new(format!("score {score}"), SentimentResult::from_score(score))
}

#[test]
fn classify_moderate_iff_within_inclusive_band() {
    let samples = [
        -1.0, -0.5, -0.100_000_1, -0.1, -0.05, 0.0, 0.05, 0.1, 0.100_000_1, 0.5, 1.0,
    ];
    for score in samples {
        let is_moderate = classify(score) == Sentiment::Moderate;
        assert_eq!(is_moderate, (-0.1..=0.1).contains(&score), "score {score}");
    }
    assert_eq!(classify(0.1), Sentiment::Moderate);
    assert_eq!(classify(0.1 + 1e-9), Sentiment::Positive);
    assert_eq!(classify(-0.1 - 1e-9), Sentiment::Negative);
}

#[test]
fn average_of_empty_collection_is_zero() {
    assert_eq!(average_score(&[]), 0.0);
}

#[test]
fn average_is_arithmetic_mean() {
    let responses = vec![response(0.8), response(-0.4)];
    assert!((average_score(&responses) - 0.2).abs() < 1e-12);
}

#[test]
fn counts_always_have_three_keys_summing_to_size() {
    let empty = count_by_sentiment(&[]);
    assert_eq!(empty.len(), 3);
    assert!(empty.values().all(|count| *count == 0));

    let responses = vec![response(0.9), response(0.5), response(0.05), response(-0.7)];
    let counts = count_by_sentiment(&responses);
    assert_eq!(counts.len(), 3);
    assert_eq!(counts[&Sentiment::Positive], 2);
    assert_eq!(counts[&Sentiment::Moderate], 1);
    assert_eq!(counts[&Sentiment::Negative], 1);
    assert_eq!(counts.values().sum::<usize>(), responses.len());
}

#[test]
fn distribution_order_is_fixed() {
    let responses = vec![response(-0.9), response(-0.8), response(0.0)];
    assert_eq!(
        distribution(&responses),
        vec![
            (Sentiment::Positive, 0),
            (Sentiment::Moderate, 1),
            (Sentiment::Negative, 2)
        ]
    );
}

#[test]
fn filter_is_a_pure_view() {
    let responses = vec![response(0.9), response(-0.9), response(0.0)];

    let negative = filter_by_sentiment(&responses, Some(Sentiment::Negative));
    assert_eq!(negative.len(), 1);
    assert_eq!(negative[0].id, responses[1].id);

    let all = filter_by_sentiment(&responses, None);
    assert_eq!(all.len(), 3);
    assert_eq!(responses.len(), 3);
}

#[test]
fn summary_serializes_with_snake_case_sentiments() {
    let summary = summarize(&[response(0.8), response(-0.4)]);
    let json = serde_json::to_value(&summary).unwrap();

    assert_eq!(json["total"], 2);
    assert_eq!(json["distribution"][0][0], "positive");
    assert_eq!(json["distribution"][1][0], "moderate");
    assert_eq!(json["distribution"][2][0], "negative");
}
