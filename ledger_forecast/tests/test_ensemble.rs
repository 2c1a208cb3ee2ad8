use approx::assert_abs_diff_eq;
use ledger_forecast::ensemble::{
    fallback_forecast, BoostedTreeStrategy, EnsembleAdapter, EnsembleWeights, ForecastStrategy,
    ModelPredictions, SequenceStrategy, StructuralStrategy, FALLBACK_CONFIDENCE,
};
use rstest::rstest;

fn unavailable_adapter() -> EnsembleAdapter {
    EnsembleAdapter::with_strategies(
        Box::new(SequenceStrategy::unavailable()),
        Box::new(StructuralStrategy::unavailable()),
        Box::new(BoostedTreeStrategy::unavailable()),
    )
}

fn seasonal_history() -> Vec<f64> {
    (0..24)
        .map(|i| 5000.0 + 80.0 * i as f64 + [0.0, 300.0, 600.0, 300.0][i % 4])
        .collect()
}

#[test]
fn test_default_weights() {
    let weights = EnsembleWeights::default();
    assert_eq!(weights.as_array(), [0.35, 0.35, 0.30]);
    assert_abs_diff_eq!(weights.sum(), 1.0, epsilon = 1e-12);
}

#[test]
fn test_weights_from_errors_are_inverse() {
    let weights = EnsembleWeights::from_errors([1.0, 2.0, 4.0]);

    assert_abs_diff_eq!(weights.sequence, 1.0 / 1.75, epsilon = 1e-12);
    assert_abs_diff_eq!(weights.structural, 0.5 / 1.75, epsilon = 1e-12);
    assert_abs_diff_eq!(weights.boosted, 0.25 / 1.75, epsilon = 1e-12);
}

#[rstest]
#[case([1.0, 1.0, 1.0])]
#[case([0.001, 250.0, 3.5])]
#[case([1e6, 2e6, 3e6])]
fn test_updated_weights_sum_to_one(#[case] errors: [f64; 3]) {
    assert_abs_diff_eq!(EnsembleWeights::from_errors(errors).sum(), 1.0, epsilon = 1e-12);
}

#[test]
fn test_update_weights_from_predictions() {
    let adapter = EnsembleAdapter::new();
    let actual = [100.0, 100.0];
    let predictions = ModelPredictions {
        sequence: vec![100.0, 100.0],  // error 0, weighted as error 1
        structural: vec![101.0, 99.0], // error 1
        boosted: vec![98.0, 102.0],    // error 2
    };

    let weights = adapter.update_weights(&actual, &predictions);

    assert_abs_diff_eq!(weights.sequence, 0.4, epsilon = 1e-12);
    assert_abs_diff_eq!(weights.structural, 0.4, epsilon = 1e-12);
    assert_abs_diff_eq!(weights.boosted, 0.2, epsilon = 1e-12);

    // The adapter itself keeps its snapshot until a new one is installed
    assert_eq!(adapter.weights(), EnsembleWeights::default());
    let adapter = adapter.with_weights(weights);
    assert_eq!(adapter.weights(), weights);
}

#[test]
fn test_update_weights_without_actuals_keeps_snapshot() {
    let adapter = EnsembleAdapter::new().with_weights(EnsembleWeights::new(2.0, 1.0, 1.0));
    let weights = adapter.update_weights(&[], &ModelPredictions::default());

    assert_abs_diff_eq!(weights.sequence, 0.5, epsilon = 1e-12);
    assert_abs_diff_eq!(weights.structural, 0.25, epsilon = 1e-12);
}

#[test]
fn test_unbounded_error_gets_no_weight() {
    let weights = EnsembleWeights::from_errors([1.0, 1.0, f64::INFINITY]);
    assert_eq!(weights.as_array(), [0.5, 0.5, 0.0]);

    let weights = EnsembleWeights::from_errors([2.0, f64::NAN, 2.0]);
    assert_eq!(weights.as_array(), [0.5, 0.0, 0.5]);

    assert_eq!(EnsembleWeights::try_from_errors([f64::NAN, f64::INFINITY, f64::INFINITY]), None);
}

#[test]
fn test_update_weights_with_only_unusable_errors_keeps_snapshot() {
    let current = EnsembleWeights::new(0.6, 0.2, 0.2);
    let adapter = EnsembleAdapter::new().with_weights(current);
    let predictions = ModelPredictions {
        sequence: vec![f64::NAN],
        structural: vec![f64::INFINITY],
        boosted: vec![f64::NAN],
    };

    assert_eq!(adapter.update_weights(&[100.0], &predictions), adapter.weights());
}

#[test]
fn test_invalid_weights_reset_to_default() {
    let adapter = EnsembleAdapter::new().with_weights(EnsembleWeights::new(-1.0, 0.5, 0.5));
    assert_eq!(adapter.weights(), EnsembleWeights::default());
}

#[test]
fn test_unavailable_strategies_fall_back() {
    let history = [100.0, 120.0, 80.0, 100.0];
    let adapter = unavailable_adapter();

    assert_eq!(adapter.availability(), [false, false, false]);

    let components = adapter.component_forecasts(&history, 3);
    assert_eq!(components[0][0].model, "sequence_fallback");
    assert_eq!(components[1][0].model, "structural_fallback");
    assert_eq!(components[2][0].model, "boosted_trees_fallback");

    let points = adapter.forecast(&history, 3);
    assert_eq!(points.len(), 3);
    for point in &points {
        assert_eq!(point.model, "ensemble");
        assert_abs_diff_eq!(point.predicted_value, 100.0, epsilon = 1e-9);
        assert_abs_diff_eq!(point.confidence, FALLBACK_CONFIDENCE, epsilon = 1e-12);
    }
}

#[test]
fn test_fallback_forecast_band() {
    let points = fallback_forecast("custom", &[90.0, 110.0], 2);

    // mean 100, population std dev 10
    for point in &points {
        assert_abs_diff_eq!(point.predicted_value, 100.0, epsilon = 1e-9);
        assert_abs_diff_eq!(point.lower_bound, 100.0 - 19.6, epsilon = 1e-9);
        assert_abs_diff_eq!(point.upper_bound, 100.0 + 19.6, epsilon = 1e-9);
        assert_eq!(point.model, "custom_fallback");
    }
}

#[test]
fn test_ensemble_lies_between_components() {
    let history = seasonal_history();
    let mut adapter = EnsembleAdapter::new();
    adapter.train(&history);

    let components = adapter.component_forecasts(&history, 6);
    let blended = adapter.combine(&components);

    assert_eq!(blended.len(), 6);
    for (i, point) in blended.iter().enumerate() {
        let values = [
            components[0][i].predicted_value,
            components[1][i].predicted_value,
            components[2][i].predicted_value,
        ];
        let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

        assert!(point.predicted_value >= min - 1e-9);
        assert!(point.predicted_value <= max + 1e-9);

        let lowest = components.iter().map(|c| c[i].lower_bound).fold(f64::INFINITY, f64::min);
        let highest = components.iter().map(|c| c[i].upper_bound).fold(f64::NEG_INFINITY, f64::max);
        assert_abs_diff_eq!(point.lower_bound, lowest, epsilon = 1e-9);
        assert_abs_diff_eq!(point.upper_bound, highest, epsilon = 1e-9);

        let mean_confidence = components.iter().map(|c| c[i].confidence).sum::<f64>() / 3.0;
        assert_abs_diff_eq!(point.confidence, mean_confidence, epsilon = 1e-12);
        assert!(point.is_consistent());
    }
}

#[test]
fn test_short_history_uses_fallbacks_even_when_available() {
    let points = EnsembleAdapter::new().forecast(&[10.0, 30.0], 2);

    for point in &points {
        assert_abs_diff_eq!(point.predicted_value, 20.0, epsilon = 1e-9);
        assert_abs_diff_eq!(point.confidence, FALLBACK_CONFIDENCE, epsilon = 1e-12);
    }
}

#[cfg(feature = "structural-model")]
#[test]
fn test_structural_continues_exact_line() {
    let history = [10.0, 20.0, 30.0, 40.0, 50.0, 60.0];
    let mut strategy = StructuralStrategy::new();
    assert!(strategy.is_available());

    strategy.train(&history);
    let points = strategy.predict(&history, 2);

    assert_abs_diff_eq!(points[0].predicted_value, 70.0, epsilon = 1e-9);
    assert_abs_diff_eq!(points[1].predicted_value, 80.0, epsilon = 1e-9);
    assert_eq!(points[0].model, "structural");
    assert!(points[0].confidence > FALLBACK_CONFIDENCE);
}

#[cfg(feature = "sequence-model")]
#[test]
fn test_sequence_follows_trend() {
    let history: Vec<f64> = (0..11).map(|i| 100.0 + 10.0 * i as f64).collect();
    let strategy = SequenceStrategy::new();

    let points = strategy.predict(&history, 1);

    assert_eq!(points[0].model, "sequence");
    assert_abs_diff_eq!(points[0].predicted_value, 210.0, epsilon = 10.0);
}

#[cfg(feature = "sequence-model")]
#[rstest]
#[case(SequenceStrategy::min_history(), "sequence")]
#[case(SequenceStrategy::min_history() - 1, "sequence_fallback")]
fn test_sequence_minimum_history(#[case] len: usize, #[case] expected: &str) {
    let history: Vec<f64> = (0..len).map(|i| 100.0 + 10.0 * i as f64).collect();
    let mut strategy = SequenceStrategy::new();
    strategy.train(&history);

    let points = strategy.predict(&history, 1);

    assert_eq!(SequenceStrategy::min_history(), 5);
    assert_eq!(points[0].model, expected);
    assert!(points[0].is_consistent());
}

#[cfg(feature = "boosted-model")]
#[test]
fn test_boosted_trees_on_flat_history() {
    let history = vec![250.0; 10];
    let mut strategy = BoostedTreeStrategy::new();
    strategy.train(&history);

    let points = strategy.predict(&history, 3);

    for point in &points {
        assert_abs_diff_eq!(point.predicted_value, 250.0, epsilon = 1e-9);
        assert_eq!(point.model, "boosted_trees");
    }
}
