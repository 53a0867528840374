use approx::assert_relative_eq;
use kscore::estimators::{FittedScore, Kernel, KernelType, ScoreEstimator, Stein};

use crate::test_helpers::{generate_gaussian_data, init_logger, standard_normal_recovery_mae};

#[test]
fn stein_recovers_the_standard_normal_score() {
    init_logger();
    let est = Stein::new(1.0).unwrap();
    let mae = standard_normal_recovery_mae(&est);
    println!("Stein MAE on [-3, 3]: {mae}");
    assert!(mae < 0.3, "MAE {mae}");
}

#[test]
fn stein_scale_sharpens_the_oversmoothed_score() {
    // Smoothing with bandwidth h shrinks the N(0, 1) score by 1/(1 + h²);
    // the fitted scale undoes part of that.
    let samples = generate_gaussian_data(400, 1, 0.0, 1.0, 3);
    let fitted = Stein::new(1.0).unwrap().fit(samples.view()).unwrap();
    match fitted {
        FittedScore::Stein(s) => assert!(s.scale() > 1.2 && s.scale() < 3.0, "scale {}", s.scale()),
        other => panic!("unexpected fit {other:?}"),
    }
}

#[test]
fn stein_prediction_is_scaled_smoothed_score() {
    let samples = generate_gaussian_data(50, 2, 0.0, 1.0, 9);
    let query = generate_gaussian_data(7, 2, 0.0, 2.0, 10);
    let kernel = Kernel::new(KernelType::InverseMultiquadric, 0.8).unwrap();
    let fitted = Stein::new_with_kernel(kernel.clone()).fit(samples.view()).unwrap();
    let scale = match &fitted {
        FittedScore::Stein(s) => s.scale(),
        other => panic!("unexpected fit {other:?}"),
    };
    let expected = kernel.smoothed_score(samples.view(), query.view()).unwrap() * scale;
    let predicted = fitted.predict(query.view()).unwrap();
    for (a, b) in predicted.iter().zip(expected.iter()) {
        assert_relative_eq!(*a, *b, epsilon = 1e-12, max_relative = 1e-12);
    }
}
