use kscore::estimators::{Kde, ScoreEstimator};

use crate::test_helpers::{generate_gaussian_data, init_logger, standard_normal_recovery_mae};

#[test]
fn kde_recovers_the_standard_normal_score() {
    init_logger();
    let est = Kde::new(0.35).unwrap();
    let mae = standard_normal_recovery_mae(&est);
    println!("KDE MAE on [-3, 3]: {mae}");
    assert!(mae < 0.3, "MAE {mae}");
}

#[test]
fn kde_is_finite_far_outside_the_samples() {
    let samples = generate_gaussian_data(100, 3, 0.0, 1.0, 4);
    let est = Kde::new(0.2).unwrap();
    let query = generate_gaussian_data(5, 3, 200.0, 1.0, 5);
    let scores = est.estimate_gradients_x_s(query.view(), samples.view()).unwrap();
    assert!(scores.iter().all(|v| v.is_finite()));
    assert!(scores.iter().all(|v| *v < 0.0));
}
