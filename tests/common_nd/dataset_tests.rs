use approx::assert_abs_diff_eq;
use kscore::estimators::approaches::common_nd::dataset::SampleSet;
use kscore::estimators::{ScoreError, ScoreEstimator, Stein, Tikhonov};
use ndarray::{Array1, Array2, array};

#[test]
fn sample_set_from_array_construction() {
    let data: Array2<f64> = array![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [1.0, 1.0]];
    let set = SampleSet::from_array2(data.clone()).unwrap();
    assert_eq!((set.n(), set.d()), (4, 2));
    assert_eq!(set.points(), &data);

    let x: Array1<f64> = Array1::from(vec![0.0, 2.0, 5.0]);
    let set1 = SampleSet::from_array1(x).unwrap();
    assert_eq!((set1.n(), set1.d()), (3, 1));
    assert_eq!(set1.points()[[1, 0]], 2.0);
}

#[test]
fn select_keeps_requested_order() {
    let set = SampleSet::from_array2(array![[0.0], [1.0], [2.0], [3.0]]).unwrap();
    assert_eq!(set.select(&[3, 1]).unwrap(), array![[3.0], [1.0]]);
    assert!(matches!(
        set.select(&[0, 4]),
        Err(ScoreError::InvalidConfiguration { parameter: "indices", .. })
    ));
}

#[test]
fn fewer_than_two_samples_are_rejected() {
    let est = Tikhonov::new(1.0, 0.1).unwrap();
    let err = est.fit(array![[0.3, -0.2]].view()).unwrap_err();
    assert!(matches!(err, ScoreError::InsufficientSamples(_)));

    let empty = Array2::<f64>::zeros((0, 2));
    assert!(matches!(
        est.fit(empty.view()),
        Err(ScoreError::InsufficientSamples(_))
    ));
}

#[test]
fn zero_dimensional_samples_are_rejected() {
    let data = Array2::<f64>::zeros((5, 0));
    assert!(matches!(
        SampleSet::from_array2(data),
        Err(ScoreError::InsufficientSamples(_))
    ));
}

#[test]
fn non_finite_samples_and_queries_are_rejected() {
    let est = Stein::new(1.0).unwrap();
    let err = est
        .fit(array![[0.0], [1.0], [f64::INFINITY]].view())
        .unwrap_err();
    assert_eq!(
        err,
        ScoreError::NonFiniteInput {
            what: "samples",
            row: 2
        }
    );

    let fitted = est.fit(array![[0.0], [1.0]].view()).unwrap();
    let err = fitted.predict(array![[0.5], [f64::NAN]].view()).unwrap_err();
    assert_eq!(
        err,
        ScoreError::NonFiniteInput {
            what: "query points",
            row: 1
        }
    );
}

#[test]
fn duplicate_samples_are_accepted() {
    let est = Tikhonov::new(1.0, 0.1).unwrap();
    let scores = est
        .estimate_gradients_s(array![[0.5], [0.5], [1.0], [-0.4]].view())
        .unwrap();
    assert!(scores.iter().all(|v| v.is_finite()));
    assert_abs_diff_eq!(scores[[0, 0]], scores[[1, 0]], epsilon = 1e-10);
}
