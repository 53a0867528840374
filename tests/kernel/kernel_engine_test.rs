use approx::assert_abs_diff_eq;
use kscore::estimators::approaches::common_nd::dataset::SampleSet;
use kscore::estimators::{
    Bandwidth, Estimator, Kde, Kernel, KernelType, Landweber, Nkef, NuMethod, RankSelection, ScoreError,
    ScoreEstimator, Ssge, Stein, Tikhonov,
};
use ndarray::{Array1, Array2, array};
use rstest::rstest;

use crate::test_helpers::generate_gaussian_data;

fn central_gradient(kernel: &Kernel, a: &Array2<f64>, b: &Array2<f64>, m: usize, eps: f64) -> f64 {
    let mut plus = a.clone();
    let mut minus = a.clone();
    plus[[0, m]] += eps;
    minus[[0, m]] -= eps;
    let k_plus = kernel.gram(plus.view(), b.view()).unwrap()[[0, 0]];
    let k_minus = kernel.gram(minus.view(), b.view()).unwrap()[[0, 0]];
    (k_plus - k_minus) / (2.0 * eps)
}

#[rstest]
fn gradient_matches_finite_differences(
    #[values(
        KernelType::Gaussian,
        KernelType::InverseMultiquadric,
        KernelType::InverseMultiquadricP(1.5)
    )]
    kind: KernelType,
    #[values(false, true)] linear: bool,
    #[values(1, 2, 5)] dims: usize,
) {
    let mut kernel = Kernel::new(kind, 0.9).unwrap();
    if linear {
        kernel = kernel.with_linear_term();
    }
    assert_eq!(kernel.kernel_type(), kind);
    let points = generate_gaussian_data(2, dims, 0.0, 0.7, 17);
    let a = points.slice(ndarray::s![0..1, ..]).to_owned();
    let b = points.slice(ndarray::s![1..2, ..]).to_owned();
    let g = kernel.gradient(a.view(), b.view()).unwrap();
    for m in 0..dims {
        let fd = central_gradient(&kernel, &a, &b, m, 1e-5);
        assert_abs_diff_eq!(g[[0, 0, m]], fd, epsilon = 1e-7);
    }
}

#[test]
fn per_dimension_bandwidth_scales_each_axis() {
    let kernel = Kernel::new(KernelType::Gaussian, array![1.0, 2.0]).unwrap();
    let k = kernel.gram(array![[0.0, 0.0]].view(), array![[1.0, 2.0]].view()).unwrap();
    // t = 1 + 1
    assert_abs_diff_eq!(k[[0, 0]], (-1.0_f64).exp(), epsilon = 1e-15);
}

#[test]
fn per_dimension_bandwidth_must_match_the_data() {
    let est = Tikhonov::new(Array1::from(vec![1.0, 1.0, 1.0]), 0.1).unwrap();
    let err = est.fit(array![[0.0, 1.0], [1.0, 0.0], [0.5, 0.5]].view()).unwrap_err();
    assert!(matches!(
        err,
        ScoreError::InvalidConfiguration {
            parameter: "bandwidth",
            ..
        }
    ));
}

#[test]
fn kernel_types_parse_from_names() {
    assert_eq!("Gaussian".parse::<KernelType>().unwrap(), KernelType::Gaussian);
    assert_eq!("rbf".parse::<KernelType>().unwrap(), KernelType::Gaussian);
    assert_eq!("imq".parse::<KernelType>().unwrap(), KernelType::InverseMultiquadric);
    assert_eq!("imqp:2".parse::<KernelType>().unwrap(), KernelType::InverseMultiquadricP(2.0));
    assert!("imqp:x".parse::<KernelType>().is_err());
    assert!("box".parse::<KernelType>().is_err());
    assert_eq!(KernelType::InverseMultiquadric.to_string(), "imq");
}

#[test]
fn bandwidth_validation() {
    assert!(Kernel::gaussian(0.0).is_err());
    assert!(Kernel::gaussian(f64::NAN).is_err());
    assert!(Kernel::new(KernelType::Gaussian, array![1.0, -1.0]).is_err());
    let kernel = Kernel::gaussian(0.5).unwrap();
    assert_eq!(kernel.bandwidth(), &Bandwidth::Isotropic(0.5));
    assert_eq!(kernel.max_value(), Some(1.0));
    assert_eq!(kernel.kernel_type(), KernelType::Gaussian);
    assert!(!kernel.has_linear_term());
    assert_eq!(kernel.clone().with_linear_term().max_value(), None);
    assert!(Kernel::new(KernelType::InverseMultiquadricP(0.0), 1.0).is_err());
    assert!(Kernel::new(KernelType::InverseMultiquadricP(f64::INFINITY), 1.0).is_err());
}

#[test]
fn imqp_kernel_value_and_linear_term() {
    let imqp = Kernel::new(KernelType::InverseMultiquadricP(2.0), 1.0).unwrap();
    let a = array![[1.0, 0.0]];
    let b = array![[0.0, 1.0]];
    // t = 2, (1 + t)^(-2)
    assert_abs_diff_eq!(imqp.gram(a.view(), b.view()).unwrap()[[0, 0]], 1.0 / 9.0, epsilon = 1e-15);

    let linear = imqp.with_linear_term();
    let b = array![[2.0, 1.0]];
    // t = 2 again, plus <a, b> = 2
    assert_abs_diff_eq!(linear.gram(a.view(), b.view()).unwrap()[[0, 0]], 1.0 / 9.0 + 2.0, epsilon = 1e-15);
}

/// Fitting from a prepared sample set must report a bandwidth of the wrong
/// length as a configuration error rather than reaching the kernel loops.
#[test]
fn fit_samples_reports_bandwidth_length_mismatch() {
    let kernel = Kernel::new(KernelType::Gaussian, array![1.0]).unwrap();
    let estimators: Vec<Estimator> = vec![
        Tikhonov::new_with_kernel(kernel.clone(), 0.1).unwrap().into(),
        Nkef::new_with_kernel(kernel.clone(), 0.1, 0.5).unwrap().into(),
        Landweber::new_with_kernel(kernel.clone(), 5).unwrap().into(),
        NuMethod::new_with_kernel(kernel.clone(), 5).unwrap().into(),
        Ssge::new_with_kernel(kernel.clone(), RankSelection::Fixed(2)).unwrap().into(),
        Stein::new_with_kernel(kernel.clone()).into(),
        Kde::new_with_kernel(kernel).into(),
    ];
    let data = array![[0.0, 1.0], [1.0, 0.0], [0.5, 0.5]];
    for est in &estimators {
        let samples = SampleSet::from_array2(data.clone()).unwrap();
        let err = est.fit_samples(samples).unwrap_err();
        assert!(
            matches!(err, ScoreError::InvalidConfiguration { parameter: "bandwidth", .. }),
            "{}: {err:?}",
            est.name()
        );
    }
}

#[test]
fn kernel_arguments_must_share_dimensions() {
    let kernel = Kernel::gaussian(1.0).unwrap();
    let a = array![[0.0, 1.0]];
    let b = array![[0.0]];
    assert!(matches!(kernel.gram(a.view(), b.view()), Err(ScoreError::InsufficientSamples(_))));
    assert!(kernel.gradient(a.view(), b.view()).is_err());
    assert!(kernel.mixed_trace(a.view(), b.view()).is_err());
    assert!(kernel.smoothed_score(a.view(), b.view()).is_err());
}
