use super::{Direction, OptionsError, TrainOptions};
use crate::nn::{Device, LrPolicy};

#[test]
fn test_defaults_match_training_script() {
    let opt = TrainOptions::default();
    assert_eq!(opt.lambda_a, 10.0);
    assert_eq!(opt.lambda_identity, 0.5);
    assert_eq!(opt.pool_size, 10);
    assert_eq!(opt.update_step, 4);
    assert_eq!(opt.lr_g, 2e-4);
    assert_eq!(opt.lr_d, 1e-4);
    assert_eq!(opt.gpu_ids, vec![0, 1]);
    assert_eq!(opt.which_direction, Direction::AtoB);
    assert_eq!(opt.lr_policy().unwrap(), LrPolicy::Step);
    opt.validate().unwrap();
}

#[test]
fn test_load_from_json_with_original_key_names() {
    let opt = TrainOptions::from_json_str(
        r#"{
            "lambda_A": 5.0,
            "lambda_cls_B": 1.5,
            "lr_G": 0.001,
            "which_direction": "BtoA",
            "gpu_ids": [],
            "lr_policy": "lambda",
            "no_lsgan": true
        }"#,
    )
    .unwrap();
    assert_eq!(opt.lambda_a, 5.0);
    assert_eq!(opt.lambda_b, 10.0);
    assert_eq!(opt.lambda_cls_b, 1.5);
    assert_eq!(opt.lr_g, 0.001);
    assert_eq!(opt.which_direction, Direction::BtoA);
    assert!(opt.no_lsgan);
    assert_eq!(opt.lr_policy().unwrap(), LrPolicy::Lambda);
}

#[test]
fn test_any_direction_other_than_a_to_b_is_b_first() {
    for (raw, expected) in [
        ("AtoB", Direction::AtoB),
        ("BtoA", Direction::BtoA),
        ("atob", Direction::BtoA),
        ("", Direction::BtoA),
    ] {
        assert_eq!(Direction::from(raw.to_string()), expected);
    }
}

#[test]
fn test_json_round_trip_keeps_original_names() {
    let json = TrainOptions::default().to_json_string().unwrap();
    assert!(json.contains("\"lambda_A\""));
    assert!(json.contains("\"lr_D\""));
    assert!(json.contains("\"AtoB\""));
    assert_eq!(
        TrainOptions::from_json_str(&json).unwrap(),
        TrainOptions::default()
    );
}

#[test]
fn test_validate_rejects_misconfiguration() {
    let bad_policy = TrainOptions {
        lr_policy: "linear".to_string(),
        ..Default::default()
    };
    assert!(matches!(
        bad_policy.validate(),
        Err(OptionsError::LrPolicy(_))
    ));

    let cases = [
        (
            TrainOptions {
                update_step: 0,
                ..Default::default()
            },
            "update_step",
        ),
        (
            TrainOptions {
                lambda_b: -1.0,
                ..Default::default()
            },
            "lambda_B",
        ),
        (
            TrainOptions {
                class_num: 1,
                ..Default::default()
            },
            "class_num",
        ),
        (
            TrainOptions {
                lr_d: 0.0,
                ..Default::default()
            },
            "lr_D",
        ),
    ];
    for (opt, expected) in cases {
        match opt.validate() {
            Err(OptionsError::InvalidValue { name, .. }) => assert_eq!(name, expected),
            other => panic!("{}应当无效，实际为{:?}", expected, other),
        }
    }

    assert!(matches!(
        TrainOptions::from_json_str("{ not json"),
        Err(OptionsError::Json(_))
    ));
}

#[test]
fn test_placement_from_gpu_ids() {
    let mut opt = TrainOptions {
        gpu_ids: vec![],
        ..Default::default()
    };
    assert_eq!(opt.placement().main, Device::Cpu);
    assert_eq!(opt.placement().classifier, Device::Cpu);

    opt.gpu_ids = vec![2];
    assert_eq!(opt.placement().main, Device::Cuda(2));
    assert_eq!(opt.placement().classifier, Device::Cuda(2));

    opt.gpu_ids = vec![0, 1, 3];
    assert_eq!(opt.placement().main, Device::Cuda(0));
    assert_eq!(opt.placement().classifier, Device::Cuda(1));

    // 负数编号被忽略
    opt.gpu_ids = vec![-1, 2];
    assert_eq!(opt.placement().main, Device::Cuda(2));
    assert_eq!(opt.placement().classifier, Device::Cuda(2));
}

#[test]
fn test_negative_gpu_id_from_json_means_cpu() {
    let opt = TrainOptions::from_json_str(r#"{"gpu_ids": [-1]}"#).unwrap();
    assert_eq!(opt.gpu_ids, vec![-1]);
    assert_eq!(opt.placement().main, Device::Cpu);
    assert_eq!(opt.placement().classifier, Device::Cpu);
}
