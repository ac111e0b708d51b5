use super::{VOLUME, build_model, small_batch, small_options};
use crate::models::networks::build_volume_networks;
use crate::models::{ClsBranch, JointGanModel, LOSS_NAMES, ModelError, SequenceSource};
use crate::nn::{Device, Graph, GraphError, Var};
use crate::options::{Direction, TrainOptions};
use crate::tensor::Tensor;
use approx::assert_abs_diff_eq;

fn grads(params: &[Var]) -> Vec<Option<Tensor>> {
    params.iter().map(|p| p.grad().unwrap()).collect()
}

fn values(params: &[Var]) -> Vec<Tensor> {
    params.iter().map(|p| p.value().unwrap()).collect()
}

fn generator_and_classifier_params(model: &JointGanModel) -> Vec<Var> {
    [
        model.networks().generator.parameters(),
        model.networks().classifier.parameters(),
    ]
    .concat()
}

fn discriminator_params(model: &JointGanModel) -> Vec<Var> {
    [
        model.networks().discriminator_a.parameters(),
        model.networks().discriminator_b.parameters(),
    ]
    .concat()
}

fn assert_tensors_close(a: &Tensor, b: &Tensor, epsilon: f32) {
    assert_eq!(a.shape(), b.shape());
    for (x, y) in a.to_vec().into_iter().zip(b.to_vec()) {
        assert_abs_diff_eq!(x, y, epsilon = epsilon);
    }
}

#[test]
fn test_forward_before_set_input_is_not_ready() {
    let mut model = build_model(small_options());
    assert!(matches!(model.forward(), Err(ModelError::NotReady("set_input"))));

    model.set_input(small_batch()).unwrap();
    assert!(matches!(model.backward_g(1), Err(ModelError::NotReady("forward"))));
    assert!(matches!(model.get_current_visuals(), Err(ModelError::NotReady("forward"))));
}

#[test]
fn test_label_count_must_match_batch_size() {
    let mut model = build_model(small_options());
    let mut batch = small_batch();
    batch.labels = vec![0, 1, 1];
    assert!(matches!(
        model.set_input(batch),
        Err(ModelError::Graph(GraphError::ShapeMismatch { .. }))
    ));
}

#[test]
fn test_set_input_releases_previous_batch() {
    let mut model = build_model(small_options());
    let params = model.graph().parameters_count();

    model.set_input(small_batch()).unwrap();
    // real_A、real_B、real_label
    assert_eq!(model.graph().nodes_count(), params + 3);

    model.optimize_parameters(1, true).unwrap();
    assert!(model.graph().nodes_count() > params + 3);

    model.set_input(small_batch()).unwrap();
    assert_eq!(model.graph().nodes_count(), params + 3);
}

#[test]
fn test_generator_phase_leaves_discriminators_untouched() {
    let mut model = build_model(small_options());
    model.set_input(small_batch()).unwrap();
    model.forward().unwrap();

    model.set_discriminators_trainable(false).unwrap();
    model.backward_g(1).unwrap();

    assert!(grads(&discriminator_params(&model)).iter().all(Option::is_none));
    assert!(
        model
            .networks()
            .generator
            .parameters()
            .iter()
            .all(|p| p.grad().unwrap().is_some())
    );
    assert!(
        model
            .networks()
            .classifier
            .parameters()
            .iter()
            .all(|p| p.grad().unwrap().is_some())
    );
}

#[test]
fn test_discriminator_phase_leaves_generator_untouched() {
    let mut model = build_model(small_options());
    model.set_input(small_batch()).unwrap();
    model.forward().unwrap();
    model.set_discriminators_trainable(false).unwrap();
    model.backward_g(1).unwrap();
    let before = grads(&generator_and_classifier_params(&model));

    model.set_discriminators_trainable(true).unwrap();
    model.backward_d_a(1).unwrap();
    let d_a = model.networks().discriminator_a.parameters();
    let d_b = model.networks().discriminator_b.parameters();
    assert!(grads(&d_a).iter().all(Option::is_some));
    assert!(grads(&d_b).iter().all(Option::is_none));

    model.backward_d_b(1).unwrap();
    assert!(grads(&d_b).iter().all(Option::is_some));

    assert_eq!(grads(&generator_and_classifier_params(&model)), before);
}

#[test]
fn test_gradients_accumulate_without_update() {
    let mut model = build_model(small_options());
    model.set_branch_source(Box::new(SequenceSource::new(vec![0.7])));
    model.set_input(small_batch()).unwrap();
    let params = [
        generator_and_classifier_params(&model),
        discriminator_params(&model),
    ]
    .concat();
    let initial = values(&params);

    model.optimize_parameters(2, false).unwrap();
    let once = grads(&params);
    model.optimize_parameters(2, false).unwrap();
    let twice = grads(&params);

    // 未更新参数，两次迭代完全相同，梯度恰为两倍
    assert_eq!(values(&params), initial);
    for (g1, g2) in once.iter().zip(&twice) {
        let g1 = g1.as_ref().unwrap();
        assert_tensors_close(&(g1 * 2.0), g2.as_ref().unwrap(), 1e-6);
    }
}

#[test]
fn test_accumulated_update_matches_single_large_step() {
    let branch = || Box::new(SequenceSource::new(vec![0.7]));

    let mut accumulated = build_model(small_options());
    accumulated.set_branch_source(branch());
    accumulated.set_input(small_batch()).unwrap();
    accumulated.optimize_parameters(3, false).unwrap();
    accumulated.optimize_parameters(3, false).unwrap();
    accumulated.optimize_parameters(3, true).unwrap();

    let mut single = build_model(small_options());
    single.set_branch_source(branch());
    single.set_input(small_batch()).unwrap();
    single.optimize_parameters(1, true).unwrap();

    let all_params = |m: &JointGanModel| {
        [generator_and_classifier_params(m), discriminator_params(m)].concat()
    };
    let params_a = all_params(&accumulated);
    let params_b = all_params(&single);
    for (a, b) in values(&params_a).iter().zip(values(&params_b).iter()) {
        assert_tensors_close(a, b, 1e-5);
    }
    // 应用更新后梯度被清空
    assert!(grads(&params_a).iter().all(Option::is_none));
}

#[test]
fn test_update_step_zero_is_rejected() {
    let mut model = build_model(small_options());
    model.set_input(small_batch()).unwrap();
    assert!(matches!(
        model.optimize_parameters(0, true),
        Err(ModelError::Misconfigured(_))
    ));
}

#[test]
fn test_classifier_branch_follows_random_draw() {
    let mut model = build_model(TrainOptions {
        lambda_cls_a: 0.0,
        lambda_cls_b: 1.0,
        ..small_options()
    });
    model.set_branch_source(Box::new(SequenceSource::new(vec![0.7, 0.2])));
    model.set_input(small_batch()).unwrap();
    let cls_loss = |m: &JointGanModel| m.get_current_losses()[2].1;

    model.optimize_parameters(1, false).unwrap();
    assert_eq!(model.last_cls_branch(), Some(ClsBranch::RealA));
    assert_abs_diff_eq!(cls_loss(&model), 0.0);

    model.optimize_parameters(1, false).unwrap();
    assert_eq!(model.last_cls_branch(), Some(ClsBranch::FakeB));
    assert!(cls_loss(&model) > 0.0);
}

#[test]
fn test_classifier_loss_is_scaled_by_update_step() {
    let run = |update_step: usize| {
        let mut model = build_model(small_options());
        model.set_branch_source(Box::new(SequenceSource::new(vec![0.9])));
        model.set_input(small_batch()).unwrap();
        model.optimize_parameters(update_step, false).unwrap();
        model.get_current_losses()
    };
    let one = run(1);
    let four = run(4);
    // Cls、Gen 都除以累加步数，分项（G_A、cycle_A…）不变
    assert_abs_diff_eq!(one[2].1 / 4.0, four[2].1, epsilon = 1e-6);
    assert_abs_diff_eq!(one[1].1 / 4.0, four[1].1, epsilon = 1e-6);
    assert_abs_diff_eq!(one[5].1, four[5].1, epsilon = 1e-6);
}

#[test]
fn test_losses_follow_naming_order() {
    let mut model = build_model(small_options());
    model.set_input(small_batch()).unwrap();
    model.optimize_parameters(1, true).unwrap();

    let losses = model.get_current_losses();
    let names = losses.iter().map(|(name, _)| *name).collect::<Vec<_>>();
    assert_eq!(names, LOSS_NAMES.to_vec());
    assert!(losses.iter().all(|(_, v)| v.is_finite()));

    let value = |name: &str| losses.iter().find(|(n, _)| *n == name).unwrap().1;
    assert_abs_diff_eq!(value("G"), value("Gen") + value("Cls"), epsilon = 1e-5);
    let gen_sum = value("G_A")
        + value("G_B")
        + value("cycle_A")
        + value("cycle_B")
        + value("idt_A")
        + value("idt_B");
    assert_abs_diff_eq!(value("Gen"), gen_sum, epsilon = 1e-5);
}

#[test]
fn test_visuals_include_identity_only_when_enabled() {
    let mut with_idt = build_model(small_options());
    with_idt.set_input(small_batch()).unwrap();
    with_idt.forward().unwrap();
    assert_eq!(with_idt.get_current_visuals().unwrap().len(), 6);
    with_idt.optimize_parameters(1, true).unwrap();
    assert_eq!(with_idt.get_current_visuals().unwrap().len(), 8);
    // 重新前向后，旧的恒等映射不再出现
    with_idt.test().unwrap();
    assert_eq!(with_idt.get_current_visuals().unwrap().len(), 6);
    with_idt.optimize_parameters(1, true).unwrap();
    let names = with_idt
        .get_current_visuals()
        .unwrap()
        .into_iter()
        .map(|(name, _)| name)
        .collect::<Vec<_>>();
    assert_eq!(
        names,
        vec!["real_A", "fake_B", "rec_A", "idt_A", "real_B", "fake_A", "rec_B", "idt_B"]
    );

    let mut without_idt = build_model(TrainOptions {
        lambda_identity: 0.0,
        ..small_options()
    });
    without_idt.set_input(small_batch()).unwrap();
    without_idt.optimize_parameters(1, true).unwrap();
    let visuals = without_idt.get_current_visuals().unwrap();
    assert_eq!(visuals.len(), 6);
    for (_, volume) in &visuals {
        assert_eq!(volume.shape(), &[2, 1, 2, 2, 2]);
    }
    // 未计算恒等映射时，恒等损失为0
    assert_eq!(without_idt.get_current_losses()[6], ("idt_A", 0.0));
}

#[test]
fn test_direction_b_to_a_swaps_domains() {
    let mut model = build_model(TrainOptions {
        which_direction: Direction::BtoA,
        ..small_options()
    });
    let batch = small_batch();
    let second = batch.second.clone();
    model.set_input(batch).unwrap();
    model.forward().unwrap();
    let visuals = model.get_current_visuals().unwrap();
    assert_eq!(visuals[0], ("real_A", second));
}

#[test]
fn test_inference_builds_no_gradient_path() {
    let mut model = build_model(TrainOptions {
        lambda_identity: 0.0,
        ..small_options()
    });
    model.set_input(small_batch()).unwrap();
    model.test().unwrap();
    assert!(model.graph().is_grad_enabled());
    assert_eq!(model.get_current_visuals().unwrap().len(), 6);

    // 推理得到的生成结果不连回生成器参数
    model.set_discriminators_trainable(false).unwrap();
    model.backward_g(1).unwrap();
    assert!(
        model
            .networks()
            .generator
            .parameters()
            .iter()
            .all(|p| p.grad().unwrap().is_none())
    );
}

#[test]
fn test_split_devices_train_end_to_end() {
    let opt = TrainOptions {
        gpu_ids: vec![0, 1],
        ..small_options()
    };
    let mut model = build_model(opt);
    assert_eq!(model.networks().generator.device(), Device::Cuda(0));
    assert_eq!(model.networks().classifier.device(), Device::Cuda(1));

    model.set_input(small_batch()).unwrap();
    model.optimize_parameters(1, true).unwrap();
    assert!(model.get_current_losses().iter().all(|(_, v)| v.is_finite()));
}

#[test]
fn test_placement_mismatch_is_rejected() {
    let graph = Graph::new_with_seed(1);
    // 网络全部构建在CPU上，配置却要求使用两块GPU
    let networks = build_volume_networks(&graph, &small_options(), VOLUME);
    let opt = TrainOptions {
        gpu_ids: vec![0, 1],
        ..small_options()
    };
    assert!(matches!(
        JointGanModel::new(opt, networks, graph),
        Err(ModelError::Misconfigured(_))
    ));
}

#[test]
fn test_invalid_options_are_rejected() {
    let graph = Graph::new_with_seed(1);
    let networks = build_volume_networks(&graph, &small_options(), VOLUME);
    let opt = TrainOptions {
        lr_policy: "exponential".to_string(),
        ..small_options()
    };
    assert!(matches!(
        JointGanModel::new(opt, networks, graph),
        Err(ModelError::Options(_))
    ));
}

#[test]
fn test_optimizer_groups_use_scaled_generator_rate() {
    let opt = TrainOptions {
        lr_g: 0.01,
        lr_d: 0.002,
        lr_policy: "lambda".to_string(),
        niter: 1,
        niter_decay: 4,
        epoch_count: 0,
        ..small_options()
    };
    let mut model = build_model(opt);
    let (lr_g, lr_d) = model.learning_rates();
    assert_abs_diff_eq!(lr_g[0], 0.001, epsilon = 1e-9);
    assert_abs_diff_eq!(lr_g[1], 0.01, epsilon = 1e-9);
    assert_abs_diff_eq!(lr_d[0], 0.002, epsilon = 1e-9);

    model.update_learning_rate(None).unwrap();
    let (lr_g_next, _) = model.learning_rates();
    assert!(lr_g_next[1] < lr_g[1]);
    assert_abs_diff_eq!(lr_g_next[0] / lr_g_next[1], 0.1, epsilon = 1e-6);
}

#[test]
fn test_log_networks_counts_parameters() {
    let model = build_model(small_options());
    model.log_networks().unwrap();
    // 生成器两个8→8的全连接层，各含权重与偏置
    assert_eq!(model.networks().generator.num_params(), 4);
    assert_eq!(model.networks().generator.num_elements().unwrap(), 2 * (64 + 8));
}
