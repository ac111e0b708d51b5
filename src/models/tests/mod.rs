mod image_pool;
mod joint_gan_model;
mod random;

use crate::models::networks::build_volume_networks;
use crate::models::{Batch, JointGanModel};
use crate::nn::Graph;
use crate::options::TrainOptions;
use crate::tensor::Tensor;

/// 单个样本的体数据形状`[C, D, H, W]`
const VOLUME: [usize; 4] = [1, 2, 2, 2];

/// 全部在CPU、不使用历史缓冲区、分类与恒等损失均开启的小配置
fn small_options() -> TrainOptions {
    TrainOptions {
        gpu_ids: vec![],
        pool_size: 0,
        update_step: 1,
        lambda_identity: 0.5,
        lambda_cls_a: 1.0,
        lambda_cls_b: 1.0,
        class_num: 2,
        ndf: 4,
        init_gain: 0.1,
        seed: 7,
        ..TrainOptions::default()
    }
}

fn build_model(opt: TrainOptions) -> JointGanModel {
    let graph = Graph::new_with_seed(opt.seed);
    let networks = build_volume_networks(&graph, &opt, VOLUME);
    JointGanModel::new(opt, networks, graph).unwrap()
}

/// 批次大小为2：域A的体素取值为正，域B为负
fn small_batch() -> Batch {
    let shape = [2, 1, 2, 2, 2];
    let a = (0..16).map(|i| 0.05 * i as f32).collect::<Vec<_>>();
    let b = (0..16).map(|i| -0.03 * i as f32).collect::<Vec<_>>();
    Batch {
        first: Tensor::new(&a, &shape),
        second: Tensor::new(&b, &shape),
        labels: vec![0, 1],
    }
}
