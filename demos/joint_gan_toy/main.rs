/*
 * 联合 GAN 的玩具训练示例
 *
 * 在随机合成的小尺寸三维体数据上跑完整的联合训练流程：
 * 生成器/判别器位于主设备，分类器位于另一设备，梯度累加若干次后统一更新，每个epoch结束后调度学习率。
 *
 * # 运行
 * ```bash
 * cargo run --example joint_gan_toy
 * # 指定配置文件
 * cargo run --example joint_gan_toy -- path/to/options.json
 * ```
 */

use joint_gan::models::networks::build_volume_networks;
use joint_gan::models::{Batch, JointGanModel};
use joint_gan::nn::Graph;
use joint_gan::options::TrainOptions;
use joint_gan::tensor::Tensor;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Instant;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

const VOLUME: [usize; 4] = [1, 4, 4, 4];
const BATCH_SIZE: usize = 2;
const BATCHES_PER_EPOCH: usize = 8;
const EPOCHS: usize = 6;

/// 域A为正偏置的噪声体，域B为负偏置的噪声体；标签由域A的均值是否超过阈值决定
fn synthetic_batch(rng: &mut StdRng) -> Batch {
    let voxels = VOLUME.iter().product::<usize>();
    let shape = [BATCH_SIZE, VOLUME[0], VOLUME[1], VOLUME[2], VOLUME[3]];
    let mut a = Vec::with_capacity(BATCH_SIZE * voxels);
    let mut b = Vec::with_capacity(BATCH_SIZE * voxels);
    let mut labels = Vec::with_capacity(BATCH_SIZE);
    for _ in 0..BATCH_SIZE {
        let offset = rng.gen_range(0.0..0.5f32);
        a.extend((0..voxels).map(|_| offset + rng.gen_range(-0.2..0.2f32)));
        b.extend((0..voxels).map(|_| -offset + rng.gen_range(-0.2..0.2f32)));
        labels.push(usize::from(offset > 0.25));
    }
    Batch {
        first: Tensor::new(&a, &shape),
        second: Tensor::new(&b, &shape),
        labels,
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::INFO).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let opt = match std::env::args().nth(1) {
        Some(path) => TrainOptions::from_json_file(path)?,
        None => TrainOptions {
            gpu_ids: vec![0, 1],
            pool_size: 4,
            update_step: 2,
            lr_g: 2e-3,
            lr_d: 1e-3,
            lr_policy: "lambda".to_string(),
            niter: 3,
            niter_decay: 3,
            epoch_count: 0,
            class_num: 2,
            ndf: 16,
            ..TrainOptions::default()
        },
    };
    info!("训练配置：\n{}", opt.to_json_string()?);

    let graph = Graph::new_with_seed(opt.seed);
    let networks = build_volume_networks(&graph, &opt, VOLUME);
    let update_step = opt.update_step;
    let print_freq = opt.print_freq.max(1);
    let mut model = JointGanModel::new(opt.clone(), networks, graph)?;
    model.log_networks()?;

    let mut rng = StdRng::seed_from_u64(opt.seed);
    let train_start = Instant::now();
    for epoch in 0..EPOCHS {
        let mut cycle_sum = 0.0;
        for iteration in 0..BATCHES_PER_EPOCH {
            model.set_input(synthetic_batch(&mut rng))?;
            let upgate = (iteration + 1) % update_step == 0;
            model.optimize_parameters(update_step, upgate)?;

            let losses = model.get_current_losses();
            cycle_sum += losses[5].1;
            if (iteration + 1) % print_freq == 0 {
                let line = losses
                    .iter()
                    .map(|(name, value)| format!("{name}: {value:.4}"))
                    .collect::<Vec<_>>()
                    .join(", ");
                info!("(epoch: {}, iters: {}) {}", epoch, iteration + 1, line);
            }
        }
        info!(
            "epoch {} 结束，cycle_A 均值 {:.4}",
            epoch,
            cycle_sum / BATCHES_PER_EPOCH as f32
        );
        model.update_learning_rate(Some(cycle_sum))?;
    }

    model.test()?;
    for (name, volume) in model.get_current_visuals()? {
        info!("{}: 形状{:?}，均值{:.4}", name, volume.shape(), volume.mean());
    }
    info!("训练结束，用时{:.1}s", train_start.elapsed().as_secs_f32());
    Ok(())
}
