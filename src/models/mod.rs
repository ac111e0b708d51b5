/*
 * @Author       : 老董
 * @Date         : 2026-10-18
 * @Description  : 联合训练模型：共享生成器 + 两个判别器 + 端到端分类器（CycleGAN 风格），
 *                 以及其依赖的生成图像历史缓冲区、对抗损失与可注入的随机源
 */

mod error;
mod gan_loss;
mod image_pool;
mod joint_gan_model;
pub mod networks;
mod random;

pub use error::ModelError;
pub use gan_loss::GANLoss;
pub use image_pool::ImagePool;
pub use joint_gan_model::{Batch, ClsBranch, JointGanModel, LOSS_NAMES};
pub use networks::{Classifier, ClassifierOutput, Discriminator, Generator, JointNetworks};
pub use random::{RandomSource, SeededSource, SequenceSource};

#[cfg(test)]
mod tests;
