//! # Joint GAN
//!
//! `joint_gan`是一个CycleGAN式的三维体数据联合训练核心：一个双向共享的生成器、
//! 两个判别器，以及一个与之端到端联合训练的分类器。
//! 生成器与判别器位于主设备，分类器可以位于另一个设备，两者之间的数据流动需显式转移。
//!
//! - [`tensor`]：基于`ndarray`的张量
//! - [`nn`]：即时求值的反向模式自动微分计算图、全连接层、Adam优化器与学习率调度
//! - [`options`]：训练配置
//! - [`models`]：联合训练模型、生成图像历史缓冲区与对抗损失
//!

pub mod errors;
pub mod models;
pub mod nn;
pub mod options;
pub mod tensor;
