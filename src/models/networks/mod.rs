/*
 * @Author       : 老董
 * @Date         : 2026-10-18
 * @Description  : 联合模型所依赖的网络契约。
 *                 模型只通过这些 trait 使用网络：前向计算、列出参数（绑定优化器）、冻结/解冻、所在设备
 */

mod volume;

pub use volume::{VolumeClassifier, VolumeDiscriminator, VolumeGenerator, build_volume_networks};

use crate::nn::{Device, GraphError, Module, Var};

/// 共享权重的双向生成器，由`alpha`选择方向：0.0为A→B，1.0为B→A
pub trait Generator: Module {
    fn forward(&self, x: &Var, alpha: f32) -> Result<Var, GraphError>;

    fn device(&self) -> Device;
}

/// 判别器：输入一批图像，输出同批次大小的真假 logits
pub trait Discriminator: Module {
    fn forward(&self, x: &Var) -> Result<Var, GraphError>;

    fn device(&self) -> Device;
}

/// 分类器输出：类别 logits `[N, class_num]`，以及模型核心不使用的附加输出
pub struct ClassifierOutput {
    pub logits: Var,
    pub aux: Vec<Var>,
}

pub trait Classifier: Module {
    /// 输入为挤压掉通道维后的体数据`[N, D, H, W]`
    fn forward(&self, x: &Var) -> Result<ClassifierOutput, GraphError>;

    fn device(&self) -> Device;
}

/// 联合模型拥有的全部网络
pub struct JointNetworks {
    pub generator: Box<dyn Generator>,
    pub discriminator_a: Box<dyn Discriminator>,
    pub discriminator_b: Box<dyn Discriminator>,
    pub classifier: Box<dyn Classifier>,
}
