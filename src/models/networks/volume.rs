/*
 * @Author       : 老董
 * @Date         : 2026-10-18
 * @Description  : 作用于小尺寸三维体数据`[N, C, D, H, W]`的参考网络实现（全连接），
 *                 供测试与演示使用；真实训练中可替换为任意实现了对应 trait 的网络
 */

use super::{Classifier, ClassifierOutput, Discriminator, Generator, JointNetworks};
use crate::nn::{
    Device, Graph, GraphError, Linear, Module, Var, VarActivationOps, VarShapeOps,
};
use crate::options::TrainOptions;

/// 两条全连接映射按`alpha`混合后经 tanh 输出，形状与输入一致
pub struct VolumeGenerator {
    a_to_b: Linear,
    b_to_a: Linear,
    device: Device,
}

impl VolumeGenerator {
    pub fn new(graph: &Graph, voxels: usize, init_gain: f32, device: Device) -> Self {
        Self {
            a_to_b: Linear::new(graph, voxels, voxels, true, init_gain, "G_AtoB", device),
            b_to_a: Linear::new(graph, voxels, voxels, true, init_gain, "G_BtoA", device),
            device,
        }
    }
}

impl Module for VolumeGenerator {
    fn parameters(&self) -> Vec<Var> {
        [self.a_to_b.parameters(), self.b_to_a.parameters()].concat()
    }
}

impl Generator for VolumeGenerator {
    fn forward(&self, x: &Var, alpha: f32) -> Result<Var, GraphError> {
        let shape = x.shape()?;
        let flat = x.flatten()?;
        let forward = self.a_to_b.forward(&flat)?.mul_scalar(1.0 - alpha)?;
        let backward = self.b_to_a.forward(&flat)?.mul_scalar(alpha)?;
        forward.try_add(&backward)?.tanh()?.reshape(&shape)
    }

    fn device(&self) -> Device {
        self.device
    }
}

/// `Linear -> LeakyReLU(0.2) -> Linear`，输出`[N, 1]`的 logits
pub struct VolumeDiscriminator {
    hidden: Linear,
    output: Linear,
    device: Device,
}

impl VolumeDiscriminator {
    pub fn new(
        graph: &Graph,
        voxels: usize,
        ndf: usize,
        init_gain: f32,
        name: &str,
        device: Device,
    ) -> Self {
        Self {
            hidden: Linear::new(graph, voxels, ndf, true, init_gain, &format!("{name}_hidden"), device),
            output: Linear::new(graph, ndf, 1, true, init_gain, &format!("{name}_out"), device),
            device,
        }
    }
}

impl Module for VolumeDiscriminator {
    fn parameters(&self) -> Vec<Var> {
        [self.hidden.parameters(), self.output.parameters()].concat()
    }
}

impl Discriminator for VolumeDiscriminator {
    fn forward(&self, x: &Var) -> Result<Var, GraphError> {
        let h = self.hidden.forward(&x.flatten()?)?.leaky_relu(0.2)?;
        self.output.forward(&h)
    }

    fn device(&self) -> Device {
        self.device
    }
}

/// `Linear -> LeakyReLU(0.2) -> Linear`，输出`[N, class_num]`；隐层特征作为附加输出
pub struct VolumeClassifier {
    hidden: Linear,
    output: Linear,
    device: Device,
}

impl VolumeClassifier {
    pub fn new(
        graph: &Graph,
        voxels: usize,
        ndf: usize,
        class_num: usize,
        init_gain: f32,
        device: Device,
    ) -> Self {
        Self {
            hidden: Linear::new(graph, voxels, ndf, true, init_gain, "Cls_hidden", device),
            output: Linear::new(graph, ndf, class_num, true, init_gain, "Cls_out", device),
            device,
        }
    }
}

impl Module for VolumeClassifier {
    fn parameters(&self) -> Vec<Var> {
        [self.hidden.parameters(), self.output.parameters()].concat()
    }
}

impl Classifier for VolumeClassifier {
    fn forward(&self, x: &Var) -> Result<ClassifierOutput, GraphError> {
        let features = self.hidden.forward(&x.flatten()?)?.leaky_relu(0.2)?;
        let logits = self.output.forward(&features)?;
        Ok(ClassifierOutput {
            logits,
            aux: vec![features],
        })
    }

    fn device(&self) -> Device {
        self.device
    }
}

/// 按配置中的设备分配构建整套参考网络
///
/// `volume_shape`为单个样本的`[C, D, H, W]`
pub fn build_volume_networks(graph: &Graph, opt: &TrainOptions, volume_shape: [usize; 4]) -> JointNetworks {
    let placement = opt.placement();
    let voxels = volume_shape.iter().product::<usize>();
    // 分类器看到的是挤压掉通道维的体数据，元素个数不变
    JointNetworks {
        generator: Box::new(VolumeGenerator::new(graph, voxels, opt.init_gain, placement.main)),
        discriminator_a: Box::new(VolumeDiscriminator::new(
            graph,
            voxels,
            opt.ndf,
            opt.init_gain,
            "D_A",
            placement.main,
        )),
        discriminator_b: Box::new(VolumeDiscriminator::new(
            graph,
            voxels,
            opt.ndf,
            opt.init_gain,
            "D_B",
            placement.main,
        )),
        classifier: Box::new(VolumeClassifier::new(
            graph,
            voxels,
            opt.ndf,
            opt.class_num,
            opt.init_gain,
            placement.classifier,
        )),
    }
}
