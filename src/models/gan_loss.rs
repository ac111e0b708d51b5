/*
 * @Author       : 老董
 * @Date         : 2026-10-18
 * @Description  : 对抗损失
 */

use crate::nn::{GraphError, Var, VarLossOps};
use crate::tensor::Tensor;

/// 对抗损失：把判别器输出与全1（真）或全0（假）的目标比较
///
/// - `use_lsgan == true`：最小二乘GAN，均方误差
/// - 否则：带 logits 的二元交叉熵
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GANLoss {
    use_lsgan: bool,
    real_label: f32,
    fake_label: f32,
}

impl GANLoss {
    pub const fn new(use_lsgan: bool) -> Self {
        Self {
            use_lsgan,
            real_label: 1.0,
            fake_label: 0.0,
        }
    }

    pub const fn use_lsgan(&self) -> bool {
        self.use_lsgan
    }

    /// 目标张量与预测同形状，并放在预测所在的设备上
    pub fn evaluate(&self, prediction: &Var, target_is_real: bool) -> Result<Var, GraphError> {
        let label = if target_is_real {
            self.real_label
        } else {
            self.fake_label
        };
        let target = prediction.get_graph().input(
            &Tensor::full(label, &prediction.shape()?),
            prediction.device()?,
        );
        if self.use_lsgan {
            prediction.mse_loss(&target)
        } else {
            prediction.bce_with_logits_loss(&target)
        }
    }
}
