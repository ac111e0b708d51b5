/*
 * @Author       : 老董
 * @Date         : 2026-01-09
 * @Description  : Var 损失函数扩展 trait
 *
 * 提供损失函数的链式调用支持，用户需 import 此 trait 后才能使用。
 */

use crate::nn::nodes::raw_node::{BCEWithLogitsLoss, L1Loss, MSELoss, SoftmaxCrossEntropy};
use crate::nn::{GraphError, Var};

/// 损失函数扩展 trait（所有损失均对元素取平均，输出`[1, 1]`）
///
/// # 使用示例
/// ```ignore
/// use joint_gan::nn::{Var, VarLossOps};
///
/// let loss = logits.cross_entropy(&labels)?;
/// let loss = output.mse_loss(&target)?;
/// ```
pub trait VarLossOps {
    /// MSE Loss（均方误差）
    fn mse_loss(&self, target: &Var) -> Result<Var, GraphError>;

    /// L1 Loss（平均绝对误差）
    fn l1_loss(&self, target: &Var) -> Result<Var, GraphError>;

    /// 以本节点为 logits 的二元交叉熵
    fn bce_with_logits_loss(&self, target: &Var) -> Result<Var, GraphError>;

    /// Cross Entropy Loss（含 Softmax）
    ///
    /// # 参数
    /// - `labels`: 类别下标，形状`[N]`或`[N, 1]`
    fn cross_entropy(&self, labels: &Var) -> Result<Var, GraphError>;
}

impl VarLossOps for Var {
    fn mse_loss(&self, target: &Var) -> Result<Var, GraphError> {
        self.binary_op(target, MSELoss)
    }

    fn l1_loss(&self, target: &Var) -> Result<Var, GraphError> {
        self.binary_op(target, L1Loss)
    }

    fn bce_with_logits_loss(&self, target: &Var) -> Result<Var, GraphError> {
        self.binary_op(target, BCEWithLogitsLoss)
    }

    fn cross_entropy(&self, labels: &Var) -> Result<Var, GraphError> {
        self.binary_op(labels, SoftmaxCrossEntropy)
    }
}
