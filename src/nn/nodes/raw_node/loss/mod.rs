/*
 * @Author       : 老董
 * @Date         : 2026-10-18
 * @Description  : 损失节点。所有损失都对批次内全部元素取平均（reduction = mean），
 *                 输出形状统一为`[1, 1]`，作为反向传播的起点
 */

mod bce_with_logits_loss;
mod l1_loss;
mod mse_loss;
mod softmax_cross_entropy;

pub(crate) use bce_with_logits_loss::BCEWithLogitsLoss;
pub(crate) use l1_loss::L1Loss;
pub(crate) use mse_loss::MSELoss;
pub(crate) use softmax_cross_entropy::SoftmaxCrossEntropy;

use crate::nn::GraphError;
use crate::tensor::Tensor;

/// 预测与目标必须形状一致
fn check_same_shape(type_name: &str, input: &Tensor, target: &Tensor) -> Result<(), GraphError> {
    if input.is_same_shape(target) {
        Ok(())
    } else {
        Err(GraphError::ShapeMismatch {
            expected: input.shape().to_vec(),
            got: target.shape().to_vec(),
            message: format!("{}的预测值与目标值形状必须一致", type_name),
        })
    }
}

/// 损失节点的上游梯度必然是标量
fn upstream_scalar(upstream: &Tensor) -> Result<f32, GraphError> {
    upstream.get_data_number().ok_or_else(|| {
        GraphError::ComputationError(format!(
            "损失节点的上游梯度应为标量，实际形状为{:?}",
            upstream.shape()
        ))
    })
}

/// 对称的逐元素损失对目标的梯度即对预测梯度取负
fn signed(grad: Tensor, index: usize) -> Tensor {
    if index == 0 { grad } else { grad * -1.0 }
}
