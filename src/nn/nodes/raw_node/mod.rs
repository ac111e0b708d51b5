mod input;
mod loss;
mod ops;
mod parameter;

pub(crate) use input::Input;
pub(crate) use loss::*;
pub(crate) use ops::*;
pub(crate) use parameter::Parameter;

use crate::nn::{Device, GraphError};
use crate::tensor::Tensor;
use enum_dispatch::enum_dispatch;

#[enum_dispatch]
pub(crate) enum NodeType {
    Input(Input),
    Parameter(Parameter),
    /*↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓算子↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓*/
    Add(Add),
    Subtract(Subtract),
    Multiply(Multiply),
    ScalarMultiply(ScalarMultiply),
    MatMul(MatMul),
    Reshape(Reshape),
    LeakyReLU(LeakyReLU),
    Tanh(Tanh),
    Transfer(Transfer),
    /*↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑算子↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑*/
    /*↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓损失↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓*/
    MSELoss(MSELoss),
    L1Loss(L1Loss),
    BCEWithLogitsLoss(BCEWithLogitsLoss),
    SoftmaxCrossEntropy(SoftmaxCrossEntropy),
    /*↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑损失↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑*/
}

#[enum_dispatch(NodeType)]
pub(crate) trait TraitNode {
    fn type_name(&self) -> &'static str;

    /// 父节点个数，叶子节点（输入、参数）为0
    fn parents_count(&self) -> usize;

    // 根据父节点的值计算本节点的值（图是即时求值的，调用时所有父节点的值都已就绪）
    fn calc_value_by_parents(&self, parents: &[&Tensor]) -> Result<Tensor, GraphError>;

    /// 给定结果节点对本节点的梯度`upstream`，计算结果节点对第`index`个父节点的梯度（VJP）
    fn calc_grad_to_parent(
        &self,
        index: usize,
        parents: &[&Tensor],
        value: &Tensor,
        upstream: &Tensor,
    ) -> Result<Tensor, GraphError>;

    /// 若本节点会改变所在设备（如`Transfer`），返回目标设备；否则节点与父节点同设备
    fn target_device(&self) -> Option<Device> {
        None
    }

    fn is_parameter(&self) -> bool {
        false
    }
}

fn leaf_grad_error(type_name: &str) -> GraphError {
    GraphError::InvalidOperation(format!(
        "{}节点没有父节点，不应对其计算父节点梯度。不该触及本错误，否则说明crate代码有问题",
        type_name
    ))
}
