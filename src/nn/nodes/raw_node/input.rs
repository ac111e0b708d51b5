use super::{TraitNode, leaf_grad_error};
use crate::nn::GraphError;
use crate::tensor::Tensor;

/// 输入节点：其值由外部设置，不参与训练，也不向外传梯度
/// （`detach`得到的节点也是输入节点）
pub(crate) struct Input;

impl TraitNode for Input {
    fn type_name(&self) -> &'static str {
        "Input"
    }

    fn parents_count(&self) -> usize {
        0
    }

    fn calc_value_by_parents(&self, _parents: &[&Tensor]) -> Result<Tensor, GraphError> {
        Err(GraphError::InvalidOperation(
            "输入节点的值只能由外部设置".to_string(),
        ))
    }

    fn calc_grad_to_parent(
        &self,
        _index: usize,
        _parents: &[&Tensor],
        _value: &Tensor,
        _upstream: &Tensor,
    ) -> Result<Tensor, GraphError> {
        Err(leaf_grad_error(self.type_name()))
    }
}
