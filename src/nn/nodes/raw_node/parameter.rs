use super::{TraitNode, leaf_grad_error};
use crate::nn::GraphError;
use crate::tensor::Tensor;

/// 参数节点：可训练的叶子节点，反向传播时在其上累加梯度
pub(crate) struct Parameter;

impl TraitNode for Parameter {
    fn type_name(&self) -> &'static str {
        "Parameter"
    }

    fn parents_count(&self) -> usize {
        0
    }

    fn calc_value_by_parents(&self, _parents: &[&Tensor]) -> Result<Tensor, GraphError> {
        Err(GraphError::InvalidOperation(
            "参数节点的值只能由初始化或优化器设置".to_string(),
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

    fn is_parameter(&self) -> bool {
        true
    }
}
