use super::check_broadcastable;
use crate::nn::GraphError;
use crate::nn::nodes::raw_node::TraitNode;
use crate::tensor::Tensor;

/// 逐元素减法（支持广播）：`parents[0] - parents[1]`
pub(crate) struct Subtract;

impl TraitNode for Subtract {
    fn type_name(&self) -> &'static str {
        "Subtract"
    }

    fn parents_count(&self) -> usize {
        2
    }

    fn calc_value_by_parents(&self, parents: &[&Tensor]) -> Result<Tensor, GraphError> {
        check_broadcastable(self.type_name(), parents[0], parents[1])?;
        Ok(parents[0] - parents[1])
    }

    fn calc_grad_to_parent(
        &self,
        index: usize,
        parents: &[&Tensor],
        _value: &Tensor,
        upstream: &Tensor,
    ) -> Result<Tensor, GraphError> {
        let grad = upstream.sum_to_shape(parents[index].shape());
        Ok(if index == 0 { grad } else { grad * -1.0 })
    }
}
