use super::check_broadcastable;
use crate::nn::GraphError;
use crate::nn::nodes::raw_node::TraitNode;
use crate::tensor::Tensor;

/// 逐元素加法（支持广播），如`x·W + b`中的偏置相加
pub(crate) struct Add;

impl TraitNode for Add {
    fn type_name(&self) -> &'static str {
        "Add"
    }

    fn parents_count(&self) -> usize {
        2
    }

    fn calc_value_by_parents(&self, parents: &[&Tensor]) -> Result<Tensor, GraphError> {
        check_broadcastable(self.type_name(), parents[0], parents[1])?;
        Ok(parents[0] + parents[1])
    }

    fn calc_grad_to_parent(
        &self,
        index: usize,
        parents: &[&Tensor],
        _value: &Tensor,
        upstream: &Tensor,
    ) -> Result<Tensor, GraphError> {
        // 广播过的维度需要求和归约回父节点形状
        Ok(upstream.sum_to_shape(parents[index].shape()))
    }
}
