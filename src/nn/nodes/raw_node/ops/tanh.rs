use crate::nn::GraphError;
use crate::nn::nodes::raw_node::TraitNode;
use crate::tensor::Tensor;

/// Tanh 激活：导数借用本节点的值，`1 - y²`
pub(crate) struct Tanh;

impl TraitNode for Tanh {
    fn type_name(&self) -> &'static str {
        "Tanh"
    }

    fn parents_count(&self) -> usize {
        1
    }

    fn calc_value_by_parents(&self, parents: &[&Tensor]) -> Result<Tensor, GraphError> {
        Ok(parents[0].map(f32::tanh))
    }

    fn calc_grad_to_parent(
        &self,
        _index: usize,
        _parents: &[&Tensor],
        value: &Tensor,
        upstream: &Tensor,
    ) -> Result<Tensor, GraphError> {
        Ok(upstream * &value.map(|y| 1.0 - y * y))
    }
}
