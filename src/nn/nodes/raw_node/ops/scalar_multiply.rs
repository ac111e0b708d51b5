use crate::nn::GraphError;
use crate::nn::nodes::raw_node::TraitNode;
use crate::tensor::Tensor;

/// 与常数相乘：`x * scale`（常数不是节点，因而不需要梯度）
pub(crate) struct ScalarMultiply {
    scale: f32,
}

impl ScalarMultiply {
    pub(crate) const fn new(scale: f32) -> Self {
        Self { scale }
    }
}

impl TraitNode for ScalarMultiply {
    fn type_name(&self) -> &'static str {
        "ScalarMultiply"
    }

    fn parents_count(&self) -> usize {
        1
    }

    fn calc_value_by_parents(&self, parents: &[&Tensor]) -> Result<Tensor, GraphError> {
        Ok(parents[0] * self.scale)
    }

    fn calc_grad_to_parent(
        &self,
        _index: usize,
        _parents: &[&Tensor],
        _value: &Tensor,
        upstream: &Tensor,
    ) -> Result<Tensor, GraphError> {
        Ok(upstream * self.scale)
    }
}
