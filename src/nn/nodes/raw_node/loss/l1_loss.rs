use super::{check_same_shape, signed, upstream_scalar};
use crate::nn::GraphError;
use crate::nn::nodes::raw_node::TraitNode;
use crate::tensor::Tensor;

/// 平均绝对误差：`mean(|x - t|)`，用于循环一致性损失与恒等损失。
/// 在`x == t`处取次梯度0
pub(crate) struct L1Loss;

impl TraitNode for L1Loss {
    fn type_name(&self) -> &'static str {
        "L1Loss"
    }

    fn parents_count(&self) -> usize {
        2
    }

    fn calc_value_by_parents(&self, parents: &[&Tensor]) -> Result<Tensor, GraphError> {
        check_same_shape(self.type_name(), parents[0], parents[1])?;
        Ok(Tensor::scalar((parents[0] - parents[1]).abs().mean()))
    }

    fn calc_grad_to_parent(
        &self,
        index: usize,
        parents: &[&Tensor],
        _value: &Tensor,
        upstream: &Tensor,
    ) -> Result<Tensor, GraphError> {
        let n = parents[0].size() as f32;
        let grad = (parents[0] - parents[1]).signum() * (upstream_scalar(upstream)? / n);
        Ok(signed(grad, index))
    }
}
