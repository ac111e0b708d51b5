use super::{check_same_shape, signed, upstream_scalar};
use crate::nn::GraphError;
use crate::nn::nodes::raw_node::TraitNode;
use crate::tensor::Tensor;

/// 均方误差：`mean((x - t)²)`，最小二乘GAN（LSGAN）的判别损失即用此
pub(crate) struct MSELoss;

impl TraitNode for MSELoss {
    fn type_name(&self) -> &'static str {
        "MSELoss"
    }

    fn parents_count(&self) -> usize {
        2
    }

    fn calc_value_by_parents(&self, parents: &[&Tensor]) -> Result<Tensor, GraphError> {
        check_same_shape(self.type_name(), parents[0], parents[1])?;
        let diff = parents[0] - parents[1];
        Ok(Tensor::scalar((&diff * &diff).mean()))
    }

    fn calc_grad_to_parent(
        &self,
        index: usize,
        parents: &[&Tensor],
        _value: &Tensor,
        upstream: &Tensor,
    ) -> Result<Tensor, GraphError> {
        let n = parents[0].size() as f32;
        let grad = (parents[0] - parents[1]) * (2.0 * upstream_scalar(upstream)? / n);
        Ok(signed(grad, index))
    }
}
