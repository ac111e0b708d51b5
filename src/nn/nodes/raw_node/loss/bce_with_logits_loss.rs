use super::{check_same_shape, upstream_scalar};
use crate::nn::GraphError;
use crate::nn::nodes::raw_node::TraitNode;
use crate::tensor::Tensor;

/// 带 logits 的二元交叉熵（sigmoid 与 BCE 合并，数值稳定形式）：
/// `mean(max(x, 0) - x·t + ln(1 + e^{-|x|}))`
pub(crate) struct BCEWithLogitsLoss;

impl TraitNode for BCEWithLogitsLoss {
    fn type_name(&self) -> &'static str {
        "BCEWithLogitsLoss"
    }

    fn parents_count(&self) -> usize {
        2
    }

    fn calc_value_by_parents(&self, parents: &[&Tensor]) -> Result<Tensor, GraphError> {
        check_same_shape(self.type_name(), parents[0], parents[1])?;
        let (x, t) = (parents[0], parents[1]);
        let softplus_part = x.map(|v| v.max(0.0) + (-v.abs()).exp().ln_1p());
        Ok(Tensor::scalar((softplus_part - x * t).mean()))
    }

    fn calc_grad_to_parent(
        &self,
        index: usize,
        parents: &[&Tensor],
        _value: &Tensor,
        upstream: &Tensor,
    ) -> Result<Tensor, GraphError> {
        let (x, t) = (parents[0], parents[1]);
        let scale = upstream_scalar(upstream)? / x.size() as f32;
        Ok(if index == 0 {
            // d/dx = σ(x) - t
            (x.map(|v| 1.0 / (1.0 + (-v).exp())) - t) * scale
        } else {
            // d/dt = -x
            x * -scale
        })
    }
}
