use crate::nn::GraphError;
use crate::nn::nodes::raw_node::TraitNode;
use crate::tensor::Tensor;

/// Leaky ReLU 激活函数节点
///
/// forward: f(x) = x if x > 0, else negative_slope * x
/// backward: d(f)/dx = 1 if x > 0, else negative_slope
///
/// 判别器使用 negative_slope = 0.2
pub(crate) struct LeakyReLU {
    negative_slope: f32,
}

impl LeakyReLU {
    pub(crate) fn new(negative_slope: f32) -> Result<Self, GraphError> {
        if negative_slope < 0.0 {
            return Err(GraphError::InvalidOperation(format!(
                "LeakyReLU的negative_slope应为非负数，但得到: {}",
                negative_slope
            )));
        }
        Ok(Self { negative_slope })
    }
}

impl TraitNode for LeakyReLU {
    fn type_name(&self) -> &'static str {
        "LeakyReLU"
    }

    fn parents_count(&self) -> usize {
        1
    }

    fn calc_value_by_parents(&self, parents: &[&Tensor]) -> Result<Tensor, GraphError> {
        let slope = self.negative_slope;
        Ok(parents[0].map(|x| if x > 0.0 { x } else { slope * x }))
    }

    fn calc_grad_to_parent(
        &self,
        _index: usize,
        parents: &[&Tensor],
        _value: &Tensor,
        upstream: &Tensor,
    ) -> Result<Tensor, GraphError> {
        let slope = self.negative_slope;
        let derivative = parents[0].map(|x| if x > 0.0 { 1.0 } else { slope });
        Ok(upstream * &derivative)
    }
}
