use crate::nn::GraphError;
use crate::nn::nodes::raw_node::TraitNode;
use crate::tensor::Tensor;

/// 改变形状（元素个数不变）；挤压（squeeze）与展平（flatten）也由它实现
pub(crate) struct Reshape {
    shape: Vec<usize>,
}

impl Reshape {
    pub(crate) fn new(shape: &[usize]) -> Self {
        Self {
            shape: shape.to_vec(),
        }
    }
}

impl TraitNode for Reshape {
    fn type_name(&self) -> &'static str {
        "Reshape"
    }

    fn parents_count(&self) -> usize {
        1
    }

    fn calc_value_by_parents(&self, parents: &[&Tensor]) -> Result<Tensor, GraphError> {
        let size = self.shape.iter().product::<usize>();
        if size != parents[0].size() {
            return Err(GraphError::ShapeMismatch {
                expected: parents[0].shape().to_vec(),
                got: self.shape.clone(),
                message: "Reshape前后元素个数必须一致".to_string(),
            });
        }
        Ok(parents[0].reshape(&self.shape))
    }

    fn calc_grad_to_parent(
        &self,
        _index: usize,
        parents: &[&Tensor],
        _value: &Tensor,
        upstream: &Tensor,
    ) -> Result<Tensor, GraphError> {
        Ok(upstream.reshape(parents[0].shape()))
    }
}
