use super::upstream_scalar;
use crate::nn::GraphError;
use crate::nn::nodes::raw_node::TraitNode;
use crate::tensor::Tensor;

/// Softmax 交叉熵：`parents[0]`为`[N, C]`的 logits，`parents[1]`为N个类别下标
/// （以f32存放，形状`[N]`或`[N, 1]`）。
/// 下标不可导，因此只向 logits 传梯度：`(softmax(x) - onehot(y)) / N`
pub(crate) struct SoftmaxCrossEntropy;

impl SoftmaxCrossEntropy {
    fn labels(logits: &Tensor, labels: &Tensor) -> Result<Vec<usize>, GraphError> {
        if logits.dimension() != 2 {
            return Err(GraphError::DimensionMismatch {
                expected: 2,
                got: logits.dimension(),
                message: "SoftmaxCrossEntropy的logits必须是[N, C]形状".to_string(),
            });
        }
        let (n, c) = (logits.shape()[0], logits.shape()[1]);
        if labels.size() != n {
            return Err(GraphError::ShapeMismatch {
                expected: vec![n],
                got: labels.shape().to_vec(),
                message: "类别下标的个数必须等于批次大小".to_string(),
            });
        }
        labels
            .to_vec()
            .into_iter()
            .map(|y| {
                if y >= 0.0 && y.fract() == 0.0 && (y as usize) < c {
                    Ok(y as usize)
                } else {
                    Err(GraphError::InvalidOperation(format!(
                        "类别下标{}不在[0, {})范围内",
                        y, c
                    )))
                }
            })
            .collect()
    }
}

impl TraitNode for SoftmaxCrossEntropy {
    fn type_name(&self) -> &'static str {
        "SoftmaxCrossEntropy"
    }

    fn parents_count(&self) -> usize {
        2
    }

    fn calc_value_by_parents(&self, parents: &[&Tensor]) -> Result<Tensor, GraphError> {
        let labels = Self::labels(parents[0], parents[1])?;
        let probs = parents[0].softmax_rows().to_vec();
        let c = parents[0].shape()[1];
        let nll = labels
            .iter()
            .enumerate()
            .map(|(i, &y)| -probs[i * c + y].max(f32::MIN_POSITIVE).ln())
            .sum::<f32>();
        Ok(Tensor::scalar(nll / labels.len() as f32))
    }

    fn calc_grad_to_parent(
        &self,
        index: usize,
        parents: &[&Tensor],
        _value: &Tensor,
        upstream: &Tensor,
    ) -> Result<Tensor, GraphError> {
        if index != 0 {
            return Err(GraphError::InvalidOperation(
                "SoftmaxCrossEntropy的类别下标不可导".to_string(),
            ));
        }
        let labels = Self::labels(parents[0], parents[1])?;
        let shape = parents[0].shape().to_vec();
        let c = shape[1];
        let mut grad = parents[0].softmax_rows().to_vec();
        for (i, &y) in labels.iter().enumerate() {
            grad[i * c + y] -= 1.0;
        }
        let scale = upstream_scalar(upstream)? / labels.len() as f32;
        Ok(Tensor::new(&grad, &shape) * scale)
    }
}
