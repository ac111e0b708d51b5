use crate::nn::GraphError;
use crate::nn::nodes::raw_node::TraitNode;
use crate::tensor::Tensor;

/// 矩阵乘法：`[n, k] @ [k, m] -> [n, m]`
pub(crate) struct MatMul;

impl TraitNode for MatMul {
    fn type_name(&self) -> &'static str {
        "MatMul"
    }

    fn parents_count(&self) -> usize {
        2
    }

    fn calc_value_by_parents(&self, parents: &[&Tensor]) -> Result<Tensor, GraphError> {
        let (a, b) = (parents[0], parents[1]);
        for t in [a, b] {
            if t.dimension() != 2 {
                return Err(GraphError::DimensionMismatch {
                    expected: 2,
                    got: t.dimension(),
                    message: "MatMul的输入必须是2阶张量".to_string(),
                });
            }
        }
        if a.shape()[1] != b.shape()[0] {
            return Err(GraphError::ShapeMismatch {
                expected: vec![a.shape()[1], b.shape()[1]],
                got: b.shape().to_vec(),
                message: format!(
                    "MatMul左矩阵形状为{:?}，右矩阵的行数必须为{}",
                    a.shape(),
                    a.shape()[1]
                ),
            });
        }
        Ok(a.mat_mul(b))
    }

    fn calc_grad_to_parent(
        &self,
        index: usize,
        parents: &[&Tensor],
        _value: &Tensor,
        upstream: &Tensor,
    ) -> Result<Tensor, GraphError> {
        Ok(if index == 0 {
            // dL/dA = G · Bᵀ
            upstream.mat_mul(&parents[1].transpose())
        } else {
            // dL/dB = Aᵀ · G
            parents[0].transpose().mat_mul(upstream)
        })
    }
}
