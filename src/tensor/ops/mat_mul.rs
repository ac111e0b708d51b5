use crate::errors::{Operator, TensorError};
use crate::tensor::Tensor;
use ndarray::Ix2;

impl Tensor {
    /// 矩阵乘法：`[n, k] @ [k, m] -> [n, m]`，两者都必须是2阶张量
    pub fn mat_mul(&self, other: &Self) -> Self {
        let compatible =
            self.dimension() == 2 && other.dimension() == 2 && self.shape()[1] == other.shape()[0];
        assert!(
            compatible,
            "{}",
            TensorError::OperatorError {
                operator: Operator::MatMul,
                tensor1_shape: self.shape().to_vec(),
                tensor2_shape: other.shape().to_vec(),
            }
        );
        let a = self
            .data
            .view()
            .into_dimensionality::<Ix2>()
            .expect("已校验为2阶");
        let b = other
            .data
            .view()
            .into_dimensionality::<Ix2>()
            .expect("已校验为2阶");
        Self {
            data: a.dot(&b).into_dyn(),
        }
    }
}
