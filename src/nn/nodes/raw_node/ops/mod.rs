mod add;
mod leaky_relu;
mod mat_mul;
mod multiply;
mod reshape;
mod scalar_multiply;
mod subtract;
mod tanh;
mod transfer;

pub(crate) use add::Add;
pub(crate) use leaky_relu::LeakyReLU;
pub(crate) use mat_mul::MatMul;
pub(crate) use multiply::Multiply;
pub(crate) use reshape::Reshape;
pub(crate) use scalar_multiply::ScalarMultiply;
pub(crate) use subtract::Subtract;
pub(crate) use tanh::Tanh;
pub(crate) use transfer::Transfer;

use crate::nn::GraphError;
use crate::tensor::{Tensor, broadcast_shape};

/// 逐元素二元运算前的形状检查：两者须可按 NumPy 规则广播
fn check_broadcastable(type_name: &str, a: &Tensor, b: &Tensor) -> Result<(), GraphError> {
    broadcast_shape(a.shape(), b.shape())
        .map(|_| ())
        .ok_or_else(|| GraphError::ShapeMismatch {
            expected: a.shape().to_vec(),
            got: b.shape().to_vec(),
            message: format!("{}的两个输入形状无法广播", type_name),
        })
}
