/*
 * @Author       : 老董
 * @Date         : 2026-01-09
 * @Description  : Var 激活函数扩展 trait
 */

use crate::nn::nodes::raw_node::{LeakyReLU, Tanh};
use crate::nn::{GraphError, Var};

/// 激活函数扩展 trait
///
/// - `leaky_relu(alpha)`: `LeakyReLU` 激活，判别器中使用
/// - `tanh()`: Tanh 激活，生成器输出层使用
pub trait VarActivationOps {
    /// `LeakyReLU` 激活：x if x > 0 else alpha * x（alpha须非负）
    fn leaky_relu(&self, alpha: f32) -> Result<Var, GraphError>;

    fn tanh(&self) -> Result<Var, GraphError>;
}

impl VarActivationOps for Var {
    fn leaky_relu(&self, alpha: f32) -> Result<Var, GraphError> {
        self.unary_op(LeakyReLU::new(alpha)?)
    }

    fn tanh(&self) -> Result<Var, GraphError> {
        self.unary_op(Tanh)
    }
}
