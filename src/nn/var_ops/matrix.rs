/*
 * @Author       : 老董
 * @Date         : 2026-01-09
 * @Description  : Var 矩阵运算扩展 trait
 */

use crate::nn::nodes::raw_node::MatMul;
use crate::nn::{GraphError, Var};

pub trait VarMatrixOps {
    /// 矩阵乘法：`[n, k] @ [k, m] -> [n, m]`，两者须位于同一设备
    fn matmul(&self, other: &Var) -> Result<Var, GraphError>;
}

impl VarMatrixOps for Var {
    fn matmul(&self, other: &Var) -> Result<Var, GraphError> {
        self.binary_op(other, MatMul)
    }
}
