/*
 * @Author       : 老董
 * @Date         : 2026-01-09
 * @Description  : Var 形状变换扩展 trait
 */

use crate::nn::nodes::raw_node::Reshape;
use crate::nn::{GraphError, Var};

/// 形状变换扩展 trait
///
/// - `reshape(shape)`: 改变形状
/// - `squeeze(axis)`: 挤压掉长度为1的第axis维（长度不为1时原样返回一个等值节点）
/// - `flatten()`: 保留首维，其余展平为`[N, rest]`
pub trait VarShapeOps {
    fn reshape(&self, shape: &[usize]) -> Result<Var, GraphError>;

    fn squeeze(&self, axis: usize) -> Result<Var, GraphError>;

    fn flatten(&self) -> Result<Var, GraphError>;
}

impl VarShapeOps for Var {
    fn reshape(&self, shape: &[usize]) -> Result<Var, GraphError> {
        self.unary_op(Reshape::new(shape))
    }

    fn squeeze(&self, axis: usize) -> Result<Var, GraphError> {
        let shape = self.shape()?;
        if axis >= shape.len() {
            return Err(GraphError::DimensionMismatch {
                expected: axis + 1,
                got: shape.len(),
                message: format!("squeeze的维度{}越界", axis),
            });
        }
        let new_shape = if shape[axis] == 1 {
            [&shape[..axis], &shape[axis + 1..]].concat()
        } else {
            shape
        };
        self.reshape(&new_shape)
    }

    fn flatten(&self) -> Result<Var, GraphError> {
        let shape = self.shape()?;
        if shape.is_empty() {
            return Err(GraphError::DimensionMismatch {
                expected: 1,
                got: 0,
                message: "flatten需要至少1维".to_string(),
            });
        }
        let rest = shape[1..].iter().product::<usize>();
        self.reshape(&[shape[0], rest])
    }
}
