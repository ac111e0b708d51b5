/*
 * @Author       : 老董
 * @Date         : 2023-08-17 17:24:24
 * @LastEditors  : 老董
 * @LastEditTime : 2026-10-18
 * @Description  : 张量层的错误类型（张量层的误用直接 panic，这里只负责提供统一的报错信息）
 */

use thiserror::Error;
mod ops;
pub use self::ops::*;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TensorError {
    // 张量二元运算
    #[error(
        "形状不兼容，故无法{operator}：第一个张量的形状为{tensor1_shape:?}，第二个张量的形状为{tensor2_shape:?}"
    )]
    OperatorError {
        operator: Operator,
        tensor1_shape: Vec<usize>,
        tensor2_shape: Vec<usize>,
    },

    #[error("张量列表为空")]
    EmptyList,
    #[error("张量形状不一致")]
    InconsistentShape,
    #[error("无法将形状{from:?}重塑为{to:?}：元素个数不同")]
    ReshapeSizeMismatch { from: Vec<usize>, to: Vec<usize> },
    #[error("该运算要求{expected}阶张量，但得到的是{got}阶")]
    DimensionMismatch { expected: usize, got: usize },
    #[error("维度{axis}超出了张量的阶数{dimension}")]
    AxisOutOfRange { axis: usize, dimension: usize },
}
