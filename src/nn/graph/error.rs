/*
 * @Author       : 老董
 * @Date         : 2026-01-27
 * @Description  : Graph 模块的错误类型
 */

use crate::nn::{Device, NodeId};
use thiserror::Error;

/// Graph 操作错误类型
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("节点{0:?}不存在（可能已被`release_intermediates`释放）")]
    NodeNotFound(NodeId),
    #[error("无效操作：{0}")]
    InvalidOperation(String),
    #[error("形状不匹配：期望{expected:?}，实际{got:?}。{message}")]
    ShapeMismatch {
        expected: Vec<usize>,
        got: Vec<usize>,
        message: String,
    },
    #[error("维度不匹配：期望{expected}，实际{got}。{message}")]
    DimensionMismatch {
        expected: usize,
        got: usize,
        message: String,
    },
    /// 二元运算的父节点不在同一设备上
    #[error("{op}的输入位于不同设备：{left}与{right}，请先调用`to_device`")]
    DeviceMismatch {
        op: String,
        left: Device,
        right: Device,
    },
    #[error("计算错误：{0}")]
    ComputationError(String),
}
