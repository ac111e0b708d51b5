/*
 * @Author       : 老董
 * @Date         : 2023-10-21 03:22:26
 * @LastEditors  : 老董
 * @LastEditTime : 2026-10-18
 * @Description  : 张量的形状相关操作：重塑、挤压、拼接、按批次拆分、转置
 */

use super::Tensor;
use crate::errors::TensorError;
use ndarray::{Axis, IxDyn};

impl Tensor {
    /// 将张量重塑为新形状（元素个数必须一致，按行优先顺序）
    pub fn reshape(&self, shape: &[usize]) -> Self {
        let new_size = shape.iter().product::<usize>();
        assert!(
            new_size == self.size(),
            "{}",
            TensorError::ReshapeSizeMismatch {
                from: self.shape().to_vec(),
                to: shape.to_vec(),
            }
        );
        let data = self
            .data
            .as_standard_layout()
            .into_owned()
            .into_shape(IxDyn(shape))
            .expect("元素个数已校验，重塑不应失败");
        Self { data }
    }

    /// 挤压掉第`axis`维；若该维长度不为1，则原样返回（与`torch.squeeze(dim)`语义一致）
    pub fn squeeze_dim(&self, axis: usize) -> Self {
        assert!(
            axis < self.dimension(),
            "{}",
            TensorError::AxisOutOfRange {
                axis,
                dimension: self.dimension(),
            }
        );
        if self.shape()[axis] != 1 {
            return self.clone();
        }
        Self {
            data: self.data.clone().remove_axis(Axis(axis)),
        }
    }

    /// 将多个张量沿首个维度拼接起来（除首维外，其余维度必须一致）
    pub fn concat(tensors: &[&Self]) -> Self {
        assert!(!tensors.is_empty(), "{}", TensorError::EmptyList);
        let tail = &tensors[0].shape()[1..];
        assert!(
            tensors
                .iter()
                .all(|t| t.dimension() == tensors[0].dimension() && &t.shape()[1..] == tail),
            "{}",
            TensorError::InconsistentShape
        );
        let views = tensors.iter().map(|t| t.data.view()).collect::<Vec<_>>();
        let data = ndarray::concatenate(Axis(0), &views).expect("形状已校验，拼接不应失败");
        Self { data }
    }

    /// 按首个（批次）维度拆分，返回的每个张量都保留长度为1的首维，即`[1, ...]`
    pub fn split_batch(&self) -> Vec<Self> {
        assert!(
            self.dimension() >= 1,
            "{}",
            TensorError::DimensionMismatch {
                expected: 1,
                got: 0,
            }
        );
        (0..self.shape()[0])
            .map(|i| Self {
                data: self
                    .data
                    .index_axis(Axis(0), i)
                    .insert_axis(Axis(0))
                    .to_owned(),
            })
            .collect()
    }

    /// 矩阵转置（仅限2阶张量）
    pub fn transpose(&self) -> Self {
        assert!(
            self.dimension() == 2,
            "{}",
            TensorError::DimensionMismatch {
                expected: 2,
                got: self.dimension(),
            }
        );
        Self {
            data: self.data.t().as_standard_layout().into_owned(),
        }
    }
}
