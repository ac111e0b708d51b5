/*
 * @Author       : 老董
 * @Date         : 2023-10-21 03:22:26
 * @LastEditors  : 老董
 * @LastEditTime : 2026-10-18
 * @Description  : 张量的归约与逐元素函数
 */

use crate::errors::TensorError;
use crate::tensor::Tensor;
use ndarray::Axis;

impl Tensor {
    /// 所有元素之和（纯数）
    pub fn sum(&self) -> f32 {
        self.data.sum()
    }

    /// 所有元素的平均值（纯数）；空张量返回0
    pub fn mean(&self) -> f32 {
        if self.size() == 0 {
            0.0
        } else {
            self.sum() / self.size() as f32
        }
    }

    /// 对每个元素应用`f`，返回新的张量
    pub fn map(&self, f: impl Fn(f32) -> f32) -> Self {
        Self {
            data: self.data.mapv(f),
        }
    }

    pub fn abs(&self) -> Self {
        self.map(f32::abs)
    }

    pub fn sqrt(&self) -> Self {
        self.map(f32::sqrt)
    }

    /// 符号函数；与 PyTorch 一致，0 的符号为 0
    pub fn signum(&self) -> Self {
        self.map(|x| if x == 0.0 { 0.0 } else { x.signum() })
    }

    /// 按行（最后一维）计算 softmax，仅限2阶张量
    pub fn softmax_rows(&self) -> Self {
        assert!(
            self.dimension() == 2,
            "{}",
            TensorError::DimensionMismatch {
                expected: 2,
                got: self.dimension(),
            }
        );
        let mut data = self.data.clone();
        for mut row in data.axis_iter_mut(Axis(0)) {
            let max = row.fold(f32::NEG_INFINITY, |m, &x| m.max(x));
            row.mapv_inplace(|x| (x - max).exp());
            let sum = row.sum();
            row.mapv_inplace(|x| x / sum);
        }
        Self { data }
    }

    /// 将广播后得到的张量（通常是梯度）求和归约回`target`形状，是广播的逆操作
    pub fn sum_to_shape(&self, target: &[usize]) -> Self {
        if self.shape() == target {
            return self.clone();
        }
        let mut data = self.data.clone();
        // 去掉多出来的前导维度
        while data.ndim() > target.len() {
            data = data.sum_axis(Axis(0));
        }
        for (axis, &dim) in target.iter().enumerate() {
            if dim == 1 && data.shape()[axis] != 1 {
                data = data.sum_axis(Axis(axis)).insert_axis(Axis(axis));
            }
        }
        Self { data }
    }
}
