/*
 * @Author       : 老董
 * @Date         : 2023-08-17 17:24:24
 * @LastEditors  : 老董
 * @LastEditTime : 2026-10-18
 * @Description  : 张量（Tensor）：计算图中所有数值（输入、参数、中间结果、梯度）的载体
 */

use ndarray::{Array, IxDyn};
use rand::Rng;
use rand::rngs::StdRng;

mod ops {
    pub mod arithmetic;
    pub mod mat_mul;
    pub mod others;
}

mod property;
mod shape;

pub(crate) use ops::arithmetic::broadcast_shape;

#[cfg(test)]
mod tests;

/// 定义张量的结构体。其可以是标量、向量、矩阵或更高维度的数组。
/// 注：只要通过Tensor初始化的都是张量（即使标量也是张量）；
/// 而通常意义上的数字（类型为usize、i32、f64等）就只是纯数（number），在这里不被认为是张量。
///
/// 三维体数据的一个批次约定为`[N, C, D, H, W]`形状。
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor {
    data: Array<f32, IxDyn>,
}

impl Tensor {
    /// 创建一个张量。
    /// 注：`data`的长度必须和`shape`中所有元素的乘积相等，否则panic。
    pub fn new(data: &[f32], shape: &[usize]) -> Self {
        let expected = shape.iter().product::<usize>();
        assert!(
            data.len() == expected,
            "数据长度{}与形状{:?}不符（应为{}）",
            data.len(),
            shape,
            expected
        );
        let data = Array::from_shape_vec(IxDyn(shape), data.to_vec())
            .expect("长度已校验，构建张量不应失败");
        Self { data }
    }

    /// 以`[1, 1]`形状创建一个标量张量（与损失节点的输出形状一致）
    pub fn scalar(value: f32) -> Self {
        Self::new(&[value], &[1, 1])
    }

    pub fn zeros(shape: &[usize]) -> Self {
        Self {
            data: Array::zeros(IxDyn(shape)),
        }
    }

    pub fn ones(shape: &[usize]) -> Self {
        Self {
            data: Array::ones(IxDyn(shape)),
        }
    }

    /// 创建一个所有元素都为`value`的张量
    pub fn full(value: f32, shape: &[usize]) -> Self {
        Self {
            data: Array::from_elem(IxDyn(shape), value),
        }
    }

    /// 创建一个服从正态分布的随机张量（Box-Muller 变换，使用指定的 RNG 以确保可重复性）
    pub fn normal_with_rng(mean: f32, std_dev: f32, shape: &[usize], rng: &mut StdRng) -> Self {
        let data_len = shape.iter().product::<usize>();
        let mut data = Vec::with_capacity(data_len);

        while data.len() < data_len {
            let u1: f32 = rng.gen_range(f32::EPSILON..1.0);
            let u2: f32 = rng.gen_range(0.0..1.0);
            let r = (-2.0 * u1.ln()).sqrt();
            let theta = 2.0 * std::f32::consts::PI * u2;
            let z0 = mean + std_dev * r * theta.cos();
            let z1 = mean + std_dev * r * theta.sin();

            if z0.is_finite() {
                data.push(z0);
            }
            if data.len() < data_len && z1.is_finite() {
                data.push(z1);
            }
        }

        Self::new(&data, shape)
    }
}
