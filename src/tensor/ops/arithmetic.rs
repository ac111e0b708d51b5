/*
 * @Author       : 老董
 * @Date         : 2023-08-17 17:24:24
 * @LastEditors  : 老董
 * @LastEditTime : 2026-10-18
 * @Description  : 张量的逐元素四则运算（加、减、乘、除），并返回一个新的张量。
 *                 该运算支持以下情况：
 *                 1. 其中一个操作数为纯数而另一个为张量：则返回的张量形状与该张量相同。
 *                 2. 两个操作数均为张量：支持 NumPy 风格的广播（broadcasting）。
 */

use crate::errors::{Operator, TensorError};
use crate::tensor::Tensor;
use ndarray::IxDyn;
use std::ops::{Add, Div, Mul, Sub};

/// 按 NumPy 规则计算两个形状广播后的形状，不兼容时返回None
pub(crate) fn broadcast_shape(a: &[usize], b: &[usize]) -> Option<Vec<usize>> {
    let ndim = a.len().max(b.len());
    let mut shape = vec![0; ndim];
    for i in 0..ndim {
        let da = if i < ndim - a.len() { 1 } else { a[i - (ndim - a.len())] };
        let db = if i < ndim - b.len() { 1 } else { b[i - (ndim - b.len())] };
        shape[i] = match (da, db) {
            (x, y) if x == y => x,
            (1, y) => y,
            (x, 1) => x,
            _ => return None,
        };
    }
    Some(shape)
}

fn elementwise(a: &Tensor, b: &Tensor, operator: Operator, f: impl Fn(f32, f32) -> f32) -> Tensor {
    if a.is_same_shape(b) {
        return Tensor {
            data: ndarray::Zip::from(&a.data)
                .and(&b.data)
                .map_collect(|&x, &y| f(x, y)),
        };
    }
    let shape = broadcast_shape(a.shape(), b.shape()).unwrap_or_else(|| {
        panic!(
            "{}",
            TensorError::OperatorError {
                operator,
                tensor1_shape: a.shape().to_vec(),
                tensor2_shape: b.shape().to_vec(),
            }
        )
    });
    let va = a.data.broadcast(IxDyn(&shape)).expect("广播形状已校验");
    let vb = b.data.broadcast(IxDyn(&shape)).expect("广播形状已校验");
    Tensor {
        data: ndarray::Zip::from(&va).and(&vb).map_collect(|&x, &y| f(x, y)),
    }
}

/// 为`Tensor`与`Tensor`、`Tensor`与`f32`的所有（不）带引用组合实现同一个二元运算符
macro_rules! impl_tensor_binary_op {
    ($trait:ident, $method:ident, $operator:expr, $f:expr) => {
        /*↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓（不）带引用的张量 与 （不）带引用的张量↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓*/
        impl $trait<&Tensor> for &Tensor {
            type Output = Tensor;

            fn $method(self, other: &Tensor) -> Tensor {
                elementwise(self, other, $operator, $f)
            }
        }
        impl $trait<Tensor> for &Tensor {
            type Output = Tensor;

            fn $method(self, other: Tensor) -> Tensor {
                elementwise(self, &other, $operator, $f)
            }
        }
        impl $trait<&Tensor> for Tensor {
            type Output = Tensor;

            fn $method(self, other: &Tensor) -> Tensor {
                elementwise(&self, other, $operator, $f)
            }
        }
        impl $trait<Tensor> for Tensor {
            type Output = Tensor;

            fn $method(self, other: Tensor) -> Tensor {
                elementwise(&self, &other, $operator, $f)
            }
        }
        /*↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑（不）带引用的张量 与 （不）带引用的张量↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑*/

        /*↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓（不）带引用的张量 与 f32↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓*/
        impl $trait<f32> for &Tensor {
            type Output = Tensor;

            fn $method(self, scalar: f32) -> Tensor {
                let f = $f;
                Tensor {
                    data: self.data.mapv(|x| f(x, scalar)),
                }
            }
        }
        impl $trait<f32> for Tensor {
            type Output = Tensor;

            fn $method(self, scalar: f32) -> Tensor {
                (&self).$method(scalar)
            }
        }
        /*↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑（不）带引用的张量 与 f32↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑*/

        /*↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓f32 与 （不）带引用的张量↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓*/
        impl $trait<&Tensor> for f32 {
            type Output = Tensor;

            fn $method(self, tensor: &Tensor) -> Tensor {
                let f = $f;
                Tensor {
                    data: tensor.data.mapv(|x| f(self, x)),
                }
            }
        }
        impl $trait<Tensor> for f32 {
            type Output = Tensor;

            fn $method(self, tensor: Tensor) -> Tensor {
                self.$method(&tensor)
            }
        }
        /*↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑f32 与 （不）带引用的张量↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑*/
    };
}

impl_tensor_binary_op!(Add, add, Operator::Add, |x: f32, y: f32| x + y);
impl_tensor_binary_op!(Sub, sub, Operator::Sub, |x: f32, y: f32| x - y);
impl_tensor_binary_op!(Mul, mul, Operator::Mul, |x: f32, y: f32| x * y);
impl_tensor_binary_op!(Div, div, Operator::Div, |x: f32, y: f32| x / y);
