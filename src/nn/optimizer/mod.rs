/*
 * @Author       : 老董
 * @Date         : 2025-07-24 16:00:00
 * @LastEditors  : 老董
 * @LastEditTime : 2026-10-18
 * @Description  : 优化器模块，实现 PyTorch 风格的梯度优化算法与学习率调度
 */

mod adam;
mod scheduler;

pub use adam::Adam;
pub use scheduler::{LrPolicy, LrScheduler, ParseLrPolicyError, SchedulerConfig};

use crate::nn::{GraphError, Var};

/// 参数组：一组参数共享同一个学习率
///
/// 优化器只持有参数的`Var`句柄，参数本身仍归计算图所有
#[derive(Debug, Clone)]
pub struct ParamGroup {
    pub params: Vec<Var>,
    pub lr: f32,
}

impl ParamGroup {
    pub const fn new(params: Vec<Var>, lr: f32) -> Self {
        Self { params, lr }
    }
}

/// 优化器 trait
///
/// `step`只使用参数上已累加的梯度，不会自行清空；
/// 梯度累加训练中多次`backward`后调用一次`step`，再调用`zero_grad`
pub trait Optimizer {
    /// 按累加的梯度更新参数；没有梯度的参数会被跳过
    fn step(&mut self) -> Result<(), GraphError>;

    fn param_groups(&self) -> &[ParamGroup];

    /// 设置第`index`个参数组的学习率
    fn set_group_learning_rate(&mut self, index: usize, lr: f32) -> Result<(), GraphError>;

    /// 清空内部状态（如动量）
    fn reset(&mut self);

    /// 清空本优化器管理的所有参数的梯度
    fn zero_grad(&mut self) -> Result<(), GraphError> {
        self.param_groups()
            .iter()
            .flat_map(|group| group.params.iter())
            .try_for_each(Var::clear_grad)
    }

    /// 各参数组当前的学习率
    fn learning_rates(&self) -> Vec<f32> {
        self.param_groups().iter().map(|g| g.lr).collect()
    }
}
