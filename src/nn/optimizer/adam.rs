/*
 * @Author       : 老董
 * @Date         : 2025-07-24 16:30:00
 * @LastEditors  : 老董
 * @LastEditTime : 2026-10-18
 * @Description  : Adam优化器实现（支持多参数组，各组学习率独立）
 */

use super::{Optimizer, ParamGroup};
use crate::nn::{GraphError, NodeId};
use crate::tensor::Tensor;
use std::collections::HashMap;

/// 单个参数的 Adam 状态
struct AdamState {
    /// 该参数已被更新的次数（偏差修正用）
    step: i32,
    /// 一阶矩估计
    m: Tensor,
    /// 二阶矩估计
    v: Tensor,
}

/// Adam优化器
///
/// # 示例
/// ```ignore
/// // GAN 训练：分别为 G 和 D 创建优化器
/// let optimizer_g = Adam::new(vec![ParamGroup::new(g_params, 2e-4)], 0.5, 0.999);
/// let optimizer_d = Adam::new(vec![ParamGroup::new(d_params, 1e-4)], 0.5, 0.999);
/// ```
pub struct Adam {
    groups: Vec<ParamGroup>,
    beta1: f32,
    beta2: f32,
    epsilon: f32,
    states: HashMap<NodeId, AdamState>,
}

impl Adam {
    pub fn new(groups: Vec<ParamGroup>, beta1: f32, beta2: f32) -> Self {
        Self::with_epsilon(groups, beta1, beta2, 1e-8)
    }

    pub fn with_epsilon(groups: Vec<ParamGroup>, beta1: f32, beta2: f32, epsilon: f32) -> Self {
        Self {
            groups,
            beta1,
            beta2,
            epsilon,
            states: HashMap::new(),
        }
    }

    /// Adam 参数更新的核心逻辑，返回新的参数值
    fn update(&mut self, node_id: NodeId, current: &Tensor, gradient: &Tensor, lr: f32) -> Tensor {
        let state = self.states.entry(node_id).or_insert_with(|| AdamState {
            step: 0,
            m: Tensor::zeros(gradient.shape()),
            v: Tensor::zeros(gradient.shape()),
        });
        state.step += 1;

        // m = β1 * m + (1 - β1) * g
        state.m = &state.m * self.beta1 + gradient * (1.0 - self.beta1);
        // v = β2 * v + (1 - β2) * g²
        state.v = &state.v * self.beta2 + (gradient * gradient) * (1.0 - self.beta2);

        // 偏差修正
        let m_hat = &state.m / (1.0 - self.beta1.powi(state.step));
        let v_hat = &state.v / (1.0 - self.beta2.powi(state.step));

        // θ = θ - α * m_hat / (√v_hat + ε)
        let update = m_hat / (v_hat.sqrt() + self.epsilon);
        current - update * lr
    }
}

impl Optimizer for Adam {
    fn step(&mut self) -> Result<(), GraphError> {
        // 先收集所有需要更新的参数及其梯度（避免借用冲突）
        let mut updates = Vec::new();
        for group in &self.groups {
            for param in &group.params {
                if let Some(grad) = param.grad()? {
                    updates.push((param.clone(), param.value()?, grad, group.lr));
                }
            }
        }

        for (param, current, grad, lr) in updates {
            let new_value = self.update(param.node_id(), &current, &grad, lr);
            param.set_value(&new_value)?;
        }
        Ok(())
    }

    fn param_groups(&self) -> &[ParamGroup] {
        &self.groups
    }

    fn set_group_learning_rate(&mut self, index: usize, lr: f32) -> Result<(), GraphError> {
        let count = self.groups.len();
        let group = self.groups.get_mut(index).ok_or_else(|| {
            GraphError::InvalidOperation(format!("参数组下标{}越界（共{}组）", index, count))
        })?;
        group.lr = lr;
        Ok(())
    }

    fn reset(&mut self) {
        self.states.clear();
    }
}
