/*
 * @Author       : 老董
 * @Date         : 2026-10-18
 * @Description  : 可注入的随机源。训练中的所有随机决策（缓冲区是否替换、替换哪个槽、
 *                 分类损失走哪个分支）都从这里取数，测试时可换成预先写好的序列
 */

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub trait RandomSource {
    /// `[0, 1)`内的均匀分布随机数
    fn uniform(&mut self) -> f32;

    /// `[0, n)`内均匀分布的下标，`n`须大于0
    fn index(&mut self, n: usize) -> usize {
        ((self.uniform() * n as f32) as usize).min(n.saturating_sub(1))
    }
}

/// 基于`StdRng`的带种子随机源
pub struct SeededSource {
    rng: StdRng,
}

impl SeededSource {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for SeededSource {
    fn uniform(&mut self) -> f32 {
        self.rng.gen_range(0.0..1.0)
    }

    fn index(&mut self, n: usize) -> usize {
        self.rng.gen_range(0..n.max(1))
    }
}

/// 按顺序循环返回给定数值的随机源（用于测试中复现确定的轨迹）
///
/// `index(n)`同样消耗一个数值，取`floor(u·n)`
#[derive(Debug, Clone)]
pub struct SequenceSource {
    values: Vec<f32>,
    cursor: usize,
}

impl SequenceSource {
    /// # Panics
    ///
    /// `values`为空时 panic
    pub fn new(values: Vec<f32>) -> Self {
        assert!(!values.is_empty(), "SequenceSource至少需要一个数值");
        Self { values, cursor: 0 }
    }

    /// 已经消耗的数值个数
    pub const fn consumed(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for SequenceSource {
    fn uniform(&mut self) -> f32 {
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value
    }
}
