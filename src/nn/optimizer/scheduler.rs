/*
 * @Author       : 老董
 * @Date         : 2026-10-18
 * @Description  : 学习率调度器。每个epoch结束后调用一次`step`，
 *                 按策略以各参数组的初始学习率为基准重新设置学习率
 */

use super::Optimizer;
use crate::nn::GraphError;
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;
use std::str::FromStr;
use thiserror::Error;
use tracing::{info, warn};

/// 学习率调度策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LrPolicy {
    /// 前`niter`个epoch保持不变，之后`niter_decay`个epoch线性衰减到0
    Lambda,
    /// 每`lr_decay_iters`个epoch乘以0.1
    Step,
    /// 指标在若干epoch内没有改善时乘以0.2
    Plateau,
    /// 以`niter`为半周期的余弦退火
    Cosine,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("不支持的学习率策略[{0}]，可选：lambda | step | plateau | cosine")]
pub struct ParseLrPolicyError(pub String);

impl FromStr for LrPolicy {
    type Err = ParseLrPolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lambda" => Ok(Self::Lambda),
            "step" => Ok(Self::Step),
            "plateau" => Ok(Self::Plateau),
            "cosine" => Ok(Self::Cosine),
            other => Err(ParseLrPolicyError(other.to_string())),
        }
    }
}

/// 调度器需要的训练轮次配置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerConfig {
    pub niter: usize,
    pub niter_decay: usize,
    pub epoch_count: usize,
    pub lr_decay_iters: usize,
}

const STEP_GAMMA: f32 = 0.1;
const PLATEAU_FACTOR: f32 = 0.2;
const PLATEAU_THRESHOLD: f32 = 0.01;
const PLATEAU_PATIENCE: usize = 5;

/// 学习率调度器
///
/// 不持有优化器，每次`step`时传入；这样同一个调度器配置可以驱动G、D两个优化器
pub struct LrScheduler {
    policy: LrPolicy,
    config: SchedulerConfig,
    base_lrs: Vec<f32>,
    /// 已完成的epoch数
    epoch: usize,
    // plateau 专用
    best: f32,
    num_bad_epochs: usize,
}

impl LrScheduler {
    /// 记录优化器各参数组的初始学习率，并按第0个epoch的系数设置一次
    pub fn new(
        policy: LrPolicy,
        config: SchedulerConfig,
        optimizer: &mut dyn Optimizer,
    ) -> Result<Self, GraphError> {
        let scheduler = Self {
            policy,
            config,
            base_lrs: optimizer.learning_rates(),
            epoch: 0,
            best: f32::INFINITY,
            num_bad_epochs: 0,
        };
        if policy != LrPolicy::Plateau {
            scheduler.apply_factor(optimizer)?;
        }
        Ok(scheduler)
    }

    pub const fn policy(&self) -> LrPolicy {
        self.policy
    }

    pub const fn epoch(&self) -> usize {
        self.epoch
    }

    /// 第`epoch`个epoch相对初始学习率的系数（plateau 策略不使用）
    pub fn factor(&self, epoch: usize) -> f32 {
        let c = &self.config;
        match self.policy {
            LrPolicy::Lambda => {
                let over = (epoch + 1 + c.epoch_count).saturating_sub(c.niter);
                1.0 - over as f32 / (c.niter_decay + 1) as f32
            }
            LrPolicy::Step => STEP_GAMMA.powi((epoch / c.lr_decay_iters.max(1)) as i32),
            LrPolicy::Cosine => (1.0 + (PI * epoch as f32 / c.niter.max(1) as f32).cos()) / 2.0,
            LrPolicy::Plateau => 1.0,
        }
    }

    fn apply_factor(&self, optimizer: &mut dyn Optimizer) -> Result<(), GraphError> {
        let factor = self.factor(self.epoch);
        for (index, base) in self.base_lrs.iter().enumerate() {
            optimizer.set_group_learning_rate(index, base * factor)?;
        }
        Ok(())
    }

    /// 推进一个epoch并更新`optimizer`的学习率
    ///
    /// `metric`只有 plateau 策略使用（越小越好）；plateau 策略下缺少`metric`时本次调用不生效
    pub fn step(&mut self, optimizer: &mut dyn Optimizer, metric: Option<f32>) -> Result<(), GraphError> {
        if self.policy != LrPolicy::Plateau {
            self.epoch += 1;
            return self.apply_factor(optimizer);
        }

        let Some(metric) = metric else {
            warn!("plateau 学习率策略需要提供指标，本次调度被忽略");
            return Ok(());
        };
        self.epoch += 1;
        if metric < self.best * (1.0 - PLATEAU_THRESHOLD) {
            self.best = metric;
            self.num_bad_epochs = 0;
        } else {
            self.num_bad_epochs += 1;
        }
        if self.num_bad_epochs > PLATEAU_PATIENCE {
            for (index, lr) in optimizer.learning_rates().into_iter().enumerate() {
                optimizer.set_group_learning_rate(index, lr * PLATEAU_FACTOR)?;
            }
            self.num_bad_epochs = 0;
            info!("指标连续{}个epoch未改善，学习率降为原来的{}", PLATEAU_PATIENCE + 1, PLATEAU_FACTOR);
        }
        Ok(())
    }
}
