/*
 * @Author       : 老董
 * @Date         : 2026-10-18
 * @Description  : 训练配置。字段名沿用训练脚本中的命名（如`lambda_A`、`lr_G`），
 *                 可以直接从同名键的JSON配置加载；所有字段都有默认值
 */

use crate::nn::optimizer::ParseLrPolicyError;
use crate::nn::{Device, LrPolicy, SchedulerConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[cfg(test)]
mod tests;

#[derive(Debug, Error)]
pub enum OptionsError {
    #[error("读取配置文件失败：{0}")]
    Io(#[from] std::io::Error),
    #[error("解析配置失败：{0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    LrPolicy(#[from] ParseLrPolicyError),
    #[error("配置项`{name}`无效：{message}")]
    InvalidValue { name: &'static str, message: String },
}

/// 批次中两个域样本的先后顺序
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Direction {
    /// 批次的第0个元素属于域A
    #[default]
    AtoB,
    /// 批次的第0个元素属于域B
    BtoA,
}

impl From<String> for Direction {
    /// 只有`"AtoB"`表示A在前，其余任何字符串都表示B在前
    fn from(s: String) -> Self {
        if s == "AtoB" { Self::AtoB } else { Self::BtoA }
    }
}

impl From<Direction> for String {
    fn from(d: Direction) -> Self {
        match d {
            Direction::AtoB => "AtoB".to_string(),
            Direction::BtoA => "BtoA".to_string(),
        }
    }
}

/// 各角色网络所在的设备
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    /// 生成器、两个判别器以及两个域的样本
    pub main: Device,
    /// 分类器与类别标签
    pub classifier: Device,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainOptions {
    /// 循环损失 A -> B -> A 的权重
    #[serde(rename = "lambda_A")]
    pub lambda_a: f32,
    /// 循环损失 B -> A -> B 的权重
    #[serde(rename = "lambda_B")]
    pub lambda_b: f32,
    /// 恒等损失相对循环损失的比例；为0时不计算恒等映射
    pub lambda_identity: f32,
    #[serde(rename = "lambda_cls_A")]
    pub lambda_cls_a: f32,
    #[serde(rename = "lambda_cls_B")]
    pub lambda_cls_b: f32,
    pub class_num: usize,
    /// 生成图像历史缓冲区的容量，0表示不缓存
    pub pool_size: usize,
    /// 为true时使用BCE-with-logits，否则使用最小二乘GAN（MSE）
    pub no_lsgan: bool,
    pub which_direction: Direction,
    /// 梯度累加步数，各损失在backward前都会除以它
    pub update_step: usize,
    #[serde(rename = "lr_G")]
    pub lr_g: f32,
    #[serde(rename = "lr_D")]
    pub lr_d: f32,
    pub beta1: f32,
    /// 空表示全部在CPU上；第0个放生成器与判别器，第1个（若有）放分类器。
    /// 负数编号表示CPU（如`[-1]`），推导设备时被忽略
    pub gpu_ids: Vec<i64>,
    pub seed: u64,
    pub lr_policy: String,
    pub lr_decay_iters: usize,
    pub niter: usize,
    pub niter_decay: usize,
    pub epoch_count: usize,
    pub print_freq: usize,
    pub init_gain: f32,
    pub ndf: usize,
}

impl Default for TrainOptions {
    fn default() -> Self {
        Self {
            lambda_a: 10.0,
            lambda_b: 10.0,
            lambda_identity: 0.5,
            lambda_cls_a: 0.0,
            lambda_cls_b: 0.0,
            class_num: 2,
            pool_size: 10,
            no_lsgan: false,
            which_direction: Direction::AtoB,
            update_step: 4,
            lr_g: 2e-4,
            lr_d: 1e-4,
            beta1: 0.5,
            gpu_ids: vec![0, 1],
            seed: 43,
            lr_policy: "step".to_string(),
            lr_decay_iters: 50,
            niter: 30,
            niter_decay: 50,
            epoch_count: 0,
            print_freq: 1,
            init_gain: 0.02,
            ndf: 64,
        }
    }
}

impl TrainOptions {
    pub fn from_json_str(json: &str) -> Result<Self, OptionsError> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, OptionsError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn to_json_string(&self) -> Result<String, OptionsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// 启动时一次性检查配置，训练过程中不再重复检查
    pub fn validate(&self) -> Result<(), OptionsError> {
        self.lr_policy()?;
        let weights = [
            ("lambda_A", self.lambda_a),
            ("lambda_B", self.lambda_b),
            ("lambda_identity", self.lambda_identity),
            ("lambda_cls_A", self.lambda_cls_a),
            ("lambda_cls_B", self.lambda_cls_b),
        ];
        for (name, value) in weights {
            if !(value >= 0.0 && value.is_finite()) {
                return Err(OptionsError::InvalidValue {
                    name,
                    message: format!("损失权重必须是非负有限数，实际为{}", value),
                });
            }
        }
        for (name, value) in [("lr_G", self.lr_g), ("lr_D", self.lr_d)] {
            if !(value > 0.0 && value.is_finite()) {
                return Err(OptionsError::InvalidValue {
                    name,
                    message: format!("学习率必须为正数，实际为{}", value),
                });
            }
        }
        if !(0.0..1.0).contains(&self.beta1) {
            return Err(OptionsError::InvalidValue {
                name: "beta1",
                message: format!("必须位于[0, 1)内，实际为{}", self.beta1),
            });
        }
        if self.update_step == 0 {
            return Err(OptionsError::InvalidValue {
                name: "update_step",
                message: "梯度累加步数至少为1".to_string(),
            });
        }
        if self.class_num < 2 {
            return Err(OptionsError::InvalidValue {
                name: "class_num",
                message: format!("至少需要2个类别，实际为{}", self.class_num),
            });
        }
        if self.lr_decay_iters == 0 {
            return Err(OptionsError::InvalidValue {
                name: "lr_decay_iters",
                message: "必须为正数".to_string(),
            });
        }
        Ok(())
    }

    pub fn lr_policy(&self) -> Result<LrPolicy, OptionsError> {
        Ok(self.lr_policy.parse()?)
    }

    /// 由`gpu_ids`推导各角色所在设备
    ///
    /// 先丢弃负数编号，再按剩余编号：
    /// - `[]`：全部在CPU
    /// - `[g]`：全部在`cuda:g`
    /// - `[g0, g1, ..]`：生成器与判别器在`cuda:g0`，分类器在`cuda:g1`
    pub fn placement(&self) -> Placement {
        let devices = self
            .gpu_ids
            .iter()
            .map(|&id| Device::from_gpu_id(id))
            .filter(Device::is_cuda)
            .collect::<Vec<_>>();
        match devices.as_slice() {
            [] => Placement {
                main: Device::Cpu,
                classifier: Device::Cpu,
            },
            [d] => Placement {
                main: *d,
                classifier: *d,
            },
            [d0, d1, ..] => Placement {
                main: *d0,
                classifier: *d1,
            },
        }
    }

    pub const fn scheduler_config(&self) -> SchedulerConfig {
        SchedulerConfig {
            niter: self.niter,
            niter_decay: self.niter_decay,
            epoch_count: self.epoch_count,
            lr_decay_iters: self.lr_decay_iters,
        }
    }
}
