/*
 * @Author       : 老董
 * @Date         : 2026-10-18
 * @Description  : 计算设备标记。
 *                 本crate不做真正的异构计算，设备仅作为张量的“放置”标签：
 *                 二元运算要求所有父节点位于同一设备，跨设备必须显式经过`to_device`转移节点。
 */

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Device {
    #[default]
    Cpu,
    /// 第n号加速卡
    Cuda(usize),
}

impl Device {
    /// 由gpu编号得到设备；负数编号表示CPU（与命令行习惯`--gpu_ids -1`一致）
    pub fn from_gpu_id(id: i64) -> Self {
        if id < 0 {
            Self::Cpu
        } else {
            Self::Cuda(id as usize)
        }
    }

    pub const fn is_cuda(&self) -> bool {
        matches!(self, Self::Cuda(_))
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cpu => write!(f, "cpu"),
            Self::Cuda(i) => write!(f, "cuda:{}", i),
        }
    }
}
