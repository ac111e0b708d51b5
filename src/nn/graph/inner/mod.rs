/*
 * @Author       : 老董
 * @Date         : 2026-01-27
 * @Description  : GraphInner 计算图的底层实现
 *
 * 各 impl 块分散在子模块中：
 * - core.rs: 创建、节点访问、值与梯度的读写
 * - node_builders.rs: new_*_node（即时求值）
 * - backward.rs: VJP 反向传播
 * - mode.rs: no_grad/detach/释放中间节点
 */

mod backward;
mod core;
mod mode;
mod node_builders;

use crate::nn::NodeId;
use crate::nn::nodes::NodeHandle;
use rand::rngs::StdRng;
use std::collections::HashMap;

/// 图的完整定义（核心实现）
///
/// 图是即时求值（eager）的：每创建一个运算节点就立即算出其值；
/// 只有依赖了可训练参数的节点才会记录父节点，从而参与反向传播。
/// 用户通常通过 `Graph` 句柄使用此结构。
pub struct GraphInner {
    pub(in crate::nn::graph) name: String,
    pub(in crate::nn::graph) nodes: HashMap<NodeId, NodeHandle>,
    pub(in crate::nn::graph) next_id: u64,
    /// 为false时新建的节点一律不需要梯度（`no_grad_scope`内部）
    pub(in crate::nn::graph) grad_enabled: bool,
    /// 图级别的随机数生成器（用于参数初始化）
    pub(in crate::nn::graph) rng: StdRng,
}

impl Default for GraphInner {
    fn default() -> Self {
        Self::new()
    }
}
