/*
 * @Author       : 老董
 * @Date         : 2026-01-27
 * @Description  : GraphInner 梯度模式：no_grad、detach、释放中间节点
 */

use super::GraphInner;
use crate::nn::{GraphError, NodeId};

impl GraphInner {
    pub const fn is_grad_enabled(&self) -> bool {
        self.grad_enabled
    }

    pub(in crate::nn) fn set_grad_enabled(&mut self, enabled: bool) {
        self.grad_enabled = enabled;
    }

    /// 截断梯度：创建一个持有相同值（拷贝）、位于相同设备的新输入节点
    pub fn detach_node(&mut self, id: NodeId) -> Result<NodeId, GraphError> {
        let node = self.get_node(id)?;
        let value = node.value().clone();
        let device = node.device();
        let name = format!("{}_detached", node.name());
        Ok(self.new_input_node(&value, device, Some(&name)))
    }

    /// 释放除参数节点外的所有节点（一次训练迭代结束后调用），返回释放的节点数
    ///
    /// 之后再访问被释放节点的`Var`会得到`GraphError::NodeNotFound`
    pub fn release_intermediates(&mut self) -> usize {
        let before = self.nodes.len();
        self.nodes.retain(|_, node| node.is_parameter());
        before - self.nodes.len()
    }
}
