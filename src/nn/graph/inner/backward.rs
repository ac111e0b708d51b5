/*
 * @Author       : 老董
 * @Date         : 2026-01-27
 * @Description  : GraphInner 反向传播（VJP 模式）
 *
 * 从标量损失出发，按逆拓扑序把上游梯度逐层传给父节点；
 * 到达参数节点时将梯度累加到其`grad`上（多次backward之间持续累加，直到被清空）。
 */

use super::GraphInner;
use crate::nn::nodes::raw_node::TraitNode;
use crate::nn::{GraphError, NodeId};
use crate::tensor::Tensor;
use std::collections::{HashMap, HashSet};

impl GraphInner {
    /// 以`loss_id`为起点反向传播，返回损失值
    pub fn backward(&mut self, loss_id: NodeId) -> Result<f32, GraphError> {
        let loss_node = self.get_node(loss_id)?;
        let loss_value = loss_node.value().get_data_number().ok_or_else(|| {
            GraphError::InvalidOperation(format!(
                "反向传播的起点必须是标量，而{}的形状为{:?}",
                loss_node,
                loss_node.value().shape()
            ))
        })?;
        if !loss_node.needs_grad() {
            return Err(GraphError::InvalidOperation(format!(
                "{}不依赖任何需要梯度的节点（是否处于no_grad中，或已被detach？）",
                loss_node
            )));
        }
        let loss_shape = loss_node.value().shape().to_vec();

        let order = self.topological_order(loss_id)?;
        let mut grads: HashMap<NodeId, Tensor> = HashMap::new();
        grads.insert(loss_id, Tensor::ones(&loss_shape));
        let mut param_grads = Vec::new();

        // 逆后序：每个节点都先于它的父节点被处理，因此处理时其梯度已收集完整
        for id in order.iter().rev() {
            let Some(upstream) = grads.remove(id) else {
                continue;
            };
            let node = self.get_node(*id)?;
            if node.is_parameter() {
                if node.requires_grad() {
                    param_grads.push((*id, upstream));
                }
                continue;
            }

            let parent_values = node
                .parents()
                .iter()
                .map(|pid| self.get_node(*pid).map(|p| p.value()))
                .collect::<Result<Vec<_>, _>>()?;
            for (index, pid) in node.parents().iter().enumerate() {
                if !self.get_node(*pid)?.needs_grad() {
                    continue;
                }
                let grad = node.raw_node().calc_grad_to_parent(
                    index,
                    &parent_values,
                    node.value(),
                    &upstream,
                )?;
                match grads.remove(pid) {
                    Some(acc) => grads.insert(*pid, acc + grad),
                    None => grads.insert(*pid, grad),
                };
            }
        }

        for (id, grad) in param_grads {
            self.get_node_mut(id)?.accumulate_grad(grad);
        }
        Ok(loss_value)
    }

    /// 从`root`出发沿父节点方向的后序遍历（父节点先于子节点出现）
    fn topological_order(&self, root: NodeId) -> Result<Vec<NodeId>, GraphError> {
        let mut order = Vec::new();
        let mut visited = HashSet::new();
        let mut stack = vec![(root, false)];
        while let Some((id, expanded)) = stack.pop() {
            if expanded {
                order.push(id);
                continue;
            }
            if !visited.insert(id) {
                continue;
            }
            stack.push((id, true));
            for pid in self.get_node(id)?.parents() {
                if !visited.contains(pid) {
                    stack.push((*pid, false));
                }
            }
        }
        Ok(order)
    }
}
