/*
 * @Author       : 老董
 * @Date         : 2026-01-27
 * @Description  : GraphInner 基础操作：创建、节点访问、值与梯度的读写
 */

use super::GraphInner;
use crate::nn::nodes::NodeHandle;
use crate::nn::nodes::raw_node::TraitNode;
use crate::nn::{Device, GraphError, NodeId};
use crate::tensor::Tensor;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::collections::HashMap;

impl GraphInner {
    // ========== 创建 ==========

    pub fn new() -> Self {
        Self::with_name_and_rng("default_graph", StdRng::from_entropy())
    }

    /// 创建带种子的图（参数初始化可复现）
    pub fn new_with_seed(seed: u64) -> Self {
        Self::with_name_and_rng("default_graph", StdRng::seed_from_u64(seed))
    }

    fn with_name_and_rng(name: &str, rng: StdRng) -> Self {
        Self {
            name: name.to_string(),
            nodes: HashMap::new(),
            next_id: 0,
            grad_enabled: true,
            rng,
        }
    }

    // ========== 基础访问 ==========

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn nodes_count(&self) -> usize {
        self.nodes.len()
    }

    pub(in crate::nn) fn rng_mut(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    pub(in crate::nn::graph) fn generate_id(&mut self) -> NodeId {
        // 不复用被释放节点的编号
        self.next_id += 1;
        NodeId(self.next_id)
    }

    pub(in crate::nn) fn get_node(&self, id: NodeId) -> Result<&NodeHandle, GraphError> {
        self.nodes.get(&id).ok_or(GraphError::NodeNotFound(id))
    }

    pub(in crate::nn) fn get_node_mut(&mut self, id: NodeId) -> Result<&mut NodeHandle, GraphError> {
        self.nodes.get_mut(&id).ok_or(GraphError::NodeNotFound(id))
    }

    pub fn get_node_name(&self, id: NodeId) -> Result<&str, GraphError> {
        Ok(self.get_node(id)?.name())
    }

    pub fn get_node_value(&self, id: NodeId) -> Result<&Tensor, GraphError> {
        Ok(self.get_node(id)?.value())
    }

    pub fn get_node_device(&self, id: NodeId) -> Result<Device, GraphError> {
        Ok(self.get_node(id)?.device())
    }

    /// 只有叶子节点（输入、参数）的值允许被外部覆盖，且形状必须保持不变
    pub fn set_node_value(&mut self, id: NodeId, value: &Tensor) -> Result<(), GraphError> {
        let node = self.get_node_mut(id)?;
        if !node.is_leaf() {
            return Err(GraphError::InvalidOperation(format!(
                "节点{}不是叶子节点，其值由父节点决定，不能手动设置",
                node
            )));
        }
        if node.value().shape() != value.shape() {
            return Err(GraphError::ShapeMismatch {
                expected: node.value().shape().to_vec(),
                got: value.shape().to_vec(),
                message: format!("设置节点{}的值时形状不匹配", node),
            });
        }
        node.set_value(value.clone());
        Ok(())
    }

    // ========== 梯度 ==========

    pub fn get_node_grad(&self, id: NodeId) -> Result<Option<&Tensor>, GraphError> {
        Ok(self.get_node(id)?.grad())
    }

    pub fn clear_node_grad(&mut self, id: NodeId) -> Result<(), GraphError> {
        self.get_node_mut(id)?.clear_grad();
        Ok(())
    }

    /// 清空图中所有参数节点的梯度
    pub fn zero_grad(&mut self) {
        self.nodes
            .values_mut()
            .filter(|n| n.is_parameter())
            .for_each(NodeHandle::clear_grad);
    }

    pub fn is_node_requires_grad(&self, id: NodeId) -> Result<bool, GraphError> {
        Ok(self.get_node(id)?.requires_grad())
    }

    /// 冻结/解冻参数：冻结后反向传播不再向其累加梯度，但梯度仍会穿过使用它的运算
    pub fn set_node_requires_grad(&mut self, id: NodeId, requires_grad: bool) -> Result<(), GraphError> {
        let node = self.get_node_mut(id)?;
        if !node.raw_node().is_parameter() {
            return Err(GraphError::InvalidOperation(format!(
                "只有参数节点可以设置requires_grad，而{}不是",
                node
            )));
        }
        node.set_requires_grad(requires_grad);
        Ok(())
    }

    /// 参数节点的个数（即`release_intermediates`后仍会保留的节点数）
    pub fn parameters_count(&self) -> usize {
        self.nodes.values().filter(|n| n.is_parameter()).count()
    }
}
