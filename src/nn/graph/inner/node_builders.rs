/*
 * @Author       : 老董
 * @Date         : 2026-01-27
 * @Description  : GraphInner 节点创建。运算节点在创建时即完成前向计算
 */

use super::GraphInner;
use crate::nn::nodes::NodeHandle;
use crate::nn::nodes::raw_node::{Input, NodeType, Parameter, TraitNode};
use crate::nn::{Device, GraphError, NodeId};
use crate::tensor::Tensor;

impl GraphInner {
    fn node_name(&self, name: Option<&str>, type_name: &str, id: NodeId) -> String {
        name.map_or_else(|| format!("{}_{}", type_name.to_lowercase(), id.0), str::to_string)
    }

    pub(in crate::nn) fn new_input_node(
        &mut self,
        value: &Tensor,
        device: Device,
        name: Option<&str>,
    ) -> NodeId {
        let id = self.generate_id();
        let name = self.node_name(name, "Input", id);
        let node = NodeHandle::new(
            id,
            name,
            Input.into(),
            vec![],
            value.clone(),
            device,
            false,
            false,
        );
        self.nodes.insert(id, node);
        id
    }

    pub(in crate::nn) fn new_parameter_node(
        &mut self,
        value: &Tensor,
        device: Device,
        name: Option<&str>,
    ) -> NodeId {
        let id = self.generate_id();
        let name = self.node_name(name, "Parameter", id);
        let node = NodeHandle::new(
            id,
            name,
            Parameter.into(),
            vec![],
            value.clone(),
            device,
            true,
            true,
        );
        self.nodes.insert(id, node);
        id
    }

    /// 创建运算节点并立即计算其值
    ///
    /// - 父节点个数必须与节点类型一致
    /// - 除`Transfer`外，所有父节点必须位于同一设备，新节点也位于该设备
    /// - 仅当梯度开启且任一父节点需要梯度时，新节点才需要梯度并记录父节点
    pub(in crate::nn) fn new_op_node(
        &mut self,
        raw_node: NodeType,
        parent_ids: &[NodeId],
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        let type_name = raw_node.type_name();
        if raw_node.parents_count() != parent_ids.len() {
            return Err(GraphError::InvalidOperation(format!(
                "{}节点需要{}个父节点，但提供了{}个",
                type_name,
                raw_node.parents_count(),
                parent_ids.len()
            )));
        }

        let (value, device, needs_grad) = {
            let parents = parent_ids
                .iter()
                .map(|id| self.get_node(*id))
                .collect::<Result<Vec<_>, _>>()?;

            let device = match raw_node.target_device() {
                Some(device) => device,
                None => {
                    let first = parents[0].device();
                    if let Some(other) = parents.iter().find(|p| p.device() != first) {
                        return Err(GraphError::DeviceMismatch {
                            op: type_name.to_string(),
                            left: first,
                            right: other.device(),
                        });
                    }
                    first
                }
            };

            let values = parents.iter().map(|p| p.value()).collect::<Vec<_>>();
            let value = raw_node.calc_value_by_parents(&values)?;
            let needs_grad = self.grad_enabled && parents.iter().any(|p| p.needs_grad());
            (value, device, needs_grad)
        };

        let id = self.generate_id();
        let name = self.node_name(name, type_name, id);
        let parents = if needs_grad {
            parent_ids.to_vec()
        } else {
            vec![]
        };
        let node = NodeHandle::new(id, name, raw_node, parents, value, device, needs_grad, false);
        self.nodes.insert(id, node);
        Ok(id)
    }
}
