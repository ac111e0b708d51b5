use super::NodeId;
use super::raw_node::{NodeType, TraitNode};
use crate::nn::Device;
use crate::tensor::Tensor;

/// 图中的一个节点：原始节点（决定如何计算）+ 图需要的簿记信息
pub(crate) struct NodeHandle {
    id: NodeId,
    name: String,
    raw_node: NodeType,
    /// 仅当本节点需要梯度时才记录父节点，否则为空（不参与反向传播）
    parents: Vec<NodeId>,
    value: Tensor,
    grad: Option<Tensor>,
    device: Device,
    needs_grad: bool,
    /// 只对参数节点有意义：为false时反向传播不向其累加梯度（冻结）
    requires_grad: bool,
}

impl NodeHandle {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        id: NodeId,
        name: String,
        raw_node: NodeType,
        parents: Vec<NodeId>,
        value: Tensor,
        device: Device,
        needs_grad: bool,
        requires_grad: bool,
    ) -> Self {
        Self {
            id,
            name,
            raw_node,
            parents,
            value,
            grad: None,
            device,
            needs_grad,
            requires_grad,
        }
    }

    pub(crate) const fn id(&self) -> NodeId {
        self.id
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    pub(crate) const fn raw_node(&self) -> &NodeType {
        &self.raw_node
    }

    pub(crate) fn type_name(&self) -> &'static str {
        self.raw_node.type_name()
    }

    pub(crate) fn is_parameter(&self) -> bool {
        self.raw_node.is_parameter()
    }

    pub(crate) fn is_leaf(&self) -> bool {
        self.raw_node.parents_count() == 0
    }

    pub(crate) fn parents(&self) -> &[NodeId] {
        &self.parents
    }

    pub(crate) const fn value(&self) -> &Tensor {
        &self.value
    }

    pub(crate) fn set_value(&mut self, value: Tensor) {
        self.value = value;
    }

    pub(crate) const fn grad(&self) -> Option<&Tensor> {
        self.grad.as_ref()
    }

    /// 将`grad`累加到已有梯度上（没有则直接存入）
    pub(crate) fn accumulate_grad(&mut self, grad: Tensor) {
        self.grad = Some(match self.grad.take() {
            Some(old) => old + grad,
            None => grad,
        });
    }

    pub(crate) fn clear_grad(&mut self) {
        self.grad = None;
    }

    pub(crate) const fn device(&self) -> Device {
        self.device
    }

    pub(crate) const fn needs_grad(&self) -> bool {
        self.needs_grad
    }

    pub(crate) const fn requires_grad(&self) -> bool {
        self.requires_grad
    }

    pub(crate) fn set_requires_grad(&mut self, requires_grad: bool) {
        self.requires_grad = requires_grad;
    }
}

impl std::fmt::Display for NodeHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[id={}, name={}, type={}, device={}]",
            self.id.0,
            self.name,
            self.type_name(),
            self.device
        )
    }
}
