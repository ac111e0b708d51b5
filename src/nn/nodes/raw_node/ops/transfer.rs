use crate::nn::nodes::raw_node::TraitNode;
use crate::nn::{Device, GraphError};
use crate::tensor::Tensor;

/// 设备转移：值不变，只改变所在设备；梯度原样传回源设备
pub(crate) struct Transfer {
    to: Device,
}

impl Transfer {
    pub(crate) const fn new(to: Device) -> Self {
        Self { to }
    }
}

impl TraitNode for Transfer {
    fn type_name(&self) -> &'static str {
        "Transfer"
    }

    fn parents_count(&self) -> usize {
        1
    }

    fn calc_value_by_parents(&self, parents: &[&Tensor]) -> Result<Tensor, GraphError> {
        Ok(parents[0].clone())
    }

    fn calc_grad_to_parent(
        &self,
        _index: usize,
        _parents: &[&Tensor],
        _value: &Tensor,
        upstream: &Tensor,
    ) -> Result<Tensor, GraphError> {
        Ok(upstream.clone())
    }

    fn target_device(&self) -> Option<Device> {
        Some(self.to)
    }
}
