mod device_placement;
mod layer_linear;
mod node_activation;

use crate::nn::{Device, Graph, Init, Var};
use crate::tensor::Tensor;

/// 创建一个位于CPU、形状为`shape`、值为`data`的参数
fn param_with(graph: &Graph, data: &[f32], shape: &[usize], name: &str) -> Var {
    let p = graph.parameter(shape, Init::Zeros, name, Device::Cpu);
    p.set_value(&Tensor::new(data, shape)).unwrap();
    p
}

fn scalar_param(graph: &Graph, value: f32, name: &str) -> Var {
    graph.parameter(&[1, 1], Init::Constant(value), name, Device::Cpu)
}

fn zeros_input(graph: &Graph, shape: &[usize]) -> Var {
    graph.input(&Tensor::zeros(shape), Device::Cpu)
}
