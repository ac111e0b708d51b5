use super::{param_with, scalar_param, zeros_input};
use crate::nn::{Device, Graph, VarActivationOps, VarLossOps};
use crate::tensor::Tensor;
use approx::assert_abs_diff_eq;

#[test]
fn test_leaky_relu_forward_and_backward() {
    let graph = Graph::new();
    let a = param_with(&graph, &[-1.0, 2.0], &[1, 2], "a");
    let y = a.leaky_relu(0.2).unwrap();
    assert_eq!(y.value().unwrap(), Tensor::new(&[-0.2, 2.0], &[1, 2]));

    // dy = 2y/2 = y；da = y·f'(a)
    y.mse_loss(&zeros_input(&graph, &[1, 2]))
        .unwrap()
        .backward()
        .unwrap();
    let grad = a.grad().unwrap().unwrap().to_vec();
    assert_abs_diff_eq!(grad[0], -0.04, epsilon = 1e-6);
    assert_abs_diff_eq!(grad[1], 2.0, epsilon = 1e-6);
}

#[test]
fn test_leaky_relu_rejects_negative_slope() {
    let graph = Graph::new();
    let a = scalar_param(&graph, 1.0, "a");
    assert!(a.leaky_relu(-0.1).is_err());
}

#[test]
fn test_tanh_forward_and_backward() {
    let graph = Graph::new();
    let a = scalar_param(&graph, 0.0, "a");
    let t = a.tanh().unwrap();
    assert_abs_diff_eq!(t.item().unwrap(), 0.0);

    // (tanh(a) - 1)² 在 a=0 处：dt = -2，tanh'(0) = 1
    let one = graph.input(&Tensor::scalar(1.0), Device::Cpu);
    t.mse_loss(&one).unwrap().backward().unwrap();
    assert_abs_diff_eq!(a.grad().unwrap().unwrap().get_data_number().unwrap(), -2.0);

    let big = scalar_param(&graph, 20.0, "big");
    assert_abs_diff_eq!(big.tanh().unwrap().item().unwrap(), 1.0, epsilon = 1e-6);
}
