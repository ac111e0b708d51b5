use crate::nn::{Device, Graph, GraphError, Init, VarLossOps, VarMatrixOps};
use crate::tensor::Tensor;
use approx::assert_abs_diff_eq;

#[test]
fn test_device_display_and_gpu_id() {
    assert_eq!(Device::Cpu.to_string(), "cpu");
    assert_eq!(Device::Cuda(1).to_string(), "cuda:1");
    assert_eq!(Device::from_gpu_id(-1), Device::Cpu);
    assert_eq!(Device::from_gpu_id(0), Device::Cuda(0));
    assert!(Device::Cuda(0).is_cuda());
}

#[test]
fn test_binary_ops_require_same_device() {
    let graph = Graph::new();
    let a = graph.parameter(&[1, 1], Init::Constant(1.0), "a", Device::Cuda(0));
    let b = graph.parameter(&[1, 1], Init::Constant(1.0), "b", Device::Cuda(1));

    assert_eq!(
        a.try_add(&b).unwrap_err(),
        GraphError::DeviceMismatch {
            op: "Add".to_string(),
            left: Device::Cuda(0),
            right: Device::Cuda(1),
        }
    );
    assert!(matches!(
        a.matmul(&b),
        Err(GraphError::DeviceMismatch { .. })
    ));
    assert!(matches!(
        a.mse_loss(&b),
        Err(GraphError::DeviceMismatch { .. })
    ));
}

#[test]
fn test_results_stay_on_parent_device() {
    let graph = Graph::new();
    let a = graph.parameter(&[1, 1], Init::Constant(1.0), "a", Device::Cuda(1));
    let b = graph.input(&Tensor::scalar(2.0), Device::Cuda(1));
    assert_eq!((&a * &b).device().unwrap(), Device::Cuda(1));
    assert_eq!((&a * 2.0).device().unwrap(), Device::Cuda(1));
}

#[test]
fn test_transfer_moves_value_and_routes_gradient_back() {
    let graph = Graph::new();
    let a = graph.parameter(&[1, 1], Init::Constant(2.0), "a", Device::Cuda(0));
    let moved = a.to_device(Device::Cuda(1)).unwrap();
    assert_eq!(moved.device().unwrap(), Device::Cuda(1));
    assert_eq!(moved.value().unwrap(), a.value().unwrap());

    let target = graph.input(&Tensor::scalar(0.0), Device::Cuda(1));
    let loss = moved.mse_loss(&target).unwrap();
    assert_eq!(loss.device().unwrap(), Device::Cuda(1));
    assert_abs_diff_eq!(loss.backward().unwrap(), 4.0);
    assert_abs_diff_eq!(a.grad().unwrap().unwrap().get_data_number().unwrap(), 4.0);
}

#[test]
fn test_cross_device_sum_via_explicit_transfer() {
    let graph = Graph::new();
    let g = graph.parameter(&[1, 1], Init::Constant(1.0), "g", Device::Cuda(0));
    let c = graph.parameter(&[1, 1], Init::Constant(3.0), "c", Device::Cuda(1));

    assert!(g.try_add(&c).is_err());
    let total = g.to_device(Device::Cuda(1)).unwrap().try_add(&c).unwrap();
    assert_eq!(total.device().unwrap(), Device::Cuda(1));
    assert_abs_diff_eq!(total.backward().unwrap(), 4.0);
    assert_abs_diff_eq!(g.grad().unwrap().unwrap().get_data_number().unwrap(), 1.0);
    assert_abs_diff_eq!(c.grad().unwrap().unwrap().get_data_number().unwrap(), 1.0);
}
