use crate::nn::{Device, Graph, Linear, Module, VarLossOps};
use crate::tensor::Tensor;

#[test]
fn test_linear_shapes_and_parameters() {
    let graph = Graph::new_with_seed(7);
    let fc = Linear::new(&graph, 3, 2, true, 0.02, "fc", Device::Cuda(0));

    assert_eq!(fc.in_features(), 3);
    assert_eq!(fc.out_features(), 2);
    assert_eq!(fc.num_params(), 2);
    assert_eq!(fc.num_elements().unwrap(), 3 * 2 + 2);
    assert_eq!(fc.weights().name().unwrap(), "fc_W");
    assert_eq!(fc.bias().unwrap().value().unwrap(), Tensor::zeros(&[1, 2]));
    assert_eq!(fc.weights().device().unwrap(), Device::Cuda(0));

    let x = graph.input(&Tensor::ones(&[4, 3]), Device::Cuda(0));
    let y = fc.forward(&x).unwrap();
    assert_eq!(y.shape().unwrap(), vec![4, 2]);
    assert_eq!(y.device().unwrap(), Device::Cuda(0));

    let no_bias = Linear::new(&graph, 3, 2, false, 0.02, "nb", Device::Cpu);
    assert_eq!(no_bias.num_params(), 1);
}

#[test]
fn test_linear_forward_is_x_w_plus_b() {
    let graph = Graph::new();
    let fc = Linear::new(&graph, 2, 1, true, 0.02, "fc", Device::Cpu);
    fc.weights()
        .set_value(&Tensor::new(&[1.0, 2.0], &[2, 1]))
        .unwrap();
    fc.bias().unwrap().set_value(&Tensor::scalar(0.5)).unwrap();

    let x = graph.input(&Tensor::new(&[1.0, 1.0, 2.0, 0.0], &[2, 2]), Device::Cpu);
    let y = fc.forward(&x).unwrap();
    assert_eq!(y.value().unwrap(), Tensor::new(&[3.5, 2.5], &[2, 1]));
}

#[test]
fn test_module_freeze_and_unfreeze() {
    let graph = Graph::new();
    let fc = Linear::new(&graph, 2, 1, true, 0.02, "fc", Device::Cpu);
    fc.freeze().unwrap();
    assert!(fc.parameters().iter().all(|p| !p.requires_grad().unwrap()));

    let x = graph.input(&Tensor::ones(&[1, 2]), Device::Cpu);
    let target = graph.input(&Tensor::scalar(1.0), Device::Cpu);
    fc.forward(&x)
        .unwrap()
        .mse_loss(&target)
        .unwrap()
        .backward()
        .unwrap();
    assert!(fc.parameters().iter().all(|p| p.grad().unwrap().is_none()));

    fc.unfreeze().unwrap();
    fc.forward(&x)
        .unwrap()
        .mse_loss(&target)
        .unwrap()
        .backward()
        .unwrap();
    assert!(fc.parameters().iter().all(|p| p.grad().unwrap().is_some()));

    fc.zero_grad().unwrap();
    assert!(fc.parameters().iter().all(|p| p.grad().unwrap().is_none()));
}
