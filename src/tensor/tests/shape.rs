use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::tensor::Tensor;

#[test]
fn test_reshape_keeps_row_major_order() {
    let tensor = Tensor::new(&[1., 2., 3., 4., 5., 6.], &[2, 3]);
    let reshaped = tensor.reshape(&[3, 2]);
    assert_eq!(reshaped.shape(), &[3, 2]);
    assert_eq!(reshaped.to_vec(), vec![1., 2., 3., 4., 5., 6.]);

    // 转置后再重塑，应按转置后的逻辑顺序排列
    let transposed = tensor.transpose();
    assert_eq!(transposed.reshape(&[6]).to_vec(), vec![1., 4., 2., 5., 3., 6.]);
}

#[test]
#[should_panic(expected = "元素个数不同")]
fn test_reshape_size_mismatch_panics() {
    let tensor = Tensor::new(&[1., 2., 3., 4.], &[2, 2]);
    let _ = tensor.reshape(&[3]);
}

#[test]
fn test_squeeze_dim() {
    // [N, C, D, H, W] 中 C = 1 时挤压掉通道维
    let volume = Tensor::zeros(&[2, 1, 3, 4, 5]);
    assert_eq!(volume.squeeze_dim(1).shape(), &[2, 3, 4, 5]);

    // 该维不为1时原样返回
    let volume = Tensor::zeros(&[2, 2, 3, 4, 5]);
    assert_eq!(volume.squeeze_dim(1).shape(), &[2, 2, 3, 4, 5]);
}

#[test]
fn test_split_batch_then_concat_restores_tensor() {
    let mut rng = StdRng::seed_from_u64(7);
    let batch = Tensor::normal_with_rng(0.0, 1.0, &[3, 1, 2, 2, 2], &mut rng);
    let items = batch.split_batch();
    assert_eq!(items.len(), 3);
    for item in &items {
        assert_eq!(item.shape(), &[1, 1, 2, 2, 2]);
    }
    let refs = items.iter().collect::<Vec<_>>();
    assert_eq!(Tensor::concat(&refs), batch);
}

#[test]
#[should_panic(expected = "张量形状不一致")]
fn test_concat_inconsistent_shapes_panics() {
    let a = Tensor::zeros(&[1, 2]);
    let b = Tensor::zeros(&[1, 3]);
    let _ = Tensor::concat(&[&a, &b]);
}

#[test]
fn test_scalar_and_number() {
    let scalar = Tensor::scalar(3.5);
    assert_eq!(scalar.shape(), &[1, 1]);
    assert_eq!(scalar.get_data_number(), Some(3.5));
    assert_eq!(Tensor::zeros(&[2, 2]).get_data_number(), None);
}

#[test]
fn test_seeded_normal_is_reproducible() {
    let a = Tensor::normal_with_rng(0.0, 1.0, &[4, 5], &mut StdRng::seed_from_u64(42));
    let b = Tensor::normal_with_rng(0.0, 1.0, &[4, 5], &mut StdRng::seed_from_u64(42));
    assert_eq!(a, b);
    assert!(a.is_finite());
}
