use crate::models::{ImagePool, SequenceSource};
use crate::tensor::Tensor;

/// 值为`values[i]`的一批`[N, 1]`图像
fn images(values: &[f32]) -> Tensor {
    Tensor::new(values, &[values.len(), 1])
}

#[test]
fn test_zero_capacity_pool_returns_input() {
    let mut pool = ImagePool::with_source(0, Box::new(SequenceSource::new(vec![0.0])));
    let batch = images(&[1.0, 2.0, 3.0]);
    assert_eq!(pool.query(&batch), batch);
    assert!(pool.is_empty());
}

#[test]
fn test_empty_batch_is_returned_unchanged() {
    let mut pool = ImagePool::new(3, 0);
    let empty = Tensor::zeros(&[0, 1]);
    assert_eq!(pool.query(&empty), empty);
    assert!(pool.is_empty());

    // 已满的缓冲区同样不受影响
    pool.query(&images(&[1.0, 2.0, 3.0]));
    assert_eq!(pool.query(&empty).shape(), &[0, 1]);
    assert_eq!(pool.len(), 3);
}

#[test]
fn test_pool_stores_and_returns_while_filling() {
    let mut pool = ImagePool::new(4, 0);
    let batch = images(&[1.0, 2.0, 3.0]);
    assert_eq!(pool.query(&batch), batch);
    assert_eq!(pool.len(), 3);
    assert_eq!(pool.stored()[2], images(&[3.0]));
}

#[test]
fn test_pool_never_exceeds_capacity() {
    let mut pool = ImagePool::new(3, 11);
    for round in 0..10 {
        let batch = images(&[round as f32, round as f32 + 0.5]);
        let returned = pool.query(&batch);
        assert_eq!(returned.shape(), batch.shape());
        assert!(pool.len() <= pool.capacity());
    }
    assert_eq!(pool.len(), 3);
}

/// 容量3，依次送入A..F（取值1..6）：
/// - A、B、C 填满缓冲区
/// - D：u=0.2 → 替换，槽位floor(0.5·3)=1，返回B，缓冲区为[A, D, C]
/// - E：u=0.7 → 原样返回E
/// - F：u=0.1 → 替换，槽位floor(0.9·3)=2，返回C，缓冲区为[A, D, F]
#[test]
fn test_pool_swap_trajectory() {
    let source = SequenceSource::new(vec![0.2, 0.5, 0.7, 0.1, 0.9]);
    let mut pool = ImagePool::with_source(3, Box::new(source));

    let returned = pool.query(&images(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]));
    assert_eq!(returned, images(&[1.0, 2.0, 3.0, 2.0, 5.0, 3.0]));

    let stored = pool.stored().iter().map(|t| t.to_vec()[0]).collect::<Vec<_>>();
    assert_eq!(stored, vec![1.0, 4.0, 6.0]);
}

/// 同一条轨迹，但每次只送入一张图像
#[test]
fn test_pool_swap_trajectory_one_image_at_a_time() {
    let source = SequenceSource::new(vec![0.2, 0.5, 0.7, 0.1, 0.9]);
    let mut pool = ImagePool::with_source(3, Box::new(source));

    let expected = [1.0, 2.0, 3.0, 2.0, 5.0, 3.0];
    let stored_after = [
        vec![1.0],
        vec![1.0, 2.0],
        vec![1.0, 2.0, 3.0],
        vec![1.0, 4.0, 3.0],
        vec![1.0, 4.0, 3.0],
        vec![1.0, 4.0, 6.0],
    ];
    for (i, value) in [1.0, 2.0, 3.0, 4.0, 5.0, 6.0].into_iter().enumerate() {
        let returned = pool.query(&images(&[value]));
        assert_eq!(returned, images(&[expected[i]]), "第{}次查询", i);
        let stored = pool.stored().iter().map(|t| t.to_vec()[0]).collect::<Vec<_>>();
        assert_eq!(stored, stored_after[i], "第{}次查询后", i);
    }
}

#[test]
fn test_pool_keeps_volume_shape() {
    let mut pool = ImagePool::new(2, 5);
    let batch = Tensor::ones(&[3, 1, 2, 2, 2]);
    assert_eq!(pool.query(&batch).shape(), &[3, 1, 2, 2, 2]);
    assert_eq!(pool.stored()[0].shape(), &[1, 1, 2, 2, 2]);
}
