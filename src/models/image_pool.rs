/*
 * @Author       : 老董
 * @Date         : 2026-10-18
 * @Description  : 生成图像历史缓冲区。判别器不只看到本轮刚生成的图像，
 *                 还会以一定概率看到历史上生成过的图像
 */

use super::random::{RandomSource, SeededSource};
use crate::tensor::Tensor;

/// 固定容量的生成图像缓冲区
///
/// - 容量为0时原样返回输入
/// - 未满时：存入并原样返回
/// - 已满时：逐张抽取`u ∈ [0, 1)`，`u >= 0.5`原样返回且不改动缓冲区；
///   `u < 0.5`随机选一个槽，返回槽中旧图像并用新图像替换它
///
/// 存储的都是张量拷贝，与计算图无关（相当于detach）
pub struct ImagePool {
    capacity: usize,
    images: Vec<Tensor>,
    source: Box<dyn RandomSource>,
}

impl ImagePool {
    pub fn new(capacity: usize, seed: u64) -> Self {
        Self::with_source(capacity, Box::new(SeededSource::new(seed)))
    }

    pub fn with_source(capacity: usize, source: Box<dyn RandomSource>) -> Self {
        Self {
            capacity,
            images: Vec::with_capacity(capacity),
            source,
        }
    }

    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// 已存储的图像张数
    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// 已存储的图像，每张形状为`[1, ...]`
    pub fn stored(&self) -> &[Tensor] {
        &self.images
    }

    /// 输入`[N, ...]`的一批图像，返回同形状的一批图像（对每张图像独立决策）；
    /// 空批次原样返回
    pub fn query(&mut self, images: &Tensor) -> Tensor {
        if self.capacity == 0 || images.shape().first().is_none_or(|&n| n == 0) {
            return images.clone();
        }
        let returned = images
            .split_batch()
            .into_iter()
            .map(|image| self.query_one(image))
            .collect::<Vec<_>>();
        Tensor::concat(&returned.iter().collect::<Vec<_>>())
    }

    fn query_one(&mut self, image: Tensor) -> Tensor {
        if self.images.len() < self.capacity {
            self.images.push(image.clone());
            return image;
        }
        if self.source.uniform() >= 0.5 {
            image
        } else {
            let slot = self.source.index(self.capacity);
            std::mem::replace(&mut self.images[slot], image)
        }
    }
}
