/*
 * @Author       : 老董
 * @Date         : 2026-01-09
 * @Description  : Module trait 定义
 */

use super::{GraphError, Var};

/// 模块 trait
///
/// # 设计原则
/// - `forward()` **不是** trait 方法（签名各异）
/// - `new()` **不是** trait 方法（参数各异）
/// - `parameters()` 返回 `Vec<Var>`（签名一致，放入 trait）
pub trait Module {
    /// 获取所有参数（优化器据此知道要更新哪些参数）
    fn parameters(&self) -> Vec<Var>;

    /// 获取参数（张量）个数
    fn num_params(&self) -> usize {
        self.parameters().len()
    }

    /// 获取参数元素总数
    fn num_elements(&self) -> Result<usize, GraphError> {
        self.parameters()
            .iter()
            .map(|p| p.shape().map(|s| s.iter().product::<usize>()))
            .sum()
    }

    /// 设置本模块所有参数是否接收梯度
    fn set_requires_grad(&self, requires_grad: bool) -> Result<(), GraphError> {
        self.parameters()
            .iter()
            .try_for_each(|p| p.set_requires_grad(requires_grad))
    }

    /// 冻结：反向传播不再向本模块参数累加梯度（梯度仍会穿过本模块）
    fn freeze(&self) -> Result<(), GraphError> {
        self.set_requires_grad(false)
    }

    fn unfreeze(&self) -> Result<(), GraphError> {
        self.set_requires_grad(true)
    }

    /// 清空本模块所有参数的梯度
    fn zero_grad(&self) -> Result<(), GraphError> {
        self.parameters().iter().try_for_each(Var::clear_grad)
    }
}
