/*
 * @Author       : 老董
 * @Date         : 2026-01-27
 * @Description  : Graph 句柄（用户级 API）
 */

use super::inner::GraphInner;
use crate::nn::var::{Init, Var};
use crate::nn::{Device, NodeId};
use crate::tensor::Tensor;
use std::cell::RefCell;
use std::rc::Rc;

/// Graph - 计算图句柄（PyTorch 风格用户 API）
///
/// # 设计原则
/// - 是 `Rc<RefCell<GraphInner>>` 的薄封装
/// - Clone 语义：多个 Graph 引用同一个 GraphInner
/// - 创建的 Var 自动持有图引用
#[derive(Clone)]
pub struct Graph {
    inner: Rc<RefCell<GraphInner>>,
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

impl Graph {
    // ==================== 创建 ====================

    pub fn new() -> Self {
        Self::from_inner(GraphInner::new())
    }

    /// 创建带种子的图（用于确定性训练）
    pub fn new_with_seed(seed: u64) -> Self {
        Self::from_inner(GraphInner::new_with_seed(seed))
    }

    pub fn from_inner(inner: GraphInner) -> Self {
        Self {
            inner: Rc::new(RefCell::new(inner)),
        }
    }

    pub(crate) const fn from_rc(inner: Rc<RefCell<GraphInner>>) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> std::cell::Ref<'_, GraphInner> {
        self.inner.borrow()
    }

    pub fn inner_mut(&self) -> std::cell::RefMut<'_, GraphInner> {
        self.inner.borrow_mut()
    }

    pub(crate) fn inner_rc(&self) -> Rc<RefCell<GraphInner>> {
        Rc::clone(&self.inner)
    }

    /// 将 NodeId 包装成 Var
    pub fn wrap_node_id(&self, node_id: NodeId) -> Var {
        Var::new(node_id, self.inner_rc())
    }

    // ==================== 创建变量 ====================

    /// 创建位于`device`上的输入节点（不需要梯度）
    pub fn input(&self, data: &Tensor, device: Device) -> Var {
        let id = self.inner.borrow_mut().new_input_node(data, device, None);
        self.wrap_node_id(id)
    }

    pub fn input_named(&self, data: &Tensor, device: Device, name: &str) -> Var {
        let id = self
            .inner
            .borrow_mut()
            .new_input_node(data, device, Some(name));
        self.wrap_node_id(id)
    }

    /// 创建参数节点，初始值由`init`借助图的随机数生成器产生
    pub fn parameter(&self, shape: &[usize], init: Init, name: &str, device: Device) -> Var {
        let mut g = self.inner.borrow_mut();
        let data = init.generate_with_rng(shape, g.rng_mut());
        let id = g.new_parameter_node(&data, device, Some(name));
        drop(g);
        self.wrap_node_id(id)
    }

    // ==================== 梯度模式 ====================

    /// 清空图中所有参数的梯度
    pub fn zero_grad(&self) {
        self.inner.borrow_mut().zero_grad();
    }

    pub fn is_grad_enabled(&self) -> bool {
        self.inner.borrow().is_grad_enabled()
    }

    /// 在不记录梯度的上下文中执行闭包（用于推理/测试），退出后恢复原模式
    ///
    /// # 示例
    /// ```ignore
    /// let fake = graph.no_grad_scope(|_| generator.forward(&real))?;
    /// ```
    pub fn no_grad_scope<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Self) -> R,
    {
        let was_enabled = self.is_grad_enabled();
        self.inner.borrow_mut().set_grad_enabled(false);
        let result = f(self);
        self.inner.borrow_mut().set_grad_enabled(was_enabled);
        result
    }

    /// 释放除参数外的全部节点，返回释放的个数
    pub fn release_intermediates(&self) -> usize {
        self.inner.borrow_mut().release_intermediates()
    }

    pub fn nodes_count(&self) -> usize {
        self.inner.borrow().nodes_count()
    }

    pub fn parameters_count(&self) -> usize {
        self.inner.borrow().parameters_count()
    }
}

impl std::fmt::Debug for Graph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let g = self.inner.borrow();
        f.debug_struct("Graph")
            .field("name", &g.name())
            .field("nodes", &g.nodes_count())
            .finish()
    }
}
