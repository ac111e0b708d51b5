/*
 * @Author       : 老董
 * @Date         : 2026-01-08
 * @Description  : Smart Var - 智能变量句柄，支持算子重载和链式调用
 */

use super::graph::GraphInner;
use super::nodes::raw_node::{Add, Multiply, ScalarMultiply, Subtract, Transfer};
use super::{Device, GraphError, NodeId};
use crate::tensor::Tensor;
use rand::rngs::StdRng;
use std::cell::RefCell;
use std::ops::{Add as AddOp, Mul, Neg, Sub};
use std::rc::Rc;

// ==================== Init 枚举 ====================

/// 参数初始化策略
#[derive(Debug, Clone)]
pub enum Init {
    /// 常数初始化
    Constant(f32),
    /// 全零
    Zeros,
    /// 正态分布（使用 Graph 的 RNG）
    Normal { mean: f32, std: f32 },
}

impl Init {
    /// 生成初始化后的 Tensor（使用指定的 RNG）
    pub fn generate_with_rng(&self, shape: &[usize], rng: &mut StdRng) -> Tensor {
        match self {
            Self::Constant(v) => Tensor::full(*v, shape),
            Self::Zeros => Tensor::zeros(shape),
            Self::Normal { mean, std } => Tensor::normal_with_rng(*mean, *std, shape, rng),
        }
    }
}

// ==================== Var 结构 ====================

/// 智能变量句柄 - 携带图引用，支持算子重载和链式调用
///
/// # 设计原则
/// - 持有 `Rc<RefCell<GraphInner>>` 引用，实现算子重载
/// - Clone 语义（非 Copy），但开销极低（Rc clone）
/// - 节点在创建时即求值，`value()`随时可读
///
/// # 使用示例
/// ```ignore
/// let graph = Graph::new();
/// let x = graph.input(&images, Device::Cuda(0));
/// let y = x.matmul(&w)?;
/// let z = &y + &b;
/// let loss = z.mse_loss(&target)?;
/// loss.backward()?;
/// ```
#[derive(Clone)]
pub struct Var {
    id: NodeId,
    graph: Rc<RefCell<GraphInner>>,
}

impl std::fmt::Debug for Var {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Var").field("id", &self.id).finish()
    }
}

impl Var {
    pub(crate) const fn new(id: NodeId, graph: Rc<RefCell<GraphInner>>) -> Self {
        Self { id, graph }
    }

    pub const fn node_id(&self) -> NodeId {
        self.id
    }

    pub(crate) const fn graph(&self) -> &Rc<RefCell<GraphInner>> {
        &self.graph
    }

    /// 检查两个 Var 是否来自同一个 Graph
    pub fn same_graph(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.graph, &other.graph)
    }

    /// 获取 Var 所属的 Graph handle
    pub fn get_graph(&self) -> super::graph::Graph {
        super::graph::Graph::from_rc(Rc::clone(&self.graph))
    }

    fn check_same_graph(&self, other: &Self) -> Result<(), GraphError> {
        if self.same_graph(other) {
            Ok(())
        } else {
            Err(GraphError::InvalidOperation(
                "不能对来自不同 Graph 的 Var 进行操作".to_string(),
            ))
        }
    }

    /// 以本节点为第一个父节点创建运算节点
    pub(crate) fn unary_op(
        &self,
        raw_node: impl Into<super::nodes::raw_node::NodeType>,
    ) -> Result<Self, GraphError> {
        let id = self
            .graph
            .borrow_mut()
            .new_op_node(raw_node.into(), &[self.id], None)?;
        Ok(Self::new(id, Rc::clone(&self.graph)))
    }

    pub(crate) fn binary_op(
        &self,
        other: &Self,
        raw_node: impl Into<super::nodes::raw_node::NodeType>,
    ) -> Result<Self, GraphError> {
        self.check_same_graph(other)?;
        let id = self
            .graph
            .borrow_mut()
            .new_op_node(raw_node.into(), &[self.id, other.id], None)?;
        Ok(Self::new(id, Rc::clone(&self.graph)))
    }

    // ==================== 值、梯度与设备 ====================

    /// 获取节点的值（克隆的 Tensor）
    pub fn value(&self) -> Result<Tensor, GraphError> {
        Ok(self.graph.borrow().get_node_value(self.id)?.clone())
    }

    /// 标量节点的纯数值（如损失）
    pub fn item(&self) -> Result<f32, GraphError> {
        let value = self.value()?;
        value
            .get_data_number()
            .ok_or_else(|| GraphError::InvalidOperation(format!("{:?}不是标量", value.shape())))
    }

    pub fn shape(&self) -> Result<Vec<usize>, GraphError> {
        Ok(self.graph.borrow().get_node_value(self.id)?.shape().to_vec())
    }

    pub fn device(&self) -> Result<Device, GraphError> {
        self.graph.borrow().get_node_device(self.id)
    }

    pub fn name(&self) -> Result<String, GraphError> {
        Ok(self.graph.borrow().get_node_name(self.id)?.to_string())
    }

    /// 覆盖叶子节点（输入、参数）的值，形状须一致
    pub fn set_value(&self, value: &Tensor) -> Result<(), GraphError> {
        self.graph.borrow_mut().set_node_value(self.id, value)
    }

    /// 获取累加的梯度，从未收到梯度（或已清空）时为None
    pub fn grad(&self) -> Result<Option<Tensor>, GraphError> {
        Ok(self.graph.borrow().get_node_grad(self.id)?.cloned())
    }

    pub fn clear_grad(&self) -> Result<(), GraphError> {
        self.graph.borrow_mut().clear_node_grad(self.id)
    }

    pub fn requires_grad(&self) -> Result<bool, GraphError> {
        self.graph.borrow().is_node_requires_grad(self.id)
    }

    /// 冻结/解冻（仅参数节点）
    pub fn set_requires_grad(&self, requires_grad: bool) -> Result<(), GraphError> {
        self.graph
            .borrow_mut()
            .set_node_requires_grad(self.id, requires_grad)
    }

    // ==================== 梯度流控制 ====================

    /// 截断梯度流：返回一个持有相同值拷贝的新叶子节点，原节点不受影响
    pub fn detach(&self) -> Result<Self, GraphError> {
        let id = self.graph.borrow_mut().detach_node(self.id)?;
        Ok(Self::new(id, Rc::clone(&self.graph)))
    }

    /// 转移到另一设备（显式节点，梯度原样传回）
    pub fn to_device(&self, device: Device) -> Result<Self, GraphError> {
        self.unary_op(Transfer::new(device))
    }

    /// 以本节点为损失做反向传播，返回损失值
    pub fn backward(&self) -> Result<f32, GraphError> {
        self.graph.borrow_mut().backward(self.id)
    }

    // ==================== 可失败的算术 ====================

    pub fn try_add(&self, other: &Self) -> Result<Self, GraphError> {
        self.binary_op(other, Add)
    }

    pub fn try_sub(&self, other: &Self) -> Result<Self, GraphError> {
        self.binary_op(other, Subtract)
    }

    pub fn try_mul(&self, other: &Self) -> Result<Self, GraphError> {
        self.binary_op(other, Multiply)
    }

    pub fn mul_scalar(&self, scale: f32) -> Result<Self, GraphError> {
        self.unary_op(ScalarMultiply::new(scale))
    }

    pub fn div_scalar(&self, divisor: f32) -> Result<Self, GraphError> {
        if divisor == 0.0 {
            return Err(GraphError::InvalidOperation("除数不能为0".to_string()));
        }
        self.mul_scalar(1.0 / divisor)
    }
}

// ==================== 算子重载 ====================
// 与 PyTorch 一致，算子重载失败（形状/设备不匹配）时直接 panic；需要处理错误请用 try_* 方法

impl AddOp for &Var {
    type Output = Var;

    fn add(self, other: &Var) -> Var {
        self.try_add(other).expect("Var 相加失败")
    }
}

impl AddOp for Var {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        &self + &other
    }
}

impl Sub for &Var {
    type Output = Var;

    fn sub(self, other: &Var) -> Var {
        self.try_sub(other).expect("Var 相减失败")
    }
}

impl Sub for Var {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        &self - &other
    }
}

impl Mul for &Var {
    type Output = Var;

    fn mul(self, other: &Var) -> Var {
        self.try_mul(other).expect("Var 相乘失败")
    }
}

impl Mul<f32> for &Var {
    type Output = Var;

    fn mul(self, scale: f32) -> Var {
        self.mul_scalar(scale).expect("Var 数乘失败")
    }
}

impl Mul<f32> for Var {
    type Output = Self;

    fn mul(self, scale: f32) -> Self {
        &self * scale
    }
}

impl Neg for &Var {
    type Output = Var;

    fn neg(self) -> Var {
        self * -1.0
    }
}
