/*
 * @Author       : 老董
 * @Date         : 2024-01-31 20:23:53
 * @LastEditors  : 老董
 * @LastEditTime : 2026-10-18
 * @Description  : 负责神经网络（neural network）的构建：
 *                 设备标记、即时求值的计算图、反向传播、层、优化器与学习率调度
 */

mod device;
mod graph;
pub mod layer;
mod module;
mod nodes;
pub mod optimizer;
mod var;
mod var_ops;

pub use device::Device;
pub use graph::{Graph, GraphError, GraphInner};
pub use layer::Linear;
pub use module::Module;
pub use nodes::NodeId;
pub use optimizer::{Adam, LrPolicy, LrScheduler, Optimizer, ParamGroup, SchedulerConfig};
pub use var::{Init, Var};
pub use var_ops::{VarActivationOps, VarLossOps, VarMatrixOps, VarShapeOps};

#[cfg(test)]
mod tests;
