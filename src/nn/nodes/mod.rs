mod node_handle;
pub(crate) mod raw_node;

pub(crate) use node_handle::NodeHandle;

/// 节点在所属图中的唯一编号（单调递增，释放后不复用）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u64);
