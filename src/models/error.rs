use crate::nn::GraphError;
use crate::options::OptionsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error(transparent)]
    Graph(#[from] GraphError),
    #[error(transparent)]
    Options(#[from] OptionsError),
    #[error("模型配置错误：{0}")]
    Misconfigured(String),
    /// 调用顺序不对，如未`set_input`就`forward`
    #[error("请先调用`{0}`")]
    NotReady(&'static str),
}
