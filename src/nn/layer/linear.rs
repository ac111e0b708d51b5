/*
 * @Author       : 老董
 * @Date         : 2026-01-17
 * @Description  : Linear (全连接) 层
 */

use crate::nn::{Device, Graph, GraphError, Init, Module, Var, VarMatrixOps};

/// Linear (全连接) 层：`output = x @ W + b`
///
/// # 输入/输出形状
/// - 输入：[batch_size, in_features]
/// - 输出：[batch_size, out_features]
///
/// # 使用示例
/// ```ignore
/// let fc = Linear::new(&graph, 784, 128, true, 0.02, "fc1", Device::Cuda(0));
/// let h = fc.forward(&x)?.leaky_relu(0.2)?;
/// ```
pub struct Linear {
    /// 权重参数 [in_features, out_features]
    weights: Var,
    /// 偏置参数 [1, out_features]（可选）
    bias: Option<Var>,
    in_features: usize,
    out_features: usize,
    name: String,
}

impl Linear {
    /// 创建新的 Linear 层，参数位于`device`上
    ///
    /// 权重按`N(0, init_gain)`初始化（与生成对抗网络常用的 normal 初始化一致），偏置为0
    pub fn new(
        graph: &Graph,
        in_features: usize,
        out_features: usize,
        use_bias: bool,
        init_gain: f32,
        name: &str,
        device: Device,
    ) -> Self {
        let weights = graph.parameter(
            &[in_features, out_features],
            Init::Normal {
                mean: 0.0,
                std: init_gain,
            },
            &format!("{name}_W"),
            device,
        );

        let bias = use_bias.then(|| {
            graph.parameter(&[1, out_features], Init::Zeros, &format!("{name}_b"), device)
        });

        Self {
            weights,
            bias,
            in_features,
            out_features,
            name: name.to_string(),
        }
    }

    /// 前向传播：`x @ W + b`
    pub fn forward(&self, x: &Var) -> Result<Var, GraphError> {
        let xw = x.matmul(&self.weights)?;
        match &self.bias {
            Some(b) => xw.try_add(b),
            None => Ok(xw),
        }
    }

    pub const fn weights(&self) -> &Var {
        &self.weights
    }

    pub const fn bias(&self) -> Option<&Var> {
        self.bias.as_ref()
    }

    pub const fn in_features(&self) -> usize {
        self.in_features
    }

    pub const fn out_features(&self) -> usize {
        self.out_features
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Module for Linear {
    fn parameters(&self) -> Vec<Var> {
        let mut params = vec![self.weights.clone()];
        if let Some(b) = &self.bias {
            params.push(b.clone());
        }
        params
    }
}
