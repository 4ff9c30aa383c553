use crate::nn::GraphError;
use crate::nn::nodes::NodeHandle;
use crate::nn::nodes::raw_node::TraitNode;
use crate::tensor::Tensor;

/// 输入节点（占位符）
///
/// 第0维是批大小，可在每次喂数据时变化；其余维度（特征形状）在创建时固定。
/// 默认不参与梯度计算；以`requires_grad`创建时，反向传播会为其计算梯度，
/// 用于求结果对输入本身的导数（如 critic 对动作的梯度）。
#[derive(Clone)]
pub(in crate::nn) struct Input {
    feature_shape: Vec<usize>,
    requires_grad: bool,
    value: Option<Tensor>,
    grad: Option<Tensor>,
}

impl Input {
    pub(in crate::nn) fn new(feature_shape: &[usize], requires_grad: bool) -> Self {
        Self {
            feature_shape: feature_shape.to_vec(),
            requires_grad,
            value: None,
            grad: None,
        }
    }

    pub(in crate::nn) const fn requires_grad(&self) -> bool {
        self.requires_grad
    }

    pub(in crate::nn) fn feature_shape(&self) -> &[usize] {
        &self.feature_shape
    }
}

impl TraitNode for Input {
    fn calc_value_by_parents(&mut self, _parents: &[&NodeHandle]) -> Result<(), GraphError> {
        Err(GraphError::InvalidOperation(
            "输入节点的值应通过 set_value 设置，而非通过父节点计算".to_string(),
        ))
    }

    fn value(&self) -> Option<&Tensor> {
        self.value.as_ref()
    }

    fn set_value(&mut self, value: Option<&Tensor>) -> Result<(), GraphError> {
        if let Some(value) = value {
            let shape = value.shape();
            let batch_ok = shape.first().is_some_and(|&batch| batch > 0);
            if !batch_ok || shape[1..] != self.feature_shape[..] {
                let mut expected = vec![0];
                expected.extend_from_slice(&self.feature_shape);
                return Err(GraphError::ShapeMismatch {
                    expected,
                    got: shape.to_vec(),
                    message: "输入数据须为 [batch, 特征...] 形状且 batch > 0（期望形状中的0表示任意批大小）"
                        .to_string(),
                });
            }
        }
        self.value = value.cloned();
        // 新数据对应的旧梯度已失效
        self.grad = None;
        Ok(())
    }

    fn calc_grad_to_parent(
        &self,
        _parent_index: usize,
        _parents: &[&NodeHandle],
        _upstream_grad: &Tensor,
    ) -> Result<Tensor, GraphError> {
        Err(GraphError::InvalidOperation("输入节点没有父节点".to_string()))
    }

    fn grad(&self) -> Option<&Tensor> {
        self.grad.as_ref()
    }

    fn set_grad(&mut self, grad: Option<&Tensor>) -> Result<(), GraphError> {
        self.grad = grad.cloned();
        Ok(())
    }
}
