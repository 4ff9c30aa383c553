use crate::nn::GraphError;
use crate::nn::nodes::NodeHandle;
use crate::nn::nodes::raw_node::TraitNode;
use crate::tensor::Tensor;

/// 参数节点：形状固定的可训练张量，由优化器（或目标网络的滑动平均）更新
#[derive(Clone)]
pub(in crate::nn) struct Parameter {
    shape: Vec<usize>,
    value: Option<Tensor>,
    grad: Option<Tensor>,
}

impl Parameter {
    pub(in crate::nn) fn new(shape: &[usize]) -> Self {
        Self {
            shape: shape.to_vec(),
            value: None,
            grad: None,
        }
    }

    pub(in crate::nn) fn shape(&self) -> &[usize] {
        &self.shape
    }
}

impl TraitNode for Parameter {
    fn calc_value_by_parents(&mut self, _parents: &[&NodeHandle]) -> Result<(), GraphError> {
        Err(GraphError::InvalidOperation(
            "参数节点的值应通过 set_value 设置，而非通过父节点计算".to_string(),
        ))
    }

    fn value(&self) -> Option<&Tensor> {
        self.value.as_ref()
    }

    fn set_value(&mut self, value: Option<&Tensor>) -> Result<(), GraphError> {
        if let Some(value) = value {
            if value.shape() != self.shape.as_slice() {
                return Err(GraphError::ShapeMismatch {
                    expected: self.shape.clone(),
                    got: value.shape().to_vec(),
                    message: "参数节点的形状在创建后不可改变".to_string(),
                });
            }
        }
        self.value = value.cloned();
        Ok(())
    }

    fn calc_grad_to_parent(
        &self,
        _parent_index: usize,
        _parents: &[&NodeHandle],
        _upstream_grad: &Tensor,
    ) -> Result<Tensor, GraphError> {
        Err(GraphError::InvalidOperation("参数节点没有父节点".to_string()))
    }

    fn grad(&self) -> Option<&Tensor> {
        self.grad.as_ref()
    }

    fn set_grad(&mut self, grad: Option<&Tensor>) -> Result<(), GraphError> {
        self.grad = grad.cloned();
        Ok(())
    }
}
