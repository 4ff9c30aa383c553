use crate::nn::GraphError;
use crate::nn::nodes::raw_node::TraitNode;
use crate::nn::nodes::{NodeHandle, parent_value};
use crate::tensor::Tensor;

/// 逐元素乘法节点：`a ⊙ b`（支持广播）
#[derive(Clone, Default)]
pub(in crate::nn) struct Multiply {
    value: Option<Tensor>,
    grad: Option<Tensor>,
}

impl Multiply {
    pub(in crate::nn) fn new() -> Self {
        Self::default()
    }
}

impl TraitNode for Multiply {
    fn calc_value_by_parents(&mut self, parents: &[&NodeHandle]) -> Result<(), GraphError> {
        let a = parent_value(parents, 0, "Multiply")?;
        let b = parent_value(parents, 1, "Multiply")?;
        if !a.can_broadcast_with(b) {
            return Err(GraphError::ShapeMismatch {
                expected: a.shape().to_vec(),
                got: b.shape().to_vec(),
                message: format!("Multiply 的两个父节点{}与{}无法广播", parents[0], parents[1]),
            });
        }
        self.value = Some(a * b);
        Ok(())
    }

    fn value(&self) -> Option<&Tensor> {
        self.value.as_ref()
    }

    fn calc_grad_to_parent(
        &self,
        parent_index: usize,
        parents: &[&NodeHandle],
        upstream_grad: &Tensor,
    ) -> Result<Tensor, GraphError> {
        if parent_index > 1 {
            return Err(GraphError::ComputationError(format!(
                "Multiply 只有2个父节点，不存在第{}个",
                parent_index + 1
            )));
        }
        let target = parent_value(parents, parent_index, "Multiply")?;
        let other = parent_value(parents, 1 - parent_index, "Multiply")?;
        Ok((upstream_grad * other).sum_to_shape(target.shape()))
    }

    fn grad(&self) -> Option<&Tensor> {
        self.grad.as_ref()
    }

    fn set_grad(&mut self, grad: Option<&Tensor>) -> Result<(), GraphError> {
        self.grad = grad.cloned();
        Ok(())
    }
}
