use crate::nn::GraphError;
use crate::nn::nodes::raw_node::TraitNode;
use crate::nn::nodes::{NodeHandle, parent_value};
use crate::tensor::Tensor;

/// 逐元素加法节点：`a + b`
///
/// 支持 NumPy 风格广播，典型用法是把`[1, k]`的偏置加到`[batch, k]`的批数据上。
/// 被广播的一方，其梯度需在被广播的轴上求和还原。
#[derive(Clone, Default)]
pub(in crate::nn) struct Add {
    value: Option<Tensor>,
    grad: Option<Tensor>,
}

impl Add {
    pub(in crate::nn) fn new() -> Self {
        Self::default()
    }
}

impl TraitNode for Add {
    fn calc_value_by_parents(&mut self, parents: &[&NodeHandle]) -> Result<(), GraphError> {
        let a = parent_value(parents, 0, "Add")?;
        let b = parent_value(parents, 1, "Add")?;
        if !a.can_broadcast_with(b) {
            return Err(GraphError::ShapeMismatch {
                expected: a.shape().to_vec(),
                got: b.shape().to_vec(),
                message: format!("Add 的两个父节点{}与{}无法广播", parents[0], parents[1]),
            });
        }
        self.value = Some(a + b);
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
        let parent = parent_value(parents, parent_index, "Add")?;
        Ok(upstream_grad.sum_to_shape(parent.shape()))
    }

    fn grad(&self) -> Option<&Tensor> {
        self.grad.as_ref()
    }

    fn set_grad(&mut self, grad: Option<&Tensor>) -> Result<(), GraphError> {
        self.grad = grad.cloned();
        Ok(())
    }
}
