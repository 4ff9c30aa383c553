use crate::nn::GraphError;
use crate::nn::nodes::raw_node::TraitNode;
use crate::nn::nodes::{NodeHandle, parent_value};
use crate::tensor::Tensor;

/// L2 正则项：`sum(x²) / 2`，输出形状为[1, 1]，对`x`的梯度即为`x`本身
#[derive(Clone, Default)]
pub(in crate::nn) struct L2Loss {
    value: Option<Tensor>,
    grad: Option<Tensor>,
}

impl L2Loss {
    pub(in crate::nn) fn new() -> Self {
        Self::default()
    }
}

impl TraitNode for L2Loss {
    fn calc_value_by_parents(&mut self, parents: &[&NodeHandle]) -> Result<(), GraphError> {
        let x = parent_value(parents, 0, "L2Loss")?;
        self.value = Some(x.square().sum() * 0.5);
        Ok(())
    }

    fn value(&self) -> Option<&Tensor> {
        self.value.as_ref()
    }

    fn calc_grad_to_parent(
        &self,
        _parent_index: usize,
        parents: &[&NodeHandle],
        upstream_grad: &Tensor,
    ) -> Result<Tensor, GraphError> {
        let x = parent_value(parents, 0, "L2Loss")?;
        Ok(x * upstream_grad)
    }

    fn grad(&self) -> Option<&Tensor> {
        self.grad.as_ref()
    }

    fn set_grad(&mut self, grad: Option<&Tensor>) -> Result<(), GraphError> {
        self.grad = grad.cloned();
        Ok(())
    }
}
