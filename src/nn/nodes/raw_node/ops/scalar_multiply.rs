use crate::nn::GraphError;
use crate::nn::nodes::raw_node::TraitNode;
use crate::nn::nodes::{NodeHandle, parent_value};
use crate::tensor::Tensor;

/// 纯数乘法节点：`k · x`，`k`在建图时固定
#[derive(Clone)]
pub(in crate::nn) struct ScalarMultiply {
    factor: f32,
    value: Option<Tensor>,
    grad: Option<Tensor>,
}

impl ScalarMultiply {
    pub(in crate::nn) const fn new(factor: f32) -> Self {
        Self {
            factor,
            value: None,
            grad: None,
        }
    }

    pub(in crate::nn) const fn factor(&self) -> f32 {
        self.factor
    }
}

impl TraitNode for ScalarMultiply {
    fn calc_value_by_parents(&mut self, parents: &[&NodeHandle]) -> Result<(), GraphError> {
        let x = parent_value(parents, 0, "ScalarMultiply")?;
        self.value = Some(x * self.factor);
        Ok(())
    }

    fn value(&self) -> Option<&Tensor> {
        self.value.as_ref()
    }

    fn calc_grad_to_parent(
        &self,
        _parent_index: usize,
        _parents: &[&NodeHandle],
        upstream_grad: &Tensor,
    ) -> Result<Tensor, GraphError> {
        Ok(upstream_grad * self.factor)
    }

    fn grad(&self) -> Option<&Tensor> {
        self.grad.as_ref()
    }

    fn set_grad(&mut self, grad: Option<&Tensor>) -> Result<(), GraphError> {
        self.grad = grad.cloned();
        Ok(())
    }
}
