use crate::nn::GraphError;
use crate::nn::nodes::raw_node::TraitNode;
use crate::nn::nodes::{NodeHandle, parent_value};
use crate::tensor::Tensor;

/// 矩阵转置节点，梯度为上游梯度的转置
#[derive(Clone, Default)]
pub(in crate::nn) struct Transpose {
    value: Option<Tensor>,
    grad: Option<Tensor>,
}

impl Transpose {
    pub(in crate::nn) fn new() -> Self {
        Self::default()
    }
}

impl TraitNode for Transpose {
    fn calc_value_by_parents(&mut self, parents: &[&NodeHandle]) -> Result<(), GraphError> {
        let x = parent_value(parents, 0, "Transpose")?;
        if x.dimension() != 2 {
            return Err(GraphError::InvalidOperation(format!(
                "Transpose 只支持2阶张量，但父{}的形状为{:?}",
                parents[0],
                x.shape()
            )));
        }
        self.value = Some(x.transpose());
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
        Ok(upstream_grad.transpose())
    }

    fn grad(&self) -> Option<&Tensor> {
        self.grad.as_ref()
    }

    fn set_grad(&mut self, grad: Option<&Tensor>) -> Result<(), GraphError> {
        self.grad = grad.cloned();
        Ok(())
    }
}
