use crate::nn::GraphError;
use crate::nn::nodes::raw_node::TraitNode;
use crate::nn::nodes::{NodeHandle, parent_value};
use crate::tensor::Tensor;

/// 按列（第1维）拼接若干个行数相同的矩阵，如把状态与动作拼成`[batch, n]`
///
/// 对第`i`个父节点的梯度，就是上游梯度中属于它的那几列。
#[derive(Clone, Default)]
pub(in crate::nn) struct Concat {
    value: Option<Tensor>,
    grad: Option<Tensor>,
}

impl Concat {
    pub(in crate::nn) fn new() -> Self {
        Self::default()
    }
}

impl TraitNode for Concat {
    fn calc_value_by_parents(&mut self, parents: &[&NodeHandle]) -> Result<(), GraphError> {
        let values = (0..parents.len())
            .map(|i| parent_value(parents, i, "Concat"))
            .collect::<Result<Vec<_>, _>>()?;

        let rows = values[0].shape()[0];
        for (value, parent) in values.iter().zip(parents) {
            if value.dimension() != 2 || value.shape()[0] != rows {
                return Err(GraphError::ShapeMismatch {
                    expected: vec![rows, 0],
                    got: value.shape().to_vec(),
                    message: format!("Concat 的父{parent}须为行数与其它父节点相同的矩阵"),
                });
            }
        }

        self.value = Some(Tensor::concat_cols(&values));
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
        let mut start = 0;
        for i in 0..parent_index {
            start += parent_value(parents, i, "Concat")?.shape()[1];
        }
        let width = parent_value(parents, parent_index, "Concat")?.shape()[1];
        Ok(upstream_grad.slice_cols(start, start + width))
    }

    fn grad(&self) -> Option<&Tensor> {
        self.grad.as_ref()
    }

    fn set_grad(&mut self, grad: Option<&Tensor>) -> Result<(), GraphError> {
        self.grad = grad.cloned();
        Ok(())
    }
}
