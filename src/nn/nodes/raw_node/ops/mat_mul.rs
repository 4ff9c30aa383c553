use crate::nn::GraphError;
use crate::nn::nodes::raw_node::TraitNode;
use crate::nn::nodes::{NodeHandle, parent_value};
use crate::tensor::Tensor;

/// 矩阵乘法节点：`C = A @ B`
///
/// VJP：`dA = G @ Bᵀ`，`dB = Aᵀ @ G`（G 为上游梯度）
#[derive(Clone, Default)]
pub(in crate::nn) struct MatMul {
    value: Option<Tensor>,
    grad: Option<Tensor>,
}

impl MatMul {
    pub(in crate::nn) fn new() -> Self {
        Self::default()
    }
}

impl TraitNode for MatMul {
    fn calc_value_by_parents(&mut self, parents: &[&NodeHandle]) -> Result<(), GraphError> {
        let a = parent_value(parents, 0, "MatMul")?;
        let b = parent_value(parents, 1, "MatMul")?;

        // 验证矩阵乘法的形状兼容性
        if a.dimension() != 2 || b.dimension() != 2 || a.shape()[1] != b.shape()[0] {
            return Err(GraphError::ShapeMismatch {
                expected: a.shape().to_vec(),
                got: b.shape().to_vec(),
                message: format!(
                    "MatMul 的父节点{}的列数须等于父节点{}的行数",
                    parents[0], parents[1]
                ),
            });
        }

        self.value = Some(a.mat_mul(b));
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
        match parent_index {
            0 => {
                let b = parent_value(parents, 1, "MatMul")?;
                Ok(upstream_grad.mat_mul(&b.transpose()))
            }
            1 => {
                let a = parent_value(parents, 0, "MatMul")?;
                Ok(a.transpose().mat_mul(upstream_grad))
            }
            _ => Err(GraphError::ComputationError(format!(
                "MatMul 只有2个父节点，不存在第{}个",
                parent_index + 1
            ))),
        }
    }

    fn grad(&self) -> Option<&Tensor> {
        self.grad.as_ref()
    }

    fn set_grad(&mut self, grad: Option<&Tensor>) -> Result<(), GraphError> {
        self.grad = grad.cloned();
        Ok(())
    }
}
