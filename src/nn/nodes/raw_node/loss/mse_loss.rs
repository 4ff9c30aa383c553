/*
 * @Author       : 老董
 * @Date         : 2026-10-14
 * @Description  : MSELoss (Mean Squared Error) 均方误差损失节点
 *
 * 公式：loss = mean((input - target)²)，输出形状为[1, 1]
 * 梯度：∂loss/∂input = 2 * (input - target) / N，∂loss/∂target 为其相反数
 */

use crate::nn::GraphError;
use crate::nn::nodes::raw_node::TraitNode;
use crate::nn::nodes::{NodeHandle, parent_value};
use crate::tensor::Tensor;

#[derive(Clone, Default)]
pub(in crate::nn) struct MSELoss {
    value: Option<Tensor>,
    grad: Option<Tensor>,
}

impl MSELoss {
    pub(in crate::nn) fn new() -> Self {
        Self::default()
    }
}

impl TraitNode for MSELoss {
    fn calc_value_by_parents(&mut self, parents: &[&NodeHandle]) -> Result<(), GraphError> {
        let input = parent_value(parents, 0, "MSELoss")?;
        let target = parent_value(parents, 1, "MSELoss")?;

        if input.shape() != target.shape() {
            return Err(GraphError::ShapeMismatch {
                expected: input.shape().to_vec(),
                got: target.shape().to_vec(),
                message: "MSELoss: input 和 target 形状必须相同".to_string(),
            });
        }

        let n = input.size() as f32;
        let loss = (input - target).square().sum() / n;
        self.value = Some(loss);
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
        let input = parent_value(parents, 0, "MSELoss")?;
        let target = parent_value(parents, 1, "MSELoss")?;
        let n = input.size() as f32;
        // 上游梯度为[1, 1]，广播到整个差值上
        let grad = (input - target) * (2.0 / n) * upstream_grad;
        match parent_index {
            0 => Ok(grad),
            1 => Ok(-grad),
            _ => Err(GraphError::ComputationError(format!(
                "MSELoss 只有2个父节点，不存在第{}个",
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
