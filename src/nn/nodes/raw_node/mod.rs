/*
 * @Author       : 老董
 * @Date         : 2026-10-13
 * @Description  : 原始节点：每种节点只关心自己的前向计算与对父节点的VJP（向量-雅可比积）梯度，
 *                 图结构、遍历顺序、梯度累加都由 GraphInner 负责
 */

mod input;
mod loss;
mod ops;
mod parameter;

pub(in crate::nn) use input::Input;
pub(in crate::nn) use loss::*;
pub(in crate::nn) use ops::*;
pub(in crate::nn) use parameter::Parameter;

use super::NodeHandle;
use crate::nn::GraphError;
use crate::tensor::Tensor;
use enum_dispatch::enum_dispatch;

#[enum_dispatch]
pub(in crate::nn) enum NodeType {
    Input(Input),
    Parameter(Parameter),
    /*↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓算子↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓*/
    Add(Add),
    MatMul(MatMul),
    Multiply(Multiply),
    ScalarMultiply(ScalarMultiply),
    Transpose(Transpose),
    Concat(Concat),
    Sum(Sum),
    /*↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑算子↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑*/
    /*↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓损失↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓*/
    MSELoss(MSELoss),
    L2Loss(L2Loss),
    /*↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑损失↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑*/
}

impl NodeType {
    /// 节点类型名（用于自动命名与展示）
    pub(in crate::nn) const fn type_name(&self) -> &'static str {
        match self {
            Self::Input(_) => "Input",
            Self::Parameter(_) => "Parameter",
            Self::Add(_) => "Add",
            Self::MatMul(_) => "MatMul",
            Self::Multiply(_) => "Multiply",
            Self::ScalarMultiply(_) => "ScalarMultiply",
            Self::Transpose(_) => "Transpose",
            Self::Concat(_) => "Concat",
            Self::Sum(_) => "Sum",
            Self::MSELoss(_) => "MSELoss",
            Self::L2Loss(_) => "L2Loss",
        }
    }
}

#[enum_dispatch(NodeType)]
pub(in crate::nn) trait TraitNode {
    /// 根据父节点的值计算本节点的值（由 GraphInner 保证调用前所有父节点均已计算过）
    fn calc_value_by_parents(&mut self, parents: &[&NodeHandle]) -> Result<(), GraphError>;

    fn value(&self) -> Option<&Tensor>;

    fn set_value(&mut self, _value: Option<&Tensor>) -> Result<(), GraphError> {
        Err(GraphError::InvalidOperation(
            "该类型节点的值不应该被手动设置".to_string(),
        ))
    }

    /// 给定上游梯度（结果节点对本节点值的梯度），计算结果节点对第`parent_index`个父节点的梯度。
    /// 同一个节点可能在`parents`中出现多次（如`x * x`），按位置分别计算，由图负责累加。
    fn calc_grad_to_parent(
        &self,
        parent_index: usize,
        parents: &[&NodeHandle],
        upstream_grad: &Tensor,
    ) -> Result<Tensor, GraphError>;

    fn grad(&self) -> Option<&Tensor>;

    fn set_grad(&mut self, grad: Option<&Tensor>) -> Result<(), GraphError>;

    fn clear_grad(&mut self) -> Result<(), GraphError> {
        self.set_grad(None)
    }
}
