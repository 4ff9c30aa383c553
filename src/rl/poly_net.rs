/*
 * @Author       : 老董
 * @Date         : 2026-10-15
 * @Description  : 在线网络与目标网络共用的多项式计算图
 *
 * 线性：  Q = concat(s, a) @ W + b
 * 二次：  W_s = 0.5 * (W + Wᵀ)，Q = row_sum((x @ W_s) ⊙ x) + b，即逐样本的 xᵀ·W_s·x + b
 */

use super::PolyOrder;
use crate::nn::{Graph, GraphError, Var, VarMatrixOps, VarReduceOps, VarShapeOps};
use crate::tensor::Tensor;

/// 一套多项式评论家的图节点
pub(crate) struct PolyNet {
    pub(crate) graph: Graph,
    pub(crate) state: Var,
    pub(crate) action: Var,
    /// 可训练的原始权重`W`
    pub(crate) weights: Var,
    pub(crate) bias: Var,
    /// 实际参与计算的权重：线性时即`W`，二次时为对称化后的`W_s`
    pub(crate) effective_weights: Var,
    /// `[B, 1]`
    pub(crate) q: Var,
}

impl PolyNet {
    /// 在`graph`中搭建多项式；`weights`、`bias`须是该图中已创建的参数
    pub(crate) fn build(
        graph: &Graph,
        state_dim: usize,
        action_dim: usize,
        order: PolyOrder,
        weights: Var,
        bias: Var,
        action_requires_grad: bool,
    ) -> Result<Self, GraphError> {
        let state = graph.input(&[state_dim], Some("state"))?;
        let action = if action_requires_grad {
            graph.input_with_grad(&[action_dim], Some("action"))?
        } else {
            graph.input(&[action_dim], Some("action"))?
        };
        let x = state.concat(&[&action])?;

        let (effective_weights, poly) = match order {
            PolyOrder::Linear => (weights.clone(), x.matmul(&weights)?),
            PolyOrder::Quadratic => {
                let sym = weights.try_add(&weights.transpose()?)?.scale(0.5)?;
                let quad = x.matmul(&sym)?.try_mul(&x)?.row_sum()?;
                (sym, quad)
            }
        };
        let q = poly.try_add(&bias)?;

        Ok(Self {
            graph: graph.clone(),
            state,
            action,
            weights,
            bias,
            effective_weights,
            q,
        })
    }

    /// 喂入一批状态与动作并前向计算，返回`[B, 1]`的 Q 值
    pub(crate) fn evaluate(
        &self,
        state_batch: &Tensor,
        action_batch: &Tensor,
    ) -> Result<Tensor, GraphError> {
        self.feed(state_batch, action_batch)?;
        self.q.forward()?;
        self.q
            .value()?
            .ok_or_else(|| GraphError::ComputationError("Q 值节点前向传播后仍没有值".to_string()))
    }

    pub(crate) fn feed(
        &self,
        state_batch: &Tensor,
        action_batch: &Tensor,
    ) -> Result<(), GraphError> {
        self.state.set_value(state_batch)?;
        self.action.set_value(action_batch)
    }
}
