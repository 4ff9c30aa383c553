/*
 * @Author       : 老董
 * @Date         : 2026-10-14
 * @Description  : Var 损失函数扩展 trait
 */

use crate::nn::{GraphError, Var};
use std::rc::Rc;

/// 损失函数扩展 trait
///
/// - `mse_loss(target)`: 均方误差（mean 归约）
/// - `l2_loss()`: `sum(x²) / 2`，常用作权重衰减项
///
/// # 使用示例
/// ```ignore
/// use poly_critic::nn::VarLossOps;
///
/// let loss = output.mse_loss(&target)?;
/// ```
pub trait VarLossOps {
    /// MSE Loss，标量损失值节点
    fn mse_loss(&self, target: &Var) -> Result<Var, GraphError>;

    /// L2 Loss，标量损失值节点
    fn l2_loss(&self) -> Result<Var, GraphError>;
}

impl VarLossOps for Var {
    fn mse_loss(&self, target: &Var) -> Result<Var, GraphError> {
        self.check_same_graph(target, "MSE 损失计算")?;
        let id = self
            .graph()
            .borrow_mut()
            .new_mse_loss_node(self.node_id(), target.node_id(), None)?;
        Ok(Var::new(id, Rc::clone(self.graph())))
    }

    fn l2_loss(&self) -> Result<Var, GraphError> {
        let id = self
            .graph()
            .borrow_mut()
            .new_l2_loss_node(self.node_id(), None)?;
        Ok(Var::new(id, Rc::clone(self.graph())))
    }
}
