/*
 * @Author       : 老董
 * @Date         : 2026-10-14
 * @Description  : Var 形状变换扩展 trait
 */

use crate::nn::{GraphError, Var};
use std::rc::Rc;

/// 形状变换扩展 trait
///
/// - `transpose()`: 矩阵转置
/// - `concat(others)`: 与其它矩阵按列拼接（`[B, s]`与`[B, a]`拼成`[B, s + a]`）
pub trait VarShapeOps {
    fn transpose(&self) -> Result<Var, GraphError>;

    fn concat(&self, others: &[&Var]) -> Result<Var, GraphError>;
}

impl VarShapeOps for Var {
    fn transpose(&self) -> Result<Var, GraphError> {
        let id = self
            .graph()
            .borrow_mut()
            .new_transpose_node(self.node_id(), None)?;
        Ok(Var::new(id, Rc::clone(self.graph())))
    }

    fn concat(&self, others: &[&Var]) -> Result<Var, GraphError> {
        let mut ids = vec![self.node_id()];
        for other in others {
            self.check_same_graph(other, "拼接")?;
            ids.push(other.node_id());
        }
        let id = self.graph().borrow_mut().new_concat_node(&ids, None)?;
        Ok(Var::new(id, Rc::clone(self.graph())))
    }
}
