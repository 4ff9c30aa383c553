/*
 * @Author       : 老董
 * @Date         : 2026-10-14
 * @Description  : Var 归约与数乘扩展 trait
 */

use crate::nn::{GraphError, Var};
use std::rc::Rc;

/// 归约与数乘扩展 trait
///
/// - `sum()`: 全部元素求和，输出[1, 1]
/// - `row_sum()`: 逐行求和，`[B, k]`输出`[B, 1]`
/// - `scale(k)`: 乘以固定纯数`k`
pub trait VarReduceOps {
    fn sum(&self) -> Result<Var, GraphError>;

    fn row_sum(&self) -> Result<Var, GraphError>;

    fn scale(&self, factor: f32) -> Result<Var, GraphError>;
}

impl VarReduceOps for Var {
    fn sum(&self) -> Result<Var, GraphError> {
        let id = self
            .graph()
            .borrow_mut()
            .new_sum_node(self.node_id(), None, None)?;
        Ok(Var::new(id, Rc::clone(self.graph())))
    }

    fn row_sum(&self) -> Result<Var, GraphError> {
        let id = self
            .graph()
            .borrow_mut()
            .new_sum_node(self.node_id(), Some(1), None)?;
        Ok(Var::new(id, Rc::clone(self.graph())))
    }

    fn scale(&self, factor: f32) -> Result<Var, GraphError> {
        let id = self
            .graph()
            .borrow_mut()
            .new_scalar_multiply_node(self.node_id(), factor, None)?;
        Ok(Var::new(id, Rc::clone(self.graph())))
    }
}
