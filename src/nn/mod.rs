/*
 * @Author       : 老董
 * @Date         : 2026-10-14
 * @Description  : 负责计算图（computation graph）的构建、前向/反向传播与参数优化
 */

mod ema;
mod graph;
mod nodes;
pub mod optimizer;
mod var;
mod var_ops;

pub use ema::ExponentialMovingAverage;
pub use graph::{Graph, GraphError, GraphInner};
pub use nodes::NodeId;
pub use optimizer::{Adam, Optimizer, SGD};
pub use var::{Init, Var};
pub use var_ops::{VarLossOps, VarMatrixOps, VarReduceOps, VarShapeOps};

#[cfg(test)]
mod tests;
