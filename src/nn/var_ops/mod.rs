/*
 * @Author       : 老董
 * @Date         : 2026-10-14
 * @Description  : Var 扩展 trait 模块
 *
 * 按功能领域组织 Var 的扩展方法，用户按需 import。
 *
 * # 模块结构
 * - `loss`: 损失函数（mse_loss, l2_loss）
 * - `matrix`: 矩阵运算（matmul）
 * - `reduce`: 归约与数乘（sum, row_sum, scale）
 * - `shape`: 形状变换（transpose, concat）
 */

mod loss;
mod matrix;
mod reduce;
mod shape;

pub use loss::VarLossOps;
pub use matrix::VarMatrixOps;
pub use reduce::VarReduceOps;
pub use shape::VarShapeOps;
