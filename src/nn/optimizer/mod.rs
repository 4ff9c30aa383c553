/*
 * @Author       : 老董
 * @Date         : 2026-10-14
 * @Description  : 优化器模块，实现 PyTorch 风格的梯度优化算法
 */

mod core;

pub use core::{Adam, Optimizer, SGD};
