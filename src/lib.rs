//! # Poly Critic
//!
//! `poly_critic`用纯rust实现强化学习（如DDPG）中的多项式评论家（critic）：
//! 以不超过2阶的多项式拟合状态-动作价值`Q(s, a)`，并维护一个以指数滑动平均缓慢跟踪的目标网络。
//! 所有矩阵运算、梯度计算与参数更新都经由一个小巧的反向模式（VJP）计算图完成。
//!

pub mod errors;
pub mod nn;
pub mod rl;
pub mod tensor;
