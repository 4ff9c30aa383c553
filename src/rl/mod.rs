/*
 * @Author       : 老董
 * @Date         : 2026-10-15
 * @Description  : 强化学习组件：多项式（≤2阶）评论家（critic）及其目标网络
 *
 * - config.rs: CriticConfig / PolyOrder
 * - poly_net.rs: 在线网络与目标网络共用的多项式图构建
 * - critic.rs: PolynomialCritic（train / gradients / target_q / q_value / update_target）
 */

mod config;
mod critic;
mod error;
mod poly_net;

pub use config::{CriticConfig, PolyOrder};
pub use critic::PolynomialCritic;
pub use error::CriticError;
