/*
 * @Author       : 老董
 * @Date         : 2026-10-15
 * @Description  : 评论家（critic）的错误类型
 */

use crate::nn::GraphError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CriticError {
    #[error(transparent)]
    Graph(#[from] GraphError),
    #[error("配置无效：{0}")]
    InvalidConfig(String),
    #[error("不支持{0}阶多项式（只支持0、1、2阶）")]
    UnsupportedOrder(u32),
    #[error("维度无效：{0}")]
    InvalidDimension(String),
    #[error("批数据形状不符：{0}")]
    BatchShape(String),
    #[error("文件读写失败：{0}")]
    Io(#[from] std::io::Error),
    #[error("JSON 解析失败：{0}")]
    Json(#[from] serde_json::Error),
}
