/*
 * @Author       : 老董
 * @Date         : 2026-10-12
 * @Description  : 张量层面的错误类型。张量运算符遇到非法形状时以这些错误的文本panic，
 *                 计算图层会在调用运算符之前先做校验并返回`GraphError`
 */

use thiserror::Error;
mod ops;
pub use self::ops::*;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TensorError {
    // 数字比较用
    #[error("{value_name}须{operator}{threshold}")]
    ValueMustSatisfyComparison {
        value_name: String,
        operator: ComparisonOperator,
        threshold: usize,
    },
    // 张量二元运算
    #[error(
        "形状不一致，故无法{operator}：第一个张量的形状为{tensor1_shape:?}，第二个张量的形状为{tensor2_shape:?}"
    )]
    OperatorError {
        operator: Operator,
        tensor1_shape: Vec<usize>,
        tensor2_shape: Vec<usize>,
    },
    #[error("数据长度{data_len}与形状{shape:?}不匹配")]
    DataShapeMismatch { data_len: usize, shape: Vec<usize> },
    #[error("该运算只接受2阶张量，但得到的形状为{0:?}")]
    NotMatrix(Vec<usize>),
    #[error("张量列表为空")]
    EmptyList,
    #[error("列切片[{start}, {end})越界，张量列数为{cols}")]
    ColumnRangeOutOfBounds { start: usize, end: usize, cols: usize },
    #[error("张量（反）序列化失败：{0}")]
    Serialization(String),
}
