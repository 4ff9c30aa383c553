/*
 * @Author       : 老董
 * @Date         : 2026-10-14
 * @Description  : GraphInner describe 文本摘要
 */

use super::GraphInner;
use crate::nn::nodes::raw_node::{NodeType, SumAxis};
use std::fmt::Write;

impl GraphInner {
    /// 以文本形式列出图中所有节点（按 id 升序）：名称、类型、父节点、当前值的形状
    pub fn describe(&self) -> String {
        let mut node_ids = self.nodes.keys().copied().collect::<Vec<_>>();
        node_ids.sort_unstable();

        let mut out = String::new();
        let _ = writeln!(out, "图 {}（{} 个节点）", self.name, node_ids.len());
        for node_id in node_ids {
            let Some(node) = self.nodes.get(&node_id) else {
                continue;
            };
            let parents = self
                .backward_edges
                .get(&node_id)
                .map(|ids| {
                    ids.iter()
                        .filter_map(|id| self.nodes.get(id).map(|p| p.name().to_string()))
                        .collect::<Vec<_>>()
                        .join(", ")
                })
                .unwrap_or_default();
            let detail = match node.node_type() {
                NodeType::Input(input) => format!(
                    "特征形状{:?}{}",
                    input.feature_shape(),
                    if input.requires_grad() { "，需要梯度" } else { "" }
                ),
                NodeType::Parameter(param) => format!("形状{:?}", param.shape()),
                NodeType::ScalarMultiply(node) => format!("系数{}", node.factor()),
                NodeType::Sum(node) => match node.axis() {
                    SumAxis::All => "全部求和".to_string(),
                    SumAxis::Axis(axis) => format!("沿轴{axis}求和"),
                },
                _ => String::new(),
            };
            let value_shape = node
                .value()
                .map_or_else(|| "未计算".to_string(), |v| format!("{:?}", v.shape()));
            let _ = writeln!(
                out,
                "  [{}] {:<12} {:<16} 父节点: [{}] 值: {} {}",
                node_id.0,
                node.node_type().type_name(),
                node.name(),
                parents,
                value_shape,
                detail
            );
        }
        out
    }
}
