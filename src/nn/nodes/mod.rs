/*
 * @Author       : 老董
 * @Date         : 2026-10-13
 * @Description  : 计算图节点：`NodeId`、节点句柄`NodeHandle`以及各类原始节点
 */

pub(in crate::nn) mod raw_node;

use std::fmt;

use super::GraphError;
use crate::tensor::Tensor;
use raw_node::{NodeType, TraitNode};

/// 节点在所属图中的唯一标识（从1开始单调递增）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

/// 图中保存的节点：原始节点 + 图为其维护的元信息（id、名称、前向传播批次）
pub(crate) struct NodeHandle {
    id: NodeId,
    name: String,
    raw_node: NodeType,
    last_forward_pass_id: u64,
}

impl NodeHandle {
    pub(in crate::nn) fn new<T: Into<NodeType>>(id: NodeId, name: &str, raw_node: T) -> Self {
        Self {
            id,
            name: name.to_string(),
            raw_node: raw_node.into(),
            last_forward_pass_id: 0,
        }
    }

    pub(in crate::nn) const fn id(&self) -> NodeId {
        self.id
    }

    pub(in crate::nn) fn name(&self) -> &str {
        &self.name
    }

    pub(in crate::nn) const fn node_type(&self) -> &NodeType {
        &self.raw_node
    }

    /// 输入/参数节点的值由外部设置，不由父节点计算
    pub(in crate::nn) const fn is_leaf(&self) -> bool {
        matches!(self.raw_node, NodeType::Input(_) | NodeType::Parameter(_))
    }

    pub(in crate::nn) const fn is_parameter(&self) -> bool {
        matches!(self.raw_node, NodeType::Parameter(_))
    }

    /// 反向传播时是否需要为该节点计算梯度（普通输入节点不需要）
    pub(in crate::nn) const fn requires_grad(&self) -> bool {
        match &self.raw_node {
            NodeType::Input(input) => input.requires_grad(),
            _ => true,
        }
    }

    pub(in crate::nn) fn value(&self) -> Option<&Tensor> {
        self.raw_node.value()
    }

    pub(in crate::nn) fn has_value(&self) -> bool {
        self.raw_node.value().is_some()
    }

    pub(in crate::nn) fn set_value(&mut self, value: Option<&Tensor>) -> Result<(), GraphError> {
        self.raw_node.set_value(value)
    }

    pub(in crate::nn) fn grad(&self) -> Option<&Tensor> {
        self.raw_node.grad()
    }

    pub(in crate::nn) fn set_grad(&mut self, grad: Option<&Tensor>) -> Result<(), GraphError> {
        self.raw_node.set_grad(grad)
    }

    pub(in crate::nn) fn clear_grad(&mut self) -> Result<(), GraphError> {
        self.raw_node.clear_grad()
    }

    pub(in crate::nn) fn calc_value_by_parents(
        &mut self,
        parents: &[&NodeHandle],
    ) -> Result<(), GraphError> {
        self.raw_node.calc_value_by_parents(parents)
    }

    pub(in crate::nn) fn calc_grad_to_parent(
        &self,
        parent_index: usize,
        parents: &[&NodeHandle],
        upstream_grad: &Tensor,
    ) -> Result<Tensor, GraphError> {
        self.raw_node
            .calc_grad_to_parent(parent_index, parents, upstream_grad)
    }

    pub(in crate::nn) const fn last_forward_pass_id(&self) -> u64 {
        self.last_forward_pass_id
    }

    pub(in crate::nn) fn set_last_forward_pass_id(&mut self, pass_id: u64) {
        self.last_forward_pass_id = pass_id;
    }
}

impl fmt::Display for NodeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "节点[id={}, name={}, type={}]",
            self.id.0,
            self.name,
            self.raw_node.type_name()
        )
    }
}

/// 取父节点的值，父节点尚未计算时返回错误（供各原始节点使用）
pub(in crate::nn) fn parent_value<'a>(
    parents: &[&'a NodeHandle],
    index: usize,
    child: &str,
) -> Result<&'a Tensor, GraphError> {
    let parent = parents.get(index).ok_or_else(|| {
        GraphError::ComputationError(format!("{child}节点缺少第{}个父节点", index + 1))
    })?;
    parent
        .value()
        .ok_or_else(|| GraphError::ComputationError(format!("{child}的父{parent}没有值")))
}
