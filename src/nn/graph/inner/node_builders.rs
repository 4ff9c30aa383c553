/*
 * @Author       : 老董
 * @Date         : 2026-10-14
 * @Description  : GraphInner 节点构建方法（new_*_node）
 */

use super::super::error::GraphError;
use super::GraphInner;
use crate::nn::NodeId;
use crate::nn::nodes::NodeHandle;
use crate::nn::nodes::raw_node::{
    Add, Concat, Input, L2Loss, MSELoss, MatMul, Multiply, NodeType, Parameter, ScalarMultiply,
    Sum, SumAxis, Transpose,
};
use crate::tensor::Tensor;
use rand::rngs::StdRng;

impl GraphInner {
    /// 添加节点到列表
    pub(in crate::nn::graph) fn add_node_to_list<T: Into<NodeType>>(
        &mut self,
        raw_node: T,
        name: Option<&str>,
        parents: &[NodeId],
    ) -> Result<NodeId, GraphError> {
        for &parent_id in parents {
            self.get_node(parent_id)?;
        }

        let raw_node = raw_node.into();
        let node_name = self.generate_valid_new_node_name(name.unwrap_or(""), raw_node.type_name())?;
        let node_id = self.generate_valid_node_id();

        self.backward_edges
            .entry(node_id)
            .or_default()
            .extend(parents);

        self.nodes
            .insert(node_id, NodeHandle::new(node_id, &node_name, raw_node));
        Ok(node_id)
    }

    /// 图级随机数生成器（没有设置种子时为 None）
    pub(in crate::nn) fn rng_mut(&mut self) -> Option<&mut StdRng> {
        self.rng.as_mut()
    }

    /// 创建输入节点，`feature_shape`为除批维度外的形状
    pub fn new_input_node(
        &mut self,
        feature_shape: &[usize],
        requires_grad: bool,
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        if feature_shape.is_empty() || feature_shape.contains(&0) {
            return Err(GraphError::InvalidOperation(format!(
                "输入节点的特征形状须非空且各维大于0，但得到{feature_shape:?}"
            )));
        }
        self.add_node_to_list(Input::new(feature_shape, requires_grad), name, &[])
    }

    /// 创建参数节点并赋初值
    pub fn new_parameter_node(
        &mut self,
        value: &Tensor,
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        if value.dimension() == 0 || value.shape().contains(&0) {
            return Err(GraphError::InvalidOperation(format!(
                "参数节点的形状须非空且各维大于0，但得到{:?}",
                value.shape()
            )));
        }
        let node_id = self.add_node_to_list(Parameter::new(value.shape()), name, &[])?;
        self.set_node_value(node_id, Some(value))?;
        Ok(node_id)
    }

    pub fn new_add_node(
        &mut self,
        a: NodeId,
        b: NodeId,
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        self.add_node_to_list(Add::new(), name, &[a, b])
    }

    pub fn new_mat_mul_node(
        &mut self,
        a: NodeId,
        b: NodeId,
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        self.add_node_to_list(MatMul::new(), name, &[a, b])
    }

    pub fn new_multiply_node(
        &mut self,
        a: NodeId,
        b: NodeId,
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        self.add_node_to_list(Multiply::new(), name, &[a, b])
    }

    pub fn new_scalar_multiply_node(
        &mut self,
        x: NodeId,
        factor: f32,
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        self.add_node_to_list(ScalarMultiply::new(factor), name, &[x])
    }

    pub fn new_transpose_node(
        &mut self,
        x: NodeId,
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        self.add_node_to_list(Transpose::new(), name, &[x])
    }

    /// 按列拼接，至少需要一个父节点
    pub fn new_concat_node(
        &mut self,
        parents: &[NodeId],
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        if parents.is_empty() {
            return Err(GraphError::InvalidOperation(
                "Concat 至少需要1个父节点".to_string(),
            ));
        }
        self.add_node_to_list(Concat::new(), name, parents)
    }

    /// 求和：`axis`为 None 时对全部元素求和，否则沿该轴求和并保留该轴
    pub fn new_sum_node(
        &mut self,
        x: NodeId,
        axis: Option<usize>,
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        let axis = axis.map_or(SumAxis::All, SumAxis::Axis);
        self.add_node_to_list(Sum::new(axis), name, &[x])
    }

    pub fn new_mse_loss_node(
        &mut self,
        input: NodeId,
        target: NodeId,
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        self.add_node_to_list(MSELoss::new(), name, &[input, target])
    }

    pub fn new_l2_loss_node(
        &mut self,
        x: NodeId,
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        self.add_node_to_list(L2Loss::new(), name, &[x])
    }
}
