/*
 * @Author       : 老董
 * @Date         : 2026-10-14
 * @Description  : GraphInner VJP 反向传播
 */

use super::super::error::GraphError;
use super::GraphInner;
use crate::nn::NodeId;
use crate::tensor::Tensor;
use std::collections::HashSet;

impl GraphInner {
    // ========== VJP 反向传播核心 ==========

    /// 从标量结果节点反向传播，返回该节点的值
    ///
    /// 参数节点的梯度在多次 backward 间累加（直到 zero_grad），其余节点的梯度每次重新计算。
    pub fn backward(&mut self, root: NodeId) -> Result<f32, GraphError> {
        let root_node = self.get_node(root)?;
        let root_value = root_node.value().ok_or_else(|| {
            GraphError::ComputationError(format!("结果{root_node}没有值，请先执行 forward"))
        })?;

        if root_value.size() != 1 {
            return Err(GraphError::InvalidOperation(format!(
                "反向传播要求结果节点为标量 [1, 1]，但得到 {:?}",
                root_value.shape()
            )));
        }
        let root_scalar = root_value.get_data_number().ok_or_else(|| {
            GraphError::ComputationError(format!(
                "无法从结果节点获取标量值，形状: {:?}",
                root_value.shape()
            ))
        })?;

        self.reset_intermediate_grad();

        let seed_grad = Tensor::ones(&[1, 1]);
        self.get_node_mut(root)?.set_grad(Some(&seed_grad))?;

        for node_id in self.topological_sort_backward(root)? {
            self.propagate_grad_to_parents(node_id)?;
        }

        self.last_backward_pass_id += 1;
        Ok(root_scalar)
    }

    /// 将梯度从当前节点传播到其父节点
    fn propagate_grad_to_parents(&mut self, node_id: NodeId) -> Result<(), GraphError> {
        let parent_ids = self.get_node_parents(node_id)?;
        if parent_ids.is_empty() {
            return Ok(());
        }

        let parent_grads: Vec<(NodeId, Tensor)> = {
            let node = self.get_node(node_id)?;
            let Some(upstream_grad) = node.grad() else {
                return Ok(());
            };
            let parents = self.get_nodes(&parent_ids)?;

            let mut grads = Vec::with_capacity(parent_ids.len());
            for (index, parent) in parents.iter().enumerate() {
                if !parent.requires_grad() {
                    continue;
                }
                let parent_grad = node.calc_grad_to_parent(index, &parents, upstream_grad)?;
                grads.push((parent.id(), parent_grad));
            }
            grads
        };

        for (parent_id, parent_grad) in parent_grads {
            let parent_node = self.get_node_mut(parent_id)?;
            if let Some(existing_grad) = parent_node.grad() {
                let new_grad = existing_grad + &parent_grad;
                parent_node.set_grad(Some(&new_grad))?;
            } else {
                parent_node.set_grad(Some(&parent_grad))?;
            }
        }

        Ok(())
    }

    /// 反向拓扑排序：结果节点在前，每个节点都排在它的所有（可达）子节点之后
    fn topological_sort_backward(&self, root: NodeId) -> Result<Vec<NodeId>, GraphError> {
        fn dfs(
            graph: &GraphInner,
            node_id: NodeId,
            visited: &mut HashSet<NodeId>,
            post_order: &mut Vec<NodeId>,
        ) -> Result<(), GraphError> {
            if !visited.insert(node_id) {
                return Ok(());
            }
            for parent_id in graph.get_node_parents(node_id)? {
                dfs(graph, parent_id, visited, post_order)?;
            }
            // 后序：父节点先于子节点入列
            post_order.push(node_id);
            Ok(())
        }

        let mut post_order = Vec::new();
        dfs(self, root, &mut HashSet::new(), &mut post_order)?;
        post_order.reverse();
        Ok(post_order)
    }

    /// 重置非参数节点的 grad
    fn reset_intermediate_grad(&mut self) {
        for node in self.nodes.values_mut() {
            if !node.is_parameter() {
                let _ = node.clear_grad();
            }
        }
    }

    /// 清除所有节点的梯度
    pub fn clear_grad(&mut self) -> Result<(), GraphError> {
        for node in self.nodes.values_mut() {
            node.clear_grad()?;
        }
        Ok(())
    }

    /// 清除单个节点的梯度
    pub fn clear_node_grad(&mut self, node_id: NodeId) -> Result<(), GraphError> {
        self.get_node_mut(node_id)?.clear_grad()
    }

    /// 清零梯度（PyTorch 风格）
    pub fn zero_grad(&mut self) -> Result<(), GraphError> {
        self.clear_grad()
    }
}
