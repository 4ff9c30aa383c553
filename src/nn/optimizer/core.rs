/*
 * @Author       : 老董
 * @Date         : 2026-10-14
 * @Description  : Optimizer API - PyTorch 风格
 *
 * 核心特性：
 * - Optimizer 持有 Rc<RefCell<GraphInner>> 引用
 * - params 存储 Vec<Var>，只更新绑定的参数
 * - minimize(&loss) 一步完成训练：zero_grad → backward → step
 */

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::nn::graph::GraphInner;
use crate::nn::{Graph, GraphError, NodeId, Var};
use crate::tensor::Tensor;

/// Optimizer trait（PyTorch 风格）
///
/// # 使用示例
/// ```ignore
/// let mut optimizer = SGD::new(&graph, &graph.parameters(), 0.01);
///
/// optimizer.zero_grad()?;
/// loss.backward()?;
/// optimizer.step()?;
///
/// // 或者一步完成
/// let loss_val = optimizer.minimize(&loss)?;
/// ```
pub trait Optimizer {
    /// 清零所有绑定参数的梯度
    fn zero_grad(&mut self) -> Result<(), GraphError>;

    /// 更新参数（只更新 Optimizer 绑定的参数，无梯度的参数跳过）
    fn step(&mut self) -> Result<(), GraphError>;

    /// 一步完成训练：`zero_grad()` → `loss.backward()`（ensure-forward）→ `step()`，返回 loss 的标量值
    ///
    /// `zero_grad()`必须在前，因为 backward 会累加参数梯度
    fn minimize(&mut self, loss: &Var) -> Result<f32, GraphError> {
        self.zero_grad()?;
        let loss_val = loss.backward()?;
        self.step()?;
        Ok(loss_val)
    }

    fn learning_rate(&self) -> f32;

    fn set_learning_rate(&mut self, lr: f32);

    /// 重置累积状态（如 Adam 的动量）
    fn reset(&mut self);
}

fn clear_param_grads(graph: &RefCell<GraphInner>, params: &[Var]) -> Result<(), GraphError> {
    let mut g = graph.borrow_mut();
    for param in params {
        g.clear_node_grad(param.node_id())?;
    }
    Ok(())
}

/// 取出参数节点当前的值与梯度（无梯度时返回 None）
fn value_and_grad(
    g: &GraphInner,
    node_id: NodeId,
) -> Result<Option<(Tensor, Tensor)>, GraphError> {
    let Some(grad) = g.get_node_grad(node_id)?.cloned() else {
        return Ok(None);
    };
    let current = g
        .get_node_value(node_id)?
        .ok_or_else(|| GraphError::ComputationError(format!("参数节点 {node_id:?} 没有值")))?
        .clone();
    Ok(Some((current, grad)))
}

/// SGD 优化器
///
/// 随机梯度下降：θ = θ - α * ∇θ
pub struct SGD {
    graph: Rc<RefCell<GraphInner>>,
    params: Vec<Var>,
    lr: f32,
}

impl SGD {
    pub fn new(graph: &Graph, params: &[Var], lr: f32) -> Self {
        Self {
            graph: graph.inner_rc(),
            params: params.to_vec(),
            lr,
        }
    }

    pub fn params(&self) -> &[Var] {
        &self.params
    }
}

impl Optimizer for SGD {
    fn zero_grad(&mut self) -> Result<(), GraphError> {
        clear_param_grads(&self.graph, &self.params)
    }

    fn step(&mut self) -> Result<(), GraphError> {
        let mut g = self.graph.borrow_mut();
        for param in &self.params {
            let node_id = param.node_id();
            if let Some((current, grad)) = value_and_grad(&g, node_id)? {
                let new_value = current - self.lr * &grad;
                g.set_node_value(node_id, Some(&new_value))?;
            }
        }
        Ok(())
    }

    fn learning_rate(&self) -> f32 {
        self.lr
    }

    fn set_learning_rate(&mut self, lr: f32) {
        self.lr = lr;
    }

    fn reset(&mut self) {
        // SGD 无状态
    }
}

/// Adam 优化器
///
/// Adam: Adaptive Moment Estimation
/// - m = β1 * m + (1 - β1) * g
/// - v = β2 * v + (1 - β2) * g²
/// - θ = θ - α * `m_hat` / (√`v_hat` + ε)
pub struct Adam {
    graph: Rc<RefCell<GraphInner>>,
    params: Vec<Var>,
    lr: f32,
    /// β1 (一阶矩衰减)
    beta1: f32,
    /// β2 (二阶矩衰减)
    beta2: f32,
    /// 数值稳定项
    epsilon: f32,
    /// 一阶矩估计
    m: HashMap<NodeId, Tensor>,
    /// 二阶矩估计
    v: HashMap<NodeId, Tensor>,
    /// 时间步
    t: usize,
}

impl Adam {
    /// 使用默认的 β1 = 0.9、β2 = 0.999、ε = 1e-8
    pub fn new(graph: &Graph, params: &[Var], lr: f32) -> Self {
        Self::new_with_config(graph, params, lr, 0.9, 0.999, 1e-8)
    }

    pub fn new_with_config(
        graph: &Graph,
        params: &[Var],
        lr: f32,
        beta1: f32,
        beta2: f32,
        epsilon: f32,
    ) -> Self {
        Self {
            graph: graph.inner_rc(),
            params: params.to_vec(),
            lr,
            beta1,
            beta2,
            epsilon,
            m: HashMap::new(),
            v: HashMap::new(),
            t: 0,
        }
    }

    pub fn params(&self) -> &[Var] {
        &self.params
    }

    /// 获取指定参数的一阶矩 m
    pub fn get_momentum(&self, param: &Var) -> Option<&Tensor> {
        self.m.get(&param.node_id())
    }

    /// 获取指定参数的二阶矩 v
    pub fn get_velocity(&self, param: &Var) -> Option<&Tensor> {
        self.v.get(&param.node_id())
    }

    /// 获取当前时间步
    pub const fn timestep(&self) -> usize {
        self.t
    }
}

impl Optimizer for Adam {
    fn zero_grad(&mut self) -> Result<(), GraphError> {
        clear_param_grads(&self.graph, &self.params)
    }

    fn step(&mut self) -> Result<(), GraphError> {
        self.t += 1;
        let mut g = self.graph.borrow_mut();

        for param in &self.params {
            let node_id = param.node_id();
            let Some((current, grad)) = value_and_grad(&g, node_id)? else {
                continue;
            };

            // 更新一阶矩
            let m = self
                .m
                .entry(node_id)
                .or_insert_with(|| Tensor::zeros(grad.shape()));
            *m *= self.beta1;
            *m += &grad * (1.0 - self.beta1);

            // 更新二阶矩
            let v = self
                .v
                .entry(node_id)
                .or_insert_with(|| Tensor::zeros(grad.shape()));
            *v *= self.beta2;
            *v += grad.square() * (1.0 - self.beta2);

            // 偏差修正
            let m_hat = &*m / (1.0 - self.beta1.powi(self.t as i32));
            let v_hat = &*v / (1.0 - self.beta2.powi(self.t as i32));

            let update = &m_hat / &(v_hat.sqrt() + self.epsilon);
            let new_value = current - self.lr * &update;
            g.set_node_value(node_id, Some(&new_value))?;
        }
        Ok(())
    }

    fn learning_rate(&self) -> f32 {
        self.lr
    }

    fn set_learning_rate(&mut self, lr: f32) {
        self.lr = lr;
    }

    fn reset(&mut self) {
        self.m.clear();
        self.v.clear();
        self.t = 0;
    }
}
