/*
 * @Author       : 老董
 * @Date         : 2026-10-14
 * @Description  : Var 变量句柄（节点 id + 图引用），支持算子重载和链式调用
 */

use super::graph::{Graph, GraphInner};
use super::{GraphError, NodeId};
use crate::tensor::Tensor;
use rand::rngs::StdRng;
use std::cell::RefCell;
use std::ops::{Add, Mul};
use std::rc::Rc;

// ==================== Init 枚举 ====================

/// 参数初始化策略
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Init {
    /// 全零
    Zeros,
    /// 常数初始化
    Constant(f32),
    /// 闭区间[low, high]上的均匀分布
    Uniform { low: f32, high: f32 },
    /// 按扇入数`f`缩放的均匀分布：[-1/√f, 1/√f]
    FanIn(usize),
}

impl Init {
    /// 生成初始化后的 Tensor（使用线程 RNG）
    pub fn generate(&self, shape: &[usize]) -> Tensor {
        self.generate_inner(shape, None)
    }

    /// 生成初始化后的 Tensor（使用指定的 RNG）
    pub fn generate_with_rng(&self, shape: &[usize], rng: &mut StdRng) -> Tensor {
        self.generate_inner(shape, Some(rng))
    }

    fn generate_inner(&self, shape: &[usize], rng: Option<&mut StdRng>) -> Tensor {
        let (low, high) = match *self {
            Self::Zeros => return Tensor::zeros(shape),
            Self::Constant(v) => return Tensor::full(v, shape),
            Self::Uniform { low, high } => (low, high),
            Self::FanIn(fan_in) => {
                let bound = 1.0 / (fan_in.max(1) as f32).sqrt();
                (-bound, bound)
            }
        };
        match rng {
            Some(rng) => Tensor::new_random_with_rng(low, high, shape, rng),
            None => Tensor::new_random(low, high, shape),
        }
    }
}

// ==================== Var 结构 ====================

/// 变量句柄：携带图引用，支持算子重载和链式调用
///
/// Clone 语义（非 Copy），但开销极低（Rc clone）
///
/// # 使用示例
/// ```ignore
/// let graph = Graph::new();
/// let x = graph.input(&[3], Some("x"))?;
/// let w = graph.parameter(&[3, 1], Init::Zeros, "w")?;
/// let b = graph.parameter(&[1, 1], Init::Zeros, "b")?;
/// let y = &x.matmul(&w)? + &b;
/// let loss = y.mse_loss(&target)?;
/// loss.backward()?;
/// ```
#[derive(Clone)]
pub struct Var {
    id: NodeId,
    graph: Rc<RefCell<GraphInner>>,
}

impl std::fmt::Debug for Var {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Var").field("id", &self.id).finish()
    }
}

impl Var {
    pub(crate) const fn new(id: NodeId, graph: Rc<RefCell<GraphInner>>) -> Self {
        Self { id, graph }
    }

    pub const fn node_id(&self) -> NodeId {
        self.id
    }

    /// 获取内部图引用（供 trait 和内部模块使用）
    pub(crate) const fn graph(&self) -> &Rc<RefCell<GraphInner>> {
        &self.graph
    }

    /// 检查两个 Var 是否来自同一个 Graph
    pub fn same_graph(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.graph, &other.graph)
    }

    /// 获取 Var 所属的 Graph handle
    pub fn get_graph(&self) -> Graph {
        Graph::from_rc(Rc::clone(&self.graph))
    }

    /// 节点名
    pub fn name(&self) -> Result<String, GraphError> {
        Ok(self.graph.borrow().get_node_name(self.id)?.to_string())
    }

    /// 两个 Var 须来自同一个 Graph（供 trait 使用）
    pub(crate) fn check_same_graph(&self, other: &Self, op: &str) -> Result<(), GraphError> {
        if self.same_graph(other) {
            Ok(())
        } else {
            Err(GraphError::InvalidOperation(format!(
                "不能对来自不同 Graph 的 Var 进行{op}"
            )))
        }
    }

    // ==================== 执行 ====================

    /// 前向传播
    pub fn forward(&self) -> Result<(), GraphError> {
        self.graph.borrow_mut().forward(self.id)
    }

    /// 反向传播（ensure-forward 语义：先前向计算本节点，再反向传播），返回本节点的标量值
    pub fn backward(&self) -> Result<f32, GraphError> {
        let mut g = self.graph.borrow_mut();
        g.forward(self.id)?;
        g.backward(self.id)
    }

    // ==================== 值访问和设置 ====================

    /// 获取节点的值（克隆的 Tensor）
    pub fn value(&self) -> Result<Option<Tensor>, GraphError> {
        Ok(self.graph.borrow().get_node_value(self.id)?.cloned())
    }

    /// 设置节点的值（仅输入/参数节点）
    pub fn set_value(&self, value: &Tensor) -> Result<(), GraphError> {
        self.graph.borrow_mut().set_node_value(self.id, Some(value))
    }

    /// 获取标量值（须为 [1, 1] Tensor）
    pub fn item(&self) -> Result<f32, GraphError> {
        let val = self.value()?.ok_or_else(|| {
            GraphError::ComputationError(format!("节点{:?}还没有值", self.id))
        })?;
        val.get_data_number()
            .ok_or_else(|| GraphError::InvalidOperation("Tensor 不是标量".to_string()))
    }

    /// 获取节点的梯度（克隆的 Tensor）
    pub fn grad(&self) -> Result<Option<Tensor>, GraphError> {
        Ok(self.graph.borrow().get_node_grad(self.id)?.cloned())
    }

    // ==================== 安全版本（返回 Result）====================

    /// 安全的加法（支持广播）
    pub fn try_add(&self, other: &Self) -> Result<Self, GraphError> {
        self.check_same_graph(other, "加法")?;
        let id = self
            .graph
            .borrow_mut()
            .new_add_node(self.id, other.id, None)?;
        Ok(Self::new(id, Rc::clone(&self.graph)))
    }

    /// 安全的元素级乘法（支持广播）
    pub fn try_mul(&self, other: &Self) -> Result<Self, GraphError> {
        self.check_same_graph(other, "乘法")?;
        let id = self
            .graph
            .borrow_mut()
            .new_multiply_node(self.id, other.id, None)?;
        Ok(Self::new(id, Rc::clone(&self.graph)))
    }
}

// ==================== 算子重载 ====================

impl Add for &Var {
    type Output = Var;

    fn add(self, other: &Var) -> Var {
        self.try_add(other)
            .unwrap_or_else(|e| panic!("Var 加法失败: {e}"))
    }
}

impl Add for Var {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        &self + &other
    }
}

impl Add<Var> for &Var {
    type Output = Var;

    fn add(self, other: Var) -> Var {
        self + &other
    }
}

impl Add<&Self> for Var {
    type Output = Self;

    fn add(self, other: &Self) -> Self {
        &self + other
    }
}

impl Mul for &Var {
    type Output = Var;

    fn mul(self, other: &Var) -> Var {
        self.try_mul(other)
            .unwrap_or_else(|e| panic!("Var 乘法失败: {e}"))
    }
}

impl Mul for Var {
    type Output = Self;

    fn mul(self, other: Self) -> Self {
        &self * &other
    }
}

impl Mul<Var> for &Var {
    type Output = Var;

    fn mul(self, other: Var) -> Var {
        self * &other
    }
}

impl Mul<&Self> for Var {
    type Output = Self;

    fn mul(self, other: &Self) -> Self {
        &self * other
    }
}
