/*
 * @Author       : 老董
 * @Date         : 2026-10-14
 * @Description  : Graph 句柄（用户级 API）
 */

use super::error::GraphError;
use super::inner::GraphInner;
use crate::nn::NodeId;
use crate::nn::var::{Init, Var};
use crate::tensor::Tensor;
use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

/// Graph - 计算图句柄
///
/// 是 `Rc<RefCell<GraphInner>>` 的薄封装：多个 Graph 可引用同一个 GraphInner，
/// 创建的 Var 自动持有图引用。
#[derive(Clone)]
pub struct Graph {
    inner: Rc<RefCell<GraphInner>>,
}

impl Graph {
    // ==================== 创建 ====================

    pub fn new() -> Self {
        Self::from_inner(GraphInner::new())
    }

    /// 创建带名称的图
    pub fn with_name(name: &str) -> Self {
        Self::from_inner(GraphInner::with_name(name))
    }

    /// 创建带种子的图（用于确定性的参数初始化）
    pub fn new_with_seed(seed: u64) -> Self {
        Self::from_inner(GraphInner::new_with_seed(seed))
    }

    /// 创建带名称和种子的图
    pub fn with_name_and_seed(name: &str, seed: u64) -> Self {
        Self::from_inner(GraphInner::with_name_and_seed(name, seed))
    }

    pub fn from_inner(inner: GraphInner) -> Self {
        Self {
            inner: Rc::new(RefCell::new(inner)),
        }
    }

    pub(crate) const fn from_rc(inner: Rc<RefCell<GraphInner>>) -> Self {
        Self { inner }
    }

    /// 获取内部 GraphInner 的不可变引用
    pub fn inner(&self) -> std::cell::Ref<'_, GraphInner> {
        self.inner.borrow()
    }

    /// 获取内部 GraphInner 的可变引用
    pub fn inner_mut(&self) -> std::cell::RefMut<'_, GraphInner> {
        self.inner.borrow_mut()
    }

    pub(crate) fn inner_rc(&self) -> Rc<RefCell<GraphInner>> {
        Rc::clone(&self.inner)
    }

    /// 将 NodeId 包装成 Var
    pub fn wrap_node_id(&self, node_id: NodeId) -> Result<Var, GraphError> {
        self.inner.borrow().get_node(node_id)?;
        Ok(Var::new(node_id, Rc::clone(&self.inner)))
    }

    // ==================== 创建变量 ====================

    /// 创建输入节点（占位符）；`feature_shape`为除批维度外的形状，数据稍后通过`set_value`喂入
    pub fn input(&self, feature_shape: &[usize], name: Option<&str>) -> Result<Var, GraphError> {
        let node_id = self
            .inner
            .borrow_mut()
            .new_input_node(feature_shape, false, name)?;
        Ok(Var::new(node_id, Rc::clone(&self.inner)))
    }

    /// 创建需要梯度的输入节点：反向传播后可通过`grad()`读取结果对该输入的梯度
    pub fn input_with_grad(
        &self,
        feature_shape: &[usize],
        name: Option<&str>,
    ) -> Result<Var, GraphError> {
        let node_id = self
            .inner
            .borrow_mut()
            .new_input_node(feature_shape, true, name)?;
        Ok(Var::new(node_id, Rc::clone(&self.inner)))
    }

    /// 创建参数节点，有种子时用图级 RNG 初始化
    pub fn parameter(&self, shape: &[usize], init: Init, name: &str) -> Result<Var, GraphError> {
        let mut g = self.inner.borrow_mut();
        let init_data = match g.rng_mut() {
            Some(rng) => init.generate_with_rng(shape, rng),
            None => init.generate(shape),
        };
        let node_id = g.new_parameter_node(&init_data, Some(name))?;
        Ok(Var::new(node_id, Rc::clone(&self.inner)))
    }

    /// 以给定初值创建参数节点
    pub fn parameter_with_value(&self, value: &Tensor, name: &str) -> Result<Var, GraphError> {
        let node_id = self
            .inner
            .borrow_mut()
            .new_parameter_node(value, Some(name))?;
        Ok(Var::new(node_id, Rc::clone(&self.inner)))
    }

    // ==================== 执行 ====================

    /// 前向传播
    pub fn forward(&self, output: &Var) -> Result<(), GraphError> {
        self.inner.borrow_mut().forward(output.node_id())
    }

    /// 反向传播
    pub fn backward(&self, loss: &Var) -> Result<f32, GraphError> {
        loss.backward()
    }

    // ==================== 训练控制 ====================

    /// 清零所有节点的梯度
    pub fn zero_grad(&self) -> Result<(), GraphError> {
        self.inner.borrow_mut().zero_grad()
    }

    /// 所有参数节点（按创建顺序）
    pub fn parameters(&self) -> Vec<Var> {
        self.inner
            .borrow()
            .get_trainable_nodes()
            .into_iter()
            .map(|id| Var::new(id, Rc::clone(&self.inner)))
            .collect()
    }

    // ==================== 持久化与展示 ====================

    pub fn save_params<P: AsRef<Path>>(&self, path: P) -> Result<(), GraphError> {
        self.inner.borrow().save_params(path)
    }

    pub fn load_params<P: AsRef<Path>>(&self, path: P) -> Result<(), GraphError> {
        self.inner.borrow_mut().load_params(path)
    }

    /// 图中各节点的文本摘要
    pub fn describe(&self) -> String {
        self.inner.borrow().describe()
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}
