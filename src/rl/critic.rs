/*
 * @Author       : 老董
 * @Date         : 2026-10-15
 * @Description  : 多项式评论家（critic）：在线网络 + 以滑动平均跟踪的目标网络
 *
 * 训练损失：mean((y - Q)²) + l2 * (L2Loss(W_eff) + L2Loss(b))，其中 W_eff 为实际参与计算的权重
 * （二次时为对称化后的 W_s）
 */

use super::poly_net::PolyNet;
use super::{CriticConfig, CriticError, PolyOrder};
use crate::nn::{
    Adam, ExponentialMovingAverage, Graph, GraphError, Init, Optimizer, Var, VarLossOps,
    VarReduceOps,
};
use crate::tensor::Tensor;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::Path;

const META_FILE: &str = "critic.json";
const ONLINE_PARAMS_FILE: &str = "online.params";
const TARGET_PARAMS_FILE: &str = "target.params";

/// `critic.json`的内容
#[derive(Serialize, Deserialize)]
struct CriticMeta {
    state_dim: usize,
    action_dim: usize,
    config: CriticConfig,
    #[serde(default)]
    train_steps: u64,
}

/// 多项式（≤2阶）评论家
///
/// 状态与动作拼接为`x = [s, a]`（长度`n = state_dim + action_dim`）后：
/// - 0/1阶：`Q(x) = x·W + b`
/// - 2阶：`Q(x) = xᵀ·W_s·x + b`，`W_s = ½(W + Wᵀ)`
///
/// # 使用示例
/// ```ignore
/// let mut critic = PolynomialCritic::new(3, 1, CriticConfig::default())?;
/// let loss = critic.train(&y_batch, &state_batch, &action_batch)?;
/// critic.update_target()?;
/// let dq_da = critic.gradients(&state_batch, &action_batch)?;
/// ```
pub struct PolynomialCritic {
    state_dim: usize,
    action_dim: usize,
    config: CriticConfig,
    order: PolyOrder,
    online: PolyNet,
    target: PolyNet,
    /// 训练目标 y 的输入节点，`[B, 1]`
    y_input: Var,
    loss: Var,
    /// `Σ_i Q_i`，对它反向传播即得每个样本的 ∂Q/∂a
    q_sum: Var,
    optimizer: Adam,
    ema: ExponentialMovingAverage,
    train_steps: u64,
}

impl PolynomialCritic {
    pub fn new(
        state_dim: usize,
        action_dim: usize,
        config: CriticConfig,
    ) -> Result<Self, CriticError> {
        config.validate()?;
        let order = config.poly_order()?;
        if state_dim == 0 || action_dim == 0 {
            return Err(CriticError::InvalidDimension(format!(
                "state_dim 与 action_dim 均须不小于1，但得到 state_dim={state_dim}、action_dim={action_dim}"
            )));
        }
        let n = state_dim + action_dim;

        // 在线网络
        let online_graph = match config.seed {
            Some(seed) => Graph::with_name_and_seed("online_critic", seed),
            None => Graph::with_name("online_critic"),
        };
        let init = Init::FanIn(state_dim);
        let weights = online_graph.parameter(&order.weight_shape(n), init, "W")?;
        let bias = online_graph.parameter(&[1, 1], init, "b")?;
        let online = PolyNet::build(
            &online_graph,
            state_dim,
            action_dim,
            order,
            weights.clone(),
            bias.clone(),
            true,
        )?;

        let y_input = online_graph.input(&[1], Some("y"))?;
        let mse = online.q.mse_loss(&y_input)?;
        let weight_decay = online
            .effective_weights
            .l2_loss()?
            .try_add(&bias.l2_loss()?)?
            .scale(config.l2)?;
        let loss = mse.try_add(&weight_decay)?;
        let q_sum = online.q.sum()?;

        let optimizer = Adam::new_with_config(
            &online_graph,
            &[weights.clone(), bias.clone()],
            config.learning_rate,
            config.beta1,
            config.beta2,
            config.epsilon,
        );

        // 目标网络：相同拓扑，参数初值取在线网络的参数
        let target_graph = Graph::with_name("target_critic");
        let target_weights =
            target_graph.parameter_with_value(&Self::value_of(&weights)?, "W")?;
        let target_bias = target_graph.parameter_with_value(&Self::value_of(&bias)?, "b")?;
        let target = PolyNet::build(
            &target_graph,
            state_dim,
            action_dim,
            order,
            target_weights,
            target_bias,
            false,
        )?;

        let mut ema = ExponentialMovingAverage::new(1.0 - config.tau)?;
        ema.track(&[weights, bias])?;

        let mut critic = Self {
            state_dim,
            action_dim,
            config,
            order,
            online,
            target,
            y_input,
            loss,
            q_sum,
            optimizer,
            ema,
            train_steps: 0,
        };
        critic.update_target()?;
        Ok(critic)
    }

    // ==================== 四个核心操作 ====================

    /// 用一批`(y, s, a)`对在线网络做一步 Adam 更新，返回本步（更新前）的损失值。不影响目标网络
    pub fn train(
        &mut self,
        y_batch: &Tensor,
        state_batch: &Tensor,
        action_batch: &Tensor,
    ) -> Result<f32, CriticError> {
        let batch = self.check_batches(state_batch, action_batch)?;
        check_batch("y_batch", y_batch, 1, Some(batch))?;

        self.online.feed(state_batch, action_batch)?;
        self.y_input.set_value(y_batch)?;
        let loss = self.optimizer.minimize(&self.loss)?;
        if !loss.is_finite() {
            eprintln!(
                "[poly_critic 警告] 第{}步训练的损失为{}，参数可能已发散",
                self.train_steps + 1,
                loss
            );
        }
        self.train_steps += 1;
        Ok(loss)
    }

    /// 每个样本的 ∂Q/∂a，形状`[B, action_dim]`
    pub fn gradients(
        &mut self,
        state_batch: &Tensor,
        action_batch: &Tensor,
    ) -> Result<Tensor, CriticError> {
        self.check_batches(state_batch, action_batch)?;
        self.online.feed(state_batch, action_batch)?;
        self.q_sum.backward()?;
        let grad = self.online.action.grad()?;
        // 顺带算出的参数梯度不应留给下一次训练
        self.online.graph.zero_grad()?;
        grad.ok_or_else(|| {
            CriticError::Graph(GraphError::ComputationError(
                "反向传播后动作输入仍没有梯度".to_string(),
            ))
        })
    }

    /// 经目标网络计算的 Q 值，形状`[B, 1]`
    pub fn target_q(
        &self,
        state_batch: &Tensor,
        action_batch: &Tensor,
    ) -> Result<Tensor, CriticError> {
        self.check_batches(state_batch, action_batch)?;
        Ok(self.target.evaluate(state_batch, action_batch)?)
    }

    /// 经在线网络计算的 Q 值，形状`[B, 1]`
    pub fn q_value(
        &self,
        state_batch: &Tensor,
        action_batch: &Tensor,
    ) -> Result<Tensor, CriticError> {
        self.check_batches(state_batch, action_batch)?;
        Ok(self.online.evaluate(state_batch, action_batch)?)
    }

    /// 目标网络向在线网络靠近一步：θ' ← (1 - τ)·θ' + τ·θ
    pub fn update_target(&mut self) -> Result<(), CriticError> {
        self.ema.update()?;
        self.copy_averages_to_target()
    }

    // ==================== 其它操作 ====================

    /// 目标网络直接复制在线网络的参数
    pub fn sync_target(&mut self) -> Result<(), CriticError> {
        self.ema.reset()?;
        self.copy_averages_to_target()
    }

    pub fn weights(&self) -> Result<Tensor, CriticError> {
        Self::value_of(&self.online.weights)
    }

    pub fn bias(&self) -> Result<Tensor, CriticError> {
        Self::value_of(&self.online.bias)
    }

    pub fn target_weights(&self) -> Result<Tensor, CriticError> {
        Self::value_of(&self.target.weights)
    }

    pub fn target_bias(&self) -> Result<Tensor, CriticError> {
        Self::value_of(&self.target.bias)
    }

    /// 手动设置在线网络的参数（不影响目标网络与优化器状态）
    pub fn set_parameters(&mut self, weights: &Tensor, bias: &Tensor) -> Result<(), CriticError> {
        self.online.weights.set_value(weights)?;
        self.online.bias.set_value(bias)?;
        Ok(())
    }

    pub const fn state_dim(&self) -> usize {
        self.state_dim
    }

    pub const fn action_dim(&self) -> usize {
        self.action_dim
    }

    pub const fn order(&self) -> PolyOrder {
        self.order
    }

    pub const fn config(&self) -> &CriticConfig {
        &self.config
    }

    /// 已执行的训练步数
    pub const fn train_steps(&self) -> u64 {
        self.train_steps
    }

    /// 在线网络计算图的文本摘要
    pub fn describe(&self) -> String {
        self.online.graph.describe()
    }

    // ==================== 持久化 ====================

    /// 保存到目录`dir`：`critic.json`（维度与配置）、`online.params`、`target.params`。
    /// Adam 的动量不保存
    pub fn save<P: AsRef<Path>>(&self, dir: P) -> Result<(), CriticError> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;

        let meta = CriticMeta {
            state_dim: self.state_dim,
            action_dim: self.action_dim,
            config: self.config.clone(),
            train_steps: self.train_steps,
        };
        let writer = BufWriter::new(File::create(dir.join(META_FILE))?);
        serde_json::to_writer_pretty(writer, &meta)?;

        self.online.graph.save_params(dir.join(ONLINE_PARAMS_FILE))?;
        self.target.graph.save_params(dir.join(TARGET_PARAMS_FILE))?;
        Ok(())
    }

    /// 从`save`写出的目录恢复
    pub fn load<P: AsRef<Path>>(dir: P) -> Result<Self, CriticError> {
        let dir = dir.as_ref();
        let reader = BufReader::new(File::open(dir.join(META_FILE))?);
        let meta: CriticMeta = serde_json::from_reader(reader)?;

        let mut critic = Self::new(meta.state_dim, meta.action_dim, meta.config)?;
        critic.online.graph.load_params(dir.join(ONLINE_PARAMS_FILE))?;
        critic.target.graph.load_params(dir.join(TARGET_PARAMS_FILE))?;

        // 滑动平均的影子值即目标网络的参数
        let pairs = [
            (&critic.online.weights, &critic.target.weights),
            (&critic.online.bias, &critic.target.bias),
        ];
        for (online, target) in pairs {
            critic.ema.set_average(online, &Self::value_of(target)?)?;
        }
        critic.train_steps = meta.train_steps;
        Ok(critic)
    }

    // ==================== 内部辅助 ====================

    fn copy_averages_to_target(&self) -> Result<(), CriticError> {
        let pairs = [
            (&self.online.weights, &self.target.weights),
            (&self.online.bias, &self.target.bias),
        ];
        for (online, target) in pairs {
            let average = self.ema.average(online).ok_or_else(|| {
                CriticError::Graph(GraphError::InvalidOperation(format!(
                    "在线参数{:?}未被滑动平均跟踪",
                    online.node_id()
                )))
            })?;
            target.set_value(average)?;
        }
        Ok(())
    }

    /// 校验状态与动作批数据，返回批大小
    fn check_batches(
        &self,
        state_batch: &Tensor,
        action_batch: &Tensor,
    ) -> Result<usize, CriticError> {
        let batch = check_batch("state_batch", state_batch, self.state_dim, None)?;
        check_batch("action_batch", action_batch, self.action_dim, Some(batch))?;
        Ok(batch)
    }

    fn value_of(var: &Var) -> Result<Tensor, CriticError> {
        var.value()?.ok_or_else(|| {
            CriticError::Graph(GraphError::ComputationError(format!(
                "参数{:?}没有值",
                var.node_id()
            )))
        })
    }
}

/// 批数据须为`[B, width]`且`B > 0`；给定`rows`时`B`须与之相同。返回`B`
fn check_batch(
    name: &str,
    tensor: &Tensor,
    width: usize,
    rows: Option<usize>,
) -> Result<usize, CriticError> {
    let shape = tensor.shape();
    if shape.len() != 2 || shape[0] == 0 || shape[1] != width {
        return Err(CriticError::BatchShape(format!(
            "{name}须为[B, {width}]（B > 0）的矩阵，但形状为{shape:?}"
        )));
    }
    if let Some(rows) = rows {
        if shape[0] != rows {
            return Err(CriticError::BatchShape(format!(
                "{name}的批大小{}与状态批数据的批大小{rows}不一致",
                shape[0]
            )));
        }
    }
    Ok(shape[0])
}

impl fmt::Display for PolynomialCritic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let order = match self.order {
            PolyOrder::Linear => "线性",
            PolyOrder::Quadratic => "二次",
        };
        write!(
            f,
            "PolynomialCritic[{}, state_dim={}, action_dim={}, τ={}, l2={}, 已训练{}步]",
            order,
            self.state_dim,
            self.action_dim,
            self.config.tau,
            self.config.l2,
            self.train_steps
        )
    }
}
