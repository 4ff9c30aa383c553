/*
 * @Author       : 老董
 * @Date         : 2026-10-15
 * @Description  : 评论家的超参数配置（serde/JSON），缺省字段取默认值
 */

use super::CriticError;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// 多项式的形式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolyOrder {
    /// 0阶或1阶：`Q(x) = x·W + b`，`W`为`[n, 1]`
    Linear,
    /// 2阶：`Q(x) = xᵀ·W_s·x + b`，`W`为`[n, n]`，`W_s = ½(W + Wᵀ)`
    Quadratic,
}

impl PolyOrder {
    pub fn from_order(order: u32) -> Result<Self, CriticError> {
        match order {
            0 | 1 => Ok(Self::Linear),
            2 => Ok(Self::Quadratic),
            _ => Err(CriticError::UnsupportedOrder(order)),
        }
    }

    /// 拼接后输入维度为`n`时权重矩阵的形状
    pub const fn weight_shape(self, n: usize) -> [usize; 2] {
        match self {
            Self::Linear => [n, 1],
            Self::Quadratic => [n, n],
        }
    }
}

/// 评论家的超参数
///
/// | 字段 | 默认值 |
/// |---|---|
/// | `order` | 2 |
/// | `learning_rate` | 1e-3 |
/// | `tau` | 1e-3（目标网络的滑动平均衰减率为`1 - tau`） |
/// | `l2` | 0.01 |
/// | `beta1` / `beta2` / `epsilon` | 0.9 / 0.999 / 1e-8 |
/// | `seed` | 无 |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CriticConfig {
    pub order: u32,
    pub learning_rate: f32,
    pub tau: f32,
    pub l2: f32,
    pub beta1: f32,
    pub beta2: f32,
    pub epsilon: f32,
    /// 参数初始化的随机种子；None 时每次初始化都不同
    pub seed: Option<u64>,
}

impl Default for CriticConfig {
    fn default() -> Self {
        Self {
            order: 2,
            learning_rate: 1e-3,
            tau: 1e-3,
            l2: 0.01,
            beta1: 0.9,
            beta2: 0.999,
            epsilon: 1e-8,
            seed: None,
        }
    }
}

impl CriticConfig {
    pub fn validate(&self) -> Result<(), CriticError> {
        PolyOrder::from_order(self.order)?;
        if !(self.learning_rate > 0.0 && self.learning_rate.is_finite()) {
            return Err(CriticError::InvalidConfig(format!(
                "learning_rate 须为正数，但得到{}",
                self.learning_rate
            )));
        }
        if !(self.tau > 0.0 && self.tau <= 1.0) {
            return Err(CriticError::InvalidConfig(format!(
                "tau 须位于(0, 1]，但得到{}",
                self.tau
            )));
        }
        if !(self.l2 >= 0.0 && self.l2.is_finite()) {
            return Err(CriticError::InvalidConfig(format!(
                "l2 须为非负数，但得到{}",
                self.l2
            )));
        }
        for (name, beta) in [("beta1", self.beta1), ("beta2", self.beta2)] {
            if !(0.0..1.0).contains(&beta) {
                return Err(CriticError::InvalidConfig(format!(
                    "{name} 须位于[0, 1)，但得到{beta}"
                )));
            }
        }
        if !(self.epsilon > 0.0) {
            return Err(CriticError::InvalidConfig(format!(
                "epsilon 须为正数，但得到{}",
                self.epsilon
            )));
        }
        Ok(())
    }

    /// 校验后的多项式形式
    pub fn poly_order(&self) -> Result<PolyOrder, CriticError> {
        PolyOrder::from_order(self.order)
    }

    pub fn from_json_str(json: &str) -> Result<Self, CriticError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_string(&self) -> Result<String, CriticError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, CriticError> {
        let reader = BufReader::new(File::open(path)?);
        let config: Self = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), CriticError> {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }
}
