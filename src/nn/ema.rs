/*
 * @Author       : 老董
 * @Date         : 2026-10-15
 * @Description  : 参数的指数滑动平均（EMA），用于维护目标网络
 *
 * shadow ← shadow - (1 - decay) * (shadow - value)，等价于 decay * shadow + (1 - decay) * value
 */

use crate::nn::{GraphError, Var};
use crate::tensor::Tensor;

/// 指数滑动平均跟踪器
///
/// # 使用示例
/// ```ignore
/// let mut ema = ExponentialMovingAverage::new(0.999)?;
/// ema.track(&graph.parameters())?;
/// // 每次优化后
/// ema.update()?;
/// let w_avg = ema.average(&w).unwrap();
/// ```
pub struct ExponentialMovingAverage {
    decay: f32,
    /// 被跟踪的变量及其影子值（按注册顺序）
    shadows: Vec<(Var, Tensor)>,
}

impl ExponentialMovingAverage {
    /// `decay`须位于[0, 1]
    pub fn new(decay: f32) -> Result<Self, GraphError> {
        if !(0.0..=1.0).contains(&decay) {
            return Err(GraphError::InvalidOperation(format!(
                "滑动平均的衰减率须位于[0, 1]，但得到{decay}"
            )));
        }
        Ok(Self {
            decay,
            shadows: Vec::new(),
        })
    }

    pub const fn decay(&self) -> f32 {
        self.decay
    }

    /// 注册需跟踪的变量，影子值初始化为变量当前的值；已注册过的变量会被跳过
    pub fn track(&mut self, vars: &[Var]) -> Result<(), GraphError> {
        for var in vars {
            if self.position(var).is_some() {
                continue;
            }
            let value = Self::current_value(var)?;
            self.shadows.push((var.clone(), value));
        }
        Ok(())
    }

    /// 用所有被跟踪变量的当前值更新影子值
    pub fn update(&mut self) -> Result<(), GraphError> {
        let rate = 1.0 - self.decay;
        for (var, shadow) in &mut self.shadows {
            let value = Self::current_value(var)?;
            let delta = (&*shadow - &value) * rate;
            *shadow -= delta;
        }
        Ok(())
    }

    /// 把所有影子值重置为变量当前的值
    pub fn reset(&mut self) -> Result<(), GraphError> {
        for (var, shadow) in &mut self.shadows {
            *shadow = Self::current_value(var)?;
        }
        Ok(())
    }

    /// 直接指定某个被跟踪变量的影子值（如从文件恢复），形状须与变量一致
    pub fn set_average(&mut self, var: &Var, value: &Tensor) -> Result<(), GraphError> {
        let index = self.position(var).ok_or_else(|| {
            GraphError::InvalidOperation(format!("变量{:?}未被滑动平均跟踪", var.node_id()))
        })?;
        let shadow = &mut self.shadows[index].1;
        if shadow.shape() != value.shape() {
            return Err(GraphError::ShapeMismatch {
                expected: shadow.shape().to_vec(),
                got: value.shape().to_vec(),
                message: "影子值的形状须与被跟踪变量一致".to_string(),
            });
        }
        *shadow = value.clone();
        Ok(())
    }

    /// 变量的影子值；未被跟踪时返回 None
    pub fn average(&self, var: &Var) -> Option<&Tensor> {
        self.position(var).map(|i| &self.shadows[i].1)
    }

    /// 被跟踪的变量（按注册顺序）
    pub fn tracked(&self) -> impl Iterator<Item = &Var> {
        self.shadows.iter().map(|(var, _)| var)
    }

    fn position(&self, var: &Var) -> Option<usize> {
        self.shadows
            .iter()
            .position(|(tracked, _)| tracked.same_graph(var) && tracked.node_id() == var.node_id())
    }

    fn current_value(var: &Var) -> Result<Tensor, GraphError> {
        var.value()?.ok_or_else(|| {
            GraphError::ComputationError(format!("被滑动平均跟踪的变量{:?}没有值", var.node_id()))
        })
    }
}
