/*
 * @Author       : 老董
 * @Date         : 2026-10-12
 * @LastEditors  : 老董
 * @LastEditTime : 2026-10-15
 * @Description  : 张量（Tensor）：计算图中所有节点的值、梯度都以它为载体。
 *                 底层是`ndarray`的动态维度数组，批数据统一用2阶形状`[batch, features]`表示
 */

use ndarray::{Array, ArrayD, IxDyn};
use rand::distributions::{Distribution, Uniform};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::errors::{ComparisonOperator, TensorError};

mod ops {
    pub mod arith;
    pub mod mat_mul;
    pub mod others;
}

mod property;
mod save_load;


/// 定义张量的结构体。其可以是标量、向量、矩阵或更高维度的数组。
/// 注：只要通Tensor初始化的都是张量（即使标量也是张量）；
/// 而通常意义上的数字（类型为usize、i32、f64等）就只是纯数（number），在这里不被认为是张量。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tensor {
    data: ArrayD<f32>,
}

impl Tensor {
    /// 创建一个张量，若为标量，`shape`可以是[]、[1]、[1,1]、[1,1,1]...
    /// 若为向量，`shape`可以是[n]、[1,n]、[n,1]；
    /// 若为矩阵，`shape`可以是[n,m]；
    /// 注：`data`的长度必须和`shape`中所有元素的乘积相等，否则panic。
    pub fn new(data: &[f32], shape: &[usize]) -> Self {
        Self::try_new(data, shape).unwrap_or_else(|e| panic!("{}", e))
    }

    /// `new`的可失败版本，供需要把形状错误向上传递的调用方使用
    pub fn try_new(data: &[f32], shape: &[usize]) -> Result<Self, TensorError> {
        let data = Array::from_shape_vec(IxDyn(shape), data.to_vec()).map_err(|_| {
            TensorError::DataShapeMismatch {
                data_len: data.len(),
                shape: shape.to_vec(),
            }
        })?;
        Ok(Self { data })
    }

    pub fn zeros(shape: &[usize]) -> Self {
        Self {
            data: ArrayD::zeros(IxDyn(shape)),
        }
    }

    pub fn ones(shape: &[usize]) -> Self {
        Self {
            data: ArrayD::ones(IxDyn(shape)),
        }
    }

    /// 创建一个所有元素都为`value`的张量
    pub fn full(value: f32, shape: &[usize]) -> Self {
        Self {
            data: ArrayD::from_elem(IxDyn(shape), value),
        }
    }

    /// 创建一个随机张量，其值在[min, max]的闭区间（使用线程随机数生成器）
    pub fn new_random(min: f32, max: f32, shape: &[usize]) -> Self {
        let mut rng = rand::thread_rng();
        Self::new_random_with_rng(min, max, shape, &mut rng)
    }

    /// 创建一个随机张量，其值在[min, max]的闭区间（使用指定的随机数生成器，便于复现）
    pub fn new_random_with_rng<R: Rng + ?Sized>(
        min: f32,
        max: f32,
        shape: &[usize],
        rng: &mut R,
    ) -> Self {
        let uniform = Uniform::new_inclusive(min, max);
        let data = (0..shape.iter().product::<usize>())
            .map(|_| uniform.sample(rng))
            .collect::<Vec<_>>();
        Self::new(&data, shape)
    }

    /// 创建一个含`n`个对角元素的单位矩阵。
    /// n必须大于等于1，否则会panic。
    pub fn new_eye(n: usize) -> Self {
        assert!(
            n >= 1,
            "{}",
            TensorError::ValueMustSatisfyComparison {
                value_name: "n".to_string(),
                operator: ComparisonOperator::GreaterOrEqual,
                threshold: 1,
            }
        );
        Self {
            data: Array::eye(n).into_dyn(),
        }
    }
}

// 私有方法
impl Tensor {
    pub(in crate::tensor) const fn from_array(data: ArrayD<f32>) -> Self {
        Self { data }
    }

    /// 按 NumPy 规则（右对齐，维度相等或其一为1）推导两个形状广播后的形状
    pub(in crate::tensor) fn broadcast_shape(
        shape1: &[usize],
        shape2: &[usize],
    ) -> Option<Vec<usize>> {
        let ndim = shape1.len().max(shape2.len());
        let pad1 = ndim - shape1.len();
        let pad2 = ndim - shape2.len();
        (0..ndim)
            .map(|i| {
                let d1 = if i < pad1 { 1 } else { shape1[i - pad1] };
                let d2 = if i < pad2 { 1 } else { shape2[i - pad2] };
                match (d1, d2) {
                    (a, b) if a == b => Some(a),
                    (1, b) => Some(b),
                    (a, 1) => Some(a),
                    _ => None,
                }
            })
            .collect()
    }
}
