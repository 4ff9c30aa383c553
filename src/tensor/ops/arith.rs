/*
 * @Author       : 老董
 * @Date         : 2026-10-12
 * @Description  : 张量的四则运算（含复合赋值）。
 *                 1. 其中一个操作数为纯数而另一个为张量：则返回的张量形状与该张量相同；
 *                 2. 两个操作数均为张量：支持 NumPy 风格的广播（broadcasting），不兼容则panic；
 *                 3. 复合赋值（`+=`等）要求右侧张量能广播到左侧张量的形状。
 */

use crate::errors::{Operator, TensorError};
use crate::tensor::Tensor;
use ndarray::ArrayD;
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

fn binary_within_tensors(
    tensor_1: &Tensor,
    tensor_2: &Tensor,
    operator: Operator,
    op: impl Fn(&ArrayD<f32>, &ArrayD<f32>) -> ArrayD<f32>,
) -> Tensor {
    if Tensor::broadcast_shape(tensor_1.shape(), tensor_2.shape()).is_none() {
        panic!(
            "{}",
            TensorError::OperatorError {
                operator,
                tensor1_shape: tensor_1.shape().to_vec(),
                tensor2_shape: tensor_2.shape().to_vec(),
            }
        );
    }
    Tensor::from_array(op(&tensor_1.data, &tensor_2.data))
}

fn check_assign_shape(target: &Tensor, other: &Tensor, operator: Operator) {
    let broadcast = Tensor::broadcast_shape(target.shape(), other.shape());
    if broadcast.as_deref() != Some(target.shape()) {
        panic!(
            "{}",
            TensorError::OperatorError {
                operator,
                tensor1_shape: target.shape().to_vec(),
                tensor2_shape: other.shape().to_vec(),
            }
        );
    }
}

macro_rules! impl_binary_op {
    ($trait:ident, $method:ident, $operator:expr, $op:tt) => {
        /*↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓（不）带引用的张量 与 （不）带引用的张量↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓*/
        impl $trait for Tensor {
            type Output = Tensor;

            fn $method(self, other: Tensor) -> Tensor {
                binary_within_tensors(&self, &other, $operator, |a, b| a $op b)
            }
        }

        impl<'a> $trait<&'a Tensor> for Tensor {
            type Output = Tensor;

            fn $method(self, other: &'a Tensor) -> Tensor {
                binary_within_tensors(&self, other, $operator, |a, b| a $op b)
            }
        }

        impl $trait<Tensor> for &Tensor {
            type Output = Tensor;

            fn $method(self, other: Tensor) -> Tensor {
                binary_within_tensors(self, &other, $operator, |a, b| a $op b)
            }
        }

        impl<'b> $trait<&'b Tensor> for &Tensor {
            type Output = Tensor;

            fn $method(self, other: &'b Tensor) -> Tensor {
                binary_within_tensors(self, other, $operator, |a, b| a $op b)
            }
        }
        /*↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑（不）带引用的张量 与 （不）带引用的张量↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑*/

        /*↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓张量 与 f32↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓*/
        impl $trait<f32> for Tensor {
            type Output = Tensor;

            fn $method(self, scalar: f32) -> Tensor {
                Tensor::from_array(&self.data $op scalar)
            }
        }

        impl $trait<f32> for &Tensor {
            type Output = Tensor;

            fn $method(self, scalar: f32) -> Tensor {
                Tensor::from_array(&self.data $op scalar)
            }
        }

        impl $trait<Tensor> for f32 {
            type Output = Tensor;

            fn $method(self, tensor: Tensor) -> Tensor {
                Tensor::from_array(self $op &tensor.data)
            }
        }

        impl<'a> $trait<&'a Tensor> for f32 {
            type Output = Tensor;

            fn $method(self, tensor: &'a Tensor) -> Tensor {
                Tensor::from_array(self $op &tensor.data)
            }
        }
        /*↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑张量 与 f32↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑*/
    };
}

impl_binary_op!(Add, add, Operator::Add, +);
impl_binary_op!(Sub, sub, Operator::Sub, -);
impl_binary_op!(Mul, mul, Operator::Mul, *);
impl_binary_op!(Div, div, Operator::Div, /);

macro_rules! impl_assign_op {
    ($trait:ident, $method:ident, $operator:expr, $op:tt) => {
        impl $trait for Tensor {
            fn $method(&mut self, other: Tensor) {
                check_assign_shape(self, &other, $operator);
                self.data $op &other.data;
            }
        }

        impl<'a> $trait<&'a Tensor> for Tensor {
            fn $method(&mut self, other: &'a Tensor) {
                check_assign_shape(self, other, $operator);
                self.data $op &other.data;
            }
        }

        impl $trait<f32> for Tensor {
            fn $method(&mut self, scalar: f32) {
                self.data $op scalar;
            }
        }
    };
}

impl_assign_op!(AddAssign, add_assign, Operator::AddAssign, +=);
impl_assign_op!(SubAssign, sub_assign, Operator::SubAssign, -=);
impl_assign_op!(MulAssign, mul_assign, Operator::MulAssign, *=);
impl_assign_op!(DivAssign, div_assign, Operator::DivAssign, /=);

impl Neg for Tensor {
    type Output = Tensor;

    fn neg(self) -> Tensor {
        Tensor::from_array(-self.data)
    }
}

impl Neg for &Tensor {
    type Output = Tensor;

    fn neg(self) -> Tensor {
        Tensor::from_array(-&self.data)
    }
}

impl PartialEq for Tensor {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
    }
}
