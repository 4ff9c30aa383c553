mod add;
mod concat;
mod mat_mul;
mod multiply;
mod scalar_multiply;
mod sum;
mod transpose;

pub(in crate::nn) use add::Add;
pub(in crate::nn) use concat::Concat;
pub(in crate::nn) use mat_mul::MatMul;
pub(in crate::nn) use multiply::Multiply;
pub(in crate::nn) use scalar_multiply::ScalarMultiply;
pub(in crate::nn) use sum::{Sum, SumAxis};
pub(in crate::nn) use transpose::Transpose;
