use crate::errors::{Operator, TensorError};
use crate::tensor::Tensor;
use ndarray::Ix2;

impl Tensor {
    /// 实现矩阵乘法。只接受2阶张量，否则会触发panic。
    /// 需要保证前一个张量的列数（col）等于后一个张量的行数（row），否则也会触发panic。
    pub fn mat_mul(&self, other: &Tensor) -> Tensor {
        let self_data = self
            .data
            .view()
            .into_dimensionality::<Ix2>()
            .unwrap_or_else(|_| panic!("{}", TensorError::NotMatrix(self.shape().to_vec())));
        let other_data = other
            .data
            .view()
            .into_dimensionality::<Ix2>()
            .unwrap_or_else(|_| panic!("{}", TensorError::NotMatrix(other.shape().to_vec())));
        // 前一个张量的列数必须等于后一个张量的行数
        if self_data.ncols() != other_data.nrows() {
            panic!(
                "{}",
                TensorError::OperatorError {
                    operator: Operator::MatMul,
                    tensor1_shape: self.shape().to_vec(),
                    tensor2_shape: other.shape().to_vec(),
                }
            );
        }
        Tensor::from_array(self_data.dot(&other_data).into_dyn())
    }
}
