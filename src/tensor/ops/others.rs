use crate::errors::{Operator, TensorError};
use crate::tensor::Tensor;
use ndarray::{Axis, IxDyn, Slice};

impl Tensor {
    /// 对张量中的所有元素求和并返回一个形状为[1, 1]的标量（和计算图中标量节点的形状一致）
    pub fn sum(&self) -> Tensor {
        Tensor::new(&[self.data.sum()], &[1, 1])
    }

    /// 沿`axis`轴求和，并保留该轴（长度变为1），如`[B, n]`沿轴1求和得到`[B, 1]`
    pub fn sum_axis_keepdims(&self, axis: usize) -> Tensor {
        Tensor::from_array(self.data.sum_axis(Axis(axis)).insert_axis(Axis(axis)))
    }

    /// 把（由广播得到的）张量逐轴求和，还原成广播前的`shape`。
    /// 常用于反向传播：被广播的操作数，其梯度需要在被广播的轴上累加。
    pub fn sum_to_shape(&self, shape: &[usize]) -> Tensor {
        let mut data = self.data.clone();
        // 先把多出来的前导轴求和掉
        while data.ndim() > shape.len() {
            data = data.sum_axis(Axis(0));
        }
        for (axis, &dim) in shape.iter().enumerate() {
            if dim == 1 && data.shape()[axis] != 1 {
                data = data.sum_axis(Axis(axis)).insert_axis(Axis(axis));
            }
        }
        assert_eq!(
            data.shape(),
            shape,
            "{}",
            TensorError::OperatorError {
                operator: Operator::Add,
                tensor1_shape: self.shape().to_vec(),
                tensor2_shape: shape.to_vec(),
            }
        );
        Tensor::from_array(data)
    }

    /// 按 NumPy 规则把张量广播到`shape`，不兼容则panic
    pub fn broadcast_to(&self, shape: &[usize]) -> Tensor {
        let view = self.data.broadcast(IxDyn(shape)).unwrap_or_else(|| {
            panic!(
                "{}",
                TensorError::OperatorError {
                    operator: Operator::Add,
                    tensor1_shape: self.shape().to_vec(),
                    tensor2_shape: shape.to_vec(),
                }
            )
        });
        Tensor::from_array(view.to_owned())
    }

    /// 张量的转置（不影响原张量）。对2阶张量即为矩阵转置；1阶及以下原样返回。
    pub fn transpose(&self) -> Tensor {
        if self.dimension() <= 1 {
            self.clone()
        } else {
            Tensor::from_array(self.data.t().as_standard_layout().into_owned())
        }
    }

    /// 逐元素开方
    pub fn sqrt(&self) -> Tensor {
        Tensor::from_array(self.data.mapv(f32::sqrt))
    }

    /// 逐元素平方
    pub fn square(&self) -> Tensor {
        Tensor::from_array(self.data.mapv(|x| x * x))
    }

    /// 把若干个2阶张量按列（轴1）拼接。各张量行数必须一致，否则panic。
    pub fn concat_cols(tensors: &[&Tensor]) -> Tensor {
        assert!(!tensors.is_empty(), "{}", TensorError::EmptyList);
        let rows = tensors[0].shape().first().copied().unwrap_or(0);
        for t in tensors {
            if t.dimension() != 2 || t.shape()[0] != rows {
                panic!(
                    "{}",
                    TensorError::OperatorError {
                        operator: Operator::Concat,
                        tensor1_shape: tensors[0].shape().to_vec(),
                        tensor2_shape: t.shape().to_vec(),
                    }
                );
            }
        }
        let views = tensors.iter().map(|t| t.data.view()).collect::<Vec<_>>();
        let data = ndarray::concatenate(Axis(1), &views).unwrap_or_else(|e| panic!("{}", e));
        Tensor::from_array(data)
    }

    /// 取2阶张量的第[start, end)列，返回新张量
    pub fn slice_cols(&self, start: usize, end: usize) -> Tensor {
        if self.dimension() != 2 {
            panic!("{}", TensorError::NotMatrix(self.shape().to_vec()));
        }
        let cols = self.shape()[1];
        if start > end || end > cols {
            panic!(
                "{}",
                TensorError::ColumnRangeOutOfBounds { start, end, cols }
            );
        }
        Tensor::from_array(
            self.data
                .slice_axis(Axis(1), Slice::from(start..end))
                .to_owned(),
        )
    }
}
