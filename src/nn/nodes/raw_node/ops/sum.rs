use crate::nn::GraphError;
use crate::nn::nodes::raw_node::TraitNode;
use crate::nn::nodes::{NodeHandle, parent_value};
use crate::tensor::Tensor;

/// 求和的方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(in crate::nn) enum SumAxis {
    /// 全部元素求和，结果形状为`[1, 1]`
    All,
    /// 沿给定轴求和并保留该轴（长度变为1），如`Axis(1)`把`[batch, k]`变为`[batch, 1]`
    Axis(usize),
}

/// 求和节点；梯度为上游梯度沿被求和的轴广播回父节点形状
#[derive(Clone)]
pub(in crate::nn) struct Sum {
    axis: SumAxis,
    value: Option<Tensor>,
    grad: Option<Tensor>,
}

impl Sum {
    pub(in crate::nn) const fn new(axis: SumAxis) -> Self {
        Self {
            axis,
            value: None,
            grad: None,
        }
    }

    pub(in crate::nn) const fn axis(&self) -> SumAxis {
        self.axis
    }
}

impl TraitNode for Sum {
    fn calc_value_by_parents(&mut self, parents: &[&NodeHandle]) -> Result<(), GraphError> {
        let x = parent_value(parents, 0, "Sum")?;
        let value = match self.axis {
            SumAxis::All => x.sum(),
            SumAxis::Axis(axis) => {
                if axis >= x.dimension() {
                    return Err(GraphError::InvalidOperation(format!(
                        "Sum 的求和轴{}超出了父{}的维数{}",
                        axis,
                        parents[0],
                        x.dimension()
                    )));
                }
                x.sum_axis_keepdims(axis)
            }
        };
        self.value = Some(value);
        Ok(())
    }

    fn value(&self) -> Option<&Tensor> {
        self.value.as_ref()
    }

    fn calc_grad_to_parent(
        &self,
        _parent_index: usize,
        parents: &[&NodeHandle],
        upstream_grad: &Tensor,
    ) -> Result<Tensor, GraphError> {
        let x = parent_value(parents, 0, "Sum")?;
        Ok(upstream_grad.broadcast_to(x.shape()))
    }

    fn grad(&self) -> Option<&Tensor> {
        self.grad.as_ref()
    }

    fn set_grad(&mut self, grad: Option<&Tensor>) -> Result<(), GraphError> {
        self.grad = grad.cloned();
        Ok(())
    }
}
