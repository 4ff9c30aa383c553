/*
 * @Author       : 老董
 * @Date         : 2026-10-16
 * @Description  : MSELoss / L2Loss 节点测试
 */

use crate::nn::{Graph, GraphError, VarLossOps};
use crate::tensor::Tensor;
use approx::assert_abs_diff_eq;

/// PyTorch 验证:
/// ```python
/// input = torch.tensor([[1.0, 2.0, 3.0]], requires_grad=True)
/// target = torch.tensor([[1.5, 2.5, 3.5]])
/// loss = nn.MSELoss(reduction='mean')(input, target)
/// # loss = 0.25
/// # grad = [-0.333..., -0.333..., -0.333...]
/// ```
#[test]
fn test_mse_loss_mean() {
    let graph = Graph::new();
    let input = graph
        .parameter_with_value(&Tensor::new(&[1., 2., 3.], &[1, 3]), "input")
        .unwrap();
    let target = graph.input(&[3], Some("target")).unwrap();
    let loss = input.mse_loss(&target).unwrap();

    target
        .set_value(&Tensor::new(&[1.5, 2.5, 3.5], &[1, 3]))
        .unwrap();
    let value = loss.backward().unwrap();
    assert_abs_diff_eq!(value, 0.25, epsilon = 1e-6);
    assert_abs_diff_eq!(
        input.grad().unwrap().unwrap(),
        Tensor::full(-1.0 / 3.0, &[1, 3]),
        epsilon = 1e-6
    );
}

#[test]
fn test_mse_loss_target_grad_is_negated() {
    let graph = Graph::new();
    let input = graph
        .parameter_with_value(&Tensor::new(&[1., 3.], &[2, 1]), "input")
        .unwrap();
    let target = graph
        .parameter_with_value(&Tensor::new(&[0., 0.], &[2, 1]), "target")
        .unwrap();
    let loss = input.mse_loss(&target).unwrap();

    assert_abs_diff_eq!(loss.backward().unwrap(), 5.0, epsilon = 1e-6);
    assert_abs_diff_eq!(
        input.grad().unwrap().unwrap(),
        Tensor::new(&[1., 3.], &[2, 1]),
        epsilon = 1e-6
    );
    assert_abs_diff_eq!(
        target.grad().unwrap().unwrap(),
        Tensor::new(&[-1., -3.], &[2, 1]),
        epsilon = 1e-6
    );
}

#[test]
fn test_mse_loss_shape_mismatch() {
    let graph = Graph::new();
    let input = graph.input(&[3], Some("input")).unwrap();
    let target = graph.input(&[4], Some("target")).unwrap();
    let loss = input.mse_loss(&target).unwrap();
    input.set_value(&Tensor::ones(&[1, 3])).unwrap();
    target.set_value(&Tensor::ones(&[1, 4])).unwrap();
    assert!(matches!(loss.forward(), Err(GraphError::ShapeMismatch { .. })));
}

#[test]
fn test_l2_loss() {
    let graph = Graph::new();
    let w = graph
        .parameter_with_value(&Tensor::new(&[1., -2., 3., 0.], &[2, 2]), "w")
        .unwrap();
    let loss = w.l2_loss().unwrap();
    assert_abs_diff_eq!(loss.backward().unwrap(), 7.0, epsilon = 1e-6);
    assert_abs_diff_eq!(
        w.grad().unwrap().unwrap(),
        Tensor::new(&[1., -2., 3., 0.], &[2, 2]),
        epsilon = 1e-6
    );
}
