/*
 * @Author       : 老董
 * @Date         : 2026-10-16
 * @Description  : Graph 前向传播测试
 */

use crate::nn::{Graph, GraphError, Init, VarMatrixOps, VarReduceOps};
use crate::tensor::Tensor;
use approx::assert_abs_diff_eq;

#[test]
fn test_forward_linear() {
    let graph = Graph::new();
    let x = graph.input(&[2], Some("x")).unwrap();
    let w = graph
        .parameter_with_value(&Tensor::new(&[1., 2.], &[2, 1]), "w")
        .unwrap();
    let b = graph
        .parameter_with_value(&Tensor::new(&[0.5], &[1, 1]), "b")
        .unwrap();
    let y = &x.matmul(&w).unwrap() + &b;

    x.set_value(&Tensor::new(&[1., 1., 2., 3.], &[2, 2])).unwrap();
    y.forward().unwrap();
    assert_abs_diff_eq!(
        y.value().unwrap().unwrap(),
        Tensor::new(&[3.5, 8.5], &[2, 1]),
        epsilon = 1e-6
    );
}

#[test]
fn test_forward_batch_size_can_change() {
    let graph = Graph::new();
    let x = graph.input(&[3], Some("x")).unwrap();
    let s = x.row_sum().unwrap();

    x.set_value(&Tensor::ones(&[2, 3])).unwrap();
    s.forward().unwrap();
    assert_eq!(s.value().unwrap().unwrap().shape(), &[2, 1]);

    x.set_value(&Tensor::ones(&[5, 3])).unwrap();
    s.forward().unwrap();
    assert_eq!(s.value().unwrap().unwrap().shape(), &[5, 1]);
}

#[test]
fn test_input_shape_validation() {
    let graph = Graph::new();
    let x = graph.input(&[3], Some("x")).unwrap();
    assert!(matches!(
        x.set_value(&Tensor::ones(&[2, 4])),
        Err(GraphError::ShapeMismatch { .. })
    ));
    assert!(x.set_value(&Tensor::ones(&[0, 3])).is_err());
    assert!(x.set_value(&Tensor::ones(&[3])).is_err());
}

#[test]
fn test_forward_without_input_value() {
    let graph = Graph::new();
    let x = graph.input(&[2], Some("x")).unwrap();
    let s = x.sum().unwrap();
    assert!(s.forward().is_err());
    // 叶子节点没有值时也不能前向
    assert!(x.forward().is_err());
}

#[test]
fn test_forward_reports_shape_mismatch() {
    let graph = Graph::new();
    let x = graph.input(&[2], Some("x")).unwrap();
    let w = graph.parameter(&[3, 1], Init::Zeros, "w").unwrap();
    let y = x.matmul(&w).unwrap();
    x.set_value(&Tensor::ones(&[1, 2])).unwrap();
    assert!(matches!(y.forward(), Err(GraphError::ShapeMismatch { .. })));
}

#[test]
fn test_forward_pass_id_and_recompute() {
    let graph = Graph::new();
    let x = graph.input(&[1], Some("x")).unwrap();
    let y = x.scale(2.0).unwrap();

    x.set_value(&Tensor::new(&[1.], &[1, 1])).unwrap();
    graph.forward(&y).unwrap();
    assert_eq!(graph.inner().last_forward_pass_id(), 1);
    assert_abs_diff_eq!(y.item().unwrap(), 2.0);

    // 新数据在下一次前向时生效
    x.set_value(&Tensor::new(&[4.], &[1, 1])).unwrap();
    graph.forward(&y).unwrap();
    assert_eq!(graph.inner().last_forward_pass_id(), 2);
    assert_abs_diff_eq!(y.item().unwrap(), 8.0);
}
