/*
 * @Author       : 老董
 * @Date         : 2026-10-16
 * @Description  : SGD / Adam 优化器测试
 */

use crate::nn::optimizer::{Adam, Optimizer, SGD};
use crate::nn::{Graph, Init, VarLossOps, VarMatrixOps, VarReduceOps};
use crate::tensor::Tensor;
use approx::assert_abs_diff_eq;

#[test]
fn test_sgd_step() {
    // loss = sum(3w)，梯度恒为3：w ← w - 0.1 * 3
    let graph = Graph::new();
    let w = graph
        .parameter_with_value(&Tensor::new(&[1., 2.], &[1, 2]), "w")
        .unwrap();
    let loss = w.scale(3.0).unwrap().sum().unwrap();

    let mut sgd = SGD::new(&graph, &[w.clone()], 0.1);
    let value = sgd.minimize(&loss).unwrap();
    assert_abs_diff_eq!(value, 9.0, epsilon = 1e-6);
    assert_abs_diff_eq!(
        w.value().unwrap().unwrap(),
        Tensor::new(&[0.7, 1.7], &[1, 2]),
        epsilon = 1e-6
    );
}

#[test]
fn test_adam_update() {
    // 初始值 w=2，loss = 3w，梯度为3
    // Adam (beta1=0.9, beta2=0.999, eps=1e-8, lr=0.1):
    //   m_1 = 0.3，v_1 = 0.009
    //   m_hat = 3.0，v_hat = 9.0
    //   update = 0.1 * 3.0 / (3.0 + 1e-8) ≈ 0.1
    //   w_new ≈ 1.9
    let graph = Graph::new();
    let x = graph.input(&[1], Some("x")).unwrap();
    let w = graph
        .parameter_with_value(&Tensor::new(&[2.], &[1, 1]), "w")
        .unwrap();
    let loss = x.matmul(&w).unwrap().sum().unwrap();
    x.set_value(&Tensor::new(&[3.], &[1, 1])).unwrap();

    let mut adam = Adam::new(&graph, &[w.clone()], 0.1);
    adam.minimize(&loss).unwrap();

    assert_eq!(adam.timestep(), 1);
    assert_abs_diff_eq!(w.item().unwrap(), 1.9, epsilon = 1e-6);
    assert_abs_diff_eq!(
        adam.get_momentum(&w).unwrap().get_data_number().unwrap(),
        0.3,
        epsilon = 1e-6
    );
    assert_abs_diff_eq!(
        adam.get_velocity(&w).unwrap().get_data_number().unwrap(),
        0.009,
        epsilon = 1e-6
    );

    adam.reset();
    assert_eq!(adam.timestep(), 0);
    assert!(adam.get_momentum(&w).is_none());
}

#[test]
fn test_optimizer_only_updates_bound_params() {
    let graph = Graph::new();
    let a = graph.parameter(&[1, 1], Init::Constant(1.0), "a").unwrap();
    let b = graph.parameter(&[1, 1], Init::Constant(1.0), "b").unwrap();
    let loss = (&a + &b).sum().unwrap();

    let mut sgd = SGD::new(&graph, &[a.clone()], 0.5);
    sgd.minimize(&loss).unwrap();
    assert_abs_diff_eq!(a.item().unwrap(), 0.5, epsilon = 1e-6);
    assert_abs_diff_eq!(b.item().unwrap(), 1.0, epsilon = 1e-6);
}

#[test]
fn test_learning_rate_modification() {
    let graph = Graph::new();
    let w = graph.parameter(&[2, 2], Init::Zeros, "w").unwrap();
    let mut adam = Adam::new(&graph, &[w], 0.001);
    assert_abs_diff_eq!(adam.learning_rate(), 0.001);
    adam.set_learning_rate(0.0001);
    assert_abs_diff_eq!(adam.learning_rate(), 0.0001);
}

#[test]
fn test_adam_fits_linear_regression() {
    // y = 2x + 1
    let graph = Graph::new_with_seed(3);
    let x = graph.input(&[1], Some("x")).unwrap();
    let y = graph.input(&[1], Some("y")).unwrap();
    let w = graph.parameter(&[1, 1], Init::FanIn(1), "w").unwrap();
    let b = graph.parameter(&[1, 1], Init::Zeros, "b").unwrap();
    let loss = (&x.matmul(&w).unwrap() + &b).mse_loss(&y).unwrap();

    let xs = [-1.0f32, -0.5, 0.0, 0.5, 1.0];
    let ys = xs.iter().map(|v| 2.0 * v + 1.0).collect::<Vec<_>>();
    x.set_value(&Tensor::new(&xs, &[5, 1])).unwrap();
    y.set_value(&Tensor::new(&ys, &[5, 1])).unwrap();

    let mut adam = Adam::new(&graph, &graph.parameters(), 0.05);
    let first = adam.minimize(&loss).unwrap();
    let mut last = first;
    for _ in 0..500 {
        last = adam.minimize(&loss).unwrap();
    }
    assert!(last < first);
    assert_abs_diff_eq!(w.item().unwrap(), 2.0, epsilon = 0.1);
    assert_abs_diff_eq!(b.item().unwrap(), 1.0, epsilon = 0.1);
}
