/*
 * @Author       : 老董
 * @Date         : 2026-10-16
 * @Description  : Graph 参数保存/加载测试
 */

use crate::nn::{Graph, GraphError, Init};
use crate::tensor::Tensor;
use approx::assert_abs_diff_eq;
use std::fs;

#[test]
fn test_save_load_params_basic() {
    let temp_file = std::env::temp_dir().join("poly_critic_test_save_load_params_basic.params");

    let graph = Graph::new();
    let w_data = (0..6).map(|i| i as f32 * 0.1).collect::<Vec<_>>();
    graph
        .parameter_with_value(&Tensor::new(&w_data, &[2, 3]), "w")
        .unwrap();
    graph
        .parameter_with_value(&Tensor::new(&[1.5], &[1, 1]), "b")
        .unwrap();
    graph.save_params(&temp_file).expect("保存参数失败");

    // 新图中节点创建顺序不同也能按名称匹配
    let graph2 = Graph::new();
    let b2 = graph2.parameter(&[1, 1], Init::Zeros, "b").unwrap();
    let w2 = graph2.parameter(&[2, 3], Init::Zeros, "w").unwrap();
    graph2.load_params(&temp_file).expect("加载参数失败");

    assert_abs_diff_eq!(
        w2.value().unwrap().unwrap(),
        Tensor::new(&w_data, &[2, 3]),
        epsilon = 1e-6
    );
    assert_abs_diff_eq!(b2.item().unwrap(), 1.5, epsilon = 1e-6);

    fs::remove_file(&temp_file).ok();
}

#[test]
fn test_load_params_shape_mismatch() {
    let temp_file = std::env::temp_dir().join("poly_critic_test_load_params_shape_mismatch.params");

    let graph = Graph::new();
    graph.parameter(&[2, 2], Init::Zeros, "w").unwrap();
    graph.save_params(&temp_file).unwrap();

    let graph2 = Graph::new();
    graph2.parameter(&[3, 1], Init::Zeros, "w").unwrap();
    assert!(matches!(
        graph2.load_params(&temp_file),
        Err(GraphError::ShapeMismatch { .. })
    ));

    fs::remove_file(&temp_file).ok();
}

#[test]
fn test_load_params_ignores_unknown_names() {
    let temp_file = std::env::temp_dir().join("poly_critic_test_load_params_unknown_names.params");

    let graph = Graph::new();
    graph.parameter(&[1, 1], Init::Constant(2.0), "w").unwrap();
    graph.parameter(&[1, 1], Init::Constant(3.0), "extra").unwrap();
    graph.save_params(&temp_file).unwrap();

    let graph2 = Graph::new();
    let w = graph2.parameter(&[1, 1], Init::Zeros, "w").unwrap();
    graph2.load_params(&temp_file).unwrap();
    assert_abs_diff_eq!(w.item().unwrap(), 2.0, epsilon = 1e-6);

    fs::remove_file(&temp_file).ok();
}

#[test]
fn test_load_params_invalid_file() {
    let temp_file = std::env::temp_dir().join("poly_critic_test_load_params_invalid_file.params");
    fs::write(&temp_file, b"not a params file").unwrap();

    let graph = Graph::new();
    graph.parameter(&[1, 1], Init::Zeros, "w").unwrap();
    assert!(matches!(
        graph.load_params(&temp_file),
        Err(GraphError::InvalidFormat(_))
    ));
    assert!(matches!(
        graph.load_params(std::env::temp_dir().join("poly_critic_no_such_file.params")),
        Err(GraphError::Io(_))
    ));

    fs::remove_file(&temp_file).ok();
}

#[test]
fn test_load_params_missing_name() {
    let temp_file = std::env::temp_dir().join("poly_critic_test_load_params_missing_name.params");

    let graph = Graph::new();
    graph.parameter(&[1, 1], Init::Constant(2.0), "b").unwrap();
    graph.save_params(&temp_file).unwrap();

    // 图中的 w 在文件里没有，加载须失败且不改动任何参数
    let graph2 = Graph::new();
    let w = graph2.parameter(&[2, 2], Init::Constant(1.0), "w").unwrap();
    let b = graph2.parameter(&[1, 1], Init::Zeros, "b").unwrap();
    let result = graph2.load_params(&temp_file);
    assert!(matches!(result, Err(GraphError::InvalidFormat(ref msg)) if msg.ends_with(": w")));
    assert_abs_diff_eq!(w.value().unwrap().unwrap(), Tensor::ones(&[2, 2]), epsilon = 1e-6);
    assert_abs_diff_eq!(b.item().unwrap(), 0.0, epsilon = 1e-6);

    fs::remove_file(&temp_file).ok();
}

#[test]
fn test_load_params_failure_leaves_graph_unchanged() {
    let temp_file =
        std::env::temp_dir().join("poly_critic_test_load_params_failure_unchanged.params");

    // 文件中 w 的形状正确、b 的形状错误（w 排在 b 前面）
    let graph = Graph::new();
    graph.parameter(&[1, 2], Init::Constant(5.0), "w").unwrap();
    graph.parameter(&[2, 1], Init::Constant(5.0), "b").unwrap();
    graph.save_params(&temp_file).unwrap();

    let graph2 = Graph::new();
    let w = graph2.parameter(&[1, 2], Init::Zeros, "w").unwrap();
    let b = graph2.parameter(&[1, 1], Init::Zeros, "b").unwrap();
    assert!(matches!(
        graph2.load_params(&temp_file),
        Err(GraphError::ShapeMismatch { .. })
    ));
    assert_abs_diff_eq!(w.value().unwrap().unwrap(), Tensor::zeros(&[1, 2]), epsilon = 1e-6);
    assert_abs_diff_eq!(b.item().unwrap(), 0.0, epsilon = 1e-6);

    fs::remove_file(&temp_file).ok();
}
