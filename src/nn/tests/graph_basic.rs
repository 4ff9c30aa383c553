/*
 * @Author       : 老董
 * @Date         : 2026-10-16
 * @Description  : Graph 基础功能测试：节点创建、命名、参数初始化、describe
 */

use crate::nn::{Graph, GraphError, Init, NodeId, VarMatrixOps};
use crate::tensor::Tensor;
use approx::assert_abs_diff_eq;

#[test]
fn test_node_ids_start_from_one() {
    let graph = Graph::new();
    let x = graph.input(&[2], Some("x")).unwrap();
    let w = graph.parameter(&[2, 1], Init::Zeros, "w").unwrap();
    assert_eq!(x.node_id(), NodeId(1));
    assert_eq!(w.node_id(), NodeId(2));
    assert_eq!(graph.inner().nodes_count(), 2);
}

#[test]
fn test_auto_naming_and_duplicate_name() {
    let graph = Graph::with_name("naming");
    let x = graph.input(&[2], None).unwrap();
    let w = graph.parameter(&[2, 1], Init::Zeros, "w").unwrap();
    let y = x.matmul(&w).unwrap();
    assert_eq!(x.name().unwrap(), "Input_1");
    assert_eq!(y.name().unwrap(), "MatMul_1");

    let result = graph.parameter(&[1, 1], Init::Zeros, "w");
    assert!(matches!(result, Err(GraphError::DuplicateNodeName(_))));
}

#[test]
fn test_invalid_shapes_are_rejected() {
    let graph = Graph::new();
    assert!(graph.input(&[], Some("empty")).is_err());
    assert!(graph.input(&[0], Some("zero")).is_err());
    assert!(graph.parameter(&[0, 3], Init::Zeros, "p").is_err());
}

#[test]
fn test_parameter_init() {
    let graph = Graph::new();
    let c = graph.parameter(&[2, 2], Init::Constant(1.5), "c").unwrap();
    assert_abs_diff_eq!(
        c.value().unwrap().unwrap(),
        Tensor::full(1.5, &[2, 2]),
        epsilon = 1e-6
    );

    let f = graph.parameter(&[50, 4], Init::FanIn(4), "f").unwrap();
    let bound = 1.0 / 2.0;
    assert!(
        f.value()
            .unwrap()
            .unwrap()
            .to_vec()
            .iter()
            .all(|v| (-bound..=bound).contains(v))
    );
}

#[test]
fn test_seeded_graph_is_reproducible() {
    let make = || {
        let graph = Graph::new_with_seed(42);
        let u = graph
            .parameter(&[3, 3], Init::Uniform { low: -1.0, high: 1.0 }, "u")
            .unwrap();
        u.value().unwrap().unwrap()
    };
    assert_abs_diff_eq!(make(), make(), epsilon = 0.0);
}

#[test]
fn test_parameter_with_value_and_parameters_order() {
    let graph = Graph::new();
    let _x = graph.input(&[1], Some("x")).unwrap();
    let a = graph
        .parameter_with_value(&Tensor::new(&[1., 2.], &[1, 2]), "a")
        .unwrap();
    let b = graph.parameter(&[1, 1], Init::Zeros, "b").unwrap();

    let params = graph.parameters();
    assert_eq!(params.len(), 2);
    assert_eq!(params[0].node_id(), a.node_id());
    assert_eq!(params[1].node_id(), b.node_id());

    // 参数形状在创建后固定
    assert!(a.set_value(&Tensor::zeros(&[2, 1])).is_err());
}

#[test]
fn test_wrap_node_id() {
    let graph = Graph::new();
    let x = graph.input(&[2], Some("x")).unwrap();
    let wrapped = graph.wrap_node_id(x.node_id()).unwrap();
    assert!(wrapped.same_graph(&x));
    assert!(matches!(
        graph.wrap_node_id(NodeId(99)),
        Err(GraphError::NodeNotFound(NodeId(99)))
    ));
}

#[test]
fn test_var_from_different_graph() {
    let g1 = Graph::new();
    let g2 = Graph::new();
    let a = g1.input(&[2], Some("a")).unwrap();
    let b = g2.parameter(&[2, 1], Init::Zeros, "b").unwrap();
    assert!(a.matmul(&b).is_err());
    assert!(a.try_add(&b).is_err());
}

#[test]
fn test_describe() {
    let graph = Graph::with_name("desc");
    let x = graph.input(&[2], Some("x")).unwrap();
    let w = graph.parameter(&[2, 1], Init::Zeros, "w").unwrap();
    let _y = x.matmul(&w).unwrap();
    let text = graph.describe();
    assert!(text.contains("desc"));
    assert!(text.contains("MatMul"));
    assert!(text.contains("父节点: [x, w]"));
}
