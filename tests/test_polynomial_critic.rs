/*
 * @Author       : 老董
 * @Date         : 2026-10-16
 * @Description  : 多项式评论家集成测试
 *
 * 覆盖从构造、训练、软更新目标网络、求 ∂Q/∂a 到保存/恢复的完整流程
 */

use approx::assert_abs_diff_eq;
use poly_critic::nn::{Graph, GraphError};
use poly_critic::rl::{CriticConfig, CriticError, PolyOrder, PolynomialCritic};
use poly_critic::tensor::Tensor;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::fs;

/// 真实的二次 Q 函数：Q(s, a) = s0² - s1·a + 2a² + 0.5
fn true_q(s: &Tensor, a: &Tensor) -> Tensor {
    let batch = s.shape()[0];
    let data = (0..batch)
        .map(|i| {
            let (s0, s1, act) = (s[[i, 0]], s[[i, 1]], a[[i, 0]]);
            s0 * s0 - s1 * act + 2.0 * act * act + 0.5
        })
        .collect::<Vec<_>>();
    Tensor::new(&data, &[batch, 1])
}

fn quadratic_config() -> CriticConfig {
    CriticConfig {
        order: 2,
        learning_rate: 0.02,
        tau: 0.05,
        l2: 0.0,
        seed: Some(2026),
        ..CriticConfig::default()
    }
}

/// 从随机小批量中拟合一个已知的二次函数
#[test]
fn test_fit_known_quadratic() {
    let mut rng = StdRng::seed_from_u64(1);
    let mut critic = PolynomialCritic::new(2, 1, quadratic_config()).unwrap();

    let eval_s = Tensor::new_random_with_rng(-1.0, 1.0, &[32, 2], &mut rng);
    let eval_a = Tensor::new_random_with_rng(-1.0, 1.0, &[32, 1], &mut rng);
    let eval_y = true_q(&eval_s, &eval_a);
    let eval_error = |critic: &PolynomialCritic| {
        let diff = critic.q_value(&eval_s, &eval_a).unwrap() - &eval_y;
        diff.square().sum().get_data_number().unwrap() / 32.0
    };

    let error_before = eval_error(&critic);
    for _ in 0..1500 {
        let s = Tensor::new_random_with_rng(-1.0, 1.0, &[16, 2], &mut rng);
        let a = Tensor::new_random_with_rng(-1.0, 1.0, &[16, 1], &mut rng);
        let y = true_q(&s, &a);
        critic.train(&y, &s, &a).unwrap();
        critic.update_target().unwrap();
    }
    let error_after = eval_error(&critic);

    println!("拟合前 MSE: {error_before:.4}，拟合后 MSE: {error_after:.6}");
    assert!(error_after < 0.01);
    assert!(error_after < error_before);

    // 学到的 ∂Q/∂a 应接近真实值 -s1 + 4a
    let grads = critic.gradients(&eval_s, &eval_a).unwrap();
    assert_eq!(grads.shape(), &[32, 1]);
    for i in 0..32 {
        let expected = -eval_s[[i, 1]] + 4.0 * eval_a[[i, 0]];
        assert_abs_diff_eq!(grads[[i, 0]], expected, epsilon = 0.3);
    }

    // tau = 0.05 时目标网络滞后但已靠近在线网络
    let target_diff = critic.target_q(&eval_s, &eval_a).unwrap() - critic.q_value(&eval_s, &eval_a).unwrap();
    assert!(target_diff.square().sum().get_data_number().unwrap() / 32.0 < 0.05);
}

/// DDPG 式的更新循环：y = r + γ·Q'(s', a')，其中 Q' 来自目标网络
#[test]
fn test_bootstrapped_td_loop() {
    let mut rng = StdRng::seed_from_u64(7);
    let config = CriticConfig {
        order: 1,
        learning_rate: 0.01,
        tau: 0.01,
        seed: Some(3),
        ..CriticConfig::default()
    };
    let mut critic = PolynomialCritic::new(3, 2, config).unwrap();
    assert_eq!(critic.order(), PolyOrder::Linear);

    let gamma = 0.9;
    for step in 0..50 {
        let s = Tensor::new_random_with_rng(-1.0, 1.0, &[8, 3], &mut rng);
        let a = Tensor::new_random_with_rng(-1.0, 1.0, &[8, 2], &mut rng);
        let r = Tensor::new_random_with_rng(0.0, 1.0, &[8, 1], &mut rng);
        let s_next = Tensor::new_random_with_rng(-1.0, 1.0, &[8, 3], &mut rng);
        let a_next = Tensor::new_random_with_rng(-1.0, 1.0, &[8, 2], &mut rng);

        let q_next = critic.target_q(&s_next, &a_next).unwrap();
        let y = r + q_next * gamma;
        let loss = critic.train(&y, &s, &a).unwrap();
        assert!(loss.is_finite(), "第{step}步损失非有限值");
        critic.update_target().unwrap();

        let dq_da = critic.gradients(&s, &a).unwrap();
        assert_eq!(dq_da.shape(), &[8, 2]);
    }
    assert_eq!(critic.train_steps(), 50);
}

#[test]
fn test_save_and_load_dir() {
    let dir = std::env::temp_dir().join("poly_critic_test_save_and_load_dir");
    fs::remove_dir_all(&dir).ok();

    let mut rng = StdRng::seed_from_u64(11);
    let mut critic = PolynomialCritic::new(2, 1, quadratic_config()).unwrap();
    for _ in 0..5 {
        let s = Tensor::new_random_with_rng(-1.0, 1.0, &[4, 2], &mut rng);
        let a = Tensor::new_random_with_rng(-1.0, 1.0, &[4, 1], &mut rng);
        critic.train(&true_q(&s, &a), &s, &a).unwrap();
        critic.update_target().unwrap();
    }
    critic.save(&dir).unwrap();
    assert!(dir.join("critic.json").exists());
    assert!(dir.join("online.params").exists());
    assert!(dir.join("target.params").exists());

    let mut loaded = PolynomialCritic::load(&dir).unwrap();
    assert_eq!(loaded.state_dim(), 2);
    assert_eq!(loaded.action_dim(), 1);
    assert_eq!(loaded.config(), critic.config());
    assert_eq!(loaded.train_steps(), 5);
    assert_abs_diff_eq!(loaded.weights().unwrap(), critic.weights().unwrap(), epsilon = 1e-7);
    assert_abs_diff_eq!(
        loaded.target_weights().unwrap(),
        critic.target_weights().unwrap(),
        epsilon = 1e-7
    );
    assert_abs_diff_eq!(
        loaded.target_bias().unwrap(),
        critic.target_bias().unwrap(),
        epsilon = 1e-7
    );

    // 恢复后的软更新从保存时的目标参数继续
    critic.update_target().unwrap();
    loaded.update_target().unwrap();
    assert_abs_diff_eq!(
        loaded.target_weights().unwrap(),
        critic.target_weights().unwrap(),
        epsilon = 1e-6
    );

    fs::remove_dir_all(&dir).ok();
}

/// online.params 缺少 W 时不能得到一个带随机 W 的“恢复成功”的评论家
#[test]
fn test_load_rejects_incomplete_params() {
    let dir = std::env::temp_dir().join("poly_critic_test_load_rejects_incomplete_params");
    fs::remove_dir_all(&dir).ok();

    let mut critic = PolynomialCritic::new(1, 1, quadratic_config()).unwrap();
    critic
        .set_parameters(&Tensor::new(&[1., 2., 3., 4.], &[2, 2]), &Tensor::zeros(&[1, 1]))
        .unwrap();
    critic.save(&dir).unwrap();

    let only_bias = Graph::new();
    only_bias
        .parameter_with_value(&Tensor::new(&[0.5], &[1, 1]), "b")
        .unwrap();
    only_bias.save_params(dir.join("online.params")).unwrap();

    assert!(matches!(
        PolynomialCritic::load(&dir),
        Err(CriticError::Graph(GraphError::InvalidFormat(_)))
    ));

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_load_missing_dir() {
    let dir = std::env::temp_dir().join("poly_critic_test_no_such_dir");
    fs::remove_dir_all(&dir).ok();
    assert!(matches!(
        PolynomialCritic::load(&dir),
        Err(CriticError::Io(_))
    ));
}

#[test]
fn test_config_file_round_trip() {
    let path = std::env::temp_dir().join("poly_critic_test_config_file_round_trip.json");
    let config = CriticConfig {
        order: 1,
        tau: 0.2,
        l2: 0.5,
        ..CriticConfig::default()
    };
    config.save(&path).unwrap();
    let loaded = CriticConfig::load(&path).unwrap();
    assert_eq!(loaded, config);

    fs::write(&path, r#"{ "tau": 2.0 }"#).unwrap();
    assert!(matches!(
        CriticConfig::load(&path),
        Err(CriticError::InvalidConfig(_))
    ));

    fs::remove_file(&path).ok();
}
