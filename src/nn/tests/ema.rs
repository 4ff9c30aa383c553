/*
 * @Author       : 老董
 * @Date         : 2026-10-16
 * @Description  : 指数滑动平均测试
 */

use crate::nn::{ExponentialMovingAverage, Graph};
use crate::tensor::Tensor;
use approx::assert_abs_diff_eq;

#[test]
fn test_decay_range() {
    assert!(ExponentialMovingAverage::new(-0.1).is_err());
    assert!(ExponentialMovingAverage::new(1.1).is_err());
    assert!(ExponentialMovingAverage::new(0.0).is_ok());
    assert!(ExponentialMovingAverage::new(1.0).is_ok());
}

#[test]
fn test_track_and_update() {
    let graph = Graph::new();
    let w = graph
        .parameter_with_value(&Tensor::new(&[1., 2.], &[1, 2]), "w")
        .unwrap();
    let mut ema = ExponentialMovingAverage::new(0.9).unwrap();
    ema.track(&[w.clone()]).unwrap();
    // 重复注册无效
    ema.track(&[w.clone()]).unwrap();
    assert_eq!(ema.tracked().count(), 1);

    // 影子值初始化为当前值，变量不变时更新后也不变
    ema.update().unwrap();
    assert_abs_diff_eq!(
        ema.average(&w).unwrap().clone(),
        Tensor::new(&[1., 2.], &[1, 2]),
        epsilon = 1e-6
    );

    // shadow ← 0.9 * shadow + 0.1 * value
    w.set_value(&Tensor::new(&[11., -8.], &[1, 2])).unwrap();
    ema.update().unwrap();
    assert_abs_diff_eq!(
        ema.average(&w).unwrap().clone(),
        Tensor::new(&[2., 1.], &[1, 2]),
        epsilon = 1e-5
    );

    ema.reset().unwrap();
    assert_abs_diff_eq!(
        ema.average(&w).unwrap().clone(),
        Tensor::new(&[11., -8.], &[1, 2]),
        epsilon = 1e-6
    );
}

#[test]
fn test_set_average() {
    let graph = Graph::new();
    let w = graph.parameter_with_value(&Tensor::zeros(&[2, 1]), "w").unwrap();
    let other = graph.parameter_with_value(&Tensor::zeros(&[1, 1]), "other").unwrap();
    let mut ema = ExponentialMovingAverage::new(0.5).unwrap();
    ema.track(&[w.clone()]).unwrap();

    ema.set_average(&w, &Tensor::ones(&[2, 1])).unwrap();
    assert_abs_diff_eq!(
        ema.average(&w).unwrap().clone(),
        Tensor::ones(&[2, 1]),
        epsilon = 1e-6
    );
    assert!(ema.set_average(&w, &Tensor::ones(&[1, 2])).is_err());
    assert!(ema.set_average(&other, &Tensor::ones(&[1, 1])).is_err());
    assert!(ema.average(&other).is_none());
}
