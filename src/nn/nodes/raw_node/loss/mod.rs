mod l2_loss;
mod mse_loss;

pub(in crate::nn) use l2_loss::L2Loss;
pub(in crate::nn) use mse_loss::MSELoss;
