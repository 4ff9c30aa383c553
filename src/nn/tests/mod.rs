mod ema;
mod graph_basic;
mod graph_forward;
mod node_loss;
mod optimizer;
mod save_load;
