pub mod api;
pub mod backtest;
pub mod config;
pub mod events;
pub mod monitor;
pub mod payment;
pub mod server;
pub mod session;
pub mod sse;
pub mod status;
pub mod stream_handler;
