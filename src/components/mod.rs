pub mod apikeys;
pub mod backtest;
pub mod bots;
pub mod charge;
pub mod form;
pub mod history;
pub mod monitor;
pub mod strategies;
pub mod template;
pub mod toast;
