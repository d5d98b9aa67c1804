//! Streaming technical indicators.
//!
//! This crate provides incremental implementations of the indicators the
//! decision policies consume:
//! - Moving averages (SMA, EMA)
//! - Momentum indicators (RSI, MACD)
//! - Volatility indicators (ATR)
//!
//! All indicators absorb one input per bar in O(1), matching the
//! one-bar-at-a-time evaluation model of the policies. The `Lookback`
//! buffer gives offset-addressable access to recent values (current,
//! previous, N-back).

pub mod lookback;
pub mod momentum;
pub mod moving_average;
pub mod volatility;

pub use lookback::Lookback;
pub use momentum::{Macd, MacdValue, Rsi};
pub use moving_average::{Ema, Sma};
pub use volatility::Atr;
