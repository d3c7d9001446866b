//! Primitive indicator calculators.
//!
//! Every calculator is a pure function over an oldest-first series. Plain
//! variants return the number, `*_reading` variants tag insufficient-data
//! fallbacks, and `*_with_details` variants return an
//! [`IndicatorCalculationDetail`](common::IndicatorCalculationDetail).

mod detail;

pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;
pub mod stochastic;
pub mod williams_r;

pub use bollinger::{
    bandwidth_pct, bollinger_reading, calculate_bollinger_bands,
    calculate_bollinger_with_details, lower_band_detail, percent_b,
};
pub use ema::{calculate_ema, calculate_ema_with_details};
pub use macd::{calculate_macd, calculate_macd_with_details, Macd};
pub use rsi::{calculate_rsi, calculate_rsi_with_details, rsi_reading};
pub use sma::{calculate_sma, calculate_sma_with_details, sma_reading};
pub use stochastic::{
    calculate_stochastic, calculate_stochastic_with_details, stochastic_reading, Stochastic,
};
pub use williams_r::{calculate_williams_r, calculate_williams_r_with_details, williams_r_reading};
