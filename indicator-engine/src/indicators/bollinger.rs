use common::{BollingerBands, IndicatorCalculationDetail, Reading};

use super::detail::{trailing, DetailBuilder};
use super::sma::calculate_sma;

/// Standard deviations between the middle and the outer bands
const BAND_WIDTH_STD_DEVS: f64 = 2.0;

/// Band width (in percent of the middle band) above which volatility is high
const HIGH_VOLATILITY_WIDTH_PCT: f64 = 20.0;

/// Bollinger Bands tagged with whether the window was full.
///
/// With fewer than `period` prices all three bands equal the SMA fallback.
pub fn bollinger_reading(prices: &[f64], period: usize) -> Reading<BollingerBands> {
    let sma = calculate_sma(prices, period);

    if period == 0 || prices.len() < period {
        return Reading::InsufficientData(BollingerBands {
            upper: sma,
            middle: sma,
            lower: sma,
        });
    }

    let std = population_std_dev(trailing(prices, period), sma);
    Reading::Computed(BollingerBands {
        upper: sma + std * BAND_WIDTH_STD_DEVS,
        middle: sma,
        lower: sma - std * BAND_WIDTH_STD_DEVS,
    })
}

/// Calculate Bollinger Bands
///
/// # Arguments
/// * `prices` - Slice of closing prices, oldest first
/// * `period` - Period for the middle SMA (typically 20)
///
/// # Returns
/// Upper, middle (SMA) and lower band at the latest price
pub fn calculate_bollinger_bands(prices: &[f64], period: usize) -> BollingerBands {
    bollinger_reading(prices, period).value()
}

fn population_std_dev(window: &[f64], mean: f64) -> f64 {
    let variance: f64 =
        window.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / window.len() as f64;
    variance.sqrt()
}

/// Calculate %B indicator (position within bands)
/// Returns value between 0 and 1 when within bands
/// < 0 means below lower band, > 1 means above upper band
pub fn percent_b(price: f64, lower: f64, upper: f64) -> f64 {
    if upper == lower {
        return 0.5;
    }
    (price - lower) / (upper - lower)
}

/// Band width as a percentage of the middle band
pub fn bandwidth_pct(bands: &BollingerBands) -> f64 {
    if bands.middle == 0.0 {
        return 0.0;
    }
    (bands.upper - bands.lower) / bands.middle * 100.0
}

/// Bollinger Bands with variance, standard deviation, band width and a
/// reading of the latest price against the bands.
///
/// `result` is the upper band; see [`lower_band_detail`] for the lower one.
pub fn calculate_bollinger_with_details(
    prices: &[f64],
    period: usize,
) -> IndicatorCalculationDetail {
    let mut detail = DetailBuilder::new(format!(
        "Upper = SMA{0} + 2 × σ, Middle = SMA{0}, Lower = SMA{0} - 2 × σ",
        period
    ));
    detail.var("Period (n)", period);

    let reading = bollinger_reading(prices, period);
    let Reading::Computed(bands) = reading else {
        let bands = reading.value();
        detail
            .var("Available prices", prices.len())
            .var("SMA", bands.middle)
            .step(format!(
                "Insufficient data: need {} prices, have {}",
                period,
                prices.len()
            ))
            .step(format!(
                "All bands equal SMA{} = {:.2}",
                period, bands.middle
            ));
        return detail.finish(
            bands.upper,
            "Not enough data to calculate the upper band - no volatility reading",
        );
    };

    let window = trailing(prices, period);
    let variance = population_std_dev(window, bands.middle).powi(2);
    let std = variance.sqrt();
    let width = bandwidth_pct(&bands);
    let current_price = prices[prices.len() - 1];

    detail
        .var("SMA", bands.middle)
        .var("Variance", variance)
        .var("Standard deviation (σ)", std)
        .var("Upper band", bands.upper)
        .var("Lower band", bands.lower)
        .var("Band width (%)", width)
        .var("%B", percent_b(current_price, bands.lower, bands.upper))
        .var("Current price", current_price)
        .step(format!("SMA{} = {:.2}", period, bands.middle))
        .step(format!(
            "Variance = Σ(P - SMA)² / {} = {:.4}",
            period, variance
        ))
        .step(format!("σ = √{:.4} = {:.4}", variance, std))
        .step(format!(
            "Upper = {:.2} + 2 × {:.4} = {:.2}",
            bands.middle, std, bands.upper
        ))
        .step(format!(
            "Lower = {:.2} - 2 × {:.4} = {:.2}",
            bands.middle, std, bands.lower
        ))
        .step(format!(
            "Band width = ({:.2} - {:.2}) / {:.2} × 100 = {:.2}%",
            bands.upper, bands.lower, bands.middle, width
        ));

    // "upper band" appears once, in a clause that stays true when the
    // lower-band detail swaps it for "lower band".
    let position = if current_price > bands.upper {
        format!(
            "Price {:.2} has broken above the bands (upper {:.2}) - overbought",
            current_price, bands.upper
        )
    } else if current_price < bands.lower {
        format!(
            "Price {:.2} has broken below the bands (lower {:.2}) - oversold",
            current_price, bands.lower
        )
    } else {
        format!(
            "Price {:.2} is inside the bands ({:.2} - {:.2}) - normal range",
            current_price, bands.lower, bands.upper
        )
    };
    let volatility = if width > HIGH_VOLATILITY_WIDTH_PCT {
        "high volatility"
    } else {
        "normal volatility"
    };

    detail.finish(
        bands.upper,
        format!(
            "{}; band width {:.2}% indicates {}, watch the upper band for a breakout",
            position, width, volatility
        ),
    )
}

/// Lower-band detail derived from the upper-band detail: same formula,
/// variables and steps, `result` set to `lower` and the first
/// "upper band" in the interpretation read as "lower band".
pub fn lower_band_detail(
    upper: &IndicatorCalculationDetail,
    lower: f64,
) -> IndicatorCalculationDetail {
    IndicatorCalculationDetail {
        result: lower,
        interpretation: upper.interpretation.replacen("upper band", "lower band", 1),
        ..upper.clone()
    }
}
