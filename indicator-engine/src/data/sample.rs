use chrono::{DateTime, Duration, Utc};
use common::{Bar, OhlcSeries};

pub const SAMPLE_SYMBOL: &str = "FPT.VN";

const SAMPLE_VOLUME: u64 = 1_000_000;

/// FPT.VN daily closes around 89,600 VND (oldest first)
pub const SAMPLE_CLOSES: [f64; 30] = [
    95000.0, 94200.0, 93800.0, 92500.0, 91200.0, 90800.0, 89900.0, 89200.0, 88800.0, 89100.0,
    89600.0, 90200.0, 89800.0, 89400.0, 89600.0, 90100.0, 89700.0, 89300.0, 89600.0, 89400.0,
    89200.0, 89800.0, 90200.0, 89900.0, 89600.0, 89300.0, 89700.0, 90000.0, 89800.0, 89600.0,
];

pub const SAMPLE_HIGHS: [f64; 30] = [
    95500.0, 94800.0, 94200.0, 93000.0, 91800.0, 91200.0, 90400.0, 89800.0, 89400.0, 89600.0,
    90200.0, 90800.0, 90400.0, 90000.0, 90200.0, 90700.0, 90300.0, 89900.0, 90200.0, 90000.0,
    89800.0, 90400.0, 90800.0, 90500.0, 90200.0, 89900.0, 90300.0, 90600.0, 90400.0, 90200.0,
];

pub const SAMPLE_LOWS: [f64; 30] = [
    94500.0, 93800.0, 93400.0, 92200.0, 90800.0, 90400.0, 89500.0, 88800.0, 88400.0, 88700.0,
    89200.0, 89800.0, 89400.0, 89000.0, 89200.0, 89700.0, 89300.0, 88900.0, 89200.0, 89000.0,
    88800.0, 89400.0, 89800.0, 89500.0, 89200.0, 88900.0, 89300.0, 89600.0, 89400.0, 89200.0,
];

/// Sample series as aligned OHLC vectors
pub fn sample_series() -> OhlcSeries {
    OhlcSeries::new(
        SAMPLE_HIGHS.to_vec(),
        SAMPLE_LOWS.to_vec(),
        SAMPLE_CLOSES.to_vec(),
    )
}

/// Sample bars, one per day, the last one dated `end`.
///
/// Opens repeat the previous close; the first bar opens at its own close.
pub fn sample_bars(end: DateTime<Utc>) -> Vec<Bar> {
    let days = SAMPLE_CLOSES.len();
    (0..days)
        .map(|i| {
            let open = if i == 0 {
                SAMPLE_CLOSES[0]
            } else {
                SAMPLE_CLOSES[i - 1]
            };
            Bar::new(
                end - Duration::days((days - 1 - i) as i64),
                open,
                SAMPLE_HIGHS[i],
                SAMPLE_LOWS[i],
                SAMPLE_CLOSES[i],
                SAMPLE_VOLUME,
            )
        })
        .collect()
}
