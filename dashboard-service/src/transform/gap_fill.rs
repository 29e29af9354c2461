use energy_client::domain::{HourlySeries, HOURLY_SERIES_LEN};

/// Value used when there is nothing to continue from.
pub const GAP_SENTINEL: f64 = 0.0;

/// Pad a measured prefix to a 25-point daily curve.
///
/// Holes take the previous measured value (the sentinel if none precedes
/// them). Missing trailing hours are filled with `last + 1`, repeated; an
/// empty input yields a curve of sentinels. Input longer than 25 points is
/// truncated.
pub fn gap_fill(values: &[Option<f64>]) -> HourlySeries {
    let measured = &values[..values.len().min(HOURLY_SERIES_LEN)];

    let mut out = Vec::with_capacity(HOURLY_SERIES_LEN);
    let mut masked = 0;
    let mut carry = GAP_SENTINEL;
    for v in measured {
        match v {
            Some(x) if x.is_finite() => carry = *x,
            _ => masked += 1,
        }
        out.push(carry);
    }

    let padded = HOURLY_SERIES_LEN - out.len();
    let filler = match out.last() {
        Some(last) => last + 1.0,
        None => GAP_SENTINEL,
    };
    out.resize(HOURLY_SERIES_LEN, filler);

    match HourlySeries::try_new(out, padded, masked) {
        Some(series) => series,
        // out.len() == HOURLY_SERIES_LEN by construction.
        None => unreachable!("gap-filled series must have {HOURLY_SERIES_LEN} points"),
    }
}
