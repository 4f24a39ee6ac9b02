//! Linear mapping of prices and trade counts onto panel columns.

use crate::aggregator::Bucket;

/// Spreads narrower than this many price units are padded.
pub const MIN_PRICE_SPREAD: f64 = 100.0;

/// Padding applied to each bound when the spread is below [`MIN_PRICE_SPREAD`].
pub const PRICE_PADDING: f64 = 50.0;

/// Price bounds of the visible buckets mapped onto a panel of logical width `w`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceScale {
    pub lower: f64,
    pub upper: f64,
    width: u16,
}

impl PriceScale {
    /// Scale over `buckets` for a panel of logical width `width`.
    ///
    /// Returns `None` when there is nothing to scale.
    pub fn new<'a>(buckets: impl IntoIterator<Item = &'a Bucket>, width: u16) -> Option<Self> {
        let (lower, upper) = buckets
            .into_iter()
            .fold(None, |bounds: Option<(f64, f64)>, bucket| {
                Some(match bounds {
                    None => (bucket.low, bucket.high),
                    Some((lower, upper)) => (lower.min(bucket.low), upper.max(bucket.high)),
                })
            })?;

        let (lower, upper) = if upper - lower < MIN_PRICE_SPREAD {
            (lower - PRICE_PADDING, upper + PRICE_PADDING)
        } else {
            (lower, upper)
        };

        Some(Self {
            lower,
            upper,
            width,
        })
    }

    /// Fractional column of `value`: `1` at `lower`, `w - 1` at `upper`.
    pub fn column(&self, value: f64) -> f64 {
        let span = f64::from(self.width.saturating_sub(2));
        1.0 + (value - self.lower) / (self.upper - self.lower) * span
    }

    /// Inclusive cell range covering `[a, b]`, clamped to the panel interior.
    pub fn cells(&self, a: f64, b: f64) -> std::ops::RangeInclusive<u16> {
        let start = self.column(a.min(b));
        let stop = self.column(a.max(b));
        clamp_cell(start, self.width)..=clamp_cell(stop, self.width)
    }
}

/// Trade-count scale for the volume histogram.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolumeScale {
    pub max: u64,
    width: u16,
}

impl VolumeScale {
    pub fn new<'a>(buckets: impl IntoIterator<Item = &'a Bucket>, width: u16) -> Self {
        let max = buckets
            .into_iter()
            .map(|bucket| bucket.trade_count)
            .max()
            .unwrap_or(0);
        Self { max, width }
    }

    /// Last filled column of a bar for `trade_count`, or `None` if no cell is filled.
    ///
    /// Bars fill columns `1..=len` where `len = trade_count / max * (w - 1)`.
    pub fn bar_end(&self, trade_count: u64) -> Option<u16> {
        if self.max == 0 {
            return None;
        }

        let len = trade_count as f64 / self.max as f64 * f64::from(self.width.saturating_sub(1));
        let end = clamp_cell(len, self.width);
        (len >= 1.0).then_some(end)
    }
}

/// Truncate a fractional column to a cell inside `1..=w-1`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn clamp_cell(column: f64, width: u16) -> u16 {
    let last = f64::from(width.saturating_sub(1).max(1));
    column.floor().clamp(1.0, last) as u16
}
