use std::f64::consts::PI;

/// Most ticks [`MultiplePi::locate`] returns before it coarsens the step.
pub const MAX_TICKS: usize = 64;

/// Ticks at multiples of `base / denominator`, labelled as fractions of a
/// symbol (π by default).
#[derive(Clone, Debug)]
pub struct MultiplePi {
    denominator: i64,
    base: f64,
    symbol: &'static str,
}

impl MultiplePi {
    pub fn new(denominator: u32) -> Self {
        MultiplePi {
            denominator: denominator.max(1) as i64,
            base: PI,
            symbol: "π",
        }
    }

    pub fn with_base(mut self, base: f64, symbol: &'static str) -> Self {
        self.base = base;
        self.symbol = symbol;
        self
    }

    pub fn step(&self) -> f64 {
        self.base / self.denominator as f64
    }

    /// Tick positions inside `[lo, hi]`. Wide ranges get every second,
    /// fourth, ... multiple so at most [`MAX_TICKS`] come back.
    pub fn locate(&self, lo: f64, hi: f64) -> Vec<f64> {
        let mut step = self.step();
        if !(lo.is_finite() && hi.is_finite() && hi >= lo && step.is_finite() && step > 0.0) {
            return Vec::new();
        }
        while (hi - lo) / step >= MAX_TICKS as f64 {
            step *= 2.0;
        }

        let first = (lo / step).ceil() as i64;
        let last = (hi / step).floor() as i64;
        (first..=last).map(|k| k as f64 * step).collect()
    }

    /// Renders `value` as the nearest multiple, in lowest terms.
    pub fn format(&self, value: f64) -> String {
        let numer = (self.denominator as f64 * value / self.base).round() as i64;
        if numer == 0 {
            return "0".to_string();
        }

        let common = gcd(numer, self.denominator);
        let (numer, denom) = (numer / common, self.denominator / common);
        let sign = if numer < 0 { "-" } else { "" };
        let symbol = self.symbol;

        match (numer.abs(), denom) {
            (1, 1) => format!("{sign}{symbol}"),
            (n, 1) => format!("{sign}{n}{symbol}"),
            (1, d) => format!("{sign}{symbol}/{d}"),
            (n, d) => format!("{sign}{n}{symbol}/{d}"),
        }
    }
}

fn gcd(a: i64, b: i64) -> i64 {
    let (mut a, mut b) = (a.abs(), b.abs());
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a.max(1)
}
