//! Nice tick generation compatible with the usual 1-2-5 decade stepping.

const E10: f64 = 7.071_067_811_865_476; // sqrt(50)
const E5: f64 = 3.162_277_660_168_379_5; // sqrt(10)
const E2: f64 = std::f64::consts::SQRT_2;

/// Default tick count requested by axes when none is configured.
pub const DEFAULT_TICK_COUNT: usize = 10;

/// Upper bound on requested counts; larger requests are clamped to it.
pub const MAX_TICK_COUNT: usize = 10_000;

/// Integer tick bounds plus increment.
///
/// A negative increment encodes the reciprocal of a sub-unit step so that
/// ticks like `0.1` are produced by division and stay exact.
fn tick_spec(start: f64, stop: f64, count: f64) -> (f64, f64, f64) {
    let step = (stop - start) / count.max(0.0);
    let power = step.log10().floor();
    let error = step / 10_f64.powf(power);
    let factor = if error >= E10 {
        10.0
    } else if error >= E5 {
        5.0
    } else if error >= E2 {
        2.0
    } else {
        1.0
    };

    let (mut i1, mut i2, inc);
    if power < 0.0 {
        let base = 10_f64.powf(-power) / factor;
        i1 = (start * base).round();
        i2 = (stop * base).round();
        if i1 / base < start {
            i1 += 1.0;
        }
        if i2 / base > stop {
            i2 -= 1.0;
        }
        inc = -base;
    } else {
        let base = 10_f64.powf(power) * factor;
        i1 = (start / base).round();
        i2 = (stop / base).round();
        if i1 * base < start {
            i1 += 1.0;
        }
        if i2 * base > stop {
            i2 -= 1.0;
        }
        inc = base;
    }

    if i2 < i1 && (0.5..2.0).contains(&count) {
        return tick_spec(start, stop, count * 2.0);
    }
    (i1, i2, inc)
}

/// Returns roughly `count` evenly spaced round values within `[start, stop]`.
///
/// Values are returned in the same direction as the input interval.
#[must_use]
pub fn ticks(start: f64, stop: f64, count: usize) -> Vec<f64> {
    if count == 0 || !start.is_finite() || !stop.is_finite() {
        return Vec::new();
    }
    if start == stop {
        return vec![start];
    }

    let reverse = stop < start;
    let (lo, hi) = if reverse { (stop, start) } else { (start, stop) };
    let (i1, i2, inc) = tick_spec(lo, hi, count.min(MAX_TICK_COUNT) as f64);
    if !(i2 >= i1) || !inc.is_finite() || i2 - i1 >= (2 * MAX_TICK_COUNT) as f64 {
        return Vec::new();
    }

    let n = (i2 - i1) as usize + 1;
    let at = |index: f64| if inc < 0.0 { index / -inc } else { index * inc };
    if reverse {
        (0..n).map(|i| at(i2 - i as f64)).collect()
    } else {
        (0..n).map(|i| at(i1 + i as f64)).collect()
    }
}

/// Signed step between adjacent ticks for the given interval.
#[must_use]
pub fn tick_step(start: f64, stop: f64, count: usize) -> f64 {
    if count == 0 || !start.is_finite() || !stop.is_finite() || start == stop {
        return 0.0;
    }
    let reverse = stop < start;
    let (lo, hi) = if reverse { (stop, start) } else { (start, stop) };
    let (_, _, inc) = tick_spec(lo, hi, count.min(MAX_TICK_COUNT) as f64);
    let magnitude = if inc < 0.0 { 1.0 / -inc } else { inc };
    if reverse { -magnitude } else { magnitude }
}

/// Signed increment between ticks: the step itself when it is at least one,
/// otherwise the negated reciprocal of the step.
#[must_use]
pub fn tick_increment(start: f64, stop: f64, count: usize) -> f64 {
    if count == 0 || !start.is_finite() || !stop.is_finite() || start == stop {
        return 0.0;
    }
    tick_spec(start.min(stop), start.max(stop), count.min(MAX_TICK_COUNT) as f64).2
}

/// Decimal digits required to distinguish values spaced `step` apart.
#[must_use]
pub fn precision_fixed(step: f64) -> usize {
    if !step.is_finite() || step == 0.0 {
        return 0;
    }
    let exponent = step.abs().log10().floor();
    if exponent >= 0.0 { 0 } else { (-exponent) as usize }
}
