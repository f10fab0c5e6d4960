/// Weighted sampling primitives shared by every generation step.
use rand::Rng;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SamplerError {
    #[error("cannot pick from an empty sequence")]
    Empty,
}

/// Pick a uniformly random element of `options`.
pub fn pick<'a, T, R: Rng + ?Sized>(options: &'a [T], rng: &mut R) -> Result<&'a T, SamplerError> {
    if options.is_empty() {
        return Err(SamplerError::Empty);
    }
    Ok(&options[rng.gen_range(0..options.len())])
}

/// Pick an element of `options`, skewed toward the front as `power` grows.
///
/// The index is `floor(u^power * len)` for `u` uniform in `[0, 1)`, clamped
/// to the last index. `power == 1` is uniform, `power < 1` favours the end,
/// and non-positive or NaN powers are treated as 1.
pub fn pick_biased<'a, T, R: Rng + ?Sized>(
    options: &'a [T],
    power: f64,
    rng: &mut R,
) -> Result<&'a T, SamplerError> {
    if options.is_empty() {
        return Err(SamplerError::Empty);
    }
    let power = if power.is_nan() || power <= 0.0 {
        1.0
    } else {
        power
    };
    let u: f64 = rng.gen();
    let index = (u.powf(power) * options.len() as f64).floor() as usize;
    Ok(&options[index.min(options.len() - 1)])
}

/// Draw values until `accept` holds, giving up after `max_attempts` draws.
///
/// Returns `Ok(None)` when the attempts are exhausted; errors from `draw`
/// propagate immediately.
pub fn resample_until<T, E, D, P>(
    max_attempts: u32,
    mut draw: D,
    mut accept: P,
) -> Result<Option<T>, E>
where
    D: FnMut() -> Result<T, E>,
    P: FnMut(&T) -> bool,
{
    for _ in 0..max_attempts {
        let candidate = draw()?;
        if accept(&candidate) {
            return Ok(Some(candidate));
        }
    }
    Ok(None)
}
