//! Seasonal effects over a fixed cycle length

use crate::{MathError, Result};

/// Average deviation per season position, centred so the offsets sum to zero.
///
/// `residuals[i]` belongs to position `i % season_length`. Positions that
/// never occur keep an offset of zero before centring.
pub fn seasonal_offsets(residuals: &[f64], season_length: usize) -> Result<Vec<f64>> {
    if season_length == 0 {
        return Err(MathError::InvalidInput(
            "Season length must be greater than zero".to_string(),
        ));
    }
    if residuals.len() < season_length {
        return Err(MathError::InsufficientData(format!(
            "Need a full cycle of {} observations, have {}",
            season_length,
            residuals.len()
        )));
    }

    let mut sums = vec![0.0; season_length];
    let mut counts = vec![0usize; season_length];
    for (i, &r) in residuals.iter().enumerate() {
        sums[i % season_length] += r;
        counts[i % season_length] += 1;
    }

    let raw: Vec<f64> = sums
        .iter()
        .zip(&counts)
        .map(|(&s, &c)| if c == 0 { 0.0 } else { s / c as f64 })
        .collect();
    let centre = raw.iter().sum::<f64>() / season_length as f64;

    Ok(raw.into_iter().map(|o| o - centre).collect())
}
