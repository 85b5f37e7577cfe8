use crate::errors::CoreError;

/// Source of integer jitter for projections and mock data.
///
/// `sample(min, max)` returns a value in `min..max`, or `min` when the range
/// is empty.
pub trait NoiseSource {
    fn sample(&mut self, min: i64, max: i64) -> Result<i64, CoreError>;
}

/// Draws from the operating system's CSPRNG via `getrandom`.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsNoise;

impl NoiseSource for OsNoise {
    fn sample(&mut self, min: i64, max: i64) -> Result<i64, CoreError> {
        if max <= min {
            return Ok(min);
        }
        let span = max.abs_diff(min);

        let mut buf = [0u8; 8];
        getrandom::getrandom(&mut buf)
            .map_err(|e| CoreError::Randomness(format!("Failed to read OS randomness: {e}")))?;

        let offset = u64::from_le_bytes(buf) % span;
        Ok(min.wrapping_add_unsigned(offset))
    }
}

/// Always returns the same offset, clamped into the requested range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FixedNoise(pub i64);

impl NoiseSource for FixedNoise {
    fn sample(&mut self, min: i64, max: i64) -> Result<i64, CoreError> {
        if max <= min {
            return Ok(min);
        }
        Ok(self.0.clamp(min, max - 1))
    }
}
