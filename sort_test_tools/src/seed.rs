use std::time::{SystemTime, UNIX_EPOCH};

use thiserror::Error;

/// Seeds encode a 32 bit multiplier in the high half and a 32 bit increment in the low half,
/// so the high half must not be zero.
pub const MIN_SEED: u64 = 0x1_0000_0000;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SeedError {
    #[error("invalid seed '{0}', use a decimal or hexadecimal number")]
    Invalid(String),
    #[error("seed {0:#x} must be equal or greater than {min:#x}", min = MIN_SEED)]
    TooSmall(u64),
}

/// Parses a decimal or `0x` prefixed hexadecimal seed and validates it.
pub fn parse_seed(arg: &str) -> Result<u64, SeedError> {
    let trimmed = arg.trim();
    let parsed = match trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => trimmed.parse::<u64>(),
    };

    let seed = parsed.map_err(|_| SeedError::Invalid(arg.to_owned()))?;
    validate(seed)
}

pub fn validate(seed: u64) -> Result<u64, SeedError> {
    if seed < MIN_SEED {
        return Err(SeedError::TooSmall(seed));
    }

    Ok(seed)
}

/// Seed material from the wall clock, used when no seed was given.
pub fn seed_from_time() -> u64 {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();

    let high = (now.as_secs() as u32).max(1) as u64;
    let low = now.subsec_nanos() as u64;

    (high << 32) | low
}
