//! Decoding of digit strings written in a radix between 2 and 36.
//!
//! Each digit is checked against the full alphanumeric alphabet, not against
//! the radix it is read in: `"f"` in radix 10 decodes to 15 without error.
//! Use [`digits_within_base`] to detect such input.

use rug::Integer;

use crate::error::ReconstructionError;

/// Map `'0'..='9'` to 0-9 and `'a'..='z'` (in either case) to 10-35.
pub fn decode_digit(c: char) -> Result<u32, ReconstructionError> {
    match c {
        '0'..='9' => Ok(c as u32 - '0' as u32),
        'a'..='z' => Ok(c as u32 - 'a' as u32 + 10),
        'A'..='Z' => Ok(c as u32 - 'A' as u32 + 10),
        _ => Err(ReconstructionError::malformed(format!(
            "invalid digit char: {:?}",
            c
        ))),
    }
}

/// Decode `digits` in radix `base`, most significant digit first.
/// An empty string decodes to 0.
pub fn decode_value(digits: &str, base: u32) -> Result<Integer, ReconstructionError> {
    let mut acc = Integer::new();
    for c in digits.chars() {
        let d = decode_digit(c)?;
        acc *= base;
        acc += d;
    }
    Ok(acc)
}

/// Check that every digit of `digits` is smaller than `base`.
pub fn digits_within_base(digits: &str, base: u32) -> bool {
    digits
        .chars()
        .all(|c| decode_digit(c).map(|d| d < base).unwrap_or(false))
}
