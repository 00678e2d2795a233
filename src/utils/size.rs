//! Human-friendly memory sizes.
//!
//! Sizes on the command line are expressed in megabytes, optionally followed
//! by an `M` or `G` unit. Zero doubles as the "invalid" marker: a token that
//! can't be understood parses to zero, exactly like a literal `0` does.

use std::convert::Infallible;

pub const BYTES_PER_MEGABYTE: usize = 1024 * 1024;
const MEGABYTES_PER_GIGABYTE: f64 = 1024.0;

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum SizeError {
    #[error("invalid chunk size '{0}'")]
    InvalidChunkSize(String),
}

/// Splits the leading decimal number off `input`, returning its value and
/// whatever follows it. Leading whitespace, a sign, a fractional part and an
/// exponent are accepted. Returns `None` when `input` doesn't start with a
/// number.
fn split_number(input: &str) -> Option<(f64, &str)> {
    let trimmed = input.trim_start();
    let bytes = trimmed.as_bytes();

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if bytes.get(end) == Some(&b'.') {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        if digits > 0 || frac_end > frac_start {
            digits += frac_end - frac_start;
            end = frac_end;
        }
    }

    if digits == 0 {
        return None;
    }

    // An exponent only counts if at least one digit follows it.
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits {
            end = exp_end;
        }
    }

    let value = trimmed[..end].parse::<f64>().ok()?;
    Some((value, &trimmed[end..]))
}

/// Parses a size such as `100`, `512M` or `2G` into megabytes.
///
/// Only the first character after the number is inspected as the unit, so
/// `10MB` is ten megabytes. Negative numbers, unknown units and tokens that
/// aren't numbers at all yield `0`.
pub fn parse_megabytes(input: &str) -> usize {
    let (value, rest) = split_number(input).unwrap_or((0.0, input));
    if value < 0.0 {
        return 0;
    }

    let megabytes = match rest.chars().next() {
        None | Some('M' | 'm') => value,
        Some('G' | 'g') => value * MEGABYTES_PER_GIGABYTE,
        Some(_) => return 0,
    };

    // Float to int casts truncate the fraction and saturate on overflow.
    megabytes as usize
}

pub fn megabytes_to_bytes(megabytes: usize) -> usize {
    megabytes.saturating_mul(BYTES_PER_MEGABYTE)
}

pub fn bytes_to_megabytes(bytes: usize) -> f64 {
    bytes as f64 / BYTES_PER_MEGABYTE as f64
}

/// Value parser for the chunk size: the zero marker is rejected, whether it
/// came from a literal zero or from a token that failed to parse.
pub fn chunk_size_megabytes(input: &str) -> Result<usize, SizeError> {
    match parse_megabytes(input) {
        0 => Err(SizeError::InvalidChunkSize(input.to_string())),
        megabytes => Ok(megabytes),
    }
}

/// Value parser for the allocation ceiling. Zero means unlimited, so every
/// token is accepted, including ones that fail to parse.
pub fn max_allocation_megabytes(input: &str) -> Result<usize, Infallible> {
    Ok(parse_megabytes(input))
}
