use crate::{error::RuntimeError, interpreter::evaluator::core::EvalResult};

/// Largest integer value exactly representable as an `f64` (`2^53 - 1`).
pub const MAX_SAFE_U64_INT: u64 = 9_007_199_254_740_991;

/// Safely converts an `i64` to `f64` if and only if it is exactly
/// representable.
///
/// ## Errors
/// Returns `Err(error)` if the value exceeds `MAX_SAFE_U64_INT` in absolute
/// value.
///
/// ## Example
/// ```
/// use stencil::util::num::{MAX_SAFE_U64_INT, i64_to_f64_checked};
///
/// // Works for safe values
/// let result = i64_to_f64_checked(42, "too big!");
/// assert_eq!(result.unwrap(), 42.0);
///
/// // Fails for values outside safe range
/// let big = MAX_SAFE_U64_INT as i64 + 1;
/// assert!(i64_to_f64_checked(big, "too big!").is_err());
/// ```
#[allow(clippy::cast_precision_loss)]
pub fn i64_to_f64_checked<E>(value: i64, error: E) -> Result<f64, E> {
    if value.unsigned_abs() > MAX_SAFE_U64_INT {
        return Err(error);
    }
    Ok(value as f64)
}

/// Safely converts an `f64` to `i64` if the value is finite, within range, and
/// not fractional.
///
/// # Errors
/// - `TypeError` for NaN and infinities.
/// - `LiteralTooLarge` when the value lies outside the `i64` range.
/// - `RealIsFractional` when the value has a fractional part.
///
/// # Example
/// ```
/// use stencil::{error::RuntimeError, util::num::f64_to_i64_checked};
///
/// assert_eq!(f64_to_i64_checked(1000.0, 1).unwrap(), 1000);
///
/// let err = f64_to_i64_checked(1.5, 123).unwrap_err();
/// assert!(matches!(err, RuntimeError::RealIsFractional { line: 123 }));
///
/// let err = f64_to_i64_checked(1e20, 5).unwrap_err();
/// assert!(matches!(err, RuntimeError::LiteralTooLarge { line: 5 }));
/// ```
#[allow(clippy::cast_possible_truncation)]
#[allow(clippy::cast_precision_loss)]
pub fn f64_to_i64_checked(value: f64, line: usize) -> EvalResult<i64> {
    if !value.is_finite() {
        return Err(RuntimeError::TypeError { details: format!("Cannot convert non-finite value {value} to an integer"),
                                             line });
    }
    if value < i64::MIN as f64 || value >= i64::MAX as f64 {
        return Err(RuntimeError::LiteralTooLarge { line });
    }
    if value.fract() != 0.0 {
        return Err(RuntimeError::RealIsFractional { line });
    }
    Ok(value as i64)
}

/// Converts a length or count to `i64`.
///
/// # Errors
/// `LiteralTooLarge` if the value does not fit.
pub fn usize_to_i64_checked(value: usize, line: usize) -> EvalResult<i64> {
    i64::try_from(value).map_err(|_| RuntimeError::LiteralTooLarge { line })
}

/// Resolves a possibly negative index against a sequence length.
///
/// Negative indices count from the end, so `-1` is the last element.
///
/// # Errors
/// `IndexOutOfBounds` if the resolved position is outside `0..len`.
///
/// # Example
/// ```
/// use stencil::util::num::resolve_index;
///
/// assert_eq!(resolve_index(1, 3, 0).unwrap(), 1);
/// assert_eq!(resolve_index(-1, 3, 0).unwrap(), 2);
/// assert!(resolve_index(3, 3, 0).is_err());
/// assert!(resolve_index(-4, 3, 0).is_err());
/// ```
pub fn resolve_index(index: i64, len: usize, line: usize) -> EvalResult<usize> {
    let out_of_bounds = || RuntimeError::IndexOutOfBounds { len,
                                                            found: index,
                                                            line };
    let signed_len = usize_to_i64_checked(len, line)?;
    let position = if index < 0 { signed_len + index } else { index };

    if position < 0 || position >= signed_len {
        return Err(out_of_bounds());
    }
    usize::try_from(position).map_err(|_| out_of_bounds())
}

/// Longest string, in bytes, or list, in elements, that repetition and
/// `range` may build.
pub const MAX_SEQUENCE_LEN: usize = 1 << 24;

/// Checks a sequence length against [`MAX_SEQUENCE_LEN`].
///
/// # Errors
/// `SequenceTooLong` if `len` exceeds the limit.
pub const fn check_sequence_len(len: usize, line: usize) -> EvalResult<()> {
    if len > MAX_SEQUENCE_LEN {
        return Err(RuntimeError::SequenceTooLong { limit: MAX_SEQUENCE_LEN,
                                                   line });
    }
    Ok(())
}

/// Turns the count of a repetition into the number of copies to build.
///
/// Negative counts and empty sequences repeat zero times.
///
/// # Errors
/// `SequenceTooLong` if `len * count` would exceed [`MAX_SEQUENCE_LEN`].
///
/// # Example
/// ```
/// use stencil::util::num::{MAX_SEQUENCE_LEN, repeat_count};
///
/// assert_eq!(repeat_count(2, 3, 1).unwrap(), 3);
/// assert_eq!(repeat_count(2, -1, 1).unwrap(), 0);
/// assert_eq!(repeat_count(0, i64::MAX, 1).unwrap(), 0);
/// assert!(repeat_count(2, i64::MAX, 1).is_err());
/// assert!(repeat_count(1, MAX_SEQUENCE_LEN as i64 + 1, 1).is_err());
/// ```
pub fn repeat_count(len: usize, count: i64, line: usize) -> EvalResult<usize> {
    let count = usize::try_from(count).unwrap_or(0);
    if len == 0 || count == 0 {
        return Ok(0);
    }
    let total = len.checked_mul(count)
                   .ok_or(RuntimeError::SequenceTooLong { limit: MAX_SEQUENCE_LEN,
                                                          line })?;
    check_sequence_len(total, line)?;
    Ok(count)
}
