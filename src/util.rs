/// Numeric conversion helpers.
///
/// Safe conversions between `i64`, `usize` and `f64` that never lose data
/// silently, plus index resolution for lists and strings. All functions
/// return a `Result`, which is `Ok` if the conversion is lossless and valid,
/// or an error if the value is out of range.
pub mod num;
