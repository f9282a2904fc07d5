//! Assertion helpers for floating-point comparisons in tests.

/// Maps an `f64` onto an ordered `u64` scale where adjacent floats map
/// to adjacent integers. Negative values have the sign bit flipped so
/// the whole line orders monotonically.
pub fn f64_to_ordered_u64(value: f64) -> u64 {
    let bits = value.to_bits();
    if bits & (1 << 63) != 0 {
        !bits
    } else {
        bits | (1 << 63)
    }
}

/// Distance between two floats in units of least precision.
pub fn ulp_diff(a: f64, b: f64) -> u64 {
    let ia = f64_to_ordered_u64(a);
    let ib = f64_to_ordered_u64(b);
    ia.abs_diff(ib)
}

#[track_caller]
pub fn assert_ulp_le(a: f64, b: f64, max_ulp: u64, ctx: &str) {
    if a == b {
        return;
    }
    assert!(
        a.is_finite() && b.is_finite(),
        "non-finite operand in ULP comparison: {a} vs {b}{ctx}"
    );
    let diff = ulp_diff(a, b);
    assert!(
        diff <= max_ulp,
        "{a} ({:#018x}) and {b} ({:#018x}) differ by {diff} ULP (allowed {max_ulp}){ctx}",
        a.to_bits(),
        b.to_bits(),
    );
}

/// Asserts two floats are within a ULP budget of each other.
#[macro_export]
macro_rules! assert_ulp_lt {
    ($a:expr, $b:expr, $max_ulp:expr) => {
        $crate::test_helpers::assert_ulp_le($a, $b, $max_ulp, "")
    };
    ($a:expr, $b:expr, $max_ulp:expr, $($arg:tt)*) => {
        $crate::test_helpers::assert_ulp_le($a, $b, $max_ulp, &format!(": {}", format!($($arg)*)))
    };
}
