/// Floor division for signed 128-bit values (`den` must be non-zero).
pub(crate) fn div_floor_i128(num: i128, den: i128) -> i128 {
    let q = num / den;
    if (num % den != 0) && ((num < 0) != (den < 0)) {
        q - 1
    } else {
        q
    }
}

/// Ceiling division for signed 128-bit values (`den` must be non-zero).
pub(crate) fn div_ceil_i128(num: i128, den: i128) -> i128 {
    let q = num / den;
    if (num % den != 0) && ((num < 0) == (den < 0)) {
        q + 1
    } else {
        q
    }
}

pub(crate) fn gcd_u64(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

/// Saturating conversion of an `i128` intermediate back to `i64`.
pub(crate) fn clamp_i64(v: i128) -> i64 {
    v.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
