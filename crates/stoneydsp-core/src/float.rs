//! IEEE-754 limits and special values for `float_t` and `double_t`.

use crate::types::FixedWidth;

/// Binary floating-point limits as exposed by C `<float.h>`.
///
/// Arithmetic never traps: overflow rounds to an infinity and underflow to a
/// subnormal or a signed zero.
pub trait IeeeFloat: FixedWidth {
    /// Smallest positive normal value (C `FLT_MIN` / `DBL_MIN`).
    const MIN_POSITIVE: Self;
    /// Most negative finite value.
    const LOWEST: Self;
    /// Distance from 1.0 to the next representable value.
    const EPSILON: Self;
    /// Smallest positive subnormal value.
    const DENORM_MIN: Self;
    /// Significand precision in bits, including the implicit bit.
    const MANTISSA_DIGITS: u32;

    fn quiet_nan() -> Self;
    fn infinity() -> Self;
    fn neg_infinity() -> Self;

    fn is_nan(self) -> bool;
    /// Positive or negative infinity.
    fn is_inf(self) -> bool;
    fn is_subnormal(self) -> bool;
}

macro_rules! impl_ieee_float {
    ($t:ty, $denorm_min:expr) => {
        impl IeeeFloat for $t {
            const MIN_POSITIVE: Self = <$t>::MIN_POSITIVE;
            const LOWEST: Self = <$t>::MIN;
            const EPSILON: Self = <$t>::EPSILON;
            const DENORM_MIN: Self = $denorm_min;
            const MANTISSA_DIGITS: u32 = <$t>::MANTISSA_DIGITS;

            fn quiet_nan() -> Self {
                <$t>::NAN
            }

            fn infinity() -> Self {
                <$t>::INFINITY
            }

            fn neg_infinity() -> Self {
                <$t>::NEG_INFINITY
            }

            fn is_nan(self) -> bool {
                <$t>::is_nan(self)
            }

            fn is_inf(self) -> bool {
                <$t>::is_infinite(self)
            }

            fn is_subnormal(self) -> bool {
                <$t>::is_subnormal(self)
            }
        }
    };
}

impl_ieee_float!(f32, 1.401_298_5e-45_f32);
impl_ieee_float!(f64, 4.940_656_458_412_465_4e-324_f64);
