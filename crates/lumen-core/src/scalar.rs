//! Element types a projection can expose.

use std::fmt::Debug;

/// A numeric element type stored in simulation object attributes.
///
/// Projections are generic over the scalar so an attribute is exposed
/// in its native width. [`to_f64`](Scalar::to_f64) is the widening used
/// by consumers that only speak double precision.
pub trait Scalar: Copy + PartialEq + Debug + Send + Sync + 'static {
    /// The additive identity, used to size owned buffers.
    const ZERO: Self;

    /// Short type label reported in export metadata (e.g. `"f64"`).
    const TYPE_NAME: &'static str;

    /// Widen to `f64`. 64-bit integers above 2^53 lose precision.
    fn to_f64(self) -> f64;
}

macro_rules! impl_scalar {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Scalar for $ty {
                const ZERO: Self = 0 as $ty;
                const TYPE_NAME: &'static str = stringify!($ty);

                #[inline]
                fn to_f64(self) -> f64 {
                    self as f64
                }
            }
        )*
    };
}

impl_scalar!(f32, f64, i32, i64, u32, u64);
