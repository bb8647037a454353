use num_traits::{PrimInt, Unsigned};

/// Trait for aligning a numeric value to a given byte boundary
///
/// # Example
/// ```
/// # use polydata_core::math::*;
/// assert_eq!(8, 5_u32.align_to(8));
/// assert_eq!(3, 5_u32.padding_to(8));
/// ```
pub trait Alignable: Sized {
    /// Align the associated value to an `alignment` bytes boundary
    fn align_to(&self, alignment: Self) -> Self;
    /// Number of padding bytes needed to reach the next `alignment` bytes boundary
    fn padding_to(&self, alignment: Self) -> Self;
}

impl<T: PrimInt + Unsigned> Alignable for T {
    fn align_to(&self, alignment: Self) -> Self {
        if alignment.is_zero() {
            *self
        } else {
            ((*self + alignment - T::one()) / alignment) * alignment
        }
    }

    fn padding_to(&self, alignment: Self) -> Self {
        self.align_to(alignment) - *self
    }
}
