/// A value that can be stored in a tensor.
///
/// Every element kind must provide a distinguished zero. Sparse representations
/// never store it explicitly, and freshly created tensors are filled with it.
///
/// The trait is implemented for the primitive numeric types, `bool` and `char`.
pub trait Element: Clone + PartialEq + std::fmt::Debug {
    /// Returns the zero value of the element kind.
    fn zero() -> Self;

    /// Returns true if the value equals [`Element::zero`].
    #[inline]
    fn is_zero(&self) -> bool {
        *self == Self::zero()
    }
}

/// An element kind with a multiplicative identity, required to build identity tensors.
pub trait HasOne: Element {
    /// Returns the one value of the element kind.
    fn one() -> Self;
}

macro_rules! impl_numeric_element {
    ($($t:ty),*) => {
        $(
            impl Element for $t {
                #[inline]
                fn zero() -> Self {
                    <$t as num_traits::Zero>::zero()
                }

                #[inline]
                fn is_zero(&self) -> bool {
                    num_traits::Zero::is_zero(self)
                }
            }

            impl HasOne for $t {
                #[inline]
                fn one() -> Self {
                    <$t as num_traits::One>::one()
                }
            }
        )*
    };
}

impl_numeric_element!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize, f32, f64);

impl Element for bool {
    #[inline]
    fn zero() -> Self {
        false
    }
}

impl HasOne for bool {
    #[inline]
    fn one() -> Self {
        true
    }
}

impl Element for char {
    #[inline]
    fn zero() -> Self {
        '\0'
    }
}

impl HasOne for char {
    #[inline]
    fn one() -> Self {
        '\u{1}'
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_zero_one() {
        assert_eq!(<u8 as Element>::zero(), 0);
        assert_eq!(<i64 as HasOne>::one(), 1);
        assert_eq!(<f32 as Element>::zero(), 0.0);
        assert!(Element::is_zero(&0.0f64));
        assert!(!Element::is_zero(&-1i16));
    }

    #[test]
    fn test_negative_zero_is_zero() {
        // -0.0 compares equal to 0.0 and must be elided like it
        assert!(Element::is_zero(&-0.0f32));
    }

    #[test]
    fn test_bool_and_char() {
        assert!(!<bool as Element>::zero());
        assert!(<bool as HasOne>::one());
        assert_eq!(<char as Element>::zero(), '\0');
        assert!(Element::is_zero(&'\0'));
        assert!(!Element::is_zero(&'a'));
    }
}
