//! Type-erased views of an image buffer.
//!
//! [`BufferRef`] and [`BufferMut`] carry a borrowed slice together with its
//! component type. The typed accessors of [`Image`](crate::Image) only ever
//! unwrap the variant that matches the requested type, so a buffer is never
//! reinterpreted as a different numeric type.

use crate::pixel::ComponentType;

macro_rules! buffer_enums {
    ($($variant:ident($t:ty)),* $(,)?) => {
        /// Borrowed, typed view of a contiguous image buffer.
        #[derive(Debug, Clone, Copy, PartialEq)]
        pub enum BufferRef<'a> {
            $(
                #[doc = concat!("`", stringify!($t), "` components")]
                $variant(&'a [$t]),
            )*
        }

        /// Mutable, typed view of a contiguous image buffer.
        #[derive(Debug, PartialEq)]
        pub enum BufferMut<'a> {
            $(
                #[doc = concat!("`", stringify!($t), "` components")]
                $variant(&'a mut [$t]),
            )*
        }

        impl<'a> BufferRef<'a> {
            /// Component type of the viewed buffer.
            pub fn component_type(&self) -> ComponentType {
                match self {
                    $(Self::$variant(_) => ComponentType::$variant,)*
                }
            }

            /// Number of stored components.
            pub fn len(&self) -> usize {
                match self {
                    $(Self::$variant(s) => s.len(),)*
                }
            }

            /// Whether the buffer holds no components.
            pub fn is_empty(&self) -> bool {
                self.len() == 0
            }

            /// Reads element `i` as `u64` with `as` semantics.
            ///
            /// Signed integers are sign-extended, so a later `as` narrowing
            /// gives the same result as casting the original value directly.
            ///
            /// # Panics
            ///
            /// Panics if `i >= self.len()`.
            #[inline]
            pub fn get_u64(&self, i: usize) -> u64 {
                match self {
                    $(Self::$variant(s) => s[i] as u64,)*
                }
            }

            /// Raw bytes of the buffer in native endianness.
            pub fn as_bytes(&self) -> &'a [u8] {
                match *self {
                    $(Self::$variant(s) => bytemuck::cast_slice(s),)*
                }
            }

            /// Converts this buffer element-wise into `dst` with `as` semantics.
            pub fn convert_into(&self, dst: BufferMut<'_>) {
                use crate::pixel::Component;
                match *self {
                    $(Self::$variant(s) => <$t as Component>::convert_into(s, dst),)*
                }
            }
        }

        impl BufferMut<'_> {
            /// Component type of the viewed buffer.
            pub fn component_type(&self) -> ComponentType {
                match self {
                    $(Self::$variant(_) => ComponentType::$variant,)*
                }
            }

            /// Number of stored components.
            pub fn len(&self) -> usize {
                match self {
                    $(Self::$variant(s) => s.len(),)*
                }
            }

            /// Whether the buffer holds no components.
            pub fn is_empty(&self) -> bool {
                self.len() == 0
            }

            /// Writes `v` converted with `as` semantics at element `i`.
            ///
            /// # Panics
            ///
            /// Panics if `i >= self.len()`.
            #[inline]
            pub fn set_u64(&mut self, i: usize, v: u64) {
                match self {
                    $(Self::$variant(s) => s[i] = v as $t,)*
                }
            }
        }
    };
}

buffer_enums! {
    Int8(i8),
    UInt8(u8),
    Int16(i16),
    UInt16(u16),
    Int32(i32),
    UInt32(u32),
    Int64(i64),
    UInt64(u64),
    Float32(f32),
    Float64(f64),
}

/// Element-wise `as` conversion of a concrete slice into a [`BufferMut`].
macro_rules! convert_buffer {
    ($src:expr, $dst:expr) => {{
        use $crate::buffer::BufferMut;
        match $dst {
            BufferMut::Int8(d) => $crate::buffer::cast_slice!($src, d, i8),
            BufferMut::UInt8(d) => $crate::buffer::cast_slice!($src, d, u8),
            BufferMut::Int16(d) => $crate::buffer::cast_slice!($src, d, i16),
            BufferMut::UInt16(d) => $crate::buffer::cast_slice!($src, d, u16),
            BufferMut::Int32(d) => $crate::buffer::cast_slice!($src, d, i32),
            BufferMut::UInt32(d) => $crate::buffer::cast_slice!($src, d, u32),
            BufferMut::Int64(d) => $crate::buffer::cast_slice!($src, d, i64),
            BufferMut::UInt64(d) => $crate::buffer::cast_slice!($src, d, u64),
            BufferMut::Float32(d) => $crate::buffer::cast_slice!($src, d, f32),
            BufferMut::Float64(d) => $crate::buffer::cast_slice!($src, d, f64),
        }
    }};
}

#[cfg(feature = "parallel")]
macro_rules! cast_slice {
    ($src:expr, $dst:expr, $t:ty) => {{
        use rayon::prelude::*;
        debug_assert_eq!($src.len(), $dst.len());
        $dst.par_iter_mut()
            .zip($src.par_iter())
            .for_each(|(d, &s)| *d = s as $t);
    }};
}

#[cfg(not(feature = "parallel"))]
macro_rules! cast_slice {
    ($src:expr, $dst:expr, $t:ty) => {{
        debug_assert_eq!($src.len(), $dst.len());
        for (d, &s) in $dst.iter_mut().zip($src.iter()) {
            *d = s as $t;
        }
    }};
}

pub(crate) use cast_slice;
pub(crate) use convert_buffer;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_type_and_len() {
        let data = [1i16, -2, 3];
        let buf = BufferRef::Int16(&data);
        assert_eq!(buf.component_type(), ComponentType::Int16);
        assert_eq!(buf.len(), 3);
        assert_eq!(buf.get_u64(1) as i16, -2);
        assert_eq!(buf.as_bytes().len(), 6);
    }

    #[test]
    fn test_convert_truncates() {
        let src = [1.9f32, -1.9, 300.0];
        let mut dst = [0u8; 3];
        BufferRef::Float32(&src).convert_into(BufferMut::UInt8(&mut dst));
        assert_eq!(dst, [1, 0, 255]);

        let src = [300i32, -1];
        let mut dst = [0u8; 2];
        BufferRef::Int32(&src).convert_into(BufferMut::UInt8(&mut dst));
        assert_eq!(dst, [44, 255]);
    }

    #[test]
    fn test_integer_bits_match_direct_cast() {
        let src = [300i16, -1, 5];
        let view = BufferRef::Int16(&src);
        let mut dst = [0u8; 3];
        let mut out = BufferMut::UInt8(&mut dst);
        for i in 0..src.len() {
            out.set_u64(i, view.get_u64(i));
        }
        assert_eq!(dst, [300i16 as u8, -1i16 as u8, 5]);

        let mut wide = [0u64; 1];
        BufferMut::UInt64(&mut wide).set_u64(0, (1 << 60) + 1);
        assert_eq!(wide, [(1 << 60) + 1]);
    }
}
