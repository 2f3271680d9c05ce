//! The semantic type table.
//!
//! Each alias is declared exactly once, in the `semantic_types!` invocation
//! below, which also emits its row in [`TYPE_TABLE`] and the compile-time
//! checks that its width, alignment and signedness match the backing type.

use std::ffi::{
    c_int, c_long, c_longlong, c_schar, c_short, c_uchar, c_uint, c_ulong, c_ulonglong, c_ushort,
};
use std::fmt;

use serde::Serialize;

use crate::platform::ByteOrder;

pub use std::num::Wrapping;

/// Signedness of a numeric type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Signedness {
    Signed,
    Unsigned,
}

impl fmt::Display for Signedness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Signed => write!(f, "signed"),
            Self::Unsigned => write!(f, "unsigned"),
        }
    }
}

/// Which family a semantic type belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TypeKind {
    /// Width fixed by contract on every target.
    Fixed,
    /// Width follows the target (object size, pointer difference, C `int`...).
    Native,
    /// IEEE-754 floating point.
    Float,
}

/// One row of the type table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct SemanticType {
    /// Alias name in this crate (e.g. "int16").
    pub name: &'static str,
    /// Equivalent C spelling (e.g. "int16_t").
    pub c_name: &'static str,
    /// Width in bits on the compilation target.
    pub width_bits: u32,
    pub signedness: Signedness,
    /// Alignment in bytes on the compilation target.
    pub align: usize,
    pub kind: TypeKind,
}

impl SemanticType {
    /// Look up a row by alias name.
    pub fn lookup(name: &str) -> Option<&'static SemanticType> {
        TYPE_TABLE.iter().find(|t| t.name == name)
    }

    /// Size in bytes.
    pub fn size(&self) -> usize {
        (self.width_bits / 8) as usize
    }
}

mod sealed {
    pub trait Sealed {}
}

/// A numeric type whose values can be copied byte-for-byte.
///
/// Every bit pattern of `Bytes` is a valid value, so
/// `deserialize(serialize(v)) == v` for every `v` (bitwise for floats, which
/// covers NaN payloads).
pub trait FixedWidth:
    Copy + PartialEq + PartialOrd + fmt::Debug + Send + Sync + 'static + sealed::Sealed
{
    /// Width in bits.
    const WIDTH_BITS: u32;
    /// Whether the type can represent negative values.
    const SIGNED: bool;
    /// Smallest finite value (C++ `lowest()` for floats).
    const MIN: Self;
    /// Largest finite value.
    const MAX: Self;

    /// Raw byte representation, `[u8; WIDTH_BITS / 8]`.
    type Bytes: AsRef<[u8]> + AsMut<[u8]> + Copy + Default + fmt::Debug + PartialEq;

    /// Raw bytes in native order.
    fn serialize(self) -> Self::Bytes;

    /// Rebuild a value from raw bytes in native order.
    fn deserialize(bytes: Self::Bytes) -> Self;

    /// Bytes in an explicit order.
    fn encode(self, order: ByteOrder) -> Self::Bytes;

    /// Rebuild a value from bytes in an explicit order.
    fn decode(bytes: Self::Bytes, order: ByteOrder) -> Self;

    /// Read a value from the front of `buf`; `None` if `buf` is too short.
    fn read_from(buf: &[u8]) -> Option<Self> {
        let mut bytes = Self::Bytes::default();
        let len = bytes.as_ref().len();
        bytes.as_mut().copy_from_slice(buf.get(..len)?);
        Some(Self::deserialize(bytes))
    }

    /// Write the value to the front of `buf`, returning the number of bytes
    /// written; `None` (and `buf` untouched) if `buf` is too short.
    fn write_to(self, buf: &mut [u8]) -> Option<usize> {
        let bytes = self.serialize();
        let len = bytes.as_ref().len();
        buf.get_mut(..len)?.copy_from_slice(bytes.as_ref());
        Some(len)
    }
}

/// Fixed-width integers with modular (two's complement) arithmetic.
pub trait FixedInt: FixedWidth + Eq + Ord + std::hash::Hash {
    fn wrapping_add(self, rhs: Self) -> Self;
    fn wrapping_sub(self, rhs: Self) -> Self;
    fn wrapping_mul(self, rhs: Self) -> Self;
    fn wrapping_neg(self) -> Self;
}

macro_rules! impl_fixed_width {
    ($($t:ty => $signed:literal),* $(,)?) => {
        $(
            impl sealed::Sealed for $t {}

            impl FixedWidth for $t {
                const WIDTH_BITS: u32 = (std::mem::size_of::<$t>() * 8) as u32;
                const SIGNED: bool = $signed;
                const MIN: Self = <$t>::MIN;
                const MAX: Self = <$t>::MAX;

                type Bytes = [u8; std::mem::size_of::<$t>()];

                fn serialize(self) -> Self::Bytes {
                    self.to_ne_bytes()
                }

                fn deserialize(bytes: Self::Bytes) -> Self {
                    <$t>::from_ne_bytes(bytes)
                }

                fn encode(self, order: ByteOrder) -> Self::Bytes {
                    match order {
                        ByteOrder::Little => self.to_le_bytes(),
                        ByteOrder::Big => self.to_be_bytes(),
                    }
                }

                fn decode(bytes: Self::Bytes, order: ByteOrder) -> Self {
                    match order {
                        ByteOrder::Little => <$t>::from_le_bytes(bytes),
                        ByteOrder::Big => <$t>::from_be_bytes(bytes),
                    }
                }
            }
        )*
    };
}

macro_rules! impl_fixed_int {
    ($($t:ty),* $(,)?) => {
        $(
            impl FixedInt for $t {
                fn wrapping_add(self, rhs: Self) -> Self {
                    <$t>::wrapping_add(self, rhs)
                }

                fn wrapping_sub(self, rhs: Self) -> Self {
                    <$t>::wrapping_sub(self, rhs)
                }

                fn wrapping_mul(self, rhs: Self) -> Self {
                    <$t>::wrapping_mul(self, rhs)
                }

                fn wrapping_neg(self) -> Self {
                    <$t>::wrapping_neg(self)
                }
            }
        )*
    };
}

impl_fixed_width!(
    i8 => true, u8 => false,
    i16 => true, u16 => false,
    i32 => true, u32 => false,
    i64 => true, u64 => false,
    isize => true, usize => false,
    f32 => true, f64 => true,
);

impl_fixed_int!(i8, u8, i16, u16, i32, u32, i64, u64, isize, usize);

/// Declare semantic aliases together with their table and build-time checks.
///
/// Each row names an alias, its backing type, its width in bits, its
/// signedness, its [`TypeKind`] and its C spelling. The build fails unless
/// the backing type has exactly that width and signedness, and aligns like
/// the backing type.
///
/// ```
/// stoneydsp_core::semantic_types! {
///     pub const SAMPLE_TYPES;
///     /// A signed sample word.
///     sample_word = i32, bits: 32, signed: true, Fixed, "int32_t";
/// }
///
/// # fn main() {
/// assert_eq!(SAMPLE_TYPES[0].name, "sample_word");
/// assert_eq!(SAMPLE_TYPES[0].size(), 4);
/// # }
/// ```
///
/// A row whose width does not match its backing type does not build:
///
/// ```compile_fail
/// stoneydsp_core::semantic_types! {
///     pub const SAMPLE_TYPES;
///     sample_word = i32, bits: 16, signed: true, Fixed, "int16_t";
/// }
/// # fn main() {}
/// ```
///
/// Nor does one whose signedness does not:
///
/// ```compile_fail
/// stoneydsp_core::semantic_types! {
///     pub const SAMPLE_TYPES;
///     sample_word = u32, bits: 32, signed: true, Fixed, "int32_t";
/// }
/// # fn main() {}
/// ```
#[macro_export]
macro_rules! semantic_types {
    (
        $table_vis:vis const $table:ident;
        $(
            $(#[$doc:meta])*
            $name:ident = $backing:ty,
            bits: $bits:expr,
            signed: $signed:literal,
            $kind:ident,
            $c_name:literal;
        )*
    ) => {
        $(
            $(#[$doc])*
            #[allow(non_camel_case_types)]
            pub type $name = $backing;

            $crate::__static_assertions::const_assert_eq!(
                ::std::mem::size_of::<$name>() * 8,
                ($bits) as usize
            );
            $crate::__static_assertions::const_assert_eq!(
                ::std::mem::align_of::<$name>(),
                ::std::mem::align_of::<$backing>()
            );
            $crate::__static_assertions::const_assert!(
                <$name as $crate::types::FixedWidth>::SIGNED == $signed
            );
            $crate::__static_assertions::assert_impl_all!(
                $name: Copy, Send, Sync, $crate::types::FixedWidth
            );
        )*

        /// Every declared semantic type, in declaration order.
        $table_vis const $table: &[$crate::types::SemanticType] = &[$(
            $crate::types::SemanticType {
                name: stringify!($name),
                c_name: $c_name,
                width_bits: ($bits) as u32,
                signedness: if $signed {
                    $crate::types::Signedness::Signed
                } else {
                    $crate::types::Signedness::Unsigned
                },
                align: ::std::mem::align_of::<$name>(),
                kind: $crate::types::TypeKind::$kind,
            },
        )*];
    };
}

semantic_types! {
    pub const TYPE_TABLE;

    /// Exactly 8 signed bits.
    int8 = i8, bits: 8, signed: true, Fixed, "int8_t";
    /// Exactly 8 unsigned bits.
    uint8 = u8, bits: 8, signed: false, Fixed, "uint8_t";
    /// Exactly 16 signed bits.
    int16 = i16, bits: 16, signed: true, Fixed, "int16_t";
    /// Exactly 16 unsigned bits.
    uint16 = u16, bits: 16, signed: false, Fixed, "uint16_t";
    /// Exactly 32 signed bits.
    int32 = i32, bits: 32, signed: true, Fixed, "int32_t";
    /// Exactly 32 unsigned bits.
    uint32 = u32, bits: 32, signed: false, Fixed, "uint32_t";
    /// Exactly 64 signed bits.
    int64 = i64, bits: 64, signed: true, Fixed, "int64_t";
    /// Exactly 64 unsigned bits.
    uint64 = u64, bits: 64, signed: false, Fixed, "uint64_t";

    /// Unsigned size of an object; used for indexing, counts and sizes.
    size_t = usize, bits: usize::BITS, signed: false, Native, "size_t";
    /// Signed difference between two pointers.
    ptrdiff_t = isize, bits: isize::BITS, signed: true, Native, "ptrdiff_t";

    /// IEEE-754 single precision.
    float_t = f32, bits: 32, signed: true, Float, "float";
    /// IEEE-754 double precision.
    double_t = f64, bits: 64, signed: true, Float, "double";

    byte = c_schar, bits: c_schar::BITS, signed: true, Native, "signed char";
    character = c_schar, bits: c_schar::BITS, signed: true, Native, "signed char";
    short_int = c_short, bits: c_short::BITS, signed: true, Native, "short";
    integer = c_int, bits: c_int::BITS, signed: true, Native, "int";
    long_int = c_long, bits: c_long::BITS, signed: true, Native, "long";
    long_long_int = c_longlong, bits: c_longlong::BITS, signed: true, Native, "long long";
    ubyte = c_uchar, bits: c_uchar::BITS, signed: false, Native, "unsigned char";
    ucharacter = c_uchar, bits: c_uchar::BITS, signed: false, Native, "unsigned char";
    ushort_int = c_ushort, bits: c_ushort::BITS, signed: false, Native, "unsigned short";
    uint = c_uint, bits: c_uint::BITS, signed: false, Native, "unsigned int";
    ulong_int = c_ulong, bits: c_ulong::BITS, signed: false, Native, "unsigned long";
    ulong_long_int = c_ulonglong, bits: c_ulonglong::BITS, signed: false, Native,
        "unsigned long long";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_sizes() {
        assert_eq!(std::mem::size_of::<int8>(), 1);
        assert_eq!(std::mem::size_of::<uint8>(), 1);
        assert_eq!(std::mem::size_of::<int16>(), 2);
        assert_eq!(std::mem::size_of::<uint16>(), 2);
        assert_eq!(std::mem::size_of::<int32>(), 4);
        assert_eq!(std::mem::size_of::<uint32>(), 4);
        assert_eq!(std::mem::size_of::<int64>(), 8);
        assert_eq!(std::mem::size_of::<uint64>(), 8);
        assert_eq!(std::mem::size_of::<float_t>(), 4);
        assert_eq!(std::mem::size_of::<double_t>(), 8);
    }

    #[test]
    fn alignment_equals_size_up_to_32_bits() {
        assert_eq!(std::mem::align_of::<int8>(), 1);
        assert_eq!(std::mem::align_of::<uint8>(), 1);
        assert_eq!(std::mem::align_of::<int16>(), 2);
        assert_eq!(std::mem::align_of::<uint16>(), 2);
        assert_eq!(std::mem::align_of::<int32>(), 4);
        assert_eq!(std::mem::align_of::<uint32>(), 4);
        assert_eq!(std::mem::align_of::<float_t>(), 4);
    }

    // 32-bit x86 System V aligns 64-bit scalars to 4 bytes.
    #[cfg(target_pointer_width = "64")]
    #[test]
    fn alignment_equals_size_for_64_bit_types() {
        assert_eq!(std::mem::align_of::<int64>(), 8);
        assert_eq!(std::mem::align_of::<uint64>(), 8);
        assert_eq!(std::mem::align_of::<double_t>(), 8);
    }

    #[test]
    fn native_types_match_the_target() {
        assert_eq!(std::mem::size_of::<size_t>(), std::mem::size_of::<*const u8>());
        assert_eq!(std::mem::size_of::<ptrdiff_t>(), std::mem::size_of::<size_t>());
        assert_eq!(std::mem::align_of::<size_t>(), std::mem::align_of::<usize>());
        assert!(!<size_t as FixedWidth>::SIGNED);
        assert!(<ptrdiff_t as FixedWidth>::SIGNED);
    }

    #[test]
    fn signedness() {
        assert!(<int8 as FixedWidth>::SIGNED);
        assert!(!<uint8 as FixedWidth>::SIGNED);
        assert!(<int64 as FixedWidth>::SIGNED);
        assert!(!<uint64 as FixedWidth>::SIGNED);
        assert!(<float_t as FixedWidth>::SIGNED);
        assert!(<double_t as FixedWidth>::SIGNED);
    }

    #[test]
    fn limits() {
        assert_eq!(<int8 as FixedWidth>::MIN, -128);
        assert_eq!(<int8 as FixedWidth>::MAX, 127);
        assert_eq!(<int16 as FixedWidth>::MIN, -32768);
        assert_eq!(<int16 as FixedWidth>::MAX, 32767);
        assert_eq!(<int32 as FixedWidth>::MIN, -2147483648);
        assert_eq!(<int32 as FixedWidth>::MAX, 2147483647);
        assert_eq!(<int64 as FixedWidth>::MIN, -9223372036854775808);
        assert_eq!(<int64 as FixedWidth>::MAX, 9223372036854775807);
        assert_eq!(<uint8 as FixedWidth>::MIN, 0);
        assert_eq!(<uint8 as FixedWidth>::MAX, 255);
        assert_eq!(<uint16 as FixedWidth>::MAX, 65535);
        assert_eq!(<uint32 as FixedWidth>::MAX, 4294967295);
        assert_eq!(<uint64 as FixedWidth>::MAX, 18446744073709551615);
    }

    #[test]
    fn wraparound_at_every_width() {
        assert_eq!(FixedInt::wrapping_add(127 as int8, 1), -128);
        assert_eq!(FixedInt::wrapping_add(255 as uint8, 1), 0);
        assert_eq!(FixedInt::wrapping_add(32767 as int16, 1), -32768);
        assert_eq!(FixedInt::wrapping_add(65535 as uint16, 1), 0);
        assert_eq!(FixedInt::wrapping_add(int32::MAX, 1), int32::MIN);
        assert_eq!(FixedInt::wrapping_add(uint32::MAX, 1), 0);
        assert_eq!(FixedInt::wrapping_add(int64::MAX, 1), int64::MIN);
        assert_eq!(FixedInt::wrapping_add(uint64::MAX, 1), 0);

        assert_eq!(FixedInt::wrapping_sub(-128 as int8, 1), 127);
        assert_eq!(FixedInt::wrapping_sub(int16::MIN, 1), int16::MAX);
        assert_eq!(FixedInt::wrapping_sub(int32::MIN, 1), int32::MAX);
        assert_eq!(FixedInt::wrapping_sub(int64::MIN, 1), int64::MAX);
        assert_eq!(FixedInt::wrapping_sub(0 as uint8, 1), 255);
    }

    #[test]
    fn wrapping_mul_and_neg() {
        assert_eq!(FixedInt::wrapping_mul(16 as int8, 8), -128);
        assert_eq!(FixedInt::wrapping_mul(0x8000 as uint16, 2), 0);
        assert_eq!(FixedInt::wrapping_neg(int32::MIN), int32::MIN);
        assert_eq!(FixedInt::wrapping_neg(1 as uint8), 255);
    }

    #[test]
    fn wrapping_operators() {
        let a = Wrapping(int8::MAX);
        assert_eq!((a + Wrapping(1)).0, int8::MIN);
        let b = Wrapping(0 as uint64);
        assert_eq!((b - Wrapping(1)).0, uint64::MAX);
    }

    #[test]
    fn byte_round_trip_at_the_limits() {
        for v in [int16::MIN, -1, 0, 1, int16::MAX] {
            assert_eq!(int16::deserialize(v.serialize()), v);
        }
        for v in [0, 1, uint64::MAX] {
            assert_eq!(uint64::deserialize(v.serialize()), v);
        }
    }

    #[test]
    fn explicit_byte_order() {
        let v: uint32 = 0x1234_5678;
        assert_eq!(v.encode(ByteOrder::Little), [0x78, 0x56, 0x34, 0x12]);
        assert_eq!(v.encode(ByteOrder::Big), [0x12, 0x34, 0x56, 0x78]);
        assert_eq!(uint32::decode([0x12, 0x34, 0x56, 0x78], ByteOrder::Big), v);
        assert_eq!(v.serialize(), v.encode(ByteOrder::native()));
    }

    #[test]
    fn single_byte_is_order_independent() {
        let v: int8 = 0x12;
        assert_eq!(v.encode(ByteOrder::Little), v.encode(ByteOrder::Big));
        assert_eq!(v.serialize(), [0x12]);
    }

    #[test]
    fn buffer_reads_and_writes() {
        let mut buf = [0u8; 6];
        assert_eq!((-2 as int32).write_to(&mut buf), Some(4));
        assert_eq!(int32::read_from(&buf), Some(-2));
        assert_eq!(int64::read_from(&buf), None);

        let mut short = [0xAAu8; 3];
        assert_eq!((7 as uint32).write_to(&mut short), None);
        assert_eq!(short, [0xAA; 3]);
    }

    #[test]
    fn table_is_consistent() {
        assert_eq!(TYPE_TABLE.len(), 24);
        for (i, a) in TYPE_TABLE.iter().enumerate() {
            for b in &TYPE_TABLE[i + 1..] {
                assert_ne!(a.name, b.name);
            }
            assert_eq!(a.width_bits % 8, 0, "{}", a.name);
            assert!(a.align.is_power_of_two(), "{}", a.name);
            assert!(a.align <= a.size(), "{}", a.name);
        }
    }

    #[test]
    fn table_lookup() {
        let row = SemanticType::lookup("int16").unwrap();
        assert_eq!(row.width_bits, 16);
        assert_eq!(row.signedness, Signedness::Signed);
        assert_eq!(row.c_name, "int16_t");
        assert_eq!(row.kind, TypeKind::Fixed);

        let size = SemanticType::lookup("size_t").unwrap();
        assert_eq!(size.width_bits, usize::BITS);
        assert_eq!(size.kind, TypeKind::Native);

        assert_eq!(SemanticType::lookup("double_t").unwrap().kind, TypeKind::Float);
        assert!(SemanticType::lookup("int128").is_none());
    }

    #[test]
    fn generic_c_family_matches_c_widths() {
        assert_eq!(SemanticType::lookup("byte").unwrap().width_bits, 8);
        assert_eq!(SemanticType::lookup("short_int").unwrap().width_bits, 16);
        assert_eq!(SemanticType::lookup("integer").unwrap().width_bits, 32);
        assert_eq!(SemanticType::lookup("long_long_int").unwrap().width_bits, 64);
        assert_eq!(
            SemanticType::lookup("ulong_int").unwrap().width_bits,
            c_ulong::BITS
        );
    }
}
