//! Typed element access: per-(native type, on-disk encoding) codecs and the
//! mappability capability.
//!
//! A pair is *mappable* when the in-memory representation is bit-identical
//! to the on-disk little-endian encoding, which lets reads skip the decode
//! step entirely. The flag is a `const`, so each access path checks it once
//! and the branch folds away.

use crate::model::ColumnType;

pub trait ColumnElement: Copy + Default + Send + 'static {
    /// On-disk encoding this native type serializes to.
    const COLUMN_TYPE: ColumnType;
    /// Size in bytes of one serialized element.
    const DISK_SIZE: usize;
    /// Whether the on-disk bytes equal the in-memory bytes on this target.
    const IS_MAPPABLE: bool;

    fn write_to(&self, dst: &mut [u8]);
    fn read_from(src: &[u8]) -> Self;
}

macro_rules! impl_le_element {
    ($ty:ty, $column_type:expr, $size:expr) => {
        impl ColumnElement for $ty {
            const COLUMN_TYPE: ColumnType = $column_type;
            const DISK_SIZE: usize = $size;
            const IS_MAPPABLE: bool = cfg!(target_endian = "little");

            #[inline]
            fn write_to(&self, dst: &mut [u8]) {
                dst[..Self::DISK_SIZE].copy_from_slice(&self.to_le_bytes());
            }

            #[inline]
            fn read_from(src: &[u8]) -> Self {
                <$ty>::from_le_bytes(src[..Self::DISK_SIZE].try_into().unwrap())
            }
        }
    };
}

impl_le_element!(u64, ColumnType::Index, 8);
impl_le_element!(i32, ColumnType::Int32, 4);
impl_le_element!(i64, ColumnType::Int64, 8);
impl_le_element!(f32, ColumnType::Real32, 4);
impl_le_element!(f64, ColumnType::Real64, 8);

impl ColumnElement for u8 {
    const COLUMN_TYPE: ColumnType = ColumnType::Byte;
    const DISK_SIZE: usize = 1;
    const IS_MAPPABLE: bool = true;

    #[inline]
    fn write_to(&self, dst: &mut [u8]) {
        dst[0] = *self;
    }

    #[inline]
    fn read_from(src: &[u8]) -> Self {
        src[0]
    }
}

/// `bool` stored as a byte. Not mappable: the decode normalizes any
/// non-zero byte to `true`, so the representations are not bit-identical.
impl ColumnElement for bool {
    const COLUMN_TYPE: ColumnType = ColumnType::Byte;
    const DISK_SIZE: usize = 1;
    const IS_MAPPABLE: bool = false;

    #[inline]
    fn write_to(&self, dst: &mut [u8]) {
        dst[0] = u8::from(*self);
    }

    #[inline]
    fn read_from(src: &[u8]) -> Self {
        src[0] != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_sizes_match_column_types() {
        assert_eq!(u64::DISK_SIZE, ColumnType::Index.element_size());
        assert_eq!(f64::DISK_SIZE, ColumnType::Real64.element_size());
        assert_eq!(bool::DISK_SIZE, ColumnType::Byte.element_size());
    }

    #[test]
    fn bool_decode_normalizes() {
        assert!(!bool::IS_MAPPABLE);
        assert!(bool::read_from(&[7]));
        assert!(!bool::read_from(&[0]));
    }

    #[test]
    fn numeric_roundtrip() {
        let mut buf = [0u8; 8];
        42.5f64.write_to(&mut buf);
        assert_eq!(f64::read_from(&buf), 42.5);
        7u64.write_to(&mut buf);
        assert_eq!(u64::read_from(&buf), 7);
    }
}
