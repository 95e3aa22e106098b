use std::convert::TryInto;

pub mod bitpacked;
pub mod delta_bitpacked;
pub mod delta_byte_array;
pub mod delta_length_byte_array;
pub mod hybrid_rle;
pub mod plain_byte_array;
pub mod uleb128;
pub mod zigzag_leb128;

pub use crate::parquet_bridge::Encoding;

/// # Panics
/// This function panics iff `values.len() < 4`.
pub fn get_length(values: &[u8]) -> u32 {
    u32::from_le_bytes(values[0..4].try_into().unwrap())
}

/// Returns the ceil of value/divisor
#[inline]
pub fn ceil8(value: usize) -> usize {
    value / 8 + ((value % 8 != 0) as usize)
}

/// The number of bits needed to represent every value in `0..=x`, i.e. `x`'s bit length.
#[inline]
pub fn log2(x: u64) -> u32 {
    64 - x.leading_zeros()
}

/// The hybrid RLE/bit-packed bit width needed to encode definition or repetition levels
/// whose maximum is `max_level`.
#[inline]
pub fn get_bit_width(max_level: i16) -> u32 {
    log2(max_level as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bit_width_of_common_levels() {
        assert_eq!(get_bit_width(0), 0);
        assert_eq!(get_bit_width(1), 1);
        assert_eq!(get_bit_width(2), 2);
        assert_eq!(get_bit_width(3), 2);
        assert_eq!(get_bit_width(4), 3);
        assert_eq!(get_bit_width(7), 3);
        assert_eq!(get_bit_width(8), 4);
    }
}
