//! See <https://github.com/apache/parquet-format/blob/master/Encodings.md#run-length-encoding--bit-packing-hybrid-rle--3>

use super::ceil8;
use super::uleb128;

#[derive(Debug, PartialEq, Eq)]
pub enum HybridEncoded<'a> {
    /// A bitpacked run. The consumer must already know its bit-width to unpack it.
    Bitpacked(&'a [u8]),
    /// A RLE run: a single repeated-value (its fixed-width encoding), and a run length.
    Rle(&'a [u8], usize),
}

/// An iterator that, given a slice of bytes, returns `HybridEncoded` runs.
pub struct Decoder<'a> {
    values: &'a [u8],
    num_bits: u32,
    rle_value_bytes: usize,
}

impl<'a> Decoder<'a> {
    pub fn new(values: &'a [u8], num_bits: u32) -> Self {
        Self {
            values,
            num_bits,
            rle_value_bytes: ceil8(num_bits as usize),
        }
    }

    /// The number of bits being used by this decoder.
    #[inline]
    pub fn num_bits(&self) -> u32 {
        self.num_bits
    }
}

impl<'a> Iterator for Decoder<'a> {
    type Item = HybridEncoded<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.values.is_empty() {
            return None;
        }
        let (indicator, consumed) = uleb128::decode(self.values);
        self.values = &self.values[consumed..];
        if indicator & 1 == 1 {
            // bit-packed run: `indicator >> 1` groups of 8 values, each group occupying
            // `num_bits` bytes.
            let num_groups = indicator as usize >> 1;
            let bytes = std::cmp::min(num_groups * self.num_bits as usize, self.values.len());
            let result = Some(HybridEncoded::Bitpacked(&self.values[..bytes]));
            self.values = &self.values[bytes..];
            result
        } else {
            // RLE run: a single value, fixed-width encoded over `ceil8(num_bits)` bytes,
            // repeated `indicator >> 1` times.
            let run_length = indicator as usize >> 1;
            let result = Some(HybridEncoded::Rle(
                &self.values[..self.rle_value_bytes],
                run_length,
            ));
            self.values = &self.values[self.rle_value_bytes..];
            result
        }
    }
}
