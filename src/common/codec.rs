use tracing::trace;

use super::bitstream::BitStream;
use super::error::{EncodeError, EncodeResult};
use super::metadata::{ECLevel, Version};

// Mode
//------------------------------------------------------------------------------

/// Data encoding mode. Only byte mode is produced: every byte sequence is
/// representable, so no character validation is required.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum Mode {
    Byte,
}

impl Mode {
    pub const fn indicator(self) -> u32 {
        match self {
            Self::Byte => 0b0100,
        }
    }
}

// Encoder
//------------------------------------------------------------------------------

/// Encodes `data` into `ver`, or the smallest version that fits at `ecl` when
/// none is given. With `boost_ecl` the EC level is raised as far as the data
/// still fits the chosen version.
pub fn encode(
    data: &[u8],
    ver: Option<Version>,
    ecl: ECLevel,
    boost_ecl: bool,
) -> EncodeResult<(BitStream, Version, ECLevel)> {
    let ver = match ver {
        Some(v) => v,
        None => find_min_version(data, ecl)?,
    };
    let ecl = if boost_ecl { boost_ec_level(data, ver, ecl) } else { ecl };
    let bs = encode_with_version(data, ver, ecl)?;
    Ok((bs, ver, ecl))
}

pub fn encode_with_version(data: &[u8], ver: Version, ecl: ECLevel) -> EncodeResult<BitStream> {
    let bcap = ver.data_bit_capacity(ecl);
    let sz = segment_bit_len(data.len(), ver);
    if sz > bcap {
        return Err(EncodeError::TooLarge { len: data.len(), max: max_byte_capacity(ver, ecl) });
    }

    let mut bs = BitStream::new(bcap);
    push_segment(data, ver, &mut bs);
    push_terminator(&mut bs);
    pad_remaining_capacity(&mut bs);
    Ok(bs)
}

fn find_min_version(data: &[u8], ecl: ECLevel) -> EncodeResult<Version> {
    for v in 1..=40 {
        let ver = Version::new_unchecked(v);
        if segment_bit_len(data.len(), ver) <= ver.data_bit_capacity(ecl) {
            trace!(version = v, ?ecl, len = data.len(), "Found smallest fitting version");
            return Ok(ver);
        }
    }
    Err(EncodeError::TooLarge { len: data.len(), max: max_byte_capacity(Version::MAX, ecl) })
}

fn boost_ec_level(data: &[u8], ver: Version, ecl: ECLevel) -> ECLevel {
    let sz = segment_bit_len(data.len(), ver);
    ECLevel::ALL
        .into_iter()
        .filter(|&e| e >= ecl && sz <= ver.data_bit_capacity(e))
        .max()
        .unwrap_or(ecl)
}

/// Largest byte payload a version can hold at the given EC level.
pub fn max_byte_capacity(ver: Version, ecl: ECLevel) -> usize {
    let overhead = 4 + ver.char_cnt_bits();
    (ver.data_bit_capacity(ecl) - overhead) >> 3
}

fn segment_bit_len(len: usize, ver: Version) -> usize {
    4 + ver.char_cnt_bits() + (len << 3)
}

// Writer
//------------------------------------------------------------------------------

fn push_segment(data: &[u8], ver: Version, bs: &mut BitStream) {
    bs.push_bits(Mode::Byte.indicator(), 4);
    bs.push_bits(data.len() as u32, ver.char_cnt_bits());
    bs.extend(data);
}

fn push_terminator(bs: &mut BitStream) {
    let bit_len = bs.len();
    let bit_cap = bs.capacity();
    if bit_len < bit_cap {
        let term_len = std::cmp::min(4, bit_cap - bit_len);
        bs.push_bits(0, term_len);
    }
}

fn pad_remaining_capacity(bs: &mut BitStream) {
    let pad_len = (8 - (bs.len() & 7)) & 7;
    bs.push_bits(0, pad_len);

    let remaining_bytes = (bs.capacity() - bs.len()) >> 3;
    PADDING_CODEWORDS.iter().copied().cycle().take(remaining_bytes).for_each(|pc| {
        bs.push_bits(pc as u32, 8);
    });
}


// Global constants
//------------------------------------------------------------------------------

static PADDING_CODEWORDS: [u8; 2] = [0b1110_1100, 0b0001_0001];
