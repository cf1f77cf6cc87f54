use super::metadata::Version;

// Iterator for placing data in encoding region of QR
//------------------------------------------------------------------------------

/// Walks the symbol in two-module-wide columns from the bottom-right corner,
/// alternating upward and downward, skipping the vertical timing column.
/// Yields every coordinate; callers skip the ones already taken by function
/// patterns.
pub struct EncRegionIter {
    r: i16,
    c: i16,
    width: i16,
}

impl EncRegionIter {
    pub const fn new(version: Version) -> Self {
        let w = version.width() as i16;
        Self { r: w - 1, c: w - 1, width: w }
    }
}

impl Iterator for EncRegionIter {
    type Item = (i16, i16);
    fn next(&mut self) -> Option<Self::Item> {
        if self.c < 0 {
            return None;
        }
        let res = (self.r, self.c);
        let adjusted_col = if self.c <= VERT_TIMING_COL { self.c + 1 } else { self.c };
        let col_type = (self.width - adjusted_col) % 4;
        match col_type {
            2 if self.r > 0 => {
                self.r -= 1;
                self.c += 1;
            }
            0 if self.r < self.width - 1 => {
                self.r += 1;
                self.c += 1;
            }
            0 | 2 if self.c == VERT_TIMING_COL + 1 => {
                self.c -= 2;
            }
            _ => {
                self.c -= 1;
            }
        }
        Some(res)
    }
}

#[cfg(test)]
mod iter_tests {
    use super::EncRegionIter;
    use crate::builder::{Module, QRBuilder};
    use crate::common::metadata::{ECLevel, Version};

    #[test]
    fn test_first_coords() {
        let coords = EncRegionIter::new(Version::MIN).take(6).collect::<Vec<_>>();
        assert_eq!(coords, vec![(20, 20), (20, 19), (19, 20), (19, 19), (18, 20), (18, 19)]);
    }

    #[test]
    fn test_turn_at_top() {
        let coords = EncRegionIter::new(Version::MIN).skip(40).take(4).collect::<Vec<_>>();
        assert_eq!(coords, vec![(0, 20), (0, 19), (0, 18), (0, 17)]);
    }

    #[test]
    fn test_skips_timing_column() {
        let coords = EncRegionIter::new(Version::MIN).collect::<Vec<_>>();
        assert_eq!(coords.len(), 21 * 20);
        assert!(coords.iter().all(|&(_, c)| c != 6));
        assert_eq!(coords.last(), Some(&(20, 0)));
    }

    #[test]
    fn test_enc_region_iter() {
        for v in 1..=40 {
            let data = "Hello, world!".as_bytes();
            let version = Version::new(v).unwrap();
            let qr = QRBuilder::new(data)
                .version(version)
                .ec_level(ECLevel::L)
                .boost_ec_level(false)
                .build_qr()
                .unwrap();
            let data_modules = EncRegionIter::new(version)
                .filter(|&(r, c)| matches!(qr.get(r, c), Module::Data(_)))
                .count();
            assert_eq!(data_modules / 8, version.total_codewords());
            assert_eq!(data_modules % 8, version.remainder_bits());
        }
    }
}

// Global constants
//------------------------------------------------------------------------------

const VERT_TIMING_COL: i16 = 6;
