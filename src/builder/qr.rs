use std::ops::Deref;

use crate::common::{
    iter::EncRegionIter,
    mask::MaskPattern,
    metadata::{
        format_info, Color, ECLevel, Version, FORMAT_INFO_BIT_LEN, FORMAT_INFO_COORDS_QR_MAIN,
        FORMAT_INFO_COORDS_QR_SIDE, VERSION_INFO_BIT_LEN,
    },
    BitStream,
};
use crate::matrix::QrMatrix;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Module {
    Empty,
    Func(Color),
    Version(Color),
    Format(Color),
    Data(Color),
}

impl Deref for Module {
    type Target = Color;
    fn deref(&self) -> &Self::Target {
        match self {
            Module::Empty => &Color::Light,
            Module::Func(c) => c,
            Module::Version(c) => c,
            Module::Format(c) => c,
            Module::Data(c) => c,
        }
    }
}

#[derive(Debug, Clone)]
pub struct QR {
    grid: Vec<Module>,
    w: usize,
    ver: Version,
    ecl: ECLevel,
    mask: Option<MaskPattern>,
}

// QR type for builder
//------------------------------------------------------------------------------

impl QR {
    pub fn new(ver: Version, ecl: ECLevel) -> Self {
        let w = ver.width();
        Self { grid: vec![Module::Empty; w * w], w, ver, ecl, mask: None }
    }

    pub fn width(&self) -> usize {
        self.w
    }

    pub fn mask(&self) -> Option<MaskPattern> {
        self.mask
    }

    pub fn count_dark_modules(&self) -> usize {
        self.grid.iter().filter(|m| m.is_dark()).count()
    }

    pub fn to_matrix(&self) -> QrMatrix {
        debug_assert!(!self.grid.contains(&Module::Empty), "Empty module left in grid");
        let modules = self.grid.iter().map(|m| m.is_dark()).collect();
        QrMatrix::new(self.ver, self.ecl, self.mask(), modules)
    }

    #[cfg(test)]
    pub fn to_debug_str(&self) -> String {
        let w = self.w as i16;
        let mut res = String::with_capacity((w * (w + 1)) as usize);
        res.push('\n');
        for i in 0..w {
            for j in 0..w {
                let c = match self.get(i, j) {
                    Module::Empty => '.',
                    Module::Func(Color::Dark) => 'f',
                    Module::Func(Color::Light) => 'F',
                    Module::Version(Color::Dark) => 'v',
                    Module::Version(Color::Light) => 'V',
                    Module::Format(Color::Dark) => 'm',
                    Module::Format(Color::Light) => 'M',
                    Module::Data(Color::Dark) => 'd',
                    Module::Data(Color::Light) => 'D',
                };
                res.push(c);
            }
            res.push('\n');
        }
        res
    }

    // Negative coordinates count back from the bottom or right edge
    fn coord_to_index(&self, r: i16, c: i16) -> usize {
        let w = self.w as i16;
        debug_assert!((-w..w).contains(&r), "Row out of bounds");
        debug_assert!((-w..w).contains(&c), "Column out of bounds");

        r.rem_euclid(w) as usize * self.w + c.rem_euclid(w) as usize
    }

    pub fn get(&self, r: i16, c: i16) -> Module {
        self.grid[self.coord_to_index(r, c)]
    }

    pub fn set(&mut self, r: i16, c: i16, module: Module) {
        let index = self.coord_to_index(r, c);
        self.grid[index] = module;
    }
}


// Finder pattern
//------------------------------------------------------------------------------

impl QR {
    fn draw_finder_patterns(&mut self) {
        self.draw_finder_pattern_at(3, 3);
        self.draw_finder_pattern_at(3, -4);
        self.draw_finder_pattern_at(-4, 3);
    }

    // 7x7 pattern centred at (r, c) plus the light separator on its inner
    // sides. Rings at distance 2 and 4 from the centre are light.
    fn draw_finder_pattern_at(&mut self, r: i16, c: i16) {
        let inward = |centre: i16| if centre > 0 { -3i16..=4 } else { -4i16..=3 };
        for i in inward(r) {
            for j in inward(c) {
                let ring = i.abs().max(j.abs());
                self.set(r + i, c + j, Module::Func(Color::from(ring % 2 == 1 || ring == 0)));
            }
        }
    }
}


// Timing pattern
//------------------------------------------------------------------------------

impl QR {
    fn draw_timing_pattern(&mut self) {
        let w = self.w as i16;
        let (off, last) = (6, w - 9);
        self.draw_line(off, 8, off, last);
        self.draw_line(8, off, last, off);
    }

    fn draw_line(&mut self, r1: i16, c1: i16, r2: i16, c2: i16) {
        debug_assert!(r1 == r2 || c1 == c2, "Line is neither vertical nor horizontal");

        if r1 == r2 {
            for j in c1..=c2 {
                self.set(r1, j, Module::Func(Color::from(j & 1 == 0)));
            }
        } else {
            for i in r1..=r2 {
                self.set(i, c1, Module::Func(Color::from(i & 1 == 0)));
            }
        }
    }
}


// Alignment pattern
//------------------------------------------------------------------------------

impl QR {
    fn draw_alignment_patterns(&mut self) {
        let poses = self.ver.alignment_pattern();
        for &r in &poses {
            for &c in &poses {
                self.draw_alignment_pattern_at(r, c)
            }
        }
    }

    fn draw_alignment_pattern_at(&mut self, r: i16, c: i16) {
        let w = self.w as i16;
        // Corners occupied by finder patterns
        if (r == 6 && (c == 6 || c - w == -7)) || (r - w == -7 && c == 6) {
            return;
        }
        for i in -2..=2 {
            for j in -2..=2 {
                self.set(
                    r + i,
                    c + j,
                    match (i, j) {
                        (-2 | 2, _) | (_, -2 | 2) | (0, 0) => Module::Func(Color::Dark),
                        _ => Module::Func(Color::Light),
                    },
                )
            }
        }
    }
}


// All function patterns
//------------------------------------------------------------------------------

impl QR {
    pub fn draw_all_function_patterns(&mut self) {
        self.draw_finder_patterns();
        self.draw_timing_pattern();
        self.draw_alignment_patterns();
    }
}

// Format & version info
//------------------------------------------------------------------------------

impl QR {
    fn reserve_format_area(&mut self) {
        self.draw_format_info((1 << FORMAT_INFO_BIT_LEN) - 1);
    }

    // Both copies, most significant bit first along each coordinate table
    fn draw_format_info(&mut self, format_info: u32) {
        let copies = FORMAT_INFO_COORDS_QR_MAIN.iter().zip(FORMAT_INFO_COORDS_QR_SIDE.iter());
        for (i, (&(r1, c1), &(r2, c2))) in copies.enumerate() {
            let bit = (format_info >> (FORMAT_INFO_BIT_LEN - 1 - i)) & 1 == 1;
            let module = Module::Format(Color::from(bit));
            self.set(r1, c1, module);
            self.set(r2, c2, module);
        }
        // Always-dark module beside the bottom-left finder
        self.set(-8, 8, Module::Format(Color::Dark));
    }

    // Two copies: six rows by three columns above the bottom-left finder and
    // its transpose left of the top-right finder. Least significant bit first.
    fn draw_version_info(&mut self) {
        if *self.ver < 7 {
            return;
        }
        let w = self.w as i16;
        let ver_info = self.ver.info();
        for i in 0..VERSION_INFO_BIT_LEN {
            let module = Module::Version(Color::from((ver_info >> i) & 1 == 1));
            let a = (i / 3) as i16;
            let b = w - 11 + (i % 3) as i16;
            self.set(a, b, module);
            self.set(b, a, module);
        }
    }
}

#[cfg(test)]
mod qr_information_tests {
    use crate::builder::{Module, QR};
    use crate::common::metadata::{format_info, Color, ECLevel, Version};
    use crate::common::mask::MaskPattern;

    #[test]
    fn test_version_info_1() {
        let mut qr = QR::new(Version::MIN, ECLevel::L);
        qr.draw_version_info();
        assert!(!qr.to_debug_str().contains(['v', 'V']));
    }

    #[test]
    fn test_version_info_7() {
        // 0x07c94 = 000111 110010 010100
        let mut qr = QR::new(Version::new(7).unwrap(), ECLevel::L);
        qr.draw_version_info();
        assert_eq!(qr.get(0, 34), Module::Version(Color::Light));
        assert_eq!(qr.get(0, 36), Module::Version(Color::Dark));
        assert_eq!(qr.get(36, 0), Module::Version(Color::Dark));
        assert_eq!(qr.get(5, 36), Module::Version(Color::Light));
        assert_eq!(qr.get(5, 34), Module::Version(Color::Light));
        assert_eq!(qr.get(4, 36), Module::Version(Color::Dark));
        assert_eq!(qr.to_debug_str().matches(['v', 'V']).count(), 36);
    }

    #[test]
    fn test_reserve_format_info_qr() {
        let mut qr = QR::new(Version::MIN, ECLevel::L);
        qr.reserve_format_area();
        assert_eq!(
            qr.to_debug_str(),
            "\n\
             ........m............\n\
             ........m............\n\
             ........m............\n\
             ........m............\n\
             ........m............\n\
             ........m............\n\
             .....................\n\
             ........m............\n\
             mmmmmm.mm....mmmmmmmm\n\
             .....................\n\
             .....................\n\
             .....................\n\
             .....................\n\
             ........m............\n\
             ........m............\n\
             ........m............\n\
             ........m............\n\
             ........m............\n\
             ........m............\n\
             ........m............\n\
             ........m............\n"
        );
    }

    #[test]
    fn test_format_info_bits() {
        let mut qr = QR::new(Version::MIN, ECLevel::M);
        // M/0: 101010000010010
        qr.draw_format_info(format_info(ECLevel::M, MaskPattern::new(0)));
        let main = [(8, 0), (8, 1), (8, 2), (8, 3), (8, 4), (8, 5), (8, 7), (8, 8)]
            .map(|(r, c)| qr.get(r, c).is_dark());
        assert_eq!(main, [true, false, true, false, true, false, false, false]);
        let side =
            [(20, 8), (19, 8), (8, 13), (8, 16), (8, 20)].map(|(r, c)| qr.get(r, c).is_dark());
        assert_eq!(side, [true, false, false, true, false]);
    }
}

// Encoding region
//------------------------------------------------------------------------------

impl QR {
    pub fn draw_encoding_region(&mut self, payload: BitStream) {
        self.reserve_format_area();
        self.draw_version_info();
        self.draw_payload(payload);

        debug_assert!(!self.grid.contains(&Module::Empty), "Empty module left after placing payload");
    }

    // Codeword bits in zig-zag order; modules left over after the payload are
    // remainder bits and stay light before masking
    fn draw_payload(&mut self, payload: BitStream) {
        let mut coords = EncRegionIter::new(self.ver);
        for bit in payload {
            let module = Module::Data(Color::from(bit));
            for (r, c) in coords.by_ref() {
                if matches!(self.get(r, c), Module::Empty) {
                    self.set(r, c, module);
                    break;
                }
            }
        }
        for (r, c) in coords {
            if matches!(self.get(r, c), Module::Empty) {
                self.set(r, c, Module::Data(Color::Light));
            }
        }
    }

    pub fn apply_mask(&mut self, pattern: MaskPattern) {
        self.mask = Some(pattern);
        let mask_fn = pattern.mask_function();
        let w = self.w;
        for (i, module) in self.grid.iter_mut().enumerate() {
            if let Module::Data(clr) = module {
                if mask_fn((i / w) as i16, (i % w) as i16) {
                    *clr = !*clr;
                }
            }
        }
        self.draw_format_info(format_info(self.ecl, pattern));
    }
}

#[cfg(test)]
mod encoding_region_tests {
    use crate::builder::{Module, QRBuilder};
    use crate::common::mask::MaskPattern;
    use crate::common::metadata::{Color, ECLevel, Version};

    #[test]
    fn test_no_empty_modules() {
        for v in [1, 2, 6, 7, 14, 40] {
            let qr = QRBuilder::new(b"qrscan")
                .version(Version::new(v).unwrap())
                .build_qr()
                .unwrap();
            assert!(!qr.to_debug_str().contains('.'), "version {v}");
        }
    }

    #[test]
    fn test_first_codeword_placement() {
        // Byte mode indicator 0100 lands in the bottom-right 2x2 corner
        let qr = QRBuilder::new(b"A")
            .ec_level(ECLevel::H)
            .mask(MaskPattern::new(1))
            .build_qr()
            .unwrap();
        let mask_fn = MaskPattern::new(1).mask_function();
        let unmasked = |r: i16, c: i16| match qr.get(r, c) {
            Module::Data(clr) if mask_fn(r, c) => !clr,
            Module::Data(clr) => clr,
            m => panic!("Expected data module at {r} {c}, found {m:?}"),
        };
        assert_eq!(unmasked(20, 20), Color::Light);
        assert_eq!(unmasked(20, 19), Color::Dark);
        assert_eq!(unmasked(19, 20), Color::Light);
        assert_eq!(unmasked(19, 19), Color::Light);
    }
}
