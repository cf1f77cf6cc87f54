use crate::common::{mask::MaskPattern, metadata::ECLevel, metadata::Version};

/// Finished QR symbol: a square grid of modules, `true` for dark.
///
/// The grid holds the symbol only. Quiet zone is added by the renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrMatrix {
    width: usize,
    modules: Vec<bool>,
    version: Version,
    ec_level: ECLevel,
    mask: Option<MaskPattern>,
}

impl QrMatrix {
    pub(crate) fn new(
        version: Version,
        ec_level: ECLevel,
        mask: Option<MaskPattern>,
        modules: Vec<bool>,
    ) -> Self {
        let width = version.width();
        debug_assert_eq!(modules.len(), width * width, "Module count doesn't match version");
        Self { width, modules, version, ec_level, mask }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Always equal to [`QrMatrix::width`].
    pub fn height(&self) -> usize {
        self.width
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn ec_level(&self) -> ECLevel {
        self.ec_level
    }

    pub fn mask(&self) -> Option<MaskPattern> {
        self.mask
    }

    /// Module at row `r`, column `c`. Panics when out of range.
    pub fn get(&self, r: usize, c: usize) -> bool {
        assert!(r < self.width && c < self.width, "Module ({r}, {c}) outside {0}x{0}", self.width);
        self.modules[r * self.width + c]
    }

    /// Row-major modules.
    pub fn modules(&self) -> &[bool] {
        &self.modules
    }

    pub fn rows(&self) -> impl Iterator<Item = &[bool]> + '_ {
        self.modules.chunks(self.width)
    }

    pub fn count_dark_modules(&self) -> usize {
        self.modules.iter().filter(|&&m| m).count()
    }
}
