use image::{Rgb, RgbImage};

use crate::matrix::QrMatrix;

/// Rasterizes a [`QrMatrix`] with a blank margin of at least
/// [`MIN_QUIET_ZONE`] modules on every side.
///
/// ```rust
/// use qrscan::{encode, Renderer};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let matrix = encode("https://example.com")?;
/// let img = Renderer::new().foreground([0, 0, 128]).render(&matrix, 512);
/// assert_eq!(img.dimensions(), (512, 512));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Renderer {
    foreground: Rgb<u8>,
    background: Rgb<u8>,
    quiet_zone: u32,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer {
    pub const fn new() -> Self {
        Self { foreground: BLACK, background: WHITE, quiet_zone: MIN_QUIET_ZONE }
    }

    pub fn foreground(&mut self, rgb: [u8; 3]) -> &mut Self {
        self.foreground = Rgb(rgb);
        self
    }

    pub fn background(&mut self, rgb: [u8; 3]) -> &mut Self {
        self.background = Rgb(rgb);
        self
    }

    /// Margin in modules, kept within [`MIN_QUIET_ZONE`]..=[`MAX_QUIET_ZONE`].
    pub fn quiet_zone(&mut self, modules: u32) -> &mut Self {
        self.quiet_zone = modules.clamp(MIN_QUIET_ZONE, MAX_QUIET_ZONE);
        self
    }

    pub fn quiet_zone_modules(&self) -> u32 {
        self.quiet_zone
    }

    /// Renders into a square image of `size_px` pixels, or the smallest size
    /// that fits one pixel per module when `size_px` is smaller than that.
    /// Modules are square blocks of `size_px / (width + 2 * quiet_zone)`
    /// pixels and the symbol is centred. Requests above [`MAX_IMAGE_SIZE`] are
    /// capped.
    pub fn render(&self, matrix: &QrMatrix, size_px: u32) -> RgbImage {
        let size_px = size_px.min(MAX_IMAGE_SIZE);
        let w = matrix.width() as u32;
        let span = w + 2 * self.quiet_zone;
        let module_sz = (size_px / span).max(1);
        let total_sz = size_px.max(span * module_sz);
        let qr_sz = w * module_sz;
        let off = (total_sz - qr_sz) / 2;

        let mut canvas = RgbImage::from_pixel(total_sz, total_sz, self.background);
        for (r, row) in matrix.rows().enumerate() {
            for (c, &dark) in row.iter().enumerate() {
                if !dark {
                    continue;
                }
                let (y0, x0) = (off + r as u32 * module_sz, off + c as u32 * module_sz);
                for i in y0..y0 + module_sz {
                    for j in x0..x0 + module_sz {
                        canvas.put_pixel(j, i, self.foreground);
                    }
                }
            }
        }

        canvas
    }

    /// Text rendering, one character per module: `█` for dark, space for light.
    pub fn render_string(&self, matrix: &QrMatrix) -> String {
        let qz = self.quiet_zone as usize;
        let total_sz = matrix.width() + 2 * qz;

        let mut canvas = String::with_capacity(total_sz * (total_sz + 1) * 3);
        for i in 0..total_sz {
            for j in 0..total_sz {
                let in_symbol = (qz..qz + matrix.width()).contains(&i)
                    && (qz..qz + matrix.width()).contains(&j);
                let dark = in_symbol && matrix.get(i - qz, j - qz);
                canvas.push(if dark { '█' } else { ' ' });
            }
            canvas.push('\n');
        }

        canvas
    }
}

/// Renders with default colors and quiet zone.
pub fn render(matrix: &QrMatrix, size_px: u32) -> RgbImage {
    Renderer::new().render(matrix, size_px)
}


// Global constants
//------------------------------------------------------------------------------

/// Smallest margin, in modules, a reader needs around the symbol.
pub const MIN_QUIET_ZONE: u32 = 4;

pub const MAX_QUIET_ZONE: u32 = 64;

/// Largest side length, in pixels, [`Renderer::render`] produces.
pub const MAX_IMAGE_SIZE: u32 = 8192;

const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
