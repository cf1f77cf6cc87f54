mod qr;

pub(crate) use qr::{Module, QR};

use tracing::debug;

use crate::common::{
    codec::encode,
    ec::{ecc, interleave},
    error::EncodeResult,
    mask::{apply_best_mask, MaskPattern},
    metadata::{ECLevel, Version},
    BitStream,
};
use crate::matrix::QrMatrix;

/// Builds a QR symbol from raw bytes in byte mode.
///
/// Without overrides the smallest version holding the data at the requested
/// EC level is chosen, the EC level is then raised as far as that version
/// allows, and the mask with the lowest penalty score is applied.
///
/// ```rust
/// use qrscan::{ECLevel, QRBuilder};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let matrix = QRBuilder::new(b"https://example.com").ec_level(ECLevel::M).build()?;
/// assert_eq!(matrix.width(), 4 * *matrix.version() + 17);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct QRBuilder<'a> {
    data: &'a [u8],
    version: Option<Version>,
    ec_level: ECLevel,
    boost_ecl: bool,
    mask: Option<MaskPattern>,
}

impl<'a> QRBuilder<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, version: None, ec_level: ECLevel::L, boost_ecl: true, mask: None }
    }

    pub fn data(&mut self, data: &'a [u8]) -> &mut Self {
        self.data = data;
        self
    }

    pub fn version(&mut self, version: Version) -> &mut Self {
        self.version = Some(version);
        self
    }

    pub fn unset_version(&mut self) -> &mut Self {
        self.version = None;
        self
    }

    pub fn ec_level(&mut self, ec_level: ECLevel) -> &mut Self {
        self.ec_level = ec_level;
        self
    }

    pub fn boost_ec_level(&mut self, boost: bool) -> &mut Self {
        self.boost_ecl = boost;
        self
    }

    pub fn mask(&mut self, mask: MaskPattern) -> &mut Self {
        self.mask = Some(mask);
        self
    }

    pub fn metadata(&self) -> String {
        match self.version {
            Some(v) => format!(
                "{{ Version: {:?}, Ec level: {:?}, Boost: {:?} }}",
                *v, self.ec_level, self.boost_ecl
            ),
            None => format!(
                "{{ Version: None, Ec level: {:?}, Boost: {:?} }}",
                self.ec_level, self.boost_ecl
            ),
        }
    }
}

#[cfg(test)]
mod qrbuilder_util_tests {
    use super::QRBuilder;
    use crate::common::metadata::{ECLevel, Version};

    #[test]
    fn test_metadata() {
        let data = "Hello, world!".as_bytes();
        let mut qr_builder = QRBuilder::new(data);
        qr_builder.version(Version::MIN).ec_level(ECLevel::Q).boost_ec_level(false);
        assert_eq!(qr_builder.metadata(), "{ Version: 1, Ec level: Q, Boost: false }");
        qr_builder.unset_version();
        assert_eq!(qr_builder.metadata(), "{ Version: None, Ec level: Q, Boost: false }");
    }
}

impl QRBuilder<'_> {
    pub fn build(&self) -> EncodeResult<QrMatrix> {
        let qr = self.build_qr()?;
        Ok(qr.to_matrix())
    }

    pub(crate) fn build_qr(&self) -> EncodeResult<QR> {
        debug!(len = self.data.len(), metadata = %self.metadata(), "Generating QR");

        let (encoded_data, version, ec_level) =
            encode(self.data, self.version, self.ec_level, self.boost_ecl)?;

        let payload = Self::construct_payload(encoded_data.data(), version, ec_level);

        let mut qr = QR::new(version, ec_level);
        qr.draw_all_function_patterns();
        qr.draw_encoding_region(payload);

        let mask = match self.mask {
            Some(m) => {
                qr.apply_mask(m);
                m
            }
            None => apply_best_mask(&mut qr),
        };

        debug!(
            version = *version,
            ?ec_level,
            mask = *mask,
            dark_modules = qr.count_dark_modules(),
            "QR generated"
        );

        Ok(qr)
    }

    // Data codewords then error correction codewords, each interleaved across blocks
    fn construct_payload(data: &[u8], version: Version, ec_level: ECLevel) -> BitStream {
        let (data_blocks, ecc_blocks) = ecc(data, version, ec_level);
        let mut payload = BitStream::new(version.total_codewords() << 3);
        payload.extend(&interleave(&data_blocks));
        payload.extend(&interleave(&ecc_blocks));
        payload
    }
}
