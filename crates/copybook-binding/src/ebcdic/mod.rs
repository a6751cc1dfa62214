//! EBCDIC encoding support for IBM mainframe code pages.
//!
//! Provides EBCDIC-to-Unicode and Unicode-to-EBCDIC conversion for the
//! code pages host records are exchanged in.
//!
//! # Supported Code Pages
//!
//! - **Base pages:** CP037, CP500, CP1047
//! - **Euro-enabled:** CP1140
//!
//! Use [`CodePageRegistry`] or [`CodePage::by_name`] for runtime lookup.

mod tables;

pub use tables::{CodePage, CP037, CP1047, CP1140, CP500};

use crate::error::BindingError;
use crate::Result;

impl CodePage {
    /// Decode EBCDIC bytes to a UTF-8 string.
    ///
    /// Special characters (e.g. the Euro sign) that map outside the
    /// Latin-1 range are handled before the table lookup.
    pub fn decode(&self, bytes: &[u8]) -> Result<String> {
        let mut result = String::with_capacity(bytes.len());
        for &b in bytes {
            result.push(self.ebcdic_to_char(b));
        }
        Ok(result)
    }

    /// Encode a UTF-8 string to EBCDIC bytes.
    ///
    /// # Errors
    /// Returns [`BindingError::Conversion`] for characters the page
    /// cannot represent.
    pub fn encode(&self, s: &str) -> Result<Vec<u8>> {
        let mut result = Vec::with_capacity(s.len());
        for ch in s.chars() {
            if let Some(&(eb, _)) = self.special_chars.iter().find(|&&(_, c)| c == ch) {
                result.push(eb);
                continue;
            }
            if ch as u32 > 255 {
                return Err(BindingError::Conversion {
                    message: format!(
                        "Character '{}' (U+{:04X}) cannot be encoded in {}",
                        ch, ch as u32, self.name
                    ),
                });
            }
            result.push(self.latin1_to_ebcdic[ch as usize]);
        }
        Ok(result)
    }

    /// Convert a single EBCDIC byte to its Unicode character.
    pub fn ebcdic_to_char(&self, ebcdic: u8) -> char {
        if let Some(&(_, ch)) = self.special_chars.iter().find(|&&(eb, _)| eb == ebcdic) {
            ch
        } else {
            char::from(self.ebcdic_to_latin1[ebcdic as usize])
        }
    }

    /// Convert a single EBCDIC byte to Latin-1, ignoring special characters.
    #[inline]
    pub fn ebcdic_to_latin1_byte(&self, ebcdic: u8) -> u8 {
        self.ebcdic_to_latin1[ebcdic as usize]
    }

    /// Convert a single Latin-1 byte to EBCDIC.
    #[inline]
    pub fn latin1_to_ebcdic_byte(&self, latin1: u8) -> u8 {
        self.latin1_to_ebcdic[latin1 as usize]
    }

    /// Look up a code page by CCSID number.
    ///
    /// # Errors
    /// Returns [`BindingError::InvalidCodePage`] for unknown CCSIDs.
    pub fn from_ccsid(ccsid: u16) -> Result<&'static CodePage> {
        CodePageRegistry::from_ccsid(ccsid)
    }

    /// Look up a code page by name.
    ///
    /// Accepts the formats "CP037", "IBM-037", "IBM037", "IBM01140" and
    /// "EBCDIC-037".
    ///
    /// # Errors
    /// Returns [`BindingError::InvalidCodePage`] for unknown names.
    pub fn by_name(name: &str) -> Result<&'static CodePage> {
        CodePageRegistry::by_name(name)
    }
}

static ALL_PAGES: [&CodePage; 4] = [&CP037, &CP500, &CP1047, &CP1140];

/// Runtime lookup over the registered code pages.
pub struct CodePageRegistry;

impl CodePageRegistry {
    /// All registered code pages.
    pub fn all() -> &'static [&'static CodePage] {
        &ALL_PAGES
    }

    /// Look up a code page by CCSID number.
    pub fn from_ccsid(ccsid: u16) -> Result<&'static CodePage> {
        Self::all()
            .iter()
            .copied()
            .find(|cp| cp.ccsid == ccsid)
            .ok_or_else(|| BindingError::InvalidCodePage(format!("CCSID {}", ccsid)))
    }

    /// Look up a code page by name, tolerating the common vendor prefixes.
    pub fn by_name(name: &str) -> Result<&'static CodePage> {
        let upper = name.trim().to_ascii_uppercase();
        let digits = upper
            .strip_prefix("EBCDIC-")
            .or_else(|| upper.strip_prefix("IBM-"))
            .or_else(|| upper.strip_prefix("IBM"))
            .or_else(|| upper.strip_prefix("CP"))
            .unwrap_or(&upper);
        let ccsid = digits
            .parse::<u16>()
            .map_err(|_| BindingError::InvalidCodePage(name.to_string()))?;
        Self::from_ccsid(ccsid).map_err(|_| BindingError::InvalidCodePage(name.to_string()))
    }
}
