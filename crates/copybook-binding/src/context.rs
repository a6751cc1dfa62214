//! COBOL parameter set for host transforms.

use crate::ebcdic::{CodePage, CP037};
use crate::Result;

/// Parameters a transform runs under. Currently the host character set;
/// the default is CP037.
#[derive(Debug, Clone, Copy)]
pub struct CobolContext {
    code_page: &'static CodePage,
}

impl CobolContext {
    /// Context with default COBOL parameters.
    pub fn new() -> Self {
        Self { code_page: &CP037 }
    }

    /// Context using a specific code page.
    pub fn with_code_page(code_page: &'static CodePage) -> Self {
        Self { code_page }
    }

    /// Context using a host character set looked up by name.
    ///
    /// # Errors
    /// Returns [`crate::BindingError::InvalidCodePage`] for unknown names.
    pub fn with_charset(host_charset: &str) -> Result<Self> {
        Ok(Self {
            code_page: CodePage::by_name(host_charset)?,
        })
    }

    /// The host character set in effect.
    pub fn code_page(&self) -> &'static CodePage {
        self.code_page
    }
}

impl Default for CobolContext {
    fn default() -> Self {
        Self::new()
    }
}
