//! Wire and domain types for receipts.

use std::fmt::{self, Write as _};

use serde::{Deserialize, Serialize};

/// A receipt as returned by the receipt service.
///
/// Identity is the `id`. Receipts are never edited in place; the list is
/// replaced wholesale on every successful fetch.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Receipt {
    /// Service-assigned identifier
    pub id: String,
    /// Display name
    pub name: String,
}

impl Receipt {
    /// Creates a receipt.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Body of a create request: `{"name": "..."}`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReceiptRequest {
    /// Name of the receipt to create
    pub name: String,
}

impl ReceiptRequest {
    /// Creates a request for a receipt called `name`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Renders as `ReceiptRequest(name: "...")`.
///
/// Inside the quotes only the quote, the backslash and control characters are
/// escaped (`\n`, `\r`, `\t`, `\0`, otherwise `\u{XX}`); every other
/// character, including non-ASCII text and combining marks, is written as is.
impl fmt::Display for ReceiptRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ReceiptRequest(name: \"")?;
        for c in self.name.chars() {
            match c {
                '"' => f.write_str("\\\"")?,
                '\\' => f.write_str("\\\\")?,
                '\n' => f.write_str("\\n")?,
                '\r' => f.write_str("\\r")?,
                '\t' => f.write_str("\\t")?,
                '\0' => f.write_str("\\0")?,
                c if c.is_control() => write!(f, "\\u{{{:X}}}", u32::from(c))?,
                c => f.write_char(c)?,
            }
        }
        f.write_str("\")")
    }
}
