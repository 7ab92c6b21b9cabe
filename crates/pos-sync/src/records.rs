//! Records
//!
//! Wire rows as the backend sends them and the view-model records the screens
//! render. Missing string fields decode as empty; numbers are required.

use serde::{Deserialize, Serialize, Serializer};

/// `type` tag of a receipt row whose product has been classified
pub const CATEGORIZED_TAG: &str = "Categorized";

// ========================
// Categories
// ========================

/// Product classification row, identical on the wire and in the view model
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CategoryRecord {
    #[serde(default)]
    pub product: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub name: String,
}

impl CategoryRecord {
    pub fn new(product: &str, category: &str, name: &str) -> Self {
        Self {
            product: product.to_string(),
            category: category.to_string(),
            name: name.to_string(),
        }
    }

    pub fn category_valid(&self) -> bool {
        !self.category.is_empty()
    }

    pub fn name_valid(&self) -> bool {
        !self.name.is_empty()
    }

    /// Both category and name are filled in
    pub fn item_valid(&self) -> bool {
        self.category_valid() && self.name_valid()
    }
}

// ========================
// Receipts
// ========================

/// Full-precision number rendered with exactly `D` decimal digits
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Fixed<const D: usize>(pub f64);

impl<const D: usize> Fixed<D> {
    pub fn value(&self) -> f64 {
        self.0
    }
}

impl<const D: usize> std::fmt::Display for Fixed<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // -0.0 renders as plain zero
        let value = if self.0 == 0.0 { 0.0 } else { self.0 };
        match tie_round_up(value.abs(), D) {
            Some(scaled) => {
                let unit = 10u128.pow(D as u32);
                let sign = if value < 0.0 { "-" } else { "" };
                if D == 0 {
                    write!(f, "{}{}", sign, scaled)
                } else {
                    write!(f, "{}{}.{:0width$}", sign, scaled / unit, scaled % unit, width = D)
                }
            }
            None => write!(f, "{:.*}", D, value),
        }
    }
}

/// Scaled magnitude rounded away from zero when `value` lies exactly halfway
/// between two `digits`-decimal neighbours, `None` otherwise.
///
/// `{:.N}` rounds such ties to even; the receipts have always shown them
/// rounded up (`0.125` as `0.13`). Non-ties are left to the formatter, which
/// rounds the exact binary value correctly.
fn tie_round_up(value: f64, digits: usize) -> Option<u128> {
    if !value.is_finite() {
        return None;
    }
    // value = mantissa * 2^exponent
    let bits = value.to_bits();
    let biased = ((bits >> 52) & 0x7ff) as i32;
    let fraction = bits & ((1u64 << 52) - 1);
    let (mantissa, exponent) = if biased == 0 {
        (fraction, -1074)
    } else {
        (fraction | (1u64 << 52), biased - 1075)
    };
    if exponent >= 0 {
        return None;
    }

    let shift = (-exponent) as u32;
    let scaled = (mantissa as u128).checked_mul(10u128.checked_pow(digits as u32)?)?;
    // Beyond 127 the half exceeds any product of a 53-bit mantissa
    if shift > 127 {
        return None;
    }
    let half = 1u128 << (shift - 1);
    let remainder = scaled & ((1u128 << shift) - 1);
    (remainder == half).then(|| (scaled >> shift) + 1)
}

impl<const D: usize> Serialize for Fixed<D> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Receipt row as returned by either receipts endpoint.
///
/// v1 carries `ticket`, v2 carries `date`; categorized rows omit `product`,
/// uncategorized rows omit `category` and `name`.
#[derive(Debug, Clone, Deserialize)]
pub struct ReceiptRow {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub ticket: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub product: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub name: String,
    pub quantity: f64,
    pub sum: f64,
}

/// Which receipt a line item belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReceiptKey {
    /// v1: ticket identifier
    Ticket(String),
    /// v2: purchase date
    Date(String),
}

impl ReceiptKey {
    pub fn as_str(&self) -> &str {
        match self {
            ReceiptKey::Ticket(value) | ReceiptKey::Date(value) => value,
        }
    }

    /// Column heading for the key
    pub fn label(&self) -> &'static str {
        match self {
            ReceiptKey::Ticket(_) => "Ticket",
            ReceiptKey::Date(_) => "Date",
        }
    }
}

/// Receipt line item as rendered
#[derive(Debug, Clone, PartialEq)]
pub struct ReceiptRecord {
    pub key: ReceiptKey,
    pub product: String,
    pub category: String,
    pub name: String,
    pub quantity: Fixed<3>,
    pub sum: Fixed<2>,
    pub categorized: bool,
}

impl ReceiptRecord {
    pub(crate) fn from_row(row: ReceiptRow, key: ReceiptKey) -> Self {
        Self {
            categorized: row.kind == CATEGORIZED_TAG,
            key,
            product: row.product,
            category: row.category,
            name: row.name,
            quantity: Fixed(row.quantity),
            sum: Fixed(row.sum),
        }
    }
}

// ========================
// Replies
// ========================

/// `{items: [...]}` envelope of the list endpoints
#[derive(Debug, Deserialize)]
pub(crate) struct ListReply<T> {
    pub items: Vec<T>,
}

/// Reply of the QR code lookup
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct ScanReply {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}
