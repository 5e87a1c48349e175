//! Product catalog enum.
//!
//! The site sells exactly one book in five editions. The edition determines
//! pricing (see the server's catalog module), whether Stripe collects a
//! shipping address, whether a download link is issued on payment, and which
//! asset the download endpoint serves.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an unknown product type string.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
#[error("unknown product type: {0}")]
pub struct ParseProductTypeError(pub String);

/// The edition of the book being purchased.
///
/// Stored as text in the database and carried through Stripe checkout
/// metadata, so the wire form (`as_str`) is the canonical one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductType {
    /// Digital PDF ebook.
    Pdf,
    /// Audiobook plus bonus material, delivered as a ZIP.
    Audiobook,
    /// Printed paperback, fulfilled through the print vendor.
    Paperback,
    /// Printed hardback, fulfilled through the print vendor.
    Hardback,
    /// Everything: download package plus a printed hardback.
    Bundle,
}

/// What a download link for a product serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadKind {
    /// The ebook PDF.
    Ebook,
    /// The ZIP package (audiobook + bonus material + ebook).
    CompletePackage,
}

impl ProductType {
    /// All product types, in display order.
    pub const ALL: [Self; 5] = [
        Self::Pdf,
        Self::Audiobook,
        Self::Paperback,
        Self::Hardback,
        Self::Bundle,
    ];

    /// Canonical string form (matches checkout metadata and the database).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Audiobook => "audiobook",
            Self::Paperback => "paperback",
            Self::Hardback => "hardback",
            Self::Bundle => "bundle",
        }
    }

    /// Whether checkout must collect a shipping address (physical copy
    /// included).
    #[must_use]
    pub const fn requires_shipping(self) -> bool {
        matches!(self, Self::Paperback | Self::Hardback | Self::Bundle)
    }

    /// Whether a paid order of this type gets a download link.
    #[must_use]
    pub const fn includes_download(self) -> bool {
        matches!(self, Self::Pdf | Self::Audiobook | Self::Bundle)
    }

    /// Which asset a download link for this product serves.
    ///
    /// Products without a download link still map to the ebook so that a
    /// manually issued link does something sensible.
    #[must_use]
    pub const fn download_kind(self) -> DownloadKind {
        match self {
            Self::Audiobook | Self::Bundle => DownloadKind::CompletePackage,
            Self::Pdf | Self::Paperback | Self::Hardback => DownloadKind::Ebook,
        }
    }
}

impl fmt::Display for ProductType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ProductType {
    type Err = ParseProductTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pdf" => Ok(Self::Pdf),
            "audiobook" => Ok(Self::Audiobook),
            "paperback" => Ok(Self::Paperback),
            "hardback" => Ok(Self::Hardback),
            "bundle" => Ok(Self::Bundle),
            other => Err(ParseProductTypeError(other.to_owned())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_all() {
        for product in ProductType::ALL {
            let parsed: ProductType = product.as_str().parse().unwrap();
            assert_eq!(parsed, product);
        }
    }

    #[test]
    fn test_parse_unknown() {
        let err = "vinyl".parse::<ProductType>().unwrap_err();
        assert_eq!(err.0, "vinyl");
    }

    #[test]
    fn test_shipping_flags() {
        assert!(!ProductType::Pdf.requires_shipping());
        assert!(!ProductType::Audiobook.requires_shipping());
        assert!(ProductType::Paperback.requires_shipping());
        assert!(ProductType::Hardback.requires_shipping());
        assert!(ProductType::Bundle.requires_shipping());
    }

    #[test]
    fn test_download_flags() {
        // Physical-only editions do not get a link; the bundle gets both a
        // link and a print job.
        assert!(ProductType::Pdf.includes_download());
        assert!(ProductType::Audiobook.includes_download());
        assert!(ProductType::Bundle.includes_download());
        assert!(!ProductType::Paperback.includes_download());
        assert!(!ProductType::Hardback.includes_download());
    }

    #[test]
    fn test_download_kind() {
        assert_eq!(ProductType::Pdf.download_kind(), DownloadKind::Ebook);
        assert_eq!(
            ProductType::Bundle.download_kind(),
            DownloadKind::CompletePackage
        );
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&ProductType::Hardback).unwrap();
        assert_eq!(json, "\"hardback\"");
        let back: ProductType = serde_json::from_str("\"bundle\"").unwrap();
        assert_eq!(back, ProductType::Bundle);
    }
}
