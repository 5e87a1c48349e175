//! The product catalog.
//!
//! One book, five editions. Prices are in cents and flow straight into
//! checkout session creation; the descriptions are what Stripe shows on the
//! hosted payment page.

use advice_for_life_core::ProductType;

/// Title printed on the book and sent to the print vendor.
pub const BOOK_TITLE: &str = "Advice for Life from a Drug Addict";

/// Countries Stripe may collect a shipping address for.
pub const ALLOWED_SHIPPING_COUNTRIES: [&str; 8] =
    ["US", "CA", "GB", "AU", "DE", "FR", "IT", "ES"];

/// A sellable edition of the book.
#[derive(Debug, Clone, Copy)]
pub struct Product {
    pub product_type: ProductType,
    pub name: &'static str,
    pub description: &'static str,
    /// Price in cents.
    pub unit_amount: i64,
}

/// Look up the catalog entry for an edition.
#[must_use]
pub const fn product(product_type: ProductType) -> Product {
    match product_type {
        ProductType::Pdf => Product {
            product_type,
            name: "Advice for Life from a Drug Addict - PDF eBook",
            description: "Digital PDF ebook by Brandon Rohm. Instant download.",
            unit_amount: 1499,
        },
        ProductType::Audiobook => Product {
            product_type,
            name: "Advice for Life from a Drug Addict - Audiobook + Bonuses",
            description: "Full audiobook narrated by Brandon Rohm, plus bonus stories and \
                          5 Songs playlist for hard times.",
            unit_amount: 1999,
        },
        ProductType::Paperback => Product {
            product_type,
            name: "Advice for Life from a Drug Addict - Paperback Physical Copy",
            description: "Quality paperback edition shipped to your door. Includes PDF version.",
            unit_amount: 2499,
        },
        ProductType::Hardback => Product {
            product_type,
            name: "Advice for Life from a Drug Addict - Hardback Physical Copy",
            description: "Premium hardback edition shipped to your door. Includes PDF version.",
            unit_amount: 4199,
        },
        ProductType::Bundle => Product {
            product_type,
            name: "Advice for Life from a Drug Addict - Complete Bundle",
            description: "PDF eBook + Audiobook with Bonuses + Hardback Physical Copy. \
                          Save $36.97!",
            unit_amount: 5999,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prices() {
        assert_eq!(product(ProductType::Pdf).unit_amount, 1499);
        assert_eq!(product(ProductType::Audiobook).unit_amount, 1999);
        assert_eq!(product(ProductType::Paperback).unit_amount, 2499);
        assert_eq!(product(ProductType::Hardback).unit_amount, 4199);
        assert_eq!(product(ProductType::Bundle).unit_amount, 5999);
    }

    #[test]
    fn test_every_edition_has_a_distinct_name() {
        let names: Vec<_> = ProductType::ALL.iter().map(|&p| product(p).name).collect();
        let mut deduped = names.clone();
        deduped.sort_unstable();
        deduped.dedup();
        assert_eq!(deduped.len(), names.len());
    }
}
