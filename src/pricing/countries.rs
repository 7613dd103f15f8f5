//! Built-in market configuration table.
//!
//! Seed data for [`CountryRegistry`](super::CountryRegistry): every sales
//! market with its currency, ending rule, VAT rate and EUR exchange rate.
//! Market names are the platform's exact spellings and are never normalized.
//! Exchange rates and VAT are starting values; both are hot-patchable through
//! the registry.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::domain::{AdjustmentPolicy, CountryConfig, RoundingRule};

use RoundingRule::{Ending00, Ending95, Ending99, Ending9Int, HufPattern, Nordic5, Thousands};

fn market(
    name: &str,
    currency: &str,
    rule: RoundingRule,
    vat: Decimal,
    exchange_rate: Decimal,
) -> (String, CountryConfig) {
    (
        name.to_string(),
        CountryConfig {
            currency: currency.to_string(),
            rule,
            vat,
            exchange_rate,
            adjustment: AdjustmentPolicy::None,
        },
    )
}

/// The full built-in market table.
#[must_use]
pub fn builtin_markets() -> Vec<(String, CountryConfig)> {
    vec![
        // Eurozone
        market("France", "EUR", Ending99, dec!(0.20), dec!(1)),
        market("Allemagne", "EUR", Ending95, dec!(0.19), dec!(1)),
        market("Italie", "EUR", Ending00, dec!(0.22), dec!(1)),
        market("Espagne", "EUR", Ending99, dec!(0.21), dec!(1)),
        market("Belgique", "EUR", Ending99, dec!(0.21), dec!(1)),
        market("Pays-Bas", "EUR", Ending99, dec!(0.21), dec!(1)),
        market("Luxembourg", "EUR", Ending99, dec!(0.17), dec!(1)),
        market("Autriche", "EUR", Ending95, dec!(0.20), dec!(1)),
        market("Portugal", "EUR", Ending99, dec!(0.23), dec!(1)),
        market("Irlande", "EUR", Ending99, dec!(0.23), dec!(1)),
        market("Grèce", "EUR", Ending99, dec!(0.24), dec!(1)),
        market("Finlande", "EUR", Ending99, dec!(0.24), dec!(1)),
        market("Estonie", "EUR", Ending99, dec!(0.20), dec!(1)),
        market("Croatie", "EUR", Ending99, dec!(0.25), dec!(1)),
        // Rest of Europe
        market("UK", "GBP", Ending99, dec!(0.20), dec!(0.86)),
        market("Suisse", "CHF", Ending95, dec!(0.077), dec!(0.97)),
        market("Pologne", "PLN", Ending99, dec!(0.23), dec!(4.32)),
        market("Danemark", "DKK", Nordic5, dec!(0.25), dec!(7.46)),
        market("Suède", "SEK", Nordic5, dec!(0.25), dec!(11.5)),
        market("Norvège", "NOK", Ending00, dec!(0.25), dec!(11.8)),
        market("Hongrie", "HUF", HufPattern, dec!(0.27), dec!(395)),
        market("République Tchèque", "CZK", HufPattern, dec!(0.21), dec!(25.3)),
        market("Turquie", "TRY", Ending99, dec!(0.20), dec!(34.5)),
        market("Serbie", "RSD", HufPattern, dec!(0.20), dec!(117)),
        // North America
        market("USA", "USD", Ending99, dec!(0), dec!(1.09)),
        market("Canada", "CAD", Ending99, dec!(0.05), dec!(1.48)),
        market("Mexique", "MXN", Ending99, dec!(0.16), dec!(18.7)),
        // South and Central America
        market("Brésil", "BRL", Ending00, dec!(0), dec!(5.3)),
        market("Argentine", "ARS", Ending00, dec!(0.21), dec!(980)),
        market("Chili", "CLP", Thousands, dec!(0.19), dec!(980)),
        market("Colombie", "COP", Thousands, dec!(0.19), dec!(4300)),
        market("Pérou", "PEN", Ending99, dec!(0.18), dec!(4.05)),
        market("Uruguay", "UYU", Ending00, dec!(0.22), dec!(42)),
        market("Paraguay", "PYG", Thousands, dec!(0.10), dec!(7800)),
        market("Bolivie", "BOB", Ending99, dec!(0.13), dec!(6.9)),
        market("Équateur", "USD", Ending00, dec!(0.12), dec!(1.09)),
        market("Costa Rica", "CRC", Ending00, dec!(0.13), dec!(530)),
        market("Guatemala", "GTQ", Ending99, dec!(0.12), dec!(7.8)),
        market("Honduras", "HNL", Ending99, dec!(0.15), dec!(25)),
        market("Panama", "USD", Ending00, dec!(0.07), dec!(1.09)),
        market("Salvador", "USD", Ending00, dec!(0.13), dec!(1.09)),
        market("République Dominicaine", "DOP", Ending00, dec!(0.18), dec!(60)),
        // Asia-Pacific
        market("Australie", "AUD", Ending99, dec!(0.10), dec!(1.65)),
        market("Nouvelle-Zélande", "NZD", Ending99, dec!(0.15), dec!(1.78)),
        market("Hong Kong", "HKD", Ending00, dec!(0), dec!(8.5)),
        market("Singapour", "SGD", Ending00, dec!(0.09), dec!(1.46)),
        market("Malaisie", "MYR", Ending00, dec!(0.10), dec!(4.8)),
        // Middle East
        market("Arabie Saoudite", "SAR", Ending9Int, dec!(0.15), dec!(4.1)),
        market("UAE", "AED", Ending9Int, dec!(0.05), dec!(4.0)),
        market("Qatar", "QAR", Ending9Int, dec!(0), dec!(3.97)),
        market("Koweït", "KWD", Ending00, dec!(0), dec!(0.335)),
        market("Bahreïn", "BHD", Ending00, dec!(0.10), dec!(0.41)),
        market("Oman", "OMR", Ending00, dec!(0.05), dec!(0.42)),
        market("Jordanie", "JOD", Ending00, dec!(0.16), dec!(0.77)),
        market("Liban", "USD", Ending00, dec!(0.11), dec!(1.09)),
        market("Israël", "ILS", Ending99, dec!(0.17), dec!(3.9)),
        // Africa
        market("Afrique du Sud", "ZAR", Ending00, dec!(0.15), dec!(19.5)),
    ]
}
