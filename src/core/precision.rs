use rust_decimal::{Decimal, RoundingStrategy};
use std::collections::HashMap;

/// Decimal places used for symbols missing from the table.
pub const DEFAULT_PRECISION: u32 = 6;

/// Largest scale we accept from configuration.
pub const MAX_PRECISION: u32 = 18;

const BUILTIN_PRECISION: &[(u32, &[&str])] = &[
    (
        8,
        &[
            "BTC", "ETH", "LTC", "BCH", "DOT", "LINK", "UNI", "AAVE", "SUSHI", "CRV", "YFI",
            "COMP", "INDEX", "CVX", "EIGEN", "KERNEL", "ETHFI",
        ],
    ),
    (
        6,
        &[
            "USDT", "DAI", "BUSD", "TUSD", "HOPR", "OMNI", "CLANKER", "LOKA", "SWELL", "FIS",
            "PENGU", "SD", "GIGA", "HFT", "ALT", "REZ", "SXT",
        ],
    ),
    (
        4,
        &[
            "DOGE", "SHIB", "PEPE", "FLOKI", "BONK", "WIF", "PIRATE", "POPCAT", "COOKIE",
            "KEYCAT", "TURBO", "DEGEN", "MOG", "DOGINME", "ALEPH", "MOODENG", "AST", "PRCL",
            "PROMPT", "PNUT", "IDEX", "MDT", "SYRUP",
        ],
    ),
    (
        2,
        &[
            "STRK", "ARB", "OP", "MATIC", "AVAX", "SOL", "ATOM", "NEAR", "FTM", "ONE", "ALGO",
        ],
    ),
    (
        0,
        &["EDGE", "ZORA", "XRP", "XLM", "ADA", "TRX", "EOS", "XTZ"],
    ),
];

/// Allowed order-size decimals per asset symbol.
///
/// Built once at startup and shared by reference; lookups are exact-symbol
/// first and fall back to `default_precision`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrecisionTable {
    entries: HashMap<String, u32>,
    default_precision: u32,
}

impl PrecisionTable {
    pub fn new(entries: HashMap<String, u32>, default_precision: u32) -> Self {
        Self {
            entries,
            default_precision,
        }
    }

    pub fn builtin() -> Self {
        let entries = BUILTIN_PRECISION
            .iter()
            .flat_map(|(places, symbols)| symbols.iter().map(move |s| (s.to_string(), *places)))
            .collect();
        Self::new(entries, DEFAULT_PRECISION)
    }

    pub fn with_default(mut self, default_precision: u32) -> Self {
        self.default_precision = default_precision;
        self
    }

    pub fn with_overrides<I, S>(mut self, overrides: I) -> Self
    where
        I: IntoIterator<Item = (S, u32)>,
        S: AsRef<str>,
    {
        for (symbol, places) in overrides {
            self.entries
                .insert(symbol.as_ref().to_ascii_uppercase(), places);
        }
        self
    }

    pub fn default_precision(&self) -> u32 {
        self.default_precision
    }

    pub fn precision_for(&self, symbol: &str) -> u32 {
        self.entries
            .get(symbol)
            .copied()
            .unwrap_or(self.default_precision)
    }

    /// Largest value `<= amount` representable with the symbol's precision.
    pub fn floor(&self, symbol: &str, amount: Decimal) -> Decimal {
        floor_to_precision(amount, self.precision_for(symbol))
    }
}

impl Default for PrecisionTable {
    fn default() -> Self {
        Self::builtin()
    }
}

pub fn floor_to_precision(amount: Decimal, places: u32) -> Decimal {
    amount.round_dp_with_strategy(places, RoundingStrategy::ToNegativeInfinity)
}
