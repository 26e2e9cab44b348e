//! Fixed table of the Mongolian Stock Exchange companies the forecaster covers.
//!
//! The table is the single source of truth for tickers, display names and the
//! numeric company ids used by mse.mn. Everything that needs it (command
//! parsing, the API listing, report lookups) borrows [`CompanyRegistry::MSE`].

use serde::Serialize;

/// A listed company.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Company {
    pub ticker: &'static str,
    pub name: &'static str,
    /// Company id on mse.mn (`/mn/company/{id}`)
    pub mse_id: u32,
}

const MSE_COMPANIES: &[Company] = &[
    Company { ticker: "APU", name: "APU", mse_id: 90 },
    Company { ticker: "AIC", name: "ARD DAATGAL", mse_id: 54 },
    Company { ticker: "ADB", name: "ARD CREDIT BBSB", mse_id: 550 },
    Company { ticker: "AARD", name: "ARD", mse_id: 326 },
    Company { ticker: "BDS", name: "BDSEC", mse_id: 522 },
    Company { ticker: "GLMT", name: "GOLOMT BANK", mse_id: 562 },
    Company { ticker: "GOV", name: "GOVI", mse_id: 354 },
    Company { ticker: "NEH", name: "DARKHAN NEKHII", mse_id: 71 },
    Company { ticker: "INV", name: "INVESCORE", mse_id: 553 },
    Company { ticker: "LEND", name: "LENDMN", mse_id: 545 },
];

/// Immutable, ordered company table.
///
/// Iteration order is meaningful: command parsing picks the first company
/// that matches, so earlier entries win ties.
#[derive(Debug, Clone, Copy)]
pub struct CompanyRegistry {
    companies: &'static [Company],
}

impl CompanyRegistry {
    /// The ten MSE companies served by this workspace.
    pub const MSE: CompanyRegistry = CompanyRegistry {
        companies: MSE_COMPANIES,
    };

    /// Build a registry over an arbitrary static table. Must not be empty.
    pub const fn new(companies: &'static [Company]) -> Self {
        assert!(!companies.is_empty(), "company registry cannot be empty");
        Self { companies }
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static Company> {
        self.companies.iter()
    }

    pub fn companies(&self) -> &'static [Company] {
        self.companies
    }

    /// Case-insensitive ticker lookup.
    pub fn get(&self, ticker: &str) -> Option<&'static Company> {
        let ticker = ticker.trim();
        self.companies
            .iter()
            .find(|c| c.ticker.eq_ignore_ascii_case(ticker))
    }

    pub fn contains(&self, ticker: &str) -> bool {
        self.get(ticker).is_some()
    }

    /// Company selected when nothing else has been chosen yet.
    pub fn default_company(&self) -> &'static Company {
        &self.companies[0]
    }

    pub fn len(&self) -> usize {
        self.companies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.companies.is_empty()
    }
}

impl Default for CompanyRegistry {
    fn default() -> Self {
        Self::MSE
    }
}
