//! Catalogue locations
//!
//! The three BATSE gamma-ray burst tables (positions, fluxes, durations)
//! plus any other plaintext table given by URL.

const BATSE_TABLES: &str = "https://gammaray.nsstc.nasa.gov/batse/grb/catalog/current/tables";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogueSource {
    Basic, // trigger, date and sky position
    Flux, // fluences per channel and peak fluxes
    Duration, // T_50 and T_90
    Url(String),
}

impl CatalogueSource {
    pub fn url(&self) -> String {
        match self {
            CatalogueSource::Basic => format!("{BATSE_TABLES}/basic_table.txt"),
            CatalogueSource::Flux => format!("{BATSE_TABLES}/flux_table.txt"),
            CatalogueSource::Duration => format!("{BATSE_TABLES}/duration_table.txt"),
            CatalogueSource::Url(url) => url.clone(),
        }
    }
}
