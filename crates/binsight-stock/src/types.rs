//! Response types for the warehouse stock-lookup API.
//!
//! ## Observed envelope
//!
//! The API wraps results in `{ "data": [ ... ] }`; an unknown code returns an
//! empty `data` array rather than a 404. `binLocations` arrives either as a
//! single string (`"A1"`) or an array of strings (`["A1","A2"]`) depending on
//! how many bins hold the SKU. `htsUS` is the vendor's field for the maximum
//! bin quantity despite the name.

use serde::Deserialize;

/// Top-level envelope from the stock-lookup endpoints.
#[derive(Debug, Deserialize)]
pub struct StockLookupResponse {
    #[serde(default)]
    pub data: Vec<StockEntry>,
}

/// One warehouse record for a SKU or barcode.
#[derive(Debug, Clone, Deserialize)]
pub struct StockEntry {
    /// Bin location tag(s); string or array on the wire.
    #[serde(rename = "binLocations", default)]
    pub bin_locations: Option<BinLocations>,
    /// Maximum bin quantity (vendor field name kept as-is).
    #[serde(rename = "htsUS", default)]
    pub hts_us: Option<i32>,
    #[serde(rename = "imageURL", default)]
    pub image_url: Option<String>,
    #[serde(rename = "quantityOnHand", default)]
    pub quantity_on_hand: Option<i32>,
}

/// `binLocations` wire forms.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum BinLocations {
    One(String),
    Many(Vec<String>),
}

impl BinLocations {
    /// Comma-joins multi-bin locations into the single display/storage form.
    #[must_use]
    pub fn joined(&self) -> String {
        match self {
            BinLocations::One(location) => location.clone(),
            BinLocations::Many(locations) => locations.join(", "),
        }
    }
}
