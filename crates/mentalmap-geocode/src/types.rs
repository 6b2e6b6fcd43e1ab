//! Response shapes for the Kakao Local address search API.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct AddressSearchResponse {
    pub documents: Vec<AddressDocument>,
}

/// One address match. Kakao serializes coordinates as strings:
/// `x` is longitude, `y` is latitude.
#[derive(Debug, Deserialize)]
pub(crate) struct AddressDocument {
    pub x: String,
    pub y: String,
    #[serde(default)]
    pub address_name: Option<String>,
}
