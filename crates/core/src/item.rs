use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Whether a report describes something lost or something found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum ItemType {
    Lost,
    Found,
}

impl ItemType {
    /// The wire representation (`"lost"` / `"found"`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lost => "lost",
            Self::Found => "found",
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for ItemType {
    type Err = String;

    /// Exact, case-sensitive match; anything else is an error.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lost" => Ok(Self::Lost),
            "found" => Ok(Self::Found),
            other => Err(format!("unknown item type: {other}")),
        }
    }
}

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Coordinates {
    /// Latitude in `[-90, 90]`.
    pub latitude: f64,
    /// Longitude in `[-180, 180]`.
    pub longitude: f64,
}

/// A lost or found report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "openapi", schema(example = json!({
    "id": "3f0c6a2e-4c1b-4a8e-9d53-2b1f1c7d9a10",
    "type": "lost",
    "name": "Black Wallet",
    "description": "Leather wallet with ID",
    "location": "Central Park",
    "latitude": 40.7829,
    "longitude": -73.9654,
    "date_reported": "2025-01-01T00:00:00Z",
    "image_url": null,
    "contact_info": "a@b.com"
})))]
pub struct Item {
    /// Opaque unique identifier, assigned at creation.
    pub id: String,
    /// Lost or found.
    #[serde(rename = "type")]
    pub item_type: ItemType,
    /// Short item name.
    pub name: String,
    /// Free-text description.
    pub description: String,
    /// Where the item was lost or found.
    pub location: String,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    /// Creation time, stamped by the service.
    pub date_reported: DateTime<Utc>,
    /// Public URL of an uploaded photo.
    #[serde(default)]
    pub image_url: Option<String>,
    /// Email address or phone number of the reporter.
    pub contact_info: String,
}

impl Item {
    /// Both coordinates, when both are present.
    pub fn coordinates(&self) -> Option<Coordinates> {
        match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => Some(Coordinates {
                latitude,
                longitude,
            }),
            _ => None,
        }
    }
}
