use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::item::{Item, ItemType};
use crate::sanitize::sanitize_text;

/// A validated creation payload: every user-supplied field of an [`Item`].
///
/// Produced by [`validate_create`](crate::validate::validate_create) and also
/// used as the request body the client sends to `POST /items`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "openapi", schema(example = json!({
    "type": "lost",
    "name": "Black Wallet",
    "description": "Leather wallet with ID",
    "location": "Central Park",
    "contact_info": "a@b.com"
})))]
pub struct ItemDraft {
    #[serde(rename = "type")]
    pub item_type: ItemType,
    pub name: String,
    pub description: String,
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub contact_info: String,
}

impl ItemDraft {
    /// Strip markup from every text field.
    #[must_use]
    pub fn sanitized(self) -> Self {
        Self {
            item_type: self.item_type,
            name: sanitize_text(&self.name),
            description: sanitize_text(&self.description),
            location: sanitize_text(&self.location),
            latitude: self.latitude,
            longitude: self.longitude,
            image_url: self
                .image_url
                .map(|url| sanitize_text(&url))
                .filter(|url| !url.is_empty()),
            contact_info: sanitize_text(&self.contact_info),
        }
    }

    /// Attach the server-side creation time.
    pub fn into_new_item(self, date_reported: DateTime<Utc>) -> NewItem {
        NewItem {
            item_type: self.item_type,
            name: self.name,
            description: self.description,
            location: self.location,
            latitude: self.latitude,
            longitude: self.longitude,
            image_url: self.image_url,
            contact_info: self.contact_info,
            date_reported,
        }
    }
}

/// A fully prepared item that only lacks an identifier.
///
/// Stores receive this from the service and assign the `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewItem {
    #[serde(rename = "type")]
    pub item_type: ItemType,
    pub name: String,
    pub description: String,
    pub location: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub image_url: Option<String>,
    pub contact_info: String,
    pub date_reported: DateTime<Utc>,
}

impl NewItem {
    /// Materialize the item under the given identifier.
    pub fn into_item(self, id: impl Into<String>) -> Item {
        Item {
            id: id.into(),
            item_type: self.item_type,
            name: self.name,
            description: self.description,
            location: self.location,
            latitude: self.latitude,
            longitude: self.longitude,
            date_reported: self.date_reported,
            image_url: self.image_url,
            contact_info: self.contact_info,
        }
    }

    /// The user-supplied part, without the creation time.
    pub fn draft(&self) -> ItemDraft {
        ItemDraft {
            item_type: self.item_type,
            name: self.name.clone(),
            description: self.description.clone(),
            location: self.location.clone(),
            latitude: self.latitude,
            longitude: self.longitude,
            image_url: self.image_url.clone(),
            contact_info: self.contact_info.clone(),
        }
    }
}

/// A partial update. Absent fields are left untouched.
///
/// There is no way to express a change to `id` or
/// `date_reported`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "openapi", schema(example = json!({
    "description": "Leather wallet, found near the fountain"
})))]
pub struct ItemPatch {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub item_type: Option<ItemType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_info: Option<String>,
}

impl ItemPatch {
    /// `true` when the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Strip markup from every text field that is present.
    #[must_use]
    pub fn sanitized(self) -> Self {
        let clean = |v: Option<String>| v.map(|s| sanitize_text(&s));
        Self {
            item_type: self.item_type,
            name: clean(self.name),
            description: clean(self.description),
            location: clean(self.location),
            latitude: self.latitude,
            longitude: self.longitude,
            image_url: clean(self.image_url),
            contact_info: clean(self.contact_info),
        }
    }

    /// Apply the present fields to `item`.
    pub fn apply_to(&self, item: &mut Item) {
        if let Some(item_type) = self.item_type {
            item.item_type = item_type;
        }
        if let Some(ref name) = self.name {
            item.name.clone_from(name);
        }
        if let Some(ref description) = self.description {
            item.description.clone_from(description);
        }
        if let Some(ref location) = self.location {
            item.location.clone_from(location);
        }
        if let Some(latitude) = self.latitude {
            item.latitude = Some(latitude);
        }
        if let Some(longitude) = self.longitude {
            item.longitude = Some(longitude);
        }
        if let Some(ref image_url) = self.image_url {
            item.image_url = Some(image_url.clone());
        }
        if let Some(ref contact_info) = self.contact_info {
            item.contact_info.clone_from(contact_info);
        }
    }
}
