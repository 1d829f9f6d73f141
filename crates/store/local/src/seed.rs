use chrono::Utc;
use lostfound_core::{Item, ItemType};

/// The two demonstration items a fresh local store starts with.
pub fn seed_items() -> Vec<Item> {
    let now = Utc::now();
    vec![
        Item {
            id: "1".to_owned(),
            item_type: ItemType::Lost,
            name: "Black Wallet".to_owned(),
            description: "Leather wallet with ID and a few cards.".to_owned(),
            location: "Downtown Park".to_owned(),
            latitude: None,
            longitude: None,
            date_reported: now,
            image_url: None,
            contact_info: "alex@example.com".to_owned(),
        },
        Item {
            id: "2".to_owned(),
            item_type: ItemType::Found,
            name: "Set of Keys".to_owned(),
            description: "Three keys on a blue keychain.".to_owned(),
            location: "Main Street Cafe".to_owned(),
            latitude: None,
            longitude: None,
            date_reported: now,
            image_url: None,
            contact_info: "jamie@example.com".to_owned(),
        },
    ]
}
