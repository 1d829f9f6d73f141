use chrono::{DateTime, Duration, TimeZone, Utc};
use lostfound_core::{ItemPatch, ItemQuery, ItemType, NewItem};

use crate::error::StoreError;
use crate::store::ItemStore;

fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0)
        .single()
        .unwrap_or_else(Utc::now)
}

fn new_item(item_type: ItemType, name: &str, minutes: i64) -> NewItem {
    NewItem {
        item_type,
        name: name.to_owned(),
        description: format!("{name} left behind"),
        location: "Conformance Hall".to_owned(),
        latitude: None,
        longitude: None,
        image_url: None,
        contact_info: "tester@example.com".to_owned(),
        date_reported: base_time() + Duration::minutes(minutes),
    }
}

/// Run the full item store conformance test suite.
///
/// Call this from your backend's test module with a fresh store instance.
/// Items that already exist in the store do not disturb the suite: every
/// listing it performs is narrowed by a search term only its own items use.
///
/// # Errors
///
/// Returns an error if the store fails an operation.
pub async fn run_store_conformance_tests(store: &dyn ItemStore) -> Result<(), StoreError> {
    test_get_missing(store).await?;
    test_create_and_get(store).await?;
    test_update_partial(store).await?;
    test_update_missing(store).await?;
    test_delete(store).await?;
    test_list_filters(store).await?;
    test_list_pagination(store).await?;
    Ok(())
}

async fn test_get_missing(store: &dyn ItemStore) -> Result<(), StoreError> {
    let got = store.get("never-created").await?;
    assert!(got.is_none(), "get on missing id should return None");
    Ok(())
}

async fn test_create_and_get(store: &dyn ItemStore) -> Result<(), StoreError> {
    let input = new_item(ItemType::Lost, "Conformance Umbrella", 0);
    let created = store.create(input.clone()).await?;
    assert!(!created.id.is_empty(), "store must assign an id");
    assert_eq!(created.name, input.name);
    assert_eq!(created.date_reported, input.date_reported);

    let fetched = store.get(&created.id).await?;
    assert_eq!(fetched.as_ref(), Some(&created));

    let other = store.create(input).await?;
    assert_ne!(other.id, created.id, "ids must be unique");
    Ok(())
}

async fn test_update_partial(store: &dyn ItemStore) -> Result<(), StoreError> {
    let created = store
        .create(new_item(ItemType::Found, "Conformance Scarf", 1))
        .await?;
    let patch = ItemPatch {
        location: Some("Lost Property Office".to_owned()),
        latitude: Some(51.5),
        longitude: Some(-0.12),
        ..Default::default()
    };
    let updated = store
        .update(&created.id, &patch)
        .await?
        .expect("update of existing item should return it");

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.date_reported, created.date_reported);
    assert_eq!(updated.name, created.name);
    assert_eq!(updated.location, "Lost Property Office");
    assert_eq!(updated.latitude, Some(51.5));

    let fetched = store.get(&created.id).await?;
    assert_eq!(fetched.as_ref(), Some(&updated), "update must persist");

    let unchanged = store
        .update(&created.id, &ItemPatch::default())
        .await?
        .expect("empty patch on existing item should return it");
    assert_eq!(unchanged, updated);
    Ok(())
}

async fn test_update_missing(store: &dyn ItemStore) -> Result<(), StoreError> {
    let patch = ItemPatch {
        name: Some("Ghost".to_owned()),
        ..Default::default()
    };
    let result = store.update("never-created", &patch).await?;
    assert!(result.is_none(), "update on missing id should return None");
    Ok(())
}

async fn test_delete(store: &dyn ItemStore) -> Result<(), StoreError> {
    let created = store
        .create(new_item(ItemType::Lost, "Conformance Glove", 2))
        .await?;
    let existed = store.delete(&created.id).await?;
    assert!(existed, "delete should return true for existing item");
    assert!(store.get(&created.id).await?.is_none(), "get after delete");

    let existed = store.delete(&created.id).await?;
    assert!(!existed, "delete on missing item should return false");
    assert!(
        store
            .update(
                &created.id,
                &ItemPatch {
                    name: Some("Back".to_owned()),
                    ..Default::default()
                }
            )
            .await?
            .is_none(),
        "update after delete should return None"
    );
    Ok(())
}

async fn test_list_filters(store: &dyn ItemStore) -> Result<(), StoreError> {
    store
        .create(new_item(ItemType::Lost, "Zebrafilter Wallet", 10))
        .await?;
    store
        .create(new_item(ItemType::Found, "Zebrafilter Keys", 11))
        .await?;
    let mut phone = new_item(ItemType::Lost, "Zebrafilter Phone", 12);
    phone.location = "Riverside Library".to_owned();
    phone.description = "Cracked screen, next to a WALLET".to_owned();
    store.create(phone).await?;

    let lost = store
        .list(&ItemQuery::default().with_search("zebrafilter").with_type(ItemType::Lost))
        .await?;
    assert_eq!(lost.pagination.total, 2);
    assert!(lost.items.iter().all(|i| i.item_type == ItemType::Lost));

    let wallets = store
        .list(&ItemQuery::default().with_search("ZEBRAFILTER wallet"))
        .await?;
    assert_eq!(wallets.pagination.total, 1, "search is a single substring");

    let library = store
        .list(
            &ItemQuery::default()
                .with_search("zebrafilter")
                .with_location("library"),
        )
        .await?;
    assert_eq!(library.items.len(), 1);
    assert_eq!(library.items[0].name, "Zebrafilter Phone");

    let newest_first = store
        .list(&ItemQuery::default().with_search("zebrafilter"))
        .await?;
    let names: Vec<&str> = newest_first.items.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(
        names,
        ["Zebrafilter Phone", "Zebrafilter Keys", "Zebrafilter Wallet"]
    );
    Ok(())
}

async fn test_list_pagination(store: &dyn ItemStore) -> Result<(), StoreError> {
    for i in 0..25 {
        store
            .create(new_item(ItemType::Found, &format!("Pagetoken Item {i:02}"), 100 + i))
            .await?;
    }
    let query = ItemQuery::default().with_search("pagetoken");

    let second = store.list(&query.clone().with_page(2).with_limit(10)).await?;
    assert_eq!(second.pagination.total, 25);
    assert_eq!(second.pagination.page, 2);
    assert_eq!(second.pagination.limit, 10);
    assert_eq!(second.items.len(), 10);
    assert_eq!(second.items[0].name, "Pagetoken Item 14");
    assert_eq!(second.items[9].name, "Pagetoken Item 05");

    let zero = store.list(&query.clone().with_page(0)).await?;
    let first = store.list(&query.clone().with_page(1)).await?;
    assert_eq!(zero.items, first.items, "page 0 behaves like page 1");
    assert_eq!(first.items.len(), 20);

    let last = store.list(&query.clone().with_page(3).with_limit(10)).await?;
    assert_eq!(last.items.len(), 5);

    let beyond = store.list(&query.with_page(4).with_limit(10)).await?;
    assert!(beyond.items.is_empty());
    assert_eq!(beyond.pagination.total, 25);
    Ok(())
}
