//! In-process evaluation of an [`ItemQuery`], shared by every backend that
//! keeps its items in memory.

use lostfound_core::{Item, ItemPage, ItemQuery, Pagination};

fn contains_ignore_case(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

/// `true` when `item` passes every filter of `query`.
pub fn matches_query(query: &ItemQuery, item: &Item) -> bool {
    if let Some(item_type) = query.item_type {
        if item.item_type != item_type {
            return false;
        }
    }
    if let Some(ref location) = query.location {
        if !contains_ignore_case(&item.location, &location.to_lowercase()) {
            return false;
        }
    }
    if let Some(ref search) = query.search {
        let needle = search.to_lowercase();
        if !contains_ignore_case(&item.name, &needle)
            && !contains_ignore_case(&item.description, &needle)
        {
            return false;
        }
    }
    true
}

/// Newest first; equal timestamps fall back to descending `id` so pages are
/// stable.
pub fn sort_newest_first(items: &mut [Item]) {
    items.sort_by(|a, b| {
        b.date_reported
            .cmp(&a.date_reported)
            .then_with(|| b.id.cmp(&a.id))
    });
}

/// Filter, sort and paginate `items` according to `query`.
pub fn apply_query<'a, I>(query: &ItemQuery, items: I) -> ItemPage
where
    I: IntoIterator<Item = &'a Item>,
{
    let mut matching: Vec<Item> = items
        .into_iter()
        .filter(|item| matches_query(query, item))
        .cloned()
        .collect();
    sort_newest_first(&mut matching);

    let total = matching.len() as u64;
    let offset = usize::try_from(query.offset()).unwrap_or(usize::MAX);
    let limit = usize::try_from(query.limit).unwrap_or(usize::MAX);
    let items = matching.into_iter().skip(offset).take(limit).collect();

    ItemPage {
        items,
        pagination: Pagination {
            page: query.page,
            limit: query.limit,
            total,
        },
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};
    use lostfound_core::ItemType;

    use super::*;

    fn make_item(id: &str, item_type: ItemType, name: &str, minutes: i64) -> Item {
        Item {
            id: id.into(),
            item_type,
            name: name.into(),
            description: format!("{name} description"),
            location: "Downtown Park".into(),
            latitude: None,
            longitude: None,
            date_reported: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
                + Duration::minutes(minutes),
            image_url: None,
            contact_info: "a@b.com".into(),
        }
    }

    #[test]
    fn type_filter_is_exact() {
        let items = vec![
            make_item("a", ItemType::Lost, "Wallet", 1),
            make_item("b", ItemType::Found, "Keys", 2),
        ];
        let page = apply_query(&ItemQuery::default().with_type(ItemType::Lost), &items);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].id, "a");
    }

    #[test]
    fn search_matches_name_or_description_case_insensitively() {
        let mut other = make_item("c", ItemType::Found, "Phone", 3);
        other.description = "Found next to a brown WALLET".into();
        let items = vec![
            make_item("a", ItemType::Lost, "Black Wallet", 1),
            make_item("b", ItemType::Found, "Keys", 2),
            other,
        ];
        let page = apply_query(&ItemQuery::default().with_search("wallet"), &items);
        let ids: Vec<_> = page.items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, ["c", "a"]);
        assert_eq!(page.pagination.total, 2);
    }

    #[test]
    fn location_filter_is_substring() {
        let mut cafe = make_item("b", ItemType::Found, "Keys", 2);
        cafe.location = "Main Street Cafe".into();
        let items = vec![make_item("a", ItemType::Lost, "Wallet", 1), cafe];
        let page = apply_query(&ItemQuery::default().with_location("street"), &items);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].id, "b");
    }

    #[test]
    fn pages_slice_the_sorted_set() {
        let items: Vec<Item> = (0..25)
            .map(|i| make_item(&format!("item-{i:02}"), ItemType::Lost, "Wallet", i))
            .collect();
        let page = apply_query(&ItemQuery::default().with_page(2).with_limit(10), &items);
        assert_eq!(page.items.len(), 10);
        // Newest is item-24, so page two starts at item-14.
        assert_eq!(page.items[0].id, "item-14");
        assert_eq!(page.items[9].id, "item-05");
        assert_eq!(page.pagination.total, 25);

        let beyond = apply_query(&ItemQuery::default().with_page(9), &items);
        assert!(beyond.items.is_empty());
        assert_eq!(beyond.pagination.total, 25);
    }

    #[test]
    fn ties_break_on_id() {
        let items = vec![
            make_item("a", ItemType::Lost, "Wallet", 0),
            make_item("b", ItemType::Lost, "Wallet", 0),
        ];
        let page = apply_query(&ItemQuery::default(), &items);
        assert_eq!(page.items[0].id, "b");
    }
}
