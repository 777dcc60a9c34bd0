//! Filter, sort and paginate the canonical property list. Everything here is
//! a pure function of its inputs; the source list is never modified.

pub mod price;
pub mod types;

pub use types::{Facets, SearchPage, SortOrder, ALL_AREAS, ALL_TYPES, PER_PAGE};

use crate::models::Property;
use std::cmp::Ordering;

/// Apply every facet except pagination, then sort. The sort is stable, so
/// ties keep their relative order from `properties`.
pub fn filter_and_sort<'a>(properties: &'a [Property], facets: &Facets) -> Vec<&'a Property> {
    let mut list: Vec<&Property> = properties
        .iter()
        .filter(|p| p.purpose == Some(facets.purpose))
        .collect();

    if let Some(wanted) = location_filter(&facets.location) {
        list.retain(|p| p.location.trim().to_lowercase() == wanted);
    }

    if is_active(&facets.property_type, ALL_TYPES) {
        list.retain(|p| p.property_type == facets.property_type);
    }

    // Non-numeric values ("Studio – 1 – 2 – 3") never satisfy a threshold.
    if let Some(min) = facets.bedrooms {
        list.retain(|p| p.bedroom_count().map_or(false, |n| n >= f64::from(min)));
    }
    if let Some(min) = facets.bathrooms {
        list.retain(|p| p.bathroom_count().map_or(false, |n| n >= f64::from(min)));
    }

    if let Some(min) = facets
        .price_min
        .as_deref()
        .and_then(|key| price::min_bound(facets.purpose, key))
    {
        list.retain(|p| p.price_amount().map_or(false, |a| a >= min));
    }
    if let Some(max) = facets
        .price_max
        .as_deref()
        .and_then(|key| price::max_bound(facets.purpose, key))
    {
        list.retain(|p| p.price_amount().map_or(false, |a| a <= max));
    }

    sort(&mut list, facets.sort);
    list
}

/// Sort in place. Records without a sort key (non-numeric id for `newest`,
/// non-numeric price for the price orders) go last, keeping their relative order.
pub fn sort(list: &mut [&Property], order: SortOrder) {
    match order {
        SortOrder::Newest => list.sort_by(|a, b| keyed(id_key(a), id_key(b), true)),
        SortOrder::PriceAsc => {
            list.sort_by(|a, b| keyed(a.price_amount(), b.price_amount(), false))
        }
        SortOrder::PriceDesc => {
            list.sort_by(|a, b| keyed(a.price_amount(), b.price_amount(), true))
        }
    }
}

/// Slice out one page. `page` is clamped to `[1, total_pages]` and there is
/// always at least one (possibly empty) page.
pub fn paginate<T: Clone>(items: &[T], page: usize, per_page: usize) -> (Vec<T>, usize, usize) {
    let per_page = per_page.max(1);
    let total_pages = items.len().div_ceil(per_page).max(1);
    let page = page.clamp(1, total_pages);
    let start = (page - 1) * per_page;
    let end = (start + per_page).min(items.len());
    let slice = items.get(start..end).unwrap_or(&[]).to_vec();
    (slice, page, total_pages)
}

/// Run the full pipeline and return the requested page.
pub fn search(properties: &[Property], facets: &Facets) -> SearchPage {
    let matches = filter_and_sort(properties, facets);
    let total = matches.len();
    let (items, page, total_pages) = paginate(&matches, facets.page, PER_PAGE);
    SearchPage {
        items: items.into_iter().cloned().collect(),
        total,
        page,
        total_pages,
        per_page: PER_PAGE,
    }
}

fn is_active(value: &str, all_sentinel: &str) -> bool {
    let value = value.trim();
    !value.is_empty() && !value.eq_ignore_ascii_case(all_sentinel)
}

fn location_filter(location: &str) -> Option<String> {
    if is_active(location, ALL_AREAS) {
        Some(location.trim().to_lowercase())
    } else {
        None
    }
}

fn id_key(p: &Property) -> Option<f64> {
    p.id.as_number().map(|n| n as f64)
}

fn keyed(a: Option<f64>, b: Option<f64>, descending: bool) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => {
            if descending {
                y.total_cmp(&x)
            } else {
                x.total_cmp(&y)
            }
        }
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Purpose;
    use crate::normalize::normalize_property;
    use proptest::prelude::*;
    use serde_json::{json, Value};

    fn prop(raw: Value) -> Property {
        normalize_property(&raw).unwrap()
    }

    fn ids(list: &[&Property]) -> Vec<String> {
        list.iter().map(|p| p.id.to_string()).collect()
    }

    fn listing(id: i64, purpose: Purpose, price: u64) -> Property {
        prop(json!({
            "id": id,
            "title": format!("Listing {}", id),
            "purpose": purpose.as_str(),
            "price": price
        }))
    }

    #[test]
    fn test_buy_sorted_by_price_asc() {
        let list = vec![
            prop(json!({"id": 1, "title": "A", "purpose": "buy", "price": 500000})),
            prop(json!({"id": 2, "title": "B", "purpose": "rent", "price": 80000})),
            prop(json!({"id": 3, "title": "C", "purpose": "buy", "price": 1200000})),
        ];
        let facets = Facets {
            sort: SortOrder::PriceAsc,
            ..Facets::for_purpose(Purpose::Buy)
        };
        let result = filter_and_sort(&list, &facets);
        assert_eq!(ids(&result), vec!["1", "3"]);
        assert_eq!(result[0].price_amount(), Some(500_000.0));
        assert_eq!(result[1].price_amount(), Some(1_200_000.0));
    }

    #[test]
    fn test_location_is_case_and_whitespace_insensitive() {
        let list = vec![
            prop(json!({"id": 1, "title": "A", "purpose": "buy", "location": " Dubai Marina "})),
            prop(json!({"id": 2, "title": "B", "purpose": "buy", "location": "Business Bay"})),
        ];
        let facets = Facets {
            location: "dubai marina".into(),
            ..Facets::default()
        };
        assert_eq!(ids(&filter_and_sort(&list, &facets)), vec!["1"]);

        let all = Facets {
            location: "all areas".into(),
            ..Facets::default()
        };
        assert_eq!(filter_and_sort(&list, &all).len(), 2);
    }

    #[test]
    fn test_type_filter_is_exact() {
        let list = vec![
            prop(json!({"id": 1, "title": "A", "purpose": "buy", "type": "Villa"})),
            prop(json!({"id": 2, "title": "B", "purpose": "buy", "type": "villa"})),
            prop(json!({"id": 3, "title": "C", "purpose": "buy", "type": "Apartment"})),
        ];
        let facets = Facets {
            property_type: "Villa".into(),
            ..Facets::default()
        };
        assert_eq!(ids(&filter_and_sort(&list, &facets)), vec!["1"]);
    }

    #[test]
    fn test_bedroom_threshold_excludes_descriptive_values() {
        let list = vec![
            prop(json!({"id": 1, "title": "A", "purpose": "buy", "bedrooms": "3", "bathrooms": 2})),
            prop(json!({"id": 2, "title": "B", "purpose": "buy", "bedrooms": "Studio – 1 – 2"})),
            prop(json!({"id": 3, "title": "C", "purpose": "buy", "bedrooms": 1})),
            prop(json!({"id": 4, "title": "D", "purpose": "buy", "bedrooms": "6", "bathrooms": 5})),
            prop(json!({"id": 5, "title": "E", "purpose": "buy", "bedrooms": "inf"})),
        ];
        let facets = Facets {
            bedrooms: Some(2),
            ..Facets::default()
        };
        assert_eq!(ids(&filter_and_sort(&list, &facets)), vec!["4", "1"]);

        let facets = Facets {
            bedrooms: Some(5),
            ..Facets::default()
        };
        assert_eq!(ids(&filter_and_sort(&list, &facets)), vec!["4"]);

        let facets = Facets {
            bathrooms: Some(4),
            ..Facets::default()
        };
        assert_eq!(ids(&filter_and_sort(&list, &facets)), vec!["4"]);

        // No threshold: descriptive values are kept.
        assert_eq!(filter_and_sort(&list, &Facets::default()).len(), 5);
    }

    #[test]
    fn test_price_bounds_use_purpose_tables() {
        let list = vec![
            listing(1, Purpose::Rent, 40_000),
            listing(2, Purpose::Rent, 75_000),
            listing(3, Purpose::Rent, 150_000),
            prop(json!({"id": 4, "title": "D", "purpose": "rent", "price": "On Request"})),
        ];
        let facets = Facets {
            price_min: Some("50000-100000".into()),
            price_max: Some("100000".into()),
            ..Facets::for_purpose(Purpose::Rent)
        };
        assert_eq!(ids(&filter_and_sort(&list, &facets)), vec!["2"]);

        let unbounded = Facets {
            price_max: Some("-".into()),
            ..Facets::for_purpose(Purpose::Rent)
        };
        assert_eq!(filter_and_sort(&list, &unbounded).len(), 4);
    }

    #[test]
    fn test_newest_orders_by_id_desc() {
        let list = vec![
            listing(2, Purpose::Buy, 1),
            prop(json!({"id": "slug-only", "title": "X", "purpose": "buy"})),
            listing(10, Purpose::Buy, 1),
            prop(json!({"id": "7", "title": "Y", "purpose": "buy"})),
        ];
        assert_eq!(
            ids(&filter_and_sort(&list, &Facets::default())),
            vec!["10", "7", "2", "slug-only"]
        );
    }

    #[test]
    fn test_unpriced_records_sort_last_both_ways() {
        let list = vec![
            prop(json!({"id": 1, "title": "A", "purpose": "buy", "price": "On Request"})),
            listing(2, Purpose::Buy, 900_000),
            listing(3, Purpose::Buy, 300_000),
        ];
        let asc = Facets {
            sort: SortOrder::PriceAsc,
            ..Facets::default()
        };
        let desc = Facets {
            sort: SortOrder::PriceDesc,
            ..Facets::default()
        };
        assert_eq!(ids(&filter_and_sort(&list, &asc)), vec!["3", "2", "1"]);
        assert_eq!(ids(&filter_and_sort(&list, &desc)), vec!["2", "3", "1"]);
    }

    #[test]
    fn test_stable_ties() {
        let list = vec![
            listing(1, Purpose::Buy, 500),
            listing(2, Purpose::Buy, 500),
            listing(3, Purpose::Buy, 100),
        ];
        let facets = Facets {
            sort: SortOrder::PriceDesc,
            ..Facets::default()
        };
        assert_eq!(ids(&filter_and_sort(&list, &facets)), vec!["1", "2", "3"]);
    }

    #[test]
    fn test_empty_result_is_a_page() {
        let page = search(&[], &Facets::default());
        assert!(page.is_empty());
        assert_eq!(page.page, 1);
        assert_eq!(page.total_pages, 1);
        assert!(page.items.is_empty());
    }

    #[test]
    fn test_search_clamps_page() {
        let list: Vec<Property> = (1..=30).map(|i| listing(i, Purpose::Buy, 1000)).collect();
        let page = search(&list, &Facets { page: 9, ..Facets::default() });
        assert_eq!(page.total, 30);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.page, 3);
        assert_eq!(page.items.len(), 6);
        // Newest first: the last page holds the smallest ids.
        assert_eq!(page.items.last().map(|p| p.id.to_string()), Some("1".to_string()));

        let first = search(&list, &Facets { page: 0, ..Facets::default() });
        assert_eq!(first.page, 1);
        assert_eq!(first.items.len(), PER_PAGE);
    }

    fn arb_listings() -> impl Strategy<Value = Vec<Property>> {
        prop::collection::vec((0usize..3, 0u64..5_000_000), 0..60).prop_map(|rows| {
            rows.into_iter()
                .enumerate()
                .map(|(i, (purpose, price))| listing(i as i64 + 1, Purpose::ALL[purpose], price))
                .collect()
        })
    }

    proptest! {
        #[test]
        fn purpose_filter_is_idempotent(list in arb_listings(), purpose in 0usize..3) {
            let facets = Facets::for_purpose(Purpose::ALL[purpose]);
            let once: Vec<Property> =
                filter_and_sort(&list, &facets).into_iter().cloned().collect();
            let twice: Vec<Property> =
                filter_and_sort(&once, &facets).into_iter().cloned().collect();
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn price_asc_reversed_is_price_desc(
            prices in prop::collection::hash_set(0u64..10_000_000, 0..40)
        ) {
            let list: Vec<Property> = prices
                .into_iter()
                .enumerate()
                .map(|(i, price)| listing(i as i64 + 1, Purpose::Buy, price))
                .collect();
            let asc = Facets { sort: SortOrder::PriceAsc, ..Facets::default() };
            let desc = Facets { sort: SortOrder::PriceDesc, ..Facets::default() };
            let mut ascending = ids(&filter_and_sort(&list, &asc));
            ascending.reverse();
            prop_assert_eq!(ascending, ids(&filter_and_sort(&list, &desc)));
        }

        #[test]
        fn last_page_holds_the_remainder(n in 0usize..100, extra in 1usize..5) {
            let items: Vec<usize> = (0..n).collect();
            let last = n.div_ceil(PER_PAGE).max(1);
            let (page, returned, total_pages) = paginate(&items, last, PER_PAGE);
            prop_assert_eq!(returned, last);
            prop_assert_eq!(total_pages, last);
            let expected = match n % PER_PAGE {
                0 if n > 0 => PER_PAGE,
                rest => rest,
            };
            prop_assert_eq!(page.len(), expected);

            let (beyond, clamped, _) = paginate(&items, last + extra, PER_PAGE);
            prop_assert_eq!(clamped, last);
            prop_assert_eq!(beyond, page);
        }
    }
}
