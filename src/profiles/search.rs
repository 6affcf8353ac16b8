//! In-memory filter/sort/paginate over the full profile set.
//!
//! Filtering happens in application memory over the whole table; the
//! datasets this runs against are a few hundred rows. Larger datasets
//! would need the filters pushed into the SQL layer.

use super::repo::Profile;

/// Sentinel meaning "no filter" when sent as a filter value.
const ALL: &str = "all";

pub const DEFAULT_PAGE_SIZE: u32 = 10;

#[derive(Debug, Default, Clone)]
pub struct SearchFilters {
    pub service: Option<String>,
    pub region: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug)]
pub struct SearchOutcome {
    pub results: Vec<Profile>,
    pub total: usize,
}

fn active_filter(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .filter(|v| !v.is_empty() && *v != ALL)
}

/// Filter, sort and paginate the candidate set, in that order. `total`
/// counts the filtered set before pagination.
pub fn search_profiles(
    mut profiles: Vec<Profile>,
    filters: &SearchFilters,
    sort: Option<&str>,
    page: Option<u32>,
    page_size: Option<u32>,
) -> SearchOutcome {
    if let Some(service) = active_filter(&filters.service) {
        let needle = service.to_lowercase();
        profiles.retain(|p| {
            p.services.iter().any(|s| s == service)
                || p.custom_services
                    .as_deref()
                    .map_or(false, |c| c.to_lowercase().contains(&needle))
        });
    }

    if let Some(region) = active_filter(&filters.region) {
        profiles.retain(|p| p.regions.iter().any(|r| r == region));
    }

    if let Some(name) = filters.name.as_deref().filter(|n| !n.is_empty()) {
        let needle = name.to_lowercase();
        profiles.retain(|p| {
            p.first_name.to_lowercase().contains(&needle)
                || p.last_name.to_lowercase().contains(&needle)
                || format!("{} {}", p.first_name, p.last_name)
                    .to_lowercase()
                    .contains(&needle)
        });
    }

    if sort == Some("newest") {
        profiles.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    }
    // Any other sort value, including the UI's default "rating", has never
    // had a comparator and leaves the filtered order untouched.

    let total = profiles.len();

    let page = page.unwrap_or(1).max(1);
    let page_size = page_size.unwrap_or(DEFAULT_PAGE_SIZE);
    let start = (page as usize - 1) * page_size as usize;
    let results = if start >= profiles.len() {
        Vec::new()
    } else {
        profiles
            .into_iter()
            .skip(start)
            .take(page_size as usize)
            .collect()
    };

    SearchOutcome { results, total }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;
    use uuid::Uuid;

    fn profile(
        first: &str,
        last: &str,
        services: &[&str],
        regions: &[&str],
        created_secs: i64,
    ) -> Profile {
        Profile {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            first_name: first.into(),
            last_name: last.into(),
            description: None,
            services: services.iter().map(|s| s.to_string()).collect(),
            custom_services: None,
            regions: regions.iter().map(|r| r.to_string()).collect(),
            availability: vec!["Wochentags".into()],
            phone: Some("+43 1 2345678".into()),
            contact_email: None,
            social_media: None,
            available: true,
            image_key: None,
            created_at: OffsetDateTime::from_unix_timestamp(created_secs).unwrap(),
        }
    }

    fn no_filters() -> SearchFilters {
        SearchFilters::default()
    }

    #[test]
    fn no_filters_returns_everything_paginated() {
        let profiles = (0..25i64)
            .map(|i| profile("Max", "Muster", &["Maler"], &["Wien"], i))
            .collect();
        let outcome = search_profiles(profiles, &no_filters(), None, None, None);
        assert_eq!(outcome.total, 25);
        assert_eq!(outcome.results.len(), DEFAULT_PAGE_SIZE as usize);
    }

    #[test]
    fn service_filter_matches_list_entry() {
        let profiles = vec![
            profile("Anna", "Gruber", &["Elektriker"], &["Wien"], 0),
            profile("Josef", "Bauer", &["Maler"], &["Wien"], 0),
        ];
        let filters = SearchFilters {
            service: Some("Elektriker".into()),
            ..Default::default()
        };
        let outcome = search_profiles(profiles, &filters, None, None, None);
        assert_eq!(outcome.total, 1);
        assert_eq!(outcome.results[0].first_name, "Anna");
    }

    #[test]
    fn service_filter_matches_custom_text_case_insensitively() {
        let mut p = profile("Anna", "Gruber", &["Sonstiges"], &["Wien"], 0);
        p.custom_services = Some("Spezialist für ELEKTRIKER-Notdienste".into());
        let filters = SearchFilters {
            service: Some("elektriker".into()),
            ..Default::default()
        };
        let outcome = search_profiles(vec![p], &filters, None, None, None);
        assert_eq!(outcome.total, 1);
    }

    #[test]
    fn service_list_match_is_exact_not_substring() {
        let p = profile("Anna", "Gruber", &["Elektrikermeister"], &["Wien"], 0);
        let filters = SearchFilters {
            service: Some("Elektriker".into()),
            ..Default::default()
        };
        let outcome = search_profiles(vec![p], &filters, None, None, None);
        assert_eq!(outcome.total, 0);
    }

    #[test]
    fn all_sentinel_disables_service_and_region_filters() {
        let profiles = vec![
            profile("Anna", "Gruber", &["Elektriker"], &["Wien"], 0),
            profile("Josef", "Bauer", &["Maler"], &["Graz"], 0),
        ];
        let filters = SearchFilters {
            service: Some("all".into()),
            region: Some("all".into()),
            ..Default::default()
        };
        let outcome = search_profiles(profiles, &filters, None, None, None);
        assert_eq!(outcome.total, 2);
    }

    #[test]
    fn region_filter_is_exact() {
        let profiles = vec![
            profile("Anna", "Gruber", &["Elektriker"], &["Wien", "Niederösterreich"], 0),
            profile("Josef", "Bauer", &["Elektriker"], &["Graz"], 0),
        ];
        let filters = SearchFilters {
            region: Some("Wien".into()),
            ..Default::default()
        };
        let outcome = search_profiles(profiles, &filters, None, None, None);
        assert_eq!(outcome.total, 1);
        assert_eq!(outcome.results[0].first_name, "Anna");
    }

    #[test]
    fn combined_service_and_region_scenario() {
        let a = profile("Anna", "Gruber", &["Elektriker"], &["Wien"], 0);
        let outcome = search_profiles(
            vec![a.clone()],
            &SearchFilters {
                service: Some("Elektriker".into()),
                region: Some("Wien".into()),
                ..Default::default()
            },
            None,
            None,
            None,
        );
        assert_eq!(outcome.total, 1);

        let outcome = search_profiles(
            vec![a],
            &SearchFilters {
                service: Some("Maler".into()),
                region: Some("Wien".into()),
                ..Default::default()
            },
            None,
            None,
            None,
        );
        assert_eq!(outcome.total, 0);
    }

    #[test]
    fn name_filter_matches_first_last_and_full_name() {
        let profiles = vec![
            profile("Anna-Maria", "Gruber", &["Maler"], &["Wien"], 0),
            profile("Josef", "Annaberger", &["Maler"], &["Wien"], 0),
            profile("Eva", "Klein", &["Maler"], &["Wien"], 0),
        ];
        let filters = SearchFilters {
            name: Some("anna".into()),
            ..Default::default()
        };
        let outcome = search_profiles(profiles, &filters, None, None, None);
        assert_eq!(outcome.total, 2);

        // space-joined full name
        let p = profile("Eva", "Klein", &["Maler"], &["Wien"], 0);
        let filters = SearchFilters {
            name: Some("eva klein".into()),
            ..Default::default()
        };
        let outcome = search_profiles(vec![p], &filters, None, None, None);
        assert_eq!(outcome.total, 1);
    }

    #[test]
    fn newest_sorts_by_created_at_descending() {
        let profiles = vec![
            profile("Old", "Est", &["Maler"], &["Wien"], 100),
            profile("New", "Est", &["Maler"], &["Wien"], 300),
            profile("Mid", "Dle", &["Maler"], &["Wien"], 200),
        ];
        let outcome = search_profiles(profiles, &no_filters(), Some("newest"), None, None);
        let stamps: Vec<i64> = outcome
            .results
            .iter()
            .map(|p| p.created_at.unix_timestamp())
            .collect();
        assert_eq!(stamps, vec![300, 200, 100]);
    }

    #[test]
    fn rating_sort_is_a_noop() {
        let profiles = vec![
            profile("First", "In", &["Maler"], &["Wien"], 100),
            profile("Second", "In", &["Maler"], &["Wien"], 300),
            profile("Third", "In", &["Maler"], &["Wien"], 200),
        ];
        let expected: Vec<String> =
            profiles.iter().map(|p| p.first_name.clone()).collect();
        let outcome = search_profiles(profiles, &no_filters(), Some("rating"), None, None);
        let got: Vec<String> = outcome
            .results
            .iter()
            .map(|p| p.first_name.clone())
            .collect();
        assert_eq!(got, expected);
    }

    #[test]
    fn unknown_sort_keys_leave_order_unchanged() {
        let profiles = vec![
            profile("B", "B", &["Maler"], &["Wien"], 1),
            profile("A", "A", &["Maler"], &["Wien"], 2),
        ];
        let outcome = search_profiles(profiles, &no_filters(), Some("alphabetical"), None, None);
        assert_eq!(outcome.results[0].first_name, "B");
    }

    #[test]
    fn pagination_slices_one_based() {
        let profiles = (0..25i64)
            .map(|i| profile(&format!("P{}", i), "X", &["Maler"], &["Wien"], i))
            .collect();
        let outcome = search_profiles(profiles, &no_filters(), None, Some(3), Some(10));
        assert_eq!(outcome.total, 25);
        assert_eq!(outcome.results.len(), 5);
        assert_eq!(outcome.results[0].first_name, "P20");
    }

    #[test]
    fn slice_length_property_holds() {
        let total = 23usize;
        for (page, page_size) in [(1u32, 10u32), (2, 10), (3, 10), (1, 50), (5, 5), (4, 7)] {
            let profiles = (0..total as i64)
                .map(|i| profile("P", "X", &["Maler"], &["Wien"], i))
                .collect();
            let outcome =
                search_profiles(profiles, &no_filters(), None, Some(page), Some(page_size));
            let expected = std::cmp::min(
                page_size as usize,
                total.saturating_sub((page as usize - 1) * page_size as usize),
            );
            assert_eq!(outcome.results.len(), expected, "page={page} size={page_size}");
        }
    }

    #[test]
    fn out_of_range_page_is_empty_with_correct_total() {
        let profiles = (0..5i64)
            .map(|i| profile("P", "X", &["Maler"], &["Wien"], i))
            .collect();
        let outcome = search_profiles(profiles, &no_filters(), None, Some(99), None);
        assert!(outcome.results.is_empty());
        assert_eq!(outcome.total, 5);
    }

    #[test]
    fn page_zero_is_clamped_to_first_page() {
        let profiles = (0..5i64)
            .map(|i| profile("P", "X", &["Maler"], &["Wien"], i))
            .collect();
        let outcome = search_profiles(profiles, &no_filters(), None, Some(0), Some(3));
        assert_eq!(outcome.results.len(), 3);
    }

    #[test]
    fn service_filter_never_leaks_unmatched_profiles() {
        // filtered results must all carry the service or match via custom text
        let profiles = vec![
            profile("Anna", "Gruber", &["Elektriker", "Installateur"], &["Wien"], 0),
            profile("Josef", "Bauer", &["Maler"], &["Wien"], 0),
            profile("Eva", "Klein", &[], &["Wien"], 0),
        ];
        let filters = SearchFilters {
            service: Some("Elektriker".into()),
            ..Default::default()
        };
        let outcome = search_profiles(profiles, &filters, None, None, None);
        for p in &outcome.results {
            assert!(p.services.iter().any(|s| s == "Elektriker"));
        }
    }
}
