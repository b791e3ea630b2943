//! Property tests for the query engine.

use pisync_core::query::{filter_records, sort_records};
use pisync_core::{
    DeviceRecord, PageLimits, QueryEngine, QueryParams, QueryRecord, SortBy, SortField, SortOrder,
};
use pisync_testkit::generators::*;
use proptest::prelude::*;
use std::collections::HashSet;

fn ids(records: &[DeviceRecord]) -> Vec<String> {
    records.iter().map(|d| d.device_id.clone()).collect()
}

fn position(records: &[DeviceRecord], id: &str) -> usize {
    records
        .iter()
        .position(|d| d.device_id == id)
        .expect("record missing")
}

proptest! {
    #[test]
    fn limit_is_clamped(devices in devices_strategy(20), limit in any::<Option<i64>>()) {
        let page = QueryEngine::default().run(&devices, &QueryParams::new().with_limit(limit));
        prop_assert!((1..=100).contains(&page.limit));
        if limit.is_none() {
            prop_assert_eq!(page.limit, 10);
        }
    }

    #[test]
    fn page_is_clamped(devices in devices_strategy(30), params in query_params_strategy()) {
        let page = QueryEngine::default().run(&devices, &params);
        prop_assert!(page.total_pages >= 1);
        prop_assert!(page.page >= 1 && page.page <= page.total_pages);
        prop_assert_eq!(
            page.total_pages,
            std::cmp::max(1, page.total_items.div_ceil(page.limit))
        );
        prop_assert!(page.data.len() <= page.limit);
    }

    #[test]
    fn pages_cover_every_item_once(devices in devices_strategy(40), limit in 1i64..12) {
        let engine = QueryEngine::default();
        let base = QueryParams::new()
            .with_limit(Some(limit))
            .with_sort_by(SortBy::Field(SortField::LastAttemptAt));

        let first = engine.run(&devices, &base);
        let mut seen = Vec::new();
        for n in 1..=first.total_pages {
            let page = engine.run(&devices, &base.clone().with_page(Some(n as i64)));
            seen.extend(page.data);
        }

        prop_assert_eq!(seen.len(), first.total_items);
        let unique: HashSet<_> = seen.iter().map(|d| d.device_id.clone()).collect();
        prop_assert_eq!(unique.len(), devices.len());
    }

    #[test]
    fn filter_is_idempotent(devices in devices_strategy(25), filter in status_filter_strategy()) {
        let once = filter_records(&devices, Some(&filter));
        let twice = filter_records(&once, Some(&filter));
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn negated_filter_complements(devices in devices_strategy(25), filter in status_filter_strategy()) {
        let kept: HashSet<_> = ids(&filter_records(&devices, Some(&filter))).into_iter().collect();
        let rest: HashSet<_> = ids(&filter_records(&devices, Some(&filter.negated())))
            .into_iter()
            .collect();

        prop_assert!(kept.is_disjoint(&rest));
        let union: HashSet<_> = kept.union(&rest).cloned().collect();
        let all: HashSet<_> = ids(&devices).into_iter().collect();
        prop_assert_eq!(union, all);
    }

    #[test]
    fn sort_is_stable(devices in devices_strategy(30), asc in any::<bool>()) {
        let order = if asc { SortOrder::Asc } else { SortOrder::Desc };
        for field in [SortField::LastSyncAt, SortField::LastAttemptAt] {
            let mut sorted = devices.clone();
            sort_records(&mut sorted, field, order);

            for pair in sorted.windows(2) {
                if pair[0].timestamp(field) == pair[1].timestamp(field) {
                    prop_assert!(
                        position(&devices, &pair[0].device_id) < position(&devices, &pair[1].device_id)
                    );
                }
            }
        }
    }

    #[test]
    fn missing_dates_sort_to_the_edges(devices in devices_strategy(30)) {
        let mut asc = devices.clone();
        sort_records(&mut asc, SortField::LastSyncAt, SortOrder::Asc);
        let nulls = asc.iter().take_while(|d| d.last_sync_at.is_none()).count();
        prop_assert!(asc[nulls..].iter().all(|d| d.last_sync_at.is_some()));

        let mut desc = devices;
        sort_records(&mut desc, SortField::LastSyncAt, SortOrder::Desc);
        let present = desc.iter().take_while(|d| d.last_sync_at.is_some()).count();
        prop_assert!(desc[present..].iter().all(|d| d.last_sync_at.is_none()));
    }

    #[test]
    fn queries_are_deterministic(devices in devices_strategy(20), params in query_params_strategy()) {
        let engine = QueryEngine::new(PageLimits::default());
        prop_assert_eq!(engine.run(&devices, &params), engine.run(&devices, &params));
    }

    #[test]
    fn logs_are_never_filtered(logs in log_entries_strategy(20), filter in status_filter_strategy()) {
        let params = QueryParams::new().with_filter(Some(filter)).with_limit(Some(100));
        let page = QueryEngine::default().run(&logs, &params);
        prop_assert_eq!(page.total_items, logs.len());
    }
}
