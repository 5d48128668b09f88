#![no_main]

use std::collections::HashSet;

use chrono::NaiveDate;
use coleta_core::config::ScheduleConfig;
use coleta_core::source::parse_snapshot;
use coleta_schedule::{compare_due, project_with, reduce};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(events) = parse_snapshot(text) else {
        return;
    };
    let Some(today) = NaiveDate::from_ymd_opt(2024, 6, 1) else {
        return;
    };

    let seeds = reduce(&events);
    let keys: HashSet<_> = seeds.iter().map(|s| s.key.clone()).collect();
    assert_eq!(keys.len(), seeds.len());

    let entries = project_with(seeds, today, &ScheduleConfig::default());
    for pair in entries.windows(2) {
        assert_ne!(
            compare_due(pair[0].next_due_date, pair[1].next_due_date),
            std::cmp::Ordering::Greater
        );
    }
});
