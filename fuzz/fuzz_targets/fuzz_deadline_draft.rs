#![no_main]

use chrono::{DateTime, TimeDelta, Utc};
use libfuzzer_sys::fuzz_target;
use phasegate::resolver::{DeadlineDraft, evaluate};

fuzz_target!(|data: &[u8]| {
    let Some((offset, json)) = data.split_first_chunk::<8>() else {
        return;
    };
    let Ok(draft) = serde_json::from_slice::<DeadlineDraft>(json) else {
        return;
    };
    let Ok(record) = draft.into_record() else {
        return;
    };

    // Probe around the deadline with an arbitrary signed offset in seconds.
    let seconds = i64::from_le_bytes(*offset) % (400 * 365 * 24 * 3600);
    let now = record
        .deadline_at
        .checked_add_signed(TimeDelta::seconds(seconds))
        .unwrap_or(DateTime::<Utc>::MAX_UTC);

    let status = evaluate(Some(&record), now);
    if let Some(minutes) = status.minutes_late() {
        assert!(minutes >= 0);
    }
    assert_eq!(status, evaluate(Some(&record), now));
});
