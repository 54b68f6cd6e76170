//! Fuzz target for data table loading and ad record extraction.
//!
//! Tables arrive from data collaborators, so ragged rows, missing columns
//! and non-numeric cells must all surface as errors.

#![no_main]

use adpost_common::{ad_records, ctr_observations, DataTable};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(table) = DataTable::from_json(text) else {
        return;
    };
    for row in table.display_rows() {
        let _ = row.len();
    }
    let _ = ad_records(&table, "ad_name");
    let _ = ctr_observations(&table, "campaign_name");
});
