//! Fuzz target: the catalog query must accept any listings and any filter.
//!
//! Input is a JSON pair `[raw_listings, filter_config]`; inputs that do not
//! parse are ignored.

#![no_main]

use libfuzzer_sys::fuzz_target;
use swapshelf::{browse, filter_sort, FilterConfig, Listing, RawListing};

fuzz_target!(|data: &[u8]| {
    let Ok((raws, config)) = serde_json::from_slice::<(Vec<RawListing>, FilterConfig)>(data) else {
        return;
    };

    let listings: Vec<Listing> = raws.into_iter().filter_map(|r| r.normalize().ok()).collect();

    let view = browse(&listings, &config);
    assert_eq!(view.total, view.listings.len());
    assert!(view.total <= listings.len());
    assert!(view.active_filters <= 6);

    let again = filter_sort(&view.listings, &config);
    assert_eq!(again, view.listings);
});
