//! Fuzz target: normalizing an arbitrary raw record never panics.

#![no_main]

use libfuzzer_sys::fuzz_target;
use swapshelf::RawListing;

fuzz_target!(|data: &[u8]| {
    if let Ok(raw) = serde_json::from_slice::<RawListing>(data) {
        if let Ok(listing) = raw.normalize() {
            assert!(!listing.title.trim().is_empty());
        }
    }
});
