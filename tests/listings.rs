//! Integration tests for marketplace lifecycle and listing operations.
//!
//! These tests verify the end-to-end behavior of:
//! - Opening, reopening and closing a marketplace
//! - Configuration validation
//! - Listing create / get / update / delete
//! - Available-listing fetch order and catalog browsing
//! - Raw record import

use swapshelf::{
    Condition, Config, Facet, FilterConfig, ListingId, ListingUpdate, Marketplace, NewListing,
    RawListing, SortKey, StorageError, SwapShelfError, SyncMode, UserId, ValidationError,
};
use tempfile::tempdir;

fn open_market(dir: &tempfile::TempDir) -> Marketplace {
    Marketplace::open(dir.path().join("market.db"), Config::default()).unwrap()
}

fn new_listing(title: &str, category: &str, points: u32) -> NewListing {
    NewListing {
        title: title.into(),
        description: format!("{} for swap", title),
        category: Some(category.into()),
        size: "M".into(),
        condition: Condition::Good,
        points,
        location: "Brooklyn".into(),
        tags: vec!["swap".into()],
        owner_id: UserId::new("user-1"),
        ..Default::default()
    }
}

// ============================================================================
// Lifecycle
// ============================================================================

#[test]
fn test_open_with_default_config() {
    let dir = tempdir().unwrap();
    let market = open_market(&dir);

    assert_eq!(market.config().sync_mode, SyncMode::Normal);
    assert!(market.config().text_generation.is_disabled());

    market.close().unwrap();
}

#[test]
fn test_listings_survive_reopen() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("market.db");

    let market = Marketplace::open(&path, Config::default()).unwrap();
    let id = market
        .create_listing(new_listing("Leather Boots", "Shoes", 55))
        .unwrap();
    market.close().unwrap();

    let market = Marketplace::open(&path, Config::default()).unwrap();
    let listing = market.get_listing(id).unwrap().unwrap();
    assert_eq!(listing.title, "Leather Boots");
    assert_eq!(listing.points, 55);
    market.close().unwrap();
}

#[test]
fn test_invalid_config_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("market.db");

    let config = Config {
        generation_timeout: std::time::Duration::ZERO,
        ..Default::default()
    };
    let err = Marketplace::open(&path, config).unwrap_err();
    assert!(matches!(
        err,
        SwapShelfError::Validation(ValidationError::InvalidField { .. })
    ));
}

#[test]
fn test_second_open_while_locked_fails() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("market.db");

    let market = Marketplace::open(&path, Config::default()).unwrap();
    let err = Marketplace::open(&path, Config::default()).unwrap_err();
    assert!(matches!(
        err,
        SwapShelfError::Storage(StorageError::DatabaseLocked)
    ));

    market.close().unwrap();
}

// ============================================================================
// Listing CRUD
// ============================================================================

#[test]
fn test_create_listing_assigns_defaults() {
    let dir = tempdir().unwrap();
    let market = open_market(&dir);

    let id = market
        .create_listing(new_listing("Wool Scarf", "Accessories", 15))
        .unwrap();
    let listing = market.get_listing(id).unwrap().unwrap();

    assert_eq!(listing.id, id);
    assert!(listing.is_available);
    assert_eq!(listing.view_count, 0);
    assert_eq!(listing.created_at, listing.updated_at);
    assert_eq!(listing.location, "Brooklyn");

    market.close().unwrap();
}

#[test]
fn test_create_listing_validation() {
    let dir = tempdir().unwrap();
    let market = open_market(&dir);

    let mut blank = new_listing("", "Tops", 10);
    blank.title = "   ".into();
    assert!(market.create_listing(blank).unwrap_err().is_validation());

    let mut too_many_images = new_listing("Tee", "Tops", 10);
    too_many_images.images = (0..6).map(|i| format!("img-{}.jpg", i)).collect();
    assert!(market
        .create_listing(too_many_images)
        .unwrap_err()
        .is_validation());

    assert!(market.fetch_available_listings().unwrap().is_empty());

    market.close().unwrap();
}

#[test]
fn test_get_missing_listing_is_none() {
    let dir = tempdir().unwrap();
    let market = open_market(&dir);

    assert!(market.get_listing(ListingId::new()).unwrap().is_none());

    market.close().unwrap();
}

#[test]
fn test_record_view_increments() {
    let dir = tempdir().unwrap();
    let market = open_market(&dir);

    let id = market.create_listing(new_listing("Cap", "Accessories", 5)).unwrap();
    market.record_view(id).unwrap();
    let listing = market.record_view(id).unwrap();
    assert_eq!(listing.view_count, 2);

    let err = market.record_view(ListingId::new()).unwrap_err();
    assert!(err.is_not_found());

    market.close().unwrap();
}

#[test]
fn test_update_listing() {
    let dir = tempdir().unwrap();
    let market = open_market(&dir);

    let id = market.create_listing(new_listing("Blazer", "Outerwear", 50)).unwrap();
    market
        .update_listing(
            id,
            ListingUpdate {
                points: Some(40),
                category: Some(None),
                condition: Some(Condition::Excellent),
                ..Default::default()
            },
        )
        .unwrap();

    let listing = market.get_listing(id).unwrap().unwrap();
    assert_eq!(listing.points, 40);
    assert!(listing.category.is_none());
    assert_eq!(listing.condition, Condition::Excellent);

    let err = market
        .update_listing(ListingId::new(), ListingUpdate::default())
        .unwrap_err();
    assert!(err.is_not_found());

    let err = market
        .update_listing(
            id,
            ListingUpdate {
                title: Some(String::new()),
                ..Default::default()
            },
        )
        .unwrap_err();
    assert!(err.is_validation());

    market.close().unwrap();
}

#[test]
fn test_delete_listing() {
    let dir = tempdir().unwrap();
    let market = open_market(&dir);

    let id = market.create_listing(new_listing("Belt", "Accessories", 8)).unwrap();
    market.delete_listing(id).unwrap();

    assert!(market.get_listing(id).unwrap().is_none());
    assert!(market.delete_listing(id).unwrap_err().is_not_found());

    market.close().unwrap();
}

// ============================================================================
// Fetch & Browse
// ============================================================================

#[test]
fn test_fetch_available_excludes_swapped_and_orders_newest_first() {
    let dir = tempdir().unwrap();
    let market = open_market(&dir);

    let first = market.create_listing(new_listing("First", "Tops", 10)).unwrap();
    std::thread::sleep(std::time::Duration::from_millis(5));
    let second = market.create_listing(new_listing("Second", "Tops", 20)).unwrap();
    std::thread::sleep(std::time::Duration::from_millis(5));
    let third = market.create_listing(new_listing("Third", "Tops", 30)).unwrap();

    market
        .update_listing(
            second,
            ListingUpdate {
                is_available: Some(false),
                ..Default::default()
            },
        )
        .unwrap();

    let ids: Vec<ListingId> = market
        .fetch_available_listings()
        .unwrap()
        .into_iter()
        .map(|l| l.id)
        .collect();
    assert_eq!(ids, vec![third, first]);

    market.close().unwrap();
}

#[test]
fn test_browse_runs_query_over_available_listings() {
    let dir = tempdir().unwrap();
    let market = open_market(&dir);

    market.create_listing(new_listing("Denim Jacket", "Outerwear", 45)).unwrap();
    market.create_listing(new_listing("Black Dress", "Dresses", 60)).unwrap();
    market.create_listing(new_listing("Wool Sweater", "Knitwear", 35)).unwrap();

    let view = market
        .browse(&FilterConfig {
            category: Facet::from("Dresses"),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(view.total, 1);
    assert_eq!(view.listings[0].title, "Black Dress");

    let view = market
        .browse(&FilterConfig {
            sort_key: SortKey::PointsLow,
            ..Default::default()
        })
        .unwrap();
    let points: Vec<u32> = view.listings.iter().map(|l| l.points).collect();
    assert_eq!(points, vec![35, 45, 60]);

    market.close().unwrap();
}

#[test]
fn test_list_categories_sorted_distinct() {
    let dir = tempdir().unwrap();
    let market = open_market(&dir);

    market.create_listing(new_listing("A", "Tops", 1)).unwrap();
    market.create_listing(new_listing("B", "Shoes", 1)).unwrap();
    market.create_listing(new_listing("C", "Tops", 1)).unwrap();
    let mut uncategorized = new_listing("D", "", 1);
    uncategorized.category = None;
    market.create_listing(uncategorized).unwrap();

    assert_eq!(market.list_categories().unwrap(), vec!["Shoes", "Tops"]);

    market.close().unwrap();
}

#[test]
fn test_list_listings_by_owner() {
    let dir = tempdir().unwrap();
    let market = open_market(&dir);

    let mine = market.create_listing(new_listing("Mine", "Tops", 1)).unwrap();
    let mut theirs = new_listing("Theirs", "Tops", 1);
    theirs.owner_id = UserId::new("user-2");
    market.create_listing(theirs).unwrap();

    market
        .update_listing(
            mine,
            ListingUpdate {
                is_available: Some(false),
                ..Default::default()
            },
        )
        .unwrap();

    let listings = market
        .list_listings_by_owner(&UserId::new("user-1"))
        .unwrap();
    assert_eq!(listings.len(), 1);
    assert_eq!(listings[0].id, mine);

    market.close().unwrap();
}

// ============================================================================
// Import
// ============================================================================

#[test]
fn test_import_listings_skips_invalid_records() {
    let dir = tempdir().unwrap();
    let market = open_market(&dir);

    let raws: Vec<RawListing> = serde_json::from_value(serde_json::json!([
        {
            "id": "1",
            "title": "Vintage Denim Jacket",
            "category": "Outerwear",
            "condition": "excellent",
            "points": 45,
            "uploader": { "id": "user1", "name": "Sarah" },
            "createdAt": "2024-01-15T10:30:00Z",
            "isSwapAvailable": true,
            "viewCount": 127
        },
        { "description": "no title here" },
        {
            "title": "Elegant Black Dress",
            "category_id": "Dresses",
            "condition": "Like New",
            "points": "60",
            "user_id": "user2",
            "created_at": "2024-01-14"
        }
    ]))
    .unwrap();

    let report = market.import_listings(raws).unwrap();
    assert_eq!(report.imported.len(), 2);
    assert_eq!(report.skipped, vec![1]);
    assert_eq!(report.total(), 3);

    let available = market.fetch_available_listings().unwrap();
    assert_eq!(available[0].title, "Vintage Denim Jacket");
    assert_eq!(available[1].condition, Condition::Excellent);
    assert_eq!(available[1].owner_id.as_str(), "user2");

    market.close().unwrap();
}

#[test]
fn test_import_json_records_tolerates_mixed_shapes() {
    let dir = tempdir().unwrap();
    let market = open_market(&dir);

    let records = vec![
        serde_json::json!({
            "id": "5e2b7c1a-0000-4000-8000-000000000001",
            "title": "Vintage Denim Jacket",
            "category_id": "5e2b7c1a-0000-4000-8000-00000000cafe",
            "category": "General",
            "condition": "excellent",
            "points": 45,
            "user_id": "user1",
            "is_available": true,
            "created_at": "2024-01-15T10:30:00Z"
        }),
        serde_json::json!({
            "title": "Wool Sweater",
            "condition": 3,
            "tags": [1, "cozy"],
            "points": "35",
            "createdAt": "2024-01-13"
        }),
        serde_json::json!("not a record"),
        serde_json::json!({
            "title": "Elegant Black Dress",
            "category": "Dresses",
            "isSwapAvailable": "false",
            "createdAt": "2024-01-14"
        }),
    ];

    let report = market.import_listings(records).unwrap();
    assert_eq!(report.imported.len(), 3);
    assert_eq!(report.skipped, vec![2]);

    let jacket = market.get_listing(report.imported[0]).unwrap().unwrap();
    assert_eq!(jacket.category.as_deref(), Some("General"));
    assert_eq!(jacket.owner_id.as_str(), "user1");

    let sweater = market.get_listing(report.imported[1]).unwrap().unwrap();
    assert_eq!(sweater.condition, Condition::Fair);
    assert_eq!(sweater.tags, vec!["cozy"]);
    assert_eq!(sweater.points, 35);

    let dress = market.get_listing(report.imported[2]).unwrap().unwrap();
    assert!(!dress.is_available);

    let titles: Vec<String> = market
        .fetch_available_listings()
        .unwrap()
        .into_iter()
        .map(|l| l.title)
        .collect();
    assert_eq!(titles, vec!["Vintage Denim Jacket", "Wool Sweater"]);

    market.close().unwrap();
}
