use anyhow::Result;
use models::{location, review, state};
use sea_orm::{EntityTrait, Set};

use super::*;
use crate::errors::ServiceError;
use crate::pagination::Pagination;
use crate::test_support::{at, attach_category, get_db, seed_location, seed_service, seed_user};

fn ids(page: &crate::pagination::Page<ScoredService>) -> Vec<i32> {
    page.items.iter().map(|s| s.service.id).collect()
}

fn page(n: u64) -> ServiceSearch {
    ServiceSearch { pagination: Pagination::new(n), ..Default::default() }
}

fn text(term: &str) -> ServiceSearch {
    ServiceSearch { text: Some(term.into()), ..Default::default() }
}

#[tokio::test]
async fn second_page_of_thirty_is_twenty_down_to_eleven() -> Result<()> {
    let db = get_db().await?;
    let owner = seed_user(&db, "Owner").await?;
    for i in 0..30 {
        seed_service(&db, owner.id, &format!("Listing {i}"), "Plain entry", None, at(i)).await?;
    }
    let result = search_services(&db, &page(2)).await?;
    assert_eq!(ids(&result), (11..=20).rev().collect::<Vec<_>>());
    assert_eq!(result.current_page, 2);
    assert_eq!(result.total, 30);
    assert_eq!(result.last_page, 3);
    assert_eq!(result.per_page, 10);
    Ok(())
}

#[tokio::test]
async fn ties_on_created_at_fall_back_to_id_desc() -> Result<()> {
    let db = get_db().await?;
    let owner = seed_user(&db, "Owner").await?;
    for i in 0..5 {
        seed_service(&db, owner.id, &format!("Same second {i}"), "Plain entry", None, at(0)).await?;
    }
    let result = search_services(&db, &page(1)).await?;
    assert_eq!(ids(&result), vec![5, 4, 3, 2, 1]);
    Ok(())
}

#[tokio::test]
async fn free_text_matches_title_only_once() -> Result<()> {
    let db = get_db().await?;
    let owner = seed_user(&db, "Owner").await?;
    for i in 0..15 {
        seed_service(&db, owner.id, &format!("Listing {i}"), "Plain entry", None, at(i)).await?;
    }
    let target = seed_service(&db, owner.id, "some title", "Plain entry", None, at(100)).await?;

    let result = search_services(&db, &text("title")).await?;
    assert_eq!(ids(&result), vec![target.id]);
    assert_eq!(result.total, 1);
    Ok(())
}

#[tokio::test]
async fn free_text_matches_description() -> Result<()> {
    let db = get_db().await?;
    let owner = seed_user(&db, "Owner").await?;
    for i in 0..15 {
        seed_service(&db, owner.id, &format!("Listing {i}"), "Plain entry", None, at(i)).await?;
    }
    let target = seed_service(&db, owner.id, "Listing X", "some description", None, at(100)).await?;

    let result = search_services(&db, &text("description")).await?;
    assert_eq!(ids(&result), vec![target.id]);
    Ok(())
}

#[tokio::test]
async fn free_text_without_hits_is_empty() -> Result<()> {
    let db = get_db().await?;
    let owner = seed_user(&db, "Owner").await?;
    for i in 0..15 {
        seed_service(&db, owner.id, &format!("Listing {i}"), "Plain entry", None, at(i)).await?;
    }
    let result = search_services(&db, &text("SOME_STRING_THAT_CANNOT_BE_SEARCHED")).await?;
    assert!(result.items.is_empty());
    assert_eq!(result.total, 0);
    assert_eq!(result.last_page, 1);
    Ok(())
}

#[tokio::test]
async fn free_text_ignores_case_and_treats_wildcards_literally() -> Result<()> {
    let db = get_db().await?;
    let owner = seed_user(&db, "Owner").await?;
    let upper = seed_service(&db, owner.id, "SHOUTED TITLE", "Plain entry", None, at(1)).await?;
    let percent = seed_service(&db, owner.id, "Deal", "100% satisfaction", None, at(2)).await?;
    seed_service(&db, owner.id, "Other", "Plain entry", None, at(3)).await?;

    assert_eq!(ids(&search_services(&db, &text("shouted Title")).await?), vec![upper.id]);
    assert_eq!(ids(&search_services(&db, &text("%")).await?), vec![percent.id]);
    Ok(())
}

#[tokio::test]
async fn free_text_finds_non_ascii_titles() -> Result<()> {
    let db = get_db().await?;
    let owner = seed_user(&db, "Owner").await?;
    let school = seed_service(&db, owner.id, "École Montessori", "Plain entry", None, at(1)).await?;
    seed_service(&db, owner.id, "Other", "Plain entry", None, at(2)).await?;

    assert_eq!(ids(&search_services(&db, &text("École")).await?), vec![school.id]);
    assert_eq!(ids(&search_services(&db, &text("ÉCOLE")).await?), vec![school.id]);
    assert_eq!(ids(&search_services(&db, &text("École MONTESSORI")).await?), vec![school.id]);
    Ok(())
}

#[tokio::test]
async fn text_and_category_combine_as_and() -> Result<()> {
    let db = get_db().await?;
    let owner = seed_user(&db, "Owner").await?;
    let wanted = seed_service(&db, owner.id, "some title", "Plain entry", None, at(1)).await?;
    attach_category(&db, wanted.id, "cat1").await?;
    let other = seed_service(&db, owner.id, "title yeah", "Plain entry", None, at(2)).await?;
    attach_category(&db, other.id, "cat2").await?;

    let search = ServiceSearch { text: Some("title".into()), categories: vec!["cat1".into()], ..Default::default() };
    let result = search_services(&db, &search).await?;
    assert_eq!(ids(&result), vec![wanted.id]);
    Ok(())
}

#[tokio::test]
async fn category_filter_is_an_or_and_never_duplicates() -> Result<()> {
    let db = get_db().await?;
    let owner = seed_user(&db, "Owner").await?;
    let both = seed_service(&db, owner.id, "Both", "Plain entry", None, at(1)).await?;
    attach_category(&db, both.id, "cat1").await?;
    attach_category(&db, both.id, "cat2").await?;
    let second = seed_service(&db, owner.id, "Second", "Plain entry", None, at(2)).await?;
    attach_category(&db, second.id, "cat2").await?;
    let none = seed_service(&db, owner.id, "Uncategorised", "Plain entry", None, at(3)).await?;

    let search = ServiceSearch { categories: vec!["cat1".into(), "cat2".into()], ..Default::default() };
    let result = search_services(&db, &search).await?;
    assert_eq!(ids(&result), vec![second.id, both.id]);
    assert_eq!(result.total, 2);
    assert!(!ids(&result).contains(&none.id));

    let unknown = ServiceSearch { categories: vec!["nope".into()], ..Default::default() };
    assert!(search_services(&db, &unknown).await?.items.is_empty());
    Ok(())
}

#[tokio::test]
async fn geo_filter_keeps_services_inside_radius() -> Result<()> {
    let db = get_db().await?;
    let owner = seed_user(&db, "Owner").await?;
    let manhattan = seed_location(&db, "NY", "40.7128", "-74.0060").await?;
    let newark = seed_location(&db, "NJ", "40.7357", "-74.1724").await?;
    let la = seed_location(&db, "CA", "34.0522", "-118.2437").await?;
    let a = seed_service(&db, owner.id, "Manhattan", "Plain entry", Some(manhattan.id), at(1)).await?;
    let b = seed_service(&db, owner.id, "Newark", "Plain entry", Some(newark.id), at(2)).await?;
    seed_service(&db, owner.id, "Los Angeles", "Plain entry", Some(la.id), at(3)).await?;
    seed_service(&db, owner.id, "Nowhere", "Plain entry", None, at(4)).await?;

    let near = ServiceSearch {
        geo: Some(GeoFilter { latitude: 40.73, longitude: -74.0, radius_km: 50.0 }),
        ..Default::default()
    };
    assert_eq!(ids(&search_services(&db, &near).await?), vec![b.id, a.id]);

    let tight = ServiceSearch {
        geo: Some(GeoFilter { latitude: 40.7128, longitude: -74.0060, radius_km: 1.0 }),
        ..Default::default()
    };
    assert_eq!(ids(&search_services(&db, &tight).await?), vec![a.id]);

    let ocean = ServiceSearch {
        geo: Some(GeoFilter { latitude: 0.0, longitude: -30.0, radius_km: 100.0 }),
        ..Default::default()
    };
    assert!(search_services(&db, &ocean).await?.items.is_empty());
    Ok(())
}

#[tokio::test]
async fn geo_filter_with_more_matches_than_bind_parameters() -> Result<()> {
    let db = get_db().await?;
    let owner = seed_user(&db, "Owner").await?;
    let ny = state::find_by_code(&db, "NY").await?.ok_or_else(|| anyhow::anyhow!("NY not seeded"))?;
    let (lat_sin, lat_cos) = 40.7128_f64.to_radians().sin_cos();
    let (lng_sin, lng_cos) = (-74.0060_f64).to_radians().sin_cos();
    let row = || location::ActiveModel {
        street_address: Set("1 Main St".into()),
        city: Set("New York".into()),
        county: Set(None),
        zip: Set("10001".into()),
        state_id: Set(ny.id),
        latitude: Set("40.7128".into()),
        longitude: Set("-74.006".into()),
        lat_sin: Set(lat_sin),
        lat_cos: Set(lat_cos),
        lng_sin: Set(lng_sin),
        lng_cos: Set(lng_cos),
        created_at: Set(at(0).into()),
        ..Default::default()
    };
    // 34 000 matching locations, above SQLite's 32 766 variable limit
    for _ in 0..17 {
        location::Entity::insert_many((0..2_000).map(|_| row())).exec_without_returning(&db).await?;
    }
    let manhattan = seed_location(&db, "NY", "40.7128", "-74.0060").await?;
    let la = seed_location(&db, "CA", "34.0522", "-118.2437").await?;
    let near = seed_service(&db, owner.id, "Manhattan", "Plain entry", Some(manhattan.id), at(1)).await?;
    seed_service(&db, owner.id, "Los Angeles", "Plain entry", Some(la.id), at(2)).await?;

    let search = ServiceSearch {
        geo: Some(GeoFilter { latitude: 40.7128, longitude: -74.0060, radius_km: 5.0 }),
        ..Default::default()
    };
    let result = search_services(&db, &search).await?;
    assert_eq!(ids(&result), vec![near.id]);
    assert_eq!(result.total, 1);
    Ok(())
}

#[tokio::test]
async fn state_filter_matches_code_exactly() -> Result<()> {
    let db = get_db().await?;
    let owner = seed_user(&db, "Owner").await?;
    let ny = seed_location(&db, "NY", "40.7128", "-74.0060").await?;
    let ca = seed_location(&db, "CA", "34.0522", "-118.2437").await?;
    let in_ny = seed_service(&db, owner.id, "Bagels", "Plain entry", Some(ny.id), at(1)).await?;
    seed_service(&db, owner.id, "Tacos", "Plain entry", Some(ca.id), at(2)).await?;
    seed_service(&db, owner.id, "Floating", "Plain entry", None, at(3)).await?;

    let search = ServiceSearch { state_code: Some("NY".into()), ..Default::default() };
    assert_eq!(ids(&search_services(&db, &search).await?), vec![in_ny.id]);

    let lower = ServiceSearch { state_code: Some("ny".into()), ..Default::default() };
    assert!(search_services(&db, &lower).await?.items.is_empty());
    Ok(())
}

#[tokio::test]
async fn all_filters_together() -> Result<()> {
    let db = get_db().await?;
    let owner = seed_user(&db, "Owner").await?;
    let ny = seed_location(&db, "NY", "40.7128", "-74.0060").await?;
    let nj = seed_location(&db, "NJ", "40.7357", "-74.1724").await?;
    let hit = seed_service(&db, owner.id, "Plumbing pro", "Pipes", Some(ny.id), at(1)).await?;
    attach_category(&db, hit.id, "Home").await?;
    let wrong_state = seed_service(&db, owner.id, "Plumbing too", "Pipes", Some(nj.id), at(2)).await?;
    attach_category(&db, wrong_state.id, "Home").await?;
    let wrong_cat = seed_service(&db, owner.id, "Plumbing again", "Pipes", Some(ny.id), at(3)).await?;
    attach_category(&db, wrong_cat.id, "Auto").await?;
    let wrong_text = seed_service(&db, owner.id, "Roofing", "Shingles", Some(ny.id), at(4)).await?;
    attach_category(&db, wrong_text.id, "Home").await?;

    let search = ServiceSearch {
        text: Some("plumbing".into()),
        categories: vec!["Home".into()],
        geo: Some(GeoFilter { latitude: 40.72, longitude: -74.05, radius_km: 40.0 }),
        state_code: Some("NY".into()),
        pagination: Pagination::default(),
    };
    assert_eq!(ids(&search_services(&db, &search).await?), vec![hit.id]);
    Ok(())
}

#[tokio::test]
async fn avg_score_is_mean_or_null() -> Result<()> {
    let db = get_db().await?;
    let owner = seed_user(&db, "Owner").await?;
    let critic = seed_user(&db, "Critic").await?;
    let reviewed = seed_service(&db, owner.id, "Reviewed", "Plain entry", None, at(1)).await?;
    let quiet = seed_service(&db, owner.id, "Quiet", "Plain entry", None, at(2)).await?;
    review::create(&db, reviewed.id, critic.id, 4, "Good").await?;
    review::create(&db, reviewed.id, owner.id, 5, "Great").await?;

    let result = search_services(&db, &page(1)).await?;
    let by_id = |id| result.items.iter().find(|s| s.service.id == id).map(|s| s.avg_score);
    assert_eq!(by_id(reviewed.id), Some(Some(4.5)));
    assert_eq!(by_id(quiet.id), Some(None));
    Ok(())
}

#[tokio::test]
async fn page_past_the_end_is_empty_not_an_error() -> Result<()> {
    let db = get_db().await?;
    let owner = seed_user(&db, "Owner").await?;
    for i in 0..12 {
        seed_service(&db, owner.id, &format!("Listing {i}"), "Plain entry", None, at(i)).await?;
    }
    let result = search_services(&db, &page(5)).await?;
    assert!(result.items.is_empty());
    assert_eq!(result.current_page, 5);
    assert_eq!(result.total, 12);
    assert_eq!(result.last_page, 2);

    let last = search_services(&db, &page(2)).await?;
    assert_eq!(last.items.len(), 2);
    Ok(())
}

#[tokio::test]
async fn page_numbers_near_u64_max_are_empty() -> Result<()> {
    let db = get_db().await?;
    let owner = seed_user(&db, "Owner").await?;
    seed_service(&db, owner.id, "Only", "Plain entry", None, at(1)).await?;

    for n in [i64::MAX as u64, u64::MAX] {
        let result = search_services(&db, &page(n)).await?;
        assert!(result.items.is_empty());
        assert_eq!(result.current_page, n);
        assert_eq!(result.total, 1);
        assert_eq!(result.last_page, 1);
    }
    let owned = list_user_services(&db, owner.id, Pagination::new(u64::MAX)).await?;
    assert!(owned.items.is_empty());
    assert_eq!(owned.total, 1);
    Ok(())
}

#[tokio::test]
async fn same_page_twice_is_stable() -> Result<()> {
    let db = get_db().await?;
    let owner = seed_user(&db, "Owner").await?;
    for i in 0..25 {
        seed_service(&db, owner.id, &format!("Listing {i}"), "Plain entry", None, at(i % 4)).await?;
    }
    let first = search_services(&db, &page(2)).await?;
    let second = search_services(&db, &page(2)).await?;
    assert_eq!(ids(&first), ids(&second));
    assert_eq!(first.items.len(), 10);
    Ok(())
}

#[tokio::test]
async fn owner_listing_pages_only_their_services() -> Result<()> {
    let db = get_db().await?;
    let alice = seed_user(&db, "Alice").await?;
    let bob = seed_user(&db, "Bob").await?;
    for i in 0..12 {
        seed_service(&db, alice.id, &format!("Alice {i}"), "Plain entry", None, at(i)).await?;
    }
    for i in 0..3 {
        seed_service(&db, bob.id, &format!("Bob {i}"), "Plain entry", None, at(100 + i)).await?;
    }

    let first = list_user_services(&db, alice.id, Pagination::new(1)).await?;
    assert_eq!(first.items.len(), 10);
    assert_eq!(first.total, 12);
    assert!(first.items.iter().all(|s| s.service.user_id == alice.id));
    assert_eq!(first.items[0].service.title, "Alice 11");

    let second = list_user_services(&db, alice.id, Pagination::new(2)).await?;
    assert_eq!(second.items.len(), 2);

    let bobs = list_user_services(&db, bob.id, Pagination::default()).await?;
    assert_eq!(bobs.total, 3);
    Ok(())
}

#[tokio::test]
async fn owner_listing_for_unknown_user_is_not_found() -> Result<()> {
    let db = get_db().await?;
    let err = list_user_services(&db, 9999, Pagination::default()).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
    Ok(())
}
