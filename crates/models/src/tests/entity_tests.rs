use anyhow::Result;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, EntityTrait, ModelTrait, PaginatorTrait, Set};

use super::setup_test_db;
use crate::{category, location, review, service, service_category, state, user};

#[tokio::test]
async fn seeded_states_are_present() -> Result<()> {
    let db = setup_test_db().await?;
    let all = state::list(&db).await?;
    assert_eq!(all.len(), 51);
    let ny = state::find_by_code(&db, "NY").await?.expect("NY seeded");
    assert_eq!(ny.name, "New York");
    assert!(state::find_by_code(&db, "ny").await?.is_none());
    assert!(state::find_by_code(&db, "ZZ").await?.is_none());
    Ok(())
}

#[tokio::test]
async fn service_graph_and_cascade() -> Result<()> {
    let db = setup_test_db().await?;
    let owner = user::create(&db, "Ann", "Ann@Example.com").await?;
    assert_eq!(owner.email, "ann@example.com");

    let ca = state::find_by_code(&db, "CA").await?.expect("CA seeded");
    let loc = location::create(&db, location::NewLocation {
        street_address: "1 Market St".into(),
        city: "San Francisco".into(),
        county: None,
        zip: "94105".into(),
        state_id: ca.id,
        latitude: "37.7749".into(),
        longitude: "-122.4194".into(),
    }).await?;
    assert_eq!(loc.latitude, "37.7749");
    assert!((loc.lat_sin - 37.7749_f64.to_radians().sin()).abs() < 1e-12);
    assert!((loc.lng_cos - (-122.4194_f64).to_radians().cos()).abs() < 1e-12);

    let now = Utc::now();
    let svc = service::ActiveModel {
        user_id: Set(owner.id),
        location_id: Set(Some(loc.id)),
        title: Set("Bike repair".into()),
        description: Set("Fixes flats".into()),
        price: Set(service::normalize_price("20")?),
        photo: Set(None),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    }.insert(&db).await?;

    let cat = category::create(&db, "Repair").await?;
    service_category::ActiveModel { service_id: Set(svc.id), category_id: Set(cat.id) }.insert(&db).await?;
    review::create(&db, svc.id, owner.id, 4, "Quick").await?;

    let cats = svc.find_related(category::Entity).all(&db).await?;
    assert_eq!(cats.len(), 1);
    assert_eq!(cats[0].name, "Repair");
    let placed = svc.find_related(location::Entity).one(&db).await?.expect("location");
    assert_eq!(placed.state_id, ca.id);

    service::Entity::delete_by_id(svc.id).exec(&db).await?;
    assert_eq!(review::Entity::find().count(&db).await?, 0);
    assert_eq!(service_category::Entity::find().count(&db).await?, 0);
    assert_eq!(category::Entity::find().count(&db).await?, 1);
    Ok(())
}

#[tokio::test]
async fn duplicate_category_is_db_error() -> Result<()> {
    let db = setup_test_db().await?;
    category::create(&db, "Cleaning").await?;
    let dup = category::create(&db, "Cleaning").await;
    assert!(matches!(dup, Err(crate::errors::ModelError::Db(_))));
    Ok(())
}
