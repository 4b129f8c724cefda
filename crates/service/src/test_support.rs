#![cfg(test)]
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{DateTime, Duration, TimeZone, Utc};
use migration::MigratorTrait;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectOptions, Database, DatabaseConnection, EntityTrait, QueryFilter, Set};

use models::{category, location, service, service_category, state, user};

static EMAIL_SEQ: AtomicUsize = AtomicUsize::new(0);

/// Migrated database for one test.
///
/// Defaults to a private in-memory SQLite database. `TEST_DATABASE_URL`
/// points the suite at a real server instead; the schema is rebuilt from
/// scratch, so run with `--test-threads=1` in that mode.
pub async fn get_db() -> Result<DatabaseConnection, anyhow::Error> {
    match std::env::var("TEST_DATABASE_URL") {
        Ok(url) if !url.trim().is_empty() => {
            let db = Database::connect(url.trim()).await?;
            migration::Migrator::fresh(&db).await?;
            Ok(db)
        }
        _ => {
            let mut opt = ConnectOptions::new("sqlite::memory:".to_string());
            // one connection, otherwise every pooled connection sees its own empty database
            opt.max_connections(1).min_connections(1).sqlx_logging(false);
            let db = Database::connect(opt).await?;
            migration::Migrator::up(&db, None).await?;
            Ok(db)
        }
    }
}

/// Fixed clock origin so ordering in tests never depends on wall time.
pub fn at(offset_secs: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).single().unwrap_or_default() + Duration::seconds(offset_secs)
}

pub async fn seed_user(db: &DatabaseConnection, name: &str) -> Result<user::Model, anyhow::Error> {
    let n = EMAIL_SEQ.fetch_add(1, Ordering::SeqCst);
    Ok(user::create(db, name, &format!("{}.{}@example.com", name.to_lowercase().replace(' ', "."), n)).await?)
}

pub async fn seed_location(db: &DatabaseConnection, state_code: &str, lat: &str, lng: &str) -> Result<location::Model, anyhow::Error> {
    let st = state::find_by_code(db, state_code)
        .await?
        .ok_or_else(|| anyhow::anyhow!("state {} not seeded", state_code))?;
    Ok(location::create(db, location::NewLocation {
        street_address: "1 Main St".into(),
        city: "Somewhere".into(),
        county: None,
        zip: "00001".into(),
        state_id: st.id,
        latitude: lat.into(),
        longitude: lng.into(),
    })
    .await?)
}

pub async fn seed_service(
    db: &DatabaseConnection,
    owner_id: i32,
    title: &str,
    description: &str,
    location_id: Option<i32>,
    created_at: DateTime<Utc>,
) -> Result<service::Model, anyhow::Error> {
    Ok(service::ActiveModel {
        user_id: Set(owner_id),
        location_id: Set(location_id),
        title: Set(title.to_string()),
        description: Set(description.to_string()),
        price: Set("10.00".into()),
        photo: Set(None),
        created_at: Set(created_at.into()),
        updated_at: Set(created_at.into()),
        ..Default::default()
    }
    .insert(db)
    .await?)
}

/// Link a service to the named category, creating the category on first use.
pub async fn attach_category(db: &DatabaseConnection, service_id: i32, name: &str) -> Result<category::Model, anyhow::Error> {
    let cat = match category::Entity::find().filter(category::Column::Name.eq(name)).one(db).await? {
        Some(c) => c,
        None => category::create(db, name).await?,
    };
    service_category::ActiveModel { service_id: Set(service_id), category_id: Set(cat.id) }
        .insert(db)
        .await?;
    Ok(cat)
}
