//! Basic usage example of the second-level cache.

use serde::{Deserialize, Serialize};
use slcache::{
    backend::InMemoryBackend, error::Result, repository::InMemoryRepository, AttributeQuery,
    AttributeValue, CacheEntity, CacheService, IndexRegistry, IndexSet,
};
use std::sync::Arc;
use std::time::Duration;

/// Example entity: User
#[derive(Clone, Serialize, Deserialize, Debug)]
struct User {
    id: i64,
    email: String,
    name: String,
    status: String,
}

impl CacheEntity for User {
    fn storage_name() -> &'static str {
        "users"
    }

    fn attribute_names() -> &'static [&'static str] {
        &["id", "email", "name", "status"]
    }

    fn attribute(&self, name: &str) -> Option<AttributeValue> {
        match name {
            "id" => Some(self.id.into()),
            "email" => Some(self.email.as_str().into()),
            "name" => Some(self.name.as_str().into()),
            "status" => Some(AttributeValue::enumeration(self.status.as_str())),
            _ => None,
        }
    }
}

fn by_email(email: &str) -> AttributeQuery {
    AttributeQuery::new().with("email", email)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Debug)
        .try_init()
        .ok();

    println!("\n=== slcache - Basic Example ===\n");

    // 1. Declare unique indexes and initialize the cache
    println!("1. Registering users: [id], [email], [name, status] (version 3)...");
    let registry = Arc::new(IndexRegistry::new());
    registry.register::<User>(
        IndexSet::builder()
            .version(3)
            .expires_in(Duration::from_secs(3 * 24 * 3600))
            .unique_index("email")
            .composite_index(["name", "status"])
            .build(),
    )?;
    let cache = CacheService::new(InMemoryBackend::new(), registry);
    println!("   ✓ Cache ready\n");

    // 2. The datastore
    let mut repository = InMemoryRepository::new();
    let user = User {
        id: 1,
        email: "foobar@test.com".to_string(),
        name: "foobar".to_string(),
        status: "active".to_string(),
    };

    // 3. Miss: reads never populate the cache
    println!("2. Fetch before the user is cached:");
    repository.insert(user.clone());
    let fetched = cache.fetch::<User, _>(&by_email(&user.email), &repository).await?;
    println!("   ✓ Loaded from repository: {:?}\n", fetched.map(|u| u.name));

    // 4. Create hook writes one entry per index
    println!("3. after_create:");
    cache.after_create(&user).await?;
    if let Some(key) = cache.coordinator().cache_key_for(&user, &["name", "email"])? {
        println!("   key for (name, email) would be {}", key);
    }
    println!(
        "   ✓ {} entries cached\n",
        cache.coordinator().backend().len()
    );

    // 5. Read by every unique index
    println!("4. Reads:");
    for query in [
        AttributeQuery::new().with("id", 1i64),
        by_email("foobar@test.com"),
        AttributeQuery::new()
            .with("status", AttributeValue::enumeration("active"))
            .with("name", "foobar"),
    ] {
        let cached: Option<User> = cache.read(&query).await?;
        println!(
            "   ✓ [{}] -> {:?}",
            query.names().collect::<Vec<_>>().join(", "),
            cached.map(|u| u.email)
        );
    }

    let strict: Option<User> = cache
        .read(&by_email("foobar@test.com").with("name", "foobar"))
        .await?;
    println!("   ✓ [email, name] -> {:?} (not a unique index)\n", strict);

    // 6. Update: old email expired, new one cached
    println!("5. after_update (email changed):");
    let previous = by_email(&user.email);
    let updated = User {
        email: "renamed@test.com".to_string(),
        ..user
    };
    repository.insert(updated.clone());
    cache.after_update(&updated, &previous).await?;

    let old: Option<User> = cache.read(&by_email("foobar@test.com")).await?;
    let new: Option<User> = cache.read(&by_email("renamed@test.com")).await?;
    println!("   ✓ old email -> {:?}", old.map(|u| u.id));
    println!("   ✓ new email -> {:?}\n", new.map(|u| u.id));

    // 7. Expire through one index clears them all
    println!("6. expire by [name, status]:");
    cache
        .expire::<User>(
            &AttributeQuery::new()
                .with("name", "foobar")
                .with("status", AttributeValue::enumeration("active")),
        )
        .await?;
    println!(
        "   ✓ {} entries left\n",
        cache.coordinator().backend().len()
    );

    println!("=== Example completed successfully ===\n");
    Ok(())
}
