use anyhow::{Context, Result};
use prime_listings::format::display_price;
use prime_listings::normalize::normalize_properties;
use prime_listings::search::{search, Facets, SortOrder};
use prime_listings::{Config, ListingError, Purpose, RecordId, SiteService};
use serde_json::Value;
use tempfile::tempdir;

fn fixture() -> Result<Value> {
    serde_json::from_str(include_str!("resources/listings.json")).context("fixture is valid JSON")
}

#[test]
fn mixed_payloads_normalize_to_one_shape() -> Result<()> {
    let properties = normalize_properties(&fixture()?);
    assert_eq!(properties.len(), 4, "the non-object entry is dropped");

    let marina = &properties[0];
    assert_eq!(marina.slug, "marina-vista-residences");
    assert_eq!(marina.photos.len(), 2);
    assert_eq!(marina.image, "https://cdn.example.com/mv-1.jpg");
    assert_eq!(marina.address.line1, "Marina Walk");
    assert_eq!(marina.address.lat, Some(25.08));
    assert_eq!(marina.highlights, vec!["Sea views", "Walk to the tram"]);
    assert_eq!(marina.bedrooms.as_deref(), Some("1"));

    let creek = &properties[1];
    assert_eq!(creek.photos, vec!["https://cdn.example.com/creek.jpg"]);
    assert_eq!(creek.address.line1, "Dubai Creek Harbour");
    assert_eq!(creek.address.country, "UAE");
    assert_eq!(display_price(creek), "AED 80,000/year");

    let villa = &properties[2];
    assert_eq!(villa.overview.area_sqft.as_deref(), Some("4200"));
    assert_eq!(villa.overview.year_built.as_deref(), Some("2021"));
    assert!(villa.residence_options.is_empty());
    let features = villa.features.as_ref().context("features parsed")?;
    assert_eq!(features["Amenities"], vec!["Pool", "Gym"]);
    assert_eq!(villa.agent.as_ref().and_then(|a| a.phone.clone()), None);

    let launch = &properties[3];
    assert_eq!(launch.purpose, Some(Purpose::OffPlan));
    assert_eq!(launch.price_amount(), None);
    assert_eq!(display_price(launch), "From AED 1.9M");
    assert_eq!(launch.floor_plans.len(), 1);
    assert_eq!(launch.brochure_file, None);
    Ok(())
}

#[test]
fn buy_listings_by_price_and_location() -> Result<()> {
    let properties = normalize_properties(&fixture()?);

    let by_price = search(
        &properties,
        &Facets {
            sort: SortOrder::PriceAsc,
            ..Facets::for_purpose(Purpose::Buy)
        },
    );
    let ids: Vec<RecordId> = by_price.items.iter().map(|p| p.id.clone()).collect();
    assert_eq!(ids, vec![RecordId::Numeric(1), RecordId::Numeric(3)]);

    let in_marina = search(
        &properties,
        &Facets {
            location: "DUBAI MARINA".into(),
            bedrooms: Some(3),
            ..Facets::for_purpose(Purpose::Buy)
        },
    );
    assert_eq!(in_marina.total, 1);
    assert_eq!(in_marina.items[0].title, "Hills Grove Villa");

    let off_plan = search(
        &properties,
        &Facets {
            bedrooms: Some(1),
            ..Facets::for_purpose(Purpose::OffPlan)
        },
    );
    assert!(off_plan.is_empty(), "descriptive bedroom ranges never meet a threshold");
    assert_eq!(off_plan.total_pages, 1);
    Ok(())
}

#[tokio::test]
async fn local_dashboard_round_trip() -> Result<()> {
    let dir = tempdir()?;
    let config = Config::default().with_data_dir(dir.path());
    let service = SiteService::from_config(config.clone())?;
    let dashboard = service.source();

    let denied = dashboard.create_property(serde_json::json!({"title": "Too early"})).await;
    assert!(matches!(denied, Err(ListingError::Unauthorized)));

    dashboard.login("", "admin123").await?;
    let items = match fixture()? {
        Value::Array(items) => items,
        other => anyhow::bail!("unexpected fixture shape: {}", other),
    };
    let mut created = Vec::new();
    for item in items.into_iter().filter(Value::is_object) {
        created.push(dashboard.create_property(item).await?);
    }
    assert_eq!(created.len(), 4);
    dashboard
        .set_featured(vec![RecordId::Numeric(3), RecordId::Numeric(1)])
        .await?;

    // A fresh service over the same directory sees everything.
    let reopened = SiteService::from_config(config)?;
    let site = reopened.site_data().await;
    assert_eq!(site.properties, created);
    let featured: Vec<&str> = site.featured_properties().iter().map(|p| p.title.as_str()).collect();
    assert_eq!(featured, vec!["Marina Vista Residences", "Hills Grove Villa"]);
    assert_eq!(site.developers.len(), 14);

    let rent = reopened.search(&Facets::for_purpose(Purpose::Rent)).await;
    assert_eq!(rent.total, 1);
    let detail = reopened
        .property("creek-edge-apartment")
        .await
        .context("slug resolves")?;
    assert_eq!(detail.id, RecordId::Numeric(2));

    reopened.source().logout().await?;
    assert!(matches!(reopened.source().reset().await, Err(ListingError::Unauthorized)));
    Ok(())
}
