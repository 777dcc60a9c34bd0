use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use prime_listings::format::display_price;
use prime_listings::logging::init_logging;
use prime_listings::search::price;
use prime_listings::slug::property_slug;
use prime_listings::{
    Config, DataMode, Facets, Property, Purpose, SiteData, SiteService, SortOrder,
};
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "prime-listings")]
#[command(about = "Search and manage real-estate listings from the API or the local store")]
#[command(version)]
struct Cli {
    /// Backend base URL; overrides PRIME_LISTINGS_API_URL
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Local store directory; overrides PRIME_LISTINGS_DATA_DIR
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show which backend is in use
    Mode,
    /// Search listings
    Search {
        #[arg(long, default_value = "buy")]
        purpose: Purpose,
        #[arg(long)]
        location: Option<String>,
        #[arg(long = "type")]
        property_type: Option<String>,
        /// Minimum bedrooms
        #[arg(long)]
        bedrooms: Option<u32>,
        /// Minimum bathrooms
        #[arg(long)]
        bathrooms: Option<u32>,
        /// Price range key, e.g. 1000000-2000000
        #[arg(long)]
        price_min: Option<String>,
        /// Price cap key, e.g. 5000000
        #[arg(long)]
        price_max: Option<String>,
        #[arg(long, default_value = "newest")]
        sort: SortOrder,
        #[arg(long, default_value_t = 1)]
        page: usize,
        /// Print the page as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the location, type and price choices for a purpose
    Filters {
        #[arg(long, default_value = "buy")]
        purpose: Purpose,
    },
    /// Show one listing by slug or id
    Show {
        slug_or_id: String,
        #[arg(long)]
        json: bool,
    },
    /// Log in to the dashboard
    Login {
        #[arg(long, default_value = "admin")]
        user: String,
        #[arg(long)]
        password: String,
    },
    /// Forget the stored dashboard token
    Logout,
    /// Add every property in a JSON array file (requires login)
    Import { file: PathBuf },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = Config::from_env().context("Failed to load configuration")?;
    if let Some(url) = cli.api_url {
        config = config.with_api_url(url);
    }
    if let Some(dir) = cli.data_dir {
        config = config.with_data_dir(dir);
    }
    let service = SiteService::from_config(config).context("Failed to set up data source")?;

    match cli.command {
        Commands::Mode => {
            match service.mode() {
                DataMode::Api { base_url } => println!("api ({})", base_url),
                DataMode::Local => println!("local ({})", service.config().data_dir.display()),
            }
        }
        Commands::Search {
            purpose,
            location,
            property_type,
            bedrooms,
            bathrooms,
            price_min,
            price_max,
            sort,
            page,
            json,
        } => {
            let mut facets = Facets {
                bedrooms,
                bathrooms,
                price_min,
                price_max,
                sort,
                page,
                ..Facets::for_purpose(purpose)
            };
            if let Some(location) = location {
                facets.location = location;
            }
            if let Some(property_type) = property_type {
                if !SiteData::type_options().contains(&property_type) {
                    warn!("Type '{}' is not offered by the filter", property_type);
                }
                facets.property_type = property_type;
            }
            for (key, bound) in [
                (facets.price_min.as_deref(), price::min_options(purpose)),
                (facets.price_max.as_deref(), price::max_options(purpose)),
            ] {
                if let Some(key) = key {
                    if !bound.iter().any(|o| o.key == key) {
                        warn!("Price key '{}' is not known for {}; ignoring it", key, purpose);
                    }
                }
            }

            let result = service.search(&facets).await;
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
                return Ok(());
            }
            if result.is_empty() {
                println!("No properties match these filters.");
                return Ok(());
            }

            info!("Found {} properties", result.total);
            let offset = (result.page - 1) * result.per_page;
            for (i, property) in result.items.iter().enumerate() {
                print_summary(offset + i + 1, property);
            }
            println!("Page {} of {} ({} total)", result.page, result.total_pages, result.total);
        }
        Commands::Filters { purpose } => {
            let site = service.site_data().await;
            println!("Locations: {}", site.location_options(purpose).join(", "));
            println!("Types: {}", SiteData::type_options().join(", "));
            let labels = |options: &[price::PriceOption]| {
                options
                    .iter()
                    .map(|o| o.label)
                    .collect::<Vec<_>>()
                    .join(", ")
            };
            println!("Min price: {}", labels(price::min_options(purpose)));
            println!("Max price: {}", labels(price::max_options(purpose)));
        }
        Commands::Show { slug_or_id, json } => {
            let property = match service.property(&slug_or_id).await {
                Some(property) => property,
                None => bail!("Property '{}' not found", slug_or_id),
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&property)?);
            } else {
                print_details(&property);
            }
        }
        Commands::Login { user, password } => {
            service.source().login(&user, &password).await?;
            println!("Logged in ({} mode)", service.mode().name());
        }
        Commands::Logout => {
            service.source().logout().await?;
            println!("Logged out");
        }
        Commands::Import { file } => {
            let raw = tokio::fs::read_to_string(&file)
                .await
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let doc: serde_json::Value = serde_json::from_str(&raw)
                .with_context(|| format!("{} is not valid JSON", file.display()))?;
            let items = match doc {
                serde_json::Value::Array(items) => items,
                _ => bail!("{} must contain a JSON array of properties", file.display()),
            };

            let mut imported = 0;
            for (i, item) in items.into_iter().enumerate() {
                match service.source().create_property(item).await {
                    Ok(property) => {
                        imported += 1;
                        println!("+ {} {}", property.id, property.title);
                    }
                    Err(e) => warn!("Skipping entry {}: {}", i, e),
                }
            }
            info!("Imported {} properties from {}", imported, file.display());
            println!("Imported {} properties", imported);
        }
    }

    Ok(())
}

fn print_summary(n: usize, property: &Property) {
    println!("{}. {} ({})", n, property.title, display_price(property));
    let mut facts = Vec::new();
    if let Some(beds) = &property.bedrooms {
        facts.push(format!("{} bed", beds));
    }
    if let Some(baths) = &property.bathrooms {
        facts.push(format!("{} bath", baths));
    }
    if !property.property_type.is_empty() {
        facts.push(property.property_type.clone());
    }
    if !facts.is_empty() {
        println!("   {}", facts.join(", "));
    }
    if !property.location.is_empty() {
        println!("   Location: {}", property.location);
    }
    println!("   ID: {}  Slug: {}", property.id, property_slug(property));
    println!();
}

fn print_details(property: &Property) {
    print_summary(1, property);
    if !property.description.is_empty() {
        println!("{}", property.description);
        println!();
    }
    let address = &property.address;
    println!("Address: {}, {}, {}", address.line1, address.city, address.country);
    for line in property.overview.area_lines() {
        println!("   {}", line);
    }
    if let Some(status) = &property.overview.status {
        println!("Status: {}", status);
    }
    if !property.highlights.is_empty() {
        println!("Highlights:");
        for highlight in &property.highlights {
            println!("   - {}", highlight);
        }
    }
    if let Some(features) = &property.features {
        for (category, items) in features {
            println!("{}: {}", category, items.join(", "));
        }
    }
    println!("Photos: {}", property.photos.len());
    if let Some(agent) = &property.agent {
        let contact: Vec<&str> = [&agent.name, &agent.phone, &agent.email]
            .into_iter()
            .filter_map(|v| v.as_deref())
            .collect();
        println!("Agent: {}", contact.join(" / "));
    }
}
