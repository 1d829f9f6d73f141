use std::path::PathBuf;

use clap::{Args, ValueEnum};
use serde_json::{Map, Value, json};

use lostfound_core::{Item, ListParams};

use crate::OutputFormat;
use crate::backend::Backend;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum KindArg {
    Lost,
    Found,
}

impl KindArg {
    fn as_str(self) -> &'static str {
        match self {
            Self::Lost => "lost",
            Self::Found => "found",
        }
    }
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Only `lost` or `found` items; other values are ignored.
    #[arg(long = "type")]
    pub item_type: Option<String>,
    /// Substring of the location.
    #[arg(long)]
    pub location: Option<String>,
    /// Substring of the name or description.
    #[arg(long)]
    pub search: Option<String>,
    /// Page number, starting at 1.
    #[arg(long)]
    pub page: Option<u32>,
    /// Items per page.
    #[arg(long)]
    pub limit: Option<u32>,
}

#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Whether the item was lost or found.
    #[arg(long = "type", value_enum)]
    pub item_type: KindArg,
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub description: String,
    /// Where the item was lost or found.
    #[arg(long)]
    pub location: String,
    /// How to reach the reporter.
    #[arg(long = "contact")]
    pub contact_info: String,
    #[arg(long = "lat", allow_negative_numbers = true)]
    pub latitude: Option<f64>,
    #[arg(long = "lng", allow_negative_numbers = true)]
    pub longitude: Option<f64>,
    /// URL of an already uploaded image.
    #[arg(long, conflicts_with = "image")]
    pub image_url: Option<String>,
    /// Image file to upload and attach.
    #[arg(long)]
    pub image: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Item ID.
    pub id: String,
    #[arg(long = "type", value_enum)]
    pub item_type: Option<KindArg>,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub location: Option<String>,
    #[arg(long = "contact")]
    pub contact_info: Option<String>,
    #[arg(long = "lat", allow_negative_numbers = true)]
    pub latitude: Option<f64>,
    #[arg(long = "lng", allow_negative_numbers = true)]
    pub longitude: Option<f64>,
    #[arg(long, conflicts_with = "image")]
    pub image_url: Option<String>,
    /// Image file to upload and attach.
    #[arg(long)]
    pub image: Option<PathBuf>,
}

pub async fn list(backend: &Backend, args: &ListArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let params = ListParams {
        item_type: args.item_type.clone(),
        location: args.location.clone(),
        search: args.search.clone(),
        page: args.page.map(|p| p.to_string()),
        limit: args.limit.map(|l| l.to_string()),
    };
    let page = backend.service().list_params(&params).await?;

    match format {
        OutputFormat::Json => {
            let body = json!({ "items": page.items, "pagination": page.pagination });
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        OutputFormat::Text => {
            let p = page.pagination;
            println!(
                "{} items (page {} of {}, {} per page):",
                p.total,
                p.page,
                p.total.div_ceil(u64::from(p.limit)).max(1),
                p.limit
            );
            for item in &page.items {
                println!(
                    "  {id}  [{kind:<5}] {name} @ {location} ({date})",
                    id = item.id,
                    kind = item.item_type,
                    name = item.name,
                    location = item.location,
                    date = item.date_reported.format("%Y-%m-%d %H:%M"),
                );
            }
        }
    }
    Ok(())
}

pub async fn show(backend: &Backend, id: &str, format: &OutputFormat) -> anyhow::Result<()> {
    let item = backend.service().get(id).await?;
    print_item(&item, format)
}

pub async fn report(backend: &Backend, args: &ReportArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let mut payload = Map::new();
    payload.insert("type".into(), json!(args.item_type.as_str()));
    payload.insert("name".into(), json!(args.name));
    payload.insert("description".into(), json!(args.description));
    payload.insert("location".into(), json!(args.location));
    payload.insert("contact_info".into(), json!(args.contact_info));
    insert_opt(&mut payload, "latitude", args.latitude.map(Value::from));
    insert_opt(&mut payload, "longitude", args.longitude.map(Value::from));
    let image_url = attach_image(backend, args.image_url.as_ref(), args.image.as_ref()).await?;
    insert_opt(&mut payload, "image_url", image_url.map(Value::from));

    let item = backend.service().create(&Value::Object(payload)).await?;
    if let OutputFormat::Text = format {
        println!("Item reported.");
    }
    print_item(&item, format)
}

pub async fn update(backend: &Backend, args: &UpdateArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let mut payload = Map::new();
    insert_opt(&mut payload, "type", args.item_type.map(|k| json!(k.as_str())));
    insert_opt(&mut payload, "name", args.name.clone().map(Value::from));
    insert_opt(&mut payload, "description", args.description.clone().map(Value::from));
    insert_opt(&mut payload, "location", args.location.clone().map(Value::from));
    insert_opt(&mut payload, "contact_info", args.contact_info.clone().map(Value::from));
    insert_opt(&mut payload, "latitude", args.latitude.map(Value::from));
    insert_opt(&mut payload, "longitude", args.longitude.map(Value::from));
    let image_url = attach_image(backend, args.image_url.as_ref(), args.image.as_ref()).await?;
    insert_opt(&mut payload, "image_url", image_url.map(Value::from));

    let item = backend.service().update(&args.id, &Value::Object(payload)).await?;
    if let OutputFormat::Text = format {
        println!("Item updated.");
    }
    print_item(&item, format)
}

pub async fn delete(backend: &Backend, id: &str) -> anyhow::Result<()> {
    backend.service().delete(id).await?;
    println!("Item '{id}' deleted.");
    Ok(())
}

fn insert_opt(payload: &mut Map<String, Value>, key: &str, value: Option<Value>) {
    if let Some(value) = value {
        payload.insert(key.to_owned(), value);
    }
}

/// The upload happens before the item is written; if the write then fails
/// the uploaded image stays behind.
async fn attach_image(
    backend: &Backend,
    url: Option<&String>,
    file: Option<&PathBuf>,
) -> anyhow::Result<Option<String>> {
    match (url, file) {
        (_, Some(path)) => Ok(Some(backend.upload(path).await?.file_url)),
        (Some(url), None) => Ok(Some(url.clone())),
        (None, None) => Ok(None),
    }
}

fn print_item(item: &Item, format: &OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(item)?),
        OutputFormat::Text => {
            println!("{} [{}]", item.name, item.item_type);
            println!("  id:          {}", item.id);
            println!("  description: {}", item.description);
            println!("  location:    {}", item.location);
            if let Some(c) = item.coordinates() {
                println!("  coordinates: {}, {}", c.latitude, c.longitude);
            }
            println!("  reported:    {}", item.date_reported.to_rfc3339());
            println!("  contact:     {}", item.contact_info);
            if let Some(url) = &item.image_url {
                println!("  image:       {url}");
            }
        }
    }
    Ok(())
}
