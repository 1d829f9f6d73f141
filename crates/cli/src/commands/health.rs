use crate::OutputFormat;
use crate::backend::{Backend, Status};

pub async fn run(backend: &Backend, format: &OutputFormat) -> anyhow::Result<()> {
    match backend.status().await {
        Ok(Status::Remote { url, environment }) => match format {
            OutputFormat::Json => println!(
                "{}",
                serde_json::json!({ "backend": "remote", "url": url, "environment": environment })
            ),
            OutputFormat::Text => println!("Lost & Found server at {url} is healthy ({environment})."),
        },
        Ok(Status::Local { path, items }) => match format {
            OutputFormat::Json => println!(
                "{}",
                serde_json::json!({ "backend": "local", "path": path, "items": items })
            ),
            OutputFormat::Text => println!("Local store {} holds {items} items.", path.display()),
        },
        Err(e) => {
            eprintln!("Failed to reach backend: {e}");
            std::process::exit(1);
        }
    }
    Ok(())
}
