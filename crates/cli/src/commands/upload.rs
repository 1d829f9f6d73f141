use std::path::PathBuf;

use clap::Args;

use crate::OutputFormat;
use crate::backend::Backend;

#[derive(Args, Debug)]
pub struct UploadArgs {
    /// Image file to upload.
    pub path: PathBuf,
}

pub async fn run(backend: &Backend, args: &UploadArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let file = backend.upload(&args.path).await?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&file)?),
        OutputFormat::Text => {
            println!("Uploaded {} ({} bytes, {})", file.file_name, file.file_size, file.mime_type);
            println!("  {}", file.file_url);
        }
    }
    Ok(())
}
