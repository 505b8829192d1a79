use std::env;
use std::path::Path;

use simple_s3_signer::{Configuration, S3};
use tracing_subscriber::EnvFilter;

// Before run this example, export R2_ACCESS_KEY_ID, R2_SECRET_ACCESS_KEY,
// R2_ACCOUNT_ID and R2_BUCKET, then pass the file to upload:
//   cargo run --example put_object -- ./thumbnail.webp image/webp
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut args = env::args().skip(1);
    let path = args.next().ok_or("usage: put_object <file> [content-type]")?;
    let content_type = args.next();

    let conf = Configuration::from_env()?;
    let s3 = S3::new(&conf)?;

    let body = tokio::fs::read(&path).await?;
    let file_name = Path::new(&path)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default();

    let receipt = s3.upload(file_name, content_type.as_deref(), body).await?;
    println!("{}", serde_json::to_string_pretty(&receipt)?);

    Ok(())
}
