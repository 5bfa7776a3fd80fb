//! DIAL CLI - image-to-text and text-to-image demonstrations
//!
//! Usage:
//!     dial [OPTIONS] <COMMAND>
//!
//! Environment Variables:
//!     DIAL_API_KEY: API key sent in the `api-key` header
//!     DIAL_URL: DIAL base URL (default: https://ai-proxy.lab.epam.com)

mod save;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use dial_client::{
    mime_for_extension, Attachment, BucketClient, ContentedMessage, DialSettings, ImageOptions,
    ImageQuality, ImageSize, ImageStyle, ImgUrl, Message, ModelClient, ModelConfig, Response,
    DIAL_SETTINGS,
};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_PROMPT: &str = "What's in this image?";

/// DIAL multimodal demonstrations
#[derive(Parser, Debug)]
#[command(name = "dial")]
#[command(about = "Describe images and generate images through DIAL deployments")]
#[command(after_help = r#"Examples:
    # Describe a local image sent inline as base64
    dial describe-inline --image dialx-banner.png

    # Describe a remote image
    dial describe-url --url https://example.com/elephant.jpg

    # Upload an image to the bucket and describe it as an attachment
    dial describe-attachment --image dialx-banner.png

    # Generate an image and save it locally
    dial generate --prompt "Sunny day on Bali" --quality hd --style vivid
"#)]
struct Cli {
    /// DIAL base URL (overrides DIAL_URL)
    #[arg(long, global = true)]
    dial_url: Option<String>,

    /// API key (overrides DIAL_API_KEY)
    #[arg(long, global = true)]
    api_key: Option<String>,

    /// Only log warnings and errors
    #[arg(short = 'q', long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Describe a local image sent inline as a base64 data URL
    DescribeInline {
        #[arg(long)]
        image: PathBuf,
        #[arg(long, default_value = "gpt-4o")]
        deployment: String,
        #[arg(long, default_value = DEFAULT_PROMPT)]
        prompt: String,
    },
    /// Describe an image referenced by remote URL
    DescribeUrl {
        #[arg(long)]
        url: String,
        #[arg(long, default_value = "gpt-4o")]
        deployment: String,
        #[arg(long, default_value = DEFAULT_PROMPT)]
        prompt: String,
    },
    /// Upload a local image to the bucket and describe it as an attachment
    DescribeAttachment {
        #[arg(long)]
        image: PathBuf,
        #[arg(long, default_value = "gpt-4o")]
        deployment: String,
        #[arg(long, default_value = "What does this picture contain?")]
        prompt: String,
    },
    /// Generate an image from a text prompt and save the attachments locally
    Generate {
        #[arg(long)]
        prompt: String,
        #[arg(long, default_value = "dall-e-3")]
        deployment: String,
        #[arg(long, value_enum, default_value = "square")]
        size: SizeArg,
        #[arg(long, value_enum)]
        quality: Option<QualityArg>,
        #[arg(long, value_enum)]
        style: Option<StyleArg>,
        /// Directory for the downloaded images
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SizeArg {
    Square,
    Tall,
    Wide,
}

impl From<SizeArg> for ImageSize {
    fn from(arg: SizeArg) -> Self {
        match arg {
            SizeArg::Square => ImageSize::Square,
            SizeArg::Tall => ImageSize::HeightRectangle,
            SizeArg::Wide => ImageSize::WidthRectangle,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum QualityArg {
    Standard,
    Hd,
}

impl From<QualityArg> for ImageQuality {
    fn from(arg: QualityArg) -> Self {
        match arg {
            QualityArg::Standard => ImageQuality::Standard,
            QualityArg::Hd => ImageQuality::Hd,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StyleArg {
    Natural,
    Vivid,
}

impl From<StyleArg> for ImageStyle {
    fn from(arg: StyleArg) -> Self {
        match arg {
            StyleArg::Natural => ImageStyle::Natural,
            StyleArg::Vivid => ImageStyle::Vivid,
        }
    }
}

fn settings(cli: &Cli) -> DialSettings {
    let mut settings = DIAL_SETTINGS.clone();
    if let Some(url) = &cli.dial_url {
        settings = settings.with_dial_url(url);
    }
    if let Some(key) = &cli.api_key {
        settings = settings.with_api_key(key);
    }
    settings
}

fn model_client(settings: &DialSettings, deployment: &str) -> Result<ModelClient> {
    ModelClient::new(ModelConfig::from_settings(settings, deployment))
        .with_context(|| format!("Failed to create client for {}", deployment))
}

/// Guess the MIME type of a local file from its extension, then its header
fn guess_mime(path: &Path, bytes: &[u8]) -> String {
    path.extension()
        .and_then(|ext| ext.to_str())
        .and_then(mime_for_extension)
        .map(str::to_string)
        .or_else(|| {
            image::guess_format(bytes)
                .ok()
                .map(|format| format.to_mime_type().to_string())
        })
        .unwrap_or_else(|| "application/octet-stream".to_string())
}

fn print_response(response: &Response) {
    println!("{}", "-".repeat(50));
    println!("Role: {}", response.role);
    println!("Content: {}", response.content.as_deref().unwrap_or(""));
    for attachment in response.attachments() {
        println!(
            "Attachment: {} ({}) {}",
            attachment.title,
            attachment.mime_type,
            attachment.url.as_deref().unwrap_or("<not uploaded>")
        );
    }
    println!("{}", "-".repeat(50));
}

async fn describe_inline(
    settings: &DialSettings,
    image: &Path,
    deployment: &str,
    prompt: &str,
) -> Result<()> {
    let bytes = tokio::fs::read(image)
        .await
        .with_context(|| format!("Failed to read {}", image.display()))?;
    let image_url = ImgUrl::from_bytes(&guess_mime(image, &bytes), &bytes);

    println!("\n=== Analyzing image with base64 encoded format ===\n");

    let client = model_client(settings, deployment)?;
    let response = client
        .complete([ContentedMessage::describe(prompt, image_url)])
        .await?;
    print_response(&response);
    Ok(())
}

async fn describe_url(settings: &DialSettings, url: &str, deployment: &str, prompt: &str) -> Result<()> {
    println!("\n=== Analyzing image with URL ===\n");

    let client = model_client(settings, deployment)?;
    let response = client
        .complete([ContentedMessage::describe(prompt, ImgUrl::new(url))])
        .await?;
    print_response(&response);
    Ok(())
}

async fn upload_image(settings: &DialSettings, image: &Path) -> Result<Attachment> {
    let bytes = tokio::fs::read(image)
        .await
        .with_context(|| format!("Failed to read {}", image.display()))?;
    let title = image
        .file_name()
        .and_then(|name| name.to_str())
        .context("Image path has no file name")?
        .to_string();
    let attachment = Attachment::new(title, guess_mime(image, &bytes));

    let bucket = BucketClient::open(&settings.api_key, &settings.dial_url)?;
    let uploaded = bucket.put_attachment(attachment, bytes).await;
    bucket.close();
    Ok(uploaded?)
}

async fn describe_attachment(
    settings: &DialSettings,
    image: &Path,
    deployment: &str,
    prompt: &str,
) -> Result<()> {
    let attachment = upload_image(settings, image).await?;

    println!("Uploaded attachment:");
    println!("  Title: {}", attachment.title);
    println!("  URL: {}", attachment.url.as_deref().unwrap_or(""));
    println!("  Type: {}\n", attachment.mime_type);

    println!("=== Analyzing image via DIAL attachment ===\n");

    let client = model_client(settings, deployment)?;
    let message = Message::user(prompt).with_attachments(vec![attachment]);
    let response = client.complete([message]).await?;
    print_response(&response);
    Ok(())
}

async fn generate(
    settings: &DialSettings,
    prompt: &str,
    deployment: &str,
    options: ImageOptions,
    out_dir: &Path,
) -> Result<()> {
    println!("=== Generating image for: '{}' ({}) ===\n", prompt, deployment);

    let client = model_client(settings, deployment)?;
    let response = client
        .get_completion([Message::user(prompt)], options.into_custom_fields())
        .await?;
    print_response(&response);

    let attachments = response.attachments();
    if attachments.is_empty() {
        println!("\nNo attachments found in response");
        return Ok(());
    }
    println!("\nFound {} attachment(s)", attachments.len());

    let bucket = BucketClient::open(&settings.api_key, &settings.dial_url)?;
    let result = save::save_attachments(&bucket, attachments, out_dir).await;
    bucket.close();

    for path in &result.saved {
        println!("Image saved locally as: {}", path.display());
    }
    result.into_result().map(|_| ())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.quiet { "warn" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let settings = settings(&cli);
    if settings.api_key.is_empty() {
        anyhow::bail!("No API key: set DIAL_API_KEY or pass --api-key");
    }
    info!("Using DIAL at {}", settings.dial_url);

    match &cli.command {
        Command::DescribeInline {
            image,
            deployment,
            prompt,
        } => describe_inline(&settings, image, deployment, prompt).await,
        Command::DescribeUrl {
            url,
            deployment,
            prompt,
        } => describe_url(&settings, url, deployment, prompt).await,
        Command::DescribeAttachment {
            image,
            deployment,
            prompt,
        } => describe_attachment(&settings, image, deployment, prompt).await,
        Command::Generate {
            prompt,
            deployment,
            size,
            quality,
            style,
            out_dir,
        } => {
            let mut options = ImageOptions::new().with_size((*size).into());
            if let Some(quality) = quality {
                options = options.with_quality((*quality).into());
            }
            if let Some(style) = style {
                options = options.with_style((*style).into());
            }
            generate(&settings, prompt, deployment, options, out_dir).await
        }
    }
}
