//! qrlogo command-line entrypoint

use anyhow::{Context, bail};
use clap::Parser;
use qrlogo::output::render_batch_report;
use qrlogo::{
    BatchRunner, Compositor, DirectorySink, Error, Logo, MAX_URLS, MetricsFormat, QrLogoConfig,
    UrlList, logging, metrics,
};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "qrlogo",
    version,
    about = "Generate QR codes with a logo composited at the center"
)]
struct Cli {
    /// Logo image placed at the center of every code (PNG, JPEG, GIF, WebP, BMP, ...)
    #[arg(long, value_name = "PATH")]
    logo: PathBuf,

    /// URL to encode; repeat for several codes (at most 10 in total)
    #[arg(long = "url", value_name = "URL")]
    urls: Vec<String>,

    /// File with one URL per line, appended after any --url values
    #[arg(long, value_name = "PATH")]
    urls_file: Option<PathBuf>,

    /// Directory the qr-code-<n>.png files are written to
    #[arg(long, short, value_name = "DIR")]
    out: Option<PathBuf>,

    /// Optional configuration file (toml/yaml). Defaults to qrlogo.{toml,yaml} in cwd/XDG config.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Decode every generated code and report whether it scans back
    #[arg(long)]
    verify: bool,

    /// Output results as formatted JSON instead of human-readable text
    #[arg(long)]
    json: bool,

    /// Collect render metrics and print them after the batch
    #[arg(long)]
    metrics: bool,

    /// Metrics output format (`json` or `prometheus`)
    #[arg(long, value_name = "FORMAT")]
    metrics_format: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = QrLogoConfig::load(cli.config.as_deref())?;

    if let Some(ref out) = cli.out {
        config.output.directory = out.clone();
    }
    if cli.verify {
        config.output.verify = true;
    }
    if cli.metrics {
        config.logging.metrics = true;
    }
    if let Some(ref format) = cli.metrics_format {
        config.logging.metrics_format = format.parse::<MetricsFormat>().map_err(Error::Config)?;
    }

    logging::init(&config.logging)?;

    if config.logging.metrics {
        metrics::enable();
    }

    let urls = collect_urls(&cli).await?;
    let compositor = Compositor::new(config.render_options()?)?;
    info!(options = ?compositor.options(), "Render options");

    let logo = Logo::load(&cli.logo)
        .await
        .with_context(|| format!("cannot use {} as logo", cli.logo.display()))?;

    let runner = BatchRunner::new(compositor).with_verification(config.output.verify);
    let sink = DirectorySink::new(config.output.directory.clone());
    let report = runner.run(&logo, &urls, &sink).await?;

    let snapshot = metrics::snapshot();
    if let Some(ref snapshot) = snapshot {
        metrics::log_snapshot(snapshot);
    }

    let rendered = render_batch_report(&report, snapshot.as_ref());
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&rendered.json)?);
    } else {
        for line in &rendered.human {
            println!("{line}");
        }
        if let Some(ref snapshot) = snapshot {
            println!();
            println!("{}", metrics::render(snapshot, config.logging.metrics_format));
        }
    }

    Ok(())
}

async fn collect_urls(cli: &Cli) -> anyhow::Result<UrlList> {
    let mut urls = cli.urls.clone();

    if let Some(ref path) = cli.urls_file {
        let contents = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("cannot read URL list {}", path.display()))?;
        urls.extend(
            contents
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string),
        );
    }

    if urls.is_empty() {
        bail!("no URLs given; pass --url or --urls-file");
    }
    if urls.len() > MAX_URLS {
        bail!("{} URLs given, at most {MAX_URLS} are supported", urls.len());
    }

    Ok(UrlList::from_urls(urls)?)
}
