use image::{DynamicImage, Rgba, RgbaImage};

use qrlogo::config::MetricsFormat;
use qrlogo::{BatchRunner, Logo, MemorySink, UrlList, metrics};

fn logo() -> Logo {
    Logo::from_image(DynamicImage::ImageRgba8(RgbaImage::from_pixel(
        32,
        32,
        Rgba([10, 10, 10, 255]),
    )))
}

#[tokio::test]
async fn batch_outcomes_are_counted() {
    metrics::enable();
    assert!(metrics::is_enabled());

    let too_long = format!("https://example.com/{}", "q".repeat(3000));
    let urls = UrlList::from_urls(["https://example.com", too_long.as_str()]).expect("urls");
    BatchRunner::default()
        .with_verification(true)
        .run(&logo(), &urls, &MemorySink::new())
        .await
        .expect("batch");

    let snapshot = metrics::snapshot().expect("metrics enabled");
    assert!(snapshot.renders >= 2);
    assert!(snapshot.successes >= 1);
    assert!(snapshot.failures_by_kind.get("encoding").copied().unwrap_or_default() >= 1);
    assert!(snapshot.verified + snapshot.unverified >= 1);

    let json: serde_json::Value =
        serde_json::from_str(&metrics::render(&snapshot, MetricsFormat::Json)).expect("json");
    assert!(json["renders"].as_u64().unwrap_or_default() >= 2);

    let prometheus = metrics::render(&snapshot, MetricsFormat::Prometheus);
    assert!(prometheus.contains("qrlogo_renders_total"));
    assert!(prometheus.contains("qrlogo_render_failures_total{kind=\"encoding\"}"));
    assert!(prometheus.contains("qrlogo_verifications_total{result=\"pass\"}"));
}

#[test]
fn enabling_twice_keeps_existing_totals() {
    metrics::enable();
    metrics::record(std::time::Duration::from_millis(3), true, None);
    let before = metrics::snapshot().expect("metrics enabled").renders;

    metrics::enable();
    let after = metrics::snapshot().expect("metrics enabled");
    assert!(after.renders >= before);
    metrics::log_snapshot(&after);
}
