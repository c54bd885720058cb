use std::io::Cursor;
use std::path::PathBuf;

use bytes::Bytes;
use image::{ImageFormat, Rgba, RgbaImage};
use uuid::Uuid;

use qrlogo::{
    BatchRunner, DirectorySink, Error, ItemOutcome, Logo, MemorySink, UrlList, artifact_file_name,
};

fn scratch_dir() -> PathBuf {
    std::env::temp_dir().join(format!("qrlogo-test-{}", Uuid::new_v4()))
}

fn jpeg_logo_bytes() -> Bytes {
    let img = image::DynamicImage::ImageRgba8(RgbaImage::from_pixel(
        90,
        45,
        Rgba([0, 90, 180, 255]),
    ))
    .to_rgb8();
    let mut cursor = Cursor::new(Vec::new());
    img.write_to(&mut cursor, ImageFormat::Jpeg).expect("encode jpeg");
    Bytes::from(cursor.into_inner())
}

#[tokio::test]
async fn two_valid_and_one_blank_url_produce_two_files() {
    let dir = scratch_dir();
    let urls = UrlList::from_urls(["https://example.com", "", "https://example.org"])
        .expect("url list");
    let logo = Logo::decode_async(jpeg_logo_bytes()).await.expect("logo");

    let report = BatchRunner::default()
        .run(&logo, &urls, &DirectorySink::new(&dir))
        .await
        .expect("batch");

    assert_eq!(report.succeeded(), 2);
    assert_eq!(report.failed(), 0);

    for index in 1..=2 {
        let path = dir.join(artifact_file_name(index));
        let written = tokio::fs::read(&path).await.expect("artifact written");
        let decoded = image::load_from_memory(&written).expect("png");
        assert_eq!((decoded.width(), decoded.height()), (400, 400));
    }
    assert!(!dir.join(artifact_file_name(3)).exists());

    tokio::fs::remove_dir_all(&dir).await.ok();
}

#[tokio::test]
async fn verification_is_reported_per_item() {
    let scans = "https://example.com/products/qr-logo?id=42";
    // version 2 at level M cannot correct the area under the logo backdrop
    let occluded = "https://example.com";
    let urls = UrlList::from_urls([scans, occluded]).expect("url list");
    let logo = Logo::from_image(image::DynamicImage::ImageRgba8(RgbaImage::from_pixel(
        50,
        50,
        Rgba([255, 0, 0, 255]),
    )));
    let sink = MemorySink::new();

    let report = BatchRunner::default()
        .with_verification(true)
        .run(&logo, &urls, &sink)
        .await
        .expect("batch");

    let verified: Vec<_> = report
        .items
        .iter()
        .map(|item| match &item.outcome {
            ItemOutcome::Delivered {
                file_name,
                verified,
                ..
            } => {
                assert_eq!(file_name, &artifact_file_name(item.index));
                *verified
            }
            other => panic!("unexpected outcome {other:?}"),
        })
        .collect();
    assert_eq!(verified, vec![Some(true), Some(false)]);
    assert_eq!(report.succeeded(), 2);

    let delivered = sink.take();
    assert_eq!(delivered.len(), 2);
    assert_eq!(delivered[0].1.payload, scans);
    assert_eq!(delivered[1].1.payload, occluded);
}

#[tokio::test]
async fn corrupt_logo_fails_once_before_any_delivery() {
    let dir = scratch_dir();
    let urls = UrlList::from_urls(["https://example.com", "https://example.org"])
        .expect("url list");

    let err = BatchRunner::default()
        .run_with_logo_bytes(
            Bytes::from_static(&[0x89, b'P', b'N', b'G']),
            &urls,
            &DirectorySink::new(&dir),
        )
        .await
        .expect_err("corrupt logo");

    assert!(matches!(err, Error::ImageDecode(_)));
    assert!(err.is_fatal_for_batch());
    assert!(!dir.exists());
}

#[tokio::test]
async fn unwritable_directory_aborts_batch() {
    let dir = scratch_dir();
    tokio::fs::create_dir_all(&dir).await.expect("mkdir");
    // a regular file where the output directory should be
    let blocked = dir.join("blocked");
    tokio::fs::write(&blocked, b"x").await.expect("write");

    let urls = UrlList::from_urls(["https://example.com"]).expect("url list");
    let err = BatchRunner::default()
        .run_with_logo_bytes(jpeg_logo_bytes(), &urls, &DirectorySink::new(&blocked))
        .await
        .expect_err("cannot write");
    assert!(matches!(err, Error::Io(_)));

    tokio::fs::remove_dir_all(&dir).await.ok();
}
