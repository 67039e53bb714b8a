//! Integration tests for the scrape pipeline against a mock gallery site.

mod support;
use support::UserAgentIs;
use support::socket_guard::start_mock_server_or_skip;

use covers_core::pipeline::{self, parse_base_url};
use covers_core::{HttpClient, RunMode, ScrapeConfig, ScrapeError, read_url_manifest};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CANONICAL_PREFIX: &str = "/sites/default/files/styles/no_compression/public";

fn listing_html() -> String {
    r#"<!DOCTYPE html>
<html><body>
  <nav><a class="gallery" href="/sites/default/files/2020/01/outside.png">not in gallery</a></nav>
  <div class="view covers-container">
    <a class="gallery" href="/sites/default/files/2023/06/cover1.png"><img src="thumb1.png"></a>
    <a class="gallery" href="/sites/default/files/styles/no_compression/public/2023/06/cover2.webp">2</a>
    <a class="gallery" href="/sites/default/files/2023/06/cover1.jpg">1 again</a>
    <a class="thumbnail" href="/sites/default/files/2023/06/ignored.png">not a gallery link</a>
    <a class="gallery">no href</a>
    <a class="gallery" href="/sites/default/files/2023/05/broken.jpg">3</a>
  </div>
</body></html>"#
        .to_string()
}

async fn mount_listing(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/covers"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_html()))
        .mount(server)
        .await;
}

async fn mount_image(server: &MockServer, relative: &str, body: &[u8]) {
    Mock::given(method("GET"))
        .and(path(format!("{CANONICAL_PREFIX}/{relative}")))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body.to_vec()))
        .mount(server)
        .await;
}

fn config_for(server: &MockServer, temp_dir: &TempDir) -> ScrapeConfig {
    ScrapeConfig {
        listing_url: format!("{}/covers", server.uri()),
        base_url: parse_base_url(&server.uri()).unwrap(),
        output_dir: temp_dir.path().join("output"),
        manifest_path: temp_dir.path().join("urls.json"),
        ..ScrapeConfig::default()
    }
}

#[tokio::test]
async fn test_full_run_normalizes_dedupes_and_downloads() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    mount_listing(&server).await;
    mount_image(&server, "2023/06/cover1.jpg.webp", b"cover one").await;
    mount_image(&server, "2023/06/cover2.jpg.webp", b"cover two").await;
    Mock::given(method("GET"))
        .and(path(format!("{CANONICAL_PREFIX}/2023/05/broken.jpg.webp")))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let temp_dir = TempDir::new().unwrap();
    let config = config_for(&server, &temp_dir);
    let report = pipeline::run(&config, |_| None).await.unwrap();

    let expected: Vec<String> = [
        "2023/06/cover1.jpg.webp",
        "2023/06/cover2.jpg.webp",
        "2023/05/broken.jpg.webp",
    ]
    .iter()
    .map(|relative| format!("{}{CANONICAL_PREFIX}/{relative}", server.uri()))
    .collect();
    assert_eq!(report.urls, expected);
    assert_eq!(read_url_manifest(&config.manifest_path).unwrap(), expected);

    let scrape = report.scrape.as_ref().unwrap();
    assert_eq!(scrape.links_found, 4);
    assert_eq!(scrape.normalized.duplicates_removed(), 1);

    let stats = report.downloads.as_ref().unwrap();
    assert_eq!(stats.downloaded(), 2);
    assert_eq!(stats.failed(), 1);
    assert_eq!(
        stats.failures()[0].filename.as_deref(),
        Some("broken.jpg.webp")
    );
    assert!(report.has_download_failures());

    assert_eq!(
        std::fs::read(config.output_dir.join("cover2.jpg.webp")).unwrap(),
        b"cover two"
    );
    assert!(!config.output_dir.join("broken.jpg.webp").exists());
}

#[tokio::test]
async fn test_manifest_is_pretty_printed_with_four_space_indent() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    mount_listing(&server).await;

    let temp_dir = TempDir::new().unwrap();
    let config = ScrapeConfig {
        mode: RunMode::DryRun,
        ..config_for(&server, &temp_dir)
    };
    pipeline::run(&config, |_| None).await.unwrap();

    let text = std::fs::read_to_string(&config.manifest_path).unwrap();
    assert!(text.starts_with("[\n    \""), "unexpected manifest layout: {text}");
    assert!(text.trim_end().ends_with(']'));
}

#[tokio::test]
async fn test_second_run_skips_everything_without_image_requests() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    mount_listing(&server).await;

    let temp_dir = TempDir::new().unwrap();
    let config = config_for(&server, &temp_dir);
    std::fs::create_dir_all(&config.output_dir).unwrap();
    for name in ["cover1.jpg.webp", "cover2.jpg.webp", "broken.jpg.webp"] {
        std::fs::write(config.output_dir.join(name), b"already here").unwrap();
    }

    Mock::given(method("GET"))
        .and(path(format!("{CANONICAL_PREFIX}/2023/06/cover1.jpg.webp")))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"new"))
        .expect(0)
        .mount(&server)
        .await;

    let report = pipeline::run(&config, |_| None).await.unwrap();
    let stats = report.downloads.unwrap();
    assert_eq!(stats.skipped(), 3);
    assert_eq!(stats.downloaded(), 0);
    assert_eq!(
        std::fs::read(config.output_dir.join("cover1.jpg.webp")).unwrap(),
        b"already here"
    );
}

#[tokio::test]
async fn test_concurrent_run_matches_sequential_file_set() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    mount_listing(&server).await;
    mount_image(&server, "2023/06/cover1.jpg.webp", b"1").await;
    mount_image(&server, "2023/06/cover2.jpg.webp", b"2").await;
    mount_image(&server, "2023/05/broken.jpg.webp", b"3").await;

    let temp_dir = TempDir::new().unwrap();
    let config = ScrapeConfig {
        concurrency: 8,
        ..config_for(&server, &temp_dir)
    };
    let report = pipeline::run(&config, |_| None).await.unwrap();

    assert_eq!(report.downloads.unwrap().downloaded(), 3);
    let mut names: Vec<String> = std::fs::read_dir(&config.output_dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(
        names,
        vec!["broken.jpg.webp", "cover1.jpg.webp", "cover2.jpg.webp"]
    );
}

#[tokio::test]
async fn test_requests_present_browser_user_agent() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .and(path("/covers"))
        .and(UserAgentIs(covers_core::BROWSER_USER_AGENT))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_html()))
        .expect(1)
        .mount(&server)
        .await;

    let temp_dir = TempDir::new().unwrap();
    let config = ScrapeConfig {
        mode: RunMode::DryRun,
        ..config_for(&server, &temp_dir)
    };
    let client = HttpClient::new().unwrap();
    let report = pipeline::run_with_client(&client, &config, |_| None)
        .await
        .unwrap();
    assert_eq!(report.urls.len(), 3);
}

#[tokio::test]
async fn test_changed_page_structure_aborts_before_manifest() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .and(path("/covers"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("<div class=\"gallery-grid\"></div>"),
        )
        .mount(&server)
        .await;

    let temp_dir = TempDir::new().unwrap();
    let config = config_for(&server, &temp_dir);
    let result = pipeline::run(&config, |_| None).await;

    assert!(matches!(result, Err(ScrapeError::Structure(_))));
    assert!(!config.manifest_path.exists());
}

#[tokio::test]
async fn test_empty_gallery_writes_empty_manifest() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .and(path("/covers"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("<div class=\"covers-container\"></div>"),
        )
        .mount(&server)
        .await;

    let temp_dir = TempDir::new().unwrap();
    let config = config_for(&server, &temp_dir);
    let report = pipeline::run(&config, |_| None).await.unwrap();

    assert!(report.urls.is_empty());
    assert_eq!(report.downloads.unwrap().total(), 0);
    assert!(read_url_manifest(&config.manifest_path).unwrap().is_empty());
}
