// Concurrent search across shops served by a mock server

use super::*;
use articlefinder::{SearchRequest, ShopOutcome};
use std::time::Duration;

#[tokio::test]
async fn test_one_shop_down_others_still_report() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    mount_bike24(&server, ResponseTemplate::new(500)).await;
    mount_cnc_bikes(&server, latin1_page(CNC_BIKES_PAGE)).await;

    let result = finder_for(&server)?
        .search(&SearchRequest::new("Sattel"), |_| {})
        .await;

    assert_eq!(result.articles.len(), 2);
    assert!(result.articles.iter().all(|a| a.shop_name() == "CNC Bikes"));

    let failures: Vec<(&str, &str)> = result.failures().collect();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].0, "Bike24");
    assert!(failures[0].1.contains("500"));
    Ok(())
}

#[tokio::test]
async fn test_changed_layout_is_reported_per_shop() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    mount_bike24(&server, latin1_page(BIKE24_PAGE)).await;
    mount_cnc_bikes(&server, latin1_page("<html><body><p>Wartungsarbeiten</p></body></html>")).await;

    let result = finder_for(&server)?
        .search(&SearchRequest::new("Sattel"), |_| {})
        .await;

    assert_eq!(result.articles.len(), 3);
    assert!(matches!(
        result.outcomes.get("CNC Bikes"),
        Some(ShopOutcome::Failed { reason }) if reason.contains("productListing")
    ));
    Ok(())
}

#[tokio::test]
async fn test_every_shop_failing_yields_empty_result() -> anyhow::Result<()> {
    let server = MockServer::start().await;

    let result = finder_for(&server)?
        .search(&SearchRequest::new("Sattel"), |_| {})
        .await;

    assert!(result.is_empty());
    assert!(!result.cancelled);
    assert_eq!(result.failures().count(), 2);
    Ok(())
}

#[tokio::test]
async fn test_disabled_shop_is_not_queried() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    mount_cnc_bikes(&server, latin1_page(CNC_BIKES_PAGE)).await;
    Mock::given(method("GET"))
        .and(path("/1.php"))
        .respond_with(latin1_page(BIKE24_PAGE))
        .expect(0)
        .mount(&server)
        .await;

    let request = SearchRequest::new("Sattel").with_shops(["CNC Bikes"]);
    let result = finder_for(&server)?.search(&request, |_| {}).await;

    assert_eq!(result.articles.len(), 2);
    assert_eq!(result.outcomes.len(), 1);
    server.verify().await;
    Ok(())
}

#[tokio::test]
async fn test_cancel_returns_partial_result() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    mount_cnc_bikes(&server, latin1_page(CNC_BIKES_PAGE)).await;
    mount_bike24(&server, latin1_page(BIKE24_PAGE).set_delay(Duration::from_secs(10))).await;

    let finder = Arc::new(finder_for(&server)?);
    let canceller = Arc::clone(&finder);

    let result = finder
        .search(&SearchRequest::new("Sattel"), move |progress| {
            if progress.shop_name == "CNC Bikes" {
                canceller.cancel();
            }
        })
        .await;

    assert!(result.cancelled);
    assert_eq!(result.articles.len(), 2);
    assert_eq!(result.outcomes.get("Bike24"), Some(&ShopOutcome::Skipped));
    assert!(matches!(
        result.outcomes.get("CNC Bikes"),
        Some(ShopOutcome::Succeeded { articles: 2 })
    ));
    Ok(())
}

#[tokio::test]
async fn test_empty_result_table_is_a_shop_failure() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    mount_bike24(&server, latin1_page(BIKE24_PAGE)).await;
    mount_cnc_bikes(
        &server,
        latin1_page(
            r#"<table class="productListing"><tr><td>Bild</td><td>Artikelname</td><td>Preis</td></tr></table>"#,
        ),
    )
    .await;

    let result = finder_for(&server)?
        .search(&SearchRequest::new("Sattel"), |_| {})
        .await;

    assert_eq!(result.articles.len(), 3);
    assert!(matches!(
        result.outcomes.get("CNC Bikes"),
        Some(ShopOutcome::Failed { reason }) if reason.contains("no listings")
    ));
    Ok(())
}
