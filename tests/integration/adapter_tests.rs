// Shop adapters against recorded search pages

use super::*;
use articlefinder::ShopAdapter;

fn summary(articles: &[articlefinder::Article]) -> Vec<(String, Option<f64>, String)> {
    articles
        .iter()
        .map(|a| (a.name.clone(), a.price, a.url.clone()))
        .collect()
}

#[tokio::test]
async fn test_bike24_reads_recorded_page() -> anyhow::Result<()> {
    let adapter = Bike24::new(StaticFetcher::page(BIKE24_PAGE));
    let articles = adapter.find("Sattel").await?;

    assert_eq!(
        summary(&articles),
        vec![
            (
                "Selle Italia SLR Kit Carbonio Sattel".to_string(),
                Some(249.95),
                "http://www.bike24.net/1.php?content=8;navigation=1;product=21034".to_string(),
            ),
            (
                "Brooks B17 Standard Ledersattel".to_string(),
                Some(1089.0),
                "http://www.bike24.net/1.php?content=8;navigation=1;product=9987".to_string(),
            ),
            (
                "SQlab 611 Active Sattel".to_string(),
                Some(99.90),
                "http://www.bike24.net/1.php?content=8;navigation=1;product=77".to_string(),
            ),
        ]
    );
    let numbers: Vec<&str> = articles.iter().map(|a| a.article_number.as_str()).collect();
    assert_eq!(numbers, vec!["21034", "9987", "77"]);
    assert!(articles.iter().all(|a| a.shop_name() == "Bike24" && a.visible));
    Ok(())
}

#[tokio::test]
async fn test_cnc_bikes_reads_recorded_page() -> anyhow::Result<()> {
    let adapter = CncBikes::new(StaticFetcher::page(CNC_BIKES_PAGE));
    let articles = adapter.find("Sattel").await?;

    assert_eq!(
        summary(&articles),
        vec![
            (
                "KCNC Ti Pro Lite Sattelstütze 27,2mm".to_string(),
                Some(69.90),
                "http://www.cnc-bike.de/product_info.php?products_id=4410".to_string(),
            ),
            (
                "Tune Komm-Vor Sattel".to_string(),
                Some(169.0),
                "http://www.cnc-bike.de/product_info.php?products_id=4522".to_string(),
            ),
        ]
    );
    assert_eq!(
        articles[0].image_url.as_deref(),
        Some("http://www.cnc-bike.de/images/kcnc_sattelstuetze.jpg")
    );
    Ok(())
}

#[tokio::test]
async fn test_page_of_other_shop_is_a_markup_error() {
    let adapter = CncBikes::new(StaticFetcher::page(BIKE24_PAGE));
    let err = adapter.find("Sattel").await.unwrap_err();
    assert!(err.is_markup_failure());

    let adapter = Bike24::new(StaticFetcher::page(CNC_BIKES_PAGE));
    assert!(matches!(
        adapter.find("Sattel").await,
        Err(AppError::Markup { ref shop, .. }) if shop == "Bike24"
    ));
}

#[tokio::test]
async fn test_fetch_error_passes_through() {
    let adapter = Bike24::new(StaticFetcher::failing("connection refused"));
    let err = adapter.find("Sattel").await.unwrap_err();
    assert!(err.is_fetch_failure());
    assert!(err.to_string().contains("connection refused"));
}

#[tokio::test]
async fn test_adapters_over_http_resolve_against_their_base() -> anyhow::Result<()> {
    let server = start_shop_server().await;
    let adapters = adapters_for(&server)?;

    for adapter in adapters {
        let articles = adapter.find("Sattel").await?;
        assert!(!articles.is_empty(), "{} returned nothing", adapter.shop().name());
        for article in &articles {
            assert!(
                article.url.starts_with(&server.uri()) || article.url.starts_with("http://www.cnc-bike.de/"),
                "unexpected url {}",
                article.url
            );
        }
    }
    Ok(())
}

#[tokio::test]
async fn test_latin1_page_is_decoded() -> anyhow::Result<()> {
    let server = start_shop_server().await;
    let adapter = CncBikes::with_base_url(
        Arc::new(HttpFetcher::new(test_http_config())?),
        &server.uri(),
    );

    let articles = adapter.find("Sattel").await?;
    assert_eq!(articles[0].name, "KCNC Ti Pro Lite Sattelstütze 27,2mm");
    assert_eq!(articles[1].url, format!("{}/product_info.php?products_id=4522", server.uri()));
    Ok(())
}
