#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::*;
use futures::StreamExt;
use serde_json::json;
use tokio_util::sync::CancellationToken;
use upm_core::{FieldValue, KbSearch, MapperError, SearchOptions};

fn hit(accession: &str) -> serde_json::Value {
    json!({
        "primaryAccession": accession,
        "uniProtkbId": format!("{}_HUMAN", accession),
        "entryType": "UniProtKB reviewed (Swiss-Prot)"
    })
}

fn two_pages(transport: &ScriptedTransport) {
    transport.on_page(
        "/uniprotkb/search",
        None,
        vec![page(json!({ "results": [hit("P1"), hit("P2")] }), Some("c1"))
            .map(|r| r.with_header("X-Total-Results", "3"))],
    );
    transport.on_page(
        "/uniprotkb/search",
        Some("c1"),
        vec![page(json!({ "results": [hit("P3")] }), None)],
    );
}

#[tokio::test(start_paused = true)]
async fn test_search_collects_every_page() {
    let transport = ScriptedTransport::new();
    two_pages(&transport);

    let search = KbSearch::new(context(&transport, fast_config()));
    let options = SearchOptions::default().with_fields(["accession", "id"]);
    let result = search
        .search("gene:ADORA1 AND reviewed:true", &options)
        .await
        .unwrap();

    let accessions: Vec<_> = result.records.iter().map(|r| r.to_id.as_str()).collect();
    assert_eq!(accessions, vec!["P1", "P2", "P3"]);
    assert_eq!(result.total_results, Some(3));
    assert_eq!(
        result.records[1].field("id").and_then(FieldValue::as_text),
        Some("P2_HUMAN")
    );

    let first = &transport.requests()[0];
    assert_eq!(first.param_value("query"), Some("gene:ADORA1 AND reviewed:true"));
    assert_eq!(first.param_value("fields"), Some("accession,id"));
    assert_eq!(first.param_value("includeIsoform"), Some("false"));
}

#[tokio::test(start_paused = true)]
async fn test_search_limit_stops_early() {
    let transport = ScriptedTransport::new();
    two_pages(&transport);

    let search = KbSearch::new(context(&transport, fast_config()));
    let result = search
        .search("reviewed:true", &SearchOptions::default().with_limit(2))
        .await
        .unwrap();

    assert_eq!(result.records.len(), 2);
    assert_eq!(transport.requests().len(), 1);
    assert_eq!(transport.requests()[0].param_value("size"), Some("2"));
}

#[tokio::test(start_paused = true)]
async fn test_search_defaults_to_registry_fields() {
    let transport = ScriptedTransport::new();
    two_pages(&transport);

    let search = KbSearch::new(context(&transport, fast_config()));
    let result = search.search("reviewed:true", &SearchOptions::default()).await.unwrap();

    assert_eq!(result.fields[0], "accession");
    assert!(result.fields.contains(&"gene_names".to_string()));
    assert_eq!(
        transport.requests()[0].param_value("fields"),
        Some(result.fields.join(",").as_str())
    );
}

#[tokio::test(start_paused = true)]
async fn test_search_page_failure_is_an_error() {
    let transport = ScriptedTransport::new();
    transport.on_page(
        "/uniprotkb/search",
        None,
        vec![page(json!({ "results": [hit("P1")] }), Some("c1"))],
    );
    transport.on_page("/uniprotkb/search", Some("c1"), vec![status(502)]);

    let search = KbSearch::new(context(&transport, fast_config()));
    let err = search
        .search("reviewed:true", &SearchOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, MapperError::Pagination { page_index: 1, .. }));
}

#[tokio::test]
async fn test_search_rejects_bad_input_locally() {
    let transport = ScriptedTransport::new();
    let search = KbSearch::new(context(&transport, fast_config()));

    assert!(matches!(
        search.search("   ", &SearchOptions::default()).await,
        Err(MapperError::InvalidInput(_))
    ));
    assert!(matches!(
        search
            .search("reviewed:true", &SearchOptions::default().with_fields(["bogus"]))
            .await,
        Err(MapperError::UnknownField(f)) if f == "bogus"
    ));
    assert!(transport.requests().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_pages_stream_is_lazy() {
    let transport = ScriptedTransport::new();
    two_pages(&transport);

    let search = KbSearch::new(context(&transport, fast_config()));
    let pages = search
        .pages("reviewed:true", &SearchOptions::default(), CancellationToken::new())
        .unwrap();
    assert!(transport.requests().is_empty());

    let mut stream = Box::pin(pages.into_stream());
    let first = stream.next().await.unwrap().unwrap();
    assert_eq!(first.index, 0);
    assert_eq!(first.next_cursor.as_deref(), Some("c1"));
    assert_eq!(transport.requests().len(), 1);

    let second = stream.next().await.unwrap().unwrap();
    assert_eq!(second.index, 1);
    assert!(second.next_cursor.is_none());
    assert!(stream.next().await.is_none());
}

#[tokio::test(start_paused = true)]
async fn test_injected_transport_still_validates_config() {
    let transport = ScriptedTransport::new();
    two_pages(&transport);

    for config in [
        fast_config().with_page_size(0),
        fast_config().with_poll_interval(0),
    ] {
        let err = upm_core::ApiContext::with_transport(config, transport.clone()).unwrap_err();
        assert!(matches!(err, MapperError::Config(_)));
    }
    assert!(transport.requests().is_empty());
}
