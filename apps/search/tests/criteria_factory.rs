#[allow(unused)]
mod support;

use std::sync::Arc;

use serde_json::{json, Value as JsonValue};
use storefront_search::config::{Config, FacetLabels, SearchConfig};
use storefront_search::dbal::{BindValue, QueryBuilderFactory, DbalProductNumberSearch};
use storefront_search::{ProductNumberSearch, SearchService, StoreFrontCriteriaFactory};
use support::{catalog, params, shop_context, RecordedQuery, RecordingConnection};
use tokio_test::assert_ok;

fn respond(query: &RecordedQuery) -> Vec<JsonValue> {
    if query.selects("total") {
        vec![json!({"total": "40"})]
    } else if query.selects("manufacturerId") {
        vec![json!({"manufacturerId": 42}), json!({"manufacturerId": 7})]
    } else if query.selects("number") {
        vec![json!({"id": 1, "variantId": 11, "number": "SW10001"})]
    } else {
        Vec::new()
    }
}

fn service(connection: Arc<RecordingConnection>, config: &Config) -> SearchService {
    let search = DbalProductNumberSearch::with_core_handlers(
        Arc::new(QueryBuilderFactory::default()),
        connection,
        &catalog().into_services(),
        Arc::new(FacetLabels::default()),
        &[],
    );
    SearchService::new(
        ProductNumberSearch::Dbal(search),
        StoreFrontCriteriaFactory::new(config.search.clone(), Vec::new(), Vec::new()),
    )
}

fn config() -> Config {
    Config {
        search: SearchConfig {
            facets: vec!["manufacturer".to_string(), "shipping_free".to_string()],
            ..SearchConfig::default()
        },
        ..Config::default()
    }
}

#[tokio::test]
async fn listing_request_runs_end_to_end() {
    let connection = RecordingConnection::new(respond);
    let service = service(connection.clone(), &config());
    let context = shop_context();

    let criteria = assert_ok!(service
        .criteria_factory()
        .create_listing_criteria(&params(&[("c", "5"), ("manufacturer", "42"), ("p", "2")]), &context));
    let result = assert_ok!(service.search(&criteria, &context).await);

    assert_eq!(service.backend(), "dbal");
    assert_eq!(result.total, 40);
    assert_eq!(result.products[0].id, 1);

    let product_query = connection.query_selecting("number").unwrap();
    assert_eq!(
        product_query.binds[..3],
        [
            BindValue::IntArray(vec![5]),
            BindValue::IntArray(vec![1]),
            BindValue::IntArray(vec![42]),
        ]
    );
    assert!(product_query.sql.contains("product_avoid_customer_group"));
    assert!(product_query.sql.ends_with("LIMIT 12 OFFSET 12"));

    let manufacturer = result
        .facet("manufacturer")
        .and_then(|f| f.as_value_list())
        .unwrap();
    assert_eq!(manufacturer.values.len(), 2);
    assert!(!result.has_facet("shipping_free"));
}

#[tokio::test]
async fn ajax_count_fetches_one_row_without_facets() {
    let connection = RecordingConnection::new(respond);
    let service = service(connection.clone(), &config());
    let context = shop_context();

    let criteria = assert_ok!(service.criteria_factory().create_ajax_count_criteria(
        &params(&[("c", "5"), ("p", "3"), ("sort", "4")]),
        &context
    ));
    let result = assert_ok!(service.search(&criteria, &context).await);

    assert_eq!(result.total, 40);
    assert!(result.facets.is_empty());

    let queries = connection.queries();
    assert_eq!(queries.len(), 2);
    assert!(queries[0].sql.ends_with("ORDER BY product.id ASC LIMIT 1"));
    assert!(queries[1].selects("total"));
}

#[tokio::test]
async fn search_request_is_scoped_to_the_shop() {
    let connection = RecordingConnection::new(respond);
    let service = service(connection.clone(), &config());
    let context = shop_context();

    let criteria = assert_ok!(service
        .criteria_factory()
        .create_search_criteria(&params(&[("q", "50% off")]), &context));
    assert_ok!(service.search(&criteria, &context).await);

    let product_query = connection.query_selecting("number").unwrap();
    assert_eq!(product_query.binds[0], BindValue::IntArray(vec![3]));
    assert!(product_query
        .binds
        .contains(&BindValue::Text("%50\\%%".to_string())));
    assert!(product_query.sql.contains("ILIKE"));
}
