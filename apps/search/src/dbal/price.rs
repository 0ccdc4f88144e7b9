//! Customer price expression shared by the price condition, facet and sorting

use storefront_model::ShopContext;

use super::query::SqlQuery;

const PRICE_STATE: &str = "prices_joined";
const PRICE_EXPRESSION: &str = "price_expression";

/// Joins the main variant's prices for the current and the fallback customer
/// group and returns the expression of the displayed price.
///
/// The current group's price wins; products without one fall back to the
/// fallback group's price. The result is converted into the context currency.
/// Joins are added once per query.
pub fn join_prices(query: &mut SqlQuery, context: &ShopContext) -> String {
    if query.add_state(PRICE_STATE) {
        let current = query.bind_text(context.current_customer_group.key.clone());
        query.left_join(
            "product_price",
            "price_current",
            format!(
                "price_current.variant_id = variant.id AND price_current.customer_group_key = ${} AND price_current.from_quantity = 1",
                current
            ),
        );

        let fallback = query.bind_text(context.fallback_customer_group.key.clone());
        query.left_join(
            "product_price",
            "price_fallback",
            format!(
                "price_fallback.variant_id = variant.id AND price_fallback.customer_group_key = ${} AND price_fallback.from_quantity = 1",
                fallback
            ),
        );

        let factor = query.bind_float(context.currency.factor);
        query.set_value(
            PRICE_EXPRESSION,
            format!(
                "(COALESCE(price_current.price, price_fallback.price) * ${}::float8)",
                factor
            ),
        );
    }

    query.value(PRICE_EXPRESSION).unwrap_or("NULL").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dbal::query::BindValue;
    use crate::test_fixtures::shop_context as context;

    #[test]
    fn prices_are_joined_once() {
        let mut query = SqlQuery::new("product", "product");
        query.select([("id", "product.id")]);
        let first = join_prices(&mut query, &context());
        let second = join_prices(&mut query, &context());

        assert_eq!(first, second);
        assert_eq!(query.to_sql().matches("product_price").count(), 2);
        assert_eq!(
            query.binds(),
            &[
                BindValue::Text("H".to_string()),
                BindValue::Text("EK".to_string()),
                BindValue::Float(1.0),
            ]
        );
        assert!(first.contains("COALESCE(price_current.price, price_fallback.price)"));
    }
}
