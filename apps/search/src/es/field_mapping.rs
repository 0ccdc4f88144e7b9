//! Index field names that depend on the shop context

use storefront_model::{Shop, ShopContext};

#[derive(Debug, Clone, Copy, Default)]
pub struct FieldMapping;

impl FieldMapping {
    pub fn new() -> Self {
        Self
    }

    /// Precalculated price of the current customer group in the context
    /// currency. The indexer already applies the fallback group.
    pub fn price_field(&self, context: &ShopContext) -> String {
        format!(
            "calculatedPrices.{}_{}.calculatedPrice",
            context.current_customer_group.key, context.currency.id
        )
    }

    /// Name field analyzed for the shop language, e.g. `name.de` for
    /// `de_DE`; plain `name` without a locale
    pub fn language_field(&self, shop: &Shop) -> String {
        match shop
            .locale
            .as_deref()
            .and_then(|locale| locale.split(['_', '-']).next())
            .filter(|language| !language.is_empty())
        {
            Some(language) => format!("name.{}", language.to_lowercase()),
            None => "name".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::shop_context;

    #[test]
    fn price_field_is_group_and_currency_specific() {
        assert_eq!(
            FieldMapping::new().price_field(&shop_context()),
            "calculatedPrices.H_1.calculatedPrice"
        );
    }

    #[test]
    fn language_field_follows_locale() {
        let mut context = shop_context();
        assert_eq!(FieldMapping::new().language_field(&context.shop), "name.de");
        context.shop.locale = None;
        assert_eq!(FieldMapping::new().language_field(&context.shop), "name");
    }
}
