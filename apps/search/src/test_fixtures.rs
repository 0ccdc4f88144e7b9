//! Shared fixtures for unit tests

use storefront_model::{Currency, CustomerGroup, Shop, ShopContext, SystemCategory};

/// Shop 1 with system category 3 below root 1, customer group "H" falling
/// back to "EK", EUR at factor 1
pub(crate) fn shop_context() -> ShopContext {
    ShopContext {
        shop: Shop {
            id: 1,
            name: "Main".to_string(),
            category: SystemCategory {
                id: 3,
                name: "Deutsch".to_string(),
                path: vec![1],
            },
            locale: Some("de_DE".to_string()),
        },
        current_customer_group: CustomerGroup {
            id: 2,
            key: "H".to_string(),
            display_gross: false,
        },
        fallback_customer_group: CustomerGroup {
            id: 1,
            key: "EK".to_string(),
            display_gross: true,
        },
        currency: Currency {
            id: 1,
            iso: "EUR".to_string(),
            factor: 1.0,
            symbol: Some("€".to_string()),
        },
    }
}
