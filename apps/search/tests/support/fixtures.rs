use std::collections::BTreeMap;

use storefront_model::{
    Category, Currency, CustomerGroup, Manufacturer, PropertyGroup, PropertyOption, Shop,
    ShopContext, SystemCategory,
};

use super::MemoryCatalog;

/// Shop 1 rooted at category 3 (below 1), customer group "EK", EUR
pub fn shop_context() -> ShopContext {
    ShopContext {
        shop: Shop {
            id: 1,
            name: "Demo".to_string(),
            category: SystemCategory {
                id: 3,
                name: "Deutsch".to_string(),
                path: vec![1],
            },
            locale: Some("de_DE".to_string()),
        },
        current_customer_group: customer_group(1, "EK"),
        fallback_customer_group: customer_group(1, "EK"),
        currency: Currency {
            id: 1,
            iso: "EUR".to_string(),
            factor: 1.0,
            symbol: Some("€".to_string()),
        },
    }
}

pub fn customer_group(id: i64, key: &str) -> CustomerGroup {
    CustomerGroup {
        id,
        key: key.to_string(),
        display_gross: true,
    }
}

pub fn manufacturer(id: i64, name: &str) -> Manufacturer {
    Manufacturer {
        id,
        name: name.to_string(),
        description: None,
        link: None,
        cover: None,
        attributes: BTreeMap::new(),
    }
}

/// Category below the shop root; `path` is nearest parent first
pub fn category(id: i64, name: &str, path: &[i64], position: i32) -> Category {
    Category {
        id,
        parent_id: path.first().copied(),
        name: name.to_string(),
        position,
        path: path.to_vec(),
        media: None,
        attributes: BTreeMap::new(),
    }
}

pub fn property_group(id: i64, name: &str, options: &[(i64, &str)]) -> PropertyGroup {
    PropertyGroup {
        id,
        name: name.to_string(),
        filterable: true,
        options: options
            .iter()
            .enumerate()
            .map(|(position, (id, name))| PropertyOption {
                id: *id,
                name: name.to_string(),
                position: position as i32,
                media: None,
                attributes: BTreeMap::new(),
            })
            .collect(),
        attributes: BTreeMap::new(),
    }
}

/// Three manufacturers, a two-level category tree below the shop root and
/// a color group
pub fn catalog() -> MemoryCatalog {
    MemoryCatalog {
        categories: vec![
            category(5, "Clothing", &[3, 1], 1),
            category(6, "Shoes", &[3, 1], 2),
            category(8, "Shirts", &[5, 3, 1], 1),
        ],
        manufacturers: vec![
            manufacturer(42, "shopware AG"),
            manufacturer(7, "Adidas"),
            manufacturer(9, "Zara"),
        ],
        property_groups: vec![property_group(2, "Color", &[(10, "Red"), (11, "Blue")])],
    }
}
