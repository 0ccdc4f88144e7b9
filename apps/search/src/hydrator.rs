//! Struct hydration
//!
//! Turns raw JSON payloads (SQL rows rendered as JSON objects, Elasticsearch
//! `_source` documents) into storefront structs. Identity fields (`id`,
//! `name`) are mandatory; nested optional structs such as media are left out
//! when their key is absent or null.

use serde_json::{Map, Value as JsonValue};
use storefront_model::{
    Attribute, Attributes, Category, HydrationError, Manufacturer, Media, MediaThumbnail,
    PropertyGroup, PropertyOption, SearchProduct,
};

type Result<T> = std::result::Result<T, HydrationError>;

/// Builds storefront structs from raw payloads
#[derive(Debug, Clone, Copy, Default)]
pub struct StructHydrator;

impl StructHydrator {
    pub fn new() -> Self {
        Self
    }

    pub fn create_property_group(&self, data: &JsonValue) -> Result<PropertyGroup> {
        const ENTITY: &str = "property group";
        let map = object(data, ENTITY)?;

        let options = match map.get("options") {
            None | Some(JsonValue::Null) => Vec::new(),
            Some(JsonValue::Array(items)) => items
                .iter()
                .map(|item| self.create_property_option(item))
                .collect::<Result<Vec<_>>>()?,
            Some(_) => return Err(invalid(ENTITY, "options", "array")),
        };

        Ok(PropertyGroup {
            id: required_i64(map, "id", ENTITY)?,
            name: required_str(map, "name", ENTITY)?,
            filterable: optional_bool(map, "filterable", ENTITY)?.unwrap_or(true),
            options,
            attributes: self.attributes_of(map, ENTITY)?,
        })
    }

    pub fn create_property_option(&self, data: &JsonValue) -> Result<PropertyOption> {
        const ENTITY: &str = "property option";
        let map = object(data, ENTITY)?;

        Ok(PropertyOption {
            id: required_i64(map, "id", ENTITY)?,
            name: required_str(map, "name", ENTITY)?,
            position: position(map, ENTITY)?,
            media: self.nested_media(map, "media")?,
            attributes: self.attributes_of(map, ENTITY)?,
        })
    }

    pub fn create_media(&self, data: &JsonValue) -> Result<Media> {
        const ENTITY: &str = "media";
        let map = object(data, ENTITY)?;

        let thumbnails = match map.get("thumbnails") {
            None | Some(JsonValue::Null) => Vec::new(),
            Some(JsonValue::Array(items)) => items
                .iter()
                .map(|item| self.create_thumbnail(item))
                .collect::<Result<Vec<_>>>()?,
            Some(_) => return Err(invalid(ENTITY, "thumbnails", "array")),
        };

        Ok(Media {
            id: required_i64(map, "id", ENTITY)?,
            name: required_str(map, "name", ENTITY)?,
            extension: optional_str(map, "extension", ENTITY)?,
            preview: optional_str(map, "preview", ENTITY)?,
            media_type: optional_str(map, "type", ENTITY)?,
            file: optional_str(map, "file", ENTITY)?,
            description: optional_str(map, "description", ENTITY)?,
            thumbnails,
            attributes: self.attributes_of(map, ENTITY)?,
        })
    }

    pub fn create_thumbnail(&self, data: &JsonValue) -> Result<MediaThumbnail> {
        const ENTITY: &str = "media thumbnail";
        let map = object(data, ENTITY)?;

        Ok(MediaThumbnail {
            source: required_str(map, "source", ENTITY)?,
            retina_source: optional_str(map, "retinaSource", ENTITY)?,
            max_width: dimension(map, "maxWidth", ENTITY)?,
            max_height: dimension(map, "maxHeight", ENTITY)?,
            attributes: self.attributes_of(map, ENTITY)?,
        })
    }

    /// Every key of an `attributes` object becomes one attribute, value kept as is.
    pub fn create_attributes(&self, data: &JsonValue) -> Result<Attributes> {
        match data {
            JsonValue::Null => Ok(Attributes::new()),
            JsonValue::Object(map) => Ok(map
                .iter()
                .map(|(key, value)| (key.clone(), Attribute::new(value.clone())))
                .collect()),
            _ => Err(invalid("attributes", "attributes", "object")),
        }
    }

    pub fn create_manufacturer(&self, data: &JsonValue) -> Result<Manufacturer> {
        const ENTITY: &str = "manufacturer";
        let map = object(data, ENTITY)?;

        Ok(Manufacturer {
            id: required_i64(map, "id", ENTITY)?,
            name: required_str(map, "name", ENTITY)?,
            description: optional_str(map, "description", ENTITY)?,
            link: optional_str(map, "link", ENTITY)?,
            cover: self.nested_media(map, "cover")?,
            attributes: self.attributes_of(map, ENTITY)?,
        })
    }

    pub fn create_category(&self, data: &JsonValue) -> Result<Category> {
        const ENTITY: &str = "category";
        let map = object(data, ENTITY)?;

        Ok(Category {
            id: required_i64(map, "id", ENTITY)?,
            parent_id: optional_i64(map, "parentId", ENTITY)?,
            name: required_str(map, "name", ENTITY)?,
            position: position(map, ENTITY)?,
            path: category_path(map, ENTITY)?,
            media: self.nested_media(map, "media")?,
            attributes: self.attributes_of(map, ENTITY)?,
        })
    }

    pub fn create_search_product(&self, data: &JsonValue) -> Result<SearchProduct> {
        const ENTITY: &str = "product";
        let map = object(data, ENTITY)?;

        Ok(SearchProduct {
            id: required_i64(map, "id", ENTITY)?,
            variant_id: required_i64(map, "variantId", ENTITY)?,
            number: required_str(map, "number", ENTITY)?,
            attributes: self.attributes_of(map, ENTITY)?,
        })
    }

    fn nested_media(&self, map: &Map<String, JsonValue>, key: &str) -> Result<Option<Media>> {
        match map.get(key) {
            None | Some(JsonValue::Null) => Ok(None),
            Some(media) => self.create_media(media).map(Some),
        }
    }

    fn attributes_of(&self, map: &Map<String, JsonValue>, entity: &'static str) -> Result<Attributes> {
        match map.get("attributes") {
            None => Ok(Attributes::new()),
            Some(data) => self
                .create_attributes(data)
                .map_err(|_| invalid(entity, "attributes", "object")),
        }
    }
}

fn object<'a>(data: &'a JsonValue, entity: &'static str) -> Result<&'a Map<String, JsonValue>> {
    data.as_object()
        .ok_or(HydrationError::NotAnObject { entity })
}

fn missing(entity: &'static str, field: &str) -> HydrationError {
    HydrationError::MissingField {
        entity,
        field: field.to_string(),
    }
}

fn invalid(entity: &'static str, field: &str, expected: &'static str) -> HydrationError {
    HydrationError::InvalidType {
        entity,
        field: field.to_string(),
        expected,
    }
}

/// Integers may arrive as JSON numbers or numeric strings (terms aggregation keys).
pub(crate) fn json_i64(value: &JsonValue) -> Option<i64> {
    match value {
        JsonValue::Number(n) => n.as_i64(),
        JsonValue::String(s) => s.parse().ok(),
        _ => None,
    }
}

/// Aggregated values, which Postgres may render as numeric strings
pub(crate) fn json_f64(value: &JsonValue) -> Option<f64> {
    match value {
        JsonValue::Number(n) => n.as_f64(),
        JsonValue::String(s) => s.parse().ok(),
        _ => None,
    }
}

fn required_i64(map: &Map<String, JsonValue>, field: &str, entity: &'static str) -> Result<i64> {
    match map.get(field) {
        None | Some(JsonValue::Null) => Err(missing(entity, field)),
        Some(value) => json_i64(value).ok_or_else(|| invalid(entity, field, "integer")),
    }
}

fn optional_i64(
    map: &Map<String, JsonValue>,
    field: &str,
    entity: &'static str,
) -> Result<Option<i64>> {
    match map.get(field) {
        None | Some(JsonValue::Null) => Ok(None),
        Some(value) => json_i64(value)
            .map(Some)
            .ok_or_else(|| invalid(entity, field, "integer")),
    }
}

fn required_str(map: &Map<String, JsonValue>, field: &str, entity: &'static str) -> Result<String> {
    match map.get(field) {
        None | Some(JsonValue::Null) => Err(missing(entity, field)),
        Some(JsonValue::String(s)) => Ok(s.clone()),
        Some(JsonValue::Number(n)) => Ok(n.to_string()),
        Some(_) => Err(invalid(entity, field, "string")),
    }
}

fn optional_str(
    map: &Map<String, JsonValue>,
    field: &str,
    entity: &'static str,
) -> Result<Option<String>> {
    match map.get(field) {
        None | Some(JsonValue::Null) => Ok(None),
        Some(JsonValue::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(invalid(entity, field, "string")),
    }
}

fn optional_bool(
    map: &Map<String, JsonValue>,
    field: &str,
    entity: &'static str,
) -> Result<Option<bool>> {
    match map.get(field) {
        None | Some(JsonValue::Null) => Ok(None),
        Some(JsonValue::Bool(b)) => Ok(Some(*b)),
        Some(JsonValue::Number(n)) => Ok(Some(n.as_i64().unwrap_or(0) != 0)),
        Some(_) => Err(invalid(entity, field, "boolean")),
    }
}

fn dimension(map: &Map<String, JsonValue>, field: &str, entity: &'static str) -> Result<u32> {
    let value = required_i64(map, field, entity)?;
    u32::try_from(value).map_err(|_| invalid(entity, field, "non-negative integer"))
}

/// Sort position, 0 when absent
fn position(map: &Map<String, JsonValue>, entity: &'static str) -> Result<i32> {
    let value = optional_i64(map, "position", entity)?.unwrap_or(0);
    i32::try_from(value).map_err(|_| invalid(entity, "position", "32-bit integer"))
}

/// Accepts an id array or a pipe-delimited string such as `|5|3|1|`.
fn category_path(map: &Map<String, JsonValue>, entity: &'static str) -> Result<Vec<i64>> {
    match map.get("path") {
        None | Some(JsonValue::Null) => Ok(Vec::new()),
        Some(JsonValue::Array(items)) => items
            .iter()
            .map(|v| json_i64(v).ok_or_else(|| invalid(entity, "path", "integer array")))
            .collect(),
        Some(JsonValue::String(s)) => s
            .split('|')
            .filter(|part| !part.is_empty())
            .map(|part| {
                part.parse()
                    .map_err(|_| invalid(entity, "path", "pipe-delimited ids"))
            })
            .collect(),
        Some(_) => Err(invalid(entity, "path", "integer array")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn media_payload() -> JsonValue {
        json!({
            "id": 9,
            "name": "red",
            "extension": "png",
            "type": "IMAGE",
            "file": "media/image/red.png",
            "thumbnails": [
                {"source": "red_200x200.png", "retinaSource": "red_200x200@2x.png", "maxWidth": 200, "maxHeight": 200}
            ],
            "attributes": {"core": {"alt": "Red"}}
        })
    }

    #[test]
    fn property_group_embeds_options_and_media() {
        let group = StructHydrator::new()
            .create_property_group(&json!({
                "id": 1,
                "name": "Color",
                "filterable": 1,
                "options": [
                    {"id": 10, "name": "Red", "position": 2, "media": media_payload()},
                    {"id": 11, "name": "Blue", "position": 1, "media": null}
                ],
                "attributes": {"flag": true, "score": 4.5}
            }))
            .unwrap();

        assert!(group.filterable);
        assert_eq!(group.options.len(), 2);
        assert_eq!(group.options[0].media.as_ref().unwrap().thumbnails[0].max_width, 200);
        assert!(group.options[1].media.is_none());
        assert_eq!(group.attributes["flag"].value(), &json!(true));
        assert_eq!(group.attributes["score"].value(), &json!(4.5));
    }

    #[test]
    fn missing_identity_field_is_named() {
        let err = StructHydrator::new()
            .create_property_option(&json!({"id": 3, "position": 1}))
            .unwrap_err();

        assert_eq!(
            err,
            HydrationError::MissingField {
                entity: "property option",
                field: "name".to_string()
            }
        );
    }

    #[test]
    fn media_without_thumbnails_hydrates() {
        let media = StructHydrator::new()
            .create_media(&json!({"id": 2, "name": "logo"}))
            .unwrap();
        assert!(media.thumbnails.is_empty());
        assert!(media.attributes.is_empty());
        assert_eq!(media.extension, None);
    }

    #[test]
    fn thumbnail_requires_dimensions() {
        let err = StructHydrator::new()
            .create_thumbnail(&json!({"source": "a.png", "maxWidth": 10}))
            .unwrap_err();
        assert!(err.to_string().contains("maxHeight"));
    }

    #[test]
    fn category_path_accepts_pipe_delimited_string() {
        let category = StructHydrator::new()
            .create_category(&json!({"id": 7, "parentId": 5, "name": "Shoes", "path": "|5|3|1|"}))
            .unwrap();
        assert_eq!(category.path, vec![5, 3, 1]);
        assert_eq!(category.parent_id, Some(5));
    }

    #[test]
    fn ids_may_be_numeric_strings() {
        let manufacturer = StructHydrator::new()
            .create_manufacturer(&json!({"id": "42", "name": "Acme"}))
            .unwrap();
        assert_eq!(manufacturer.id, 42);
        assert!(manufacturer.cover.is_none());
    }

    #[test]
    fn non_object_attributes_are_rejected() {
        let err = StructHydrator::new()
            .create_media(&json!({"id": 1, "name": "x", "attributes": [1, 2]}))
            .unwrap_err();
        assert!(matches!(err, HydrationError::InvalidType { .. }));
    }

    #[test]
    fn out_of_range_position_is_rejected() {
        let hydrator = StructHydrator::new();
        let err = hydrator
            .create_category(&json!({"id": 5, "name": "Clothing", "position": 4_294_967_297_i64}))
            .unwrap_err();
        assert!(matches!(
            err,
            HydrationError::InvalidType { ref field, .. } if field == "position"
        ));

        let option = hydrator
            .create_property_option(&json!({"id": 10, "name": "Red", "position": -3}))
            .unwrap();
        assert_eq!(option.position, -3);
        assert!(hydrator
            .create_property_option(&json!({"id": 10, "name": "Red", "position": i64::MAX}))
            .is_err());
    }

    #[test]
    fn aggregated_numbers_may_be_strings() {
        assert_eq!(json_f64(&json!("12.5")), Some(12.5));
        assert_eq!(json_f64(&json!(null)), None);
        assert_eq!(json_i64(&json!("42")), Some(42));
    }
}
