use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Map, Value as JsonValue};
use storefront_model::{Category, Manufacturer, PropertyGroup, ShopContext, SortDirection};

use super::{CategoryService, ManufacturerService, PropertyService};
use crate::dbal::{DbalConnection, SqlQuery};
use crate::error::{Error, Result};
use crate::hydrator::StructHydrator;

/// JSON object of a joined media row, or NULL when the join found nothing
fn media_json(alias: &str) -> String {
    format!(
        "CASE WHEN {a}.id IS NULL THEN NULL ELSE json_build_object('id', {a}.id, 'name', {a}.name, 'extension', {a}.extension, 'type', {a}.type, 'file', {a}.file, 'description', {a}.description, 'attributes', {a}.attributes) END",
        a = alias
    )
}

pub struct DbalCategoryService {
    connection: Arc<dyn DbalConnection>,
    hydrator: StructHydrator,
}

impl DbalCategoryService {
    pub fn new(connection: Arc<dyn DbalConnection>) -> Self {
        Self {
            connection,
            hydrator: StructHydrator::new(),
        }
    }
}

#[async_trait]
impl CategoryService for DbalCategoryService {
    async fn get_list(&self, ids: &[i64], _context: &ShopContext) -> Result<Vec<Category>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut query = SqlQuery::new("category", "category");
        query
            .select([
                ("id", "category.id".to_string()),
                ("parentId", "category.parent_id".to_string()),
                ("name", "category.name".to_string()),
                ("position", "category.position".to_string()),
                ("path", "category.path".to_string()),
                ("attributes", "category.attributes".to_string()),
                ("media", media_json("media")),
            ])
            .left_join("media", "media", "media.id = category.media_id");
        let idx = query.bind_int_array(ids.to_vec());
        query
            .and_where(format!("category.id = ANY(${}::bigint[])", idx))
            .and_where("category.active = TRUE")
            .add_order_by("category.position", SortDirection::Asc)
            .add_order_by("category.id", SortDirection::Asc);

        let rows = self.connection.fetch_rows(&query).await?;
        let categories = rows
            .iter()
            .map(|row| self.hydrator.create_category(row))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(categories)
    }
}

pub struct DbalManufacturerService {
    connection: Arc<dyn DbalConnection>,
    hydrator: StructHydrator,
}

impl DbalManufacturerService {
    pub fn new(connection: Arc<dyn DbalConnection>) -> Self {
        Self {
            connection,
            hydrator: StructHydrator::new(),
        }
    }
}

#[async_trait]
impl ManufacturerService for DbalManufacturerService {
    async fn get_list(&self, ids: &[i64], _context: &ShopContext) -> Result<Vec<Manufacturer>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut query = SqlQuery::new("manufacturer", "manufacturer");
        query
            .select([
                ("id", "manufacturer.id".to_string()),
                ("name", "manufacturer.name".to_string()),
                ("description", "manufacturer.description".to_string()),
                ("link", "manufacturer.link".to_string()),
                ("attributes", "manufacturer.attributes".to_string()),
                ("cover", media_json("cover")),
            ])
            .left_join("media", "cover", "cover.id = manufacturer.media_id");
        let idx = query.bind_int_array(ids.to_vec());
        query.and_where(format!("manufacturer.id = ANY(${}::bigint[])", idx));

        let rows = self.connection.fetch_rows(&query).await?;
        let manufacturers = rows
            .iter()
            .map(|row| self.hydrator.create_manufacturer(row))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(manufacturers)
    }
}

pub struct DbalPropertyService {
    connection: Arc<dyn DbalConnection>,
    hydrator: StructHydrator,
}

impl DbalPropertyService {
    pub fn new(connection: Arc<dyn DbalConnection>) -> Self {
        Self {
            connection,
            hydrator: StructHydrator::new(),
        }
    }
}

#[async_trait]
impl PropertyService for DbalPropertyService {
    async fn get_list(
        &self,
        option_ids: &[i64],
        _context: &ShopContext,
    ) -> Result<Vec<PropertyGroup>> {
        if option_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut query = SqlQuery::new("property_option", "opt");
        query
            .select([
                ("id", "opt.id".to_string()),
                ("name", "opt.name".to_string()),
                ("position", "opt.position".to_string()),
                ("attributes", "opt.attributes".to_string()),
                ("media", media_json("media")),
                ("groupId", "grp.id".to_string()),
                ("groupName", "grp.name".to_string()),
                ("groupFilterable", "grp.filterable".to_string()),
                ("groupAttributes", "grp.attributes".to_string()),
            ])
            .inner_join("property_group", "grp", "grp.id = opt.group_id")
            .left_join("media", "media", "media.id = opt.media_id");
        let idx = query.bind_int_array(option_ids.to_vec());
        query
            .and_where(format!("opt.id = ANY(${}::bigint[])", idx))
            .and_where("grp.filterable = TRUE")
            .add_order_by("grp.position", SortDirection::Asc)
            .add_order_by("grp.id", SortDirection::Asc)
            .add_order_by("opt.position", SortDirection::Asc)
            .add_order_by("opt.id", SortDirection::Asc);

        let rows = self.connection.fetch_rows(&query).await?;
        group_option_rows(&rows)
            .iter()
            .map(|group| {
                self.hydrator
                    .create_property_group(group)
                    .map_err(Error::from)
            })
            .collect()
    }
}

/// Folds flat option rows into one group payload per `groupId`, keeping
/// row order
fn group_option_rows(rows: &[JsonValue]) -> Vec<JsonValue> {
    let mut groups: Vec<(JsonValue, Map<String, JsonValue>)> = Vec::new();

    for row in rows {
        let group_id = row.get("groupId").cloned().unwrap_or(JsonValue::Null);
        let mut option = Map::new();
        for key in ["id", "name", "position", "attributes", "media"] {
            if let Some(value) = row.get(key) {
                option.insert(key.to_string(), value.clone());
            }
        }

        match groups.iter_mut().find(|(id, _)| *id == group_id) {
            Some((_, group)) => {
                if let Some(JsonValue::Array(options)) = group.get_mut("options") {
                    options.push(JsonValue::Object(option));
                }
            }
            None => {
                let group = json!({
                    "id": group_id.clone(),
                    "name": row.get("groupName").cloned().unwrap_or(JsonValue::Null),
                    "filterable": row.get("groupFilterable").cloned().unwrap_or(JsonValue::Null),
                    "attributes": row.get("groupAttributes").cloned().unwrap_or(JsonValue::Null),
                    "options": [JsonValue::Object(option)],
                });
                if let JsonValue::Object(group) = group {
                    groups.push((group_id, group));
                }
            }
        }
    }

    groups
        .into_iter()
        .map(|(_, group)| JsonValue::Object(group))
        .collect()
}
