use std::collections::HashMap;

use storefront_model::{Category, TreeFacetResult, TreeItem};

use crate::request::fields;

/// Depth of categories relative to a root category.
///
/// A category's `path` lists its ancestors nearest first, so a direct child
/// of the root has the root at position 0.
pub struct CategoryDepth;

impl CategoryDepth {
    /// Levels between `root_id` and `category`; `None` when the category is
    /// not below the root
    pub fn level_below(root_id: i64, category: &Category) -> Option<usize> {
        category
            .path
            .iter()
            .position(|id| *id == root_id)
            .map(|position| position + 1)
    }

    /// Categories at most `depth` levels below `root_id`, in input order
    pub fn filter(root_id: i64, depth: u32, categories: Vec<Category>) -> Vec<Category> {
        let depth = depth.max(1) as usize;
        categories
            .into_iter()
            .filter(|category| {
                Self::level_below(root_id, category).is_some_and(|level| level <= depth)
            })
            .collect()
    }
}

/// Shapes categories into a tree facet rooted below the shop's system
/// category
pub struct CategoryTreeBuilder;

impl CategoryTreeBuilder {
    /// `None` when no category hangs directly below `root_id`
    pub fn build(
        facet_name: &str,
        label: String,
        categories: &[Category],
        active_ids: &[i64],
        root_id: i64,
    ) -> Option<TreeFacetResult> {
        let mut children: HashMap<i64, Vec<&Category>> = HashMap::new();
        for category in categories {
            if let Some(parent_id) = category.parent_id {
                children.entry(parent_id).or_default().push(category);
            }
        }
        for siblings in children.values_mut() {
            siblings.sort_by(|a, b| {
                a.position
                    .cmp(&b.position)
                    .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
                    .then_with(|| a.id.cmp(&b.id))
            });
        }

        let values = Self::items(root_id, &children, active_ids, categories.len());
        if values.is_empty() {
            return None;
        }

        Some(TreeFacetResult {
            facet_name: facet_name.to_string(),
            field_name: fields::CATEGORY_FILTER.to_string(),
            active: !active_ids.is_empty(),
            label,
            values,
        })
    }

    fn items(
        parent_id: i64,
        children: &HashMap<i64, Vec<&Category>>,
        active_ids: &[i64],
        remaining_levels: usize,
    ) -> Vec<TreeItem> {
        if remaining_levels == 0 {
            return Vec::new();
        }
        children
            .get(&parent_id)
            .map(|siblings| {
                siblings
                    .iter()
                    .map(|category| TreeItem {
                        id: category.id,
                        label: category.name.clone(),
                        active: active_ids.contains(&category.id),
                        values: Self::items(
                            category.id,
                            children,
                            active_ids,
                            remaining_levels - 1,
                        ),
                        attributes: category.attributes.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}
