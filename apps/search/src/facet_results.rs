//! Facet result builders shared by both backends.
//!
//! Backends differ in how they find candidate ids and bounds; once those are
//! resolved into structs, results are shaped here.

use storefront_model::{
    BooleanFacetResult, Condition, FacetResult, FacetResultGroup, Manufacturer, PropertyGroup,
    RangeFacetResult, ValueListFacetResult, ValueListItem, ValueListStyle,
};

use crate::request::fields;

/// Manufacturer value list sorted case-insensitively by name; `None` when
/// there is nothing to offer
pub fn manufacturer_list(
    facet_name: &str,
    label: String,
    manufacturers: Vec<Manufacturer>,
    active_ids: &[i64],
) -> Option<FacetResult> {
    if manufacturers.is_empty() {
        return None;
    }

    let mut values: Vec<ValueListItem> = manufacturers
        .into_iter()
        .map(|m| ValueListItem::new(m.id, m.name, active_ids.contains(&m.id), m.attributes))
        .collect();
    values.sort_by(|a, b| {
        a.label
            .to_lowercase()
            .cmp(&b.label.to_lowercase())
            .then_with(|| a.id.cmp(&b.id))
    });

    Some(FacetResult::ValueList(ValueListFacetResult {
        facet_name: facet_name.to_string(),
        active: !active_ids.is_empty(),
        label,
        values,
        field_name: fields::MANUFACTURER.to_string(),
        style: ValueListStyle::Text,
    }))
}

/// One value list per property group, wrapped in a group result.
///
/// Groups whose options carry media render as media lists.
pub fn property_groups(
    facet_name: &str,
    label: String,
    groups: Vec<PropertyGroup>,
    active_ids: &[i64],
) -> Option<FacetResult> {
    let facet_results: Vec<FacetResult> = groups
        .into_iter()
        .filter(|group| group.filterable && !group.options.is_empty())
        .map(|group| {
            let style = if group.options.iter().any(|o| o.media.is_some()) {
                ValueListStyle::Media
            } else {
                ValueListStyle::Text
            };
            let values: Vec<ValueListItem> = group
                .options
                .into_iter()
                .map(|option| ValueListItem {
                    active: active_ids.contains(&option.id),
                    id: option.id,
                    label: option.name,
                    attributes: option.attributes,
                    media: option.media,
                })
                .collect();

            FacetResult::ValueList(ValueListFacetResult {
                facet_name: facet_name.to_string(),
                active: values.iter().any(|v| v.active),
                label: group.name,
                values,
                field_name: fields::PROPERTIES.to_string(),
                style,
            })
        })
        .collect();

    if facet_results.is_empty() {
        return None;
    }

    Some(FacetResult::Group(FacetResultGroup {
        facet_name: facet_name.to_string(),
        active: !active_ids.is_empty(),
        label,
        facet_results,
    }))
}

/// Price range; `None` when every product costs the same.
///
/// The selected bounds come from the active price condition and default to
/// the range itself.
pub fn price_range(
    facet_name: &str,
    label: String,
    min: f64,
    max: f64,
    active: &[Condition],
) -> Option<FacetResult> {
    if min >= max {
        return None;
    }

    let (active_min, active_max) = active
        .iter()
        .find_map(|condition| match condition {
            Condition::Price { min: lo, max: hi } => Some((lo.unwrap_or(min), hi.unwrap_or(max))),
            _ => None,
        })
        .unwrap_or((min, max));

    Some(FacetResult::Range(RangeFacetResult {
        facet_name: facet_name.to_string(),
        active: !active.is_empty(),
        label,
        min,
        max,
        active_min,
        active_max,
        min_field_name: fields::MIN_PRICE.to_string(),
        max_field_name: fields::MAX_PRICE.to_string(),
    }))
}

pub fn boolean(facet_name: &str, field_name: &str, label: String, active: bool) -> FacetResult {
    FacetResult::Boolean(BooleanFacetResult {
        facet_name: facet_name.to_string(),
        field_name: field_name.to_string(),
        active,
        label,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_model::{Media, PropertyOption};

    fn manufacturer(id: i64, name: &str) -> Manufacturer {
        Manufacturer {
            id,
            name: name.to_string(),
            description: None,
            link: None,
            cover: None,
            attributes: Default::default(),
        }
    }

    #[test]
    fn manufacturers_sort_case_insensitively() {
        let result = manufacturer_list(
            "manufacturer",
            "Manufacturer".to_string(),
            vec![
                manufacturer(1, "zeta"),
                manufacturer(2, "Alpha"),
                manufacturer(3, "beta"),
            ],
            &[3],
        )
        .unwrap();
        let list = result.as_value_list().unwrap();

        let labels: Vec<&str> = list.values.iter().map(|v| v.label.as_str()).collect();
        assert_eq!(labels, vec!["Alpha", "beta", "zeta"]);
        assert!(list.values[1].active);
        assert!(list.active);
    }

    #[test]
    fn no_manufacturers_no_facet() {
        assert!(manufacturer_list("manufacturer", String::new(), vec![], &[]).is_none());
    }

    #[test]
    fn property_groups_with_media_render_as_media_lists() {
        let option = |id: i64, media: Option<Media>| PropertyOption {
            id,
            name: format!("option {id}"),
            position: 0,
            media,
            attributes: Default::default(),
        };
        let swatch = Media {
            id: 9,
            name: "red".to_string(),
            extension: None,
            preview: None,
            media_type: None,
            file: None,
            description: None,
            thumbnails: vec![],
            attributes: Default::default(),
        };
        let groups = vec![
            PropertyGroup {
                id: 1,
                name: "Color".to_string(),
                filterable: true,
                options: vec![option(10, Some(swatch)), option(11, None)],
                attributes: Default::default(),
            },
            PropertyGroup {
                id: 2,
                name: "Size".to_string(),
                filterable: true,
                options: vec![option(20, None)],
                attributes: Default::default(),
            },
        ];

        let result = property_groups("property", "Properties".to_string(), groups, &[20]).unwrap();
        let group = result.as_group().unwrap();
        let color = group.facet_results[0].as_value_list().unwrap();
        let size = group.facet_results[1].as_value_list().unwrap();

        assert_eq!(color.style, ValueListStyle::Media);
        assert!(!color.active);
        assert_eq!(size.style, ValueListStyle::Text);
        assert!(size.active);
        assert_eq!(size.field_name, "properties");
    }

    #[test]
    fn flat_price_range_is_omitted() {
        assert!(price_range("price", String::new(), 10.0, 10.0, &[]).is_none());
    }

    #[test]
    fn active_price_bounds_fall_back_to_range() {
        let result = price_range(
            "price",
            "Price".to_string(),
            5.0,
            80.0,
            &[Condition::price(Some(20.0), None)],
        )
        .unwrap();
        let range = result.as_range().unwrap();
        assert_eq!((range.active_min, range.active_max), (20.0, 80.0));
        assert!(range.active);
    }
}
