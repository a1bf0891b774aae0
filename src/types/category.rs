use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::lenient::i32_from_number_or_string;

#[derive(Serialize, Debug, Clone, Copy, Eq, Hash, Deserialize, PartialEq, Ord, PartialOrd)]
pub struct CategoryId(#[serde(deserialize_with = "i32_from_number_or_string")] pub i32);

/// Category id `0` addresses every category at once in a quiz.
pub const ALL_CATEGORIES: CategoryId = CategoryId(0);

#[derive(Serialize, Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Category {
    pub id: CategoryId,
    #[serde(rename = "type")]
    pub kind: String,
}

/// `{id: name}` mapping handed to clients, ordered by id.
pub fn format_categories(categories: &[Category]) -> BTreeMap<i32, String> {
    categories
        .iter()
        .map(|category| (category.id.0, category.kind.clone()))
        .collect()
}

#[cfg(test)]
mod category_tests {
    use super::*;

    #[test]
    fn formats_categories_as_id_to_name() {
        let categories = vec![
            Category {
                id: CategoryId(2),
                kind: "Art".to_string(),
            },
            Category {
                id: CategoryId(1),
                kind: "Science".to_string(),
            },
        ];
        let formatted = format_categories(&categories);
        assert_eq!(
            serde_json::to_value(&formatted).unwrap(),
            serde_json::json!({"1": "Science", "2": "Art"})
        );
    }

    #[test]
    fn reads_category_type_field() {
        let category: Category = serde_json::from_str(r#"{"id": "6", "type": "Sports"}"#).unwrap();
        assert_eq!(category.id, CategoryId(6));
        assert_eq!(category.kind, "Sports");
    }
}
