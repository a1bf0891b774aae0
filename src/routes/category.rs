use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use tracing::{Level, event, instrument};

use crate::store::Store;
use crate::types::category::{CategoryId, format_categories};
use crate::types::pagination::extract_pagination;
use crate::types::question::Question;

#[derive(Serialize, Debug)]
struct CategoriesResponse {
    success: bool,
    categories: BTreeMap<i32, String>,
    total_categories: usize,
}

#[derive(Serialize, Debug)]
struct CategoryQuestionsResponse {
    success: bool,
    questions: Vec<Question>,
    total_questions: i64,
    current_category: String,
}

#[instrument(skip(store))]
pub async fn get_categories(store: Store) -> Result<impl warp::Reply, warp::Rejection> {
    event!(target: "trivia_api", Level::INFO, "querying categories");
    match store.get_categories().await {
        Ok(categories) => {
            let categories = format_categories(&categories);
            Ok(warp::reply::json(&CategoriesResponse {
                success: true,
                total_categories: categories.len(),
                categories,
            }))
        }
        Err(e) => Err(warp::reject::custom(e)),
    }
}

#[instrument(skip(store))]
pub async fn get_category_questions(
    id: i32,
    params: HashMap<String, String>,
    store: Store,
) -> Result<impl warp::Reply, warp::Rejection> {
    let pagination = extract_pagination(&params).map_err(warp::reject::custom)?;
    let category = match store.get_category(CategoryId(id)).await {
        Ok(category) => category,
        Err(e) => return Err(warp::reject::custom(e)),
    };

    match store.get_category_questions(category.id, pagination).await {
        Ok(page) => Ok(warp::reply::json(&CategoryQuestionsResponse {
            success: true,
            questions: page.items,
            total_questions: page.total,
            current_category: category.kind,
        })),
        Err(e) => Err(warp::reject::custom(e)),
    }
}
