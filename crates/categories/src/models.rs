use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CategoryType {
    #[default]
    Expense,
    Income,
    Other,
}

impl CategoryType {
    pub const ALL: [CategoryType; 3] = [CategoryType::Expense, CategoryType::Income, CategoryType::Other];
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub operations_count: u32,
    pub total_amount: f64,
    pub kind: CategoryType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TypeCount {
    pub kind: CategoryType,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct CategoriesOverview {
    pub active: CategoryType,
    pub categories: Vec<Category>,
    pub counts: Vec<TypeCount>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RawCreateCategoryRequest {
    #[validate(length(min = 1, max = 64))]
    pub name: String,
    pub kind: CategoryType,
}

#[derive(Debug, Serialize)]
pub struct CreateCategoryRequest {
    pub name: String,
    pub slug: String,
    pub kind: CategoryType,
}

impl CreateCategoryRequest {
    pub fn new(name: String, kind: CategoryType) -> Result<Self, String> {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err("Category name cannot be empty".to_string());
        }

        let slug = slugify(&name);
        if slug.is_empty() {
            return Err("Category name must contain a letter or digit".to_string());
        }

        Ok(Self { name, slug, kind })
    }
}

/// Lowercase alphanumeric runs joined by single dashes.
pub fn slugify(name: &str) -> String {
    name.split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}
