use crate::models::{
    CategoriesOverview, Category, CategoryType, CreateCategoryRequest, RawCreateCategoryRequest, TypeCount,
};
use crate::repository::CategoryRepository;
use database::{Database, RepositoryError};
use tracing::instrument;
use validator::Validate;

#[derive(Debug, thiserror::Error)]
pub enum CategoryError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Storage error: {0}")]
    Infrastructure(String),
    #[error("Category already exists: {0}")]
    Conflict(String),
    #[error("Category not found")]
    NotFound,
}

impl From<RepositoryError> for CategoryError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => CategoryError::NotFound,
            RepositoryError::UniqueViolation(msg) => CategoryError::Conflict(msg),
            other => CategoryError::Infrastructure(other.to_string()),
        }
    }
}

pub struct CategoryService;

impl CategoryService {
    #[instrument(skip(db))]
    pub async fn overview(db: &Database, filter: CategoryType) -> Result<CategoriesOverview, CategoryError> {
        let view = db.read().await?;
        let repo = CategoryRepository::new(view.connection());

        let all = repo.list()?;
        let counts = CategoryType::ALL
            .iter()
            .map(|&kind| TypeCount {
                kind,
                count: all.iter().filter(|c| c.kind == kind).count(),
            })
            .collect();
        let categories = all.into_iter().filter(|c| c.kind == filter).collect();

        Ok(CategoriesOverview {
            active: filter,
            categories,
            counts,
        })
    }

    #[instrument(skip(db))]
    pub async fn create_category(db: &Database, raw: RawCreateCategoryRequest) -> Result<Category, CategoryError> {
        raw.validate()
            .map_err(|e| CategoryError::InvalidInput(e.to_string()))?;
        let req = CreateCategoryRequest::new(raw.name, raw.kind)
            .map_err(CategoryError::InvalidInput)?;

        let mut uow = db.begin().await?;
        let mut repo = CategoryRepository::new(uow.connection());

        let id = repo.create(&req)?;
        let category = repo.find_by_id(&id)?
            .ok_or(CategoryError::NotFound)?;

        uow.commit().await?;
        tracing::info!(slug = %category.slug, "Created category");

        Ok(category)
    }

    #[instrument(skip(db))]
    pub async fn delete_category(db: &Database, id: &str) -> Result<(), CategoryError> {
        let mut uow = db.begin().await?;
        let mut repo = CategoryRepository::new(uow.connection());

        repo.delete(id)?;

        uow.commit().await?;
        Ok(())
    }

    #[instrument(skip(db))]
    pub async fn get_by_slug(db: &Database, slug: &str) -> Result<Category, CategoryError> {
        let view = db.read().await?;
        let repo = CategoryRepository::new(view.connection());

        let category = repo.find_by_slug(slug)?
            .ok_or(CategoryError::NotFound)?;

        Ok(category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use database::get_test_db;

    fn raw(name: &str, kind: CategoryType) -> RawCreateCategoryRequest {
        RawCreateCategoryRequest { name: name.to_string(), kind }
    }

    #[tokio::test]
    async fn test_overview_counts_every_type() {
        let db = get_test_db().await;
        let overview = CategoryService::overview(&db, CategoryType::Income).await.unwrap();

        let names: Vec<&str> = overview.categories.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Salary", "Freelance"]);

        let counts: Vec<usize> = overview.counts.iter().map(|c| c.count).collect();
        assert_eq!(counts, vec![6, 2, 1]);
    }

    #[tokio::test]
    async fn test_create_category_is_listed() {
        let db = get_test_db().await;
        let created = CategoryService::create_category(&db, raw("Gifts", CategoryType::Other)).await.unwrap();
        assert_eq!(created.slug, "gifts");

        let overview = CategoryService::overview(&db, CategoryType::Other).await.unwrap();
        assert_eq!(overview.categories.len(), 2);
        assert_eq!(overview.counts[2].count, 2);
    }

    #[tokio::test]
    async fn test_create_category_conflict() {
        let db = get_test_db().await;
        let err = CategoryService::create_category(&db, raw("Salary", CategoryType::Income)).await;
        assert!(matches!(err, Err(CategoryError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_create_category_blank_name() {
        let db = get_test_db().await;
        let err = CategoryService::create_category(&db, raw("   ", CategoryType::Income)).await;
        assert!(matches!(err, Err(CategoryError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_delete_and_lookup() {
        let db = get_test_db().await;
        assert_eq!(CategoryService::get_by_slug(&db, "health").await.unwrap().id, "cat_3");

        CategoryService::delete_category(&db, "cat_3").await.unwrap();
        let err = CategoryService::get_by_slug(&db, "health").await;
        assert!(matches!(err, Err(CategoryError::NotFound)));
    }
}
