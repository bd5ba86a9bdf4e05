use crate::models::{Category, CategoryType, CreateCategoryRequest};
use database::{self, RepositoryError};
use serde::{Deserialize, Serialize};
use std::ops::{Deref, DerefMut};

const TABLE: &str = "categories";

#[derive(Serialize, Deserialize)]
struct CategoryRecord {
    id: String,
    name: String,
    slug: String,
    #[serde(default)]
    operations_count: u32,
    #[serde(default)]
    total_amount: f64,
    kind: CategoryType,
}

impl From<CategoryRecord> for Category {
    fn from(record: CategoryRecord) -> Self {
        Category {
            id: record.id,
            name: record.name,
            slug: record.slug,
            operations_count: record.operations_count,
            total_amount: record.total_amount,
            kind: record.kind,
        }
    }
}

pub(crate) struct CategoryRepository<C> {
    conn: C,
}

impl<C: Deref<Target = database::Connection>> CategoryRepository<C> {
    pub fn new(conn: C) -> Self {
        Self { conn }
    }

    pub fn list(&self) -> Result<Vec<Category>, RepositoryError> {
        let records: Vec<CategoryRecord> = self.conn.select(TABLE)?;
        Ok(records.into_iter().map(|r| r.into()).collect())
    }

    pub fn find_by_id(&self, id: &str) -> Result<Option<Category>, RepositoryError> {
        let record: Option<CategoryRecord> = self.conn.find(TABLE, id)?;
        Ok(record.map(|r| r.into()))
    }

    pub fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepositoryError> {
        Ok(self.list()?.into_iter().find(|c| c.slug == slug))
    }
}

impl<C: DerefMut<Target = database::Connection>> CategoryRepository<C> {
    pub fn create(&mut self, req: &CreateCategoryRequest) -> Result<String, RepositoryError> {
        if self.find_by_slug(&req.slug)?.is_some() {
            return Err(RepositoryError::UniqueViolation(format!("categories.slug = {}", req.slug)));
        }

        let id = format!("cat_{}", self.conn.next_id());
        self.conn.insert(
            TABLE,
            &CategoryRecord {
                id: id.clone(),
                name: req.name.clone(),
                slug: req.slug.clone(),
                operations_count: 0,
                total_amount: 0.0,
                kind: req.kind,
            },
        )?;

        Ok(id)
    }

    pub fn delete(&mut self, id: &str) -> Result<(), RepositoryError> {
        self.conn.delete(TABLE, id)
    }
}
