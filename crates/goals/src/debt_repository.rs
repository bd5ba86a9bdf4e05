use crate::models::{Debt, DebtType};
use database::{self, RepositoryError};
use serde::{Deserialize, Serialize};
use std::ops::{Deref, DerefMut};

const TABLE: &str = "debts";

#[derive(Serialize, Deserialize)]
struct DebtRecord {
    id: String,
    person_name: String,
    kind: DebtType,
    amount: f64,
    due_date: String,
    #[serde(default)]
    is_paid: bool,
}

impl From<DebtRecord> for Debt {
    fn from(record: DebtRecord) -> Self {
        Debt {
            id: record.id,
            person_name: record.person_name,
            kind: record.kind,
            amount: record.amount,
            due_date: record.due_date,
            is_paid: record.is_paid,
        }
    }
}

pub(crate) struct DebtRepository<C> {
    conn: C,
}

impl<C: Deref<Target = database::Connection>> DebtRepository<C> {
    pub fn new(conn: C) -> Self {
        Self { conn }
    }

    pub fn list(&self) -> Result<Vec<Debt>, RepositoryError> {
        let records: Vec<DebtRecord> = self.conn.select(TABLE)?;
        Ok(records.into_iter().map(|r| r.into()).collect())
    }

    pub fn find_by_id(&self, id: &str) -> Result<Option<Debt>, RepositoryError> {
        let record: Option<DebtRecord> = self.conn.find(TABLE, id)?;
        Ok(record.map(|r| r.into()))
    }
}

impl<C: DerefMut<Target = database::Connection>> DebtRepository<C> {
    pub fn create(
        &mut self,
        person_name: &str,
        kind: DebtType,
        amount: f64,
        due_date: &str,
    ) -> Result<String, RepositoryError> {
        let id = self.conn.next_id();
        self.conn.insert(
            TABLE,
            &DebtRecord {
                id: id.clone(),
                person_name: person_name.to_string(),
                kind,
                amount,
                due_date: due_date.to_string(),
                is_paid: false,
            },
        )?;

        Ok(id)
    }

    /// Fails with `CheckViolation` when the debt is already settled.
    pub fn mark_paid(&mut self, id: &str) -> Result<Debt, RepositoryError> {
        let debt = self.find_by_id(id)?.ok_or(RepositoryError::NotFound)?;
        if debt.is_paid {
            return Err(RepositoryError::CheckViolation(format!("debt {id} is already paid")));
        }

        let record = DebtRecord {
            id: debt.id,
            person_name: debt.person_name,
            kind: debt.kind,
            amount: debt.amount,
            due_date: debt.due_date,
            is_paid: true,
        };
        self.conn.update(TABLE, id, &record)?;

        Ok(record.into())
    }

    pub fn delete(&mut self, id: &str) -> Result<(), RepositoryError> {
        self.conn.delete(TABLE, id)
    }
}
