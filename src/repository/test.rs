use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, NaiveDateTime};

use crate::domain::category::{Category, CategoryDraft};
use crate::domain::types::{CategoryId, CategoryName};
use crate::repository::{
    CategoryListQuery, CategoryReader, CategoryWriter, RepositoryError, RepositoryResult,
    TransactionScope, Transactional,
};

/// Ordered log of store and mirror events shared by test doubles.
#[derive(Clone, Default)]
pub struct Journal(Arc<Mutex<Vec<String>>>);

impl Journal {
    pub fn record(&self, event: impl Into<String>) {
        self.0.lock().unwrap().push(event.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

#[derive(Clone, Default)]
struct TestState {
    categories: Vec<Category>,
    next_id: i32,
    clock: i64,
}

impl TestState {
    fn tick(&mut self) -> NaiveDateTime {
        self.clock += 1;
        DateTime::from_timestamp(self.clock, 0).unwrap().naive_utc()
    }

    fn live(&self, id: CategoryId) -> Option<&Category> {
        self.categories
            .iter()
            .find(|c| c.id == id && !c.is_deleted())
    }

    fn name_taken(&self, name: &CategoryName, except: Option<CategoryId>) -> bool {
        self.categories
            .iter()
            .any(|c| !c.is_deleted() && &c.name == name && Some(c.id) != except)
    }
}

/// Simple in-memory repository used for unit tests.
///
/// Transactions work on a copy of the state which replaces the shared state
/// on commit, so rollbacks leave nothing behind.
#[derive(Clone, Default)]
pub struct TestRepository {
    state: Arc<Mutex<TestState>>,
    journal: Journal,
}

impl TestRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_journal(mut self, journal: Journal) -> Self {
        self.journal = journal;
        self
    }

    /// Seed live categories, committed immediately.
    pub fn with_categories(self, names: &[&str]) -> Self {
        {
            let mut state = self.lock();
            for name in names {
                let now = state.tick();
                state.next_id += 1;
                let id = CategoryId::new(state.next_id).unwrap();
                state.categories.push(Category {
                    id,
                    name: CategoryName::new(*name).unwrap(),
                    created_at: now,
                    updated_at: now,
                    deleted_at: None,
                });
            }
        }
        self
    }

    /// Every stored row, deleted ones included.
    pub fn snapshot(&self) -> Vec<Category> {
        self.lock().categories.clone()
    }

    fn lock(&self) -> MutexGuard<'_, TestState> {
        self.state.lock().unwrap()
    }
}

impl CategoryReader for TestRepository {
    fn list_categories(
        &self,
        query: CategoryListQuery,
    ) -> RepositoryResult<(usize, Vec<Category>)> {
        let mut items: Vec<Category> = self
            .lock()
            .categories
            .iter()
            .filter(|c| !c.is_deleted())
            .cloned()
            .collect();
        items.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        let total = items.len();

        if let Some(pagination) = query.pagination {
            items = items
                .into_iter()
                .skip(pagination.offset())
                .take(pagination.per_page)
                .collect();
        }

        Ok((total, items))
    }

    fn get_category_by_id(&self, id: CategoryId) -> RepositoryResult<Option<Category>> {
        Ok(self.lock().live(id).cloned())
    }
}

impl Transactional for TestRepository {
    type Scope = TestTransaction;

    fn begin(&self) -> RepositoryResult<TestTransaction> {
        self.journal.record("begin");
        Ok(TestTransaction {
            working: self.lock().clone(),
            state: Arc::clone(&self.state),
            journal: self.journal.clone(),
            open: true,
        })
    }
}

pub struct TestTransaction {
    state: Arc<Mutex<TestState>>,
    working: TestState,
    journal: Journal,
    open: bool,
}

impl CategoryWriter for TestTransaction {
    fn find_category(&mut self, id: CategoryId) -> RepositoryResult<Option<Category>> {
        Ok(self.working.live(id).cloned())
    }

    fn save_category(&mut self, draft: &CategoryDraft) -> RepositoryResult<Category> {
        if self.working.name_taken(&draft.name, draft.id) {
            return Err(RepositoryError::ConstraintViolation(format!(
                "UNIQUE constraint failed: categories.name ({})",
                draft.name
            )));
        }

        let now = self.working.tick();
        let saved = match draft.id {
            None => {
                self.working.next_id += 1;
                let category = Category {
                    id: CategoryId::new(self.working.next_id).unwrap(),
                    name: draft.name.clone(),
                    created_at: now,
                    updated_at: now,
                    deleted_at: None,
                };
                self.working.categories.push(category.clone());
                category
            }
            Some(id) => {
                let category = self
                    .working
                    .categories
                    .iter_mut()
                    .find(|c| c.id == id && !c.is_deleted())
                    .ok_or(RepositoryError::NotFound)?;
                category.name = draft.name.clone();
                category.updated_at = now;
                category.clone()
            }
        };

        self.journal.record("save");
        Ok(saved)
    }

    fn delete_category(&mut self, id: CategoryId) -> RepositoryResult<Category> {
        let now = self.working.tick();
        let category = self
            .working
            .categories
            .iter_mut()
            .find(|c| c.id == id && !c.is_deleted())
            .ok_or(RepositoryError::NotFound)?;
        category.deleted_at = Some(now);

        self.journal.record("delete");
        Ok(category.clone())
    }
}

impl TransactionScope for TestTransaction {
    fn commit(mut self) -> RepositoryResult<()> {
        self.open = false;
        *self.state.lock().unwrap() = std::mem::take(&mut self.working);
        self.journal.record("commit");
        Ok(())
    }

    fn rollback(mut self) -> RepositoryResult<()> {
        self.open = false;
        self.journal.record("rollback");
        Ok(())
    }
}

impl Drop for TestTransaction {
    fn drop(&mut self) {
        if self.open {
            self.journal.record("rollback");
        }
    }
}
