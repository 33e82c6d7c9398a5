use crate::db::{DbConnection, DbPool};
use crate::domain::category::{Category, CategoryDraft};
use crate::domain::types::CategoryId;
use crate::pagination::Pagination;

pub mod category;
pub mod errors;
#[cfg(any(test, feature = "test-support"))]
pub mod test;

pub use errors::{RepositoryError, RepositoryResult};

/// Repository implementation backed by Diesel and SQLite.
///
/// The underlying `r2d2::Pool` is cheap to clone, allowing the repository to
/// be passed around freely between handlers.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool, // r2d2::Pool is cheap to clone
}

impl DieselRepository {
    /// Create a new repository from an established database pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get a pooled database connection.
    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// Query parameters for listing live categories.
#[derive(Debug, Clone, Copy, Default)]
pub struct CategoryListQuery {
    /// Pagination parameters. `None` returns every live category.
    pub pagination: Option<Pagination>,
}

impl CategoryListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn paginate(mut self, pagination: Pagination) -> Self {
        self.pagination = Some(pagination);
        self
    }
}

/// Ambient read access to categories.
///
/// Reads run on a pooled connection outside any caller transaction and get
/// no isolation beyond the backend default.
pub trait CategoryReader {
    /// List live categories, newest first, together with the live total.
    fn list_categories(&self, query: CategoryListQuery)
    -> RepositoryResult<(usize, Vec<Category>)>;
    /// Retrieve a live category by its identifier.
    fn get_category_by_id(&self, id: CategoryId) -> RepositoryResult<Option<Category>>;
}

/// Write access to categories, only available inside a transaction scope.
pub trait CategoryWriter {
    /// Load a live category as seen by the open transaction.
    fn find_category(&mut self, id: CategoryId) -> RepositoryResult<Option<Category>>;
    /// Insert (no id) or update (id present) and return the stored record.
    fn save_category(&mut self, draft: &CategoryDraft) -> RepositoryResult<Category>;
    /// Soft-delete a live category, returning the record as it now stands.
    fn delete_category(&mut self, id: CategoryId) -> RepositoryResult<Category>;
}

/// An open transaction owned by exactly one operation.
///
/// Dropping a scope without calling [`commit`](Self::commit) rolls it back.
pub trait TransactionScope: CategoryWriter {
    fn commit(self) -> RepositoryResult<()>;
    fn rollback(self) -> RepositoryResult<()>;
}

/// Stores able to hand out transaction scopes.
pub trait Transactional {
    type Scope: TransactionScope;

    /// Open a new transaction scope.
    fn begin(&self) -> RepositoryResult<Self::Scope>;

    /// Run `f` inside a fresh scope, committing on `Ok` and rolling back on
    /// `Err`.
    fn run_in_transaction<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut Self::Scope) -> Result<T, E>,
        E: From<RepositoryError>,
    {
        let mut scope = self.begin()?;
        match f(&mut scope) {
            Ok(value) => {
                scope.commit()?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = scope.rollback() {
                    log::error!("Failed to roll back transaction: {rollback_err}");
                }
                Err(err)
            }
        }
    }
}
