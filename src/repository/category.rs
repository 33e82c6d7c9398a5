use chrono::Utc;
use diesel::connection::{AnsiTransactionManager, TransactionManager};
use diesel::prelude::*;
use diesel::sqlite::{Sqlite, SqliteConnection};

use crate::db::DbConnection;
use crate::domain::category::{Category, CategoryDraft};
use crate::domain::types::CategoryId;
use crate::models::category::{Category as DbCategory, NewCategory as DbNewCategory};
use crate::repository::{
    CategoryListQuery, CategoryReader, CategoryWriter, DieselRepository, RepositoryError,
    RepositoryResult, TransactionScope, Transactional,
};

impl CategoryReader for DieselRepository {
    fn list_categories(
        &self,
        query: CategoryListQuery,
    ) -> RepositoryResult<(usize, Vec<Category>)> {
        use crate::schema::categories;

        let mut conn = self.conn()?;

        let query_builder = || {
            categories::table
                .filter(categories::deleted_at.is_null())
                .into_boxed::<Sqlite>()
        };

        // Count and page come from the same read transaction.
        let (total, rows) = conn.transaction(|conn| {
            let total = query_builder().count().get_result::<i64>(conn)? as usize;

            let mut items = query_builder();
            if let Some(pagination) = &query.pagination {
                items = items
                    .offset(pagination.offset() as i64)
                    .limit(pagination.per_page as i64);
            }

            let rows = items
                .order((categories::created_at.desc(), categories::id.desc()))
                .load::<DbCategory>(conn)?;

            Ok::<_, RepositoryError>((total, rows))
        })?;

        let items = rows
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<Category>, _>>()?;

        Ok((total, items))
    }

    fn get_category_by_id(&self, id: CategoryId) -> RepositoryResult<Option<Category>> {
        let mut conn = self.conn()?;
        load_live_category(&mut conn, id)
    }
}

fn load_live_category(
    conn: &mut SqliteConnection,
    id: CategoryId,
) -> RepositoryResult<Option<Category>> {
    use crate::schema::categories;

    let category = categories::table
        .filter(categories::id.eq(id.get()))
        .filter(categories::deleted_at.is_null())
        .first::<DbCategory>(conn)
        .optional()?;

    let category = category.map(TryInto::try_into).transpose()?;
    Ok(category)
}

/// Transaction scope holding its own pooled connection.
///
/// The transaction is opened with `BEGIN IMMEDIATE`, so concurrent writers
/// queue on SQLite's write lock (bounded by the pool's `busy_timeout`).
pub struct DieselTransaction {
    conn: DbConnection,
    open: bool,
}

impl DieselTransaction {
    fn finish(&mut self, commit: bool) -> RepositoryResult<()> {
        if !self.open {
            return Err(RepositoryError::TransactionState("transaction already finished"));
        }
        self.open = false;

        let conn: &mut SqliteConnection = &mut self.conn;
        if commit {
            <AnsiTransactionManager as TransactionManager<SqliteConnection>>::commit_transaction(
                conn,
            )?;
        } else {
            <AnsiTransactionManager as TransactionManager<SqliteConnection>>::rollback_transaction(
                conn,
            )?;
        }
        Ok(())
    }
}

impl Drop for DieselTransaction {
    fn drop(&mut self) {
        if self.open {
            log::warn!("Transaction dropped while still open, rolling back");
            if let Err(e) = self.finish(false) {
                log::error!("Failed to roll back dropped transaction: {e}");
            }
        }
    }
}

impl Transactional for DieselRepository {
    type Scope = DieselTransaction;

    fn begin(&self) -> RepositoryResult<DieselTransaction> {
        let mut conn = self.conn()?;
        AnsiTransactionManager::begin_transaction_sql(&mut *conn, "BEGIN IMMEDIATE")?;
        Ok(DieselTransaction { conn, open: true })
    }
}

impl TransactionScope for DieselTransaction {
    fn commit(mut self) -> RepositoryResult<()> {
        self.finish(true)
    }

    fn rollback(mut self) -> RepositoryResult<()> {
        self.finish(false)
    }
}

impl CategoryWriter for DieselTransaction {
    fn find_category(&mut self, id: CategoryId) -> RepositoryResult<Option<Category>> {
        load_live_category(&mut self.conn, id)
    }

    fn save_category(&mut self, draft: &CategoryDraft) -> RepositoryResult<Category> {
        use crate::schema::categories;

        let now = Utc::now().naive_utc();
        let conn: &mut SqliteConnection = &mut self.conn;

        let row = match draft.id {
            None => diesel::insert_into(categories::table)
                .values(DbNewCategory {
                    name: draft.name.as_str(),
                    created_at: now,
                    updated_at: now,
                })
                .get_result::<DbCategory>(conn)?,
            Some(id) => diesel::update(
                categories::table
                    .filter(categories::id.eq(id.get()))
                    .filter(categories::deleted_at.is_null()),
            )
            .set((
                categories::name.eq(draft.name.as_str()),
                categories::updated_at.eq(now),
            ))
            .get_result::<DbCategory>(conn)
            .optional()?
            .ok_or(RepositoryError::NotFound)?,
        };

        Ok(row.try_into()?)
    }

    fn delete_category(&mut self, id: CategoryId) -> RepositoryResult<Category> {
        use crate::schema::categories;

        let now = Utc::now().naive_utc();
        let conn: &mut SqliteConnection = &mut self.conn;

        // Only live rows match, so a second delete reports NotFound.
        let row = diesel::update(
            categories::table
                .filter(categories::id.eq(id.get()))
                .filter(categories::deleted_at.is_null()),
        )
        .set(categories::deleted_at.eq(Some(now)))
        .get_result::<DbCategory>(conn)
        .optional()?
        .ok_or(RepositoryError::NotFound)?;

        Ok(row.try_into()?)
    }
}
