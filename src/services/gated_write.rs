//! Local writes whose commit is decided by the book service.
//!
//! A [`GatedWrite`] owns an open transaction from the moment the local change
//! is staged until the book service's answer is known:
//!
//! ```text
//! Staged ──ack──▶ Mirrored ──▶ Committed
//!    │                │
//!    └──error/drop────┴──────▶ RolledBack
//! ```
//!
//! Store calls block, so staging and resolution run on Tokio's blocking pool.
//! A writer queued behind another transaction waits there while the async
//! worker keeps driving in-flight mirror calls.
//!
//! Dropping the guard before it is resolved rolls the transaction back, which
//! is what happens when the surrounding request future is cancelled. Once an
//! acknowledgement is accepted the guard is handed to a blocking task that
//! commits it; cancelling the caller from then on does not stop the commit.

use crate::mirror::MirrorResult;
use crate::repository::{RepositoryError, RepositoryResult, TransactionScope, Transactional};

use super::{ServiceError, ServiceResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WritePhase {
    /// Local change applied inside the open transaction, not yet mirrored.
    Staged,
    /// Book service acknowledged; commit is pending.
    Mirrored,
    Committed,
    RolledBack,
}

pub struct GatedWrite<S: TransactionScope> {
    scope: Option<S>,
    phase: WritePhase,
}

/// Run a blocking store call off the async worker.
async fn run_blocking<T, F>(f: F) -> RepositoryResult<T>
where
    F: FnOnce() -> RepositoryResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f).await?
}

impl<S> GatedWrite<S>
where
    S: TransactionScope + Send + 'static,
{
    /// Open a transaction on `repo` and apply `mutate` inside it.
    ///
    /// On failure the transaction is rolled back before the error is returned.
    /// If the caller goes away while the transaction is being opened, the
    /// scope is dropped, and so rolled back, as soon as the blocking task ends.
    pub async fn stage<R, T, F>(repo: &R, mutate: F) -> RepositoryResult<(Self, T)>
    where
        R: Transactional<Scope = S> + Clone + Send + 'static,
        F: FnOnce(&mut S) -> RepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let repo = repo.clone();
        let (scope, value) = run_blocking(move || {
            let mut scope = repo.begin()?;
            match mutate(&mut scope) {
                Ok(value) => Ok((scope, value)),
                Err(err) => {
                    if let Err(rollback_err) = scope.rollback() {
                        log::error!("Failed to roll back unstaged write: {rollback_err}");
                    }
                    Err(err)
                }
            }
        })
        .await?;

        Ok((
            Self {
                scope: Some(scope),
                phase: WritePhase::Staged,
            },
            value,
        ))
    }

    pub fn phase(&self) -> WritePhase {
        self.phase
    }

    /// Record that the book service acknowledged the staged change.
    pub fn mark_mirrored(&mut self) -> RepositoryResult<()> {
        if self.phase != WritePhase::Staged {
            return Err(RepositoryError::TransactionState(
                "only a staged write can be mirrored",
            ));
        }
        self.phase = WritePhase::Mirrored;
        log::debug!("Dual write mirrored, committing");
        Ok(())
    }

    /// Commit a mirrored write. Any other phase is refused and the
    /// transaction is rolled back when `self` drops.
    pub fn commit(mut self) -> RepositoryResult<()> {
        if self.phase != WritePhase::Mirrored {
            return Err(RepositoryError::TransactionState(
                "only a mirrored write can be committed",
            ));
        }
        let scope = self
            .scope
            .take()
            .ok_or(RepositoryError::TransactionState("transaction already finished"))?;
        // Whatever the outcome, the scope is gone; do not roll back on drop.
        self.phase = WritePhase::Committed;
        scope.commit()
    }

    /// Abandon the write.
    pub fn rollback(mut self) -> RepositoryResult<()> {
        self.phase = WritePhase::RolledBack;
        match self.scope.take() {
            Some(scope) => scope.rollback(),
            None => Err(RepositoryError::TransactionState(
                "transaction already finished",
            )),
        }
    }

    /// Commit on acknowledgement, roll back on any mirror error.
    pub async fn resolve<A>(self, outcome: MirrorResult<A>) -> ServiceResult<A> {
        match outcome {
            Ok(ack) => {
                run_blocking(move || {
                    let mut write = self;
                    write.mark_mirrored()?;
                    write.commit()
                })
                .await
                .map_err(|e| {
                    log::error!(
                        "Book service acknowledged but local commit failed, remote state is ahead: {e}"
                    );
                    ServiceError::Internal
                })?;
                Ok(ack)
            }
            Err(mirror_err) => {
                log::warn!("Book service did not acknowledge, rolling back: {mirror_err}");
                if let Err(rollback_err) = run_blocking(move || self.rollback()).await {
                    log::error!("Failed to roll back after mirror failure: {rollback_err}");
                }
                Err(ServiceError::Remote(mirror_err.to_string()))
            }
        }
    }
}

impl<S: TransactionScope> Drop for GatedWrite<S> {
    fn drop(&mut self) {
        if let Some(scope) = self.scope.take() {
            log::warn!(
                "Dual write cancelled in phase {:?}, rolling back",
                self.phase
            );
            self.phase = WritePhase::RolledBack;
            // The scope already holds the write lock, so this does not wait.
            if let Err(e) = scope.rollback() {
                log::error!("Failed to roll back dropped dual write: {e}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::category::CategoryDraft;
    use crate::domain::types::CategoryName;
    use crate::mirror::{MirrorAck, MirrorError};
    use crate::repository::CategoryWriter;
    use crate::repository::test::{Journal, TestRepository, TestTransaction};

    fn draft(name: &str) -> CategoryDraft {
        CategoryDraft::new(CategoryName::new(name).unwrap())
    }

    fn ack() -> MirrorResult<MirrorAck> {
        Ok(MirrorAck {
            message: "ok".into(),
        })
    }

    async fn stage_fiction(
        repo: &TestRepository,
    ) -> RepositoryResult<GatedWrite<TestTransaction>> {
        let draft = draft("Fiction");
        let (write, _) =
            GatedWrite::stage(repo, move |scope| scope.save_category(&draft)).await?;
        Ok(write)
    }

    #[tokio::test]
    async fn walks_staged_mirrored_committed() {
        let journal = Journal::default();
        let repo = TestRepository::new().with_journal(journal.clone());

        let mut write = stage_fiction(&repo).await.unwrap();
        assert_eq!(write.phase(), WritePhase::Staged);

        write.mark_mirrored().unwrap();
        assert_eq!(write.phase(), WritePhase::Mirrored);

        write.commit().unwrap();
        assert_eq!(journal.entries(), vec!["begin", "save", "commit"]);
        assert_eq!(repo.snapshot().len(), 1);
    }

    #[tokio::test]
    async fn refuses_to_commit_unmirrored_write() {
        let journal = Journal::default();
        let repo = TestRepository::new().with_journal(journal.clone());

        let write = stage_fiction(&repo).await.unwrap();
        let err = write.commit().unwrap_err();

        assert!(matches!(err, RepositoryError::TransactionState(_)));
        assert_eq!(journal.entries(), vec!["begin", "save", "rollback"]);
        assert!(repo.snapshot().is_empty());
    }

    #[tokio::test]
    async fn cannot_mirror_twice() {
        let repo = TestRepository::new();
        let mut write = stage_fiction(&repo).await.unwrap();

        write.mark_mirrored().unwrap();
        assert!(write.mark_mirrored().is_err());
        assert_eq!(write.phase(), WritePhase::Mirrored);
    }

    #[tokio::test]
    async fn failed_mutation_is_rolled_back_immediately() {
        let journal = Journal::default();
        let repo = TestRepository::new()
            .with_categories(&["Fiction"])
            .with_journal(journal.clone());

        let result = stage_fiction(&repo).await;

        assert!(matches!(
            result,
            Err(RepositoryError::ConstraintViolation(_))
        ));
        assert_eq!(journal.entries(), vec!["begin", "rollback"]);
    }

    #[tokio::test]
    async fn dropping_a_staged_write_rolls_back() {
        let journal = Journal::default();
        let repo = TestRepository::new().with_journal(journal.clone());

        {
            let _write = stage_fiction(&repo).await.unwrap();
        }

        assert_eq!(journal.entries(), vec!["begin", "save", "rollback"]);
        assert!(repo.snapshot().is_empty());
    }

    #[tokio::test]
    async fn resolve_commits_on_ack() {
        let repo = TestRepository::new();
        let write = stage_fiction(&repo).await.unwrap();

        assert!(write.resolve(ack()).await.is_ok());
        assert_eq!(repo.snapshot().len(), 1);
    }

    #[tokio::test]
    async fn resolve_rolls_back_on_error() {
        let repo = TestRepository::new();
        let write = stage_fiction(&repo).await.unwrap();

        let outcome: MirrorResult<MirrorAck> = Err(MirrorError::Rejected("nope".into()));
        let err = write.resolve(outcome).await.unwrap_err();

        assert!(matches!(err, ServiceError::Remote(_)));
        assert!(repo.snapshot().is_empty());
    }
}
