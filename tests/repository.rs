use pushkind_categories::domain::category::CategoryDraft;
use pushkind_categories::domain::types::{CategoryId, CategoryName};
use pushkind_categories::pagination::Pagination;
use pushkind_categories::repository::{
    CategoryListQuery, CategoryReader, CategoryWriter, DieselRepository, RepositoryError,
    TransactionScope, Transactional,
};

mod common;

fn name(value: &str) -> CategoryName {
    CategoryName::new(value).expect("valid category name")
}

fn insert(repo: &DieselRepository, value: &str) -> CategoryId {
    repo.run_in_transaction(|scope| scope.save_category(&CategoryDraft::new(name(value))))
        .map(|category| category.id)
        .expect("insert category")
}

#[test]
fn insert_assigns_id_and_timestamps() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    let id = insert(&repo, "Fiction");
    let stored = repo.get_category_by_id(id).unwrap().unwrap();

    assert_eq!(stored.name, "Fiction");
    assert_eq!(stored.created_at, stored.updated_at);
    assert!(!stored.is_deleted());
}

#[test]
fn update_keeps_identity_and_creation_time() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());
    let id = insert(&repo, "Fiction");
    let before = repo.get_category_by_id(id).unwrap().unwrap();

    let updated = repo
        .run_in_transaction(|scope| {
            scope.save_category(&CategoryDraft::existing(&before).rename(name("Novels")))
        })
        .unwrap();

    assert_eq!(updated.id, id);
    assert_eq!(updated.name, "Novels");
    assert_eq!(updated.created_at, before.created_at);
    assert!(updated.updated_at >= before.updated_at);
}

#[test]
fn uncommitted_changes_are_invisible_and_rolled_back() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    let mut scope = repo.begin().unwrap();
    let staged = scope
        .save_category(&CategoryDraft::new(name("Fiction")))
        .unwrap();
    assert!(scope.find_category(staged.id).unwrap().is_some());
    assert!(repo.get_category_by_id(staged.id).unwrap().is_none());

    scope.rollback().unwrap();

    assert!(repo.get_category_by_id(staged.id).unwrap().is_none());
    assert_eq!(repo.list_categories(CategoryListQuery::new()).unwrap().0, 0);
}

#[test]
fn dropping_scope_rolls_back() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    {
        let mut scope = repo.begin().unwrap();
        scope
            .save_category(&CategoryDraft::new(name("Fiction")))
            .unwrap();
    }

    assert_eq!(repo.list_categories(CategoryListQuery::new()).unwrap().0, 0);
    // The connection went back to the pool usable.
    insert(&repo, "Fiction");
}

#[test]
fn soft_deleted_categories_are_hidden() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());
    let id = insert(&repo, "Fiction");
    insert(&repo, "Poetry");

    let deleted = repo
        .run_in_transaction(|scope| scope.delete_category(id))
        .unwrap();
    assert!(deleted.is_deleted());

    assert!(repo.get_category_by_id(id).unwrap().is_none());
    let (total, items) = repo.list_categories(CategoryListQuery::new()).unwrap();
    assert_eq!(total, 1);
    assert_eq!(items[0].name, "Poetry");
}

#[test]
fn deleted_category_cannot_be_deleted_or_updated_again() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());
    let id = insert(&repo, "Fiction");
    repo.run_in_transaction(|scope| scope.delete_category(id))
        .unwrap();

    let second_delete = repo.run_in_transaction(|scope| scope.delete_category(id));
    assert!(matches!(second_delete, Err(RepositoryError::NotFound)));

    let update = repo.run_in_transaction(|scope| {
        scope.save_category(&CategoryDraft {
            id: Some(id),
            name: name("Revived"),
        })
    });
    assert!(matches!(update, Err(RepositoryError::NotFound)));
}

#[test]
fn live_names_are_unique_but_deleted_names_can_be_reused() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());
    let id = insert(&repo, "Fiction");

    let duplicate =
        repo.run_in_transaction(|scope| scope.save_category(&CategoryDraft::new(name("Fiction"))));
    assert!(matches!(
        duplicate,
        Err(RepositoryError::ConstraintViolation(_))
    ));

    repo.run_in_transaction(|scope| scope.delete_category(id))
        .unwrap();
    let recreated = insert(&repo, "Fiction");

    assert_ne!(recreated, id);
}

#[test]
fn lists_newest_first_with_pagination() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());
    let ids: Vec<CategoryId> = ["A", "B", "C", "D", "E"]
        .iter()
        .map(|value| insert(&repo, value))
        .collect();

    let (total, first) = repo
        .list_categories(CategoryListQuery::new().paginate(Pagination::new(1, 2)))
        .unwrap();
    assert_eq!(total, 5);
    assert_eq!(
        first.iter().map(|c| c.id).collect::<Vec<_>>(),
        vec![ids[4], ids[3]]
    );

    let (_, last) = repo
        .list_categories(CategoryListQuery::new().paginate(Pagination::new(3, 2)))
        .unwrap();
    assert_eq!(last.iter().map(|c| c.id).collect::<Vec<_>>(), vec![ids[0]]);

    let (total, beyond) = repo
        .list_categories(CategoryListQuery::new().paginate(Pagination::new(9, 2)))
        .unwrap();
    assert_eq!(total, 5);
    assert!(beyond.is_empty());
}

#[test]
fn failed_closure_rolls_back() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    let result: Result<(), RepositoryError> = repo.run_in_transaction(|scope| {
        scope.save_category(&CategoryDraft::new(name("Fiction")))?;
        Err(RepositoryError::ValidationError("abort".into()))
    });

    assert!(matches!(result, Err(RepositoryError::ValidationError(_))));
    assert_eq!(repo.list_categories(CategoryListQuery::new()).unwrap().0, 0);
}
