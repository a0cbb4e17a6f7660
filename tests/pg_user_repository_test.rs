mod helpers;

use std::sync::Arc;

use scribegate::application::ports::{DeductionOutcome, RepositoryError, UserRepository};
use scribegate::domain::UserAccount;
use scribegate::infrastructure::persistence::{PgUserRepository, seed_users};

use helpers::TestPostgres;

#[tokio::test]
#[ignore = "requires docker"]
async fn given_new_user_when_adding_and_retrieving_then_user_is_persisted() {
    let test_pg = TestPostgres::new().await;

    test_pg
        .user_repository
        .add_user(&UserAccount::new("tester", "changeme", 60.0))
        .await
        .expect("Failed to add user");

    let user = test_pg
        .user_repository
        .get_user("tester")
        .await
        .expect("Failed to load user")
        .expect("User not found");

    assert_eq!(user.username, "tester");
    assert!(user.password_matches("changeme"));
    assert_eq!(user.minutes_remaining, 60.0);
    assert!(test_pg.user_repository.get_user("ghost").await.unwrap().is_none());
}

#[tokio::test]
#[ignore = "requires docker"]
async fn given_existing_user_when_adding_again_then_row_is_overwritten() {
    let test_pg = TestPostgres::new().await;
    let repo = &test_pg.user_repository;

    repo.add_user(&UserAccount::new("tester", "old", 10.0)).await.unwrap();
    repo.add_user(&UserAccount::new("tester", "new", 20.0)).await.unwrap();

    let user = repo.get_user("tester").await.unwrap().unwrap();
    assert!(user.password_matches("new"));
    assert_eq!(user.minutes_remaining, 20.0);
    assert_eq!(repo.list_users().await.unwrap().len(), 1);
}

#[tokio::test]
#[ignore = "requires docker"]
async fn given_seed_accounts_when_seeding_twice_then_existing_balances_are_kept() {
    let test_pg = TestPostgres::new().await;
    let repo = &test_pg.user_repository;
    let seeds = vec![
        UserAccount::new("alice", "a", 5.0),
        UserAccount::new("bob", "b", 7.0),
    ];

    assert_eq!(seed_users(repo, &seeds).await.unwrap(), 2);
    repo.deduct_minutes("alice", 2.0).await.unwrap();
    assert_eq!(seed_users(repo, &seeds).await.unwrap(), 0);

    let users = repo.list_users().await.unwrap();
    let names: Vec<_> = users.iter().map(|u| u.username.as_str()).collect();
    assert_eq!(names, vec!["alice", "bob"]);
    assert_eq!(users[0].minutes_remaining, 3.0);
}

#[tokio::test]
#[ignore = "requires docker"]
async fn given_balance_when_deducting_then_reports_outcome_per_case() {
    let test_pg = TestPostgres::new().await;
    let repo = &test_pg.user_repository;
    repo.add_user(&UserAccount::new("tester", "x", 1.0)).await.unwrap();

    assert_eq!(
        repo.deduct_minutes("tester", 0.25).await.unwrap(),
        DeductionOutcome::Deducted { remaining: 0.75 }
    );
    assert_eq!(
        repo.deduct_minutes("tester", 5.0).await.unwrap(),
        DeductionOutcome::Insufficient { remaining: 0.75 }
    );
    assert_eq!(
        repo.deduct_minutes("ghost", 0.1).await.unwrap(),
        DeductionOutcome::NotFound
    );
}

#[tokio::test]
#[ignore = "requires docker"]
async fn given_missing_user_when_setting_limit_or_password_then_returns_not_found() {
    let test_pg = TestPostgres::new().await;
    let repo = &test_pg.user_repository;

    assert!(matches!(
        repo.set_limit("ghost", 10.0).await,
        Err(RepositoryError::NotFound(_))
    ));
    assert!(matches!(
        repo.set_password("ghost", "pw").await,
        Err(RepositoryError::NotFound(_))
    ));
}

#[tokio::test]
#[ignore = "requires docker"]
async fn given_negative_limit_when_setting_then_check_constraint_rejects_it() {
    let test_pg = TestPostgres::new().await;
    let repo = &test_pg.user_repository;
    repo.add_user(&UserAccount::new("tester", "x", 1.0)).await.unwrap();

    let result = repo.set_limit("tester", -1.0).await;

    assert!(matches!(result, Err(RepositoryError::ConstraintViolation(_))));
    assert_eq!(repo.get_user("tester").await.unwrap().unwrap().minutes_remaining, 1.0);
}

#[tokio::test]
#[ignore = "requires docker"]
async fn given_concurrent_deductions_when_balance_covers_some_then_never_goes_negative() {
    let test_pg = TestPostgres::new().await;
    let repo = Arc::new(PgUserRepository::new(test_pg.pool.clone()));
    repo.add_user(&UserAccount::new("tester", "x", 1.0)).await.unwrap();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let repo = Arc::clone(&repo);
            tokio::spawn(async move { repo.deduct_minutes("tester", 0.25).await })
        })
        .collect();

    let mut deducted = 0;
    for handle in handles {
        if let DeductionOutcome::Deducted { .. } = handle.await.unwrap().unwrap() {
            deducted += 1;
        }
    }

    assert_eq!(deducted, 4);
    let remaining = repo.get_user("tester").await.unwrap().unwrap().minutes_remaining;
    assert_eq!(remaining, 0.0);
}
