//! Integration tests for superuser provisioning.

use reelpick_db::models::admin_user::UpsertSuperuser;
use reelpick_db::repositories::AdminUserRepo;
use sqlx::PgPool;

fn upsert(username: &str, email: &str, hash: &str) -> UpsertSuperuser {
    UpsertSuperuser {
        username: username.to_string(),
        email: email.to_string(),
        password_hash: hash.to_string(),
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn first_upsert_creates_privileged_account(pool: PgPool) {
    let (user, created) = AdminUserRepo::upsert_superuser(&pool, &upsert("root", "r@x.io", "h1"))
        .await
        .unwrap();

    assert!(created);
    assert_eq!(user.username, "root");
    assert_eq!(user.email, "r@x.io");
    assert!(user.is_staff);
    assert!(user.is_superuser);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn repeated_upsert_keeps_a_single_account(pool: PgPool) {
    let (first, created) = AdminUserRepo::upsert_superuser(&pool, &upsert("root", "", "h1"))
        .await
        .unwrap();
    assert!(created);

    let (second, created) = AdminUserRepo::upsert_superuser(&pool, &upsert("root", "", "h1"))
        .await
        .unwrap();
    assert!(!created);
    assert_eq!(second.id, first.id);
    assert_eq!(AdminUserRepo::count(&pool).await.unwrap(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn upsert_rotates_password_and_restores_flags(pool: PgPool) {
    let (user, _) = AdminUserRepo::upsert_superuser(&pool, &upsert("root", "old@x.io", "h1"))
        .await
        .unwrap();

    sqlx::query("UPDATE admin_users SET is_staff = false, is_superuser = false WHERE id = $1")
        .bind(user.id)
        .execute(&pool)
        .await
        .unwrap();

    let (updated, created) =
        AdminUserRepo::upsert_superuser(&pool, &upsert("root", "new@x.io", "h2"))
            .await
            .unwrap();

    assert!(!created);
    assert_eq!(updated.id, user.id);
    assert_eq!(updated.password_hash, "h2");
    assert!(updated.is_staff && updated.is_superuser);
    // Email is only set when the account is created.
    assert_eq!(updated.email, "old@x.io");
    assert_eq!(AdminUserRepo::count(&pool).await.unwrap(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn find_by_username_is_exact(pool: PgPool) {
    AdminUserRepo::upsert_superuser(&pool, &upsert("Root", "", "h"))
        .await
        .unwrap();

    assert!(AdminUserRepo::find_by_username(&pool, "Root").await.unwrap().is_some());
    assert!(AdminUserRepo::find_by_username(&pool, "root").await.unwrap().is_none());
}
