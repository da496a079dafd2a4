//! User business logic - signup, sign-in and profile updates.
//!
//! Phone uniqueness is checked before insert to give a clear [`Error::PhoneTaken`],
//! but the check is not atomic with the insert. Two concurrent signups can both
//! pass it; the unique index on `users.phone` then rejects the second one as
//! [`Error::Database`].

use crate::{
    auth,
    entities::{User, user},
    errors::{Error, Result},
    models::{Credentials, NewUser, UserUpdate},
};
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::{info, warn};

/// Retrieves a user by id.
///
/// # Errors
/// Returns [`Error::NotFound`] if no user has this id.
pub async fn get_user_by_id<C>(db: &C, user_id: i64) -> Result<user::Model>
where
    C: ConnectionTrait,
{
    User::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound {
            entity: "user",
            id: user_id,
        })
}

/// Finds a user by phone number.
pub async fn get_user_by_phone<C>(db: &C, phone: &str) -> Result<Option<user::Model>>
where
    C: ConnectionTrait,
{
    User::find()
        .filter(user::Column::Phone.eq(phone.trim()))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves every user ordered by id.
pub async fn get_all_users<C>(db: &C) -> Result<Vec<user::Model>>
where
    C: ConnectionTrait,
{
    User::find()
        .order_by_asc(user::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Registers a new user, storing an argon2 hash of the password.
///
/// # Errors
/// - [`Error::Validation`] if name, phone or password is blank
/// - [`Error::PhoneTaken`] if the phone is already registered
pub async fn sign_up<C>(db: &C, new_user: NewUser) -> Result<user::Model>
where
    C: ConnectionTrait,
{
    if new_user.name.trim().is_empty()
        || new_user.phone.trim().is_empty()
        || new_user.password.is_empty()
    {
        return Err(Error::validation("Name, phone and password are required"));
    }

    let phone = new_user.phone.trim().to_string();
    if get_user_by_phone(db, &phone).await?.is_some() {
        return Err(Error::PhoneTaken { phone });
    }

    let password_hash = auth::hash_password(&new_user.password)?;
    let now = chrono::Utc::now();
    let user = user::ActiveModel {
        name: Set(new_user.name.trim().to_string()),
        email: Set(new_user.email.trim().to_string()),
        phone: Set(phone.clone()),
        password: Set(password_hash),
        firm_name: Set(new_user.firm_name),
        is_admin: Set(new_user.is_admin),
        updated_by: Set(phone),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let created = user.insert(db).await?;
    info!("Registered user {} ({})", created.id, created.phone);
    Ok(created)
}

/// Checks a phone/password pair and returns the matching user.
///
/// Unknown phones and wrong passwords both yield [`Error::InvalidCredentials`].
pub async fn authenticate<C>(db: &C, credentials: &Credentials) -> Result<user::Model>
where
    C: ConnectionTrait,
{
    if credentials.identifier.trim().is_empty() || credentials.password.is_empty() {
        return Err(Error::validation("Identifier and password are required"));
    }

    let Some(user) = get_user_by_phone(db, &credentials.identifier).await? else {
        warn!("Sign-in attempt for unknown phone {}", credentials.identifier);
        return Err(Error::InvalidCredentials);
    };

    if !auth::verify_password(&credentials.password, &user.password) {
        warn!("Wrong password for user {}", user.id);
        return Err(Error::InvalidCredentials);
    }

    Ok(user)
}

/// Overwrites the profile fields of an existing user. The password is left alone.
pub async fn update_user<C>(
    db: &C,
    user_id: i64,
    update: UserUpdate,
    updated_by: &str,
) -> Result<user::Model>
where
    C: ConnectionTrait,
{
    if update.name.trim().is_empty() || update.phone.trim().is_empty() {
        return Err(Error::validation("Name and phone are required"));
    }

    let mut user: user::ActiveModel = get_user_by_id(db, user_id).await?.into();

    user.name = Set(update.name.trim().to_string());
    user.phone = Set(update.phone.trim().to_string());
    user.firm_name = Set(update.firm_name);
    user.is_admin = Set(update.is_admin);
    user.updated_by = Set(updated_by.to_string());
    user.updated_at = Set(chrono::Utc::now());

    user.update(db).await.map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::models::UserResponse;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_sign_up_then_get_user() -> Result<()> {
        let db = setup_test_db().await?;

        let created = sign_up(
            &db,
            NewUser {
                name: "Asha".to_string(),
                email: "asha@example.com".to_string(),
                phone: " 9000000001 ".to_string(),
                password: "hunter2".to_string(),
                firm_name: "Asha Medicals".to_string(),
                is_admin: false,
            },
        )
        .await?;

        assert!(created.id > 0);
        assert_eq!(created.phone, "9000000001");
        assert_ne!(created.password, "hunter2");
        assert!(auth::verify_password("hunter2", &created.password));

        let fetched = get_user_by_id(&db, created.id).await?;
        assert_eq!(fetched, created);
        assert_eq!(fetched.firm_name, "Asha Medicals");

        Ok(())
    }

    #[tokio::test]
    async fn test_sign_up_rejects_duplicate_phone() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_user(&db, "First", "9000000002").await?;

        let result = sign_up(&db, new_user("Second", "9000000002")).await;
        assert!(matches!(result, Err(Error::PhoneTaken { phone }) if phone == "9000000002"));
        assert_eq!(get_all_users(&db).await?.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_unique_index_rejects_duplicate_phone() -> Result<()> {
        let db = setup_test_db().await?;
        let first = create_test_user(&db, "First", "9000000003").await?;
        let second = create_test_user(&db, "Second", "9000000004").await?;

        // Bypasses the pre-check: only the index stands in the way
        let result = update_user(
            &db,
            second.id,
            UserUpdate {
                name: "Second".to_string(),
                phone: first.phone.clone(),
                firm_name: String::new(),
                is_admin: false,
            },
            "admin",
        )
        .await;
        assert!(matches!(result, Err(Error::Database(_))));

        Ok(())
    }

    #[tokio::test]
    async fn test_sign_up_validation() -> Result<()> {
        let db = setup_test_db().await?;

        let mut missing_password = new_user("Nameless", "9000000005");
        missing_password.password = String::new();
        assert!(matches!(
            sign_up(&db, missing_password).await,
            Err(Error::Validation { message: _ })
        ));
        assert!(matches!(
            sign_up(&db, new_user("  ", "9000000005")).await,
            Err(Error::Validation { message: _ })
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_authenticate() -> Result<()> {
        let db = setup_test_db().await?;
        let user = create_test_user(&db, "Ravi", "9000000006").await?;

        let ok = authenticate(
            &db,
            &Credentials {
                identifier: "9000000006".to_string(),
                password: TEST_PASSWORD.to_string(),
            },
        )
        .await?;
        assert_eq!(ok.id, user.id);

        let response = UserResponse::from(&ok);
        assert_eq!(response.phone_number, "9000000006");
        assert!(!response.is_admin);

        let wrong_password = authenticate(
            &db,
            &Credentials {
                identifier: "9000000006".to_string(),
                password: "nope".to_string(),
            },
        )
        .await;
        assert!(matches!(wrong_password, Err(Error::InvalidCredentials)));

        let unknown_phone = authenticate(
            &db,
            &Credentials {
                identifier: "1111111111".to_string(),
                password: TEST_PASSWORD.to_string(),
            },
        )
        .await;
        assert!(matches!(unknown_phone, Err(Error::InvalidCredentials)));

        Ok(())
    }

    #[tokio::test]
    async fn test_update_user() -> Result<()> {
        let db = setup_test_db().await?;
        let user = create_test_user(&db, "Old", "9000000007").await?;

        let updated = update_user(
            &db,
            user.id,
            UserUpdate {
                name: "New".to_string(),
                phone: "9000000008".to_string(),
                firm_name: "New Firm".to_string(),
                is_admin: true,
            },
            "root",
        )
        .await?;

        assert_eq!(updated.name, "New");
        assert_eq!(updated.phone, "9000000008");
        assert!(updated.is_admin);
        assert_eq!(updated.updated_by, "root");
        assert_eq!(updated.password, user.password);

        assert!(matches!(
            update_user(&db, 999, UserUpdate::default(), "root").await,
            Err(Error::Validation { message: _ })
        ));
        assert!(matches!(
            update_user(
                &db,
                999,
                UserUpdate {
                    name: "X".to_string(),
                    phone: "1".to_string(),
                    ..Default::default()
                },
                "root"
            )
            .await,
            Err(Error::NotFound { entity: "user", id: 999 })
        ));

        Ok(())
    }

    #[test]
    fn test_password_is_not_serialized() {
        let now = chrono::Utc::now();
        let user = user::Model {
            id: 1,
            name: "Asha".to_string(),
            email: String::new(),
            phone: "9000000001".to_string(),
            password: "$argon2id$secret".to_string(),
            firm_name: String::new(),
            is_admin: false,
            updated_by: String::new(),
            created_at: now,
            updated_at: now,
        };

        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("argon2"));
        assert!(!json.contains("password"));
    }
}
