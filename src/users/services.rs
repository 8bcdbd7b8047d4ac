use tracing::{info, warn};

use super::{
    dto::{ProfileResponse, RegisterRequest, UpdateOutcome, UpdateProfileRequest, UserIdResponse},
    repo_types::{CreateUserInput, UpdateUserInput},
    validation::validate_phone_number,
};
use crate::{
    auth::{
        extractors::AuthUser,
        password::{generate_salt, hash_password},
    },
    error::{AppError, Result},
    state::AppState,
};

/// Creates an account. Duplicate phone numbers are rejected by the store's
/// unique constraint, never by a prior lookup.
pub async fn register(st: &AppState, req: RegisterRequest) -> Result<UserIdResponse> {
    validate_phone_number(&req.phone_number)?;

    let salt = generate_salt();
    let password_hash = hash_password(&req.password, &salt)?;

    let input = CreateUserInput {
        full_name: req.full_name,
        phone_number: req.phone_number,
        password_hash,
        salt,
    };
    let phone_number = input.phone_number.clone();
    let id = st.repo.create_user(input).await.map_err(|e| {
        warn!(error = %e, %phone_number, "create user failed");
        AppError::from(e)
    })?;

    info!(user_id = id, "user registered");
    Ok(UserIdResponse { id })
}

pub async fn get_profile(st: &AppState, user: AuthUser) -> Result<ProfileResponse> {
    let found = st
        .repo
        .find_user_by_id(user.id())
        .await?
        .ok_or_else(|| AppError::NotFound("user not found".into()))?;

    Ok(ProfileResponse {
        full_name: found.full_name,
        phone_number: found.phone_number,
    })
}

/// Applies a partial profile change for the authenticated user.
///
/// The phone-number ownership check and the write are separate calls; the
/// unique constraint still rejects a racing duplicate with `Conflict`.
pub async fn update_profile(
    st: &AppState,
    user: AuthUser,
    req: UpdateProfileRequest,
) -> Result<UpdateOutcome> {
    let changes = UpdateUserInput {
        full_name: req.full_name,
        phone_number: req.phone_number,
    };
    if changes.is_empty() {
        return Ok(UpdateOutcome::Unchanged);
    }

    if let Some(phone_number) = &changes.phone_number {
        validate_phone_number(phone_number)?;

        if let Some(owner) = st.repo.find_user_by_phone_number(phone_number).await? {
            if owner.id != user.id() {
                warn!(user_id = user.id(), owner_id = owner.id, "phone number taken");
                return Err(AppError::Conflict("phone number already existed".into()));
            }
        }
    }

    if st.repo.find_user_by_id(user.id()).await?.is_none() {
        return Err(AppError::NotFound("user not found".into()));
    }

    st.repo.update_user(user.id(), &changes).await?;

    info!(user_id = user.id(), "profile updated");
    Ok(UpdateOutcome::Updated(UserIdResponse { id: user.id() }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{auth::password::verify_password, users::repo_memory::MemoryUserRepository};

    fn ann() -> RegisterRequest {
        RegisterRequest {
            full_name: "Ann".into(),
            phone_number: "+628111".into(),
            password: "pw".into(),
        }
    }

    fn with_memory() -> (AppState, Arc<MemoryUserRepository>) {
        let repo = Arc::new(MemoryUserRepository::new());
        (AppState::fake_with(repo.clone()), repo)
    }

    #[tokio::test]
    async fn register_then_get_profile() {
        let (st, repo) = with_memory();
        let created = register(&st, ann()).await.expect("register");
        assert!(created.id > 0);

        let profile = get_profile(&st, AuthUser(created.id)).await.expect("profile");
        assert_eq!(
            profile,
            ProfileResponse {
                full_name: "Ann".into(),
                phone_number: "+628111".into(),
            }
        );

        let stored = repo.snapshot(created.id).unwrap();
        assert_ne!(stored.password_hash, "pw");
        assert!(verify_password("pw", &stored.salt, &stored.password_hash).unwrap());
    }

    #[tokio::test]
    async fn register_rejects_bad_phone() {
        let (st, _) = with_memory();
        let mut req = ann();
        req.phone_number = "08111".into();
        let err = register(&st, req).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidFormat(_)));
    }

    #[tokio::test]
    async fn duplicate_registration_conflicts() {
        let (st, _) = with_memory();
        register(&st, ann()).await.expect("first");
        let err = register(&st, ann()).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn concurrent_registration_has_one_winner() {
        let (st, _) = with_memory();
        let (a, b) = tokio::join!(register(&st, ann()), register(&st, ann()));
        let outcomes = [a, b];
        assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(outcomes
            .iter()
            .any(|r| matches!(r, Err(AppError::Conflict(_)))));
    }

    #[tokio::test]
    async fn get_profile_of_missing_user_is_not_found() {
        let (st, _) = with_memory();
        let err = get_profile(&st, AuthUser(99)).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn empty_update_is_a_no_op() {
        let (st, repo) = with_memory();
        let id = register(&st, ann()).await.unwrap().id;
        let before = repo.snapshot(id).unwrap();

        let outcome = update_profile(&st, AuthUser(id), UpdateProfileRequest::default())
            .await
            .unwrap();
        assert_eq!(outcome, UpdateOutcome::Unchanged);

        let after = repo.snapshot(id).unwrap();
        assert_eq!(after.full_name, before.full_name);
        assert_eq!(after.phone_number, before.phone_number);
        assert_eq!(after.password_hash, before.password_hash);
    }

    #[tokio::test]
    async fn update_to_taken_phone_conflicts_without_write() {
        let (st, repo) = with_memory();
        let ann_id = register(&st, ann()).await.unwrap().id;
        let bob_id = register(
            &st,
            RegisterRequest {
                full_name: "Bob".into(),
                phone_number: "+628222".into(),
                password: "pw2".into(),
            },
        )
        .await
        .unwrap()
        .id;

        let req = UpdateProfileRequest {
            full_name: Some("Bobby".into()),
            phone_number: Some("+628111".into()),
        };
        let err = update_profile(&st, AuthUser(bob_id), req).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        let bob = repo.snapshot(bob_id).unwrap();
        assert_eq!(bob.full_name, "Bob");
        assert_eq!(bob.phone_number, "+628222");
        assert_eq!(repo.snapshot(ann_id).unwrap().phone_number, "+628111");
    }

    #[tokio::test]
    async fn update_applies_present_fields_only() {
        let (st, repo) = with_memory();
        let id = register(&st, ann()).await.unwrap().id;

        let req = UpdateProfileRequest {
            full_name: Some("Annie".into()),
            phone_number: None,
        };
        let outcome = update_profile(&st, AuthUser(id), req).await.unwrap();
        assert_eq!(outcome, UpdateOutcome::Updated(UserIdResponse { id }));

        let stored = repo.snapshot(id).unwrap();
        assert_eq!(stored.full_name, "Annie");
        assert_eq!(stored.phone_number, "+628111");
    }

    #[tokio::test]
    async fn update_to_own_phone_is_allowed() {
        let (st, _) = with_memory();
        let id = register(&st, ann()).await.unwrap().id;
        let req = UpdateProfileRequest {
            full_name: None,
            phone_number: Some("+628111".into()),
        };
        assert!(update_profile(&st, AuthUser(id), req).await.is_ok());
    }

    #[tokio::test]
    async fn update_validates_phone_format() {
        let (st, _) = with_memory();
        let id = register(&st, ann()).await.unwrap().id;
        let req = UpdateProfileRequest {
            full_name: None,
            phone_number: Some("0811".into()),
        };
        let err = update_profile(&st, AuthUser(id), req).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidFormat(_)));
    }

    #[tokio::test]
    async fn update_for_vanished_user_is_not_found() {
        let (st, _) = with_memory();
        let req = UpdateProfileRequest {
            full_name: Some("Ghost".into()),
            phone_number: None,
        };
        let err = update_profile(&st, AuthUser(404), req).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
