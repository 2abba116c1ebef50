//! Login, registration and session user resolution.

use chrono::Utc;

use crate::domain::auth::AuthenticatedUser;
use crate::domain::types::{GroupName, UserId, Username};
use crate::domain::user::{NewUser, User};
use crate::forms::auth::{LoginForm, RegisterForm, RegisterPayload};
use crate::password::{hash_password, verify_password};
use crate::repository::{GroupReader, UserReader, UserWriter};
use crate::services::permissions::LIMITED_USERS_GROUP;
use crate::services::{ServiceError, ServiceResult};

pub const INVALID_LOGIN_MESSAGE: &str =
    "Please enter a correct username and password. Note that both fields may be case-sensitive.";

/// Result of checking submitted credentials.
#[derive(Debug)]
pub enum LoginOutcome {
    /// Staff (or superuser) account; a session should be started.
    Admin(User),
    /// Credentials are valid but the account may not use the admin panel.
    Disabled(User),
    InvalidCredentials,
}

/// Authenticates the form credentials and decides where the user goes next.
///
/// Successful staff logins get their `last_login` stamped.
pub fn login<R>(repo: &R, form: &LoginForm) -> ServiceResult<LoginOutcome>
where
    R: UserReader + UserWriter + ?Sized,
{
    let Ok(username) = Username::new(form.username.as_str()) else {
        return Ok(LoginOutcome::InvalidCredentials);
    };

    let Some(user) = repo.get_user_by_username(&username)? else {
        log::info!("Login attempt for unknown user {username}");
        return Ok(LoginOutcome::InvalidCredentials);
    };

    if !verify_password(&form.password, &user.password_hash) {
        log::info!("Wrong password for user {username}");
        return Ok(LoginOutcome::InvalidCredentials);
    }

    // Inactive accounts with the right password land on the disabled page
    // instead of failing as invalid credentials.
    if user.is_disabled() {
        log::info!("Disabled account {username} tried to log in");
        return Ok(LoginOutcome::Disabled(user));
    }

    repo.record_login(user.id, Utc::now().naive_utc())?;
    Ok(LoginOutcome::Admin(user))
}

/// Creates a staff account and places it in the restricted group when the
/// group exists.
pub fn register<R>(repo: &R, form: RegisterForm) -> ServiceResult<User>
where
    R: UserReader + UserWriter + GroupReader + ?Sized,
{
    let payload = RegisterPayload::try_from(form)?;

    if repo.get_user_by_username(&payload.username)?.is_some() {
        return Err(ServiceError::Form(
            "A user with that username already exists.".to_string(),
        ));
    }

    let password_hash = hash_password(&payload.password)?;
    let new_user = NewUser::new(payload.username, Some(payload.email), password_hash).staff(true);
    let user = repo.create_user(&new_user)?;

    match repo.get_group_by_name(&GroupName::new(LIMITED_USERS_GROUP)?)? {
        Some(group) => repo.add_user_to_group(user.id, group.id)?,
        None => log::warn!(
            "Group {LIMITED_USERS_GROUP} is missing; {} left ungrouped",
            user.username
        ),
    }

    log::info!("Registered user {}", user.username);
    Ok(user)
}

/// Resolves the session user with its permissions. Unknown and inactive
/// accounts resolve to `None`.
pub fn load_authenticated_user<R>(
    repo: &R,
    user_id: UserId,
) -> ServiceResult<Option<AuthenticatedUser>>
where
    R: UserReader + ?Sized,
{
    let Some(user) = repo.get_user_by_id(user_id)? else {
        return Ok(None);
    };
    if !user.is_active {
        return Ok(None);
    }

    let permissions = repo.list_user_permissions(user.id)?;
    Ok(Some(AuthenticatedUser::new(&user, permissions)))
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::types::GroupId;
    use crate::domain::user::Group;
    use crate::repository::mock::MockRepository;

    fn stored_user(username: &str, password: &str, is_staff: bool, is_superuser: bool) -> User {
        User {
            id: UserId::new(5).unwrap(),
            username: Username::new(username).unwrap(),
            email: None,
            password_hash: hash_password(password).unwrap(),
            is_active: true,
            is_staff,
            is_superuser,
            date_joined: Utc::now().naive_utc(),
            last_login: None,
        }
    }

    fn login_form(username: &str, password: &str) -> LoginForm {
        LoginForm {
            username: username.to_string(),
            password: password.to_string(),
            next: None,
        }
    }

    #[test]
    fn staff_login_records_timestamp() {
        let mut repo = MockRepository::new();
        let user = stored_user("adminuser", "adminpass123", true, false);
        repo.expect_get_user_by_username()
            .returning(move |_| Ok(Some(user.clone())));
        repo.expect_record_login().times(1).returning(|_, _| Ok(()));

        let outcome = login(&repo, &login_form("adminuser", "adminpass123")).unwrap();
        assert!(matches!(outcome, LoginOutcome::Admin(u) if u.username.as_str() == "adminuser"));
    }

    #[test]
    fn superuser_login_is_admin() {
        let mut repo = MockRepository::new();
        let user = stored_user("superuser", "superpass123", true, true);
        repo.expect_get_user_by_username()
            .returning(move |_| Ok(Some(user.clone())));
        repo.expect_record_login().returning(|_, _| Ok(()));

        let outcome = login(&repo, &login_form("superuser", "superpass123")).unwrap();
        assert!(matches!(outcome, LoginOutcome::Admin(_)));
    }

    #[test]
    fn non_staff_login_is_disabled() {
        let mut repo = MockRepository::new();
        let user = stored_user("newuser", "password123", false, false);
        repo.expect_get_user_by_username()
            .returning(move |_| Ok(Some(user.clone())));
        repo.expect_record_login().never();

        let outcome = login(&repo, &login_form("newuser", "password123")).unwrap();
        assert!(matches!(outcome, LoginOutcome::Disabled(_)));
    }

    #[test]
    fn inactive_staff_with_valid_password_is_disabled() {
        let mut repo = MockRepository::new();
        let user = User {
            is_active: false,
            ..stored_user("formerstaff", "password123", true, false)
        };
        repo.expect_get_user_by_username()
            .returning(move |_| Ok(Some(user.clone())));
        repo.expect_record_login().never();

        let outcome = login(&repo, &login_form("formerstaff", "password123")).unwrap();
        assert!(matches!(outcome, LoginOutcome::Disabled(u) if !u.is_active));

        let outcome = login(&repo, &login_form("formerstaff", "wrong")).unwrap();
        assert!(matches!(outcome, LoginOutcome::InvalidCredentials));
    }

    #[test]
    fn wrong_password_is_invalid() {
        let mut repo = MockRepository::new();
        let user = stored_user("newuser", "password123", true, false);
        repo.expect_get_user_by_username()
            .returning(move |_| Ok(Some(user.clone())));

        let outcome = login(&repo, &login_form("newuser", "wrongpassword")).unwrap();
        assert!(matches!(outcome, LoginOutcome::InvalidCredentials));
    }

    #[test]
    fn unknown_or_malformed_username_is_invalid() {
        let mut repo = MockRepository::new();
        repo.expect_get_user_by_username().returning(|_| Ok(None));

        assert!(matches!(
            login(&repo, &login_form("ghost", "whatever")).unwrap(),
            LoginOutcome::InvalidCredentials
        ));
        assert!(matches!(
            login(&repo, &login_form("bad name", "whatever")).unwrap(),
            LoginOutcome::InvalidCredentials
        ));
    }

    fn register_form() -> RegisterForm {
        RegisterForm {
            username: "newuser".to_string(),
            email: "test@example.com".to_string(),
            password: "strongpass123".to_string(),
            password_confirm: "strongpass123".to_string(),
        }
    }

    #[test]
    fn registration_creates_staff_in_limited_group() {
        let mut repo = MockRepository::new();
        repo.expect_get_user_by_username().returning(|_| Ok(None));
        repo.expect_create_user().times(1).returning(|new_user| {
            assert!(new_user.is_staff);
            assert!(!new_user.is_superuser);
            assert!(new_user.password_hash.starts_with("$argon2"));
            Ok(User {
                id: UserId::new(9).unwrap(),
                username: new_user.username.clone(),
                email: new_user.email.clone(),
                password_hash: new_user.password_hash.clone(),
                is_active: true,
                is_staff: true,
                is_superuser: false,
                date_joined: Utc::now().naive_utc(),
                last_login: None,
            })
        });
        repo.expect_get_group_by_name().returning(|name| {
            Ok(Some(Group {
                id: GroupId::new(2).unwrap(),
                name: name.clone(),
            }))
        });
        repo.expect_add_user_to_group()
            .times(1)
            .returning(|user_id, group_id| {
                assert_eq!(user_id.get(), 9);
                assert_eq!(group_id.get(), 2);
                Ok(())
            });

        let user = register(&repo, register_form()).unwrap();
        assert_eq!(user.username.as_str(), "newuser");
    }

    #[test]
    fn registration_without_group_still_succeeds() {
        let mut repo = MockRepository::new();
        repo.expect_get_user_by_username().returning(|_| Ok(None));
        repo.expect_create_user().returning(|new_user| {
            Ok(User {
                id: UserId::new(9).unwrap(),
                username: new_user.username.clone(),
                email: new_user.email.clone(),
                password_hash: new_user.password_hash.clone(),
                is_active: true,
                is_staff: true,
                is_superuser: false,
                date_joined: Utc::now().naive_utc(),
                last_login: None,
            })
        });
        repo.expect_get_group_by_name().returning(|_| Ok(None));
        repo.expect_add_user_to_group().never();

        assert!(register(&repo, register_form()).is_ok());
    }

    #[test]
    fn duplicate_username_is_a_form_error() {
        let mut repo = MockRepository::new();
        let existing = stored_user("newuser", "whatever", true, false);
        repo.expect_get_user_by_username()
            .returning(move |_| Ok(Some(existing.clone())));
        repo.expect_create_user().never();

        assert!(matches!(
            register(&repo, register_form()),
            Err(ServiceError::Form(_))
        ));
    }

    #[test]
    fn inactive_session_user_is_anonymous() {
        let mut repo = MockRepository::new();
        let mut user = stored_user("adminuser", "x", true, false);
        user.is_active = false;
        repo.expect_get_user_by_id()
            .returning(move |_| Ok(Some(user.clone())));
        repo.expect_list_user_permissions().never();

        assert!(
            load_authenticated_user(&repo, UserId::new(5).unwrap())
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn session_user_carries_permissions() {
        let mut repo = MockRepository::new();
        let user = stored_user("limiteduser", "x", true, false);
        repo.expect_get_user_by_id()
            .returning(move |_| Ok(Some(user.clone())));
        repo.expect_list_user_permissions()
            .returning(|_| Ok(vec!["main.view_client".to_string()]));

        let user = load_authenticated_user(&repo, UserId::new(5).unwrap())
            .unwrap()
            .unwrap();
        assert!(user.has_perm("main.view_client"));
        assert!(!user.has_perm("main.delete_client"));
    }
}
