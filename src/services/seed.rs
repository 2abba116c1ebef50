//! Demo data for development databases.
//!
//! Every routine checks for existing rows first, so running it at each
//! start-up only ever creates what is missing.

use crate::domain::client::NewClient;
use crate::domain::types::{
    ClientEmail, ClientName, CompanyUrl, ContactNumber, GroupName, PermissionId, UserEmail,
    Username,
};
use crate::domain::user::NewUser;
use crate::password::hash_password;
use crate::repository::{
    ClientReader, ClientWriter, GroupReader, GroupWriter, PermissionReader, UserReader,
    UserWriter,
};
use crate::services::ServiceResult;
use crate::services::permissions::{LIMITED_USERS_GROUP, create_limited_users_permission_group};

/// Accounts created by [`seed_example_users`], in creation order.
pub const SEEDED_USERNAMES: [&str; 4] =
    ["superadmin", "adminuser", "limiteduser", "nopermissionsuser"];

struct DemoClient {
    name: &'static str,
    email: &'static str,
    contact_number: &'static str,
    company_url: &'static str,
    is_active: bool,
}

const DEMO_CLIENTS: [DemoClient; 3] = [
    DemoClient {
        name: "vetpartners",
        email: "vetpartners@site.com",
        contact_number: "07999999",
        company_url: "https://www.vetpartners.co.uk/",
        is_active: true,
    },
    DemoClient {
        name: "dcc",
        email: "dcc@site.com",
        contact_number: "07899999",
        company_url: "https://dccpropane.com/",
        is_active: true,
    },
    DemoClient {
        name: "curaleaf",
        email: "curaleaf@site.com",
        contact_number: "07891999",
        company_url: "https://curaleafpharmacy.co.uk/",
        is_active: false,
    },
];

/// Inserts the demo clients that do not exist yet, matched by name.
/// Returns the names created.
pub fn seed_example_clients<R>(repo: &R) -> ServiceResult<Vec<String>>
where
    R: ClientReader + ClientWriter + ?Sized,
{
    let mut created = Vec::new();

    for demo in &DEMO_CLIENTS {
        let name = ClientName::new(demo.name)?;
        if repo.get_client_by_name(&name)?.is_some() {
            continue;
        }

        let new_client = NewClient::new(
            name,
            ClientEmail::new(demo.email)?,
            ContactNumber::new(demo.contact_number)?,
            CompanyUrl::new(demo.company_url)?,
            demo.is_active,
        );
        repo.create_client(&new_client)?;
        created.push(demo.name.to_string());
    }

    Ok(created)
}

/// Creates the demo accounts that do not exist yet and returns their
/// usernames:
///
/// * `superadmin`: superuser;
/// * `adminuser`: staff with every permission attached directly;
/// * `limiteduser`: staff in the `LimitedUsers` group;
/// * `nopermissionsuser`: not staff, so it cannot enter the admin panel.
pub fn seed_example_users<R>(repo: &R) -> ServiceResult<Vec<String>>
where
    R: UserReader + UserWriter + GroupReader + GroupWriter + PermissionReader + ?Sized,
{
    create_limited_users_permission_group(repo)?;

    let mut created = Vec::new();

    let superadmin = Username::new("superadmin")?;
    if repo.get_user_by_username(&superadmin)?.is_none() {
        let new_user = NewUser::new(
            superadmin,
            Some(UserEmail::new("superadmin@example.com")?),
            hash_password("superpass123")?,
        )
        .superuser();
        repo.create_user(&new_user)?;
        created.push("superadmin".to_string());
    }

    let adminuser = Username::new("adminuser")?;
    if repo.get_user_by_username(&adminuser)?.is_none() {
        let new_user = NewUser::new(
            adminuser,
            Some(UserEmail::new("admin@example.com")?),
            hash_password("adminpass123")?,
        )
        .staff(true);
        let user = repo.create_user(&new_user)?;
        let all_permissions = repo
            .list_permissions()?
            .into_iter()
            .map(|p| p.id)
            .collect::<Vec<PermissionId>>();
        repo.set_user_permissions(user.id, &all_permissions)?;
        created.push("adminuser".to_string());
    }

    let limiteduser = Username::new("limiteduser")?;
    if repo.get_user_by_username(&limiteduser)?.is_none() {
        let new_user = NewUser::new(
            limiteduser,
            Some(UserEmail::new("user@example.com")?),
            hash_password("userpass123")?,
        )
        .staff(true);
        let user = repo.create_user(&new_user)?;
        if let Some(group) = repo.get_group_by_name(&GroupName::new(LIMITED_USERS_GROUP)?)? {
            repo.add_user_to_group(user.id, group.id)?;
        }
        created.push("limiteduser".to_string());
    }

    let nopermissionsuser = Username::new("nopermissionsuser")?;
    if repo.get_user_by_username(&nopermissionsuser)?.is_none() {
        let new_user = NewUser::new(
            nopermissionsuser,
            Some(UserEmail::new("user@example.com")?),
            hash_password("userpass123")?,
        );
        repo.create_user(&new_user)?;
        created.push("nopermissionsuser".to_string());
    }

    Ok(created)
}

/// Deletes the accounts created by [`seed_example_users`], returning how
/// many existed.
pub fn delete_seeded_users<R>(repo: &R) -> ServiceResult<usize>
where
    R: UserWriter + ?Sized,
{
    let usernames = SEEDED_USERNAMES
        .iter()
        .map(|name| Username::new(*name))
        .collect::<Result<Vec<_>, _>>()?;

    let deleted = repo.delete_users_by_username(&usernames)?;
    log::info!("Deleted {deleted} seeded user(s)");
    Ok(deleted)
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::client::Client;
    use crate::domain::types::{ClientId, GroupId, UserId};
    use crate::domain::user::{Group, User};
    use crate::repository::mock::MockRepository;

    #[test]
    fn seeds_only_missing_clients() {
        let mut repo = MockRepository::new();
        repo.expect_get_client_by_name().returning(|name| {
            if name.as_str() == "dcc" {
                Ok(Some(Client {
                    id: ClientId::new(1).unwrap(),
                    name: name.clone(),
                    email: ClientEmail::new("dcc@site.com").unwrap(),
                    contact_number: ContactNumber::new("07899999").unwrap(),
                    company_url: CompanyUrl::new("https://dccpropane.com/").unwrap(),
                    is_active: true,
                    created_at: Utc::now().naive_utc(),
                }))
            } else {
                Ok(None)
            }
        });
        repo.expect_create_client().times(2).returning(|new_client| {
            Ok(Client {
                id: ClientId::new(2).unwrap(),
                name: new_client.name.clone(),
                email: new_client.email.clone(),
                contact_number: new_client.contact_number.clone(),
                company_url: new_client.company_url.clone(),
                is_active: new_client.is_active,
                created_at: Utc::now().naive_utc(),
            })
        });

        let created = seed_example_clients(&repo).unwrap();
        assert_eq!(created, vec!["vetpartners", "curaleaf"]);
    }

    fn existing_user(username: &Username) -> User {
        User {
            id: UserId::new(1).unwrap(),
            username: username.clone(),
            email: None,
            password_hash: String::new(),
            is_active: true,
            is_staff: true,
            is_superuser: false,
            date_joined: Utc::now().naive_utc(),
            last_login: None,
        }
    }

    #[test]
    fn existing_users_are_left_alone() {
        let mut repo = MockRepository::new();
        repo.expect_get_or_create_group().returning(|name| {
            Ok(Group {
                id: GroupId::new(1).unwrap(),
                name: name.clone(),
            })
        });
        repo.expect_get_content_type().returning(|_, _| Ok(None));
        repo.expect_get_user_by_username()
            .returning(|username| Ok(Some(existing_user(username))));
        repo.expect_create_user().never();

        assert!(seed_example_users(&repo).unwrap().is_empty());
    }

    #[test]
    fn deletes_the_four_seeded_usernames() {
        let mut repo = MockRepository::new();
        repo.expect_delete_users_by_username()
            .times(1)
            .returning(|usernames| {
                let names = usernames.iter().map(|u| u.as_str()).collect::<Vec<_>>();
                assert_eq!(names, SEEDED_USERNAMES);
                Ok(3)
            });

        assert_eq!(delete_seeded_users(&repo).unwrap(), 3);
    }
}
