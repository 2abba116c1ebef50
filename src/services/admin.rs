//! Admin panel landing page.

use crate::domain::auth::{AdminModel, AuthenticatedUser};
use crate::dto::admin::{AdminIndexData, AdminIndexEntry, ModelPermissions};
use crate::services::{ServiceError, ServiceResult};

/// Lists the registered models the user may open.
pub fn load_index(user: &AuthenticatedUser) -> ServiceResult<AdminIndexData> {
    if !user.is_admin_member() {
        return Err(ServiceError::Unauthorized);
    }

    let models = AdminModel::ALL
        .into_iter()
        .filter_map(|model| {
            let perms = ModelPermissions::for_user(user, model);
            (perms.can_view_or_change() || perms.can_add).then(|| AdminIndexEntry {
                app_label: model.app_label(),
                name: model.verbose_name_plural(),
                url: model.admin_url(),
                perms,
            })
        })
        .collect();

    Ok(AdminIndexData { models })
}
