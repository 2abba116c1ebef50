//! Admin panel handlers mounted under `/admin`.

use actix_web::{Responder, get, web};
use actix_web_flash_messages::IncomingFlashMessages;
use tera::{Context, Tera};

use crate::domain::auth::{AdminModel, AuthenticatedUser};
use crate::domain::client_request::RequestStatus;
use crate::dto::admin::ModelPermissions;
use crate::repository::CreatedFilter;
use crate::routes::main::ADMIN_URL;
use crate::routes::{base_context, render_template, service_error_response};
use crate::services::admin::load_index;

pub mod client_requests;
pub mod clients;
pub mod request_types;
pub mod users;

/// `Cache-Control` value sent with every admin response.
pub const NO_CACHE: &str = "no-cache, no-store, must-revalidate, private";

pub fn change_url(model: AdminModel, id: impl std::fmt::Display) -> String {
    format!("{}{id}/change/", model.admin_url())
}

pub fn add_url(model: AdminModel) -> String {
    format!("{}add/", model.admin_url())
}

pub fn delete_url(model: AdminModel, id: impl std::fmt::Display) -> String {
    format!("{}{id}/delete/", model.admin_url())
}

/// Base context for a model page.
pub fn model_context(
    flash_messages: &IncomingFlashMessages,
    user: &AuthenticatedUser,
    model: AdminModel,
    perms: &ModelPermissions,
) -> Context {
    let mut context = base_context(flash_messages, Some(user), model.model_name());
    context.insert("model_name", model.model_name());
    context.insert("verbose_name", model.verbose_name());
    context.insert("verbose_name_plural", model.verbose_name_plural());
    context.insert("changelist_url", &model.admin_url());
    context.insert("add_url", &add_url(model));
    context.insert("perms", perms);
    context
}

/// `(param, label)` pairs for the created-at filter sidebar.
pub fn created_filter_choices() -> Vec<(&'static str, &'static str)> {
    CreatedFilter::ALL
        .into_iter()
        .map(|filter| (filter.param(), filter.label()))
        .collect()
}

pub fn status_choices() -> Vec<String> {
    RequestStatus::CHOICES
        .iter()
        .map(ToString::to_string)
        .collect()
}

/// Renders the shared delete confirmation page.
pub fn render_delete_confirmation(
    tera: &Tera,
    mut context: Context,
    object_name: &str,
    cancel_url: &str,
    related: &[String],
) -> actix_web::HttpResponse {
    context.insert("object_name", object_name);
    context.insert("cancel_url", cancel_url);
    context.insert("related", related);
    render_template(tera, "admin/delete_confirmation.html", &context)
}

#[get("/")]
pub async fn index(
    user: AuthenticatedUser,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    match load_index(&user) {
        Ok(data) => {
            let mut context = base_context(&flash_messages, Some(&user), "admin");
            context.insert("models", &data.models);
            render_template(&tera, "admin/index.html", &context)
        }
        Err(err) => service_error_response(err, ADMIN_URL),
    }
}

/// Registers every admin page on the `/admin` scope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(index)
        .service(clients::changelist)
        .service(clients::add_form)
        .service(clients::add)
        .service(clients::change_form)
        .service(clients::change)
        .service(clients::delete_form)
        .service(clients::delete)
        .service(request_types::changelist)
        .service(request_types::add_form)
        .service(request_types::add)
        .service(request_types::change_form)
        .service(request_types::change)
        .service(request_types::delete_form)
        .service(request_types::delete)
        .service(client_requests::changelist)
        .service(client_requests::bulk_action)
        .service(client_requests::add_form)
        .service(client_requests::add)
        .service(client_requests::change_form)
        .service(client_requests::change)
        .service(client_requests::delete_form)
        .service(client_requests::delete)
        .service(users::changelist)
        .service(users::add_form)
        .service(users::add)
        .service(users::change_form)
        .service(users::change)
        .service(users::delete_form)
        .service(users::delete);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_urls() {
        assert_eq!(change_url(AdminModel::Client, 4), "/admin/main/client/4/change/");
        assert_eq!(add_url(AdminModel::User), "/admin/auth/user/add/");
        assert_eq!(
            delete_url(AdminModel::RequestType, 2),
            "/admin/main/requesttype/2/delete/"
        );
    }

    #[test]
    fn filter_choices_start_with_any() {
        let choices = created_filter_choices();
        assert_eq!(choices.first(), Some(&("", "Any date")));
        assert_eq!(status_choices()[1], "In Progress");
    }
}
