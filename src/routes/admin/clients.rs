use actix_web::{Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::domain::auth::{AdminModel, AuthenticatedUser};
use crate::dto::admin::{ChangeListQuery, ClientFormPageData, ModelPermissions};
use crate::forms::clients::ClientForm;
use crate::repository::DieselRepository;
use crate::routes::admin::{
    add_url, change_url, created_filter_choices, delete_url, model_context,
    render_delete_confirmation, status_choices,
};
use crate::routes::main::ADMIN_URL;
use crate::routes::{redirect, render_template, service_error_response};
use crate::services::clients;

const MODEL: AdminModel = AdminModel::Client;

#[get("/main/client/")]
pub async fn changelist(
    user: AuthenticatedUser,
    query: web::Query<ChangeListQuery>,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    match clients::list_clients(repo.get_ref(), &user, query.into_inner()) {
        Ok(data) => {
            let mut context = model_context(&flash_messages, &user, MODEL, &data.perms);
            context.insert("clients", &data.clients);
            context.insert("search", &data.search);
            context.insert("is_active", &data.is_active);
            context.insert("created", data.created.param());
            context.insert("created_filters", &created_filter_choices());
            render_template(&tera, "admin/client_list.html", &context)
        }
        Err(err) => service_error_response(err, ADMIN_URL),
    }
}

fn render_form(
    tera: &Tera,
    flash_messages: &IncomingFlashMessages,
    user: &AuthenticatedUser,
    data: ClientFormPageData,
) -> actix_web::HttpResponse {
    let mut context = model_context(flash_messages, user, MODEL, &data.perms);
    context.insert("client", &data.client);
    context.insert("requests", &data.requests);
    context.insert("request_types", &data.request_types);
    context.insert("status_choices", &status_choices());
    context.insert("can_add_request", &data.can_add_request);
    if let Some(client) = &data.client {
        context.insert("delete_url", &delete_url(MODEL, client.id));
    }
    render_template(tera, "admin/client_form.html", &context)
}

#[get("/main/client/add/")]
pub async fn add_form(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    match clients::load_add_client(repo.get_ref(), &user) {
        Ok(data) => render_form(&tera, &flash_messages, &user, data),
        Err(err) => service_error_response(err, ADMIN_URL),
    }
}

#[post("/main/client/add/")]
pub async fn add(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<ClientForm>,
) -> impl Responder {
    match clients::add_client(repo.get_ref(), &user, form) {
        Ok(client) => {
            FlashMessage::success(format!(
                "The client “{}” was added successfully.",
                client.name
            ))
            .send();
            redirect(&MODEL.admin_url())
        }
        Err(err) => service_error_response(err, &add_url(MODEL)),
    }
}

#[get("/main/client/{client_id}/change/")]
pub async fn change_form(
    user: AuthenticatedUser,
    client_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    match clients::load_client(repo.get_ref(), &user, client_id.into_inner()) {
        Ok(data) => render_form(&tera, &flash_messages, &user, data),
        Err(err) => service_error_response(err, &MODEL.admin_url()),
    }
}

#[post("/main/client/{client_id}/change/")]
pub async fn change(
    user: AuthenticatedUser,
    client_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<ClientForm>,
) -> impl Responder {
    let client_id = client_id.into_inner();
    match clients::update_client(repo.get_ref(), &user, client_id, form) {
        Ok(client) => {
            FlashMessage::success(format!(
                "The client “{}” was changed successfully.",
                client.name
            ))
            .send();
            redirect(&MODEL.admin_url())
        }
        Err(err) => service_error_response(err, &change_url(MODEL, client_id)),
    }
}

#[get("/main/client/{client_id}/delete/")]
pub async fn delete_form(
    user: AuthenticatedUser,
    client_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    match clients::load_delete_client(repo.get_ref(), &user, client_id.into_inner()) {
        Ok(data) => {
            let perms = ModelPermissions::for_user(&user, MODEL);
            let context = model_context(&flash_messages, &user, MODEL, &perms);
            let related = if data.request_count > 0 {
                vec![format!("Client requests: {}", data.request_count)]
            } else {
                Vec::new()
            };
            render_delete_confirmation(
                &tera,
                context,
                data.client.name.as_str(),
                &change_url(MODEL, data.client.id),
                &related,
            )
        }
        Err(err) => service_error_response(err, &MODEL.admin_url()),
    }
}

#[post("/main/client/{client_id}/delete/")]
pub async fn delete(
    user: AuthenticatedUser,
    client_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match clients::delete_client(repo.get_ref(), &user, client_id.into_inner()) {
        Ok(client) => {
            FlashMessage::success(format!(
                "The client “{}” was deleted successfully.",
                client.name
            ))
            .send();
            redirect(&MODEL.admin_url())
        }
        Err(err) => service_error_response(err, &MODEL.admin_url()),
    }
}
