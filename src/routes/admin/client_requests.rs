use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::domain::auth::{AdminModel, AuthenticatedUser};
use crate::dto::admin::{ChangeListQuery, ClientRequestFormPageData, ModelPermissions};
use crate::forms::client_requests::{BulkAction, ClientRequestForm};
use crate::repository::DieselRepository;
use crate::routes::admin::{
    add_url, change_url, created_filter_choices, delete_url, model_context,
    render_delete_confirmation, status_choices,
};
use crate::routes::main::ADMIN_URL;
use crate::routes::{redirect, render_template, service_error_response};
use crate::services::client_requests;

const MODEL: AdminModel = AdminModel::ClientRequest;

#[get("/main/clientrequest/")]
pub async fn changelist(
    user: AuthenticatedUser,
    query: web::Query<ChangeListQuery>,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    match client_requests::list_client_requests(repo.get_ref(), &user, query.into_inner()) {
        Ok(data) => {
            let mut context = model_context(&flash_messages, &user, MODEL, &data.perms);
            context.insert("requests", &data.requests);
            context.insert("search", &data.search);
            context.insert("status", &data.status);
            context.insert("status_choices", &status_choices());
            context.insert("created", data.created.param());
            context.insert("created_filters", &created_filter_choices());
            context.insert(
                "actions",
                &[(
                    BulkAction::MarkAsCompleted.name(),
                    BulkAction::MarkAsCompleted.label(),
                )],
            );
            render_template(&tera, "admin/client_request_list.html", &context)
        }
        Err(err) => service_error_response(err, ADMIN_URL),
    }
}

/// Bulk actions are posted back to the changelist.
#[post("/main/clientrequest/")]
pub async fn bulk_action(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    body: web::Bytes,
) -> impl Responder {
    match client_requests::run_bulk_action(repo.get_ref(), &user, &body) {
        Ok(message) => {
            FlashMessage::success(message).send();
            redirect(&MODEL.admin_url())
        }
        Err(err) => service_error_response(err, &MODEL.admin_url()),
    }
}

fn render_form(
    tera: &Tera,
    flash_messages: &IncomingFlashMessages,
    user: &AuthenticatedUser,
    data: ClientRequestFormPageData,
) -> HttpResponse {
    let mut context = model_context(flash_messages, user, MODEL, &data.perms);
    if let Some(request) = &data.request {
        context.insert("delete_url", &delete_url(MODEL, request.id));
    }
    context.insert("request", &data.request);
    context.insert("clients", &data.clients);
    context.insert("request_types", &data.request_types);
    context.insert("status_choices", &status_choices());
    render_template(tera, "admin/client_request_form.html", &context)
}

#[get("/main/clientrequest/add/")]
pub async fn add_form(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    match client_requests::load_add_client_request(repo.get_ref(), &user) {
        Ok(data) => render_form(&tera, &flash_messages, &user, data),
        Err(err) => service_error_response(err, ADMIN_URL),
    }
}

#[post("/main/clientrequest/add/")]
pub async fn add(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<ClientRequestForm>,
) -> impl Responder {
    match client_requests::add_client_request(repo.get_ref(), &user, form) {
        Ok(request) => {
            FlashMessage::success(format!(
                "The client request “#{}” was added successfully.",
                request.id
            ))
            .send();
            redirect(&MODEL.admin_url())
        }
        Err(err) => service_error_response(err, &add_url(MODEL)),
    }
}

#[get("/main/clientrequest/{request_id}/change/")]
pub async fn change_form(
    user: AuthenticatedUser,
    request_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    match client_requests::load_client_request(repo.get_ref(), &user, request_id.into_inner()) {
        Ok(data) => render_form(&tera, &flash_messages, &user, data),
        Err(err) => service_error_response(err, &MODEL.admin_url()),
    }
}

#[post("/main/clientrequest/{request_id}/change/")]
pub async fn change(
    user: AuthenticatedUser,
    request_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<ClientRequestForm>,
) -> impl Responder {
    let request_id = request_id.into_inner();
    match client_requests::update_client_request(repo.get_ref(), &user, request_id, form) {
        Ok(request) => {
            FlashMessage::success(format!(
                "The client request “#{}” was changed successfully.",
                request.id
            ))
            .send();
            redirect(&MODEL.admin_url())
        }
        Err(err) => service_error_response(err, &change_url(MODEL, request_id)),
    }
}

#[get("/main/clientrequest/{request_id}/delete/")]
pub async fn delete_form(
    user: AuthenticatedUser,
    request_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    match client_requests::load_delete_client_request(
        repo.get_ref(),
        &user,
        request_id.into_inner(),
    ) {
        Ok(request) => {
            let perms = ModelPermissions::for_user(&user, MODEL);
            let context = model_context(&flash_messages, &user, MODEL, &perms);
            render_delete_confirmation(
                &tera,
                context,
                &format!("#{}", request.id),
                &change_url(MODEL, request.id),
                &[],
            )
        }
        Err(err) => service_error_response(err, &MODEL.admin_url()),
    }
}

#[post("/main/clientrequest/{request_id}/delete/")]
pub async fn delete(
    user: AuthenticatedUser,
    request_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match client_requests::delete_client_request(repo.get_ref(), &user, request_id.into_inner()) {
        Ok(request) => {
            FlashMessage::success(format!(
                "The client request “#{}” was deleted successfully.",
                request.id
            ))
            .send();
            redirect(&MODEL.admin_url())
        }
        Err(err) => service_error_response(err, &MODEL.admin_url()),
    }
}
