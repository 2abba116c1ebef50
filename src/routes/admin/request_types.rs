use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::domain::auth::{AdminModel, AuthenticatedUser};
use crate::dto::admin::{ChangeListQuery, ModelPermissions, RequestTypeFormPageData};
use crate::forms::request_types::RequestTypeForm;
use crate::repository::DieselRepository;
use crate::routes::admin::{
    add_url, change_url, delete_url, model_context, render_delete_confirmation,
};
use crate::routes::main::ADMIN_URL;
use crate::routes::{redirect, render_template, service_error_response};
use crate::services::request_types;

const MODEL: AdminModel = AdminModel::RequestType;

#[get("/main/requesttype/")]
pub async fn changelist(
    user: AuthenticatedUser,
    query: web::Query<ChangeListQuery>,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    match request_types::list_request_types(repo.get_ref(), &user, query.into_inner()) {
        Ok(data) => {
            let mut context = model_context(&flash_messages, &user, MODEL, &data.perms);
            context.insert("request_types", &data.request_types);
            context.insert("search", &data.search);
            render_template(&tera, "admin/request_type_list.html", &context)
        }
        Err(err) => service_error_response(err, ADMIN_URL),
    }
}

fn render_form(
    tera: &Tera,
    flash_messages: &IncomingFlashMessages,
    user: &AuthenticatedUser,
    data: RequestTypeFormPageData,
) -> HttpResponse {
    let mut context = model_context(flash_messages, user, MODEL, &data.perms);
    if let Some(request_type) = &data.request_type {
        context.insert("delete_url", &delete_url(MODEL, request_type.id));
    }
    context.insert("request_type", &data.request_type);
    render_template(tera, "admin/request_type_form.html", &context)
}

#[get("/main/requesttype/add/")]
pub async fn add_form(
    user: AuthenticatedUser,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    match request_types::load_add_request_type(&user) {
        Ok(data) => render_form(&tera, &flash_messages, &user, data),
        Err(err) => service_error_response(err, ADMIN_URL),
    }
}

#[post("/main/requesttype/add/")]
pub async fn add(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<RequestTypeForm>,
) -> impl Responder {
    match request_types::add_request_type(repo.get_ref(), &user, form) {
        Ok(request_type) => {
            FlashMessage::success(format!(
                "The request type “{}” was added successfully.",
                request_type.name
            ))
            .send();
            redirect(&MODEL.admin_url())
        }
        Err(err) => service_error_response(err, &add_url(MODEL)),
    }
}

#[get("/main/requesttype/{request_type_id}/change/")]
pub async fn change_form(
    user: AuthenticatedUser,
    request_type_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    match request_types::load_request_type(repo.get_ref(), &user, request_type_id.into_inner()) {
        Ok(data) => render_form(&tera, &flash_messages, &user, data),
        Err(err) => service_error_response(err, &MODEL.admin_url()),
    }
}

#[post("/main/requesttype/{request_type_id}/change/")]
pub async fn change(
    user: AuthenticatedUser,
    request_type_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<RequestTypeForm>,
) -> impl Responder {
    let request_type_id = request_type_id.into_inner();
    match request_types::update_request_type(repo.get_ref(), &user, request_type_id, form) {
        Ok(request_type) => {
            FlashMessage::success(format!(
                "The request type “{}” was changed successfully.",
                request_type.name
            ))
            .send();
            redirect(&MODEL.admin_url())
        }
        Err(err) => service_error_response(err, &change_url(MODEL, request_type_id)),
    }
}

#[get("/main/requesttype/{request_type_id}/delete/")]
pub async fn delete_form(
    user: AuthenticatedUser,
    request_type_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    match request_types::load_delete_request_type(
        repo.get_ref(),
        &user,
        request_type_id.into_inner(),
    ) {
        Ok(request_type) => {
            let perms = ModelPermissions::for_user(&user, MODEL);
            let context = model_context(&flash_messages, &user, MODEL, &perms);
            render_delete_confirmation(
                &tera,
                context,
                request_type.name.as_str(),
                &change_url(MODEL, request_type.id),
                &[],
            )
        }
        Err(err) => service_error_response(err, &MODEL.admin_url()),
    }
}

#[post("/main/requesttype/{request_type_id}/delete/")]
pub async fn delete(
    user: AuthenticatedUser,
    request_type_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match request_types::delete_request_type(repo.get_ref(), &user, request_type_id.into_inner())
    {
        Ok(request_type) => {
            FlashMessage::success(format!(
                "The request type “{}” was deleted successfully.",
                request_type.name
            ))
            .send();
            redirect(&MODEL.admin_url())
        }
        Err(err) => service_error_response(err, &MODEL.admin_url()),
    }
}
