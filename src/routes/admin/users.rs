use actix_web::{Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::domain::auth::{AdminModel, AuthenticatedUser};
use crate::dto::admin::{ChangeListQuery, ModelPermissions};
use crate::forms::users::UserAddForm;
use crate::repository::DieselRepository;
use crate::routes::admin::{
    add_url, change_url, delete_url, model_context, render_delete_confirmation,
};
use crate::routes::main::ADMIN_URL;
use crate::routes::{redirect, render_template, service_error_response};
use crate::services::users;

const MODEL: AdminModel = AdminModel::User;

#[get("/auth/user/")]
pub async fn changelist(
    user: AuthenticatedUser,
    query: web::Query<ChangeListQuery>,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    match users::list_users(repo.get_ref(), &user, query.into_inner()) {
        Ok(data) => {
            let mut context = model_context(&flash_messages, &user, MODEL, &data.perms);
            context.insert("users", &data.users);
            context.insert("search", &data.search);
            context.insert("is_staff", &data.is_staff);
            context.insert("is_superuser", &data.is_superuser);
            context.insert("is_active", &data.is_active);
            render_template(&tera, "admin/user_list.html", &context)
        }
        Err(err) => service_error_response(err, ADMIN_URL),
    }
}

#[get("/auth/user/add/")]
pub async fn add_form(
    user: AuthenticatedUser,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    match users::ensure_can_add_user(&user) {
        Ok(()) => {
            let perms = ModelPermissions::for_user(&user, MODEL);
            let context = model_context(&flash_messages, &user, MODEL, &perms);
            render_template(&tera, "admin/user_add.html", &context)
        }
        Err(err) => service_error_response(err, ADMIN_URL),
    }
}

/// New accounts continue to their change page to set flags and groups.
#[post("/auth/user/add/")]
pub async fn add(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<UserAddForm>,
) -> impl Responder {
    match users::add_user(repo.get_ref(), &user, form) {
        Ok(created) => {
            FlashMessage::success(format!(
                "The user “{}” was added successfully. You may edit it again below.",
                created.username
            ))
            .send();
            redirect(&change_url(MODEL, created.id))
        }
        Err(err) => service_error_response(err, &add_url(MODEL)),
    }
}

#[get("/auth/user/{user_id}/change/")]
pub async fn change_form(
    user: AuthenticatedUser,
    user_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    match users::load_user(repo.get_ref(), &user, user_id.into_inner()) {
        Ok(data) => {
            let mut context = model_context(&flash_messages, &user, MODEL, &data.perms);
            context.insert("delete_url", &delete_url(MODEL, data.user.id));
            context.insert("account", &data.user);
            context.insert("groups", &data.groups);
            context.insert("member_of", &data.member_of);
            render_template(&tera, "admin/user_change.html", &context)
        }
        Err(err) => service_error_response(err, &MODEL.admin_url()),
    }
}

#[post("/auth/user/{user_id}/change/")]
pub async fn change(
    user: AuthenticatedUser,
    user_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
    body: web::Bytes,
) -> impl Responder {
    let user_id = user_id.into_inner();
    match users::update_user(repo.get_ref(), &user, user_id, &body) {
        Ok(updated) => {
            FlashMessage::success(format!(
                "The user “{}” was changed successfully.",
                updated.username
            ))
            .send();
            redirect(&MODEL.admin_url())
        }
        Err(err) => service_error_response(err, &change_url(MODEL, user_id)),
    }
}

#[get("/auth/user/{user_id}/delete/")]
pub async fn delete_form(
    user: AuthenticatedUser,
    user_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    match users::load_delete_user(repo.get_ref(), &user, user_id.into_inner()) {
        Ok(target) => {
            let perms = ModelPermissions::for_user(&user, MODEL);
            let context = model_context(&flash_messages, &user, MODEL, &perms);
            render_delete_confirmation(
                &tera,
                context,
                target.username.as_str(),
                &change_url(MODEL, target.id),
                &[],
            )
        }
        Err(err) => service_error_response(err, &MODEL.admin_url()),
    }
}

#[post("/auth/user/{user_id}/delete/")]
pub async fn delete(
    user: AuthenticatedUser,
    user_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match users::delete_user(repo.get_ref(), &user, user_id.into_inner()) {
        Ok(deleted) => {
            FlashMessage::success(format!(
                "The user “{}” was deleted successfully.",
                deleted.username
            ))
            .send();
            redirect(&MODEL.admin_url())
        }
        Err(err) => service_error_response(err, &MODEL.admin_url()),
    }
}
