//! Public pages: landing page, registration, login and logout.

use actix_identity::Identity;
use actix_web::{HttpMessage, HttpRequest, HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use log::error;
use serde::Deserialize;
use tera::Tera;

use crate::domain::auth::AuthenticatedUser;
use crate::forms::auth::{LoginForm, RegisterForm, safe_next};
use crate::middleware::LOGIN_URL;
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_template};
use crate::services::ServiceError;
use crate::services::auth::{self, INVALID_LOGIN_MESSAGE, LoginOutcome};

pub const ADMIN_URL: &str = "/admin/";
pub const ACCOUNT_DISABLED_URL: &str = "/account-disabled/";

fn is_admin(user: &Option<AuthenticatedUser>) -> bool {
    user.as_ref().is_some_and(AuthenticatedUser::is_admin_member)
}

#[get("/")]
pub async fn home(
    user: Option<AuthenticatedUser>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    if is_admin(&user) {
        return redirect(ADMIN_URL);
    }

    let context = base_context(&flash_messages, user.as_ref(), "home");
    render_template(&tera, "main/home.html", &context)
}

fn render_register(
    tera: &Tera,
    flash_messages: &IncomingFlashMessages,
    username: &str,
    email: &str,
    errors: &[String],
) -> HttpResponse {
    let mut context = base_context(flash_messages, None, "register");
    context.insert("username", username);
    context.insert("email", email);
    context.insert("errors", errors);
    render_template(tera, "main/register.html", &context)
}

#[get("/register/")]
pub async fn show_register(
    user: Option<AuthenticatedUser>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    if is_admin(&user) {
        return redirect(ADMIN_URL);
    }
    render_register(&tera, &flash_messages, "", "", &[])
}

#[post("/register/")]
pub async fn register(
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
    web::Form(form): web::Form<RegisterForm>,
) -> impl Responder {
    let username = form.username.clone();
    let email = form.email.clone();

    match auth::register(repo.get_ref(), form) {
        Ok(_) => {
            FlashMessage::success("You have successfully registered. Please log in.".to_string())
                .send();
            redirect(LOGIN_URL)
        }
        Err(ServiceError::Form(message)) => {
            render_register(&tera, &flash_messages, &username, &email, &[message])
        }
        Err(err) => {
            error!("Failed to register {username}: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[derive(Deserialize)]
struct LoginQuery {
    next: Option<String>,
}

fn render_login(
    tera: &Tera,
    flash_messages: &IncomingFlashMessages,
    username: &str,
    next: Option<&str>,
    error: Option<&str>,
) -> HttpResponse {
    let mut context = base_context(flash_messages, None, "login");
    context.insert("username", username);
    context.insert("next", &safe_next(next));
    context.insert("error", &error);
    render_template(tera, "main/login.html", &context)
}

#[get("/login/")]
pub async fn show_login(
    user: Option<AuthenticatedUser>,
    query: web::Query<LoginQuery>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    if is_admin(&user) {
        return redirect(safe_next(query.next.as_deref()).unwrap_or(ADMIN_URL));
    }
    render_login(&tera, &flash_messages, "", query.next.as_deref(), None)
}

#[post("/login/")]
pub async fn login(
    req: HttpRequest,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
    web::Form(form): web::Form<LoginForm>,
) -> impl Responder {
    match auth::login(repo.get_ref(), &form) {
        Ok(LoginOutcome::Admin(user)) => {
            if let Err(err) = Identity::login(&req.extensions(), user.id.to_string()) {
                error!("Failed to start session for {}: {err}", user.username);
                return HttpResponse::InternalServerError().finish();
            }
            FlashMessage::success(format!(
                "Welcome back, {}! You have successfully logged in.",
                user.username
            ))
            .send();
            redirect(safe_next(form.next.as_deref()).unwrap_or(ADMIN_URL))
        }
        Ok(LoginOutcome::Disabled(_)) => {
            FlashMessage::error(
                "Your account has been disabled. Please contact an administrator.".to_string(),
            )
            .send();
            redirect(ACCOUNT_DISABLED_URL)
        }
        Ok(LoginOutcome::InvalidCredentials) => render_login(
            &tera,
            &flash_messages,
            &form.username,
            form.next.as_deref(),
            Some(INVALID_LOGIN_MESSAGE),
        ),
        Err(err) => {
            error!("Login failed: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/logout/")]
pub async fn logout(identity: Option<Identity>) -> impl Responder {
    if let Some(identity) = identity {
        identity.logout();
        FlashMessage::info("You have been logged out.".to_string()).send();
    }
    redirect("/")
}

#[get("/account-disabled/")]
pub async fn account_disabled(
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let context = base_context(&flash_messages, None, "account_disabled");
    render_template(&tera, "main/account_disabled.html", &context)
}
