use actix_service::{Service, Transform};
use actix_web::{
    Error, FromRequest, HttpMessage, HttpRequest, HttpResponse,
    body::EitherBody,
    dev::{Payload, ServiceRequest, ServiceResponse},
    http::{Method, header::CONTENT_TYPE},
    web,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use tracing::{debug, info, trace};

use crate::api::constants;
use crate::api::jwt::get_jwt_service;
use crate::api::services::error_from_nepstay;
use crate::errors::{NepstayError, Result};
use crate::services::AuthService;
use crate::storage::Admin;

/// 已认证的管理员，由 [`AdminAuth`] 写入 request extensions
#[derive(Clone, Debug)]
pub struct AuthenticatedAdmin(pub Admin);

impl FromRequest for AuthenticatedAdmin {
    type Error = NepstayError;
    type Future = Ready<std::result::Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<AuthenticatedAdmin>()
                .cloned()
                .ok_or_else(no_token),
        )
    }
}

fn no_token() -> NepstayError {
    NepstayError::NoToken("Not authorized to access this route".to_string())
}

/// 读取会话 cookie；登出占位值视为无 token
pub fn session_token(cookie_value: Option<String>) -> Option<String> {
    cookie_value.filter(|v| !v.is_empty() && v != constants::LOGGED_OUT_VALUE)
}

/// token → 管理员：签名/过期校验，再检查账户状态
pub async fn authenticate_token(token: Option<String>, auth: &AuthService) -> Result<Admin> {
    let token = token.ok_or_else(no_token)?;
    let claims = get_jwt_service().validate_access_token(&token)?;
    auth.authorize_admin(&claims.sub).await
}

/// 公开端点上可选地识别管理员会话
pub async fn resolve_admin(req: &HttpRequest) -> Result<Admin> {
    let auth = req
        .app_data::<web::Data<AuthService>>()
        .ok_or_else(|| NepstayError::internal("AuthService not registered"))?;
    let token = session_token(req.cookie(constants::JWT_COOKIE_NAME).map(|c| c.value().to_string()));
    authenticate_token(token, auth).await
}

/// Admin authentication middleware
#[derive(Clone)]
pub struct AdminAuth;

impl<S, B> Transform<S, ServiceRequest> for AdminAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AdminAuthMiddleware<S>;
    type Future = Ready<std::result::Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AdminAuthMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct AdminAuthMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> AdminAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    /// Handle OPTIONS requests for CORS preflight
    fn handle_options_request(req: ServiceRequest) -> ServiceResponse<EitherBody<B>> {
        req.into_response(
            HttpResponse::NoContent()
                .insert_header((CONTENT_TYPE, "text/plain; charset=utf-8"))
                .finish()
                .map_into_right_body(),
        )
    }

    fn handle_unauthorized(req: ServiceRequest, err: &NepstayError) -> ServiceResponse<EitherBody<B>> {
        info!(
            "Admin authentication failed for {} {}: {}",
            req.method(),
            req.path(),
            err
        );
        req.into_response(error_from_nepstay(err).map_into_right_body())
    }
}

impl<S, B> Service<ServiceRequest> for AdminAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, std::result::Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<std::result::Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();

        Box::pin(async move {
            // Handle CORS preflight requests
            if req.method() == Method::OPTIONS {
                return Ok(Self::handle_options_request(req));
            }

            let Some(auth) = req.app_data::<web::Data<AuthService>>().cloned() else {
                let err = NepstayError::internal("AuthService not registered");
                return Ok(req.into_response(error_from_nepstay(&err).map_into_right_body()));
            };

            let token = session_token(
                req.cookie(constants::JWT_COOKIE_NAME)
                    .map(|c| c.value().to_string()),
            );
            if token.is_none() {
                debug!("No session cookie on protected route {}", req.path());
            }

            match authenticate_token(token, &auth).await {
                Ok(admin) => {
                    trace!("Admin authentication successful: {}", admin.email);
                    req.extensions_mut().insert(AuthenticatedAdmin(admin));
                    let response = srv.call(req).await?.map_into_left_body();
                    Ok(response)
                }
                Err(err) => Ok(Self::handle_unauthorized(req, &err)),
            }
        })
    }
}
