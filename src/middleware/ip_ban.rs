//! Request filter for banned client addresses.
//!
//! Banned clients get a bare 404 for every route, so the site looks absent
//! rather than blocked.

use actix_web::body::EitherBody;
use actix_web::dev::{self, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{Error, HttpRequest, HttpResponse};
use futures::future::{ready, LocalBoxFuture, Ready};
use std::collections::HashSet;
use std::net::IpAddr;
use std::rc::Rc;
use std::sync::Arc;

/// Extract the client IP address from an HTTP request.
///
/// Forwarding headers are set by whoever sent the request, so they are only
/// read when `behind_proxy` is true. In that case the address appended by
/// the proxy (the last X-Forwarded-For entry) wins, then X-Real-IP. The
/// remote peer address is used otherwise.
pub fn extract_client_ip(req: &HttpRequest, behind_proxy: bool) -> Option<String> {
    if behind_proxy {
        if let Some(xff) = req.headers().get("x-forwarded-for") {
            if let Ok(xff_str) = xff.to_str() {
                // Entries to the left of the proxy's own are client supplied
                if let Some(last_ip) = xff_str.rsplit(',').next() {
                    let trimmed = last_ip.trim();
                    if trimmed.parse::<IpAddr>().is_ok() {
                        return Some(trimmed.to_string());
                    }
                }
            }
        }

        if let Some(xri) = req.headers().get("x-real-ip") {
            if let Ok(xri_str) = xri.to_str() {
                let trimmed = xri_str.trim();
                if trimmed.parse::<IpAddr>().is_ok() {
                    return Some(trimmed.to_string());
                }
            }
        }
    }

    req.peer_addr().map(|addr| addr.ip().to_string())
}

/// Middleware answering 404 to every request from a banned address.
#[derive(Clone, Debug, Default)]
pub struct IpBan {
    banned: Arc<HashSet<String>>,
    behind_proxy: bool,
}

impl IpBan {
    pub fn new<I, S>(addresses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            banned: Arc::new(addresses.into_iter().map(Into::into).collect()),
            behind_proxy: false,
        }
    }

    /// Read the client address from the proxy's forwarding headers.
    pub fn behind_proxy(mut self, behind_proxy: bool) -> Self {
        self.behind_proxy = behind_proxy;
        self
    }

    pub fn is_banned(&self, address: &str) -> bool {
        self.banned.contains(address)
    }
}

impl<S: 'static, B> Transform<S, ServiceRequest> for IpBan
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = IpBanMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(IpBanMiddleware {
            service: Rc::new(service),
            ban: self.clone(),
        }))
    }
}

pub struct IpBanMiddleware<S> {
    service: Rc<S>,
    ban: IpBan,
}

impl<S, B> Service<ServiceRequest> for IpBanMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    dev::forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if !self.ban.banned.is_empty() {
            if let Some(address) = extract_client_ip(req.request(), self.ban.behind_proxy) {
                if self.ban.is_banned(&address) {
                    log::debug!("Refusing request from banned address {}", address);
                    let response = req
                        .into_response(HttpResponse::NotFound().finish())
                        .map_into_right_body();
                    return Box::pin(ready(Ok(response)));
                }
            }
        }

        let svc = self.service.clone();
        Box::pin(async move {
            svc.call(req)
                .await
                .map(ServiceResponse::map_into_left_body)
        })
    }
}
