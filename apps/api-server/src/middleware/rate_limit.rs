//! Rate limiting middleware - gates every route before its handler runs.

use actix_web::{
    Error, ResponseError,
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
};
use futures::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use std::sync::Arc;

use tollbooth_core::limiter::UNKNOWN_KEY;
use tollbooth_core::{Decision, FixedWindowLimiter};

use crate::config::FailurePolicy;
use crate::middleware::error::AppError;

/// Rate limiting middleware factory.
pub struct RateLimitMiddleware {
    limiter: Arc<FixedWindowLimiter>,
    failure_policy: FailurePolicy,
}

impl RateLimitMiddleware {
    pub fn new(limiter: Arc<FixedWindowLimiter>, failure_policy: FailurePolicy) -> Self {
        Self {
            limiter,
            failure_policy,
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RateLimitMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = RateLimitMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddlewareService {
            service: Rc::new(service),
            limiter: self.limiter.clone(),
            failure_policy: self.failure_policy,
        }))
    }
}

pub struct RateLimitMiddlewareService<S> {
    service: Rc<S>,
    limiter: Arc<FixedWindowLimiter>,
    failure_policy: FailurePolicy,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let limiter = self.limiter.clone();
        let failure_policy = self.failure_policy;

        // Client identity: peer address, with a sentinel fallback so a
        // request without a resolvable address is still counted.
        let key = req
            .connection_info()
            .realip_remote_addr()
            .unwrap_or(UNKNOWN_KEY)
            .to_string();

        Box::pin(async move {
            match limiter.check(&key).await {
                Ok(Decision::Admitted { count }) => {
                    tracing::debug!(key = %key, count, "Request admitted");
                    service.call(req).await.map(|res| res.map_into_left_body())
                }
                Ok(Decision::Rejected { try_after }) => {
                    tracing::warn!(key = %key, "Rate limit exceeded");
                    let response = AppError::Throttled { try_after }.error_response();
                    let (http_req, _payload) = req.into_parts();
                    Ok(ServiceResponse::new(http_req, response).map_into_right_body())
                }
                Err(e) => match failure_policy {
                    FailurePolicy::Open => {
                        tracing::error!(key = %key, error = %e, "Rate limiter error, failing open");
                        service.call(req).await.map(|res| res.map_into_left_body())
                    }
                    FailurePolicy::Closed => {
                        tracing::error!(key = %key, error = %e, "Rate limiter error, failing closed");
                        let response = AppError::StoreUnavailable.error_response();
                        let (http_req, _payload) = req.into_parts();
                        Ok(ServiceResponse::new(http_req, response).map_into_right_body())
                    }
                },
            }
        })
    }
}
