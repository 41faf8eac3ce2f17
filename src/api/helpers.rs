use std::net::IpAddr;

use poem::Request;

use crate::app_data::AppData;
use crate::errors::InternalError;
use crate::errors::internal::CredentialError;
use crate::providers::TokenProvider;
use crate::types::internal::context::RequestContext;

/// Client IP: X-Forwarded-For first hop, then X-Real-IP, then the socket peer
pub fn extract_ip_address(req: &Request) -> Option<IpAddr> {
    if let Some(forwarded) = req.header("X-Forwarded-For") {
        if let Some(ip) = forwarded.split(',').next() {
            return ip.trim().parse().ok();
        }
    }

    if let Some(real_ip) = req.header("X-Real-IP") {
        return real_ip.trim().parse().ok();
    }

    req.remote_addr().as_socket_addr().map(|addr| addr.ip())
}

pub fn extract_user_agent(req: &Request) -> Option<String> {
    req.header("User-Agent").map(str::to_string)
}

/// Build the context for a request
///
/// Without a token the context is anonymous. A token that is present but
/// invalid or expired is an error, so callers can answer 401.
pub fn create_request_context(
    req: &Request,
    token: Option<&str>,
    token_provider: &TokenProvider,
) -> Result<RequestContext, InternalError> {
    let mut ctx = RequestContext::new();
    if let Some(ip_address) = extract_ip_address(req) {
        ctx = ctx.with_ip_address(ip_address);
    }
    if let Some(user_agent) = extract_user_agent(req) {
        ctx = ctx.with_user_agent(user_agent);
    }

    match token {
        Some(token) => {
            let claims = token_provider.validate_jwt(token)?;
            Ok(ctx.with_claims(claims))
        }
        None => Ok(ctx),
    }
}

/// Check the token's account against the database
///
/// Deleted or deactivated accounts are refused, and the role is taken from
/// the stored row so role changes apply to tokens issued before them.
pub async fn refresh_account(ctx: RequestContext, app_data: &AppData) -> Result<RequestContext, InternalError> {
    let Some(mut claims) = ctx.claims.clone() else {
        return Ok(ctx);
    };

    let user_id = claims
        .user_id()
        .ok_or_else(|| CredentialError::invalid_token("access", "subject is not a user id"))?;

    let user = app_data
        .user_store
        .find_by_id(&app_data.db, user_id)
        .await?
        .filter(|user| user.is_active)
        .ok_or_else(|| CredentialError::invalid_token("access", "account is inactive or deleted"))?;

    if claims.role != user.role {
        tracing::debug!("Role for user {} changed since token issue: {:?} -> {:?}", user_id, claims.role, user.role);
        claims.role = user.role;
    }

    Ok(ctx.with_claims(claims))
}
