use std::net::IpAddr;

use crate::types::db::Role;
use crate::types::internal::auth::Claims;

use super::{request_id::RequestId, request_source::RequestSource};

/// Request context that flows through all layers
///
/// Carries what the coordinators need for auditing and authorization:
/// who is calling, from where, and through which entry point.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestContext {
    /// IP address of the client making the request
    pub ip_address: Option<IpAddr>,

    /// Raw User-Agent header, if any
    pub user_agent: Option<String>,

    /// Unique identifier for this request (for tracing across layers)
    pub request_id: RequestId,

    /// Whether the request is authenticated (JWT validated successfully)
    pub authenticated: bool,

    /// Full JWT claims if authenticated
    pub claims: Option<Claims>,

    /// Source of the request (API, CLI, or System)
    pub source: RequestSource,

    /// Actor who initiated the operation
    pub actor_id: String,
}

impl RequestContext {
    /// Unauthenticated API context
    pub fn new() -> Self {
        Self {
            ip_address: None,
            user_agent: None,
            request_id: RequestId::new(),
            authenticated: false,
            claims: None,
            source: RequestSource::API,
            actor_id: "unknown".to_string(),
        }
    }

    /// Create a RequestContext for CLI operations
    pub fn for_cli(command_name: &str) -> Self {
        Self {
            source: RequestSource::CLI,
            actor_id: format!("cli:{}", command_name),
            ..Self::new()
        }
    }

    /// Create a RequestContext for system operations
    pub fn for_system(operation_name: &str) -> Self {
        Self {
            source: RequestSource::System,
            actor_id: format!("system:{}", operation_name),
            ..Self::new()
        }
    }

    pub fn with_ip_address(mut self, ip_address: IpAddr) -> Self {
        self.ip_address = Some(ip_address);
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Attach validated JWT claims; the token subject becomes the actor
    pub fn with_claims(mut self, claims: Claims) -> Self {
        self.authenticated = true;
        self.actor_id = format!("user:{}", claims.sub);
        self.claims = Some(claims);
        self
    }

    /// Id of the authenticated user, if any
    pub fn user_id(&self) -> Option<i32> {
        self.claims.as_ref().and_then(Claims::user_id)
    }

    pub fn role(&self) -> Option<Role> {
        self.claims.as_ref().map(|claims| claims.role)
    }

    /// True for owners and admins
    pub fn is_staff(&self) -> bool {
        self.role().is_some_and(|role| role.is_staff())
    }

    pub fn is_owner(&self) -> bool {
        self.role() == Some(Role::Owner)
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}
