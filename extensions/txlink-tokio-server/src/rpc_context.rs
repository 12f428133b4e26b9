use std::collections::HashSet;

use txlink::transport::SessionHandle;

use crate::TransactionRole;

/// Immutable identity record for one registered connection.
///
/// Built by the registry when a connection identifies itself; upper layers
/// read it to attribute incoming requests. `client_id` is the canonical
/// `application_id:ip:port` string and `resource_set` is empty for
/// transaction managers.
#[derive(Debug, Clone)]
pub struct RpcContext {
    role: TransactionRole,
    application_id: String,
    client_id: String,
    resource_set: HashSet<String>,
    session: SessionHandle,
}

impl RpcContext {
    pub fn builder(session: SessionHandle) -> RpcContextBuilder {
        RpcContextBuilder {
            role: TransactionRole::Tm,
            application_id: String::new(),
            client_id: String::new(),
            resource_set: HashSet::new(),
            session,
        }
    }

    pub fn role(&self) -> TransactionRole {
        self.role
    }

    pub fn application_id(&self) -> &str {
        &self.application_id
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn resource_set(&self) -> &HashSet<String> {
        &self.resource_set
    }

    pub fn session(&self) -> &SessionHandle {
        &self.session
    }
}

pub struct RpcContextBuilder {
    role: TransactionRole,
    application_id: String,
    client_id: String,
    resource_set: HashSet<String>,
    session: SessionHandle,
}

impl RpcContextBuilder {
    pub fn role(mut self, role: TransactionRole) -> RpcContextBuilder {
        self.role = role;
        self
    }

    pub fn application_id(mut self, application_id: impl Into<String>) -> RpcContextBuilder {
        self.application_id = application_id.into();
        self
    }

    pub fn client_id(mut self, client_id: impl Into<String>) -> RpcContextBuilder {
        self.client_id = client_id.into();
        self
    }

    pub fn resource_set(mut self, resource_set: HashSet<String>) -> RpcContextBuilder {
        self.resource_set = resource_set;
        self
    }

    pub fn build(self) -> RpcContext {
        RpcContext {
            role: self.role,
            application_id: self.application_id,
            client_id: self.client_id,
            resource_set: self.resource_set,
            session: self.session,
        }
    }
}
