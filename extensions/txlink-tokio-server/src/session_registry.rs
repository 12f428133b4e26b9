use dashmap::DashMap;
use std::collections::{HashMap, HashSet};

use txlink::codec::{RegisterRmRequest, RegisterTmRequest};
use txlink::transport::SessionHandle;

use crate::{RpcContext, SessionError, TransactionRole};

const CLIENT_ID_SPLIT_CHAR: char = ':';
const DB_KEY_SPLIT_CHAR: char = ',';

type PortMap = DashMap<u16, SessionHandle>;
type IpMap = DashMap<String, PortMap>;

/// Coordinator-side index of every identified client connection.
///
/// Four concurrent maps carry the state:
/// - connection -> role
/// - connection -> application id (absence means unregistered)
/// - application id -> ip -> port -> connection (reverse lookup tree)
/// - application id -> comma-joined resource ids, in registration order
///
/// Registration writes tree first, then role, then identity, so a reader
/// that sees an identified connection always finds it in the tree. Closed
/// connections are tolerated as stale entries and evicted by whichever
/// traversal touches them next; eviction is idempotent, so no composite
/// locking is needed anywhere.
#[derive(Default)]
pub struct SessionRegistry {
    session_roles: DashMap<SessionHandle, TransactionRole>,
    identified_sessions: DashMap<SessionHandle, String>,
    client_sessions: DashMap<String, IpMap>,
    client_resources: DashMap<String, String>,
}

impl SessionRegistry {
    pub fn new() -> SessionRegistry {
        SessionRegistry::default()
    }

    /// Indexes a connection that identified itself as a transaction manager.
    pub fn register_tm(&self, request: &RegisterTmRequest, session: &SessionHandle) {
        self.insert_session_tree(&request.application_id, session);
        self.session_roles
            .insert(session.clone(), TransactionRole::Tm);
        self.identified_sessions
            .insert(session.clone(), request.application_id.clone());
    }

    /// Indexes a connection that identified itself as a resource manager and
    /// records the resources its application owns.
    ///
    /// A re-registration overwrites the application's resource list; the
    /// list is owned by the application, but a change is worth a warning
    /// because it may hide drift between instances.
    pub fn register_rm(&self, request: &RegisterRmRequest, session: &SessionHandle) {
        self.insert_session_tree(&request.application_id, session);
        self.session_roles
            .insert(session.clone(), TransactionRole::Rm);
        self.identified_sessions
            .insert(session.clone(), request.application_id.clone());

        let previous = self
            .client_resources
            .insert(request.application_id.clone(), request.resource_ids.clone());
        if let Some(previous) = previous {
            if previous != request.resource_ids {
                tracing::warn!(
                    application_id = %request.application_id,
                    old = %previous,
                    new = %request.resource_ids,
                    "resource ids changed on re-registration"
                );
            }
        }
    }

    pub fn is_registered(&self, session: &SessionHandle) -> bool {
        self.identified_sessions.contains_key(session)
    }

    pub fn role_of(&self, session: &SessionHandle) -> Option<TransactionRole> {
        self.session_roles.get(session).map(|role| *role)
    }

    /// Builds the identity record for an identified connection, or `None`
    /// if the connection never registered.
    pub fn context_of(&self, session: &SessionHandle) -> Option<RpcContext> {
        let application_id = self.identified_sessions.get(session)?.clone();
        let role = self.role_of(session)?;
        let resource_ids = self
            .client_resources
            .get(&application_id)
            .map(|ids| ids.clone())
            .unwrap_or_default();

        let client_id = format!(
            "{}{}{}",
            application_id,
            CLIENT_ID_SPLIT_CHAR,
            session.remote_addr()
        );

        Some(
            RpcContext::builder(session.clone())
                .role(role)
                .application_id(application_id)
                .client_id(client_id)
                .resource_set(db_key_to_set(&resource_ids))
                .build(),
        )
    }

    /// Finds a live resource-manager connection for `resource_id`,
    /// preferring the exact client the branch registered through.
    ///
    /// `client_id` must parse as `application_id:ip:port`. The fallback
    /// order is: exact port, any port on the same host, any host in the
    /// same application. Transaction-manager connections never qualify, and
    /// closed entries are evicted as the traversal passes them.
    pub fn session_for(
        &self,
        resource_id: &str,
        client_id: &str,
    ) -> Result<SessionHandle, SessionError> {
        let parts: Vec<&str> = client_id.split(CLIENT_ID_SPLIT_CHAR).collect();
        if parts.len() != 3 {
            return Err(SessionError::InvalidClientId(client_id.to_string()));
        }
        let target_application_id = parts[0];
        let target_ip = parts[1];
        let target_port: u16 = parts[2].parse().unwrap_or(0);

        let mut result = None;

        if let Some(ip_map) = self.client_sessions.get(target_application_id) {
            if let Some(port_map) = ip_map.get(target_ip) {
                // Firstly, try the original session the branch was
                // registered through.
                let exact = port_map.get(&target_port).map(|s| s.value().clone());
                if let Some(session) = exact {
                    if session.is_closed() {
                        port_map.remove(&target_port);
                        tracing::info!(remote = %session.remote_addr(), "removed inactive session");
                    } else if self.is_rm(&session) {
                        tracing::debug!(client_id, "found exact session for client id");
                        result = Some(session);
                    }
                }

                // The original channel is broken, try another port on the
                // same host.
                if result.is_none() {
                    result = self.first_live_rm(&port_map);
                    if let Some(session) = &result {
                        tracing::info!(
                            remote = %session.remote_addr(),
                            client_id,
                            "chose same-host alternative session"
                        );
                    }
                }
            }

            // No channel on that host, try the application's other hosts.
            if result.is_none() {
                for ip_entry in ip_map.iter() {
                    if ip_entry.key() == target_ip {
                        continue;
                    }
                    if let Some(session) = self.first_live_rm(ip_entry.value()) {
                        tracing::info!(
                            remote = %session.remote_addr(),
                            client_id,
                            "chose same-application alternative session"
                        );
                        result = Some(session);
                        break;
                    }
                }
            }
        }

        result.ok_or_else(|| SessionError::NoSuitableSession {
            resource_id: resource_id.to_string(),
            client_id: client_id.to_string(),
        })
    }

    /// Returns a live connection belonging to the same client process
    /// family: same application, same host, different port.
    ///
    /// A still-open input is returned as-is. The input's own port entry is
    /// deleted from the tree as a side effect, as are any dead siblings the
    /// scan walks over.
    pub fn same_client_session(&self, session: &SessionHandle) -> Option<SessionHandle> {
        if !session.is_closed() {
            return Some(session.clone());
        }

        let addr = session.remote_addr();
        let ip = client_ip(&addr);
        let port = client_port(&addr);

        let application_id = match self.identified_sessions.get(session) {
            Some(application_id) => application_id.clone(),
            None => {
                tracing::error!(remote = %addr, "session never registered");
                return None;
            }
        };

        let ip_map = self.client_sessions.get(&application_id)?;
        let port_map = ip_map.get(&ip)?;

        let mut dead = vec![port];
        let mut found = None;
        for entry in port_map.iter() {
            if *entry.key() == port {
                continue;
            }
            if entry.value().is_closed() {
                dead.push(*entry.key());
            } else {
                found = Some(entry.value().clone());
                break;
            }
        }
        for port in dead {
            port_map.remove(&port);
        }

        found
    }

    /// Snapshot pairing each registered resource id with one live
    /// resource-manager connection of its owning application.
    ///
    /// When two applications claim the same resource the later one wins;
    /// application iteration order is unspecified and callers must not rely
    /// on it. Closed connections encountered anywhere are swept out.
    pub fn rm_sessions(&self) -> HashMap<String, SessionHandle> {
        let mut dead_roles = Vec::new();
        for entry in self.session_roles.iter() {
            if entry.key().is_closed() {
                dead_roles.push(entry.key().clone());
            }
        }
        for session in dead_roles {
            self.session_roles.remove(&session);
        }

        let mut sessions = HashMap::new();
        for app_entry in self.client_sessions.iter() {
            let session = match self.first_live_rm_in_ip_map(app_entry.value()) {
                Some(session) => session,
                None => continue,
            };

            if let Some(resource_ids) = self.client_resources.get(app_entry.key()) {
                for resource_id in resource_ids.split(DB_KEY_SPLIT_CHAR) {
                    if resource_id.is_empty() {
                        continue;
                    }
                    sessions.insert(resource_id.to_string(), session.clone());
                }
            }
        }
        sessions
    }

    /// Forgets a connection's role and identity. Tree debris is left for
    /// lazy eviction by the next traversal.
    pub fn release(&self, session: &SessionHandle) {
        self.session_roles.remove(session);
        self.identified_sessions.remove(session);
    }

    fn insert_session_tree(&self, application_id: &str, session: &SessionHandle) {
        let addr = session.remote_addr();
        let ip = client_ip(&addr);
        let port = client_port(&addr);

        // Entry-or-insert at each level, plain store at the leaf: two
        // concurrent registrations of the same (app, ip, port) are
        // last-writer-wins.
        let ip_map = self
            .client_sessions
            .entry(application_id.to_string())
            .or_default();
        let port_map = ip_map.entry(ip).or_default();
        port_map.insert(port, session.clone());
    }

    fn is_rm(&self, session: &SessionHandle) -> bool {
        matches!(self.role_of(session), Some(TransactionRole::Rm))
    }

    /// First live resource-manager entry in a port map, deleting closed
    /// entries along the way.
    fn first_live_rm(&self, port_map: &PortMap) -> Option<SessionHandle> {
        let mut dead = Vec::new();
        let mut found = None;

        for entry in port_map.iter() {
            let session = entry.value().clone();
            if session.is_closed() {
                dead.push(*entry.key());
            } else if self.is_rm(&session) {
                found = Some(session);
                break;
            }
        }

        for port in dead {
            if let Some((_, session)) = port_map.remove(&port) {
                tracing::info!(remote = %session.remote_addr(), "removed inactive session");
            }
        }
        found
    }

    fn first_live_rm_in_ip_map(&self, ip_map: &IpMap) -> Option<SessionHandle> {
        for entry in ip_map.iter() {
            if let Some(session) = self.first_live_rm(entry.value()) {
                return Some(session);
            }
        }
        None
    }
}

fn db_key_to_set(db_key: &str) -> HashSet<String> {
    if db_key.is_empty() {
        return HashSet::new();
    }
    db_key
        .split(DB_KEY_SPLIT_CHAR)
        .filter(|key| !key.is_empty())
        .map(str::to_string)
        .collect()
}

fn client_ip(addr: &str) -> String {
    match addr.find(CLIENT_ID_SPLIT_CHAR) {
        Some(idx) => addr[..idx].to_string(),
        None => addr.to_string(),
    }
}

fn client_port(addr: &str) -> u16 {
    match addr.rfind(CLIENT_ID_SPLIT_CHAR) {
        Some(idx) => addr[idx + 1..].parse().unwrap_or(0),
        None => 0,
    }
}
