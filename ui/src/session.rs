//! Signed-in tenant session
//!
//! Sign-in itself happens elsewhere; this module only carries the resulting
//! tenant id and access token to the components that need them.

use leptos::prelude::*;

const TENANT_KEY: &str = "retailcloud.tenant_id";
const TOKEN_KEY: &str = "retailcloud.access_token";

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Session {
    pub tenant_id: String,
    pub access_token: String,
}

impl Session {
    pub fn new(tenant_id: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            access_token: access_token.into(),
        }
    }

    /// Session left in local storage by the sign-in page, if any
    pub fn from_local_storage() -> Option<Self> {
        let storage = web_sys::window()?.local_storage().ok()??;
        let tenant_id = storage.get_item(TENANT_KEY).ok()??;
        let access_token = storage.get_item(TOKEN_KEY).ok()??;
        Self::from_parts(tenant_id, access_token)
    }

    fn from_parts(tenant_id: String, access_token: String) -> Option<Self> {
        let tenant_id = tenant_id.trim();
        let access_token = access_token.trim();
        if tenant_id.is_empty() || access_token.is_empty() {
            return None;
        }
        Some(Self::new(tenant_id, access_token))
    }
}

/// Current session, shared through Leptos context. `None` until signed in.
#[derive(Clone, Copy)]
pub struct SessionContext(pub RwSignal<Option<Session>>);

impl SessionContext {
    pub fn provide(session: Option<Session>) -> Self {
        let ctx = Self(RwSignal::new(session));
        provide_context(ctx);
        ctx
    }

    pub fn current(&self) -> Option<Session> {
        self.0.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_parts_requires_both_values() {
        assert_eq!(
            Session::from_parts(" acme ".into(), "tok".into()),
            Some(Session::new("acme", "tok"))
        );
        assert_eq!(Session::from_parts("".into(), "tok".into()), None);
        assert_eq!(Session::from_parts("acme".into(), "  ".into()), None);
    }
}
