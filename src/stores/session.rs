use tokio::sync::watch;
use tracing::info;

use super::Store;
use crate::auth::AuthUser;

/// The signed-in user, if any, and the token handed out in their session
/// cookie.
#[derive(Debug, Clone, Default)]
pub struct AuthSession {
    user: Store<Option<AuthUser>>,
    session_token: Store<Option<String>>,
}

impl AuthSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sign_in(&self, user: AuthUser) {
        info!("user {} signed in", user.uid);
        self.user.set(Some(user));
    }

    /// Remember the token written into the session cookie; only that value
    /// is accepted on later requests.
    pub fn issue_session_token(&self, token: impl Into<String>) {
        self.session_token.set(Some(token.into()));
    }

    /// Whether `token` is the cookie value issued to the signed-in user.
    pub fn accepts_session_token(&self, token: &str) -> bool {
        self.user.with(Option::is_some)
            && self
                .session_token
                .with(|issued| issued.as_deref() == Some(token))
    }

    /// Replace the signed-in user's identity token after a refresh.
    pub fn update_id_token(&self, token: &str) {
        self.user.update(|user| {
            if let Some(user) = user {
                user.id_token = token.to_string();
            }
        });
    }

    pub fn sign_out(&self) {
        self.user.set(None);
        self.session_token.set(None);
    }

    pub fn current_user(&self) -> Option<AuthUser> {
        self.user.get()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<AuthUser>> {
        self.user.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> AuthUser {
        AuthUser {
            uid: "u1".to_string(),
            email: None,
            id_token: "id-1".to_string(),
            refresh_token: None,
        }
    }

    #[test]
    fn test_only_issued_token_is_accepted() {
        let session = AuthSession::new();
        session.issue_session_token("cookie-1");
        assert!(!session.accepts_session_token("cookie-1"));

        session.sign_in(user());
        assert!(session.accepts_session_token("cookie-1"));
        assert!(!session.accepts_session_token("forged"));

        session.sign_out();
        assert!(!session.accepts_session_token("cookie-1"));
    }

    #[test]
    fn test_update_id_token() {
        let session = AuthSession::new();
        session.update_id_token("ignored");
        assert_eq!(session.current_user(), None);

        session.sign_in(user());
        session.update_id_token("id-2");
        assert_eq!(session.current_user().unwrap().id_token, "id-2");
    }
}
