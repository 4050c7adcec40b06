//! Cookie session access for handlers.
//!
//! The session cookie stores only the authenticated [`UserId`]. Handlers go
//! through [`SessionContext`] to log a user in or out and to resolve the
//! caller for owner-scoped queries.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::ports::LoginService;
use crate::domain::{Error, ErrorCode, UserId};

/// Session entry holding the caller's id.
pub(crate) const USER_ID_KEY: &str = "user_id";

/// Owner-centric view of the Actix session.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Bind the session to `user_id`, rotating the cookie identity.
    pub fn persist_user(&self, user_id: &UserId) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(USER_ID_KEY, user_id.as_ref())
            .map_err(|err| Error::internal(format!("session write failed: {err}")))
    }

    /// Drop every session entry; the client receives an expiring cookie.
    pub fn clear(&self) {
        self.0.purge();
    }

    /// Caller stored in the session. A value that is not a valid id counts
    /// as anonymous.
    pub fn user_id(&self) -> Result<Option<UserId>, Error> {
        let stored = self
            .0
            .get::<String>(USER_ID_KEY)
            .map_err(|err| Error::internal(format!("session read failed: {err}")))?;
        Ok(stored.and_then(|raw| {
            UserId::new(&raw)
                .inspect_err(|err| warn!(error = %err, "discarding malformed session user id"))
                .ok()
        }))
    }

    /// The logged-in caller, or `unauthorized`.
    pub fn require_user_id(&self) -> Result<UserId, Error> {
        self.user_id()?
            .ok_or_else(|| Error::unauthorized("login required"))
    }

    /// The logged-in caller, provided their account still exists.
    ///
    /// A session naming a removed account is purged so the stale cookie is
    /// replaced on the response.
    pub async fn require_account(&self, login: &dyn LoginService) -> Result<UserId, Error> {
        let user_id = self.require_user_id()?;
        login.confirm_session(&user_id).await.inspect_err(|err| {
            if err.code() == ErrorCode::Unauthorized {
                self.clear();
            }
        })
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let session = Session::from_request(req, payload);
        Box::pin(async move { session.await.map(Self::new) })
    }
}
