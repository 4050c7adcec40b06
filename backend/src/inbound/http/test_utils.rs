//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::body::MessageBody;
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpResponse, test as actix_test, web};

use crate::domain::ports::{
    MockDeckCommand, MockDeckQuery, MockFlashcardBulkCommand, MockFlashcardCommand,
    MockFlashcardQuery, MockLoginService, MockSignupService,
};
use crate::domain::{Error, UserId};
use crate::inbound::http::configure_api;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::{AccountPorts, ContentPorts, HttpState};

/// Caller used by handler tests.
pub const TEST_USER: &str = "7c9e6679-7425-40de-944b-e07fc1f90ae7";

/// Route that logs the path's user in, so tests can obtain a session cookie.
const LOGIN_AS: &str = "/test/login-as/{user}";

pub fn test_user() -> UserId {
    UserId::new(TEST_USER).expect("fixture user id")
}

/// Build a session middleware configured for tests.
///
/// Uses a fresh key per call, names the cookie `session` and drops the
/// `Secure` flag for plain-HTTP test requests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Mock driving ports; set expectations, then call [`MockPorts::into_state`].
///
/// Sessions are confirmed for any account unless a test replaces the login
/// mock.
pub struct MockPorts {
    pub login: MockLoginService,
    pub signup: MockSignupService,
    pub decks: MockDeckCommand,
    pub decks_query: MockDeckQuery,
    pub flashcards: MockFlashcardCommand,
    pub flashcards_query: MockFlashcardQuery,
    pub bulk: MockFlashcardBulkCommand,
}

impl Default for MockPorts {
    fn default() -> Self {
        let mut login = MockLoginService::new();
        login
            .expect_confirm_session()
            .returning(|user_id| Ok(user_id.clone()));
        Self {
            login,
            signup: MockSignupService::new(),
            decks: MockDeckCommand::new(),
            decks_query: MockDeckQuery::new(),
            flashcards: MockFlashcardCommand::new(),
            flashcards_query: MockFlashcardQuery::new(),
            bulk: MockFlashcardBulkCommand::new(),
        }
    }
}

impl MockPorts {
    pub fn into_state(self) -> HttpState {
        HttpState::new(
            AccountPorts {
                login: Arc::new(self.login),
                signup: Arc::new(self.signup),
            },
            ContentPorts {
                decks: Arc::new(self.decks),
                decks_query: Arc::new(self.decks_query),
                flashcards: Arc::new(self.flashcards),
                flashcards_query: Arc::new(self.flashcards_query),
                bulk: Arc::new(self.bulk),
            },
        )
    }
}

async fn login_as(path: web::Path<String>, session: SessionContext) -> Result<HttpResponse, Error> {
    let user = UserId::new(path.into_inner())
        .map_err(|err| Error::invalid_request(err.to_string()))?;
    session.persist_user(&user)?;
    Ok(HttpResponse::NoContent().finish())
}

/// Full API over `state` plus the test login route.
pub fn api_app(
    state: HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .wrap(test_session_middleware())
        .route(LOGIN_AS, web::post().to(login_as))
        .service(web::scope("/api/v1").configure(configure_api))
}

/// Session cookie for `user`, issued by the test login route.
pub async fn session_cookie<S, B>(app: &S, user: &UserId) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let uri = LOGIN_AS.replace("{user}", user.as_ref());
    let res = actix_test::call_service(app, actix_test::TestRequest::post().uri(&uri).to_request()).await;
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(|cookie| cookie.into_owned())
        .expect("session cookie issued")
}
