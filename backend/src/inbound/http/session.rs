//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! Wraps the Actix cookie session so handlers only deal with the antiforgery
//! token: issue one when a form is rendered, verify it on every POST.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::warn;
use uuid::Uuid;

use crate::domain::Error;

pub(crate) const ANTIFORGERY_KEY: &str = "antiforgery_token";

/// Form field carrying the antiforgery token.
pub const ANTIFORGERY_FIELD: &str = "__RequestVerificationToken";

/// Header accepted as an alternative to the form field.
pub const ANTIFORGERY_HEADER: &str = "RequestVerificationToken";

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    fn stored_token(&self) -> Result<Option<String>, Error> {
        self.0
            .get::<String>(ANTIFORGERY_KEY)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))
    }

    /// Return the session's antiforgery token, issuing one on first use.
    ///
    /// The token stays stable for the lifetime of the session so several
    /// open forms can be submitted in any order.
    pub fn antiforgery_token(&self) -> Result<String, Error> {
        if let Some(token) = self.stored_token()? {
            return Ok(token);
        }
        let token = Uuid::new_v4().simple().to_string();
        self.0
            .insert(ANTIFORGERY_KEY, &token)
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))?;
        Ok(token)
    }

    /// Check a submitted token against the session or return `403 Forbidden`.
    pub fn verify_antiforgery_token(&self, submitted: Option<&str>) -> Result<(), Error> {
        let expected = self.stored_token()?;
        match (expected.as_deref(), submitted) {
            (Some(expected), Some(submitted)) if tokens_match(expected, submitted) => Ok(()),
            (None, _) => {
                warn!("antiforgery check failed: no token issued for this session");
                Err(Error::forbidden("antiforgery token missing or invalid"))
            }
            (Some(_), _) => {
                warn!("antiforgery check failed: submitted token missing or mismatched");
                Err(Error::forbidden("antiforgery token missing or invalid"))
            }
        }
    }
}

fn tokens_match(expected: &str, submitted: &str) -> bool {
    let expected = expected.as_bytes();
    let submitted = submitted.as_bytes();
    if expected.len() != submitted.len() {
        return false;
    }
    expected
        .iter()
        .zip(submitted)
        .fold(0_u8, |acc, (left, right)| acc | (left ^ right))
        == 0
}

/// Token submitted with a request: the form field wins, the header is the
/// fallback for clients posting without a form body.
pub(crate) fn submitted_token<'a>(
    req: &'a HttpRequest,
    form_token: Option<&'a str>,
) -> Option<&'a str> {
    form_token.or_else(|| {
        req.headers()
            .get(ANTIFORGERY_HEADER)
            .and_then(|value| value.to_str().ok())
    })
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
