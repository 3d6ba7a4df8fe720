//! Extraction of HTTP Basic credentials from incoming requests.

use std::future::{Ready, ready};

use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use crate::domain::{Credentials, Error};

/// HTTP Basic credentials lifted from the `Authorization` header.
///
/// Extraction fails with a `401` when the header is absent, uses a different
/// scheme, carries invalid base64, or decodes to something that is not
/// `username:password` with both parts present.
#[derive(Debug)]
pub struct BasicAuth(pub Credentials);

impl BasicAuth {
    /// Borrow the extracted credentials.
    #[must_use]
    pub fn credentials(&self) -> &Credentials {
        &self.0
    }

    /// Consume the extractor and return the credentials.
    #[must_use]
    pub fn into_credentials(self) -> Credentials {
        self.0
    }
}

fn unauthorized() -> Error {
    Error::unauthorized("invalid credentials")
}

fn parse_header(req: &HttpRequest) -> Result<Credentials, Error> {
    let header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(unauthorized)?;
    let encoded = header
        .strip_prefix("Basic ")
        .or_else(|| header.strip_prefix("basic "))
        .ok_or_else(unauthorized)?;
    let decoded = STANDARD.decode(encoded.trim()).map_err(|_| unauthorized())?;
    let decoded = String::from_utf8(decoded).map_err(|_| unauthorized())?;
    let (username, password) = decoded.split_once(':').ok_or_else(unauthorized)?;
    Credentials::try_from_parts(username, password).map_err(|_| unauthorized())
}

impl FromRequest for BasicAuth {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(parse_header(req).map(Self))
    }
}
