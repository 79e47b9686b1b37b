//! Portal session captured from a browser login

use std::collections::BTreeMap;
use std::fmt;

use crate::constants::{EMPLOYEE_COOKIE, ESSENTIAL_COOKIES, RESTAURANT_COOKIE};

/// Cookie jar produced by the session bridge.
///
/// There is no expiry field: a stale session is only discovered when the
/// portal rejects a request made with it.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Session {
    cookies: BTreeMap<String, String>,
}

impl Session {
    pub fn new(cookies: BTreeMap<String, String>) -> Self {
        Self { cookies }
    }

    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }

    /// Restaurant/location identifier used in the shifts URL.
    pub fn restaurant_id(&self) -> Option<&str> {
        self.cookie(RESTAURANT_COOKIE).filter(|value| !value.is_empty())
    }

    /// Employee identifier used in the shifts URL.
    pub fn employee_id(&self) -> Option<&str> {
        self.cookie(EMPLOYEE_COOKIE).filter(|value| !value.is_empty())
    }

    /// Essential cookie names that the portal did not set.
    pub fn missing_essentials(&self) -> Vec<&'static str> {
        ESSENTIAL_COOKIES.into_iter().filter(|name| !self.cookies.contains_key(*name)).collect()
    }

    pub fn cookie_names(&self) -> impl Iterator<Item = &str> {
        self.cookies.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }

    /// Render the jar as a `Cookie` request header value.
    pub fn cookie_header(&self) -> String {
        self.cookies
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

impl FromIterator<(String, String)> for Session {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self { cookies: iter.into_iter().collect() }
    }
}

// Cookie values are bearer credentials; only names are printable.
impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("cookies", &self.cookies.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Portal login credentials
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self { username: username.into(), password: password.into() }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
