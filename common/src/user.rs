use crate::RedactedSecret;

use serde::{Deserialize, Serialize, Serializer};

/// The signed-in account as reported by `/auth/me` and `/auth/login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
}

/// Email/password pair posted to `/auth/register` and `/auth/login`.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: RedactedSecret,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: RedactedSecret::new(password),
        }
    }
}

#[derive(Serialize)]
struct WireCredentials<'a> {
    email: &'a str,
    password: &'a str,
}

impl Serialize for Credentials {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        WireCredentials {
            email: &self.email,
            password: self.password.expose(),
        }
        .serialize(serializer)
    }
}
