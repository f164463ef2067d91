use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// Credentials sent in the `Authorization` header of every request.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    Basic { username: String, password: String },
    Bearer(String),
}

impl Credentials {
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Credentials::Basic {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn scheme(&self) -> &'static str {
        match self {
            Credentials::Basic { .. } => "Basic",
            Credentials::Bearer(_) => "Bearer",
        }
    }

    pub fn header_value(&self) -> String {
        match self {
            Credentials::Basic { username, password } => {
                let encoded = STANDARD.encode(format!("{username}:{password}"));
                format!("Basic {encoded}")
            }
            Credentials::Bearer(token) => format!("Bearer {token}"),
        }
    }
}

// Keeps secrets out of logs and panic messages.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credentials::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
            Credentials::Bearer(_) => f.debug_tuple("Bearer").field(&"<redacted>").finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Credentials;

    #[test]
    fn basic_header_is_base64_encoded() {
        let creds = Credentials::basic("jdoe", "hunter2");
        assert_eq!(creds.scheme(), "Basic");
        assert_eq!(creds.header_value(), "Basic amRvZTpodW50ZXIy");
    }

    #[test]
    fn bearer_header_passes_token_through() {
        let creds = Credentials::Bearer("abc.def".into());
        assert_eq!(creds.header_value(), "Bearer abc.def");
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let rendered = format!("{:?}", Credentials::basic("jdoe", "hunter2"));
        assert!(rendered.contains("jdoe"));
        assert!(!rendered.contains("hunter2"));

        let rendered = format!("{:?}", Credentials::Bearer("abc.def".into()));
        assert!(!rendered.contains("abc.def"));
    }
}
