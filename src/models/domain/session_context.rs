use std::{fmt, str::FromStr};

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::{
    config::Config,
    errors::{AppError, AppResult},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UserRole {
    Admin,
    Teacher,
    Student,
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserRole::Admin => write!(f, "ADMIN"),
            UserRole::Teacher => write!(f, "TEACHER"),
            UserRole::Student => write!(f, "STUDENT"),
        }
    }
}

impl FromStr for UserRole {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase();
        match normalized.trim_start_matches("ROLE_") {
            "ADMIN" => Ok(UserRole::Admin),
            "TEACHER" => Ok(UserRole::Teacher),
            "STUDENT" => Ok(UserRole::Student),
            _ => Err(AppError::ValidationError(format!("Unknown role '{}'", s))),
        }
    }
}

/// Who is taking the quiz, passed explicitly into everything that talks to the backend.
#[derive(Clone, Debug)]
pub struct SessionContext {
    pub username: String,
    pub role: UserRole,
    token: SecretString,
}

impl SessionContext {
    pub fn new(username: impl Into<String>, role: UserRole, token: SecretString) -> Self {
        Self {
            username: username.into(),
            role,
            token,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.session_username.clone(),
            config.session_role,
            config.api_token.clone(),
        )
    }

    /// Bearer token, if the session carries one.
    pub fn bearer_token(&self) -> Option<&str> {
        let token = self.token.expose_secret();
        (!token.is_empty()).then_some(token)
    }

    pub fn require_student(&self) -> AppResult<()> {
        if self.role == UserRole::Student {
            Ok(())
        } else {
            Err(AppError::Unauthorized(format!(
                "User '{}' with role {} cannot take quizzes",
                self.username, self.role
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_parses_spring_style_names() {
        assert_eq!("ROLE_STUDENT".parse::<UserRole>().unwrap(), UserRole::Student);
        assert_eq!("teacher".parse::<UserRole>().unwrap(), UserRole::Teacher);
        assert!("guest".parse::<UserRole>().is_err());
    }

    #[test]
    fn only_students_pass_the_role_gate() {
        let token = SecretString::from("t".to_string());
        let student = SessionContext::new("amy", UserRole::Student, token.clone());
        let teacher = SessionContext::new("bob", UserRole::Teacher, token);

        assert!(student.require_student().is_ok());
        assert!(matches!(
            teacher.require_student(),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn empty_token_is_not_sent() {
        let anonymous = SessionContext::new("amy", UserRole::Student, SecretString::from(String::new()));
        let signed_in = SessionContext::new("amy", UserRole::Student, SecretString::from("jwt".to_string()));

        assert_eq!(anonymous.bearer_token(), None);
        assert_eq!(signed_in.bearer_token(), Some("jwt"));
    }

    #[test]
    fn debug_output_redacts_token() {
        let context = SessionContext::new("amy", UserRole::Student, SecretString::from("s3cr3t".to_string()));
        assert!(!format!("{:?}", context).contains("s3cr3t"));
    }
}
