use crate::shared::entity::{Entity, ID};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A registered festival goer, owned by the main application.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: ID,
    pub email: String,
    pub name: Option<String>,
    pub email_verified: bool,
    pub role: UserRole,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UserRole {
    User,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "USER",
            Self::Admin => "ADMIN",
        }
    }
}

impl FromStr for UserRole {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "USER" => Ok(Self::User),
            "ADMIN" => Ok(Self::Admin),
            _ => Err(anyhow::Error::msg(format!("Unknown user role: {}", s))),
        }
    }
}

impl User {
    /// Reminder emails are only sent to addresses the user has confirmed
    pub fn can_receive_email(&self) -> bool {
        self.email_verified && !self.email.trim().is_empty()
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }
}

impl Entity for User {
    fn id(&self) -> ID {
        self.id
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn only_verified_addresses_receive_email() {
        let mut user = User {
            id: ID::from(3),
            email: "lea@example.com".into(),
            name: None,
            email_verified: false,
            role: UserRole::User,
        };
        assert!(!user.can_receive_email());
        user.email_verified = true;
        assert!(user.can_receive_email());
        user.email = "  ".into();
        assert!(!user.can_receive_email());
    }

    #[test]
    fn parses_roles() {
        assert_eq!("ADMIN".parse::<UserRole>().unwrap(), UserRole::Admin);
        assert_eq!("USER".parse::<UserRole>().unwrap(), UserRole::User);
        assert!("admin".parse::<UserRole>().is_err());
        assert_eq!(UserRole::Admin.as_str(), "ADMIN");
    }
}
