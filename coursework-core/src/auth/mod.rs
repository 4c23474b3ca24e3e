use std::fmt;
use std::str::FromStr;

use crate::errors::AuthError;

/// The identity a request is resolved for.
///
/// Built once per request by whoever owns session handling and passed down
/// explicitly; nothing in this crate looks it up from ambient state.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum Viewer {
    #[default]
    Anonymous,
    User(i32),
    /// Internal callers (seeding, maintenance jobs) that bypass policy.
    System,
}

impl Viewer {
    pub fn user(user_id: i32) -> Self {
        Viewer::User(user_id)
    }

    pub fn user_id(&self) -> Option<i32> {
        match self {
            Viewer::User(id) => Some(*id),
            _ => None,
        }
    }

    pub fn is_system(&self) -> bool {
        matches!(self, Viewer::System)
    }

    /// Parse the raw identity header value. Blank values mean anonymous.
    pub fn from_header_value(value: &str) -> Result<Self, AuthError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Ok(Viewer::Anonymous);
        }

        trimmed
            .parse::<i32>()
            .ok()
            .filter(|id| *id > 0)
            .map(Viewer::User)
            .ok_or_else(|| AuthError::InvalidViewerId(trimmed.to_string()))
    }
}

/// Role of a user inside a course.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum EnrollmentRole {
    Teacher,
    Ta,
    Student,
}

impl EnrollmentRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnrollmentRole::Teacher => "teacher",
            EnrollmentRole::Ta => "ta",
            EnrollmentRole::Student => "student",
        }
    }

    /// Teachers and TAs may grade and read every submission in the course.
    pub fn can_grade(&self) -> bool {
        matches!(self, EnrollmentRole::Teacher | EnrollmentRole::Ta)
    }
}

impl fmt::Display for EnrollmentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EnrollmentRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "teacher" => Ok(EnrollmentRole::Teacher),
            "ta" => Ok(EnrollmentRole::Ta),
            "student" => Ok(EnrollmentRole::Student),
            _ => Err(format!("Invalid enrollment role: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_value_parsing() {
        assert_eq!(Viewer::from_header_value("12"), Ok(Viewer::User(12)));
        assert_eq!(Viewer::from_header_value("  "), Ok(Viewer::Anonymous));
        assert_eq!(
            Viewer::from_header_value("-4"),
            Err(AuthError::InvalidViewerId("-4".to_string()))
        );
        assert!(Viewer::from_header_value("teacher").is_err());
    }

    #[test]
    fn role_round_trip() {
        for role in [
            EnrollmentRole::Teacher,
            EnrollmentRole::Ta,
            EnrollmentRole::Student,
        ] {
            assert_eq!(role.as_str().parse::<EnrollmentRole>(), Ok(role));
        }
        assert!("observer".parse::<EnrollmentRole>().is_err());
        assert!(EnrollmentRole::Ta.can_grade());
        assert!(!EnrollmentRole::Student.can_grade());
    }
}
