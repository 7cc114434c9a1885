//! Request types for the invitation API.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{WizarrError, WizarrResult};

/// How long an invitation link stays redeemable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum ExpiresInDays {
    One,
    Seven,
    Thirty,
}

impl ExpiresInDays {
    /// Number of days as sent on the wire.
    #[must_use]
    pub fn days(self) -> u32 {
        match self {
            Self::One => 1,
            Self::Seven => 7,
            Self::Thirty => 30,
        }
    }
}

impl TryFrom<u32> for ExpiresInDays {
    type Error = WizarrError;

    fn try_from(days: u32) -> WizarrResult<Self> {
        match days {
            1 => Ok(Self::One),
            7 => Ok(Self::Seven),
            30 => Ok(Self::Thirty),
            other => Err(WizarrError::InvalidConfig(format!(
                "expires_in_days must be 1, 7 or 30 (got {other})"
            ))),
        }
    }
}

impl From<ExpiresInDays> for u32 {
    fn from(value: ExpiresInDays) -> Self {
        value.days()
    }
}

impl fmt::Display for ExpiresInDays {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.days())
    }
}

/// User access duration granted by a redeemed invitation.
///
/// Travels as a string: `"unlimited"` or a decimal number of days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum AccessDuration {
    Unlimited,
    Days(u32),
}

impl AccessDuration {
    #[must_use]
    pub fn is_unlimited(self) -> bool {
        matches!(self, Self::Unlimited)
    }
}

impl FromStr for AccessDuration {
    type Err = WizarrError;

    fn from_str(s: &str) -> WizarrResult<Self> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("unlimited") {
            return Ok(Self::Unlimited);
        }
        match trimmed.parse::<u32>() {
            Ok(0) => Err(WizarrError::InvalidConfig(
                "duration must be at least 1 day".to_string(),
            )),
            Ok(days) => Ok(Self::Days(days)),
            Err(_) => Err(WizarrError::InvalidConfig(format!(
                "duration must be a number of days or \"unlimited\" (got {s:?})"
            ))),
        }
    }
}

impl TryFrom<String> for AccessDuration {
    type Error = WizarrError;

    fn try_from(value: String) -> WizarrResult<Self> {
        value.parse()
    }
}

impl From<AccessDuration> for String {
    fn from(value: AccessDuration) -> Self {
        value.to_string()
    }
}

impl fmt::Display for AccessDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unlimited => write!(f, "unlimited"),
            Self::Days(days) => write!(f, "{days}"),
        }
    }
}

/// Body of `POST /api/invitations`.
///
/// Built once per batch and shared by every call in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvitationRequest {
    pub server_ids: Vec<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in_days: Option<ExpiresInDays>,
    pub duration: AccessDuration,
    pub unlimited: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub library_ids: Option<Vec<i64>>,
    pub allow_downloads: bool,
    pub allow_live_tv: bool,
    pub allow_mobile_uploads: bool,
}

impl InvitationRequest {
    /// Create a request for the given servers with unlimited access and no
    /// extra permissions.
    pub fn new(server_ids: impl Into<Vec<i64>>) -> Self {
        Self {
            server_ids: server_ids.into(),
            expires_in_days: None,
            duration: AccessDuration::Unlimited,
            unlimited: true,
            library_ids: None,
            allow_downloads: false,
            allow_live_tv: false,
            allow_mobile_uploads: false,
        }
    }

    #[must_use]
    pub fn with_expires_in_days(mut self, expires: Option<ExpiresInDays>) -> Self {
        self.expires_in_days = expires;
        self
    }

    /// Set the access duration and the matching `unlimited` flag.
    #[must_use]
    pub fn with_duration(mut self, duration: AccessDuration, unlimited: bool) -> Self {
        self.duration = duration;
        self.unlimited = unlimited;
        self
    }

    #[must_use]
    pub fn with_library_ids(mut self, library_ids: Option<Vec<i64>>) -> Self {
        self.library_ids = library_ids;
        self
    }

    #[must_use]
    pub fn with_permissions(mut self, downloads: bool, live_tv: bool, mobile_uploads: bool) -> Self {
        self.allow_downloads = downloads;
        self.allow_live_tv = live_tv;
        self.allow_mobile_uploads = mobile_uploads;
        self
    }

    /// Reject requests the API would refuse before a single call is made.
    pub fn validate(&self) -> WizarrResult<()> {
        if self.server_ids.is_empty() {
            return Err(WizarrError::InvalidConfig(
                "at least one server ID is required".to_string(),
            ));
        }
        if !self.unlimited && self.duration.is_unlimited() {
            return Err(WizarrError::InvalidConfig(
                "limited access requires an explicit duration in days".to_string(),
            ));
        }
        if matches!(&self.library_ids, Some(ids) if ids.is_empty()) {
            return Err(WizarrError::InvalidConfig(
                "library_ids must not be empty when given".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_minimal_request_omits_optional_fields() {
        let request = InvitationRequest::new(vec![1, 2]);
        let body = serde_json::to_value(&request).unwrap();

        assert_eq!(
            body,
            json!({
                "server_ids": [1, 2],
                "duration": "unlimited",
                "unlimited": true,
                "allow_downloads": false,
                "allow_live_tv": false,
                "allow_mobile_uploads": false
            })
        );
    }

    #[test]
    fn test_full_request_body() {
        let request = InvitationRequest::new(vec![3])
            .with_expires_in_days(Some(ExpiresInDays::Seven))
            .with_duration(AccessDuration::Days(30), false)
            .with_library_ids(Some(vec![10, 11]))
            .with_permissions(true, true, false);
        let body = serde_json::to_value(&request).unwrap();

        assert_eq!(body["expires_in_days"], json!(7));
        assert_eq!(body["duration"], json!("30"));
        assert_eq!(body["unlimited"], json!(false));
        assert_eq!(body["library_ids"], json!([10, 11]));
        assert_eq!(body["allow_downloads"], json!(true));
        assert_eq!(body["allow_live_tv"], json!(true));
        assert_eq!(body["allow_mobile_uploads"], json!(false));
    }

    #[test]
    fn test_expires_in_days_accepts_only_known_values() {
        assert_eq!(ExpiresInDays::try_from(1).unwrap(), ExpiresInDays::One);
        assert_eq!(ExpiresInDays::try_from(30).unwrap(), ExpiresInDays::Thirty);
        assert!(ExpiresInDays::try_from(14).is_err());

        let parsed: Result<ExpiresInDays, _> = serde_json::from_value(json!(2));
        assert!(parsed.is_err());
    }

    #[test]
    fn test_access_duration_parsing() {
        assert_eq!(
            "unlimited".parse::<AccessDuration>().unwrap(),
            AccessDuration::Unlimited
        );
        assert_eq!(
            "Unlimited".parse::<AccessDuration>().unwrap(),
            AccessDuration::Unlimited
        );
        assert_eq!(
            "14".parse::<AccessDuration>().unwrap(),
            AccessDuration::Days(14)
        );
        assert!("0".parse::<AccessDuration>().is_err());
        assert!("forever".parse::<AccessDuration>().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_servers() {
        let request = InvitationRequest::new(Vec::<i64>::new());
        assert!(matches!(
            request.validate(),
            Err(WizarrError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_validate_rejects_limited_without_days() {
        let request =
            InvitationRequest::new(vec![1]).with_duration(AccessDuration::Unlimited, false);
        let err = request.validate().unwrap_err();
        assert!(err.to_string().contains("explicit duration"));
    }

    #[test]
    fn test_validate_accepts_limited_with_days() {
        let request = InvitationRequest::new(vec![1]).with_duration(AccessDuration::Days(7), false);
        assert!(request.validate().is_ok());
    }
}
