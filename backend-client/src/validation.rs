//! Checks run on request payloads before anything is sent.

use crate::types::FeedbackRating;
use crate::types::LatLng;
use crate::types::LoginRequest;
use crate::types::NewContact;
use crate::types::NewFeedback;
use crate::types::NewRiskZone;
use crate::types::RegisterFields;
use crate::types::RiskLevel;
use crate::types::RouteRequest;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    Required(&'static str),
    #[error("At least email or phone is required")]
    EmailOrPhone,
    #[error("{field} must be between {min} and {max}")]
    OutOfRange {
        field: &'static str,
        min: f64,
        max: f64,
    },
    #[error("{0} must be greater than zero")]
    NotPositive(&'static str),
    #[error("{0} has an unsupported value")]
    Unsupported(&'static str),
}

pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

pub fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::Required(field))
    } else {
        Ok(())
    }
}

fn present(value: Option<&String>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}

fn in_range(field: &'static str, value: f64, min: f64, max: f64) -> Result<(), ValidationError> {
    if value.is_finite() && (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::OutOfRange { field, min, max })
    }
}

fn coordinates(position: LatLng) -> Result<(), ValidationError> {
    in_range("Latitude", position.lat, -90.0, 90.0)?;
    in_range("Longitude", position.lng, -180.0, 180.0)
}

impl Validate for LoginRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        require("Email", &self.email)?;
        require("Password", &self.password)
    }
}

impl Validate for RegisterFields {
    fn validate(&self) -> Result<(), ValidationError> {
        require("Name", &self.name)?;
        require("Email", &self.email)?;
        require("Password", &self.password)
    }
}

impl Validate for NewContact {
    fn validate(&self) -> Result<(), ValidationError> {
        require("Name", &self.name)?;
        if !present(self.email.as_ref()) && !present(self.phone.as_ref()) {
            return Err(ValidationError::EmailOrPhone);
        }
        Ok(())
    }
}

impl Validate for NewRiskZone {
    fn validate(&self) -> Result<(), ValidationError> {
        require("Name", &self.name)?;
        coordinates(LatLng::new(self.lat, self.lng))?;
        if !(self.radius_meters.is_finite() && self.radius_meters > 0.0) {
            return Err(ValidationError::NotPositive("Radius"));
        }
        if self.risk_level == RiskLevel::Unknown {
            return Err(ValidationError::Unsupported("Risk level"));
        }
        Ok(())
    }
}

impl Validate for NewFeedback {
    fn validate(&self) -> Result<(), ValidationError> {
        require("Location name", &self.location_name)?;
        if self.rating == FeedbackRating::Unknown {
            return Err(ValidationError::Required("Rating"));
        }
        coordinates(LatLng::new(self.lat, self.lng))
    }
}

impl Validate for RouteRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        coordinates(self.source)?;
        coordinates(self.destination)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DEFAULT_ZONE_RADIUS_METERS;
    use pretty_assertions::assert_eq;

    fn zone() -> NewRiskZone {
        NewRiskZone {
            name: "Dark underpass".to_string(),
            lat: 17.385,
            lng: 78.486,
            radius_meters: DEFAULT_ZONE_RADIUS_METERS,
            risk_level: RiskLevel::High,
            description: None,
        }
    }

    #[test]
    fn contact_needs_email_or_phone() {
        let contact = NewContact {
            name: "Mom".to_string(),
            email: Some(" ".to_string()),
            ..Default::default()
        };
        assert_eq!(contact.validate(), Err(ValidationError::EmailOrPhone));

        let contact = NewContact {
            phone: Some("+91 90000 00000".to_string()),
            ..contact
        };
        assert_eq!(contact.validate(), Ok(()));
    }

    #[test]
    fn contact_needs_a_name() {
        let contact = NewContact {
            email: Some("mom@example.com".to_string()),
            ..Default::default()
        };
        assert_eq!(contact.validate(), Err(ValidationError::Required("Name")));
    }

    #[test]
    fn risk_zone_rejects_bad_coordinates_and_radius() {
        assert_eq!(zone().validate(), Ok(()));
        assert_eq!(
            NewRiskZone { lat: 91.0, ..zone() }.validate(),
            Err(ValidationError::OutOfRange {
                field: "Latitude",
                min: -90.0,
                max: 90.0
            })
        );
        assert!(NewRiskZone { lng: f64::NAN, ..zone() }.validate().is_err());
        assert_eq!(
            NewRiskZone {
                radius_meters: 0.0,
                ..zone()
            }
            .validate(),
            Err(ValidationError::NotPositive("Radius"))
        );
    }

    #[test]
    fn register_requires_name_email_password() {
        let fields = RegisterFields {
            name: "Asha".to_string(),
            email: "asha@example.com".to_string(),
            password: String::new(),
            gender: None,
        };
        assert_eq!(fields.validate(), Err(ValidationError::Required("Password")));
    }

    #[test]
    fn feedback_requires_location_name() {
        let feedback = NewFeedback {
            lat: 17.0,
            lng: 78.0,
            location_name: String::new(),
            rating: FeedbackRating::Risky,
            comment: None,
        };
        assert_eq!(
            feedback.validate(),
            Err(ValidationError::Required("Location name"))
        );
    }
}
