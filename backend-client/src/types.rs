//! Wire records exchanged with the SafeRoute backend.
//!
//! Field names follow the backend's camelCase JSON. Record ids arrive as
//! MongoDB-style `_id`, which is accepted as an alias of `id`.

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde_json::Value;
use strum_macros::Display;
use strum_macros::EnumString;

pub const DEFAULT_ZONE_RADIUS_METERS: f64 = 150.0;
pub const DEFAULT_SOS_LOCATION_NAME: &str = "Unknown location";
pub const DEFAULT_SOS_NOTE: &str = "SOS triggered from dashboard";

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }
}

// ---------------------------------------------------------------- auth

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
    #[serde(other)]
    Unknown,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default, alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: Role,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct RegisterFields {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
}

/// Body returned by `/auth/login` and `/auth/register`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: User,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    pub access_token: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordReset {
    pub email: String,
    pub new_password: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: Option<String>,
}

// ---------------------------------------------------------------- contacts

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    #[serde(default, alias = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub relation: Option<String>,
    #[serde(default)]
    pub is_primary: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewContact {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relation: Option<String>,
    pub is_primary: bool,
}

/// Partial update for `PUT /contacts/:id`; unset fields are left out.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_primary: Option<bool>,
}

// ---------------------------------------------------------------- sos

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SosStatus {
    #[default]
    Pending,
    Acknowledged,
    Closed,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SosReporter {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SosAlert {
    #[serde(default, alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub user: Option<SosReporter>,
    #[serde(default)]
    pub location_name: Option<String>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub status: SosStatus,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerSos {
    pub location_name: String,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub note: String,
}

impl TriggerSos {
    /// Build the alert payload, filling in the default location name and note.
    pub fn at(position: Option<LatLng>, location_name: Option<String>) -> Self {
        Self {
            location_name: location_name
                .filter(|name| !name.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_SOS_LOCATION_NAME.to_string()),
            lat: position.map(|p| p.lat),
            lng: position.map(|p| p.lng),
            note: DEFAULT_SOS_NOTE.to_string(),
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SosStatusUpdate {
    pub status: SosStatus,
}

// ---------------------------------------------------------------- feedback

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum FeedbackRating {
    VerySafe,
    #[default]
    Okay,
    Risky,
    Avoid,
    #[serde(other)]
    Unknown,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    #[serde(default, alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
    #[serde(default)]
    pub location_name: Option<String>,
    #[serde(default = "unknown_rating")]
    pub rating: FeedbackRating,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Feedback {
    /// Map position, when the record carries usable coordinates.
    pub fn position(&self) -> Option<LatLng> {
        position_of(self.lat, self.lng)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFeedback {
    pub lat: f64,
    pub lng: f64,
    pub location_name: String,
    pub rating: FeedbackRating,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct NearbyFeedbackQuery {
    pub limit: Option<u32>,
    pub near: Option<LatLng>,
}

// ---------------------------------------------------------------- routes

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SafetyLabel {
    Safe,
    Moderate,
    Risky,
    #[default]
    #[serde(other)]
    Unknown,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RouteRequest {
    pub source: LatLng,
    pub destination: LatLng,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SafeRoute {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub duration_min: Option<f64>,
    #[serde(default)]
    pub distance_km: Option<f64>,
    #[serde(default)]
    pub safety: SafetyLabel,
    /// 0-100, higher is safer.
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub geometry: Vec<LatLng>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub(crate) struct SafeRoutesResponse {
    #[serde(default)]
    pub routes: Option<Vec<SafeRoute>>,
}

// ---------------------------------------------------------------- admin

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum RiskLevel {
    Low,
    #[default]
    Medium,
    High,
    #[serde(other)]
    Unknown,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskZone {
    #[serde(default, alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
    #[serde(default = "default_radius")]
    pub radius_meters: f64,
    #[serde(default = "unknown_level")]
    pub risk_level: RiskLevel,
    #[serde(default)]
    pub description: Option<String>,
}

impl RiskZone {
    pub fn position(&self) -> Option<LatLng> {
        position_of(self.lat, self.lng)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRiskZone {
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    pub radius_meters: f64,
    pub risk_level: RiskLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    #[serde(default)]
    pub feedback_count: u64,
    #[serde(default)]
    pub sos_pending: u64,
    #[serde(default)]
    pub risk_zones_count: u64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ActivityKind {
    Feedback,
    RiskZone,
    Sos,
    User,
    #[default]
    #[serde(other)]
    Other,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActivityEvent {
    #[serde(rename = "type", default)]
    pub kind: ActivityKind,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub actor: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub when: Option<DateTime<Utc>>,
}

fn position_of(lat: Option<f64>, lng: Option<f64>) -> Option<LatLng> {
    let position = LatLng::new(lat?, lng?);
    position.is_finite().then_some(position)
}

fn default_radius() -> f64 {
    DEFAULT_ZONE_RADIUS_METERS
}

fn unknown_rating() -> FeedbackRating {
    FeedbackRating::Unknown
}

fn unknown_level() -> RiskLevel {
    RiskLevel::Unknown
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
}
