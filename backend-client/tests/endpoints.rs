#![allow(clippy::unwrap_used, clippy::expect_used)]

use pretty_assertions::assert_eq;
use saferoute_backend_client::ApiError;
use saferoute_backend_client::Client;
use saferoute_backend_client::ValidationError;
use saferoute_backend_client::types::ActivityKind;
use saferoute_backend_client::types::ContactUpdate;
use saferoute_backend_client::types::FeedbackRating;
use saferoute_backend_client::types::LatLng;
use saferoute_backend_client::types::LoginRequest;
use saferoute_backend_client::types::NearbyFeedbackQuery;
use saferoute_backend_client::types::NewContact;
use saferoute_backend_client::types::NewRiskZone;
use saferoute_backend_client::types::RiskLevel;
use saferoute_backend_client::types::RouteRequest;
use saferoute_backend_client::types::SafetyLabel;
use saferoute_backend_client::types::SosStatus;
use saferoute_backend_client::types::TriggerSos;
use serde_json::json;
use wiremock::Mock;
use wiremock::MockServer;
use wiremock::ResponseTemplate;
use wiremock::matchers::body_json;
use wiremock::matchers::method;
use wiremock::matchers::path;
use wiremock::matchers::query_param;

async fn client(server: &MockServer) -> Client {
    Client::new(format!("{}/api/", server.uri())).unwrap()
}

#[tokio::test]
async fn login_posts_credentials_and_decodes_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({"email": "asha@example.com", "password": "pw"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "accessToken": "a1",
            "refreshToken": "r1",
            "user": {"_id": "u1", "name": "Asha", "email": "asha@example.com", "role": "admin"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let session = client(&server)
        .await
        .login(&LoginRequest {
            email: "asha@example.com".to_string(),
            password: "pw".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(session.access_token, "a1");
    assert_eq!(session.refresh_token, "r1");
    assert!(session.user.is_admin());
}

#[tokio::test]
async fn invalid_contact_is_rejected_before_dispatch() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/contacts"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let err = client(&server)
        .await
        .create_contact(&NewContact {
            name: "Mom".to_string(),
            ..Default::default()
        })
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ApiError::Validation(ValidationError::EmailOrPhone)
    ));
}

#[tokio::test]
async fn contact_update_sends_only_changed_fields() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/contacts/c1"))
        .and(body_json(json!({"isPrimary": true})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "_id": "c1", "name": "Mom", "phone": "123", "isPrimary": true
        })))
        .expect(1)
        .mount(&server)
        .await;

    let updated = client(&server)
        .await
        .update_contact(
            "c1",
            &ContactUpdate {
                is_primary: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(updated.is_primary);
}

#[tokio::test]
async fn delete_contact_hits_the_record_path() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/contacts/c9"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client(&server).await.delete_contact("c9").await.unwrap();
}

#[tokio::test]
async fn sos_lifecycle_calls() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/sos"))
        .and(body_json(json!({
            "locationName": "Charminar",
            "lat": 17.36,
            "lng": 78.47,
            "note": "SOS triggered from dashboard"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"message": "SOS alert sent to 2 contacts"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/api/sos/s1/status"))
        .and(body_json(json!({"status": "acknowledged"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"_id": "s1"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server).await;
    let message = client
        .trigger_sos(&TriggerSos::at(
            Some(LatLng::new(17.36, 78.47)),
            Some("Charminar".to_string()),
        ))
        .await
        .unwrap();
    assert_eq!(message.as_deref(), Some("SOS alert sent to 2 contacts"));

    client
        .update_sos_status("s1", SosStatus::Acknowledged)
        .await
        .unwrap();
}

#[tokio::test]
async fn list_endpoints_tolerate_non_array_bodies() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/sos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"alerts": []})))
        .mount(&server)
        .await;

    let alerts = client(&server).await.list_sos_alerts().await.unwrap();
    assert!(alerts.is_empty());
}

#[tokio::test]
async fn nearby_feedback_passes_limit_and_position() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/feedback/nearby"))
        .and(query_param("limit", "5"))
        .and(query_param("lat", "17.4"))
        .and(query_param("lng", "78.5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"_id": "f1", "lat": 17.4, "lng": 78.5, "locationName": "Gate 2", "rating": "avoid"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let feedback = client(&server)
        .await
        .nearby_feedback(NearbyFeedbackQuery {
            limit: Some(5),
            near: Some(LatLng::new(17.4, 78.5)),
        })
        .await
        .unwrap();
    assert_eq!(feedback.len(), 1);
    assert_eq!(feedback[0].rating, FeedbackRating::Avoid);
}

#[tokio::test]
async fn safe_routes_without_routes_array_is_empty() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/routes/safe"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "no routes"})))
        .expect(1)
        .mount(&server)
        .await;

    let routes = client(&server)
        .await
        .safe_routes(&RouteRequest {
            source: LatLng::new(17.38, 78.48),
            destination: LatLng::new(17.44, 78.35),
        })
        .await
        .unwrap();
    assert!(routes.is_empty());
}

#[tokio::test]
async fn safe_routes_decodes_scored_candidates() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/routes/safe"))
        .and(body_json(json!({
            "source": {"lat": 17.38, "lng": 78.48},
            "destination": {"lat": 17.44, "lng": 78.35}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"routes": [
            {"id": "r1", "label": "Main road", "safety": "safe", "score": 82.4,
             "geometry": [{"lat": 17.38, "lng": 78.48}, {"lat": 17.44, "lng": 78.35}]},
            {"id": "r2", "label": "Shortcut", "safety": "risky", "score": 31}
        ]})))
        .expect(1)
        .mount(&server)
        .await;

    let routes = client(&server)
        .await
        .safe_routes(&RouteRequest {
            source: LatLng::new(17.38, 78.48),
            destination: LatLng::new(17.44, 78.35),
        })
        .await
        .unwrap();
    assert_eq!(routes.len(), 2);
    assert_eq!(routes[1].safety, SafetyLabel::Risky);
    assert!(routes[1].geometry.is_empty());
}

#[tokio::test]
async fn admin_endpoints_decode_their_records() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/admin/dashboard"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"sosPending": 3})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/admin/activity-log"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"type": "risk_zone", "summary": "Zone added", "when": "2025-11-02T10:15:00.000Z"},
            {"type": "login", "summary": "Something else"}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/admin/risk-zones"))
        .and(body_json(json!({
            "name": "Underpass", "lat": 17.4, "lng": 78.5,
            "radiusMeters": 150.0, "riskLevel": "high"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "_id": "z1", "name": "Underpass", "lat": 17.4, "lng": 78.5,
            "radiusMeters": 150, "riskLevel": "high"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server).await;
    let stats = client.dashboard_stats().await.unwrap();
    assert_eq!(stats.sos_pending, 3);
    assert_eq!(stats.feedback_count, 0);

    let events = client.activity_log().await.unwrap();
    assert_eq!(events[0].kind, ActivityKind::RiskZone);
    assert!(events[0].when.is_some());
    assert_eq!(events[1].kind, ActivityKind::Other);

    let zone = client
        .create_risk_zone(&NewRiskZone {
            name: "Underpass".to_string(),
            lat: 17.4,
            lng: 78.5,
            radius_meters: 150.0,
            risk_level: RiskLevel::High,
            description: None,
        })
        .await
        .unwrap();
    assert_eq!(zone.id, "z1");
}
