use std::sync::Arc;

use classboard::auth::{FirebaseAuthClient, FirebaseConfig, IdentityProvider};
use classboard::firestore::{FirestoreClient, FirestoreConfig};
use classboard::planner::Planner;
use classboard::stores::{AuthSession, LoadOutcome};

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored --test-threads=1
async fn test_load_from_firestore() {
    dotenvy::dotenv().ok();

    let firebase = FirebaseConfig::new_from_env().expect("Failed to load Firebase config");
    let email = std::env::var("FIREBASE_TEST_EMAIL").expect("FIREBASE_TEST_EMAIL is not set");
    let password = std::env::var("FIREBASE_TEST_PASSWORD").expect("FIREBASE_TEST_PASSWORD is not set");

    let identity = Arc::new(FirebaseAuthClient::new(firebase.clone()).expect("Failed to create auth client"));
    let user = identity.sign_in(&email, &password).await.expect("Failed to sign in");
    let token = identity.id_token(&user).await.expect("Failed to refresh token");
    assert!(!token.is_empty());

    let session = AuthSession::new();
    session.sign_in(user);
    let remote = FirestoreClient::new(FirestoreConfig::new_from_env(&firebase), session.clone(), identity)
        .expect("Failed to create Firestore client");
    let planner = Planner::new(Arc::new(remote), session);

    let outcome = planner.courses.load().await.expect("Failed to load courses");
    assert!(matches!(outcome, LoadOutcome::Applied { .. }));

    let class_events = planner.events.get().into_iter().filter(|e| e.is_class).count();
    let expected: usize = planner
        .courses
        .get()
        .iter()
        .map(|view| view.events.iter().filter(|e| e.is_class).count())
        .sum();
    assert_eq!(class_events, expected);
}
