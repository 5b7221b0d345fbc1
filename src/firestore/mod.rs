pub mod dto;

use std::env;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::auth::{FirebaseConfig, IdentityProvider};
use crate::error::AppError;
use crate::models::{Course, CourseUpdate, Event, EventUpdate};
use crate::remote::DocumentStore;
use crate::stores::AuthSession;

const FIRESTORE_URL: &str = "https://firestore.googleapis.com/v1";

const COURSES: &str = "courses";
const EVENTS: &str = "events";

#[derive(Clone, Debug)]
pub struct FirestoreConfig {
    /// `.../documents` root of the database.
    pub documents_url: String,
}

impl FirestoreConfig {
    pub fn new(firebase: &FirebaseConfig) -> Self {
        Self {
            documents_url: format!(
                "{}/projects/{}/databases/(default)/documents",
                FIRESTORE_URL, firebase.project_id
            ),
        }
    }

    /// Like [`FirestoreConfig::new`], honouring a `FIRESTORE_DOCUMENTS_URL`
    /// override (emulator).
    pub fn new_from_env(firebase: &FirebaseConfig) -> Self {
        match env::var("FIRESTORE_DOCUMENTS_URL") {
            Ok(documents_url) => Self { documents_url },
            Err(_) => Self::new(firebase),
        }
    }
}

/// Firestore REST client. Requests run as the signed-in user of `session`;
/// a rejected identity token is refreshed through `identity` and the request
/// sent once more.
pub struct FirestoreClient {
    client: Client,
    config: FirestoreConfig,
    session: AuthSession,
    identity: Arc<dyn IdentityProvider>,
}

impl FirestoreClient {
    pub fn new(
        config: FirestoreConfig,
        session: AuthSession,
        identity: Arc<dyn IdentityProvider>,
    ) -> Result<Self, AppError> {
        let client = Client::builder()
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build http client: {}", e)))?;
        Ok(Self {
            client,
            config,
            session,
            identity,
        })
    }

    async fn send_authorized(
        &self,
        request: impl Fn(&str) -> RequestBuilder,
    ) -> Result<Response, AppError> {
        let user = self
            .session
            .current_user()
            .ok_or_else(|| AppError::Unauthorized("No signed-in user".to_string()))?;

        let response = request(&user.id_token).send().await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return check_status(response).await;
        }

        debug!("identity token for {} rejected, refreshing", user.uid);
        let token = self.identity.id_token(&user).await?;
        self.session.update_id_token(&token);

        let response = request(&token).send().await?;
        check_status(response).await
    }

    async fn run_query(
        &self,
        collection: &str,
        user_id: &str,
        order_by: Option<&str>,
    ) -> Result<Vec<dto::Document>, AppError> {
        let url = format!("{}:runQuery", self.config.documents_url);
        let request_body = query_by_owner(collection, user_id, order_by);

        let response = self
            .send_authorized(|token| {
                self.client
                    .post(&url)
                    .bearer_auth(token)
                    .json(&request_body)
            })
            .await?;

        let rows: Vec<dto::RunQueryResponse> = response.json().await?;
        Ok(rows.into_iter().filter_map(|row| row.document).collect())
    }

    async fn patch_document<U: Serialize>(
        &self,
        collection: &str,
        id: &str,
        field_paths: &[&str],
        update: &U,
    ) -> Result<(), AppError> {
        let mask: Vec<String> = field_paths
            .iter()
            .map(|path| format!("updateMask.fieldPaths={}", path))
            .collect();
        let url = format!(
            "{}/{}/{}?{}&currentDocument.exists=true",
            self.config.documents_url,
            collection,
            id,
            mask.join("&")
        );
        let request_body = dto::UpdateDocumentRequest {
            fields: encode_fields(update)?,
        };

        self.send_authorized(|token| {
            self.client
                .patch(&url)
                .bearer_auth(token)
                .json(&request_body)
        })
        .await?;

        debug!("patched {}/{} ({:?})", collection, id, field_paths);
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for FirestoreClient {
    async fn fetch_courses(&self, user_id: &str) -> Result<Vec<Course>, AppError> {
        let documents = self.run_query(COURSES, user_id, None).await?;
        Ok(decode_documents(documents))
    }

    async fn fetch_events(&self, user_id: &str) -> Result<Vec<Event>, AppError> {
        let documents = self.run_query(EVENTS, user_id, Some("startDate")).await?;
        Ok(decode_documents(documents))
    }

    async fn update_course(&self, course_id: &str, update: &CourseUpdate) -> Result<(), AppError> {
        self.patch_document(COURSES, course_id, &update.field_paths(), update)
            .await
    }

    async fn update_event(&self, event_id: &str, update: &EventUpdate) -> Result<(), AppError> {
        self.patch_document(EVENTS, event_id, &update.field_paths(), update)
            .await
    }

    async fn delete_event(&self, event_id: &str) -> Result<(), AppError> {
        let url = format!("{}/{}/{}", self.config.documents_url, EVENTS, event_id);

        self.send_authorized(|token| self.client.delete(&url).bearer_auth(token))
            .await?;

        Ok(())
    }
}

fn query_by_owner(collection: &str, user_id: &str, order_by: Option<&str>) -> dto::RunQueryRequest {
    dto::RunQueryRequest {
        structured_query: dto::StructuredQuery {
            from: vec![dto::CollectionSelector {
                collection_id: collection.to_string(),
            }],
            filter: dto::Filter {
                field_filter: dto::FieldFilter {
                    field: dto::FieldReference {
                        field_path: "userId".to_string(),
                    },
                    op: "EQUAL",
                    value: dto::Value::StringValue(user_id.to_string()),
                },
            },
            order_by: order_by
                .map(|path| dto::Order {
                    field: dto::FieldReference {
                        field_path: path.to_string(),
                    },
                    direction: "ASCENDING",
                })
                .into_iter()
                .collect(),
        },
    }
}

async fn check_status(response: Response) -> Result<Response, AppError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    match status {
        StatusCode::NOT_FOUND => Err(AppError::NotFound),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(AppError::Unauthorized(format!(
            "Firestore rejected the request: {}",
            body
        ))),
        _ => Err(AppError::Remote(format!("Firestore API error {}: {}", status, body))),
    }
}

/// Documents that do not fit the model are logged and skipped.
fn decode_documents<T: DeserializeOwned>(documents: Vec<dto::Document>) -> Vec<T> {
    documents
        .into_iter()
        .filter_map(|document| {
            let id = document.id().to_string();
            match decode_document(document) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!("Failed to parse document {}: {}", id, e);
                    None
                }
            }
        })
        .collect()
}

fn decode_document<T: DeserializeOwned>(document: dto::Document) -> Result<T, serde_json::Error> {
    let id = document.id().to_string();
    let mut json = dto::fields_to_json(document.fields);
    if let Some(object) = json.as_object_mut() {
        object.insert("id".to_string(), serde_json::Value::String(id));
    }
    serde_json::from_value(json)
}

fn encode_fields<U: Serialize>(
    update: &U,
) -> Result<std::collections::HashMap<String, dto::Value>, AppError> {
    let json = serde_json::to_value(update)
        .map_err(|e| AppError::BadRequest(format!("Failed to encode update: {}", e)))?;
    match json {
        serde_json::Value::Object(map) => Ok(map
            .into_iter()
            .map(|(k, v)| (k, dto::Value::from_json(v)))
            .collect()),
        _ => Err(AppError::BadRequest("Update must be an object".to_string())),
    }
}
