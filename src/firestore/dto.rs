use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A typed Firestore value as it appears on the REST wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Value {
    NullValue(()),
    BooleanValue(bool),
    IntegerValue(String),
    DoubleValue(f64),
    TimestampValue(String),
    StringValue(String),
    BytesValue(String),
    ReferenceValue(String),
    GeoPointValue(serde_json::Value),
    ArrayValue(ArrayValue),
    MapValue(MapValue),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArrayValue {
    #[serde(default)]
    pub values: Vec<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MapValue {
    #[serde(default)]
    pub fields: HashMap<String, Value>,
}

impl Value {
    pub fn into_json(self) -> serde_json::Value {
        use serde_json::Value as Json;

        match self {
            Value::NullValue(()) => Json::Null,
            Value::BooleanValue(b) => Json::Bool(b),
            Value::IntegerValue(raw) => raw
                .parse::<i64>()
                .map(Json::from)
                .unwrap_or(Json::String(raw)),
            Value::DoubleValue(d) => Json::from(d),
            Value::TimestampValue(s)
            | Value::StringValue(s)
            | Value::BytesValue(s)
            | Value::ReferenceValue(s) => Json::String(s),
            Value::GeoPointValue(point) => point,
            Value::ArrayValue(array) => {
                Json::Array(array.values.into_iter().map(Value::into_json).collect())
            }
            Value::MapValue(map) => fields_to_json(map.fields),
        }
    }

    pub fn from_json(json: serde_json::Value) -> Self {
        use serde_json::Value as Json;

        match json {
            Json::Null => Value::NullValue(()),
            Json::Bool(b) => Value::BooleanValue(b),
            Json::Number(n) => match n.as_i64() {
                Some(i) => Value::IntegerValue(i.to_string()),
                None => Value::DoubleValue(n.as_f64().unwrap_or_default()),
            },
            Json::String(s) => Value::StringValue(s),
            Json::Array(items) => Value::ArrayValue(ArrayValue {
                values: items.into_iter().map(Value::from_json).collect(),
            }),
            Json::Object(map) => Value::MapValue(MapValue {
                fields: map.into_iter().map(|(k, v)| (k, Value::from_json(v))).collect(),
            }),
        }
    }
}

pub fn fields_to_json(fields: HashMap<String, Value>) -> serde_json::Value {
    serde_json::Value::Object(
        fields
            .into_iter()
            .map(|(k, v)| (k, v.into_json()))
            .collect(),
    )
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub name: String,
    #[serde(default)]
    pub fields: HashMap<String, Value>,
}

impl Document {
    /// The document id: last segment of the resource name.
    pub fn id(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or(&self.name)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunQueryResponse {
    #[serde(default)]
    pub document: Option<Document>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunQueryRequest {
    pub structured_query: StructuredQuery,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredQuery {
    pub from: Vec<CollectionSelector>,
    #[serde(rename = "where")]
    pub filter: Filter,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub order_by: Vec<Order>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionSelector {
    pub collection_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Filter {
    pub field_filter: FieldFilter,
}

#[derive(Debug, Serialize)]
pub struct FieldFilter {
    pub field: FieldReference,
    pub op: &'static str,
    pub value: Value,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldReference {
    pub field_path: String,
}

#[derive(Debug, Serialize)]
pub struct Order {
    pub field: FieldReference,
    pub direction: &'static str,
}

#[derive(Debug, Serialize)]
pub struct UpdateDocumentRequest {
    pub fields: HashMap<String, Value>,
}
