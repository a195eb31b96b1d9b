use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::debug;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Document {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "temp-id", default, skip_serializing_if = "Option::is_none")]
    pub temp_id: Option<String>,
    #[serde(default)]
    pub attributes: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub relationships: Map<String, Value>,
}

#[derive(Deserialize)]
pub struct Payload {
    pub data: Document,
    #[serde(default)]
    pub included: Vec<Document>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Single {
    pub data: Document,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct List {
    pub data: Vec<Document>,
}

/// Every collection, keyed by type tag, in insertion order.
#[derive(Default)]
pub struct Store {
    next_id: u64,
    collections: HashMap<String, BTreeMap<u64, Document>>,
}

impl Store {
    fn insert(&mut self, mut document: Document) -> Document {
        self.next_id += 1;
        let id = self.next_id;
        document.id = Some(id.to_string());
        document.temp_id = None;
        self.collections
            .entry(document.kind.clone())
            .or_default()
            .insert(id, document.clone());
        document
    }

    fn get(&self, kind: &str, id: &str) -> Option<&Document> {
        let key: u64 = id.parse().ok()?;
        self.collections.get(kind)?.get(&key)
    }

    fn get_mut(&mut self, kind: &str, id: &str) -> Option<&mut Document> {
        let key: u64 = id.parse().ok()?;
        self.collections.get_mut(kind)?.get_mut(&key)
    }
}

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/{kind}", get(list_resources).post(create_resource))
        .route(
            "/{kind}/{id}",
            get(get_resource)
                .put(update_resource)
                .patch(update_resource)
                .delete(delete_resource),
        )
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// `filter[field]=value` query keys select on exact string attribute match.
async fn list_resources(
    State(db): State<Db>,
    Path(kind): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Json<List> {
    let filters: Vec<(&str, &str)> = query
        .iter()
        .filter_map(|(key, value)| {
            let field = key.strip_prefix("filter[")?.strip_suffix(']')?;
            Some((field, value.as_str()))
        })
        .collect();

    let store = db.read().await;
    let data = store
        .collections
        .get(&kind)
        .map(|collection| {
            collection
                .values()
                .filter(|doc| {
                    filters
                        .iter()
                        .all(|(field, value)| doc.attributes.get(*field).and_then(Value::as_str) == Some(*value))
                })
                .cloned()
                .collect()
        })
        .unwrap_or_default();
    Json(List { data })
}

async fn create_resource(
    State(db): State<Db>,
    Path(kind): Path<String>,
    Json(payload): Json<Payload>,
) -> Result<(StatusCode, Json<Single>), StatusCode> {
    let Payload { mut data, included } = payload;
    if data.kind != kind || data.id.is_some() {
        return Err(StatusCode::CONFLICT);
    }

    let temp_ids = check_temp_ids(&data, &included)?;

    let mut store = db.write().await;
    let mut created = HashMap::new();
    for (temp_id, document) in temp_ids.into_iter().zip(included) {
        created.insert(temp_id, store.insert(document));
    }

    for relationship in data.relationships.values_mut() {
        let Some(target) = relationship["data"]["temp-id"].as_str().and_then(|t| created.get(t)) else {
            continue;
        };
        relationship["data"] = serde_json::json!({ "type": target.kind, "id": target.id });
    }

    let stored = store.insert(data);
    debug!(kind = %stored.kind, id = ?stored.id, included = created.len(), "created");
    Ok((StatusCode::CREATED, Json(Single { data: stored })))
}

/// Temp-ids of `included`, in order, once the compound create is known to
/// be consistent: every included document is referenced by exactly one
/// relationship of `data`, and every temp-id reference names an included
/// document. Nothing is stored unless this passes.
fn check_temp_ids(data: &Document, included: &[Document]) -> Result<Vec<String>, StatusCode> {
    let mut temp_ids: Vec<String> = Vec::with_capacity(included.len());
    for document in included {
        let temp_id = document.temp_id.as_deref().ok_or(StatusCode::UNPROCESSABLE_ENTITY)?;
        let references = data
            .relationships
            .values()
            .filter(|rel| rel["data"]["temp-id"].as_str() == Some(temp_id))
            .count();
        if references != 1 || temp_ids.iter().any(|seen| seen == temp_id) {
            return Err(StatusCode::UNPROCESSABLE_ENTITY);
        }
        temp_ids.push(temp_id.to_string());
    }

    let dangling = data
        .relationships
        .values()
        .filter_map(|rel| rel["data"]["temp-id"].as_str())
        .any(|temp_id| !temp_ids.iter().any(|known| known == temp_id));
    if dangling {
        return Err(StatusCode::UNPROCESSABLE_ENTITY);
    }
    Ok(temp_ids)
}

async fn get_resource(
    State(db): State<Db>,
    Path((kind, id)): Path<(String, String)>,
) -> Result<Json<Single>, StatusCode> {
    let store = db.read().await;
    store
        .get(&kind, &id)
        .map(|doc| Json(Single { data: doc.clone() }))
        .ok_or(StatusCode::NOT_FOUND)
}

async fn update_resource(
    State(db): State<Db>,
    Path((kind, id)): Path<(String, String)>,
    Json(payload): Json<Payload>,
) -> Result<Json<Single>, StatusCode> {
    let Payload { data, .. } = payload;
    if data.kind != kind || data.id.as_deref().is_some_and(|body_id| body_id != id) {
        return Err(StatusCode::CONFLICT);
    }

    let mut store = db.write().await;
    let doc = store.get_mut(&kind, &id).ok_or(StatusCode::NOT_FOUND)?;
    doc.attributes.extend(data.attributes);
    doc.relationships.extend(data.relationships);
    Ok(Json(Single { data: doc.clone() }))
}

async fn delete_resource(
    State(db): State<Db>,
    Path((kind, id)): Path<(String, String)>,
) -> Result<StatusCode, StatusCode> {
    let key: u64 = id.parse().map_err(|_| StatusCode::NOT_FOUND)?;
    let mut store = db.write().await;
    store
        .collections
        .get_mut(&kind)
        .and_then(|collection| collection.remove(&key))
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or(StatusCode::NOT_FOUND)
}
