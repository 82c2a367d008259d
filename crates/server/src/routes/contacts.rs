use axum::{
    extract::{rejection::JsonRejection, Query, State},
    Json,
};
use common::types::{ResultResponse, SuccessResponse};
use models::{Contact, EditContact, FilterRequest};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::JsonApiError;
use crate::state::ServerState;

type ContactsReply = Json<SuccessResponse<Vec<Contact>>>;

#[derive(Debug, Deserialize)]
pub struct IdQuery {
    pub id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FavQuery {
    pub id: Option<String>,
    pub action: Option<String>,
}

fn required(value: Option<String>, usage: &str) -> Result<String, JsonApiError> {
    value
        .filter(|v| !v.is_empty())
        .ok_or_else(|| JsonApiError::bad_request(format!("wrong request format, please use {usage}")))
}

pub async fn list_contacts(State(state): State<ServerState>) -> Result<ContactsReply, JsonApiError> {
    let contacts = state.storage.list().await?;
    Ok(Json(SuccessResponse::new("Full list of contacts", contacts)))
}

/// Validate, enrich, assign a fresh id, then store.
pub async fn add_contact(
    State(state): State<ServerState>,
    payload: Result<Json<Contact>, JsonRejection>,
) -> Result<ContactsReply, JsonApiError> {
    let Json(mut contact) = payload?;
    contact.validate()?;
    // enrichment runs outside the storage lock
    state.enricher.fill_missing(&mut contact).await?;

    contact.id = Uuid::new_v4().to_string();
    contact.favorite = false;
    state.storage.add(contact.clone()).await?;
    info!(id = %contact.id, "contact added");
    Ok(Json(SuccessResponse::new("New contact successfully added", vec![contact])))
}

pub async fn delete_contact(
    State(state): State<ServerState>,
    Query(q): Query<IdQuery>,
) -> Result<Json<ResultResponse>, JsonApiError> {
    let id = required(q.id, "id={ID}")?;
    state.storage.delete(&id).await?;
    info!(%id, "contact deleted");
    Ok(Json(ResultResponse::new(format!("Contact \"{id}\" successfully deleted"))))
}

pub async fn edit_contact(
    State(state): State<ServerState>,
    payload: Result<Json<EditContact>, JsonRejection>,
) -> Result<ContactsReply, JsonApiError> {
    let Json(patch) = payload?;
    patch.validate()?;
    let id = patch.id.clone();
    let updated = state.storage.edit(patch).await?;
    Ok(Json(SuccessResponse::new(format!("Contact \"{id}\" successfully updated"), vec![updated])))
}

pub async fn filter_contacts(
    State(state): State<ServerState>,
    payload: Result<Json<FilterRequest>, JsonRejection>,
) -> Result<ContactsReply, JsonApiError> {
    let Json(req) = payload?;
    let contacts = state.storage.filter(&req.field, &req.value).await?;
    Ok(Json(SuccessResponse::new(
        format!("Contacts with {} matching \"{}\"", req.field, req.value),
        contacts,
    )))
}

pub async fn list_favorites(State(state): State<ServerState>) -> Result<ContactsReply, JsonApiError> {
    let contacts = state.storage.list_favs().await?;
    Ok(Json(SuccessResponse::new("Full list of favorites", contacts)))
}

pub async fn change_favorite(
    State(state): State<ServerState>,
    Query(q): Query<FavQuery>,
) -> Result<Json<ResultResponse>, JsonApiError> {
    let usage = "id={ID}&action={add|remove}";
    let id = required(q.id, usage)?;
    let action = required(q.action, usage)?;
    state.storage.change_favs(&id, &action).await?;

    let result = if action == "add" {
        format!("Contact \"{id}\" added to favorites")
    } else {
        format!("Contact \"{id}\" removed from favorites")
    };
    Ok(Json(ResultResponse::new(result)))
}
