//! Contacts API handlers.
//!
//! ```text
//! GET    /api/contacts?limit=10&offset=0
//! GET    /api/contacts/{id}
//! POST   /api/contacts {"first_name":"Ada","last_name":"Lovelace","phone_number":"555-0100"}
//! PUT    /api/contacts/{id}
//! DELETE /api/contacts/{id}
//! GET    /api/contacts/search?first_name=Ada&email=ada@example.com
//! GET    /api/contacts/birthdays?days=7
//! ```
//!
//! Every handler takes an [`AuthenticatedUser`] and scopes its port call to
//! that user. A contact owned by somebody else is reported exactly like a
//! missing one.

use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{
    BirthdayWindow, Contact, ContactDraft, ContactId, ContactSearch, ContactValidationError,
    Error, Page,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    birthday_window_error, contact_validation_error, page_validation_error,
};

/// Create and update body for a contact.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct ContactRequest {
    /// Given name, 1 to 50 characters.
    #[schema(example = "Ada")]
    pub first_name: String,
    /// Family name, 1 to 50 characters.
    #[schema(example = "Lovelace")]
    pub last_name: String,
    /// Optional email address.
    #[serde(default)]
    #[schema(example = "ada@example.com")]
    pub email: Option<String>,
    /// Phone number, 1 to 20 characters.
    #[schema(example = "555-0100")]
    pub phone_number: String,
    /// Optional ISO date of birth.
    #[serde(default)]
    #[schema(value_type = Option<String>, format = Date, example = "1815-12-10")]
    pub birthday: Option<NaiveDate>,
}

impl TryFrom<ContactRequest> for ContactDraft {
    type Error = ContactValidationError;

    fn try_from(value: ContactRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(
            value.first_name,
            value.last_name,
            value.email,
            value.phone_number,
            value.birthday,
        )
    }
}

/// Pagination parameters for `GET /api/contacts`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListParams {
    /// Page size, 10 to 500. Defaults to 10.
    pub limit: Option<i64>,
    /// Rows to skip. Defaults to 0.
    pub offset: Option<i64>,
}

/// Filters for `GET /api/contacts/search`. Present filters are OR-ed.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchParams {
    /// Exact first name.
    pub first_name: Option<String>,
    /// Exact last name.
    pub last_name: Option<String>,
    /// Exact email address.
    pub email: Option<String>,
}

/// Window for `GET /api/contacts/birthdays`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BirthdayParams {
    /// Days ahead of today, 1 to 365. Defaults to 7.
    pub days: Option<u16>,
}

fn contact_not_found() -> Error {
    Error::not_found("contact not found")
}

fn contact_id(raw: i64) -> Result<ContactId, Error> {
    ContactId::new(raw).map_err(|_| contact_not_found())
}

/// List the caller's contacts one page at a time.
#[utoipa::path(
    get,
    path = "/api/contacts",
    params(ListParams),
    responses(
        (status = 200, description = "Contacts", body = [Contact]),
        (status = 401, description = "Missing or invalid token", body = Error),
        (status = 422, description = "Invalid pagination", body = Error),
        (status = 429, description = "Rate limit exceeded", body = Error)
    ),
    tags = ["contacts"],
    operation_id = "listContacts"
)]
#[get("")]
pub async fn list_contacts(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    params: web::Query<ListParams>,
) -> ApiResult<web::Json<Vec<Contact>>> {
    let ListParams { limit, offset } = params.into_inner();
    let page = Page::new(limit, offset).map_err(|err| page_validation_error(&err))?;
    let contacts = state.contacts_query.list(user.id(), page).await?;
    Ok(web::Json(contacts))
}

/// Fetch one contact by id.
#[utoipa::path(
    get,
    path = "/api/contacts/{id}",
    params(("id" = i64, Path, description = "Contact identifier")),
    responses(
        (status = 200, description = "Contact", body = Contact),
        (status = 401, description = "Missing or invalid token", body = Error),
        (status = 404, description = "Contact not found", body = Error)
    ),
    tags = ["contacts"],
    operation_id = "getContact"
)]
#[get("/{id:\\d+}")]
pub async fn get_contact(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
) -> ApiResult<web::Json<Contact>> {
    let id = contact_id(path.into_inner())?;
    state
        .contacts_query
        .get(user.id(), id)
        .await?
        .map(web::Json)
        .ok_or_else(contact_not_found)
}

/// Create a contact owned by the caller.
#[utoipa::path(
    post,
    path = "/api/contacts",
    request_body = ContactRequest,
    responses(
        (status = 201, description = "Contact created", body = Contact),
        (status = 401, description = "Missing or invalid token", body = Error),
        (status = 422, description = "Invalid contact", body = Error)
    ),
    tags = ["contacts"],
    operation_id = "createContact"
)]
#[post("")]
pub async fn create_contact(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    payload: web::Json<ContactRequest>,
) -> ApiResult<HttpResponse> {
    let draft = ContactDraft::try_from(payload.into_inner())
        .map_err(|err| contact_validation_error(&err))?;
    let contact = state.contacts_command.create(user.id(), draft).await?;
    Ok(HttpResponse::Created().json(contact))
}

/// Replace every editable field of a contact.
#[utoipa::path(
    put,
    path = "/api/contacts/{id}",
    params(("id" = i64, Path, description = "Contact identifier")),
    request_body = ContactRequest,
    responses(
        (status = 200, description = "Contact updated", body = Contact),
        (status = 401, description = "Missing or invalid token", body = Error),
        (status = 404, description = "Contact not found", body = Error),
        (status = 422, description = "Invalid contact", body = Error)
    ),
    tags = ["contacts"],
    operation_id = "updateContact"
)]
#[put("/{id:\\d+}")]
pub async fn update_contact(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
    payload: web::Json<ContactRequest>,
) -> ApiResult<web::Json<Contact>> {
    let id = contact_id(path.into_inner())?;
    let draft = ContactDraft::try_from(payload.into_inner())
        .map_err(|err| contact_validation_error(&err))?;
    state
        .contacts_command
        .update(user.id(), id, draft)
        .await?
        .map(web::Json)
        .ok_or_else(contact_not_found)
}

/// Delete a contact and return what was removed.
#[utoipa::path(
    delete,
    path = "/api/contacts/{id}",
    params(("id" = i64, Path, description = "Contact identifier")),
    responses(
        (status = 200, description = "Deleted contact", body = Contact),
        (status = 401, description = "Missing or invalid token", body = Error),
        (status = 404, description = "Contact not found", body = Error)
    ),
    tags = ["contacts"],
    operation_id = "deleteContact"
)]
#[delete("/{id:\\d+}")]
pub async fn delete_contact(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
) -> ApiResult<web::Json<Contact>> {
    let id = contact_id(path.into_inner())?;
    state
        .contacts_command
        .delete(user.id(), id)
        .await?
        .map(web::Json)
        .ok_or_else(contact_not_found)
}

/// Find contacts matching any of the supplied filters.
///
/// Matching is exact. With no filters every contact of the caller is returned.
#[utoipa::path(
    get,
    path = "/api/contacts/search",
    params(SearchParams),
    responses(
        (status = 200, description = "Matching contacts", body = [Contact]),
        (status = 401, description = "Missing or invalid token", body = Error)
    ),
    tags = ["contacts"],
    operation_id = "searchContacts"
)]
#[get("/search")]
pub async fn search_contacts(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    params: web::Query<SearchParams>,
) -> ApiResult<web::Json<Vec<Contact>>> {
    let SearchParams {
        first_name,
        last_name,
        email,
    } = params.into_inner();
    let search = ContactSearch::new(first_name, last_name, email);
    let contacts = state.contacts_query.search(user.id(), search).await?;
    Ok(web::Json(contacts))
}

/// Contacts whose birthday falls within the next `days` days, soonest first.
#[utoipa::path(
    get,
    path = "/api/contacts/birthdays",
    params(BirthdayParams),
    responses(
        (status = 200, description = "Upcoming birthdays", body = [Contact]),
        (status = 401, description = "Missing or invalid token", body = Error),
        (status = 422, description = "Window out of range", body = Error)
    ),
    tags = ["contacts"],
    operation_id = "upcomingBirthdays"
)]
#[get("/birthdays")]
pub async fn upcoming_birthdays(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    params: web::Query<BirthdayParams>,
) -> ApiResult<web::Json<Vec<Contact>>> {
    let window = params
        .into_inner()
        .days
        .map_or_else(|| Ok(BirthdayWindow::default()), BirthdayWindow::new)
        .map_err(|err| birthday_window_error(&err))?;
    let contacts = state
        .contacts_query
        .upcoming_birthdays(user.id(), window)
        .await?;
    Ok(web::Json(contacts))
}

/// Register the contact routes on a `/api/contacts` scope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_contacts)
        .service(create_contact)
        .service(search_contacts)
        .service(upcoming_birthdays)
        .service(get_contact)
        .service(update_contact)
        .service(delete_contact);
}

#[cfg(test)]
#[path = "contacts_tests.rs"]
mod tests;
