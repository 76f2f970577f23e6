// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Recurring visitors registered by residents.

use parking_domain::constants::end_of_time;
use parking_domain::{
    DomainError, PermitStatus, Relationship, SelectOptions, Visitor, VisitorFilter,
    validate_new_visitor,
};
use parking_persistence::Persistence;
use time::OffsetDateTime;
use tracing::info;
use uuid::Uuid;

use crate::auth::{AuthenticatedActor, AuthorizationService};
use crate::error::ApiError;
use crate::request_response::{CreateVisitorRequest, ListQuery, ListWithMetadata, MessageResponse};

/// Lists the visitors whose access window contains `now`.
///
/// # Errors
///
/// Returns an error if the query is invalid or the database fails.
pub fn list_visitors(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    query: &ListQuery,
    now: OffsetDateTime,
) -> Result<ListWithMetadata<Visitor>, ApiError> {
    let filter: VisitorFilter = VisitorFilter {
        resident_id: actor.resident_scope(),
    };
    let opts: SelectOptions = query
        .to_select_options()?
        .with_status(PermitStatus::Active);
    let records: Vec<Visitor> = persistence.select_visitors(&filter, &opts, now)?;
    let total: i64 = persistence.count_visitors(&filter, &opts.for_count(), now)?;
    Ok(ListWithMetadata::new(records, total))
}

/// Registers a visitor for the calling resident.
///
/// A visitor with `isForever` gets access from `now` until the end of time.
///
/// # Errors
///
/// Returns an error if the caller is not a resident, a field is missing or
/// invalid, or the database fails.
pub fn create_visitor(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    request: CreateVisitorRequest,
    now: OffsetDateTime,
) -> Result<Visitor, ApiError> {
    AuthorizationService::authorize_resident(actor, "create_visitor")?;

    let relationship: Relationship = validate_new_visitor(
        &request.first_name,
        &request.last_name,
        &request.relationship,
        (request.access_start, request.access_end),
        request.is_forever,
    )?;
    let (access_start, access_end): (OffsetDateTime, OffsetDateTime) = if request.is_forever {
        (now, end_of_time())
    } else {
        match (request.access_start, request.access_end) {
            (Some(start), Some(end)) => (start, end),
            _ => {
                return Err(
                    DomainError::EmptyFields(String::from("accessStart, accessEnd")).into(),
                );
            }
        }
    };

    let visitor: Visitor = Visitor {
        id: Uuid::new_v4().to_string(),
        resident_id: actor.id.clone(),
        first_name: request.first_name,
        last_name: request.last_name,
        relationship: relationship.as_str().to_string(),
        access_start,
        access_end,
    };
    persistence.create_visitor(&visitor)?;
    info!(visitor_id = %visitor.id, resident_id = %visitor.resident_id, "Created visitor");
    Ok(visitor)
}

/// Deletes a visitor. Residents may only delete their own.
///
/// # Errors
///
/// Returns an error if the visitor does not exist, belongs to another
/// resident, or the database fails.
pub fn delete_visitor(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    visitor_id: &str,
) -> Result<MessageResponse, ApiError> {
    let visitor: Visitor = persistence
        .get_visitor(visitor_id)?
        .ok_or_else(|| ApiError::not_found("visitor"))?;
    AuthorizationService::authorize_owner(actor, &visitor.resident_id, "delete_visitor")?;

    persistence
        .delete_visitor(visitor_id)
        .map_err(|e| ApiError::from_missing(e, "visitor"))?;
    info!(visitor_id, "Deleted visitor");
    Ok(MessageResponse::new("Successfully deleted visitor"))
}
