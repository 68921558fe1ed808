// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error handling facilities for the network provider
//!
//! For HTTP-level error handling, see Dropshot.

use crate::api::ResourceType;
use dropshot::HttpError;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

/// An error that can be generated within the provider
///
/// These may be generated while handling a client request or while issuing
/// commands against the northbound database.  When generated as part of an
/// HTTP request, an `Error` will be converted into an HTTP error as one of
/// the last steps in processing the request.  This allows most of the system
/// to remain agnostic to the transport with which the system communicates
/// with clients.
#[derive(Clone, Debug, Deserialize, thiserror::Error, PartialEq, Serialize)]
pub enum Error {
    /// An object needed as part of this operation was not found.
    #[error("Object (of type {lookup_type:?}) not found: {type_name}")]
    ObjectNotFound { type_name: ResourceType, lookup_type: LookupType },
    /// The request was well-formed, but carrying it out would violate a
    /// referential invariant (e.g., deleting a router that still has ports).
    #[error("Conflict: {message}")]
    Conflict { message: String },
    /// A subnet request referenced a network that does not exist or that
    /// cannot accept the subnet.
    #[error("Subnet misconfiguration: {message}")]
    SubnetConfig { message: String },
    /// The specified input field carries a value the provider does not
    /// support.
    #[error("Unsupported value for \"{label}\": {message}")]
    UnsupportedDataValue { label: String, message: String },
    /// The request itself was malformed.
    #[error("Invalid Request: {message}")]
    InvalidRequest { message: String },

    /// The system encountered an unhandled operational error.
    #[error("Internal Error: {internal_message}")]
    InternalError { internal_message: String },
    /// The system (or part of it) is unavailable.  This is the class a
    /// northbound transport reports when the backend cannot be reached.
    #[error("Service Unavailable: {internal_message}")]
    ServiceUnavailable { internal_message: String },
}

/// Indicates how an object was looked up (for an `ObjectNotFound` error)
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub enum LookupType {
    /// a specific name was requested
    ByName(String),
    /// a specific id was requested
    ById(Uuid),
}

impl LookupType {
    /// Returns an ObjectNotFound error appropriate for the case where this
    /// lookup failed
    pub fn into_not_found(self, type_name: ResourceType) -> Error {
        Error::ObjectNotFound { type_name, lookup_type: self }
    }
}

impl Error {
    /// Generates an [`Error::ObjectNotFound`] error for a lookup by object id.
    pub fn not_found_by_id(type_name: ResourceType, id: &Uuid) -> Error {
        LookupType::ById(*id).into_not_found(type_name)
    }

    /// Generates an [`Error::Conflict`] error with the specific message
    ///
    /// This should be used when the request is valid in isolation but cannot
    /// be carried out without violating a referential invariant.
    pub fn conflict(message: &str) -> Error {
        Error::Conflict { message: message.to_owned() }
    }

    /// Generates an [`Error::SubnetConfig`] error with the specific message
    pub fn subnet_config(message: &str) -> Error {
        Error::SubnetConfig { message: message.to_owned() }
    }

    /// Generates an [`Error::UnsupportedDataValue`] error for the given field
    pub fn unsupported_value(label: &str, message: &str) -> Error {
        Error::UnsupportedDataValue {
            label: label.to_owned(),
            message: message.to_owned(),
        }
    }

    /// Generates an [`Error::InvalidRequest`] error with the specific message
    ///
    /// This should be used for failures due possibly to invalid client input
    /// or malformed requests.
    pub fn invalid_request(message: &str) -> Error {
        Error::InvalidRequest { message: message.to_owned() }
    }

    /// Generates an [`Error::InternalError`] error with the specific message
    ///
    /// InternalError should be used for operational conditions that should
    /// not happen but that we cannot reasonably handle at runtime (e.g., a
    /// row in the backend that fails to deserialize, or finding two rows for
    /// something that is supposed to be unique).
    pub fn internal_error(internal_message: &str) -> Error {
        Error::InternalError { internal_message: internal_message.to_owned() }
    }
}

impl From<Error> for HttpError {
    /// Converts an `Error` error into an `HttpError`.  This defines how
    /// errors that are represented internally using `Error` are ultimately
    /// exposed to clients over HTTP.
    fn from(error: Error) -> HttpError {
        match error {
            Error::ObjectNotFound { type_name: t, lookup_type: lt } => {
                let (lookup_field, lookup_value) = match lt {
                    LookupType::ByName(name) => ("name", name),
                    LookupType::ById(id) => ("id", id.to_string()),
                };
                let message = format!(
                    "not found: {} with {} \"{}\"",
                    t, lookup_field, lookup_value
                );
                HttpError::for_client_error(
                    Some(String::from("ObjectNotFound")),
                    http::StatusCode::NOT_FOUND,
                    message,
                )
            }

            Error::Conflict { message } => HttpError::for_client_error(
                Some(String::from("Conflict")),
                http::StatusCode::CONFLICT,
                message,
            ),

            Error::SubnetConfig { message } => HttpError::for_bad_request(
                Some(String::from("SubnetConfig")),
                message,
            ),

            Error::UnsupportedDataValue { label, message } => {
                let message =
                    format!("unsupported value for \"{}\": {}", label, message);
                HttpError::for_bad_request(
                    Some(String::from("UnsupportedDataValue")),
                    message,
                )
            }

            Error::InvalidRequest { message } => HttpError::for_bad_request(
                Some(String::from("InvalidRequest")),
                message,
            ),

            Error::InternalError { internal_message } => {
                HttpError::for_internal_error(internal_message)
            }

            Error::ServiceUnavailable { internal_message } => {
                HttpError::for_unavail(
                    Some(String::from("ServiceNotAvailable")),
                    internal_message,
                )
            }
        }
    }
}
