//! The runx API operations.
//!
//! Each operation is a static [`Endpoint`]: its request descriptor and the
//! table used to decode its responses. Every documented status is a JSON
//! response.

use http::{Method, StatusCode};

use super::descriptor::{Endpoint, OperationDescriptor};
use super::models::{
    AppDetails, AppList, Billing, Catalog, CreatedApps, GeneratedApiKey, PhoneNumber, Profile,
    Session, Sessions, StatusMessage,
};
use super::payload::{Payload, failure, success};
use crate::client::ParamSpec;
use crate::client::response::{DecodeRule, DecodeTable};

const APP_ID: &[ParamSpec] = &[ParamSpec::path("appId")];

/// `GET /app`
pub static GET_APPS: Endpoint<Payload<AppList>> = Endpoint::new(
    OperationDescriptor::new("getApps", Method::GET, "/app", &[]),
    DecodeTable::new(&[
        DecodeRule::json(StatusCode::OK, success),
        DecodeRule::json(StatusCode::NOT_FOUND, failure),
        DecodeRule::json(StatusCode::INTERNAL_SERVER_ERROR, failure),
    ]),
);

/// `POST /app`
pub static CREATE_APP: Endpoint<Payload<CreatedApps>> = Endpoint::new(
    OperationDescriptor::new("createApp", Method::POST, "/app", &[]),
    DecodeTable::new(&[
        DecodeRule::json(StatusCode::OK, success),
        DecodeRule::json(StatusCode::BAD_REQUEST, failure),
        DecodeRule::json(StatusCode::UNAUTHORIZED, failure),
        DecodeRule::json(StatusCode::NOT_FOUND, failure),
        DecodeRule::json(StatusCode::CONFLICT, failure),
        DecodeRule::json(StatusCode::INTERNAL_SERVER_ERROR, failure),
    ]),
);

/// `DELETE /app/{appId}`
pub static DELETE_APP: Endpoint<Payload<StatusMessage>> = Endpoint::new(
    OperationDescriptor::new("deleteApp", Method::DELETE, "/app/{appId}", APP_ID),
    DecodeTable::new(APP_RULES),
);

/// `GET /app/{appId}`
pub static GET_APP: Endpoint<Payload<AppDetails>> = Endpoint::new(
    OperationDescriptor::new("getApp", Method::GET, "/app/{appId}", APP_ID),
    DecodeTable::new(&[
        DecodeRule::json(StatusCode::OK, success),
        DecodeRule::json(StatusCode::UNAUTHORIZED, failure),
        DecodeRule::json(StatusCode::NOT_FOUND, failure),
        DecodeRule::json(StatusCode::INTERNAL_SERVER_ERROR, failure),
    ]),
);

/// `PUT /app/{appId}`
pub static UPDATE_APP: Endpoint<Payload<StatusMessage>> = Endpoint::new(
    OperationDescriptor::new("updateApp", Method::PUT, "/app/{appId}", APP_ID),
    DecodeTable::new(APP_RULES),
);

/// `PATCH /app/{appId}/enable/{enabled}`
pub static ENABLE_APP: Endpoint<Payload<StatusMessage>> = Endpoint::new(
    OperationDescriptor::new(
        "enableApp",
        Method::PATCH,
        "/app/{appId}/enable/{enabled}",
        &[ParamSpec::path("appId"), ParamSpec::path("enabled")],
    ),
    DecodeTable::new(APP_RULES),
);

/// `PATCH /app/{appId}/restart`
pub static RESTART_APP: Endpoint<Payload<StatusMessage>> = Endpoint::new(
    OperationDescriptor::new("restartApp", Method::PATCH, "/app/{appId}/restart", APP_ID),
    DecodeTable::new(APP_RULES),
);

/// `POST /auth`
pub static AUTH: Endpoint<Payload<Session>> = Endpoint::new(
    OperationDescriptor::new("auth", Method::POST, "/auth", &[]),
    DecodeTable::new(&[
        DecodeRule::json(StatusCode::OK, success),
        DecodeRule::json(StatusCode::NOT_FOUND, failure),
        DecodeRule::json(StatusCode::NOT_ACCEPTABLE, failure),
        DecodeRule::json(StatusCode::INTERNAL_SERVER_ERROR, failure),
    ]),
);

/// `GET /catalog`
pub static GET_CATALOG_APPS: Endpoint<Payload<Catalog>> = Endpoint::new(
    OperationDescriptor::new("getCatalogApps", Method::GET, "/catalog", &[]),
    DecodeTable::new(&[
        DecodeRule::json(StatusCode::OK, success),
        DecodeRule::json(StatusCode::NOT_FOUND, failure),
        DecodeRule::json(StatusCode::INTERNAL_SERVER_ERROR, failure),
    ]),
);

/// `GET /me`
pub static ME: Endpoint<Payload<Profile>> = Endpoint::new(
    OperationDescriptor::new("me", Method::GET, "/me", &[]),
    DecodeTable::new(&[
        DecodeRule::json(StatusCode::OK, success),
        DecodeRule::json(StatusCode::NOT_FOUND, failure),
        DecodeRule::json(StatusCode::INTERNAL_SERVER_ERROR, failure),
    ]),
);

/// `GET /me/billing`
pub static ME_BILLING: Endpoint<Payload<Billing>> = Endpoint::new(
    OperationDescriptor::new("meBilling", Method::GET, "/me/billing", &[]),
    DecodeTable::new(&[
        DecodeRule::json(StatusCode::OK, success),
        DecodeRule::json(StatusCode::NOT_FOUND, failure),
        DecodeRule::json(StatusCode::INTERNAL_SERVER_ERROR, failure),
    ]),
);

/// `POST /me/key/generate`
pub static GENERATE_API_KEY: Endpoint<Payload<GeneratedApiKey>> = Endpoint::new(
    OperationDescriptor::new("generateApiKey", Method::POST, "/me/key/generate", &[]),
    DecodeTable::new(&[
        DecodeRule::json(StatusCode::OK, success),
        DecodeRule::json(StatusCode::NOT_FOUND, failure),
        DecodeRule::json(StatusCode::INTERNAL_SERVER_ERROR, failure),
    ]),
);

/// `GET /me/number`
pub static REVEAL_NUMBER: Endpoint<Payload<PhoneNumber>> = Endpoint::new(
    OperationDescriptor::new("revealNumber", Method::GET, "/me/number", &[]),
    DecodeTable::new(&[
        DecodeRule::json(StatusCode::OK, success),
        DecodeRule::json(StatusCode::INTERNAL_SERVER_ERROR, failure),
    ]),
);

/// `GET /me/session`
pub static ME_SESSION: Endpoint<Payload<Sessions>> = Endpoint::new(
    OperationDescriptor::new("meSession", Method::GET, "/me/session", &[]),
    DecodeTable::new(&[
        DecodeRule::json(StatusCode::OK, success),
        DecodeRule::json(StatusCode::INTERNAL_SERVER_ERROR, failure),
    ]),
);

/// `DELETE /me/session/{sessionId}`
///
/// Success has no documented body: only the error statuses are decoded.
pub static DELETE_SESSION: Endpoint<Payload<()>> = Endpoint::new(
    OperationDescriptor::new(
        "deleteSession",
        Method::DELETE,
        "/me/session/{sessionId}",
        &[ParamSpec::path("sessionId")],
    ),
    DecodeTable::new(&[
        DecodeRule::json(StatusCode::NOT_FOUND, failure),
        DecodeRule::json(StatusCode::INTERNAL_SERVER_ERROR, failure),
    ]),
);

/// `POST /register`
pub static REGISTER: Endpoint<Payload<Session>> = Endpoint::new(
    OperationDescriptor::new("register", Method::POST, "/register", &[]),
    DecodeTable::new(&[
        DecodeRule::json(StatusCode::OK, success),
        DecodeRule::json(StatusCode::CONFLICT, failure),
        DecodeRule::json(StatusCode::INTERNAL_SERVER_ERROR, failure),
    ]),
);

const APP_RULES: &[DecodeRule<Payload<StatusMessage>>] = &[
    DecodeRule::json(StatusCode::OK, success),
    DecodeRule::json(StatusCode::UNAUTHORIZED, failure),
    DecodeRule::json(StatusCode::NOT_FOUND, failure),
    DecodeRule::json(StatusCode::INTERNAL_SERVER_ERROR, failure),
];

/// Descriptors of every operation.
pub fn descriptors() -> [&'static OperationDescriptor; 16] {
    [
        &GET_APPS.descriptor,
        &CREATE_APP.descriptor,
        &DELETE_APP.descriptor,
        &GET_APP.descriptor,
        &UPDATE_APP.descriptor,
        &ENABLE_APP.descriptor,
        &RESTART_APP.descriptor,
        &AUTH.descriptor,
        &GET_CATALOG_APPS.descriptor,
        &ME.descriptor,
        &ME_BILLING.descriptor,
        &GENERATE_API_KEY.descriptor,
        &REVEAL_NUMBER.descriptor,
        &ME_SESSION.descriptor,
        &DELETE_SESSION.descriptor,
        &REGISTER.descriptor,
    ]
}
