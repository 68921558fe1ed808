// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Handler functions (entrypoints) for the token endpoint
//!
//! Clients built for Keystone expect to obtain a token before talking to the
//! network API.  This provider performs no authentication, so the endpoint
//! accepts any credentials and hands back a fresh token that is never
//! checked.  Only `POST /v2.0/tokens` exists; every other path 404s.

use crate::context::ServerContext;
use dropshot::endpoint;
use dropshot::ApiDescription;
use dropshot::HttpError;
use dropshot::HttpResponseOk;
use dropshot::RequestContext;
use dropshot::UntypedBody;
use schemars::JsonSchema;
use serde::Serialize;
use slog::debug;
use std::sync::Arc;
use uuid::Uuid;

/// Returns a description of the token API
pub fn auth_api() -> ApiDescription<Arc<ServerContext>> {
    let mut api = ApiDescription::new();
    if let Err(err) = api.register(tokens_post) {
        panic!("failed to register entrypoints: {}", err);
    }
    api
}

#[derive(JsonSchema, Serialize)]
struct TokenResponse {
    access: TokenAccess,
}

#[derive(JsonSchema, Serialize)]
struct TokenAccess {
    token: Token,
}

#[derive(JsonSchema, Serialize)]
struct Token {
    id: Uuid,
    tenant: TokenTenant,
}

#[derive(JsonSchema, Serialize)]
struct TokenTenant {
    id: String,
}

/// Issue a token
///
/// The body is ignored apart from being logged at debug level.  Keystone
/// clients send several credential shapes, none of which matter here.
#[endpoint {
    method = POST,
    path = "/v2.0/tokens",
}]
async fn tokens_post(
    rqctx: RequestContext<Arc<ServerContext>>,
    body: UntypedBody,
) -> Result<HttpResponseOk<TokenResponse>, HttpError> {
    let apictx = rqctx.context();
    debug!(apictx.log, "token requested";
        "body_bytes" => body.as_bytes().len());
    let token = Token {
        id: Uuid::new_v4(),
        tenant: TokenTenant { id: apictx.tenant_id.clone() },
    };
    Ok(HttpResponseOk(TokenResponse { access: TokenAccess { token } }))
}
