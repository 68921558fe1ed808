// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shared state used by API request handlers

use crate::ovn_north::OvnNorth;
use slog::Logger;
use std::sync::Arc;

/// Shared state available to all endpoint handlers
pub struct ServerContext {
    /// orchestration engine backing the API
    pub ovn_north: Arc<OvnNorth>,
    /// tenant reported for every resource and echoed in issued tokens
    pub tenant_id: String,
    /// logger for API requests
    pub log: Logger,
}

impl ServerContext {
    pub fn new(
        ovn_north: Arc<OvnNorth>,
        tenant_id: String,
        log: Logger,
    ) -> Arc<ServerContext> {
        Arc::new(ServerContext { ovn_north, tenant_id, log })
    }
}
