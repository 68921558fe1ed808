// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Types shared by the network provider's HTTP and backend layers
//!
//! This crate defines the REST wire types for the provider's Neutron-style
//! API, the error type used throughout the server, and small helpers for
//! executables.  It deliberately contains no I/O: everything here is plain
//! data that both the HTTP layer and the orchestration engine agree on.

pub mod api;
pub mod cmd;
pub mod error;

pub use error::Error;
pub use error::LookupType;
