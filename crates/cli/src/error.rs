// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Errors surfaced by [`crate::client::RelayClient`].

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request to relayd failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("relayd rejected the request ({status}): {message}")]
    Api { status: reqwest::StatusCode, message: String },
}
