// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Session endpoints: image selection, recognition and history

pub mod handler;
pub mod request;
pub mod response;

pub use handler::{
    clear_history_handler, create_session_handler, delete_session_handler, get_session_handler,
    history_handler, remove_image_handler, select_image_handler, start_handler,
};
pub use request::{SelectImageRequest, MAX_ENCODED_IMAGE_SIZE};
pub use response::{CreateSessionResponse, HistoryResponse};
