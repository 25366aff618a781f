// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

pub mod find;
pub mod keys;
pub mod name;

pub use find::{FindArgs, find_command};
pub use keys::keys_command;
pub use name::{NameArgs, NameLevel, name_command};
