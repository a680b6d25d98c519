// SPDX-License-Identifier: MIT

//! Data models for the application.

pub mod user;
pub mod vote;

pub use user::User;
pub use vote::{ThemeCount, Vote, CURRENT_VOTING_PERIOD};
