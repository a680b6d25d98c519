// SPDX-License-Identifier: MIT

//! External service clients.

pub mod discord;

pub use discord::DiscordClient;
