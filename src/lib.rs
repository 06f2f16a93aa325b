#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

mod board;
mod common;
mod config;
mod coordinate;
mod events;
mod game;
mod player;
mod ship;
#[cfg(feature = "std")]
pub mod console;
#[cfg(feature = "std")]
pub mod domain;
#[cfg(feature = "std")]
mod logging;
#[cfg(feature = "std")]
pub mod notify;
#[cfg(feature = "std")]
pub mod session;

pub use board::*;
pub use common::*;
pub use config::*;
pub use coordinate::*;
pub use events::*;
pub use game::*;
pub use player::*;
pub use ship::*;
#[cfg(feature = "std")]
pub use console::{render_fleet_board, render_target_board, ConsoleGame};
#[cfg(feature = "std")]
pub use logging::{init_logging, LOG_ENV};
#[cfg(feature = "std")]
pub use notify::{NotificationRelay, Notification, Notifier, RelayHandle};
#[cfg(feature = "std")]
pub use session::MatchHandle;
