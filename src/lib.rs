//! Psyche Rover game library
//!
//! A temperature-management runner: steer a rover across a metal asteroid,
//! dodge obstacles and impacts, and keep the hull between freezing and
//! meltdown while hot and cold zones come and go.
//!
//! The simulation ([`game::RoverGame`]) and renderer ([`draw::Renderer`])
//! are plain Rust with no ECS dependency; [`session`] and [`menu`] host them
//! in a Bevy app.

pub mod archetype;
pub mod config;
pub mod constants;
pub mod draw;
pub mod error;
pub mod game;
pub mod graphics;
pub mod impacts;
pub mod leaderboard;
pub mod menu;
pub mod obstacles;
pub mod particles;
pub mod progression;
pub mod rover;
pub mod session;
pub mod sprite;
pub mod thermal;
pub mod zones;
