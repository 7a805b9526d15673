//! Travel promo card generator.
//!
//! `card` is the rendering core (pure given its inputs plus the font
//! cache); `api`/`state` are the HTTP surface around it.

pub mod api;
pub mod card;
pub mod fetch;
pub mod openapi;
pub mod perf;
pub mod state;
pub mod util;
