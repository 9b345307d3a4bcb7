mod message;
mod status;
mod webhook;

pub mod dtos {
    pub use crate::webhook::dtos::*;
}

pub use crate::message::api::*;
pub use crate::status::api::*;
pub use crate::webhook::api::*;
