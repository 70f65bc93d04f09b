//! Presentation Layer
//!
//! HTTP handlers, DTOs and routers.

pub mod dto;
pub mod handlers;
pub mod router;

pub use handlers::WalletAppState;
pub use router::{admin_router, admin_router_generic, wallet_router, wallet_router_generic};
