// Payment initiation: method selection, backend call, dispatch by method
// (auto-submitting redirect form or manual-transfer instructions), status surface.
// All backend traffic goes through api_client via the PaymentsBackend seam.

pub mod backend;
pub mod controller;
pub mod error;
pub mod handlers;
pub mod models;
pub mod redirect_form;
