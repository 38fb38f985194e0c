pub mod admin_service;
#[cfg(test)]
mod tests;

pub use admin_service::{ActivationApproval, AdminService, AdminServiceTrait, DynAdminService};
