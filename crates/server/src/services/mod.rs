pub mod admin;
pub mod referral;
pub mod user;

use crate::services::{
    admin::{AdminService, DynAdminService},
    referral::CommissionTable,
    user::{DynUserService, UserService},
};
use database::Database;
use std::sync::Arc;
use tracing::info;
use utils::{AppConfig, AppResult};

/// 所有Service的聚合，挂在 Extension 上供控制器取用
#[derive(Clone)]
pub struct Services {
    pub user: DynUserService,
    pub admin: DynAdminService,
    pub database: Arc<Database>,
}

impl Services {
    pub fn new(database: Arc<Database>, config: Arc<AppConfig>) -> AppResult<Self> {
        let commission_table = CommissionTable::parse(&config.commission_tiers)?;
        info!(
            "🧠 services initialized ({} commission tiers)",
            commission_table.depth()
        );

        let user: DynUserService = Arc::new(UserService::new(
            database.clone(),
            database.clone(),
            database.clone(),
            config.credential_pepper.clone(),
        ));

        let admin: DynAdminService = Arc::new(AdminService::new(
            database.clone(),
            database.clone(),
            database.clone(),
            database.clone(),
            database.clone(),
            commission_table,
        ));

        Ok(Self {
            user,
            admin,
            database,
        })
    }
}
