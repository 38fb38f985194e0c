use crate::services::referral::{self, CommissionTable};
use async_trait::async_trait;
use chrono::Utc;
use database::{
    activation::{
        model::{Activation, TxStatus},
        repository::DynActivationRepository,
    },
    audit::{
        model::{BalanceAdjustment, ADJUSTMENT_ADMIN_ADD},
        repository::DynAuditRepository,
    },
    settings::repository::DynSettingsRepository,
    store::PathWrite,
    user::{model::UserStats, repository::DynUserRepository},
    withdrawal::{model::Withdrawal, repository::DynWithdrawalRepository},
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};
use utils::{AppError, AppResult};
use utoipa::ToSchema;
use uuid::Uuid;

pub type DynAdminService = Arc<dyn AdminServiceTrait + Send + Sync>;

/// 激活审批的结果摘要
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActivationApproval {
    pub activation_id: String,
    pub user_id: String,
    /// 实际发放的佣金层数（链短/断链/根哨兵时可小于层级表长度）
    pub commissions_paid: usize,
}

#[async_trait]
pub trait AdminServiceTrait {
    async fn list_pending_activations(&self) -> AppResult<Vec<Activation>>;

    async fn list_pending_withdrawals(&self) -> AppResult<Vec<Withdrawal>>;

    /// 激活审批：必落写 + 尽力而为的佣金分发 + 守卫式批量提交
    async fn approve_activation(&self, activation_id: String) -> AppResult<ActivationApproval>;

    /// 提现审批：单路径状态翻转，不动余额
    async fn approve_withdrawal(&self, withdrawal_id: String) -> AppResult<()>;

    /// 人工加款：原子自增 + 审计流水
    async fn add_funds(&self, user_id: String, amount: f64) -> AppResult<BalanceAdjustment>;

    async fn get_payment_number(&self) -> AppResult<Option<String>>;

    async fn set_payment_number(&self, number: String) -> AppResult<()>;

    async fn get_stats(&self) -> AppResult<UserStats>;
}

#[derive(Clone)]
pub struct AdminService {
    users: DynUserRepository,
    activations: DynActivationRepository,
    withdrawals: DynWithdrawalRepository,
    audit: DynAuditRepository,
    settings: DynSettingsRepository,
    commission_table: CommissionTable,
}

impl AdminService {
    pub fn new(
        users: DynUserRepository,
        activations: DynActivationRepository,
        withdrawals: DynWithdrawalRepository,
        audit: DynAuditRepository,
        settings: DynSettingsRepository,
        commission_table: CommissionTable,
    ) -> Self {
        Self {
            users,
            activations,
            withdrawals,
            audit,
            settings,
            commission_table,
        }
    }

    /// 佣金增量：全量快照 + 纯函数计算。任何失败（快照读挂了、
    /// 激活用户不在快照里）都只算佣金这一步失败。
    async fn commission_increments(&self, activating_user_id: &str) -> AppResult<Vec<PathWrite>> {
        let snapshot = self.users.get_all_users().await?;
        referral::commission_writes(&snapshot, activating_user_id, &self.commission_table)
    }
}

#[async_trait]
impl AdminServiceTrait for AdminService {
    async fn list_pending_activations(&self) -> AppResult<Vec<Activation>> {
        let pending = self.activations.list_pending().await?;

        Ok(pending)
    }

    async fn list_pending_withdrawals(&self) -> AppResult<Vec<Withdrawal>> {
        let pending = self.withdrawals.list_pending().await?;

        Ok(pending)
    }

    async fn approve_activation(&self, activation_id: String) -> AppResult<ActivationApproval> {
        let activation = self
            .activations
            .get_activation(&activation_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Activation {} not found.", activation_id)))?;

        // 提前短路；提交时的守卫仍然兜底并发下的重复审批
        if activation.status != TxStatus::Pending {
            return Err(AppError::Conflict(format!(
                "Activation {} has already been processed.",
                activation_id
            )));
        }

        // 1. 必落的两条写
        let mut batch = referral::activation_writes(&activation.id, &activation.user_id);

        // 2. 佣金：隔离步骤，失败只记日志，绝不阻塞激活
        let commissions_paid = match self.commission_increments(&activation.user_id).await {
            Ok(increments) => {
                let count = increments.len();
                batch.extend(increments);
                count
            }
            Err(e) => {
                warn!(
                    "⚠️ commission calculation failed for {}, activating anyway: {}",
                    activation.user_id, e
                );
                0
            }
        };

        // 3. 守卫式提交：全部成功或全部回滚
        self.activations.commit_approval(&activation.id, batch).await?;

        info!(
            "✅ activation {} approved for {} ({} commission increments)",
            activation.id, activation.user_id, commissions_paid
        );

        Ok(ActivationApproval {
            activation_id: activation.id,
            user_id: activation.user_id,
            commissions_paid,
        })
    }

    async fn approve_withdrawal(&self, withdrawal_id: String) -> AppResult<()> {
        self.withdrawals
            .get_withdrawal(&withdrawal_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Withdrawal {} not found.", withdrawal_id)))?;

        let approved = self.withdrawals.approve(&withdrawal_id).await?;
        if !approved {
            return Err(AppError::Conflict(format!(
                "Withdrawal {} has already been processed.",
                withdrawal_id
            )));
        }

        info!("✅ withdrawal {} approved", withdrawal_id);
        Ok(())
    }

    async fn add_funds(&self, user_id: String, amount: f64) -> AppResult<BalanceAdjustment> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(AppError::BadRequest("Amount must be positive.".to_string()));
        }

        let user_id = user_id.trim().to_string();
        self.users.get_user(&user_id).await?.ok_or_else(|| {
            AppError::NotFound(format!(
                "User ID '{}' not found! Check the ID again (e.g. MP12345).",
                user_id
            ))
        })?;

        self.users.add_balance(&user_id, amount).await?;

        let entry = BalanceAdjustment {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.clone(),
            amount,
            kind: ADJUSTMENT_ADMIN_ADD.to_string(),
            status: TxStatus::Approved,
            timestamp: Utc::now().timestamp_millis() as u64,
        };
        self.audit.append(entry.clone()).await?;

        info!("💰 manually added {} Tk to {}", amount, user_id);
        Ok(entry)
    }

    async fn get_payment_number(&self) -> AppResult<Option<String>> {
        let number = self.settings.get_payment_number().await?;

        Ok(number)
    }

    async fn set_payment_number(&self, number: String) -> AppResult<()> {
        let number = number.trim().to_string();
        if number.is_empty() {
            return Err(AppError::BadRequest("Payment number must not be empty.".to_string()));
        }

        self.settings.set_payment_number(&number).await?;
        info!("🔧 active payment number updated");

        Ok(())
    }

    async fn get_stats(&self) -> AppResult<UserStats> {
        let stats = self.users.get_stats().await?;

        Ok(stats)
    }
}
