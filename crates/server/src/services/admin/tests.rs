use super::admin_service::{AdminService, AdminServiceTrait};
use crate::services::referral::CommissionTable;
use async_trait::async_trait;
use database::{
    activation::{
        model::{Activation, TxStatus},
        repository::ActivationRepositoryTrait,
    },
    audit::{model::BalanceAdjustment, repository::AuditRepositoryTrait},
    settings::repository::SettingsRepositoryTrait,
    store::WriteBatch,
    user::{
        model::{User, UserRole, UserStats, ROOT_REFERRER},
        repository::UserRepositoryTrait,
    },
    withdrawal::{model::Withdrawal, repository::WithdrawalRepositoryTrait},
};
use std::sync::{Arc, Mutex};
use utils::{AppError, AppResult};

fn member(id: &str, referral_code: &str, referrer_id: &str) -> User {
    User {
        id: id.to_string(),
        credential_key: format!("key-{}", id),
        name: format!("Member {}", id),
        email: String::new(),
        phone: String::new(),
        avatar: String::new(),
        balance: 0.0,
        is_active: true,
        referral_code: referral_code.to_string(),
        referrer_id: referrer_id.to_string(),
        role: UserRole::User,
        joined_at: 1_700_000_000_000,
    }
}

fn pending_activation(id: &str, user_id: &str) -> Activation {
    Activation {
        id: id.to_string(),
        user_id: user_id.to_string(),
        amount: 500.0,
        method: "bkash".to_string(),
        trx_id: "TRX9A".to_string(),
        mobile_number: "01700000000".to_string(),
        status: TxStatus::Pending,
        created_at: 1_700_000_000_000,
    }
}

#[derive(Default)]
struct StubUsers {
    users: Mutex<Vec<User>>,
    snapshot_fails: bool,
    balance_increments: Mutex<Vec<(String, f64)>>,
}

#[async_trait]
impl UserRepositoryTrait for StubUsers {
    async fn create_user(&self, _user: User) -> AppResult<()> {
        unimplemented!("not an admin flow")
    }

    async fn get_user(&self, id: &str) -> AppResult<Option<User>> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_credential_key(&self, _key: &str) -> AppResult<Option<User>> {
        unimplemented!("not an admin flow")
    }

    async fn referral_code_exists(&self, _code: &str) -> AppResult<bool> {
        unimplemented!("not an admin flow")
    }

    async fn get_all_users(&self) -> AppResult<Vec<User>> {
        if self.snapshot_fails {
            return Err(AppError::BadRequest("snapshot unavailable".to_string()));
        }
        Ok(self.users.lock().unwrap().clone())
    }

    async fn get_team(&self, _referral_code: &str) -> AppResult<Vec<User>> {
        unimplemented!("not an admin flow")
    }

    async fn update_name(&self, _id: &str, _name: &str) -> AppResult<bool> {
        unimplemented!("not an admin flow")
    }

    async fn add_balance(&self, id: &str, amount: f64) -> AppResult<()> {
        self.balance_increments
            .lock()
            .unwrap()
            .push((id.to_string(), amount));
        Ok(())
    }

    async fn try_debit_balance(&self, _id: &str, _amount: f64) -> AppResult<bool> {
        unimplemented!("not an admin flow")
    }

    async fn get_stats(&self) -> AppResult<UserStats> {
        let users = self.users.lock().unwrap();
        Ok(UserStats {
            total_users: users.len() as u64,
            total_balance: users.iter().map(|u| u.balance).sum(),
        })
    }
}

/// 记录提交批次并模拟 status == pending 守卫的桩仓库
#[derive(Default)]
struct StubActivations {
    activations: Mutex<Vec<Activation>>,
    committed: Mutex<Vec<WriteBatch>>,
}

#[async_trait]
impl ActivationRepositoryTrait for StubActivations {
    async fn create_activation(&self, activation: Activation) -> AppResult<()> {
        self.activations.lock().unwrap().push(activation);
        Ok(())
    }

    async fn get_activation(&self, id: &str) -> AppResult<Option<Activation>> {
        Ok(self
            .activations
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.id == id)
            .cloned())
    }

    async fn list_pending(&self) -> AppResult<Vec<Activation>> {
        Ok(self
            .activations
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.status == TxStatus::Pending)
            .cloned()
            .collect())
    }

    async fn commit_approval(&self, activation_id: &str, batch: WriteBatch) -> AppResult<()> {
        let mut activations = self.activations.lock().unwrap();
        let guarded = activations
            .iter_mut()
            .find(|a| a.id == activation_id && a.status == TxStatus::Pending);
        match guarded {
            Some(activation) => {
                activation.status = TxStatus::Approved;
                self.committed.lock().unwrap().push(batch);
                Ok(())
            }
            None => Err(AppError::Conflict(format!(
                "Activation {} is not pending, nothing was written.",
                activation_id
            ))),
        }
    }
}

#[derive(Default)]
struct StubWithdrawals {
    withdrawals: Mutex<Vec<Withdrawal>>,
}

#[async_trait]
impl WithdrawalRepositoryTrait for StubWithdrawals {
    async fn create_withdrawal(&self, withdrawal: Withdrawal) -> AppResult<()> {
        self.withdrawals.lock().unwrap().push(withdrawal);
        Ok(())
    }

    async fn get_withdrawal(&self, id: &str) -> AppResult<Option<Withdrawal>> {
        Ok(self
            .withdrawals
            .lock()
            .unwrap()
            .iter()
            .find(|w| w.id == id)
            .cloned())
    }

    async fn list_pending(&self) -> AppResult<Vec<Withdrawal>> {
        Ok(self
            .withdrawals
            .lock()
            .unwrap()
            .iter()
            .filter(|w| w.status == TxStatus::Pending)
            .cloned()
            .collect())
    }

    async fn approve(&self, id: &str) -> AppResult<bool> {
        let mut withdrawals = self.withdrawals.lock().unwrap();
        match withdrawals
            .iter_mut()
            .find(|w| w.id == id && w.status == TxStatus::Pending)
        {
            Some(withdrawal) => {
                withdrawal.status = TxStatus::Approved;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[derive(Default)]
struct StubAudit {
    entries: Mutex<Vec<BalanceAdjustment>>,
}

#[async_trait]
impl AuditRepositoryTrait for StubAudit {
    async fn append(&self, entry: BalanceAdjustment) -> AppResult<()> {
        self.entries.lock().unwrap().push(entry);
        Ok(())
    }
}

#[derive(Default)]
struct StubSettings {
    number: Mutex<Option<String>>,
}

#[async_trait]
impl SettingsRepositoryTrait for StubSettings {
    async fn get_payment_number(&self) -> AppResult<Option<String>> {
        Ok(self.number.lock().unwrap().clone())
    }

    async fn set_payment_number(&self, number: &str) -> AppResult<()> {
        *self.number.lock().unwrap() = Some(number.to_string());
        Ok(())
    }
}

struct Fixture {
    users: Arc<StubUsers>,
    activations: Arc<StubActivations>,
    withdrawals: Arc<StubWithdrawals>,
    audit: Arc<StubAudit>,
    settings: Arc<StubSettings>,
    service: AdminService,
}

fn fixture(users: Vec<User>, activations: Vec<Activation>, snapshot_fails: bool) -> Fixture {
    let users = Arc::new(StubUsers {
        users: Mutex::new(users),
        snapshot_fails,
        balance_increments: Mutex::new(Vec::new()),
    });
    let activations = Arc::new(StubActivations {
        activations: Mutex::new(activations),
        committed: Mutex::new(Vec::new()),
    });
    let withdrawals = Arc::new(StubWithdrawals::default());
    let audit = Arc::new(StubAudit::default());
    let settings = Arc::new(StubSettings::default());
    let service = AdminService::new(
        users.clone(),
        activations.clone(),
        withdrawals.clone(),
        audit.clone(),
        settings.clone(),
        CommissionTable::parse("10,5").unwrap(),
    );
    Fixture {
        users,
        activations,
        withdrawals,
        audit,
        settings,
        service,
    }
}

fn committed_paths(f: &Fixture) -> Vec<String> {
    let committed = f.activations.committed.lock().unwrap();
    committed[0].writes().iter().map(|w| w.path.to_string()).collect()
}

#[tokio::test]
async fn test_approval_activates_and_pays_full_chain() {
    // 激活者 -> MP00002 -> MP00003 -> 根
    let f = fixture(
        vec![
            member("MP00001", "SELF01", "AAAAAA"),
            member("MP00002", "AAAAAA", "BBBBBB"),
            member("MP00003", "BBBBBB", ROOT_REFERRER),
        ],
        vec![pending_activation("tx1", "MP00001")],
        false,
    );

    let approval = f.service.approve_activation("tx1".to_string()).await.unwrap();

    assert_eq!(approval.commissions_paid, 2);
    assert_eq!(
        committed_paths(&f),
        vec![
            "activations/tx1/status",
            "users/MP00001/isActive",
            "users/MP00002/balance",
            "users/MP00003/balance",
        ]
    );
}

#[tokio::test]
async fn test_approval_with_broken_chain_pays_resolved_prefix() {
    let f = fixture(
        vec![
            member("MP00001", "SELF01", "AAAAAA"),
            member("MP00002", "AAAAAA", "GHOST0"),
        ],
        vec![pending_activation("tx1", "MP00001")],
        false,
    );

    let approval = f.service.approve_activation("tx1".to_string()).await.unwrap();

    assert_eq!(approval.commissions_paid, 1);
    assert_eq!(committed_paths(&f).len(), 3);
}

#[tokio::test]
async fn test_approval_under_root_pays_no_commission() {
    let f = fixture(
        vec![member("MP00001", "SELF01", ROOT_REFERRER)],
        vec![pending_activation("tx1", "MP00001")],
        false,
    );

    let approval = f.service.approve_activation("tx1".to_string()).await.unwrap();

    assert_eq!(approval.commissions_paid, 0);
    assert_eq!(
        committed_paths(&f),
        vec!["activations/tx1/status", "users/MP00001/isActive"]
    );
}

#[tokio::test]
async fn test_commission_failure_still_activates() {
    // 快照读失败：佣金整步跳过，激活照常落库
    let f = fixture(
        vec![member("MP00001", "SELF01", "AAAAAA")],
        vec![pending_activation("tx1", "MP00001")],
        true,
    );

    let approval = f.service.approve_activation("tx1".to_string()).await.unwrap();

    assert_eq!(approval.commissions_paid, 0);
    assert_eq!(
        committed_paths(&f),
        vec!["activations/tx1/status", "users/MP00001/isActive"]
    );
}

#[tokio::test]
async fn test_reapproval_is_a_conflict_with_zero_writes() {
    let f = fixture(
        vec![member("MP00001", "SELF01", ROOT_REFERRER)],
        vec![pending_activation("tx1", "MP00001")],
        false,
    );

    f.service.approve_activation("tx1".to_string()).await.unwrap();
    let second = f.service.approve_activation("tx1".to_string()).await;

    assert!(matches!(second, Err(AppError::Conflict(_))));
    assert_eq!(f.activations.committed.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_unknown_activation_is_not_found() {
    let f = fixture(Vec::new(), Vec::new(), false);

    let result = f.service.approve_activation("missing".to_string()).await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn test_withdrawal_approval_flips_status_only() {
    let f = fixture(Vec::new(), Vec::new(), false);
    f.withdrawals
        .create_withdrawal(Withdrawal {
            id: "wd1".to_string(),
            user_id: "MP00001".to_string(),
            amount: 40.0,
            method: "nagad".to_string(),
            mobile_number: "01700000000".to_string(),
            status: TxStatus::Pending,
            created_at: 1_700_000_000_000,
        })
        .await
        .unwrap();

    f.service.approve_withdrawal("wd1".to_string()).await.unwrap();

    let withdrawals = f.withdrawals.withdrawals.lock().unwrap();
    assert_eq!(withdrawals[0].status, TxStatus::Approved);
    // 余额不动：建单时已经扣过
    assert!(f.users.balance_increments.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_withdrawal_reapproval_is_a_conflict() {
    let f = fixture(Vec::new(), Vec::new(), false);
    f.withdrawals
        .create_withdrawal(Withdrawal {
            id: "wd1".to_string(),
            user_id: "MP00001".to_string(),
            amount: 40.0,
            method: "nagad".to_string(),
            mobile_number: "01700000000".to_string(),
            status: TxStatus::Approved,
            created_at: 1_700_000_000_000,
        })
        .await
        .unwrap();

    let result = f.service.approve_withdrawal("wd1".to_string()).await;
    assert!(matches!(result, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn test_add_funds_increments_and_logs() {
    let f = fixture(
        vec![member("MP00001", "SELF01", ROOT_REFERRER)],
        Vec::new(),
        false,
    );

    let entry = f.service.add_funds("MP00001".to_string(), 250.0).await.unwrap();

    assert_eq!(entry.amount, 250.0);
    assert_eq!(
        *f.users.balance_increments.lock().unwrap(),
        vec![("MP00001".to_string(), 250.0)]
    );
    assert_eq!(f.audit.entries.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_add_funds_for_unknown_member_writes_nothing() {
    let f = fixture(Vec::new(), Vec::new(), false);

    let result = f.service.add_funds("MP99999".to_string(), 250.0).await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
    assert!(f.users.balance_increments.lock().unwrap().is_empty());
    assert!(f.audit.entries.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_payment_number_round_trip() {
    let f = fixture(Vec::new(), Vec::new(), false);

    assert_eq!(f.service.get_payment_number().await.unwrap(), None);
    f.service
        .set_payment_number(" 01900000000 ".to_string())
        .await
        .unwrap();
    assert_eq!(
        f.service.get_payment_number().await.unwrap(),
        Some("01900000000".to_string())
    );

    let blank = f.service.set_payment_number("   ".to_string()).await;
    assert!(matches!(blank, Err(AppError::BadRequest(_))));
    assert_eq!(f.settings.number.lock().unwrap().as_deref(), Some("01900000000"));
}
