use async_trait::async_trait;
use chrono::Utc;
use database::{
    activation::{
        model::{Activation, TxStatus},
        repository::DynActivationRepository,
    },
    user::{
        model::{User, UserRole, ROOT_REFERRER},
        repository::DynUserRepository,
    },
    withdrawal::{model::Withdrawal, repository::DynWithdrawalRepository},
};
use rand::Rng;
use std::sync::Arc;
use tracing::info;
use utils::{derive_credential_key, AppError, AppResult};
use uuid::Uuid;

pub type DynUserService = Arc<dyn UserServiceTrait + Send + Sync>;

const ID_ALLOC_ATTEMPTS: usize = 8;

/// 登录/注册一体的结果
#[derive(Debug, Clone)]
pub struct AuthOutcome {
    pub user: User,
    pub created: bool,
}

#[async_trait]
pub trait UserServiceTrait {
    /// 口令命中则登录，未命中则注册新会员（原系统的单口令入口）
    async fn login_or_register(&self, password: String, referral_code: Option<String>) -> AppResult<AuthOutcome>;

    async fn get_user(&self, id: String) -> AppResult<Option<User>>;

    async fn update_name(&self, id: String, name: String) -> AppResult<User>;

    // 直推团队
    async fn get_team(&self, id: String) -> AppResult<Vec<User>>;

    async fn request_activation(
        &self,
        user_id: String,
        amount: f64,
        method: String,
        trx_id: String,
        mobile_number: String,
    ) -> AppResult<Activation>;

    async fn request_withdrawal(
        &self,
        user_id: String,
        amount: f64,
        method: String,
        mobile_number: String,
    ) -> AppResult<Withdrawal>;
}

#[derive(Clone)]
pub struct UserService {
    users: DynUserRepository,
    activations: DynActivationRepository,
    withdrawals: DynWithdrawalRepository,
    credential_pepper: String,
}

impl UserService {
    pub fn new(
        users: DynUserRepository,
        activations: DynActivationRepository,
        withdrawals: DynWithdrawalRepository,
        credential_pepper: String,
    ) -> Self {
        Self {
            users,
            activations,
            withdrawals,
            credential_pepper,
        }
    }

    /// 分配形如 MP12345 的会员号，冲突时重试
    async fn allocate_member_id(&self) -> AppResult<String> {
        for _ in 0..ID_ALLOC_ATTEMPTS {
            let id = format!("MP{}", rand::thread_rng().gen_range(10_000..100_000));
            if self.users.get_user(&id).await?.is_none() {
                return Ok(id);
            }
        }
        Err(AppError::Conflict(
            "Could not allocate a member id, please retry.".to_string(),
        ))
    }

    /// 分配 6 位大写推荐码，冲突时重试
    async fn allocate_referral_code(&self) -> AppResult<String> {
        const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

        for _ in 0..ID_ALLOC_ATTEMPTS {
            let code: String = {
                let mut rng = rand::thread_rng();
                (0..6).map(|_| CHARSET[rng.gen_range(0..CHARSET.len())] as char).collect()
            };
            if !self.users.referral_code_exists(&code).await? {
                return Ok(code);
            }
        }
        Err(AppError::Conflict(
            "Could not allocate a referral code, please retry.".to_string(),
        ))
    }

    async fn require_user(&self, id: &str) -> AppResult<User> {
        self.users.get_user(id).await?.ok_or_else(|| {
            AppError::NotFound(format!("User ID '{}' not found! Check the ID again (e.g. MP12345).", id))
        })
    }
}

#[async_trait]
impl UserServiceTrait for UserService {
    async fn login_or_register(&self, password: String, referral_code: Option<String>) -> AppResult<AuthOutcome> {
        let password = password.trim().to_string();
        if password.len() < 3 {
            return Err(AppError::BadRequest(
                "Password must be at least 3 characters.".to_string(),
            ));
        }

        let credential_key = derive_credential_key(&password, &self.credential_pepper);

        // 登录：凭证点查询
        if let Some(user) = self.users.find_by_credential_key(&credential_key).await? {
            info!("🔓 user {} logged in", user.id);
            return Ok(AuthOutcome { user, created: false });
        }

        // 注册：口令未命中即开新账号
        let id = self.allocate_member_id().await?;
        let code = self.allocate_referral_code().await?;

        let referrer_id = referral_code
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_uppercase)
            .unwrap_or_else(|| ROOT_REFERRER.to_string());

        let user = User {
            id: id.clone(),
            credential_key,
            name: format!("Member {}", &id[2..]),
            email: String::new(),
            phone: String::new(),
            avatar: format!("https://api.dicebear.com/7.x/avataaars/svg?seed={}", id),
            balance: 0.0,
            is_active: false,
            referral_code: code,
            referrer_id,
            role: UserRole::User,
            joined_at: Utc::now().timestamp_millis() as u64,
        };

        self.users.create_user(user.clone()).await?;
        info!("👤 new member {} registered (referrer: {})", user.id, user.referrer_id);

        Ok(AuthOutcome { user, created: true })
    }

    async fn get_user(&self, id: String) -> AppResult<Option<User>> {
        let user = self.users.get_user(&id).await?;

        Ok(user)
    }

    async fn update_name(&self, id: String, name: String) -> AppResult<User> {
        let matched = self.users.update_name(&id, name.trim()).await?;
        if !matched {
            return Err(AppError::NotFound(format!("User {} not found.", id)));
        }

        self.require_user(&id).await
    }

    async fn get_team(&self, id: String) -> AppResult<Vec<User>> {
        let user = self.require_user(&id).await?;
        let members = self.users.get_team(&user.referral_code).await?;

        Ok(members)
    }

    async fn request_activation(
        &self,
        user_id: String,
        amount: f64,
        method: String,
        trx_id: String,
        mobile_number: String,
    ) -> AppResult<Activation> {
        let user = self.require_user(&user_id).await?;
        if user.is_active {
            return Err(AppError::Conflict(format!("User {} is already active.", user.id)));
        }

        let activation = Activation {
            id: Uuid::new_v4().to_string(),
            user_id: user.id,
            amount,
            method,
            trx_id,
            mobile_number,
            status: TxStatus::Pending,
            created_at: Utc::now().timestamp_millis() as u64,
        };

        self.activations.create_activation(activation.clone()).await?;
        info!("📨 activation request {} created for {}", activation.id, activation.user_id);

        Ok(activation)
    }

    async fn request_withdrawal(
        &self,
        user_id: String,
        amount: f64,
        method: String,
        mobile_number: String,
    ) -> AppResult<Withdrawal> {
        let user = self.require_user(&user_id).await?;

        // 先条件扣减，扣成功才建单；审批只翻状态不再动余额
        let debited = self.users.try_debit_balance(&user.id, amount).await?;
        if !debited {
            return Err(AppError::Conflict(format!(
                "Insufficient balance for withdrawal of {} Tk.",
                amount
            )));
        }

        let withdrawal = Withdrawal {
            id: Uuid::new_v4().to_string(),
            user_id: user.id,
            amount,
            method,
            mobile_number,
            status: TxStatus::Pending,
            created_at: Utc::now().timestamp_millis() as u64,
        };

        self.withdrawals.create_withdrawal(withdrawal.clone()).await?;
        info!("📨 withdrawal request {} created for {}", withdrawal.id, withdrawal.user_id);

        Ok(withdrawal)
    }
}
