use crate::{
    user::model::{User, UserStats},
    Database,
};
use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::bson::{doc, Bson};
use std::sync::Arc;
use utils::{AppError, AppResult};

pub type DynUserRepository = Arc<dyn UserRepositoryTrait + Send + Sync>;

// 主要用于Service中，表示提供了该Trait功能
#[async_trait]
pub trait UserRepositoryTrait {
    async fn create_user(&self, user: User) -> AppResult<()>;

    async fn get_user(&self, id: &str) -> AppResult<Option<User>>;

    // 登录点查询（credentialKey 唯一索引）
    async fn find_by_credential_key(&self, key: &str) -> AppResult<Option<User>>;

    async fn referral_code_exists(&self, code: &str) -> AppResult<bool>;

    // 佣金分发用的全量快照（O(全部用户)，规模上限见 DESIGN.md）
    async fn get_all_users(&self) -> AppResult<Vec<User>>;

    // 直推团队：referrerId == 我的推荐码
    async fn get_team(&self, referral_code: &str) -> AppResult<Vec<User>>;

    // 返回是否命中了该用户
    async fn update_name(&self, id: &str, name: &str) -> AppResult<bool>;

    // 人工调账：原子自增，绝不读改写
    async fn add_balance(&self, id: &str, amount: f64) -> AppResult<()>;

    // 条件扣减：balance >= amount 才生效，返回是否扣成功
    async fn try_debit_balance(&self, id: &str, amount: f64) -> AppResult<bool>;

    async fn get_stats(&self) -> AppResult<UserStats>;
}

#[async_trait]
impl UserRepositoryTrait for Database {
    async fn create_user(&self, user: User) -> AppResult<()> {
        let existing = self
            .users
            .find_one(doc! {"credentialKey": &user.credential_key}, None)
            .await?;

        if existing.is_some() {
            return Err(AppError::Conflict(
                "An account with this password already exists. Pick another password.".to_string(),
            ));
        }

        self.users.insert_one(user, None).await?;

        Ok(())
    }

    async fn get_user(&self, id: &str) -> AppResult<Option<User>> {
        let filter = doc! {"_id": id};
        let user = self.users.find_one(filter, None).await?;

        Ok(user)
    }

    async fn find_by_credential_key(&self, key: &str) -> AppResult<Option<User>> {
        let filter = doc! {"credentialKey": key};
        let user = self.users.find_one(filter, None).await?;

        Ok(user)
    }

    async fn referral_code_exists(&self, code: &str) -> AppResult<bool> {
        let filter = doc! {"referralCode": code.to_uppercase()};
        let existing = self.users.find_one(filter, None).await?;

        Ok(existing.is_some())
    }

    async fn get_all_users(&self) -> AppResult<Vec<User>> {
        let cursor = self.users.find(doc! {}, None).await?;
        let users: Vec<User> = cursor.try_collect().await?;

        Ok(users)
    }

    async fn get_team(&self, referral_code: &str) -> AppResult<Vec<User>> {
        let filter = doc! {"referrerId": referral_code.to_uppercase()};
        let cursor = self.users.find(filter, None).await?;
        let mut members: Vec<User> = cursor.try_collect().await?;

        members.sort_by(|a, b| b.joined_at.cmp(&a.joined_at));

        Ok(members)
    }

    async fn update_name(&self, id: &str, name: &str) -> AppResult<bool> {
        let filter = doc! {"_id": id};
        let update = doc! {"$set": {"name": name}};

        let result = self.users.update_one(filter, update, None).await?;

        Ok(result.matched_count > 0)
    }

    async fn add_balance(&self, id: &str, amount: f64) -> AppResult<()> {
        let filter = doc! {"_id": id};
        let update = doc! {"$inc": {"balance": amount}};

        self.users.update_one(filter, update, None).await?;

        Ok(())
    }

    async fn try_debit_balance(&self, id: &str, amount: f64) -> AppResult<bool> {
        let filter = doc! {"_id": id, "balance": {"$gte": amount}};
        let update = doc! {"$inc": {"balance": -amount}};

        let result = self.users.update_one(filter, update, None).await?;

        Ok(result.matched_count > 0)
    }

    async fn get_stats(&self) -> AppResult<UserStats> {
        let pipeline = vec![doc! {
            "$group": {
                "_id": Bson::Null,
                "totalUsers": {"$sum": 1},
                "totalBalance": {"$sum": "$balance"},
            }
        }];

        let mut cursor = self.users.aggregate(pipeline, None).await?;

        let Some(row) = cursor.try_next().await? else {
            return Ok(UserStats {
                total_users: 0,
                total_balance: 0.0,
            });
        };

        let total_users = match row.get("totalUsers") {
            Some(Bson::Int32(n)) => *n as u64,
            Some(Bson::Int64(n)) => *n as u64,
            _ => 0,
        };
        let total_balance = match row.get("totalBalance") {
            Some(Bson::Double(v)) => *v,
            Some(Bson::Int32(n)) => *n as f64,
            Some(Bson::Int64(n)) => *n as f64,
            _ => 0.0,
        };

        Ok(UserStats {
            total_users,
            total_balance,
        })
    }
}
