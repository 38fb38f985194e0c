////////////////////////////////////////////////////////////////////////
//
// 1. 每个Domain(Entity)单独一个文件夹
// 2. 每个Domain由两部分组成:
//    - model: 定义Schema
//    - repository: 实际的数据库底层操作
//
//////////////////////////////////////////////////////////////////////

use mongodb::{
    bson::{doc, Document},
    options::IndexOptions,
    Client, Collection, IndexModel,
};
use std::sync::Arc;
use tracing::info;
use utils::{AppConfig, AppError, AppResult};

pub mod activation;
pub mod audit;
pub mod settings;
pub mod store;
pub mod user;
pub mod withdrawal;

use store::{StatusGuard, WriteBatch};

#[derive(Clone)]
pub struct Database {
    client: Client,
    db: mongodb::Database,
    pub users: Collection<user::model::User>,
    pub activations: Collection<activation::model::Activation>,
    pub withdrawals: Collection<withdrawal::model::Withdrawal>,
    pub balance_logs: Collection<audit::model::BalanceAdjustment>,
    pub admin_settings: Collection<settings::model::AdminSettings>,
}

impl Database {
    pub async fn new(config: Arc<AppConfig>) -> AppResult<Self> {
        let client = Client::with_uri_str(&config.mongo_uri).await?;
        let db: mongodb::Database = client.database(&config.mongo_db);

        let users = db.collection(store::StoreCollection::Users.name());
        let activations = db.collection(store::StoreCollection::Activations.name());
        let withdrawals = db.collection(store::StoreCollection::Withdrawals.name());
        let balance_logs = db.collection(store::StoreCollection::Transactions.name());
        let admin_settings = db.collection(store::StoreCollection::AdminSettings.name());

        info!("🧱 database({:#}) connected.", &config.mongo_db);

        Ok(Database {
            client,
            db,
            users,
            activations,
            withdrawals,
            balance_logs,
            admin_settings,
        })
    }

    /// 初始化索引
    ///
    /// - credentialKey 唯一：登录点查询
    /// - referralCode 唯一：推荐码全局唯一
    /// - referrerId：团队（直推）查询
    /// - status：待审批列表查询
    pub async fn init_indexes(&self) -> AppResult<()> {
        let unique = |keys: Document| {
            IndexModel::builder()
                .keys(keys)
                .options(IndexOptions::builder().unique(true).build())
                .build()
        };
        let plain = |keys: Document| IndexModel::builder().keys(keys).build();

        self.users.create_index(unique(doc! {"credentialKey": 1}), None).await?;
        self.users.create_index(unique(doc! {"referralCode": 1}), None).await?;
        self.users.create_index(plain(doc! {"referrerId": 1}), None).await?;
        self.activations.create_index(plain(doc! {"status": 1}), None).await?;
        self.withdrawals.create_index(plain(doc! {"status": 1}), None).await?;

        info!("✅ 索引初始化完成");
        Ok(())
    }

    /// 带状态守卫的批量提交。
    ///
    /// 整批写在一个多文档事务内执行：守卫不满足（目标文档不存在或状态
    /// 已变）则回滚并返回 Conflict，不留下任何部分写入。需要 mongodb
    /// 以副本集模式运行。
    pub async fn commit_guarded(&self, guard: StatusGuard, batch: WriteBatch) -> AppResult<()> {
        let mut session = self.client.start_session(None).await?;
        session.start_transaction(None).await?;

        for update in batch.grouped() {
            let coll = self.db.collection::<Document>(update.collection.name());

            let mut filter = doc! {"_id": &update.id};
            let guarded = update.collection == guard.collection && update.id == guard.id;
            if guarded {
                filter.insert(guard.field.as_str(), guard.expected.as_str());
            }

            let result = coll
                .update_one_with_session(filter, update.update.clone(), None, &mut session)
                .await;

            let matched = match result {
                Ok(r) => r.matched_count,
                Err(e) => {
                    session.abort_transaction().await.ok();
                    return Err(e.into());
                }
            };

            if guarded && matched == 0 {
                session.abort_transaction().await.ok();
                return Err(AppError::Conflict(format!(
                    "{}/{} is not {} anymore, nothing was applied.",
                    guard.collection.name(),
                    guard.id,
                    guard.expected
                )));
            }
        }

        session.commit_transaction().await?;
        Ok(())
    }
}
