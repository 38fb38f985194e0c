//! 推荐佣金核心：层级表、上级链解析、增量分发
//!
//! 激活审批时唯一有真正业务含义的一段逻辑。解析和分发都是纯函数，
//! 数据库交互留在 service 层。

pub mod distributor;
pub mod resolver;

pub use distributor::{activation_writes, commission_writes};
pub use resolver::{ReferralIndex, UplineChain};

use utils::{AppError, AppResult};

/// 单级佣金：tier 从 1 开始计（1 = 直接推荐人）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CommissionTier {
    pub tier: usize,
    pub amount: f64,
}

/// 有序、定长的佣金层级表。长度即上级链的最大遍历深度。
#[derive(Debug, Clone, PartialEq)]
pub struct CommissionTable {
    tiers: Vec<CommissionTier>,
}

impl CommissionTable {
    /// 解析配置串，如 "100,50,20"（第一项 = 直接推荐人的佣金）
    pub fn parse(raw: &str) -> AppResult<Self> {
        let mut tiers = Vec::new();

        for part in raw.split(',') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }

            let amount: f64 = part
                .parse()
                .map_err(|_| AppError::BadRequest(format!("Invalid commission tier amount: '{}'", part)))?;

            if !amount.is_finite() || amount < 0.0 {
                return Err(AppError::BadRequest(format!(
                    "Commission tier amount must be non-negative, got '{}'",
                    part
                )));
            }

            tiers.push(CommissionTier {
                tier: tiers.len() + 1,
                amount,
            });
        }

        if tiers.is_empty() {
            return Err(AppError::BadRequest(
                "Commission tier table must not be empty".to_string(),
            ));
        }

        Ok(Self { tiers })
    }

    pub fn tiers(&self) -> &[CommissionTier] {
        &self.tiers
    }

    /// 最大遍历深度 = 层级数
    pub fn depth(&self) -> usize {
        self.tiers.len()
    }
}
