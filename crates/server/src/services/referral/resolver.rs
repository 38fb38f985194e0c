use database::user::model::{User, ROOT_REFERRER};
use std::collections::HashMap;

/// 推荐码（统一大写）到用户记录的索引，基于一次全量快照构建。
///
/// 快照语义：同一次审批过程中链路视图不变，并发写不会把链走"撕裂"。
pub struct ReferralIndex<'a> {
    by_code: HashMap<String, &'a User>,
}

impl<'a> ReferralIndex<'a> {
    pub fn build(users: &'a [User]) -> Self {
        let mut by_code = HashMap::with_capacity(users.len());
        for user in users {
            if !user.referral_code.is_empty() {
                by_code.insert(user.referral_code.to_uppercase(), user);
            }
        }
        Self { by_code }
    }

    pub fn lookup(&self, code: &str) -> Option<&'a User> {
        self.by_code.get(&code.trim().to_uppercase()).copied()
    }

    /// 从 user 的 referrerId 出发向上遍历，最多 max_tiers 级
    pub fn upline_of(&'a self, user: &User, max_tiers: usize) -> UplineChain<'a> {
        UplineChain {
            index: self,
            next_code: Some(user.referrer_id.clone()),
            tier: 0,
            max_tiers,
        }
    }
}

/// 惰性、有限、一次性的上级链迭代器。
///
/// 产出 (tier, user)，tier 从 1 起严格递增无空洞。终止条件：
/// 根哨兵 ADMIN、查不到推荐码（断链按截断处理，不算错误）、
/// 或已走满 max_tiers 级。环路也因此天然有界。
pub struct UplineChain<'a> {
    index: &'a ReferralIndex<'a>,
    next_code: Option<String>,
    tier: usize,
    max_tiers: usize,
}

impl<'a> Iterator for UplineChain<'a> {
    type Item = (usize, &'a User);

    fn next(&mut self) -> Option<Self::Item> {
        if self.tier >= self.max_tiers {
            return None;
        }

        let code = self.next_code.take()?;
        let code = code.trim().to_uppercase();
        if code.is_empty() || code == ROOT_REFERRER {
            return None;
        }

        let upline = self.index.lookup(&code)?;

        self.tier += 1;
        self.next_code = Some(upline.referrer_id.clone());
        Some((self.tier, upline))
    }
}
