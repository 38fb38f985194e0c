//! 多路径批量写原语
//!
//! 审批流程一次性产出一组「路径 -> 写操作」，由事务一次性提交，
//! 要么全部落库要么全部回滚。余额累加必须用 `Increment`（`$inc`），
//! 禁止读出缓存值再写回。

use mongodb::bson::{doc, Bson, Document};
use std::fmt;

/// 持久化布局中的顶层子树
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreCollection {
    Users,
    Activations,
    Withdrawals,
    /// 人工调账流水（append-only）
    Transactions,
    AdminSettings,
}

impl StoreCollection {
    pub fn name(&self) -> &'static str {
        match self {
            StoreCollection::Users => "users",
            StoreCollection::Activations => "activations",
            StoreCollection::Withdrawals => "withdrawals",
            StoreCollection::Transactions => "transactions",
            StoreCollection::AdminSettings => "admin_settings",
        }
    }
}

/// 一个文档字段的定位：`users/<id>/balance`
#[derive(Debug, Clone, PartialEq)]
pub struct StorePath {
    pub collection: StoreCollection,
    pub id: String,
    pub field: String,
}

impl StorePath {
    pub fn new(collection: StoreCollection, id: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            collection,
            id: id.into(),
            field: field.into(),
        }
    }
}

impl fmt::Display for StorePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.collection.name(), self.id, self.field)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum WriteOp {
    Set(Bson),
    /// 原子自增，并发安全，允许同一字段多次叠加
    Increment(f64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PathWrite {
    pub path: StorePath,
    pub op: WriteOp,
}

/// 提交前的状态守卫：目标文档的某字段必须等于期望值，否则整批回滚
#[derive(Debug, Clone)]
pub struct StatusGuard {
    pub collection: StoreCollection,
    pub id: String,
    pub field: String,
    pub expected: String,
}

impl StatusGuard {
    pub fn pending(collection: StoreCollection, id: impl Into<String>) -> Self {
        Self {
            collection,
            id: id.into(),
            field: "status".to_string(),
            expected: "pending".to_string(),
        }
    }
}

/// 同一文档的写操作合并后的更新文档
#[derive(Debug, Clone)]
pub struct DocumentUpdate {
    pub collection: StoreCollection,
    pub id: String,
    pub update: Document,
}

#[derive(Debug, Clone, Default)]
pub struct WriteBatch {
    writes: Vec<PathWrite>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self { writes: Vec::new() }
    }

    pub fn set(&mut self, path: StorePath, value: impl Into<Bson>) -> &mut Self {
        self.writes.push(PathWrite {
            path,
            op: WriteOp::Set(value.into()),
        });
        self
    }

    pub fn increment(&mut self, path: StorePath, amount: f64) -> &mut Self {
        self.writes.push(PathWrite {
            path,
            op: WriteOp::Increment(amount),
        });
        self
    }

    pub fn extend(&mut self, writes: Vec<PathWrite>) -> &mut Self {
        self.writes.extend(writes);
        self
    }

    pub fn writes(&self) -> &[PathWrite] {
        &self.writes
    }

    pub fn len(&self) -> usize {
        self.writes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    /// 按 (collection, id) 合并成每文档一条 update。
    /// 同一字段：Set 后写覆盖先写，Increment 金额相加。
    /// 文档顺序保持首次出现的顺序。
    pub fn grouped(&self) -> Vec<DocumentUpdate> {
        let mut order: Vec<(StoreCollection, String)> = Vec::new();
        let mut sets: Vec<Document> = Vec::new();
        let mut incs: Vec<Document> = Vec::new();

        for write in &self.writes {
            let key = (write.path.collection, write.path.id.clone());
            let idx = match order.iter().position(|k| *k == key) {
                Some(idx) => idx,
                None => {
                    order.push(key);
                    sets.push(Document::new());
                    incs.push(Document::new());
                    order.len() - 1
                }
            };

            match &write.op {
                WriteOp::Set(value) => {
                    sets[idx].insert(&write.path.field, value.clone());
                }
                WriteOp::Increment(amount) => {
                    let merged = match incs[idx].get_f64(&write.path.field) {
                        Ok(prev) => prev + amount,
                        Err(_) => *amount,
                    };
                    incs[idx].insert(&write.path.field, merged);
                }
            }
        }

        order
            .into_iter()
            .enumerate()
            .map(|(idx, (collection, id))| {
                let mut update = Document::new();
                if !sets[idx].is_empty() {
                    update.insert("$set", sets[idx].clone());
                }
                if !incs[idx].is_empty() {
                    update.insert("$inc", incs[idx].clone());
                }
                DocumentUpdate { collection, id, update }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn balance_path(id: &str) -> StorePath {
        StorePath::new(StoreCollection::Users, id, "balance")
    }

    #[test]
    fn test_grouping_merges_writes_per_document() {
        let mut batch = WriteBatch::new();
        batch.set(StorePath::new(StoreCollection::Activations, "tx1", "status"), "approved");
        batch.set(StorePath::new(StoreCollection::Users, "MP11111", "isActive"), true);
        batch.increment(balance_path("MP22222"), 10.0);

        let grouped = batch.grouped();
        assert_eq!(grouped.len(), 3);

        assert_eq!(grouped[0].collection, StoreCollection::Activations);
        assert_eq!(grouped[0].update, doc! {"$set": {"status": "approved"}});

        assert_eq!(grouped[1].id, "MP11111");
        assert_eq!(grouped[1].update, doc! {"$set": {"isActive": true}});

        assert_eq!(grouped[2].update, doc! {"$inc": {"balance": 10.0}});
    }

    #[test]
    fn test_set_and_increment_on_same_document_share_one_update() {
        let mut batch = WriteBatch::new();
        batch.set(StorePath::new(StoreCollection::Users, "MP11111", "isActive"), true);
        batch.increment(balance_path("MP11111"), 5.0);

        let grouped = batch.grouped();
        assert_eq!(grouped.len(), 1);
        assert_eq!(grouped[0].update, doc! {"$set": {"isActive": true}, "$inc": {"balance": 5.0}});
    }

    #[test]
    fn test_increments_on_same_field_are_summed() {
        let mut batch = WriteBatch::new();
        batch.increment(balance_path("MP11111"), 10.0);
        batch.increment(balance_path("MP11111"), 5.0);

        let grouped = batch.grouped();
        assert_eq!(grouped.len(), 1);
        assert_eq!(grouped[0].update, doc! {"$inc": {"balance": 15.0}});
    }

    #[test]
    fn test_later_set_overwrites_earlier_set() {
        let mut batch = WriteBatch::new();
        let path = StorePath::new(StoreCollection::Users, "MP11111", "name");
        batch.set(path.clone(), "a");
        batch.set(path, "b");

        let grouped = batch.grouped();
        assert_eq!(grouped[0].update, doc! {"$set": {"name": "b"}});
    }

    #[test]
    fn test_path_display() {
        let path = balance_path("MP12345");
        assert_eq!(path.to_string(), "users/MP12345/balance");
    }
}
