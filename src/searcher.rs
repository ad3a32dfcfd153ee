use std::collections::HashMap;
use std::path::Path;
use std::time::Instant;

use anyhow::{Result, ensure};
use log::{debug, info};

use crate::index;

/// 卡方距离的分母平滑项，避免两个分量同时为零时除以零
const CHI2_EPS: f32 = 1e-10;

/// 搜索结果：最相似的记录及其距离
#[derive(Debug, Clone, PartialEq)]
pub struct Neighbor {
    pub id: String,
    pub distance: f32,
}

/// 持有静态索引并回答最近邻查询
///
/// 索引一次性加载，之后只读，多个线程并发查询同一个实例是安全的。
/// 查询是对所有记录的穷举线性扫描，复杂度 O(N·L)，
/// 如果记录数量变大，可以在不改变接口的前提下换成树或哈希类的近邻结构
#[derive(Debug)]
pub struct Searcher {
    records: Vec<(String, Vec<f32>)>,
    dim: usize,
}

impl Searcher {
    /// 从记录序列构建索引
    ///
    /// 所有向量的维度必须一致，不一致的记录会在加载时报错，
    /// 而不是等到查询时被悄悄截断。
    /// 重复的标识符以最后一条记录为准，但保留首次出现的位置
    pub fn load(records: impl IntoIterator<Item = (String, Vec<f32>)>) -> Result<Self> {
        let mut stored: Vec<(String, Vec<f32>)> = vec![];
        let mut by_id: HashMap<String, usize> = HashMap::new();
        let mut dim = None;

        for (id, vector) in records {
            match dim {
                None => dim = Some(vector.len()),
                Some(dim) => ensure!(
                    vector.len() == dim,
                    "dimension mismatch for {:?}: expected {}, got {}",
                    id,
                    dim,
                    vector.len()
                ),
            }
            match by_id.get(&id) {
                Some(&i) => {
                    debug!("duplicate id {:?}, keeping the last vector", id);
                    stored[i].1 = vector;
                }
                None => {
                    by_id.insert(id.clone(), stored.len());
                    stored.push((id, vector));
                }
            }
        }

        let dim = dim.unwrap_or(0);
        info!("loaded {} records, dim = {}", stored.len(), dim);
        Ok(Self { records: stored, dim })
    }

    /// 从索引文件加载
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::load(index::read_index(path)?)
    }

    /// 索引中的记录数量
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// 索引向量的维度，空索引为 0
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// 返回与 query 卡方距离最小的记录，距离越小越相似
    ///
    /// 查询向量的维度必须与索引一致；索引为空时返回 `Ok(None)`。
    /// 距离相等时保留先遍历到的记录，遍历顺序即加载顺序，所以结果是确定的
    pub fn search_best(&self, query: &[f32]) -> Result<Option<Neighbor>> {
        if self.records.is_empty() {
            return Ok(None);
        }
        ensure!(
            query.len() == self.dim,
            "query dimension mismatch: expected {}, got {}",
            self.dim,
            query.len()
        );

        let start = Instant::now();
        let mut best = (0, f32::INFINITY);
        for (i, (_, vector)) in self.records.iter().enumerate() {
            let d = chi2_distance(vector, query);
            if d < best.1 {
                best = (i, d);
            }
        }
        debug!("scanned {} records in {:.2?}", self.records.len(), start.elapsed());

        Ok(Some(Neighbor { id: self.records[best.0].0.clone(), distance: best.1 }))
    }
}

/// 计算两个直方图向量的卡方距离
///
/// `0.5 * Σ (aᵢ - bᵢ)² / (aᵢ + bᵢ + ε)`，
/// 对非负向量始终非负、对称，两个向量相同时为零
pub fn chi2_distance(a: &[f32], b: &[f32]) -> f32 {
    let sum: f32 = a.iter().zip(b).map(|(a, b)| (a - b).powi(2) / (a + b + CHI2_EPS)).sum();
    0.5 * sum
}
