// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::collections::HashMap;
use std::sync::Arc;

use rand::seq::IteratorRandom;
use tokio::sync::Semaphore;
use tracing::warn;

use crate::domain::models::crawl::{CrawlResult, CrawlTarget};
use crate::engines::traits::{FetchedPage, PageFetcher};

/// 链接抽样器特质
///
/// 抽样源可注入，生产环境使用真随机，测试可替换为确定性实现
pub trait LinkSampler: Send + Sync {
    /// 无放回抽样至多count条链接
    fn sample(&self, links: Vec<String>, count: usize) -> Vec<String>;
}

/// 随机抽样器
///
/// 有意采用随机抽样而非确定性前缀，使大型站点的多次爬取覆盖更多页面
pub struct RandomSampler;

impl LinkSampler for RandomSampler {
    fn sample(&self, links: Vec<String>, count: usize) -> Vec<String> {
        let mut rng = rand::rng();
        links.into_iter().choose_multiple(&mut rng, count)
    }
}

/// 并发爬虫
///
/// 编排单次爬取：种子页抓取（提取链接），随后对抽样子链接分批并发抓取。
/// 持有本次爬取共享的计数信号量，这是唯一的准入控制机制
pub struct ConcurrentCrawler {
    fetcher: Arc<dyn PageFetcher>,
    sampler: Arc<dyn LinkSampler>,
    semaphore: Arc<Semaphore>,
    max_concurrent: usize,
    batch_size: usize,
}

impl ConcurrentCrawler {
    /// 创建新的并发爬虫实例
    ///
    /// # 参数
    ///
    /// * `fetcher` - 单页抓取引擎
    /// * `max_concurrent` - 并发许可数，也是子链接抽样上限
    /// * `batch_size` - 批大小，批内并发、批间串行
    pub fn new(fetcher: Arc<dyn PageFetcher>, max_concurrent: usize, batch_size: usize) -> Self {
        Self::new_with_sampler(fetcher, Arc::new(RandomSampler), max_concurrent, batch_size)
    }

    /// 使用自定义抽样器创建爬虫实例
    pub fn new_with_sampler(
        fetcher: Arc<dyn PageFetcher>,
        sampler: Arc<dyn LinkSampler>,
        max_concurrent: usize,
        batch_size: usize,
    ) -> Self {
        Self {
            fetcher,
            sampler,
            semaphore: Arc::new(Semaphore::new(max_concurrent)),
            max_concurrent,
            batch_size,
        }
    }

    /// 执行完整爬取
    ///
    /// 单页失败被就地吸收，整体爬取从不因个别页面失败而失败；
    /// 仅当种子页不可达时main_text与sampled_links同时为空，
    /// 调用方应将空的种子文本视为爬取失败信号
    ///
    /// # 参数
    ///
    /// * `target` - 爬取目标
    ///
    /// # 返回值
    ///
    /// 爬取结果
    pub async fn crawl_all(&self, target: &CrawlTarget) -> CrawlResult {
        let seed = self
            .fetch_page(target.seed_url(), target.origin(), true)
            .await;

        let candidates: Vec<String> = seed
            .links
            .into_iter()
            .filter(|link| link != target.seed_url())
            .collect();
        let sampled = self.sampler.sample(candidates, self.max_concurrent);

        let mut link_texts = HashMap::new();
        for batch in sampled.chunks(self.batch_size) {
            let fetches = batch
                .iter()
                .map(|link| self.fetch_page(link, target.origin(), false));
            let pages = futures::future::join_all(fetches).await;

            for (link, page) in batch.iter().zip(pages) {
                // 空文本的抓取不记录
                if !page.text.is_empty() {
                    link_texts.insert(link.clone(), page.text);
                }
            }
        }

        CrawlResult {
            seed_url: target.seed_url().to_string(),
            main_text: seed.text,
            sampled_links: sampled.into_iter().collect(),
            link_texts,
        }
    }

    /// 在信号量许可下抓取单页
    ///
    /// 任何网络、超时或解析失败被吸收为一个空页面，仅记录日志
    async fn fetch_page(&self, url: &str, origin: &str, extract_links: bool) -> FetchedPage {
        let _permit = match self.semaphore.acquire().await {
            Ok(permit) => permit,
            Err(_) => return FetchedPage::default(),
        };

        match self.fetcher.fetch(url, origin, extract_links).await {
            Ok(page) => page,
            Err(e) => {
                warn!("Error fetching {}: {}", url, e);
                FetchedPage::default()
            }
        }
    }
}
