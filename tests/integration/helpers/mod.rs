// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 集成测试辅助组件
//!
//! 提供内存版的仓库、问题生成器与确定性抽样器，
//! 以及组装完整管道的测试夹具

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use parking_lot::Mutex;
use uuid::Uuid;

use quizcrawl::application::use_cases::generate_content::GenerateContentUseCase;
use quizcrawl::application::use_cases::process_crawl::ProcessCrawlUseCase;
use quizcrawl::domain::models::crawl::CrawlResult;
use quizcrawl::domain::models::question::QuestionItem;
use quizcrawl::domain::models::session_event::SessionEvent;
use quizcrawl::domain::models::website::Website;
use quizcrawl::domain::repositories::website_repository::{RepositoryError, WebsiteRepository};
use quizcrawl::domain::services::crawl_service::{ConcurrentCrawler, LinkSampler};
use quizcrawl::domain::services::question_generator::QuestionGeneratorTrait;
use quizcrawl::engines::traits::{FetchError, FetchedPage, PageFetcher};
use quizcrawl::infrastructure::cache::{ContentCache, InMemoryCacheStore};
use quizcrawl::infrastructure::events::{EventChannel, EventStream, InMemoryEventChannel};
use quizcrawl::queue::task_queue::{InMemoryTaskQueue, TaskQueue};

/// 确定性抽样器：按字典序取前count条
pub struct FirstN;

impl LinkSampler for FirstN {
    fn sample(&self, mut links: Vec<String>, count: usize) -> Vec<String> {
        links.sort();
        links.truncate(count);
        links
    }
}

/// 固定响应的抓取引擎
pub struct StaticFetcher {
    pages: HashMap<String, FetchedPage>,
}

impl StaticFetcher {
    /// 构造一个站点：种子页携带给定子链接，每个子链接返回固定文本
    pub fn site(seed: &str, sublinks: &[&str]) -> Arc<Self> {
        let mut pages = HashMap::new();
        pages.insert(
            seed.to_string(),
            FetchedPage {
                text: format!("Welcome to {}", seed),
                links: sublinks.iter().map(|s| s.to_string()).collect(),
            },
        );
        for link in sublinks {
            pages.insert(
                link.to_string(),
                FetchedPage {
                    text: format!("Content of {}", link),
                    links: Default::default(),
                },
            );
        }
        Arc::new(Self { pages })
    }

    /// 构造一个没有任何可达页面的站点
    pub fn unreachable() -> Arc<Self> {
        Arc::new(Self {
            pages: HashMap::new(),
        })
    }
}

#[async_trait]
impl PageFetcher for StaticFetcher {
    async fn fetch(
        &self,
        url: &str,
        _origin: &str,
        _extract_links: bool,
    ) -> Result<FetchedPage, FetchError> {
        self.pages
            .get(url)
            .cloned()
            .ok_or(FetchError::Status(404))
    }
}

/// 内存网站仓库
#[derive(Default)]
pub struct MemoryWebsiteRepo {
    websites: Mutex<HashMap<Uuid, Website>>,
    questions: Mutex<HashMap<Uuid, Vec<QuestionItem>>>,
}

impl MemoryWebsiteRepo {
    pub fn website_count(&self) -> usize {
        self.websites.lock().len()
    }
}

#[async_trait]
impl WebsiteRepository for MemoryWebsiteRepo {
    async fn create_website(
        &self,
        url: &str,
        content: Option<&str>,
    ) -> Result<Website, RepositoryError> {
        let website = Website {
            id: Uuid::new_v4(),
            url: url.to_string(),
            content: content.map(str::to_string),
            last_scraped: chrono::Utc::now(),
        };
        self.websites.lock().insert(website.id, website.clone());
        Ok(website)
    }

    async fn bulk_create_questions(
        &self,
        website_id: Uuid,
        questions: &[QuestionItem],
    ) -> Result<(), RepositoryError> {
        if !self.websites.lock().contains_key(&website_id) {
            return Err(RepositoryError::NotFound);
        }
        self.questions.lock().insert(website_id, questions.to_vec());
        Ok(())
    }

    async fn find_questions_by_url(
        &self,
        url: &str,
    ) -> Result<Option<Vec<QuestionItem>>, RepositoryError> {
        let websites = self.websites.lock();
        let Some(website) = websites.values().find(|w| w.url == url) else {
            return Ok(None);
        };
        Ok(self.questions.lock().get(&website.id).cloned())
    }
}

/// 固定输出的问题生成器，统计调用次数
pub struct StubGenerator {
    outcome: Result<Vec<QuestionItem>, String>,
    pub calls: AtomicUsize,
}

impl StubGenerator {
    pub fn ok(questions: Vec<QuestionItem>) -> Self {
        Self {
            outcome: Ok(questions),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            outcome: Err(message.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl QuestionGeneratorTrait for StubGenerator {
    async fn generate_questions(&self, _crawl: &CrawlResult) -> anyhow::Result<Vec<QuestionItem>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.outcome {
            Ok(questions) => Ok(questions.clone()),
            Err(message) => Err(anyhow::anyhow!(message.clone())),
        }
    }
}

pub fn sample_questions() -> Vec<QuestionItem> {
    vec![
        QuestionItem {
            question: "Which service are you most interested in?".to_string(),
            options: vec!["Consulting".to_string(), "Training".to_string()],
        },
        QuestionItem {
            question: "How did you find this site?".to_string(),
            options: vec!["Search".to_string(), "Referral".to_string()],
        },
    ]
}

/// 完整管道夹具
///
/// 触发用例与处理用例共享同一套缓存、队列与事件通道。
/// 管道推进由测试显式驱动（process_next），保证订阅先于发布建立
pub struct PipelineHarness {
    pub trigger: Arc<GenerateContentUseCase>,
    pub process: Arc<ProcessCrawlUseCase>,
    pub queue: Arc<InMemoryTaskQueue>,
    pub cache: Arc<ContentCache>,
    pub repo: Arc<MemoryWebsiteRepo>,
    pub generator: Arc<StubGenerator>,
    pub events: Arc<InMemoryEventChannel>,
}

impl PipelineHarness {
    /// 组装夹具
    ///
    /// # 参数
    ///
    /// * `fetcher` - 页面抓取引擎
    /// * `generator` - 问题生成器
    /// * `cache_hit_delay` - 缓存命中路径的发布延迟
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        generator: StubGenerator,
        cache_hit_delay: Duration,
    ) -> Self {
        let cache = Arc::new(ContentCache::new(Arc::new(InMemoryCacheStore::new()), 3600));
        let repo = Arc::new(MemoryWebsiteRepo::default());
        let generator = Arc::new(generator);
        let events = Arc::new(InMemoryEventChannel::new());
        let queue = Arc::new(InMemoryTaskQueue::new());

        let crawler = Arc::new(ConcurrentCrawler::new_with_sampler(
            fetcher,
            Arc::new(FirstN),
            10,
            10,
        ));
        let trigger = Arc::new(GenerateContentUseCase::new(
            crawler,
            cache.clone(),
            queue.clone(),
        ));

        let process = Arc::new(ProcessCrawlUseCase::new_with_delay(
            cache.clone(),
            repo.clone(),
            generator.clone(),
            events.clone(),
            cache_hit_delay,
        ));

        Self {
            trigger,
            process,
            queue,
            cache,
            repo,
            generator,
            events,
        }
    }

    /// 取出并处理队列中的下一个任务
    pub async fn process_next(&self) {
        let task = tokio::time::timeout(Duration::from_secs(5), self.queue.dequeue())
            .await
            .expect("no task was dispatched in time")
            .unwrap()
            .expect("queue closed unexpectedly");
        self.process.run(&task).await;
    }

    /// 订阅指定会话的事件流
    pub async fn subscribe(&self, session_id: &str) -> EventStream {
        self.events.subscribe(session_id).await.unwrap()
    }
}

/// 收集事件直至终止事件，带超时保护
pub async fn collect_until_terminal(mut stream: EventStream) -> Vec<SessionEvent> {
    let collected = tokio::time::timeout(Duration::from_secs(5), async {
        let mut events = Vec::new();
        while let Some(event) = stream.next().await {
            let terminal = event.is_terminal();
            events.push(event);
            if terminal {
                break;
            }
        }
        events
    })
    .await;
    collected.expect("event stream did not reach a terminal event in time")
}
