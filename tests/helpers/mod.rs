// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use parking_lot::Mutex;
use polyscrape::config::settings::Settings;
use polyscrape::engines::traits::{ElementSnapshot, EngineError, PageDriver};
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

/// 卡片内容
#[derive(Debug, Clone)]
pub struct FakeCard {
    pub name: String,
    pub department: String,
    pub rating: String,
    pub reviews: String,
    pub href: Option<String>,
}

impl FakeCard {
    /// 第 `i` 张合法卡片
    pub fn numbered(i: usize) -> Self {
        Self {
            name: format!("Prof{}, Ann", letters(i)),
            department: "csc".to_string(),
            rating: format!("{:.2}", 1.0 + (i % 5) as f64 * 0.75),
            reviews: format!("{} reviews", i % 7),
            href: Some(professor_path(i)),
        }
    }

    pub fn to_html(&self) -> String {
        let open = match &self.href {
            Some(href) => format!("<a href=\"{}\">", href),
            None => "<a>".to_string(),
        };
        format!(
            "{}<div><h3 class=\"text-3xl\">{}</h3><p>{}</p></div>\
             <p class=\"text-sm\">{}</p>\
             <div class=\"flex items-center justify-end\"><div>★</div><div>{}</div></div></a>",
            open, self.name, self.department, self.reviews, self.rating
        )
    }
}

pub fn professor_path(i: usize) -> String {
    format!("/professor/00000000-0000-4000-8000-{:012x}", i)
}

pub fn professor_url(i: usize) -> String {
    format!("https://polyratings.dev{}", professor_path(i))
}

/// 只含字母的编号，姓名校验不接受数字
fn letters(mut i: usize) -> String {
    let mut out = Vec::new();
    loop {
        out.push((b'a' + (i % 26) as u8) as char);
        i /= 26;
        if i == 0 {
            break;
        }
    }
    out.iter().rev().collect()
}

struct PageState {
    cards: Vec<FakeCard>,
    offset: i64,
    endless_next: usize,
    navigations: usize,
    queries: usize,
    scrolls: usize,
    waits: Vec<Duration>,
}

/// 虚拟滚动页面模拟器
///
/// 只渲染视口内的 `window` 张卡片，滚动后较早的卡片被回收。
/// 所有等待立即返回并被记录
pub struct VirtualScrollPage {
    state: Mutex<PageState>,
    window: usize,
    card_height: i64,
    endless: bool,
    failing_navigations: usize,
    failing_queries: HashSet<usize>,
    fail_all_queries_after: Option<usize>,
}

impl VirtualScrollPage {
    pub fn new(cards: Vec<FakeCard>) -> Self {
        let endless_next = cards.len();
        Self {
            state: Mutex::new(PageState {
                cards,
                offset: 0,
                endless_next,
                navigations: 0,
                queries: 0,
                scrolls: 0,
                waits: Vec::new(),
            }),
            window: 10,
            card_height: 100,
            endless: false,
            failing_navigations: 0,
            failing_queries: HashSet::new(),
            fail_all_queries_after: None,
        }
    }

    pub fn numbered(count: usize) -> Self {
        Self::new((0..count).map(FakeCard::numbered).collect())
    }

    /// 每次滚动都追加一张新卡片，内容永不稳定
    pub fn endless(mut self) -> Self {
        self.endless = true;
        self
    }

    /// 前 `count` 次导航超时
    pub fn failing_navigations(mut self, count: usize) -> Self {
        self.failing_navigations = count;
        self
    }

    /// 第 `calls` 次（从1开始）查询失败
    pub fn failing_queries(mut self, calls: impl IntoIterator<Item = usize>) -> Self {
        self.failing_queries = calls.into_iter().collect();
        self
    }

    /// 第 `call` 次之后的所有查询都失败
    pub fn failing_queries_after(mut self, call: usize) -> Self {
        self.fail_all_queries_after = Some(call);
        self
    }

    pub fn navigations(&self) -> usize {
        self.state.lock().navigations
    }

    pub fn queries(&self) -> usize {
        self.state.lock().queries
    }

    pub fn scrolls(&self) -> usize {
        self.state.lock().scrolls
    }

    pub fn waits(&self) -> Vec<Duration> {
        self.state.lock().waits.clone()
    }

    fn max_offset(&self, state: &PageState) -> i64 {
        state.cards.len().saturating_sub(self.window) as i64 * self.card_height
    }
}

#[async_trait]
impl PageDriver for VirtualScrollPage {
    async fn navigate(&self, _url: &str) -> Result<(), EngineError> {
        let mut state = self.state.lock();
        state.navigations += 1;
        if state.navigations <= self.failing_navigations {
            return Err(EngineError::Navigation("net::ERR_TIMED_OUT".to_string()));
        }
        state.offset = 0;
        Ok(())
    }

    async fn find_elements(&self, _selector: &str) -> Result<Vec<ElementSnapshot>, EngineError> {
        let mut state = self.state.lock();
        state.queries += 1;
        let call = state.queries;
        if self.failing_queries.contains(&call)
            || self.fail_all_queries_after.is_some_and(|after| call > after)
        {
            return Err(EngineError::Timeout);
        }

        let start = (state.offset / self.card_height) as usize;
        let end = (start + self.window).min(state.cards.len());
        Ok(state.cards[start.min(end)..end]
            .iter()
            .map(|card| ElementSnapshot::new(card.to_html()))
            .collect())
    }

    async fn scroll_by(&self, px: i64) -> Result<(), EngineError> {
        let mut state = self.state.lock();
        state.scrolls += 1;
        if self.endless {
            let next = state.endless_next;
            state.cards.push(FakeCard::numbered(next));
            state.endless_next += 1;
        }
        let max = self.max_offset(&state);
        state.offset = (state.offset + px).clamp(0, max);
        Ok(())
    }

    async fn wait(&self, duration: Duration) {
        self.state.lock().waits.push(duration);
    }

    fn name(&self) -> &'static str {
        "virtual-scroll"
    }
}

/// 输出到 `dir` 下的测试配置
pub fn test_settings(dir: &Path) -> Settings {
    let mut settings = Settings::defaults().expect("default settings");
    settings.output.path = dir.join("data").join("professors.json");
    settings.retry.enable_jitter = false;
    settings
}
