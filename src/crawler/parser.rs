use anyhow::Result;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};
use url::Url;

use crate::config::SiteConfig;
use crate::crawler::processor::to_xhtml;
use crate::epub::Chapter;

/// 单个目录页的解析结果
#[derive(Debug, PartialEq, Eq)]
pub enum ListingPage {
    /// 页面中没有目录元素
    Missing,
    /// 目录元素存在但没有条目
    Empty,
    Chapters {
        entries: usize, // 条目总数，含被跳过的
        chapters: Vec<Chapter>,
    },
}

pub struct Parser {
    chapter_list: Selector,
    chapter_link: Selector,
    chapter_no: Selector,
    content: Selector,
    strip: Selector,
}

impl Parser {
    pub fn new(site: &SiteConfig) -> Result<Self> {
        Ok(Self {
            chapter_list: parse_selector(&site.chapter_list)?,
            chapter_link: parse_selector(&site.chapter_link)?,
            chapter_no: parse_selector(&site.chapter_no)?,
            content: parse_selector(&site.content)?,
            strip: parse_selector(&site.strip)?,
        })
    }

    pub fn chapter_list(&self, html: &str, base_url: &Url) -> ListingPage {
        let document = Html::parse_document(html);

        let Some(list) = document.select(&self.chapter_list).next() else {
            return ListingPage::Missing;
        };

        let links: Vec<ElementRef> = list.select(&self.chapter_link).collect();
        if links.is_empty() {
            return ListingPage::Empty;
        }

        let mut chapters = Vec::new();
        for link in &links {
            let Some(href) = link.value().attr("href").filter(|h| !h.is_empty()) else {
                debug!("跳过没有链接的条目");
                continue;
            };

            let url = match base_url.join(href) {
                Ok(url) => url,
                Err(e) => {
                    warn!("无法解析章节链接 {}: {}", href, e);
                    continue;
                }
            };

            let title = link.value().attr("title").unwrap_or_default().trim().to_owned();
            let number = link
                .select(&self.chapter_no)
                .next()
                .map(|e| e.text().collect::<String>().trim().to_owned())
                .unwrap_or_default();

            chapters.push(Chapter { number, title, url });
        }

        ListingPage::Chapters {
            entries: links.len(),
            chapters,
        }
    }

    /// 提取章节正文，去掉其中的 script/style，输出 XHTML
    ///
    /// 找不到正文元素时返回 `None`
    pub fn chapter_content(&self, html: &str) -> Option<String> {
        let mut document = Html::parse_document(html);

        let content = document.select(&self.content).next()?;
        let content_id = content.id();
        let stripped: Vec<_> = content
            .select(&self.strip)
            .map(|e| e.id())
            .filter(|id| *id != content_id)
            .collect();

        for id in stripped {
            if let Some(mut node) = document.tree.get_mut(id) {
                node.detach();
            }
        }

        let content = document.tree.get(content_id).and_then(ElementRef::wrap)?;
        Some(to_xhtml(content))
    }
}

fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| anyhow::anyhow!("无效的选择器 '{}': {}", s, e))
}
