pub mod downloader;
pub mod parser;
pub mod processor;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use tokio::fs;
use tracing::{error, info, instrument, warn};
use url::Url;

pub use downloader::Downloader;
pub use parser::{ListingPage, Parser};
pub use processor::Processor;

use crate::config::Settings;
use crate::epub::{self, Chapter, Epub, Volume};
use crate::utils::book_title;

pub struct NovelCrawler {
    downloader: Downloader,
    parser: Parser,
    processor: Processor,
    output_dir: PathBuf,
    lang: String,
    author: String,
    delay: Duration,
}

impl NovelCrawler {
    pub fn new(settings: &Settings) -> Result<Self> {
        Ok(Self {
            downloader: Downloader::new(settings.base_url()?, &settings.user_agent)?,
            parser: Parser::new(&settings.site)?,
            processor: Processor::new(settings.lang.clone()),
            output_dir: settings.output_dir.clone(),
            lang: settings.lang.clone(),
            author: settings.author.clone(),
            delay: settings.delay()?,
        })
    }

    pub fn set_delay(&mut self, delay: Duration) {
        self.delay = delay;
    }

    /// 逐页读取目录，直到某页没有章节
    ///
    /// 请求失败时提前结束，返回已获取的部分
    #[instrument(skip(self))]
    pub async fn chapter_list(&self, book_name: &str) -> Vec<Chapter> {
        info!("正在获取 '{}' 的章节目录", book_name);
        let mut chapters = Vec::new();
        let mut page = 1;

        loop {
            let html = match self.downloader.chapter_list(book_name, page).await {
                Ok(html) => html,
                Err(e) => {
                    error!("获取第 {} 页目录失败: {}", page, e);
                    break;
                }
            };

            match self.parser.chapter_list(&html, self.downloader.base_url()) {
                ListingPage::Missing => {
                    info!("第 {} 页没有章节目录", page);
                    break;
                }
                ListingPage::Empty => {
                    info!("第 {} 页没有章节", page);
                    break;
                }
                ListingPage::Chapters {
                    entries,
                    chapters: found,
                } => {
                    info!("第 {} 页找到 {} 个章节", page, entries);
                    chapters.extend(found);
                }
            }

            page += 1;
            tokio::time::sleep(self.delay).await;
        }

        info!("共找到 {} 个章节", chapters.len());
        chapters
    }

    /// 获取章节正文，失败或缺少正文时返回 `None`
    pub async fn chapter_content(&self, url: &Url) -> Option<String> {
        let html = match self.downloader.chapter(url).await {
            Ok(html) => html,
            Err(e) => {
                error!("获取章节内容失败 {}: {}", url, e);
                return None;
            }
        };

        let content = self.parser.chapter_content(&html);
        if content.is_none() {
            warn!("未找到章节正文: {}", url);
        }
        content
    }

    /// 下载一卷的所有章节并组装，缺少内容的章节被跳过
    #[instrument(skip_all, fields(volume = volume.index))]
    pub async fn build_epub(&self, volume: &Volume, book_name: &str) -> Epub {
        info!("正在创建第 {} 卷，共 {} 章", volume.index, volume.chapters.len());

        let mut epub = Epub::new(
            format!("{}-vol{}", book_name, volume.index),
            format!("{} - Volume {}", book_title(book_name), volume.index),
            self.lang.clone(),
            self.author.clone(),
        );

        for (i, chapter) in volume.chapters.iter().enumerate() {
            match self.chapter_content(&chapter.url).await {
                Some(content) => {
                    epub.add_chapter(self.processor.chapter_document(chapter, i + 1, &content))
                }
                None => warn!("跳过缺少内容的章节: {}", chapter.display_title()),
            }
            // 失败的请求同样计入间隔
            tokio::time::sleep(self.delay).await;
        }

        if epub.chapters.is_empty() {
            // 与其他卷保持编号连续，仍然输出只有目录的文件
            warn!("第 {} 卷没有任何可用章节，仍将生成文件", volume.index);
        }
        epub
    }

    pub async fn create_epub(&self, volume: &Volume, book_name: &str) -> Result<PathBuf> {
        let epub = self.build_epub(volume, book_name).await;

        fs::create_dir_all(&self.output_dir).await?;
        let epub_path = self.output_dir.join(volume.filename(book_name));
        epub.generate(&epub_path).await?;

        info!("EPUB已创建: {}", epub_path.display());
        Ok(epub_path)
    }

    #[instrument(skip(self))]
    pub async fn scrape_and_convert(
        &self,
        book_name: &str,
        chapters_per_volume: usize,
    ) -> Result<Vec<PathBuf>> {
        if book_name.trim().is_empty() {
            anyhow::bail!("书名不能为空");
        }

        let all_chapters = self.chapter_list(book_name).await;
        if all_chapters.is_empty() {
            warn!("没有找到任何章节");
            return Ok(Vec::new());
        }

        let mut created_files = Vec::new();
        for volume in epub::partition(&all_chapters, chapters_per_volume) {
            created_files.push(self.create_epub(&volume, book_name).await?);
        }

        info!("完成！共生成 {} 个EPUB文件", created_files.len());
        for file in &created_files {
            info!(" - {}", file.display());
        }
        Ok(created_files)
    }
}
