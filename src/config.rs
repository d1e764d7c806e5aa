use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use serde::Deserialize;
use url::Url;

static CONFIG_NAME: &str = "novel-fetch";
static ENV_PREFIX: &str = "NOVEL_FETCH";

static DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

pub const DEFAULT_CHAPTERS_PER_VOLUME: usize = 100;
pub const DEFAULT_DELAY: f64 = 1.0;

/// 运行配置
///
/// 优先级：环境变量 `NOVEL_FETCH__*` > `novel-fetch.toml` > 内置默认值
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub base_url: String,
    pub user_agent: String,
    pub output_dir: PathBuf,
    pub lang: String,
    pub author: String,
    pub chapters_per_volume: usize,
    /// 请求间隔（秒）
    pub delay: f64,
    pub site: SiteConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: "https://novelfire.net".to_owned(),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            output_dir: PathBuf::from("epub_output"),
            lang: "en".to_owned(),
            author: "Unknown Author".to_owned(),
            chapters_per_volume: DEFAULT_CHAPTERS_PER_VOLUME,
            delay: DEFAULT_DELAY,
            site: SiteConfig::default(),
        }
    }
}

/// 页面元素的 CSS 选择器
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub chapter_list: String,
    pub chapter_link: String,
    pub chapter_no: String,
    pub content: String,
    pub strip: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            chapter_list: "ul.chapter-list".to_owned(),
            chapter_link: "a".to_owned(),
            chapter_no: "span.chapter-no".to_owned(),
            content: "div#content".to_owned(),
            strip: "script, style".to_owned(),
        }
    }
}

impl Settings {
    /// 从工作目录下的 `novel-fetch.toml`（可选）和环境变量加载
    pub fn load() -> Result<Self> {
        Self::build(config::File::with_name(CONFIG_NAME).required(false))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        Self::build(config::File::from(path).required(false))
    }

    fn build(file: config::File<config::FileSourceFile, config::FileFormat>) -> Result<Self> {
        let settings: Settings = config::Config::builder()
            .add_source(file)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
            .map_err(|e| anyhow::anyhow!("配置文件反序列化失败: {}", e))?;

        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        Url::parse(&self.base_url)
            .map_err(|e| anyhow::anyhow!("base_url '{}' 无效: {}", self.base_url, e))?;
        if self.chapters_per_volume == 0 {
            anyhow::bail!("chapters_per_volume 必须大于 0");
        }
        self.delay()?;
        Ok(())
    }

    pub fn base_url(&self) -> Result<Url> {
        Ok(Url::parse(&self.base_url)?)
    }

    pub fn delay(&self) -> Result<Duration> {
        Duration::try_from_secs_f64(self.delay)
            .map_err(|e| anyhow::anyhow!("delay {} 无效: {}", self.delay, e))
    }
}
