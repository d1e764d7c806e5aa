pub mod chapter;
pub mod compression;
pub mod metadata;
pub mod volume;

pub use chapter::{Chapter, ChapterDocument};
pub use compression::Compressor;
pub use metadata::Metadata;
pub use volume::{Volume, partition};

use std::path::Path;

use anyhow::Result;
use chrono::{DateTime, Utc};
use tracing::instrument;

/// 一个待输出的EPUB文件
#[derive(Debug, Clone)]
pub struct Epub {
    pub id: String,
    pub title: String,
    pub lang: String,
    pub author: String,
    pub modified: DateTime<Utc>,
    pub chapters: Vec<ChapterDocument>, // 按原顺序排列
}

impl Epub {
    pub fn new(id: String, title: String, lang: String, author: String) -> Self {
        Self {
            id,
            title,
            lang,
            author,
            modified: Utc::now(),
            chapters: Vec::new(),
        }
    }

    pub fn add_chapter(&mut self, chapter: ChapterDocument) {
        self.chapters.push(chapter);
    }

    /// 除 mimetype 外的全部文件（路径，内容）
    pub fn files(&self) -> Vec<(String, String)> {
        let metadata = Metadata::new();
        let mut files = vec![
            ("META-INF/container.xml".to_owned(), metadata.container_xml()),
            ("OEBPS/content.opf".to_owned(), metadata.content_opf(self)),
            ("OEBPS/toc.ncx".to_owned(), metadata.toc_ncx(self)),
            ("OEBPS/nav.xhtml".to_owned(), metadata.nav_xhtml(self)),
        ];
        for chapter in &self.chapters {
            files.push((format!("OEBPS/Text/{}", chapter.filename), chapter.xhtml.clone()));
        }
        files
    }

    #[instrument(skip_all)]
    pub async fn generate(&self, epub_path: &Path) -> Result<()> {
        tracing::info!("正在生成EPUB文件: {}", self.title);

        Compressor::new()
            .compress_epub(epub_path, &self.files())
            .await?;

        tracing::info!("EPUB文件生成成功: {}", epub_path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn files_contain_every_chapter_document() {
        let mut epub = Epub::new(
            "novel-vol2".to_owned(),
            "Novel - Volume 2".to_owned(),
            "en".to_owned(),
            "Unknown Author".to_owned(),
        );
        epub.add_chapter(ChapterDocument {
            title: "Chapter 11: Return".to_owned(),
            filename: "chapter_1.xhtml".to_owned(),
            xhtml: "<html/>".to_owned(),
        });

        let files = epub.files();
        let names: Vec<&str> = files.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "META-INF/container.xml",
                "OEBPS/content.opf",
                "OEBPS/toc.ncx",
                "OEBPS/nav.xhtml",
                "OEBPS/Text/chapter_1.xhtml",
            ]
        );
        assert_eq!(files[4].1, "<html/>");
    }

    #[tokio::test]
    async fn generate_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("novel-volume-2.epub");
        let epub = Epub::new(
            "novel-vol2".to_owned(),
            "Novel - Volume 2".to_owned(),
            "en".to_owned(),
            "Unknown Author".to_owned(),
        );

        epub.generate(&path).await.unwrap();
        assert!(path.is_file());
    }
}
