use std::path::Path;

use anyhow::Result;
use async_zip::tokio::write::ZipFileWriter;
use async_zip::{Compression, ZipEntryBuilder};
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, instrument, warn};

use super::metadata::MIMETYPE;

pub struct Compressor;

impl Default for Compressor {
    fn default() -> Self {
        Self::new()
    }
}

impl Compressor {
    pub fn new() -> Self {
        Self
    }

    /// 将内存中的文件打包为EPUB
    ///
    /// mimetype 必须是第一个条目且不压缩。先写入 `.epub.part`，
    /// 完成后再重命名，失败时删除半成品
    #[instrument(skip_all, fields(path = %epub_path.display()))]
    pub async fn compress_epub(&self, epub_path: &Path, files: &[(String, String)]) -> Result<()> {
        info!("正在压缩EPUB文件");

        let part_path = epub_path.with_extension("epub.part");
        let result = async {
            self.write_zip(&part_path, files).await?;
            fs::rename(&part_path, epub_path).await?;
            anyhow::Ok(())
        }
        .await;

        if let Err(e) = result {
            if let Err(remove_err) = fs::remove_file(&part_path).await {
                warn!("无法删除未完成的文件 {}: {}", part_path.display(), remove_err);
            }
            return Err(e);
        }

        info!("EPUB文件已生成");
        Ok(())
    }

    async fn write_zip(&self, path: &Path, files: &[(String, String)]) -> Result<()> {
        let file = File::create(path).await?;
        let mut writer = ZipFileWriter::with_tokio(file);

        let entry = ZipEntryBuilder::new("mimetype".into(), Compression::Stored);
        writer.write_entry_whole(entry, MIMETYPE.as_bytes()).await?;

        for (zip_path, content) in files {
            debug!("正在添加文件: {}", zip_path);
            let entry = ZipEntryBuilder::new(zip_path.as_str().into(), Compression::Deflate);
            writer.write_entry_whole(entry, content.as_bytes()).await?;
        }

        // 重命名前等待后台写入完成
        let mut file = writer.close().await?.into_inner();
        file.flush().await?;
        Ok(())
    }
}
