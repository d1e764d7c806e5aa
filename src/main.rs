use std::time::Instant;

use anyhow::Result;
use tracing::error;

use novel_fetch::{
    NovelCrawler, Settings, ask_continue, display_elapsed_time, get_user_input, logger,
};

fn interrupted() -> ! {
    println!("\n进程已中断");
    std::process::exit(0);
}

/// 在阻塞线程中读取终端输入，等待期间仍响应 Ctrl-C
async fn prompt<T, F>(read: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::select! {
        result = tokio::task::spawn_blocking(read) => result?,
        _ = tokio::signal::ctrl_c() => interrupted(),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    logger::init();

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            error!("配置加载失败: {:#}", e);
            return Ok(());
        }
    };

    let mut crawler = match NovelCrawler::new(&settings) {
        Ok(crawler) => crawler,
        Err(e) => {
            error!("初始化失败: {:#}", e);
            return Ok(());
        }
    };

    loop {
        println!("\n=== novel-fetch ===");
        let defaults = settings.clone();
        match prompt(move || get_user_input(&defaults)).await {
            Ok(input) => {
                crawler.set_delay(input.delay);
                println!("\n正在爬取 '{}'...", input.book_name);
                let start = Instant::now();

                tokio::select! {
                    result = crawler.scrape_and_convert(&input.book_name, input.chapters_per_volume) => {
                        match result {
                            Ok(files) if files.is_empty() => println!("没有找到任何章节！"),
                            Ok(files) => {
                                display_elapsed_time(start.elapsed());
                                println!("共生成 {} 个EPUB文件:", files.len());
                                for file in &files {
                                    println!(" - {}", file.display());
                                }
                            }
                            Err(e) => error!("发生错误: {:#}", e),
                        }
                    }
                    _ = tokio::signal::ctrl_c() => interrupted(),
                }
            }
            Err(e) => {
                println!("输入错误: {}", e);
            }
        }

        if !prompt(ask_continue).await? {
            break;
        }
    }

    println!("程序结束。");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn prompt_returns_what_the_reader_returns() {
        assert_eq!(prompt(|| Ok(3)).await.unwrap(), 3);
        assert!(prompt(|| -> Result<()> { anyhow::bail!("书名不能为空") }).await.is_err());
    }
}
