use std::io::{self, Write};
use std::sync::LazyLock;
use std::time::Duration;

use anyhow::Result;
use regex::{Captures, Regex};
use tracing::{debug, info, instrument};

use crate::config::Settings;

static WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\p{Alphabetic}+").expect("单词正则编译失败"));

/// 一次运行的交互输入
#[derive(Debug, Clone, PartialEq)]
pub struct UserInput {
    pub book_name: String,
    pub chapters_per_volume: usize,
    pub delay: Duration,
}

fn read_line(prompt: &str) -> Result<String> {
    print!("{}", prompt);
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_owned())
}

/// 书名必填，其余两项输入非法时回退到配置中的默认值
#[instrument(skip_all)]
pub fn get_user_input(defaults: &Settings) -> Result<UserInput> {
    let book_name = read_line("请输入书名（与网址中一致）: ")?;
    debug!("用户输入: {}", book_name);
    if book_name.is_empty() {
        anyhow::bail!("书名不能为空");
    }

    let default_chapters = defaults.chapters_per_volume;
    let input = read_line(&format!("请输入每卷章节数 (默认: {}): ", default_chapters))?;
    let chapters_per_volume =
        parse_chapters_per_volume(&input, default_chapters).unwrap_or_else(|| {
            println!("输入无效，使用默认值 {} 章", default_chapters);
            default_chapters
        });

    let default_delay = defaults.delay()?;
    let input = read_line(&format!("请输入请求间隔秒数 (默认: {}): ", defaults.delay))?;
    let delay = parse_delay(&input, default_delay).unwrap_or_else(|| {
        println!("输入无效，使用默认值 {} 秒", defaults.delay);
        default_delay
    });

    Ok(UserInput {
        book_name,
        chapters_per_volume,
        delay,
    })
}

/// 空输入取默认值；非正整数返回 `None`
pub fn parse_chapters_per_volume(input: &str, default: usize) -> Option<usize> {
    let input = input.trim();
    if input.is_empty() {
        return Some(default);
    }
    input.parse::<usize>().ok().filter(|n| *n > 0)
}

/// 空输入取默认值；负数、NaN、无穷或超出 `Duration` 范围的值返回 `None`
pub fn parse_delay(input: &str, default: Duration) -> Option<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Some(default);
    }
    let secs = input.parse::<f64>().ok()?;
    Duration::try_from_secs_f64(secs).ok()
}

/// 询问是否继续，只有输入 y 才继续
pub fn ask_continue() -> Result<bool> {
    let choice = read_line("\n是否继续爬取其他小说? (y/n): ")?;
    Ok(choice.to_lowercase() == "y")
}

/// `re-zero` -> `Re Zero`
pub fn book_title(book_name: &str) -> String {
    let spaced = book_name.replace('-', " ");
    WORD.replace_all(&spaced, |caps: &Captures| {
        let mut chars = caps[0].chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
            None => String::new(),
        }
    })
    .into_owned()
}

#[instrument]
pub fn display_elapsed_time(duration: Duration) {
    let total_ms = duration.as_millis();
    let mins = total_ms / 60000;
    let secs = (total_ms % 60000) / 1000;
    let ms = total_ms % 1000;

    if mins > 0 {
        info!("✅ 爬取完成！耗时: {}分{}秒{}毫秒", mins, secs, ms);
    } else if secs > 0 {
        info!("✅ 爬取完成！耗时: {}秒{}毫秒", secs, ms);
    } else {
        info!("✅ 爬取完成！耗时: {}毫秒", ms);
    }
}
