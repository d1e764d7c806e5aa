use url::Url;

/// 目录页中的一条章节记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chapter {
    pub number: String, // 章节编号标签，可能为空或重复
    pub title: String,
    pub url: Url,
}

impl Chapter {
    /// 书中显示的章节标题
    pub fn display_title(&self) -> String {
        match (self.number.is_empty(), self.title.is_empty()) {
            (false, false) => format!("Chapter {}: {}", self.number, self.title),
            (false, true) => format!("Chapter {}", self.number),
            (true, false) => self.title.clone(),
            (true, true) => self.url.to_string(),
        }
    }
}

/// 已渲染、待打包的章节文档
#[derive(Debug, Clone)]
pub struct ChapterDocument {
    pub title: String,
    pub filename: String,
    pub xhtml: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chapter(number: &str, title: &str) -> Chapter {
        Chapter {
            number: number.to_owned(),
            title: title.to_owned(),
            url: Url::parse("https://example.com/book/x/chapter-1").unwrap(),
        }
    }

    #[test]
    fn display_title_variants() {
        assert_eq!(chapter("1", "Start").display_title(), "Chapter 1: Start");
        assert_eq!(chapter("1", "").display_title(), "Chapter 1");
        assert_eq!(chapter("", "Prologue").display_title(), "Prologue");
        assert_eq!(
            chapter("", "").display_title(),
            "https://example.com/book/x/chapter-1"
        );
    }
}
