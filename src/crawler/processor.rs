use html_escape::{encode_double_quoted_attribute, encode_text};
use scraper::{ElementRef, Node};
use tracing::{info, instrument};

use crate::epub::{Chapter, ChapterDocument};

static XML_CONTENT_1: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE html>
<html xmlns="http://www.w3.org/1999/xhtml" lang=""#;

static XML_CONTENT_2: &str = r#"">
<head>
    <title>"#;

static XML_CONTENT_3: &str = r#"</title>
    <meta http-equiv="Content-Type" content="text/html; charset=UTF-8"/>
</head>
<body>
    <h1>"#;

static XML_CONTENT_4: &str = r#"</h1>
"#;

static XML_CONTENT_5: &str = r#"
</body>
</html>"#;

static VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

#[derive(Clone)]
pub struct Processor {
    lang: String,
}

impl Processor {
    pub fn new(lang: String) -> Self {
        Self { lang }
    }

    /// 用最简单的 XHTML 外壳包裹章节正文
    ///
    /// `content` 应为 [`to_xhtml`] 的输出；`position` 是章节在本卷中的序号，用作文件名
    #[instrument(skip_all)]
    pub fn chapter_document(
        &self,
        chapter: &Chapter,
        position: usize,
        content: &str,
    ) -> ChapterDocument {
        let title = chapter.display_title();
        info!("正在处理章节: {}", title);

        let escaped_title = encode_text(&title);
        let mut xhtml_content = String::new();

        xhtml_content.push_str(XML_CONTENT_1);
        xhtml_content.push_str(&encode_double_quoted_attribute(&self.lang));
        xhtml_content.push_str(XML_CONTENT_2);
        xhtml_content.push_str(&escaped_title);
        xhtml_content.push_str(XML_CONTENT_3);
        xhtml_content.push_str(&escaped_title);
        xhtml_content.push_str(XML_CONTENT_4);
        xhtml_content.push_str(content);
        xhtml_content.push_str(XML_CONTENT_5);

        ChapterDocument {
            title,
            filename: format!("chapter_{}.xhtml", position),
            xhtml: xhtml_content,
        }
    }
}

/// 按 XML 规则序列化元素：空元素自闭合，文本和属性值转义，丢弃注释
pub fn to_xhtml(element: ElementRef) -> String {
    let mut out = String::new();
    write_element(element, &mut out);
    out
}

fn write_element(element: ElementRef, out: &mut String) {
    let name = element.value().name();
    out.push('<');
    out.push_str(name);
    for (key, value) in element.value().attrs() {
        out.push_str(&format!(r#" {}="{}""#, key, encode_double_quoted_attribute(value)));
    }

    if VOID_ELEMENTS.contains(&name) {
        out.push_str("/>");
        return;
    }
    out.push('>');

    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(&encode_text(&**text)),
            Node::Element(_) => {
                if let Some(child) = ElementRef::wrap(child) {
                    write_element(child, out);
                }
            }
            _ => {}
        }
    }

    out.push_str("</");
    out.push_str(name);
    out.push('>');
}
