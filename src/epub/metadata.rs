use html_escape::{encode_double_quoted_attribute, encode_text};
use tracing::{info, instrument};

use super::Epub;

pub static MIMETYPE: &str = "application/epub+zip";

pub struct Metadata;

impl Default for Metadata {
    fn default() -> Self {
        Self::new()
    }
}

impl Metadata {
    pub fn new() -> Self {
        Self
    }

    /// META-INF/container.xml
    pub fn container_xml(&self) -> String {
        r#"<?xml version="1.0" encoding="UTF-8"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
    <rootfiles>
        <rootfile full-path="OEBPS/content.opf" media-type="application/oebps-package+xml"/>
    </rootfiles>
</container>"#
            .to_owned()
    }

    /// OEBPS/content.opf
    #[instrument(skip_all)]
    pub fn content_opf(&self, epub: &Epub) -> String {
        info!("正在生成content.opf");
        let mut content_opf = String::new();
        Self::opf_header(&mut content_opf);
        Self::opf_metadata(&mut content_opf, epub);
        Self::opf_manifest(&mut content_opf, epub);
        Self::opf_spine(&mut content_opf, epub);
        content_opf.push_str("\n</package>");
        content_opf
    }

    /// OEBPS/toc.ncx，兼容只认 EPUB 2 目录的阅读器
    #[instrument(skip_all)]
    pub fn toc_ncx(&self, epub: &Epub) -> String {
        info!("正在生成toc.ncx");
        let mut toc_ncx = String::new();

        toc_ncx.push_str(&format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<ncx version="2005-1" xmlns="http://www.daisy.org/z3986/2005/ncx/">
    <head>
        <meta name="dtb:uid" content="{}"/>
        <meta name="dtb:depth" content="1"/>
        <meta name="dtb:totalPageCount" content="0"/>
        <meta name="dtb:maxPageNumber" content="0"/>
    </head>
    <docTitle>
        <text>{}</text>
    </docTitle>
    <navMap>"#,
            encode_double_quoted_attribute(&epub.id),
            encode_text(&epub.title)
        ));

        for (i, chapter) in epub.chapters.iter().enumerate() {
            toc_ncx.push_str(&format!(
                r#"
        <navPoint id="navPoint{}" playOrder="{}">
            <navLabel>
                <text>{}</text>
            </navLabel>
            <content src="Text/{}"/>
        </navPoint>"#,
                i + 1,
                i + 1,
                encode_text(&chapter.title),
                chapter.filename
            ));
        }

        toc_ncx.push_str(
            r#"
    </navMap>
</ncx>"#,
        );
        toc_ncx
    }

    /// OEBPS/nav.xhtml，EPUB 3 导航文档
    #[instrument(skip_all)]
    pub fn nav_xhtml(&self, epub: &Epub) -> String {
        info!("正在生成nav.xhtml");
        let lang = encode_double_quoted_attribute(&epub.lang);
        let mut nav = format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE html>
<html xmlns="http://www.w3.org/1999/xhtml" xmlns:epub="http://www.idpf.org/2007/ops" lang="{}" xml:lang="{}">
<head>
    <title>{}</title>
</head>
<body>
    <nav epub:type="toc" id="toc">
        <h1>Table of Contents</h1>
        <ol>"#,
            lang,
            lang,
            encode_text(&epub.title)
        );

        for chapter in &epub.chapters {
            nav.push_str(&format!(
                r#"
            <li><a href="Text/{}">{}</a></li>"#,
                chapter.filename,
                encode_text(&chapter.title)
            ));
        }

        nav.push_str(
            r#"
        </ol>
    </nav>
</body>
</html>"#,
        );
        nav
    }
}

impl Metadata {
    fn opf_header(content_opf: &mut String) {
        content_opf.push_str(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<package version="3.0" xmlns="http://www.idpf.org/2007/opf" unique-identifier="BookId">"#,
        );
    }

    fn opf_metadata(content_opf: &mut String, epub: &Epub) {
        content_opf.push_str(&format!(
            r#"
    <metadata xmlns:dc="http://purl.org/dc/elements/1.1/">
        <dc:identifier id="BookId">{}</dc:identifier>
        <dc:title>{}</dc:title>
        <dc:language>{}</dc:language>
        <dc:creator id="creator">{}</dc:creator>
        <dc:date>{}</dc:date>
        <meta property="dcterms:modified">{}</meta>
        <meta name="generator" content="novel-fetch"/>
    </metadata>"#,
            encode_text(&epub.id),
            encode_text(&epub.title),
            encode_text(&epub.lang),
            encode_text(&epub.author),
            epub.modified.format("%Y-%m-%d"),
            epub.modified.format("%Y-%m-%dT%H:%M:%SZ"),
        ));
    }

    fn opf_manifest(content_opf: &mut String, epub: &Epub) {
        content_opf.push_str(
            r#"
    <manifest>
        <item id="ncx" href="toc.ncx" media-type="application/x-dtbncx+xml"/>
        <item id="nav" href="nav.xhtml" media-type="application/xhtml+xml" properties="nav"/>"#,
        );

        for chapter in &epub.chapters {
            content_opf.push_str(&format!(
                r#"
        <item id="{}" href="Text/{}" media-type="application/xhtml+xml"/>"#,
                Self::item_id(&chapter.filename),
                chapter.filename
            ));
        }
        content_opf.push_str(
            r#"
    </manifest>"#,
        );
    }

    fn opf_spine(content_opf: &mut String, epub: &Epub) {
        // 目录页排在所有章节之前
        content_opf.push_str(
            r#"
    <spine toc="ncx">
        <itemref idref="nav"/>"#,
        );

        for chapter in &epub.chapters {
            content_opf.push_str(&format!(
                r#"
        <itemref idref="{}"/>"#,
                Self::item_id(&chapter.filename)
            ));
        }

        content_opf.push_str(
            r#"
    </spine>"#,
        );
    }

    fn item_id(filename: &str) -> &str {
        filename.strip_suffix(".xhtml").unwrap_or(filename)
    }
}
