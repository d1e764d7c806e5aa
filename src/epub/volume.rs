use crate::epub::chapter::Chapter;

/// 章节列表中连续的一段，对应一个输出的 EPUB 文件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Volume {
    pub index: usize, // 从 1 开始
    pub chapters: Vec<Chapter>,
}

impl Volume {
    pub fn filename(&self, book_name: &str) -> String {
        format!("{}-volume-{}.epub", book_name, self.index)
    }
}

/// 按固定大小切分章节列表，最后一卷可能不足 `size` 章
///
/// `size` 为 0 时视为 1，避免死循环
pub fn partition(chapters: &[Chapter], size: usize) -> Vec<Volume> {
    chapters
        .chunks(size.max(1))
        .enumerate()
        .map(|(i, chunk)| Volume {
            index: i + 1,
            chapters: chunk.to_vec(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use url::Url;

    use super::*;

    fn chapters(n: usize) -> Vec<Chapter> {
        (1..=n)
            .map(|i| Chapter {
                number: i.to_string(),
                title: format!("Title {}", i),
                url: Url::parse(&format!("https://example.com/c/{}", i)).unwrap(),
            })
            .collect()
    }

    #[test]
    fn volume_count_is_ceiling() {
        for (len, size, expected) in [(25, 10, 3), (20, 10, 2), (1, 100, 1), (7, 1, 7), (0, 5, 0)] {
            assert_eq!(partition(&chapters(len), size).len(), expected, "len={len} size={size}");
        }
    }

    #[test]
    fn volumes_tile_the_list_in_order() {
        let list = chapters(25);
        let volumes = partition(&list, 10);

        let lengths: Vec<usize> = volumes.iter().map(|v| v.chapters.len()).collect();
        assert_eq!(lengths, vec![10, 10, 5]);

        let indices: Vec<usize> = volumes.iter().map(|v| v.index).collect();
        assert_eq!(indices, vec![1, 2, 3]);

        let joined: Vec<Chapter> = volumes.into_iter().flat_map(|v| v.chapters).collect();
        assert_eq!(joined, list);
    }

    #[test]
    fn duplicate_labels_are_kept() {
        let mut list = chapters(3);
        list[2].number = "1".to_owned();
        let volumes = partition(&list, 2);
        assert_eq!(volumes[1].chapters[0].number, "1");
    }

    #[test]
    fn filename_uses_book_and_index() {
        let volume = Volume {
            index: 3,
            chapters: Vec::new(),
        };
        assert_eq!(volume.filename("sample-novel"), "sample-novel-volume-3.epub");
    }
}
