use anyhow::Result;
use reqwest::Client;
use tracing::{debug, instrument};
use url::Url;

/// 持有整个运行期间复用的 HTTP 会话
pub struct Downloader {
    client: Client,
    base_url: Url,
}

impl Downloader {
    pub fn new(base_url: Url, user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .cookie_store(true)
            .build()
            .map_err(|e| anyhow::anyhow!("HTTP客户端创建失败: {}", e))?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `{base}/book/{book_name}/chapters?page={page}`
    pub fn chapter_list_url(&self, book_name: &str, page: usize) -> Result<Url> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| anyhow::anyhow!("无效的基础地址: {}", self.base_url))?;
            segments.pop_if_empty().extend(["book", book_name, "chapters"]);
        }
        url.query_pairs_mut()
            .append_pair("page", &page.to_string());
        Ok(url)
    }

    #[instrument(skip(self))]
    pub async fn chapter_list(&self, book_name: &str, page: usize) -> Result<String> {
        let url = self.chapter_list_url(book_name, page)?;
        self.get(url).await
    }

    #[instrument(skip_all, fields(url = %url))]
    pub async fn chapter(&self, url: &Url) -> Result<String> {
        self.get(url.clone()).await
    }

    async fn get(&self, url: Url) -> Result<String> {
        debug!("GET {}", url);
        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn downloader(base: &str) -> Downloader {
        Downloader::new(Url::parse(base).unwrap(), "novel-fetch-test").unwrap()
    }

    #[test]
    fn builds_listing_url() {
        let url = downloader("https://novelfire.net")
            .chapter_list_url("sample-novel", 2)
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://novelfire.net/book/sample-novel/chapters?page=2"
        );
    }

    #[test]
    fn listing_url_keeps_base_path_and_encodes_name() {
        let url = downloader("http://localhost:8080/mirror/")
            .chapter_list_url("a b", 1)
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8080/mirror/book/a%20b/chapters?page=1"
        );
    }

    #[tokio::test]
    async fn sends_fixed_user_agent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/book/x/chapters"))
            .and(query_param("page", "1"))
            .and(header("user-agent", "novel-fetch-test"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .expect(1)
            .mount(&server)
            .await;

        let body = downloader(&server.uri()).chapter_list("x", 1).await.unwrap();
        assert_eq!(body, "ok");
    }

    #[tokio::test]
    async fn error_status_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let url = Url::parse(&format!("{}/chapter-1", server.uri())).unwrap();
        assert!(downloader(&server.uri()).chapter(&url).await.is_err());
    }
}
