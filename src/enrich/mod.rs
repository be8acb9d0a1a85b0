//! Display-only metadata derived from stored records at build time.
//!
//! Nothing here writes back to a collection file, and no failure escapes:
//! an unreachable page or an unrecognised video URL just leaves the field empty.

pub mod og;
pub mod youtube;

use std::sync::Arc;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::{mpsc, Semaphore};
use tracing::{info, warn};

use crate::config::DEFAULT_USER_AGENT;
use crate::model::{BlogPost, EnrichedBlogPost, EnrichedPresentation, Presentation};
pub use og::OgImageFetcher;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
/// Upper bound on in-flight requests regardless of configuration.
const MAX_CONCURRENCY: usize = 256;

/// One-off lookup with the default user agent and timeout.
pub async fn fetch_og_image(url: &str) -> Option<String> {
    match OgImageFetcher::new(DEFAULT_USER_AGENT, DEFAULT_TIMEOUT) {
        Ok(fetcher) => fetcher.fetch(url).await,
        Err(e) => {
            warn!("Failed to fetch OG image for {}: {}", url, e);
            None
        }
    }
}

pub fn youtube_video_id(url: &str) -> Option<String> {
    youtube::video_id(url)
}

pub fn youtube_thumbnail(url: &str) -> Option<String> {
    youtube::thumbnail(url)
}

/// Resolve every post's preview image concurrently, at most `concurrency`
/// requests in flight. Output order matches input order.
pub async fn enrich_blog_posts(
    posts: Vec<BlogPost>,
    fetcher: &OgImageFetcher,
    concurrency: usize,
) -> Vec<EnrichedBlogPost> {
    let concurrency = concurrency.clamp(1, MAX_CONCURRENCY);
    let semaphore = Arc::new(Semaphore::new(concurrency));
    let total = posts.len();

    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} ({per_sec}, eta {eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> "),
    );

    // Workers send (input index, image); the receiver puts each in its slot.
    let (tx, mut rx) = mpsc::channel::<(usize, Option<String>)>(concurrency * 2);

    for (idx, post) in posts.iter().enumerate() {
        let fetcher = fetcher.clone();
        let sem = Arc::clone(&semaphore);
        let tx = tx.clone();
        let url = post.url.clone();

        tokio::spawn(async move {
            let image = match sem.acquire().await {
                Ok(_permit) => fetcher.fetch(&url).await,
                Err(_) => None,
            };
            let _ = tx.send((idx, image)).await;
        });
    }

    // Drop our copy of tx so rx closes when all spawned tasks finish
    drop(tx);

    let mut images: Vec<Option<String>> = vec![None; total];
    while let Some((idx, image)) = rx.recv().await {
        images[idx] = image;
        pb.inc(1);
    }
    pb.finish_and_clear();

    let found = images.iter().filter(|i| i.is_some()).count();
    info!("Resolved {} of {} preview images", found, total);

    posts
        .into_iter()
        .zip(images)
        .map(|(post, image)| EnrichedBlogPost { post, image })
        .collect()
}

/// Attach a YouTube thumbnail to every presentation that has a video.
pub fn enrich_presentations(presentations: Vec<Presentation>) -> Vec<EnrichedPresentation> {
    presentations
        .into_iter()
        .map(|presentation| {
            let thumbnail = presentation.video.as_deref().and_then(youtube::thumbnail);
            EnrichedPresentation {
                presentation,
                thumbnail,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::net::SocketAddr;

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use super::*;

    /// Canned page served by the stub: status, body, delay before replying.
    struct Page {
        status: u16,
        body: &'static str,
        delay_ms: u64,
    }

    /// Minimal HTTP/1.1 server answering one request per connection by path.
    async fn serve(pages: HashMap<&'static str, Page>) -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let pages = Arc::new(pages);

        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    return;
                };
                let pages = Arc::clone(&pages);
                tokio::spawn(async move {
                    let mut buf = vec![0u8; 4096];
                    let n = socket.read(&mut buf).await.unwrap_or(0);
                    let request = String::from_utf8_lossy(&buf[..n]);
                    let path = request.split_whitespace().nth(1).unwrap_or("/").to_string();

                    let (status, body, delay_ms) = match pages.get(path.as_str()) {
                        Some(p) => (p.status, p.body, p.delay_ms),
                        None => (404, "not found", 0),
                    };
                    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                    let reply = format!(
                        "HTTP/1.1 {} X\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                        status,
                        body.len(),
                        body
                    );
                    let _ = socket.write_all(reply.as_bytes()).await;
                    let _ = socket.shutdown().await;
                });
            }
        });

        addr
    }

    fn og_page(image: &'static str) -> &'static str {
        match image {
            "a" => r#"<meta property="og:image" content="https://img.example/a.png">"#,
            "b" => r#"<meta property="og:image" content="https://img.example/b.png">"#,
            _ => r#"<meta name="twitter:image" content="https://img.example/c.png">"#,
        }
    }

    fn post(url: String) -> BlogPost {
        BlogPost {
            title: "t".into(),
            description: "d".into(),
            date: "2024-01".into(),
            url,
        }
    }

    fn fetcher_with_timeout(timeout: Duration) -> OgImageFetcher {
        let client = reqwest::Client::builder()
            .user_agent(DEFAULT_USER_AGENT)
            .timeout(timeout)
            .no_proxy()
            .build()
            .unwrap();
        OgImageFetcher::with_client(client)
    }

    fn fetcher() -> OgImageFetcher {
        fetcher_with_timeout(Duration::from_secs(5))
    }

    #[tokio::test]
    async fn fetch_reads_og_image() {
        let addr = serve(HashMap::from([(
            "/post",
            Page { status: 200, body: og_page("a"), delay_ms: 0 },
        )]))
        .await;
        let image = fetcher().fetch(&format!("http://{addr}/post")).await;
        assert_eq!(image.as_deref(), Some("https://img.example/a.png"));
    }

    #[tokio::test]
    async fn not_found_is_none() {
        let addr = serve(HashMap::new()).await;
        assert_eq!(fetcher().fetch(&format!("http://{addr}/missing")).await, None);
    }

    #[tokio::test]
    async fn connection_failure_is_none() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        assert_eq!(fetch_og_image(&format!("http://{addr}/")).await, None);
    }

    #[tokio::test]
    async fn slow_page_times_out_to_none() {
        let addr = serve(HashMap::from([(
            "/slow",
            Page { status: 200, body: og_page("a"), delay_ms: 2_000 },
        )]))
        .await;
        let quick = fetcher_with_timeout(Duration::from_millis(200));
        assert_eq!(quick.fetch(&format!("http://{addr}/slow")).await, None);
    }

    #[tokio::test]
    async fn batch_preserves_input_order() {
        let addr = serve(HashMap::from([
            ("/a", Page { status: 200, body: og_page("a"), delay_ms: 300 }),
            ("/b", Page { status: 200, body: og_page("b"), delay_ms: 0 }),
            ("/c", Page { status: 200, body: og_page("c"), delay_ms: 100 }),
        ]))
        .await;
        let posts = vec![
            post(format!("http://{addr}/a")),
            post(format!("http://{addr}/b")),
            post(format!("http://{addr}/c")),
        ];

        let enriched = enrich_blog_posts(posts.clone(), &fetcher(), 3).await;

        assert_eq!(enriched.len(), 3);
        for (e, p) in enriched.iter().zip(&posts) {
            assert_eq!(e.post, *p);
        }
        assert_eq!(enriched[0].image.as_deref(), Some("https://img.example/a.png"));
        assert_eq!(enriched[1].image.as_deref(), Some("https://img.example/b.png"));
        assert_eq!(enriched[2].image.as_deref(), Some("https://img.example/c.png"));
    }

    #[tokio::test]
    async fn batch_isolates_failures() {
        let addr = serve(HashMap::from([(
            "/ok",
            Page { status: 200, body: og_page("b"), delay_ms: 0 },
        )]))
        .await;
        let posts = vec![
            post(format!("http://{addr}/gone")),
            post(format!("http://{addr}/ok")),
            post("not a url".into()),
        ];

        let enriched = enrich_blog_posts(posts, &fetcher(), 1).await;

        let images: Vec<Option<&str>> = enriched.iter().map(|e| e.image.as_deref()).collect();
        assert_eq!(images, [None, Some("https://img.example/b.png"), None]);
    }

    #[tokio::test]
    async fn oversized_concurrency_is_clamped() {
        let addr = serve(HashMap::from([(
            "/ok",
            Page { status: 200, body: og_page("b"), delay_ms: 0 },
        )]))
        .await;
        let posts = vec![post(format!("http://{addr}/ok")), post(format!("http://{addr}/ok"))];

        let enriched = enrich_blog_posts(posts, &fetcher(), usize::MAX).await;

        assert_eq!(enriched.len(), 2);
        assert!(enriched.iter().all(|e| e.image.as_deref() == Some("https://img.example/b.png")));
    }

    #[tokio::test]
    async fn empty_batch() {
        assert!(enrich_blog_posts(Vec::new(), &fetcher(), 4).await.is_empty());
    }

    #[test]
    fn thumbnails_only_for_youtube_videos() {
        let talk = |video: Option<&str>| Presentation {
            title: "t".into(),
            event: "e".into(),
            date: "2024-05-01".into(),
            description: None,
            slides: None,
            video: video.map(str::to_string),
            slide_pdf: None,
        };
        let enriched = enrich_presentations(vec![
            talk(Some("https://www.youtube.com/watch?v=dQw4w9WgXcQ")),
            talk(None),
            talk(Some("https://vimeo.com/1")),
        ]);
        assert_eq!(
            enriched[0].thumbnail.as_deref(),
            Some("https://img.youtube.com/vi/dQw4w9WgXcQ/hqdefault.jpg")
        );
        assert_eq!(enriched[1].thumbnail, None);
        assert_eq!(enriched[2].thumbnail, None);
    }
}
