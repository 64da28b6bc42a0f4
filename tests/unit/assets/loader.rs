use std::collections::HashMap;
use std::io::Cursor;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use super::*;

fn png_1x1() -> Vec<u8> {
    let img = image::RgbaImage::from_raw(1, 1, vec![200u8, 30, 30, 255]).unwrap();
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[derive(Default)]
struct CountingSource {
    files: HashMap<String, Vec<u8>>,
    delay_ms: u64,
    fetches: Mutex<HashMap<String, usize>>,
    total: AtomicUsize,
}

impl CountingSource {
    fn fetches_of(&self, url: &str) -> usize {
        self.fetches.lock().unwrap().get(url).copied().unwrap_or(0)
    }
}

#[async_trait]
impl AssetSource for CountingSource {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, LoadError> {
        self.total.fetch_add(1, Ordering::SeqCst);
        *self
            .fetches
            .lock()
            .unwrap()
            .entry(url.to_string())
            .or_default() += 1;
        if self.delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
        }
        self.files.get(url).cloned().ok_or_else(|| LoadError::Fetch {
            url: url.to_string(),
            reason: "404".to_string(),
        })
    }
}

fn loader_with(source: CountingSource) -> (AssetLoader, Arc<CountingSource>) {
    let source = Arc::new(source);
    let loader = AssetLoader::new(
        source.clone(),
        Arc::new(AssetCache::new()),
        AssetUrls::default(),
    );
    (loader, source)
}

#[tokio::test]
async fn load_image_decodes_png() {
    let mut files = HashMap::new();
    files.insert("/g.png".to_string(), png_1x1());
    let (loader, _) = loader_with(CountingSource {
        files,
        ..Default::default()
    });
    let img = loader.load("/g.png").await.unwrap();
    assert_eq!((img.width, img.height), (1, 1));
}

#[tokio::test]
async fn missing_asset_is_fetch_error() {
    let (loader, _) = loader_with(CountingSource::default());
    let err = loader.load("/x.png").await.unwrap_err();
    assert!(matches!(err, LoadError::Fetch { .. }));
}

#[tokio::test]
async fn undecodable_asset_is_decode_error() {
    let mut files = HashMap::new();
    files.insert("/bad.png".to_string(), b"nope".to_vec());
    let (loader, _) = loader_with(CountingSource {
        files,
        ..Default::default()
    });
    let err = loader.load("/bad.png").await.unwrap_err();
    assert!(matches!(err, LoadError::Decode { .. }));
}

#[tokio::test]
async fn slow_fetch_times_out() {
    let mut files = HashMap::new();
    files.insert("/slow.png".to_string(), png_1x1());
    let (loader, _) = loader_with(CountingSource {
        files,
        delay_ms: 500,
        ..Default::default()
    });
    let err = loader.load_image("/slow.png", 10).await.unwrap_err();
    assert_eq!(
        err,
        LoadError::Timeout {
            url: "/slow.png".to_string(),
            timeout_ms: 10
        }
    );
}

#[tokio::test]
async fn memoized_loaders_fetch_once_under_concurrency() {
    let urls = AssetUrls::default();
    let mut files = HashMap::new();
    files.insert(urls.brand_logo.clone(), png_1x1());
    files.insert(urls.lantern_palace.clone(), png_1x1());
    let (loader, source) = loader_with(CountingSource {
        files,
        delay_ms: 25,
        ..Default::default()
    });

    let logos = futures::future::join_all((0..8).map(|_| loader.brand_logo())).await;
    let lanterns =
        futures::future::join_all((0..8).map(|_| loader.lantern(LanternKind::Palace))).await;
    let rabbits =
        futures::future::join_all((0..4).map(|_| loader.lantern(LanternKind::Rabbit))).await;

    assert!(logos.iter().all(|r| r.is_ok()));
    assert!(lanterns.iter().all(|r| r.is_ok()));
    assert!(rabbits.iter().all(|r| r.is_err()));
    assert_eq!(source.fetches_of(&urls.brand_logo), 1);
    assert_eq!(source.fetches_of(&urls.lantern_palace), 1);
    assert_eq!(source.fetches_of(&urls.lantern_rabbit), 1);
    assert_eq!(source.total.load(Ordering::SeqCst), 3);

    // Later callers reuse the memo without another fetch.
    loader.brand_logo().await.unwrap();
    assert_eq!(source.fetches_of(&urls.brand_logo), 1);
}

#[tokio::test]
async fn plain_loads_are_not_memoized() {
    let mut files = HashMap::new();
    files.insert("/g.png".to_string(), png_1x1());
    let (loader, source) = loader_with(CountingSource {
        files,
        ..Default::default()
    });
    loader.load("/g.png").await.unwrap();
    loader.load("/g.png").await.unwrap();
    assert_eq!(source.fetches_of("/g.png"), 2);
}
