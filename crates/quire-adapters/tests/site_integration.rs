//! End-to-end tests wiring the real adapters into the core services.

use std::{fs, path::Path, sync::Arc};

use quire_adapters::{
    HighlightingRenderer, LocalContent, LocalFilesystem, LocalTheme, MemoryFilesystem,
    MemoryRepository, MemoryTheme, OverlayTheme, RouteTable, SqliteRepository, TeraLayoutRenderer,
    layout::DEFAULT_MAX_DEPTH, load_site_data, markdown::DEFAULT_THEME,
};
use quire_core::{
    application::ports::Filesystem,
    prelude::*,
};
use tempfile::TempDir;

// ── Fixtures ─────────────────────────────────────────────────────────────────

struct Site {
    _temp: TempDir,
    root: std::path::PathBuf,
    repository: Arc<dyn ArticleRepository>,
    theme: Arc<dyn ThemeSource>,
    pages: Arc<PageService>,
    index: IndexService,
}

fn write(root: &Path, rel: &str, text: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, text).unwrap();
}

fn site() -> Site {
    site_with(Arc::new(SqliteRepository::in_memory().unwrap()))
}

fn site_with(repository: Arc<dyn ArticleRepository>) -> Site {
    let temp = TempDir::new().unwrap();
    let root = temp.path().to_path_buf();

    write(
        &root,
        "content/hello-world.md",
        "---\ntitle: Hello World\ndescription: First post\ndate: 2024-03-01\n---\n\
         # Hello\n\n```rust\nfn main() {\n\tprintln!(\"hi\");\n}\n```\n",
    );
    write(
        &root,
        "content/notes/second.md",
        "---\ntitle: Second Thoughts\ndate: 2024-05-10\n---\nMore words about rust.\n",
    );
    write(&root, "content/README.txt", "not markdown");
    write(
        &root,
        "data/meta.yml",
        "title: Test Notes\nurl: https://notes.example/\ndescription: A test site\n",
    );
    write(&root, "theme/pages/about.html", "<p>About {{ meta.title }}</p>");
    write(&root, "theme/pages/docs/index.html", "<p>Docs {{ meta.title }}</p>");
    write(&root, "theme/pages/docs/guide/intro.html", "<p>Intro {{ meta.title }}</p>");

    let site_data = Arc::new(load_site_data(&root.join("data")).unwrap());
    repository.init_schema().unwrap();

    let theme: Arc<dyn ThemeSource> = Arc::new(OverlayTheme::new(
        Some(Arc::new(LocalTheme::new(root.join("theme")))),
        Some(Arc::new(MemoryTheme::builtin())),
    ));
    let layouts = Arc::new(TeraLayoutRenderer::new(
        theme.clone(),
        site_data.clone(),
        "html",
        DEFAULT_MAX_DEPTH,
    ));
    let markdown = Arc::new(HighlightingRenderer::new(DEFAULT_THEME).unwrap());

    let pages = Arc::new(PageService::new(
        repository.clone(),
        layouts,
        markdown,
        site_data,
        SiteOptions::default(),
    ));
    let index = IndexService::new(
        Arc::new(LocalContent::new(root.join("content"))),
        repository.clone(),
    );

    Site {
        _temp: temp,
        root,
        repository,
        theme,
        pages,
        index,
    }
}

// ── Static generation ────────────────────────────────────────────────────────

#[test]
fn generates_a_complete_site() {
    let site = site();
    let cancel = Cancellation::new();

    let scan = site.index.scan(&cancel).unwrap();
    assert_eq!(scan.scanned, 2);
    assert_eq!(scan.total, 2);

    let output = site.root.join("public");
    let generator = GeneratorService::new(
        site.pages.clone(),
        site.theme.clone(),
        Box::new(LocalFilesystem::new()),
    );
    let report = generator.generate(&output, &cancel).unwrap();

    assert_eq!(report.articles, 2);
    // home, 404, blog/index, about, docs/index, docs/guide/intro
    assert_eq!(report.pages, 6);
    assert!(report.assets >= 2);
    assert_eq!(report.output, output);

    for file in [
        "index.html",
        "blog/index.html",
        "blog/hello-world/index.html",
        "blog/second/index.html",
        "feed.xml",
        "404.html",
        "about.html",
        "docs/index.html",
        "docs/guide/intro.html",
        "assets/css/site.css",
        "assets/robots.txt",
    ] {
        assert!(output.join(file).is_file(), "missing {file}");
    }
    assert!(!site.root.join(".public.partial").exists());

    let post = fs::read_to_string(output.join("blog/hello-world/index.html")).unwrap();
    assert!(post.contains("<h1>Hello World</h1>"));
    assert!(post.contains("chroma language-rust"));
    assert!(post.contains("2024/03/01 00:00"));

    let about = fs::read_to_string(output.join("about.html")).unwrap();
    assert!(about.contains("<p>About Test Notes</p>"));

    let docs = fs::read_to_string(output.join("docs/index.html")).unwrap();
    assert!(docs.contains("<p>Docs Test Notes</p>"));
    let intro = fs::read_to_string(output.join("docs/guide/intro.html")).unwrap();
    assert!(intro.contains("<p>Intro Test Notes</p>"));
    assert!(!output.join("docs/index/index.html").exists());

    let feed = fs::read_to_string(output.join("feed.xml")).unwrap();
    assert!(feed.contains("https://notes.example/blog/hello-world/"));
}

#[test]
fn regeneration_replaces_previous_output() {
    let site = site();
    let cancel = Cancellation::new();
    site.index.scan(&cancel).unwrap();

    let output = site.root.join("public");
    write(&output, "stale.html", "old");

    let generator = GeneratorService::new(
        site.pages.clone(),
        site.theme.clone(),
        Box::new(LocalFilesystem::new()),
    );
    generator.generate(&output, &cancel).unwrap();

    assert!(!output.join("stale.html").exists());
    assert!(output.join("index.html").is_file());
}

#[test]
fn failed_generation_keeps_previous_site() {
    let site = site();
    let cancel = Cancellation::new();
    site.index.scan(&cancel).unwrap();

    let memory = MemoryFilesystem::new();
    let output = Path::new("/srv/public");
    let generator = GeneratorService::new(
        site.pages.clone(),
        site.theme.clone(),
        Box::new(memory.clone()),
    );

    generator.generate(output, &cancel).unwrap();
    let before = memory.list_files();
    assert!(before.contains(&output.join("index.html")));

    memory.fail_writes_under("/srv/.public.partial/blog");
    let err = generator.generate(output, &cancel).unwrap_err();
    assert!(err.to_string().contains("injected write failure"));

    assert_eq!(memory.list_files(), before);
    assert!(!memory.exists(Path::new("/srv/.public.partial")));
}

#[test]
fn cancelled_generation_writes_nothing() {
    let site = site();
    let cancel = Cancellation::new();
    site.index.scan(&cancel).unwrap();

    let memory = MemoryFilesystem::new();
    let generator = GeneratorService::new(
        site.pages.clone(),
        site.theme.clone(),
        Box::new(memory.clone()),
    );

    cancel.cancel();
    let err = generator.generate(Path::new("/out/site"), &cancel).unwrap_err();
    assert!(err.is_cancelled());
    assert!(memory.list_files().is_empty());
}

// ── Module mode ──────────────────────────────────────────────────────────────

fn mounted(site: &Site) -> (BlogModule, RouteTable) {
    let handlers = BlogHandlers::new(site.pages.clone(), site.repository.clone(), site.theme.clone());
    let index = IndexService::new(
        Arc::new(LocalContent::new(site.root.join("content"))),
        site.repository.clone(),
    );
    let module = BlogModule::new(site.repository.clone(), index, handlers);

    let mut routes = RouteTable::new();
    module.mount(&mut routes).unwrap();
    module.start(&Cancellation::new()).unwrap();
    (module, routes)
}

fn backends() -> [Site; 2] {
    [site(), site_with(Arc::new(MemoryRepository::new()))]
}

#[test]
fn serves_json_endpoints() {
    for site in backends() {
        json_endpoints(&site);
    }
}

fn json_endpoints(site: &Site) {
    let (module, routes) = mounted(site);
    let cancel = Cancellation::new();

    let list = routes.request("/api/blog/articles", &cancel);
    assert_eq!(list.status, 200);
    assert_eq!(list.cache_control.as_deref(), Some("public, max-age=300"));
    let body: serde_json::Value = serde_json::from_slice(&list.body).unwrap();
    assert_eq!(body["total"], 2);
    assert_eq!(body["pageSize"], 2);
    assert_eq!(body["articles"][0]["slug"], "second");

    let one = routes.request("/api/blog/articles/hello-world", &cancel);
    assert_eq!(one.status, 200);
    assert_eq!(one.cache_control.as_deref(), Some("public, max-age=3600"));

    let search = routes.request("/api/blog/search?q=THOUGHTS", &cancel);
    let body: serde_json::Value = serde_json::from_slice(&search.body).unwrap();
    assert_eq!(body["query"], "THOUGHTS");
    assert_eq!(body["total"], 1);
    assert_eq!(body["articles"][0]["slug"], "second");

    assert_eq!(routes.request("/api/blog/search?q=+", &cancel).status, 400);
    assert_eq!(routes.request("/api/blog/articles/missing", &cancel).status, 404);

    module.stop().unwrap();
}

#[test]
fn serves_html_feed_and_assets() {
    for site in backends() {
        html_feed_and_assets(&site);
    }
}

fn html_feed_and_assets(site: &Site) {
    let (_module, routes) = mounted(site);
    let cancel = Cancellation::new();

    let home = routes.request("/", &cancel);
    assert_eq!(home.status, 200);
    assert!(home.content_type.starts_with("text/html"));
    assert!(home.body_text().contains("Second Thoughts"));

    for path in ["/blog/second", "/blog/second/"] {
        let post = routes.request(path, &cancel);
        assert_eq!(post.status, 200, "{path}");
        assert!(post.body_text().contains("More words about rust."));
    }

    let feed = routes.request("/feed.xml", &cancel);
    assert_eq!(feed.content_type, "application/xml");
    assert!(feed.body_text().starts_with("<?xml"));

    let css = routes.request("/assets/css/site.css", &cancel);
    assert_eq!(css.status, 200);
    assert_eq!(css.content_type, "text/css; charset=utf-8");

    assert_eq!(routes.request("/assets/missing.css", &cancel).status, 404);
    assert_eq!(routes.request("/blog/nope/", &cancel).status, 404);
}

#[test]
fn cancelled_request_is_unavailable() {
    let site = site();
    let (_module, routes) = mounted(&site);

    let cancel = Cancellation::new();
    cancel.cancel();
    assert_eq!(routes.request("/api/blog/articles", &cancel).status, 503);
}
