//! End-to-end build tests over a temporary site

use std::fs;
use std::path::Path;

use inkpress::content::{DocumentIndex, DocumentLoader};
use inkpress::Site;

fn write_post(base: &Path, name: &str, content: &str) {
    let posts = base.join("source/_posts");
    fs::create_dir_all(&posts).unwrap();
    fs::write(posts.join(name), content).unwrap();
}

fn site_with_two_posts() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("_config.yml"),
        "title: Test Blog\nurl: https://blog.test\n",
    )
    .unwrap();
    write_post(
        dir.path(),
        "2020-09-20-older-post.md",
        "---\nlayout: post\ntitle: Older Post\ncategories: dropwizard kotlin\n---\nOlder body.\n",
    );
    write_post(
        dir.path(),
        "2020-10-09-newer-post.md",
        "---\nlayout: post\ntitle: Newer Post\ncategories: dropwizard\n---\nNewer body.\n",
    );
    dir
}

#[test]
fn build_emits_document_pages_and_index() {
    let dir = site_with_two_posts();
    let site = Site::new(dir.path()).unwrap();
    site.build().unwrap();

    let public = dir.path().join("public");
    assert!(public.join("2020/09/20/older-post/index.html").exists());
    assert!(public.join("2020/10/09/newer-post/index.html").exists());
    assert!(public.join("atom.xml").exists());
    assert!(public.join("search.json").exists());

    let index = fs::read_to_string(public.join("index.html")).unwrap();
    let newer = index.find("Newer Post").unwrap();
    let older = index.find("Older Post").unwrap();
    assert!(newer < older, "index must list newest document first");
}

#[test]
fn build_emits_category_pages() {
    let dir = site_with_two_posts();
    let site = Site::new(dir.path()).unwrap();
    site.build().unwrap();

    let public = dir.path().join("public");
    let dropwizard = fs::read_to_string(public.join("categories/dropwizard/index.html")).unwrap();
    assert!(dropwizard.contains("Older Post"));
    assert!(dropwizard.contains("Newer Post"));

    let kotlin = fs::read_to_string(public.join("categories/kotlin/index.html")).unwrap();
    assert!(kotlin.contains("Older Post"));
    assert!(!kotlin.contains("Newer Post"));

    let overview = fs::read_to_string(public.join("categories/index.html")).unwrap();
    assert!(overview.contains("dropwizard"));
    assert!(overview.contains("kotlin"));
}

#[test]
fn rebuild_is_byte_identical() {
    let dir = site_with_two_posts();
    let site = Site::new(dir.path()).unwrap();

    site.build().unwrap();
    let first = fs::read(dir.path().join("public/index.html")).unwrap();
    let first_feed = fs::read(dir.path().join("public/atom.xml")).unwrap();

    site.build().unwrap();
    let second = fs::read(dir.path().join("public/index.html")).unwrap();
    let second_feed = fs::read(dir.path().join("public/atom.xml")).unwrap();

    assert_eq!(first, second);
    assert_eq!(first_feed, second_feed);
}

#[test]
fn malformed_document_fails_build_but_good_documents_emit() {
    let dir = site_with_two_posts();
    write_post(
        dir.path(),
        "2020-11-01-broken.md",
        "---\ndate: not-a-date\n---\nBroken body.\n",
    );

    let site = Site::new(dir.path()).unwrap();
    let result = site.build();
    assert!(result.is_err(), "a malformed document must fail the build");

    let public = dir.path().join("public");
    assert!(
        public.join("2020/10/09/newer-post/index.html").exists(),
        "valid documents are still emitted"
    );
    assert!(
        !public.join("2020/11/01/broken/index.html").exists(),
        "no output for the malformed document"
    );
}

#[test]
fn loader_reports_parse_error_with_offending_file() {
    let dir = tempfile::tempdir().unwrap();
    write_post(
        dir.path(),
        "2021-01-01-good.md",
        "---\ntitle: Good\n---\nfine\n",
    );
    write_post(dir.path(), "2021-01-02-no-title.md", "---\ndate: 2021-01-02\n---\nbody\n");

    let site = Site::new(dir.path()).unwrap();
    let loader = DocumentLoader::new(&site);
    let (documents, errors) = loader.load_all();

    assert_eq!(documents.len(), 1);
    assert_eq!(documents[0].title, "Good");
    assert_eq!(errors.len(), 1);
    let message = errors[0].to_string();
    assert!(message.contains("2021-01-02-no-title.md"));
    assert!(message.contains("title"));
}

#[test]
fn duplicate_identifier_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    write_post(
        dir.path(),
        "2021-09-01-shared.md",
        "---\ntitle: First\n---\nbody\n",
    );
    let notes = dir.path().join("source/notes");
    fs::create_dir_all(&notes).unwrap();
    fs::write(
        notes.join("2021-09-01-shared.md"),
        "---\ntitle: Second\n---\nbody\n",
    )
    .unwrap();

    let site = Site::new(dir.path()).unwrap();
    let (documents, errors) = DocumentLoader::new(&site).load_all();

    assert_eq!(documents.len(), 1, "one document per identifier");
    assert_eq!(errors.len(), 1);
    let message = errors[0].to_string();
    assert!(message.contains("duplicate"));
    assert!(message.contains("2021-09-01-shared"));
    assert!(
        message.contains("notes"),
        "the later file is the one reported"
    );
}

#[test]
fn atom_feed_survives_cdata_terminator_in_body() {
    let dir = tempfile::tempdir().unwrap();
    // A raw HTML block passes through markdown untouched, so the literal
    // terminator lands in the rendered body.
    write_post(
        dir.path(),
        "2021-10-01-xml-sample.md",
        "---\ntitle: XML Sample\n---\n<div>\na section ends with ]]> in XML\n</div>\n",
    );

    let site = Site::new(dir.path()).unwrap();
    site.build().unwrap();

    let feed = fs::read_to_string(dir.path().join("public/atom.xml")).unwrap();
    let inner = feed
        .split("<![CDATA[")
        .nth(1)
        .expect("feed has a content section");
    let first_section = inner.split("]]>").next().unwrap();
    assert!(
        !first_section.contains("]]>"),
        "no raw terminator inside a CDATA section"
    );
    assert!(feed.contains("]]]]><![CDATA[>"), "terminator is split");
}

#[test]
fn filename_date_is_fallback_frontmatter_wins() {
    let dir = tempfile::tempdir().unwrap();
    write_post(
        dir.path(),
        "2021-03-01-filename-dated.md",
        "---\ntitle: From Filename\n---\nbody\n",
    );
    write_post(
        dir.path(),
        "2021-03-02-frontmatter-dated.md",
        "---\ntitle: From Front Matter\ndate: 2021-06-15\n---\nbody\n",
    );

    let site = Site::new(dir.path()).unwrap();
    let (documents, errors) = DocumentLoader::new(&site).load_all();
    assert!(errors.is_empty());

    let index = DocumentIndex::build(documents);
    let docs = index.documents();
    assert_eq!(docs[0].title, "From Front Matter");
    assert_eq!(docs[0].date.format("%Y-%m-%d").to_string(), "2021-06-15");
    assert_eq!(docs[1].date.format("%Y-%m-%d").to_string(), "2021-03-01");
}

#[test]
fn drafts_are_skipped_unless_configured() {
    let dir = tempfile::tempdir().unwrap();
    write_post(
        dir.path(),
        "2021-05-01-published.md",
        "---\ntitle: Published\n---\nbody\n",
    );
    write_post(
        dir.path(),
        "2021-05-02-hidden.md",
        "---\ntitle: Hidden\npublished: false\n---\nbody\n",
    );

    let site = Site::new(dir.path()).unwrap();
    let (documents, _) = DocumentLoader::new(&site).load_all();
    assert_eq!(documents.len(), 1);
    assert_eq!(documents[0].title, "Published");

    let mut drafty = Site::new(dir.path()).unwrap();
    drafty.config.render_drafts = true;
    let (documents, _) = DocumentLoader::new(&drafty).load_all();
    assert_eq!(documents.len(), 2);
}

#[test]
fn assets_are_copied_verbatim() {
    let dir = site_with_two_posts();
    let css_dir = dir.path().join("source/css");
    fs::create_dir_all(&css_dir).unwrap();
    fs::write(css_dir.join("main.css"), "body { margin: 0; }").unwrap();

    let site = Site::new(dir.path()).unwrap();
    site.build().unwrap();

    let copied = fs::read_to_string(dir.path().join("public/css/main.css")).unwrap();
    assert_eq!(copied, "body { margin: 0; }");
}

#[test]
fn layout_override_from_layouts_dir() {
    let dir = site_with_two_posts();
    let layouts = dir.path().join("_layouts");
    fs::create_dir_all(&layouts).unwrap();
    fs::write(
        layouts.join("post.html"),
        "<article data-custom>{{ page.content }}</article>",
    )
    .unwrap();

    let site = Site::new(dir.path()).unwrap();
    site.build().unwrap();

    let page = fs::read_to_string(
        dir.path()
            .join("public/2020/10/09/newer-post/index.html"),
    )
    .unwrap();
    assert!(page.contains("data-custom"));
    assert!(page.contains("Newer body."));
}

#[test]
fn unknown_layout_fails_the_build() {
    let dir = tempfile::tempdir().unwrap();
    write_post(
        dir.path(),
        "2021-07-01-strange.md",
        "---\ntitle: Strange\nlayout: does-not-exist\n---\nbody\n",
    );

    let site = Site::new(dir.path()).unwrap();
    assert!(site.build().is_err());
}

#[test]
fn clean_removes_output_dir() {
    let dir = site_with_two_posts();
    let site = Site::new(dir.path()).unwrap();
    site.build().unwrap();
    assert!(dir.path().join("public").exists());

    site.clean().unwrap();
    assert!(!dir.path().join("public").exists());
}
