//! Scaffold a new document

use anyhow::Result;
use std::fs;

use crate::Site;

/// Create a new dated document under source/_posts
pub fn run(site: &Site, title: &str) -> Result<()> {
    let now = chrono::Local::now().naive_local();
    let slug = slug::slugify(title);

    let filename = site
        .config
        .new_document_name
        .replace(":year", &now.format("%Y").to_string())
        .replace(":month", &now.format("%m").to_string())
        .replace(":day", &now.format("%d").to_string())
        .replace(":title", &slug);

    let target_dir = site.source_dir.join("_posts");
    fs::create_dir_all(&target_dir)?;

    let file_path = target_dir.join(&filename);
    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    let content = format!(
        "---\nlayout: post\ntitle: \"{}\"\ndate: {}\ncategories:\n---\n",
        title,
        now.format("%Y-%m-%d %H:%M:%S")
    );

    fs::write(&file_path, content)?;

    println!("Created: {:?}", file_path);

    Ok(())
}
