// FILE: crates/cli/src/commands.rs

use anyhow::{bail, Context, Result};
use clap::ArgMatches;
use console::style;
use galleria_config::{
    Config, ConfigError, ConfigManager, ConfigSection, SlideshowConfig, StorageConfig,
};
use galleria_core::{parse_tag_list, Gallery, GalleryFilter, Manifest, UrlBuilder};
use galleria_storage::{
    B2Client, B2Settings, GalleryEdit, GalleryManager, LocalImage, NewGallery, UploadProgress,
};
use slideshow_engine::ControllerOptions;
use std::sync::Arc;
use std::time::Duration;

/// Loaded configuration shared by every command
pub struct AppContext {
    manager: ConfigManager,
    config: Config,
}

impl AppContext {
    pub fn new(manager: ConfigManager, config: Config) -> Self {
        Self { manager, config }
    }

    /// Client for read-only commands
    fn reader(&self) -> Result<B2Client> {
        self.config
            .storage
            .require_download_base()
            .context("Storage is not configured")?;
        B2Client::new(b2_settings(&self.config.storage)).context("Failed to create storage client")
    }

    /// Client for commands that write to the bucket
    fn writer(&self) -> Result<B2Client> {
        self.config
            .storage
            .require_credentials()
            .context("Storage credentials are not configured")?;
        B2Client::new(b2_settings(&self.config.storage)).context("Failed to create storage client")
    }

    async fn load_manifest(&self) -> Result<(Manifest, UrlBuilder)> {
        let client = self.reader()?;
        let manifest = client
            .read_galleries()
            .await
            .context("Failed to read gallery manifest")?;
        let urls = client
            .download_base()
            .await
            .context("Failed to resolve download URL")?;
        Ok((manifest, urls))
    }
}

fn b2_settings(storage: &StorageConfig) -> B2Settings {
    B2Settings {
        key_id: storage.key_id.clone(),
        application_key: storage.application_key.clone(),
        bucket_id: storage.bucket_id.clone(),
        bucket_name: storage.bucket_name.clone(),
        api_url: storage.api_url.clone(),
        download_base_url: Some(storage.download_base_url.clone())
            .filter(|base| !base.trim().is_empty()),
        manifest_name: storage.manifest_name.clone(),
        timeout: Duration::from_secs(storage.request_timeout_secs),
    }
}

/// Collects a repeatable label option, splitting comma separated values
fn collect_labels(matches: &ArgMatches, id: &str) -> Option<Vec<String>> {
    matches.get_many::<String>(id).map(|values| {
        values
            .flat_map(|value| parse_tag_list(value))
            .collect()
    })
}

/// List galleries matching the character/tag filter
pub async fn list_galleries(ctx: &AppContext, matches: &ArgMatches) -> Result<()> {
    let (manifest, urls) = ctx.load_manifest().await?;

    let mut filter = GalleryFilter::new();
    for character in collect_labels(matches, "character").unwrap_or_default() {
        filter = filter.with_character(character);
    }
    for tag in collect_labels(matches, "tag").unwrap_or_default() {
        filter = filter.with_tag(tag);
    }

    let galleries = manifest.filter(&filter);

    if matches.get_flag("json") {
        let json = serde_json::to_string_pretty(&galleries)
            .context("Failed to serialize to JSON")?;
        println!("{}", json);
        return Ok(());
    }

    if manifest.is_empty() {
        println!("No galleries yet. Use 'upload' to create one.");
        return Ok(());
    }

    if galleries.is_empty() {
        println!("No galleries match the current filter.");
        return Ok(());
    }

    println!(
        "\n{} of {} Galleries",
        style(galleries.len()).bold().cyan(),
        manifest.len()
    );
    println!("{}", "=".repeat(80));

    for gallery in galleries {
        print_gallery_card(gallery, &urls);
    }

    Ok(())
}

/// Show the character and tag vocabularies
pub async fn show_tags(ctx: &AppContext) -> Result<()> {
    let (manifest, _) = ctx.load_manifest().await?;
    let index = manifest.tag_index();

    if index.is_empty() {
        println!("No characters or tags in use.");
        return Ok(());
    }

    println!("\n{}", style("Characters").bold().cyan());
    println!("  {}", join_or_dash(&index.characters));
    println!("\n{}", style("Tags").bold().cyan());
    println!("  {}", join_or_dash(&index.tags));

    Ok(())
}

/// Show gallery statistics
pub async fn show_stats(ctx: &AppContext) -> Result<()> {
    let (manifest, _) = ctx.load_manifest().await?;
    let stats = manifest.stats();

    println!("\n{}", style("Library Statistics").bold().cyan());
    println!("{}", "=".repeat(80));
    println!("Total Galleries: {}", style(stats.total_galleries).bold());
    println!("Total Images: {}", style(stats.total_images).bold());
    println!("Average Images: {:.1}", stats.average_images());

    Ok(())
}

/// Show one gallery in detail
pub async fn show_gallery(ctx: &AppContext, matches: &ArgMatches) -> Result<()> {
    let id = required(matches, "id")?;
    let (manifest, urls) = ctx.load_manifest().await?;
    let gallery = manifest.get(id).context("Failed to get gallery")?;

    println!("\n{}", style("Gallery Information").bold().cyan());
    println!("{}", "=".repeat(80));
    println!("ID: {}", gallery.id);
    println!("Name: {}", style(&gallery.name).bold());
    println!("Folder: {}", gallery.folder_path);
    println!("Images: {}", gallery.file_count);
    println!("Characters: {}", join_or_dash(&gallery.character));
    println!("Tags: {}", join_or_dash(&gallery.tags));

    if !gallery.image_files.is_empty() {
        println!("\nImage URLs:");
        for (i, url) in gallery.image_urls(&urls).iter().enumerate() {
            println!("  {:>3}. {}", i + 1, url);
        }
    }

    Ok(())
}

/// Open a gallery in the terminal slideshow
pub async fn play_gallery(ctx: &AppContext, matches: &ArgMatches) -> Result<()> {
    let id = required(matches, "id")?;
    let start = matches.get_one::<usize>("start").copied().unwrap_or(1);
    let autoplay = matches.get_flag("autoplay");

    let (manifest, urls) = ctx.load_manifest().await?;
    let gallery = manifest.get(id).context("Failed to get gallery")?;
    let source = gallery.to_slideshow_source(&urls);

    if source.is_empty() {
        bail!("Gallery '{}' has no images", gallery.name);
    }

    let (options, frame_interval) = playback_settings(&ctx.config.slideshow)?;

    println!("\n{} {}", style("▶").green().bold(), style(&gallery.name).bold());

    crate::player::run_slideshow(
        source,
        options,
        start.saturating_sub(1),
        autoplay,
        frame_interval,
    )
    .await
}

/// Controller options and redraw interval from a validated slideshow section
fn playback_settings(slideshow: &SlideshowConfig) -> Result<(ControllerOptions, Duration)> {
    slideshow
        .validate()
        .map_err(|errors| ConfigError::from_validation(&errors))
        .context("Invalid slideshow settings")?;

    let options = ControllerOptions::from_millis(
        slideshow.speed_levels_ms.clone(),
        slideshow.initial_speed_ms,
    )
    .context("Invalid slideshow speed settings")?;

    Ok((options, Duration::from_millis(slideshow.frame_interval_ms)))
}

/// Upload local images as a new gallery
pub async fn upload_gallery(ctx: &AppContext, matches: &ArgMatches) -> Result<()> {
    let name = required(matches, "name")?;
    let paths: Vec<&String> = matches
        .get_many::<String>("files")
        .map(|values| values.collect())
        .unwrap_or_default();

    let mut images = Vec::new();
    for path in paths {
        match LocalImage::read(path).await {
            Ok(image) => images.push(image),
            Err(e) => println!("{} Skipping {}: {}", style("!").yellow().bold(), path, e),
        }
    }

    if images.is_empty() {
        bail!("No image files to upload");
    }

    let total = images.len();
    let manager = GalleryManager::new(ctx.writer()?).with_progress(Arc::new(
        |progress: &UploadProgress| {
            println!(
                "  [{:>3.0}%] {} ({}/{})",
                progress.percentage(),
                progress.current_file.as_deref().unwrap_or(""),
                progress.processed(),
                progress.total_files
            );
        },
    ));

    println!("Uploading {} images to '{}'...", total, name);
    let report = manager
        .upload_gallery(NewGallery {
            name: name.to_string(),
            characters: collect_labels(matches, "character").unwrap_or_default(),
            tags: collect_labels(matches, "tag").unwrap_or_default(),
            images,
        })
        .await
        .context("Failed to upload gallery")?;

    println!(
        "{} Gallery created: {} ({} images)",
        style("✓").green().bold(),
        report.gallery.id,
        report.gallery.file_count
    );
    for (file, error) in &report.failed {
        println!("  {} {}: {}", style("✗").red(), file, error);
    }

    Ok(())
}

/// Rename a gallery or replace its labels
pub async fn edit_gallery(ctx: &AppContext, matches: &ArgMatches) -> Result<()> {
    let id = required(matches, "id")?;
    let edit = GalleryEdit {
        name: matches.get_one::<String>("name").cloned(),
        characters: collect_labels(matches, "character"),
        tags: collect_labels(matches, "tag"),
    };

    if edit.is_empty() {
        bail!("Nothing to change: pass --name, --character or --tag");
    }

    let manager = GalleryManager::new(ctx.writer()?);
    let gallery = manager
        .edit_gallery(id, edit)
        .await
        .context("Failed to update gallery")?;

    println!("{} Gallery updated: {}", style("✓").green().bold(), gallery.name);
    println!("  Characters: {}", join_or_dash(&gallery.character));
    println!("  Tags: {}", join_or_dash(&gallery.tags));

    Ok(())
}

/// Delete one or more galleries with their images
pub async fn delete_galleries(ctx: &AppContext, matches: &ArgMatches) -> Result<()> {
    let ids: Vec<String> = matches
        .get_many::<String>("ids")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();
    let force = matches.get_flag("force");

    let manager = GalleryManager::new(ctx.writer()?);
    let manifest = manager
        .manifest()
        .await
        .context("Failed to read gallery manifest")?;

    let targets: Vec<&Gallery> = ids.iter().filter_map(|id| manifest.find(id)).collect();
    if targets.is_empty() {
        bail!("None of the given galleries exist");
    }

    if !force {
        let images: usize = targets.iter().map(|g| g.file_count).sum();
        println!(
            "Delete {} and {} images? This cannot be undone. (y/N)",
            describe_targets(&targets),
            images
        );
        let mut input = String::new();
        std::io::stdin()
            .read_line(&mut input)
            .context("Failed to read input")?;

        if !input.trim().eq_ignore_ascii_case("y") {
            println!("Deletion cancelled.");
            return Ok(());
        }
    }

    let report = if ids.len() == 1 {
        manager.delete_gallery(&ids[0]).await
    } else {
        manager.batch_delete(&ids).await
    }
    .context("Failed to delete galleries")?;

    println!(
        "{} Deleted {} galleries ({} images)",
        style("✓").green().bold(),
        report.removed.len(),
        report.files_deleted
    );
    for id in &report.missing {
        println!("  {} Not found: {}", style("!").yellow(), id);
    }
    for (file, error) in &report.files_failed {
        println!("  {} {}: {}", style("✗").red(), file, error);
    }

    Ok(())
}

/// Check credentials, upload access and the manifest
pub async fn test_connection(ctx: &AppContext) -> Result<()> {
    let client = ctx.writer()?;
    let report = client
        .test_connection()
        .await
        .context("Storage connection test failed")?;

    println!("{} Connection OK", style("✓").green().bold());
    println!("  API: {}", report.api_url);
    println!("  Download: {}", report.download_url);
    println!("  Public base: {}", report.download_base);
    match report.manifest_galleries {
        Some(count) => println!("  Manifest: {} galleries", count),
        None => println!("  Manifest: not created yet"),
    }

    Ok(())
}

pub fn config_init(ctx: &AppContext) -> Result<()> {
    let created = ctx
        .manager
        .initialize()
        .context("Failed to write config file")?;
    let path = ctx.manager.config_path();

    if created {
        println!("{} Config written to {}", style("✓").green().bold(), path.display());
    } else {
        println!("Config already exists at {}", path.display());
    }
    Ok(())
}

pub fn config_show(ctx: &AppContext) -> Result<()> {
    let mut shown = ctx.config.clone();
    shown.storage = shown.storage.redacted();

    let text = toml::to_string_pretty(&shown).context("Failed to serialize config")?;
    println!("# {}", ctx.manager.config_path().display());
    println!("{}", text);
    Ok(())
}

pub fn config_validate(ctx: &AppContext) -> Result<()> {
    let problems = ctx.manager.validate().context("Failed to load config")?;

    if problems.is_empty() {
        println!("{} Configuration is valid", style("✓").green().bold());
        return Ok(());
    }

    for problem in &problems {
        println!("  {} {}", style("✗").red(), problem);
    }
    bail!("{} configuration problem(s)", problems.len())
}

fn required<'a>(matches: &'a ArgMatches, id: &str) -> Result<&'a str> {
    matches
        .get_one::<String>(id)
        .map(|s| s.as_str())
        .ok_or_else(|| anyhow::anyhow!("Argument <{}> is required", id))
}

fn print_gallery_card(gallery: &Gallery, urls: &UrlBuilder) {
    println!(
        "\n{} {}",
        style(format!("[{}]", gallery.initials())).bold().magenta(),
        style(&gallery.name).bold()
    );
    println!(
        "  ID: {} | Images: {} | Colour: {}",
        gallery.id,
        gallery.file_count,
        gallery.placeholder_color()
    );
    if !gallery.character.is_empty() {
        println!("  Characters: {}", gallery.character.join(", "));
    }
    if !gallery.tags.is_empty() {
        println!("  Tags: {}", gallery.tags.join(", "));
    }
    if let Some(cover) = gallery.cover_url(urls) {
        println!("  Cover: {}", truncate(&cover, 70));
    }
}

fn describe_targets(targets: &[&Gallery]) -> String {
    match targets {
        [single] => format!("'{}'", single.name),
        many => format!("{} galleries", many.len()),
    }
}

fn join_or_dash(labels: &[String]) -> String {
    if labels.is_empty() {
        "-".to_string()
    } else {
        labels.join(", ")
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_chars).collect();
        format!("{}...", head)
    }
}
