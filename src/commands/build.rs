//! Build the static site

use anyhow::{Context, Result};
use notify_debouncer_mini::{new_debouncer, notify::RecursiveMode};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::channel;
use std::time::{Duration, Instant};

use crate::content::ContentLoader;
use crate::generator::Generator;
use crate::Site;

/// Load content and render it into the output directory.
///
/// Output is rendered into a staging directory first and only replaces the
/// output directory once everything succeeded.
pub fn run(site: &Site) -> Result<()> {
    let start = Instant::now();

    let loader = ContentLoader::new(site)?;
    let documents = loader.load()?;
    tracing::info!("Loaded {} documents", documents.len());

    let staging = staging_dir(&site.output_dir);
    if staging.exists() {
        fs::remove_dir_all(&staging)?;
    }

    let generated = Generator::new(site, &staging).and_then(|g| g.generate(&documents));
    let written = match generated {
        Ok(written) => written,
        Err(e) => {
            if let Err(cleanup) = fs::remove_dir_all(&staging) {
                tracing::debug!("Could not remove {:?}: {}", staging, cleanup);
            }
            return Err(e);
        }
    };

    if site.output_dir.exists() {
        fs::remove_dir_all(&site.output_dir)
            .with_context(|| format!("Failed to replace {:?}", site.output_dir))?;
    }
    fs::rename(&staging, &site.output_dir)
        .with_context(|| format!("Failed to move output into {:?}", site.output_dir))?;

    tracing::info!(
        "Wrote {} files to {:?} in {:.2}s",
        written,
        site.output_dir,
        start.elapsed().as_secs_f64()
    );

    Ok(())
}

/// Sibling of the output directory used while rendering
pub fn staging_dir(output_dir: &Path) -> PathBuf {
    let name = output_dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "site".to_string());
    output_dir.with_file_name(format!(".{}.partial", name))
}

/// Rebuild whenever content or configuration changes
pub fn watch(site: &Site) -> Result<()> {
    let base_dir = site.base_dir.clone();
    watch_changes(site, move |_| {
        tracing::info!("Rebuilding...");
        // Configuration may have changed too
        let result = Site::new(&base_dir).and_then(|site| site.build());
        if let Err(e) = &result {
            tracing::error!("Build failed: {:#}", e);
        }
        result.is_ok()
    })
}

/// Block on file changes under the input directory and the config file,
/// calling `on_change` with each debounced batch of relevant paths.
pub fn watch_changes<F>(site: &Site, mut on_change: F) -> Result<()>
where
    F: FnMut(&[PathBuf]) -> bool,
{
    let (tx, rx) = channel();
    let mut debouncer = new_debouncer(Duration::from_millis(500), tx)?;

    if site.input_dir.exists() {
        debouncer
            .watcher()
            .watch(&site.input_dir, RecursiveMode::Recursive)?;
        tracing::debug!("Watching: {:?}", site.input_dir);
    }

    let config_path = site.config_path();
    if config_path.exists() {
        debouncer
            .watcher()
            .watch(&config_path, RecursiveMode::NonRecursive)?;
        tracing::debug!("Watching: {:?}", config_path);
    }

    tracing::info!("Watching for changes. Press Ctrl+C to stop.");

    let ignored = [site.output_dir.clone(), staging_dir(&site.output_dir)];

    loop {
        match rx.recv() {
            Ok(Ok(events)) => {
                let changed: Vec<PathBuf> = events
                    .into_iter()
                    .map(|e| e.path)
                    .filter(|p| is_relevant(p, &ignored))
                    .collect();

                if changed.is_empty() {
                    continue;
                }

                for path in &changed {
                    tracing::info!("Changed: {}", path.display());
                }
                on_change(&changed);
            }
            Ok(Err(e)) => {
                tracing::error!("Watch error: {:?}", e);
            }
            Err(e) => {
                tracing::error!("Channel error: {:?}", e);
                break;
            }
        }
    }

    Ok(())
}

/// Skip editor droppings, VCS files and our own output
fn is_relevant(path: &Path, ignored: &[PathBuf]) -> bool {
    if ignored.iter().any(|dir| path.starts_with(dir)) {
        return false;
    }
    let path_str = path.to_string_lossy();
    !path_str.contains(".git")
        && !path_str.contains(".DS_Store")
        && !path_str.contains("node_modules")
        && !path_str.ends_with('~')
        && !path_str.ends_with(".swp")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &Path, relative: &str, content: &str) {
        let path = dir.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_staging_dir() {
        assert_eq!(
            staging_dir(Path::new("/blog/_site")),
            PathBuf::from("/blog/._site.partial")
        );
    }

    #[test]
    fn test_build_replaces_output() {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "src/posts/2024-03-05-hello.md",
            "---\ntitle: Hello\ndate: 2024-03-05\n---\nHi\n",
        );
        write(dir.path(), "_site/stale.html", "old");

        let site = Site::new(dir.path()).unwrap();
        run(&site).unwrap();

        assert!(site.output_dir.join("2024/03/hello/index.html").exists());
        assert!(!site.output_dir.join("stale.html").exists());
        assert!(!staging_dir(&site.output_dir).exists());
    }

    #[test]
    fn test_failed_build_keeps_previous_output() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "_site/index.html", "previous");
        write(
            dir.path(),
            "src/_includes/page.html",
            "{{ missing_variable.field }}",
        );
        write(dir.path(), "src/about.md", "---\ntitle: About\n---\nx\n");

        let site = Site::new(dir.path()).unwrap();
        assert!(run(&site).is_err());

        let kept = fs::read_to_string(site.output_dir.join("index.html")).unwrap();
        assert_eq!(kept, "previous");
        assert!(!staging_dir(&site.output_dir).exists());
    }

    #[test]
    fn test_output_dir_must_not_hold_sources() {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "src/posts/2024-03-05-hello.md",
            "---\ntitle: Hello\ndate: 2024-03-05\n---\nHi\n",
        );

        for output in [".", "", "./", "src", "src/..", "..", "sub/../.."] {
            let config = format!("dir:\n  input: src\n  output: \"{}\"\n", output);
            fs::write(dir.path().join(crate::CONFIG_FILE), config).unwrap();
            assert!(Site::new(dir.path()).is_err(), "output {:?} accepted", output);
        }

        assert!(dir.path().join("src/posts/2024-03-05-hello.md").exists());
        assert!(dir.path().join(crate::CONFIG_FILE).exists());

        // A sibling of the input directory is fine, as is one nested in it
        for output in ["docs", "public/site", "src/_site"] {
            let config = format!("dir:\n  input: src\n  output: {}\n", output);
            fs::write(dir.path().join(crate::CONFIG_FILE), config).unwrap();
            assert!(Site::new(dir.path()).is_ok(), "output {:?} rejected", output);
        }
    }

    #[test]
    fn test_is_relevant() {
        let ignored = vec![PathBuf::from("/blog/_site")];
        assert!(is_relevant(Path::new("/blog/src/posts/a.md"), &ignored));
        assert!(!is_relevant(Path::new("/blog/_site/index.html"), &ignored));
        assert!(!is_relevant(Path::new("/blog/src/.git/HEAD"), &ignored));
        assert!(!is_relevant(Path::new("/blog/src/a.md~"), &ignored));
    }
}
