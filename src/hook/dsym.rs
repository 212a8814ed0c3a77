//! Debug symbol bundle collection.

use crate::bundler::{Result, utils::fs};
use std::path::{Path, PathBuf};

/// Products directories whose symbol bundles are kept.
pub const SYMBOL_PLATFORMS: [&str; 2] = ["iphoneos", "iphonesimulator"];

/// Copy `<build_dir>/<configuration>-<platform>/**/*.dSYM` into
/// `<symbol_destination>/<platform>/` for each of [`SYMBOL_PLATFORMS`].
///
/// The symbol destination is cleared first. Returns the copied bundles.
pub async fn copy_symbol_bundles(
    build_dir: &Path,
    configuration: &str,
    symbol_destination: &Path,
) -> Result<Vec<PathBuf>> {
    fs::remove_dir_all(symbol_destination).await?;

    let mut copied = Vec::new();
    for platform in SYMBOL_PLATFORMS {
        let products = build_dir.join(format!("{}-{}", configuration, platform));
        let pattern = format!("{}/**/*.dSYM", glob::Pattern::escape(&products.to_string_lossy()));
        let mut bundles = glob::glob(&pattern)?.collect::<std::result::Result<Vec<_>, _>>()?;
        bundles.sort();

        let destination = symbol_destination.join(platform);
        for bundle in bundles {
            fs::create_dir_all(&destination, false).await?;
            copied.push(fs::copy_into(&bundle, &destination).await?);
        }
    }

    log::debug!("Copied {} symbol bundle(s) to {}", copied.len(), symbol_destination.display());
    Ok(copied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn copies_device_and_simulator_symbols_only() {
        let dir = TempDir::new().unwrap();
        let build = dir.path().join("build");
        for path in [
            "Release-iphoneos/Foo/Foo.framework.dSYM/Contents",
            "Release-iphonesimulator/Foo/Foo.framework.dSYM/Contents",
            "Release-maccatalyst/Foo/Foo.framework.dSYM/Contents",
            "Debug-iphoneos/Foo/Foo.framework.dSYM/Contents",
        ] {
            std::fs::create_dir_all(build.join(path)).unwrap();
        }
        let symbols = dir.path().join("dSYM");
        std::fs::create_dir_all(symbols.join("iphoneos/Stale.dSYM")).unwrap();

        let copied = copy_symbol_bundles(&build, "Release", &symbols).await.unwrap();

        assert_eq!(
            copied,
            vec![
                symbols.join("iphoneos/Foo.framework.dSYM"),
                symbols.join("iphonesimulator/Foo.framework.dSYM"),
            ]
        );
        assert!(symbols.join("iphoneos/Foo.framework.dSYM/Contents").is_dir());
        assert!(!symbols.join("iphoneos/Stale.dSYM").exists());
        assert!(!symbols.join("maccatalyst").exists());
    }

    #[tokio::test]
    async fn no_symbols_leaves_empty_destination_absent() {
        let dir = TempDir::new().unwrap();
        let symbols = dir.path().join("dSYM");
        std::fs::create_dir_all(symbols.join("iphoneos/Old.dSYM")).unwrap();

        let copied = copy_symbol_bundles(&dir.path().join("build"), "Debug", &symbols)
            .await
            .unwrap();

        assert!(copied.is_empty());
        assert!(!symbols.exists());
    }
}
