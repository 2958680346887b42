//! Package extraction from a directory selection.
//!
//! Every selected file is read concurrently. The bundle becomes available
//! only once all reads have settled; the first failed read fails the whole
//! extraction and the remaining reads are dropped.

use futures::stream::{FuturesUnordered, TryStreamExt};
use tracing::{debug, info, warn};
use wasm_bindgen_futures::JsFuture;

use crate::config::MANIFEST_FILE_NAME;
use crate::error::FileReadError;
use crate::models::{ManifestFile, ProjectBundle, SourceFile};

/// A file handle from the directory picker.
#[allow(async_fn_in_trait)]
pub trait SelectedFile {
    /// File name as reported by the picker.
    fn name(&self) -> String;

    /// Read the whole file as text.
    async fn read_text(&self) -> Result<String, FileReadError>;
}

/// Read all `files` into a [`ProjectBundle`].
///
/// Sources keep their selection order. If more than one file is named
/// `Move.toml`, the one whose read completes last is kept.
pub async fn collect_package<F: SelectedFile>(files: &[F]) -> Result<ProjectBundle, FileReadError> {
    let mut reads: FuturesUnordered<_> = files
        .iter()
        .enumerate()
        .map(|(index, file)| async move {
            let name = file.name();
            let content = file.read_text().await?;
            Ok::<_, FileReadError>((index, name, content))
        })
        .collect();

    let mut slots: Vec<Option<SourceFile>> = files.iter().map(|_| None).collect();
    let mut manifest = ManifestFile::default();
    let mut manifests_seen = 0usize;

    while let Some((index, name, content)) = reads.try_next().await? {
        if name == MANIFEST_FILE_NAME {
            manifests_seen += 1;
            debug!(bytes = content.len(), "found package manifest");
            manifest = ManifestFile::new(content);
        } else {
            slots[index] = Some(SourceFile { name, content });
        }
    }

    if manifests_seen > 1 {
        warn!(count = manifests_seen, "selection contains several manifests, keeping the last read");
    }

    let bundle = ProjectBundle {
        files: slots.into_iter().flatten().collect(),
        manifest,
    };
    info!(
        files = bundle.files.len(),
        manifest = bundle.has_manifest(),
        "collected package"
    );
    Ok(bundle)
}

impl SelectedFile for web_sys::File {
    fn name(&self) -> String {
        web_sys::File::name(self)
    }

    async fn read_text(&self) -> Result<String, FileReadError> {
        let name = web_sys::File::name(self);
        let text = JsFuture::from(self.text())
            .await
            .map_err(|e| FileReadError::new(&name, format!("{:?}", e)))?;
        text.as_string()
            .ok_or_else(|| FileReadError::new(name, "content is not text"))
    }
}

/// Collect the files of an `<input type="file">` selection.
pub fn files_from_list(list: &web_sys::FileList) -> Vec<web_sys::File> {
    (0..list.length()).filter_map(|i| list.get(i)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    /// File whose read resolves after `yields` scheduler turns.
    struct FakeFile {
        name: &'static str,
        content: Result<&'static str, &'static str>,
        yields: usize,
        completed: Rc<Cell<usize>>,
    }

    impl FakeFile {
        fn ok(name: &'static str, content: &'static str) -> Self {
            Self {
                name,
                content: Ok(content),
                yields: 0,
                completed: Rc::default(),
            }
        }

        fn failing(name: &'static str) -> Self {
            Self {
                content: Err("decode failed"),
                ..Self::ok(name, "")
            }
        }

        fn after(mut self, yields: usize) -> Self {
            self.yields = yields;
            self
        }
    }

    impl SelectedFile for FakeFile {
        fn name(&self) -> String {
            self.name.to_string()
        }

        async fn read_text(&self) -> Result<String, FileReadError> {
            for _ in 0..self.yields {
                tokio::task::yield_now().await;
            }
            self.completed.set(self.completed.get() + 1);
            self.content
                .map(str::to_string)
                .map_err(|reason| FileReadError::new(self.name, reason))
        }
    }

    #[tokio::test]
    async fn test_no_manifest() {
        let files = vec![
            FakeFile::ok("a.move", "module a"),
            FakeFile::ok("b.move", "module b"),
            FakeFile::ok("README.md", "readme"),
        ];
        let bundle = collect_package(&files).await.unwrap();
        assert_eq!(bundle.files.len(), files.len());
        assert_eq!(bundle.manifest.content, "");
    }

    #[tokio::test]
    async fn test_manifest_is_routed_out_of_files() {
        let files = vec![
            FakeFile::ok("a.move", "module a"),
            FakeFile::ok("Move.toml", "[package]"),
            FakeFile::ok("b.move", "module b"),
        ];
        let bundle = collect_package(&files).await.unwrap();
        assert_eq!(bundle.manifest.content, "[package]");
        assert_eq!(bundle.files.len(), 2);
        assert!(bundle.files.iter().all(|f| f.name != "Move.toml"));
    }

    #[tokio::test]
    async fn test_empty_manifest_is_still_selected() {
        let files = vec![FakeFile::ok("Move.toml", ""), FakeFile::ok("a.move", "module a")];
        let bundle = collect_package(&files).await.unwrap();
        assert!(bundle.has_manifest());
        assert_eq!(bundle.file_count(), 2);
        assert_eq!(bundle.files.len(), 1);
    }

    #[tokio::test]
    async fn test_manifest_name_is_case_sensitive() {
        let files = vec![FakeFile::ok("move.toml", "[package]")];
        let bundle = collect_package(&files).await.unwrap();
        assert!(!bundle.has_manifest());
        assert_eq!(bundle.files[0].name, "move.toml");
    }

    #[tokio::test]
    async fn test_sources_keep_selection_order() {
        let files = vec![
            FakeFile::ok("first.move", "1").after(3),
            FakeFile::ok("second.move", "2").after(1),
            FakeFile::ok("third.move", "3"),
        ];
        let bundle = collect_package(&files).await.unwrap();
        let names: Vec<_> = bundle.files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["first.move", "second.move", "third.move"]);
    }

    #[tokio::test]
    async fn test_last_completed_manifest_wins() {
        let files = vec![
            FakeFile::ok("Move.toml", "slow").after(3),
            FakeFile::ok("Move.toml", "fast"),
        ];
        let bundle = collect_package(&files).await.unwrap();
        assert_eq!(bundle.manifest.content, "slow");
        assert!(bundle.files.is_empty());
    }

    #[tokio::test]
    async fn test_any_failure_fails_extraction() {
        let completed = Rc::new(Cell::new(0));
        let mut files = vec![
            FakeFile::ok("a.move", "module a"),
            FakeFile::failing("broken.move").after(1),
            FakeFile::ok("c.move", "module c").after(5),
        ];
        for file in &mut files {
            file.completed = completed.clone();
        }
        let err = collect_package(&files).await.unwrap_err();
        assert_eq!(err, FileReadError::new("broken.move", "decode failed"));
        // The slow read was still in flight and got discarded.
        assert_eq!(completed.get(), 2);
    }

    #[tokio::test]
    async fn test_empty_selection() {
        let files: Vec<FakeFile> = Vec::new();
        let bundle = collect_package(&files).await.unwrap();
        assert!(bundle.is_empty());
    }
}
