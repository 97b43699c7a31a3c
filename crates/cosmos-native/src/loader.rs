//! Background image decoding for the desktop host.

use cosmos_core::ImageCatalog;
use cosmos_render::{decode_image, DecodedImage, MAX_TEXTURE_DIM};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

pub struct Loaded {
    pub index: usize,
    pub result: anyhow::Result<DecodedImage>,
}

fn load(path: &Path) -> anyhow::Result<DecodedImage> {
    let bytes = std::fs::read(path)?;
    Ok(decode_image(&bytes, MAX_TEXTURE_DIM)?)
}

/// Decode every catalog image on `threads` workers. Results arrive on the
/// returned channel in completion order; the channel closes when all
/// workers finish.
pub fn spawn(dir: &Path, catalog: &ImageCatalog, threads: usize) -> Receiver<Loaded> {
    let (tx, rx) = mpsc::channel();
    let threads = threads.clamp(1, catalog.len().max(1));
    let jobs: Vec<(usize, PathBuf)> = (0..catalog.len())
        .filter_map(|i| catalog.file_name(i).map(|f| (i, dir.join(f))))
        .collect();
    log::info!(
        "[loader] decoding {} images from {} on {} threads",
        jobs.len(),
        dir.display(),
        threads
    );
    for worker in 0..threads {
        let mine: Vec<(usize, PathBuf)> = jobs
            .iter()
            .skip(worker)
            .step_by(threads)
            .cloned()
            .collect();
        let tx: Sender<Loaded> = tx.clone();
        let spawned = thread::Builder::new()
            .name(format!("image-decoder-{worker}"))
            .spawn(move || {
                for (index, path) in mine {
                    let result = load(&path)
                        .map_err(|e| e.context(format!("loading {}", path.display())));
                    if tx.send(Loaded { index, result }).is_err() {
                        // receiver gone; the window closed
                        return;
                    }
                }
            });
        if let Err(e) = spawned {
            log::error!("[loader] could not start decoder thread: {e}");
        }
    }
    rx
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
    use tempfile::TempDir;

    #[test]
    fn decodes_present_files_and_reports_missing_ones() {
        let dir = TempDir::new().unwrap();
        let catalog = ImageCatalog::sequential(3);
        for i in [0, 2] {
            let img = RgbaImage::from_pixel(8, 4, Rgba([10, 20, 30, 255]));
            let name = catalog.file_name(i).unwrap();
            DynamicImage::ImageRgba8(img)
                .save_with_format(dir.path().join(name), ImageFormat::Png)
                .unwrap();
        }

        let rx = spawn(dir.path(), &catalog, 2);
        let mut results: Vec<Loaded> = rx.iter().collect();
        results.sort_by_key(|l| l.index);

        assert_eq!(results.len(), 3);
        let first = results[0].result.as_ref().unwrap();
        assert_eq!((first.width, first.height), (8, 4));
        assert!(results[1].result.is_err());
        assert!(results[2].result.is_ok());
    }

    #[test]
    fn empty_directory_fails_every_image() {
        let dir = TempDir::new().unwrap();
        let catalog = ImageCatalog::sequential(4);
        let results: Vec<Loaded> = spawn(dir.path(), &catalog, 8).iter().collect();
        assert_eq!(results.len(), 4);
        assert!(results.iter().all(|l| l.result.is_err()));
    }
}
