//! Process-once dataset front-end.
//!
//! Raw TU files live in `<root>/raw`; the first open parses them and writes
//! the batch cache to `<root>/processed/data.tub`, later opens memory-map the
//! cache without re-parsing.

use crate::{
    cache::{batch_from_mm, mm_from_batch},
    data::{Data, GraphBatch, SliceTable},
    error::{Error, Result},
    memory_manager::MemoryManager,
    read::tu::{read_tu_files, TuConfig},
};
use log::info;
use std::fs;
use std::path::Path;

pub struct TuDataset {
    batch: GraphBatch,
    slices: SliceTable,
}

impl TuDataset {
    /// Opens the dataset rooted at `root`.
    pub fn open<P: AsRef<Path>>(root: P, prefix: &str, config: &TuConfig) -> Result<TuDataset> {
        let processed = root.as_ref().join("processed").join("data.tub");
        if processed.is_file() {
            info!("loading {}...", processed.display());
            let mm = MemoryManager::new_mmap(&processed)?;
            let (batch, slices) = batch_from_mm(&mm)?;
            return Ok(TuDataset { batch, slices });
        }
        let (batch, slices) = read_tu_files(root.as_ref().join("raw"), prefix, config)?;
        write_cache(&processed, &batch, &slices)?;
        Ok(TuDataset { batch, slices })
    }

    pub fn num_graphs(&self) -> usize {
        self.slices.num_graphs()
    }

    /// Extracts graph `g`. Panics if `g` is out of range.
    pub fn get(&self, g: usize) -> Data {
        self.batch.get(&self.slices, g)
    }

    pub fn batch(&self) -> &GraphBatch {
        &self.batch
    }

    pub fn slices(&self) -> &SliceTable {
        &self.slices
    }
}

fn write_cache(path: &Path, batch: &GraphBatch, slices: &SliceTable) -> Result<()> {
    let dir = path.parent().unwrap();
    fs::create_dir_all(dir)?;
    // The cache only becomes visible once fully written.
    let tmp = tempfile::NamedTempFile::new_in(dir)?;
    let mut mm = MemoryManager::new_mmap_mut(tmp.path(), 0)?;
    mm_from_batch(&mut mm, batch, slices);
    drop(mm);
    tmp.persist(path).map_err(|e| Error::Io(e.error))?;
    info!("wrote {}", path.display());
    Ok(())
}
