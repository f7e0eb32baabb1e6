use memmap::{Mmap, MmapMut};
use std::fs::{File, OpenOptions};
use std::path::Path;

/// A read-only memory mapped batch file.
pub struct MmapFile {
    mmap: Mmap,
}

impl MmapFile {
    pub fn from_file(file: &File) -> std::io::Result<Self> {
        Ok(Self {
            mmap: unsafe { Mmap::map(file)? },
        })
    }

    fn len(&self) -> usize {
        self.mmap.len()
    }

    fn read<T>(&self, pos: usize) -> *const T {
        unsafe { self.mmap.as_ptr().add(pos) as *const T }
    }
}

/// A writable memory mapped batch file.
pub struct MmapMutFile {
    file: File,
    mmap: MmapMut,
    len: u64,
}

impl MmapMutFile {
    pub fn from_file(file: File) -> std::io::Result<Self> {
        let len = file.metadata()?.len();
        let mmap = if len == 0 {
            MmapMut::map_anon(1)?
        } else {
            unsafe { MmapMut::map_mut(&file)? }
        };
        Ok(Self { file, mmap, len })
    }

    fn len(&self) -> usize {
        self.len as usize
    }

    fn resize(&mut self, new_len: usize) {
        self.len = new_len as u64;
        self.mmap = MmapMut::map_anon(1).unwrap();
        self.file.set_len(self.len).unwrap();
        if new_len != 0 {
            self.mmap = unsafe { MmapMut::map_mut(&self.file).unwrap() }
        }
    }

    fn read<T>(&self, pos: usize) -> *const T {
        unsafe { self.mmap.as_ptr().add(pos) as *const T }
    }
}

/// A memory manager to hide the underlying type of the memory buffer.
pub enum MemoryManager {
    /// A memory buffer.
    Mem(Vec<u8>),
    /// A read-only memory mapped buffer.
    Mmap(MmapFile),
    /// A writable memory mapped buffer.
    MmapMut(MmapMutFile),
}

impl MemoryManager {
    pub fn new_mem(size: usize) -> Self {
        MemoryManager::Mem(vec![0; size])
    }

    pub fn new_mmap<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        Ok(MemoryManager::Mmap(MmapFile::from_file(&File::open(
            path,
        )?)?))
    }

    pub fn new_mmap_mut<P: AsRef<Path>>(path: P, size: usize) -> std::io::Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;
        file.set_len(size as u64)?;
        Ok(MemoryManager::MmapMut(MmapMutFile::from_file(file)?))
    }

    pub fn len(&self) -> usize {
        match self {
            MemoryManager::Mem(vec) => vec.len(),
            MemoryManager::Mmap(mmapfile) => mmapfile.len(),
            MemoryManager::MmapMut(mmapfile) => mmapfile.len(),
        }
    }

    pub fn resize(&mut self, new_len: usize) {
        match self {
            MemoryManager::Mem(vec) => vec.resize(new_len, 0),
            MemoryManager::Mmap(_) => panic!("cannot resize read-only file"),
            MemoryManager::MmapMut(mmapfile) => mmapfile.resize(new_len),
        }
    }

    /// The `T` at byte offset `pos`.
    ///
    /// `pos` must be properly aligned for `T` and `pos + size_of::<T>()` must
    /// not exceed `len()`.
    pub fn read_ref<T>(&self, pos: usize) -> &T {
        unsafe {
            match self {
                MemoryManager::Mem(vec) => &*(vec.as_ptr().add(pos) as *const T),
                MemoryManager::Mmap(mmapfile) => &*mmapfile.read(pos),
                MemoryManager::MmapMut(mmapfile) => &*mmapfile.read(pos),
            }
        }
    }

    /// The `count` `T`s starting at byte offset `pos`.
    ///
    /// Same contract as [`read_ref`](MemoryManager::read_ref).
    pub fn read_slice<T>(&self, pos: usize, count: usize) -> &[T] {
        unsafe {
            match self {
                MemoryManager::Mem(vec) => {
                    std::slice::from_raw_parts(vec.as_ptr().add(pos) as *const T, count)
                }
                MemoryManager::Mmap(mmapfile) => {
                    std::slice::from_raw_parts(mmapfile.read(pos), count)
                }
                MemoryManager::MmapMut(mmapfile) => {
                    std::slice::from_raw_parts(mmapfile.read(pos), count)
                }
            }
        }
    }

    /// Writes `data` at byte offset `pos`.
    pub fn write_slice<T>(&mut self, pos: usize, data: &[T]) {
        unsafe {
            match self {
                MemoryManager::Mem(vec) => {
                    std::ptr::copy(data.as_ptr(), vec.as_mut_ptr().add(pos) as *mut T, data.len())
                }
                MemoryManager::Mmap(_) => panic!("cannot write read-only file"),
                MemoryManager::MmapMut(mmapfile) => std::ptr::copy(
                    data.as_ptr(),
                    mmapfile.mmap.as_mut_ptr().add(pos) as *mut T,
                    data.len(),
                ),
            }
        }
    }
}
