use std::fs::{File, OpenOptions};
use std::io::{self, BufReader, Read, Seek, SeekFrom, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::common::{RecordIndex, RegistrarError, Result};
use crate::record::FixedRecord;

/// RecordFile is a file-backed array of fixed-size records of one type.
///
/// Records sit back-to-back with no header, so record `i` lives at byte offset
/// `i * R::ENCODED_LEN`. Records are only ever appended or overwritten in place,
/// which keeps indices stable for the life of the file.
///
/// Every operation opens the file, does its work and closes it again. A missing
/// file is an empty store; it is created by the first `append`.
pub struct RecordFile<R> {
    /// Path to the store file
    path: PathBuf,
    /// Serializes check-then-write sequences (append, write_at)
    write_lock: Mutex<()>,
    _record: PhantomData<fn() -> R>,
}

impl<R: FixedRecord> RecordFile<R> {
    /// Creates a store over the given path. The file is not touched until first use.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            write_lock: Mutex::new(()),
            _record: PhantomData,
        }
    }

    /// Width of one record in bytes.
    pub fn record_len(&self) -> u64 {
        R::ENCODED_LEN as u64
    }

    /// Returns the number of whole records in the file (0 if the file does not exist).
    /// A truncated trailing record is not counted.
    pub fn count(&self) -> Result<u64> {
        let len = match std::fs::metadata(&self.path) {
            Ok(metadata) => metadata.len(),
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e.into()),
        };

        let remainder = len % self.record_len();
        if remainder != 0 {
            warn!(
                path = %self.path.display(),
                entity = %R::ENTITY,
                trailing_bytes = remainder,
                "store file ends with a partial record"
            );
        }
        Ok(len / self.record_len())
    }

    /// Reads the record at `index`.
    pub fn read_at(&self, index: RecordIndex) -> Result<R> {
        let count = self.count()?;
        if index >= count {
            return Err(RegistrarError::OutOfRange { index, count });
        }

        let mut file = File::open(&self.path)?;
        file.seek(SeekFrom::Start(index * self.record_len()))?;
        let mut data = vec![0u8; R::ENCODED_LEN];
        file.read_exact(&mut data)?;
        R::decode(&data)
    }

    /// Appends a record and returns its index (the previous count).
    /// The write is flushed to disk before returning.
    pub fn append(&self, record: &R) -> Result<RecordIndex> {
        let data = record.encode();
        let _guard = self.write_lock.lock();

        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.path)?;

        // Write at count * len, over any torn trailing record
        let index = file.metadata()?.len() / self.record_len();
        file.seek(SeekFrom::Start(index * self.record_len()))?;
        file.write_all(&data)?;
        file.flush()?;
        file.sync_data()?;

        debug!(path = %self.path.display(), entity = %R::ENTITY, index, "appended record");
        Ok(index)
    }

    /// Overwrites the existing record at `index`.
    /// The write is flushed to disk before returning.
    pub fn write_at(&self, index: RecordIndex, record: &R) -> Result<()> {
        let data = record.encode();
        let _guard = self.write_lock.lock();

        let count = self.count()?;
        if index >= count {
            return Err(RegistrarError::OutOfRange { index, count });
        }

        let mut file = OpenOptions::new().write(true).open(&self.path)?;
        file.seek(SeekFrom::Start(index * self.record_len()))?;
        file.write_all(&data)?;
        file.flush()?;
        file.sync_data()?;

        debug!(path = %self.path.display(), entity = %R::ENTITY, index, "overwrote record");
        Ok(())
    }

    /// Returns the first record (oldest first) matching the predicate, with its index.
    pub fn find_first<F>(&self, mut predicate: F) -> Result<Option<(RecordIndex, R)>>
    where
        F: FnMut(&R) -> bool,
    {
        for entry in self.scan()? {
            let (index, record) = entry?;
            if predicate(&record) {
                return Ok(Some((index, record)));
            }
        }
        Ok(None)
    }

    /// Returns a forward iterator over all records in file order.
    pub fn scan(&self) -> Result<RecordScan<R>> {
        let reader = match File::open(&self.path) {
            Ok(file) => Some(BufReader::new(file)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => return Err(e.into()),
        };
        debug!(path = %self.path.display(), entity = %R::ENTITY, "scanning store");

        Ok(RecordScan {
            reader,
            next_index: 0,
            buf: vec![0u8; R::ENCODED_LEN],
            _record: PhantomData,
        })
    }

    /// Returns the path to the store file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Forward iterator over the records of a [`RecordFile`].
///
/// Yields `(index, record)` pairs oldest first and stops at the last whole record.
/// After an error the iterator is exhausted.
pub struct RecordScan<R> {
    reader: Option<BufReader<File>>,
    next_index: RecordIndex,
    buf: Vec<u8>,
    _record: PhantomData<fn() -> R>,
}

impl<R: FixedRecord> Iterator for RecordScan<R> {
    type Item = Result<(RecordIndex, R)>;

    fn next(&mut self) -> Option<Self::Item> {
        let reader = self.reader.as_mut()?;

        if let Err(e) = reader.read_exact(&mut self.buf) {
            self.reader = None;
            if e.kind() == io::ErrorKind::UnexpectedEof {
                return None;
            }
            return Some(Err(e.into()));
        }

        let index = self.next_index;
        self.next_index += 1;

        match R::decode(&self.buf) {
            Ok(record) => Some(Ok((index, record))),
            Err(e) => {
                self.reader = None;
                Some(Err(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Faculty;
    use tempfile::TempDir;

    fn faculty(id: &str) -> Faculty {
        Faculty::new(id, "Dr. Someone", "EEE", "someone@example.com")
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let file: RecordFile<Faculty> = RecordFile::new(dir.path().join("faculty.dat"));

        assert_eq!(file.count().unwrap(), 0);
        assert!(file.scan().unwrap().next().is_none());
        assert!(file.find_first(|_| true).unwrap().is_none());
        assert!(!file.path().exists());
    }

    #[test]
    fn test_append_assigns_sequential_indices() {
        let dir = TempDir::new().unwrap();
        let file = RecordFile::new(dir.path().join("faculty.dat"));

        assert_eq!(file.append(&faculty("F0")).unwrap(), 0);
        assert_eq!(file.append(&faculty("F1")).unwrap(), 1);
        assert_eq!(file.count().unwrap(), 2);
        assert_eq!(file.read_at(1).unwrap().id, "F1");

        let len = std::fs::metadata(file.path()).unwrap().len();
        assert_eq!(len, 2 * Faculty::ENCODED_LEN as u64);
    }

    #[test]
    fn test_read_at_out_of_range() {
        let dir = TempDir::new().unwrap();
        let file = RecordFile::new(dir.path().join("faculty.dat"));
        file.append(&faculty("F0")).unwrap();

        match file.read_at(1) {
            Err(RegistrarError::OutOfRange { index, count }) => {
                assert_eq!(index, 1);
                assert_eq!(count, 1);
            }
            other => panic!("expected OutOfRange, got {other:?}"),
        }
    }

    #[test]
    fn test_write_at_out_of_range_leaves_file_alone() {
        let dir = TempDir::new().unwrap();
        let file: RecordFile<Faculty> = RecordFile::new(dir.path().join("faculty.dat"));

        assert!(matches!(
            file.write_at(0, &faculty("F0")),
            Err(RegistrarError::OutOfRange { .. })
        ));
        assert!(!file.path().exists());
    }

    #[test]
    fn test_partial_trailing_record_is_ignored_and_overwritten() {
        let dir = TempDir::new().unwrap();
        let file = RecordFile::new(dir.path().join("faculty.dat"));
        file.append(&faculty("F0")).unwrap();

        // Simulate a torn append
        {
            let mut raw = OpenOptions::new().append(true).open(file.path()).unwrap();
            raw.write_all(&[0xAB; 10]).unwrap();
        }
        assert_eq!(file.count().unwrap(), 1);
        assert_eq!(file.scan().unwrap().count(), 1);

        assert_eq!(file.append(&faculty("F1")).unwrap(), 1);
        assert_eq!(file.count().unwrap(), 2);
        assert_eq!(file.read_at(1).unwrap().id, "F1");
    }
}
