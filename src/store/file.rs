//! JSON file-based form store
//!
//! Layout under the data directory:
//! - `forms/<form_id>.json` - one document per form
//! - `submissions/<form_id>.jsonl` - append-only, one submission per line
//!
//! A crash mid-append can leave an unterminated last line. Readers skip it
//! and the next append truncates it away before writing.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::errors::{StoreError, StoreResult};
use super::{sort_recent_first, FormStore};
use crate::schema::Form;
use crate::submission::Submission;

const FORMS_DIR: &str = "forms";
const SUBMISSIONS_DIR: &str = "submissions";

/// Form store persisted as JSON files
#[derive(Debug)]
pub struct FileFormStore {
    root: PathBuf,
    /// Serializes writers; readers go straight to disk
    write_lock: Mutex<()>,
}

impl FileFormStore {
    /// Open a store rooted at `data_dir`, creating its directories
    pub fn open(data_dir: impl AsRef<Path>) -> StoreResult<Self> {
        let root = data_dir.as_ref().to_path_buf();
        for dir in [FORMS_DIR, SUBMISSIONS_DIR] {
            fs::create_dir_all(root.join(dir)).map_err(|e| {
                StoreError::Unavailable(format!("Failed to create {}: {}", dir, e))
            })?;
        }
        Ok(Self {
            root,
            write_lock: Mutex::new(()),
        })
    }

    fn form_path(&self, form_id: &str) -> StoreResult<PathBuf> {
        check_id(form_id)?;
        Ok(self.root.join(FORMS_DIR).join(format!("{}.json", form_id)))
    }

    fn submissions_path(&self, form_id: &str) -> StoreResult<PathBuf> {
        check_id(form_id)?;
        Ok(self.root.join(SUBMISSIONS_DIR).join(format!("{}.jsonl", form_id)))
    }

    fn read_form(path: &Path) -> StoreResult<Form> {
        let content = fs::read_to_string(path).map_err(|e| {
            StoreError::Unavailable(format!("Failed to read {}: {}", path.display(), e))
        })?;
        serde_json::from_str(&content)
            .map_err(|e| StoreError::Corrupt(format!("{}: {}", path.display(), e)))
    }
}

/// Offset just past the last newline when the file ends mid-record
fn torn_tail(file: &mut File) -> io::Result<Option<u64>> {
    const CHUNK: u64 = 4096;

    let len = file.seek(SeekFrom::End(0))?;
    if len == 0 {
        return Ok(None);
    }
    let mut last = [0u8; 1];
    file.seek(SeekFrom::Start(len - 1))?;
    file.read_exact(&mut last)?;
    if last[0] == b'\n' {
        return Ok(None);
    }

    let mut end = len - 1;
    let mut buf = vec![0u8; CHUNK as usize];
    while end > 0 {
        let start = end.saturating_sub(CHUNK);
        let chunk = &mut buf[..(end - start) as usize];
        file.seek(SeekFrom::Start(start))?;
        file.read_exact(chunk)?;
        if let Some(pos) = chunk.iter().rposition(|b| *b == b'\n') {
            return Ok(Some(start + pos as u64 + 1));
        }
        end = start;
    }
    Ok(Some(0))
}

/// IDs become file names, so keep them to a safe alphabet
fn check_id(id: &str) -> StoreResult<()> {
    let safe = !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if safe {
        Ok(())
    } else {
        Err(StoreError::InvalidId(id.to_string()))
    }
}

impl FormStore for FileFormStore {
    fn get_form(&self, form_id: &str) -> StoreResult<Option<Form>> {
        let path = match self.form_path(form_id) {
            Ok(path) => path,
            // An ID we could never have written cannot exist
            Err(StoreError::InvalidId(_)) => return Ok(None),
            Err(e) => return Err(e),
        };
        if !path.exists() {
            return Ok(None);
        }
        Self::read_form(&path).map(Some)
    }

    fn list_forms(&self, owner_id: &str) -> StoreResult<Vec<Form>> {
        let dir = self.root.join(FORMS_DIR);
        let entries = fs::read_dir(&dir).map_err(|e| {
            StoreError::Unavailable(format!("Failed to read {}: {}", dir.display(), e))
        })?;

        let mut forms = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| StoreError::Unavailable(e.to_string()))?;
            let path = entry.path();
            if path.extension().map_or(true, |ext| ext != "json") {
                continue;
            }
            let form = Self::read_form(&path)?;
            if form.is_owned_by(owner_id) {
                forms.push(form);
            }
        }
        sort_recent_first(&mut forms);
        Ok(forms)
    }

    fn save_form(&self, form: &Form) -> StoreResult<()> {
        let path = self.form_path(&form.id)?;
        let content = serde_json::to_string_pretty(form)
            .map_err(|e| StoreError::Corrupt(format!("Failed to serialize form: {}", e)))?;

        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| StoreError::Unavailable("Lock poisoned".into()))?;

        // Write-then-rename so readers never see a half-written form
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, content)
            .and_then(|_| fs::rename(&tmp, &path))
            .map_err(|e| StoreError::Unavailable(format!("Failed to write form: {}", e)))
    }

    fn insert_submission(&self, submission: &Submission) -> StoreResult<()> {
        let path = self.submissions_path(&submission.form_id)?;
        let mut line = serde_json::to_string(submission)
            .map_err(|e| StoreError::Corrupt(format!("Failed to serialize submission: {}", e)))?;
        line.push('\n');

        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| StoreError::Unavailable("Lock poisoned".into()))?;

        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .open(&path)
            .map_err(|e| StoreError::Unavailable(format!("Failed to open {}: {}", path.display(), e)))?;

        let append = |file: &mut File| -> io::Result<()> {
            if let Some(offset) = torn_tail(file)? {
                file.set_len(offset)?;
            }
            file.seek(SeekFrom::End(0))?;
            file.write_all(line.as_bytes())?;
            file.sync_all()
        };
        append(&mut file)
            .map_err(|e| StoreError::Unavailable(format!("Failed to append submission: {}", e)))
    }

    fn scan_submissions(
        &self,
        form_id: &str,
        visit: &mut dyn FnMut(Submission),
    ) -> StoreResult<()> {
        let path = self.submissions_path(form_id)?;
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
            Err(e) => {
                return Err(StoreError::Unavailable(format!(
                    "Failed to open {}: {}",
                    path.display(),
                    e
                )))
            }
        };

        let mut reader = BufReader::new(file);
        let mut line = String::new();
        let mut number = 0;
        loop {
            line.clear();
            let read = reader
                .read_line(&mut line)
                .map_err(|e| StoreError::Unavailable(e.to_string()))?;
            if read == 0 {
                return Ok(());
            }
            number += 1;
            // Unterminated tail of an interrupted append
            if !line.ends_with('\n') {
                return Ok(());
            }
            if line.trim().is_empty() {
                continue;
            }
            let submission = serde_json::from_str(&line).map_err(|e| {
                StoreError::Corrupt(format!("{} line {}: {}", path.display(), number, e))
            })?;
            visit(submission);
        }
    }
}
